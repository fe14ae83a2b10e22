//! 判定に使う固定フレーズ表
//!
//! すべて小文字で保持し、入力側を小文字化して部分一致で照合する。

/// ユーザーが人間の対応／チケットを明示的に求めるフレーズ
pub const EXPLICIT_TICKET_REQUESTS: &[&str] = &[
    "talk to a human",
    "talk to a person",
    "talk to someone",
    "speak to a human",
    "speak to an agent",
    "speak to a person",
    "real person",
    "human agent",
    "human support",
    "create a ticket",
    "open a ticket",
    "support ticket",
    "raise a ticket",
    "file a ticket",
    "contact support",
    "customer service",
];

/// ボット回答自体がチケット作成を提案しているフレーズ
///
/// これに一致した場合は提案済みとして数えるだけで、重ねてUIは出さない。
pub const ANSWER_TICKET_OFFERS: &[&str] = &[
    "create a support ticket",
    "open a support ticket",
    "submit a support ticket",
    "would you like to create a ticket",
];

/// 「役に立たなかった回答」の判定フレーズ
pub const UNHELPFUL_ANSWERS: &[&str] = &[
    "i don't have enough information",
    "i don't know",
    "i'm not sure",
    "i am not sure",
    "i couldn't find",
    "i could not find",
    "i cannot answer",
    "i can't answer",
    "i don't have that information",
    "i'm unable to answer",
    "no information available",
];

/// 拡張フォールバック回答のフレーズ
///
/// バックエンドが言い換えを促している回答であり、「役に立たなかった」
/// には数えない。
pub const ENHANCED_FALLBACKS: &[&str] = &[
    "try rephrasing",
    "could you rephrase",
    "rephrase your question",
    "asking about something else",
    "ask about something else",
];

/// 緊急度の高い問題フレーズ（単独で提案トリガー）
pub const URGENT_PROBLEMS: &[&str] = &[
    "can't log in",
    "cannot log in",
    "can't access my account",
    "cannot access my account",
    "locked out",
    "account locked",
    "payment failed",
    "charged twice",
    "double charged",
    "lost my data",
    "data loss",
    "completely broken",
    "not working at all",
    "stopped working",
    "site is down",
    "urgent",
    "emergency",
    "critical issue",
];

/// 中程度の問題フレーズ（不満フレーズと同時出現で提案トリガー）
pub const MODERATE_PROBLEMS: &[&str] = &[
    "not working",
    "doesn't work",
    "does not work",
    "broken",
    "problem with",
    "issue with",
    "having trouble",
    "keeps failing",
    "error message",
];

/// 不満の表明フレーズ
pub const FRUSTRATION_INDICATORS: &[&str] = &[
    "frustrated",
    "frustrating",
    "annoying",
    "ridiculous",
    "useless",
    "fed up",
    "waste of time",
    "still not working",
    "still doesn't",
    "how many times",
    "third time",
    "again and again",
];

/// リードフォーム事前入力用の関心プロダクト語彙
pub const PRODUCT_INTEREST_KEYWORDS: &[&str] = &[
    "enterprise",
    "premium",
    "professional",
    "starter",
    "basic",
    "pricing",
    "subscription",
    "trial",
    "upgrade",
];

/// 小文字化済みテキストに対する部分一致判定
pub fn matches_any(text_lower: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|phrase| text_lower.contains(phrase))
}

/// テキストから最初に見つかった関心プロダクト語を返す
pub fn find_product_interest(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    PRODUCT_INTEREST_KEYWORDS
        .iter()
        .find(|keyword| lower.contains(*keyword))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_any() {
        assert!(matches_any(
            "i want to talk to a human please",
            EXPLICIT_TICKET_REQUESTS
        ));
        assert!(!matches_any("what are your hours", EXPLICIT_TICKET_REQUESTS));
    }

    #[test]
    fn test_answer_offer_covers_backend_phrasing() {
        // バックエンドの標準フォールバック文がそのまま一致すること
        let answer = "i don't have enough information to answer that question. \
                      would you like to create a support ticket so someone can help you with this?";
        assert!(matches_any(answer, ANSWER_TICKET_OFFERS));
    }

    #[test]
    fn test_enhanced_fallback_is_distinct_from_unhelpful() {
        let fallback = "i don't have enough information to answer that question. \
                        could you try rephrasing or asking about something else?";
        assert!(matches_any(fallback, ENHANCED_FALLBACKS));
        // 素のunhelpfulリストにも引っ掛かる文面なので、呼び出し側は
        // フォールバック判定を先に行う必要がある
        assert!(matches_any(fallback, UNHELPFUL_ANSWERS));
    }

    #[test]
    fn test_find_product_interest() {
        assert_eq!(
            find_product_interest("How much is the Premium plan?"),
            Some("premium")
        );
        assert_eq!(find_product_interest("hello"), None);
    }
}
