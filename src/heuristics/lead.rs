//! リード獲得ヒューリスティクス
//!
//! インテント判定APIの呼び出し可否（セルフスロットリング）と、
//! リードフォームのローカルバリデーション。

use std::time::{Duration, Instant};

use regex::Regex;

use crate::embed::WidgetConfig;
use crate::session::LeadState;

/// インテント判定の最短呼び出し間隔（チケット側とは独立）
pub const LEAD_CHECK_INTERVAL: Duration = Duration::from_secs(60);
/// 判定に必要な最小ユーザーメッセージ数
pub const MIN_USER_MESSAGES: u32 = 2;

/// インテント判定APIを呼んでよいか
///
/// フォーム送信済みセッションでは恒久的に false。
pub fn should_check_lead_intent(
    config: &WidgetConfig,
    lead: &LeadState,
    user_message_count: u32,
    now: Instant,
) -> bool {
    if !config.enable_leads || !config.enable_smart_lead_detection {
        return false;
    }
    if lead.suggested || lead.submitted {
        return false;
    }
    if user_message_count < MIN_USER_MESSAGES {
        return false;
    }
    match lead.last_check_at {
        Some(last) => now.duration_since(last) >= LEAD_CHECK_INTERVAL,
        None => true,
    }
}

/// メールアドレスの形式チェック
pub fn is_valid_email(email: &str) -> bool {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
        .unwrap()
        .is_match(email.trim())
}

/// リードフォームのローカルバリデーション結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadFormError {
    NameRequired,
    EmailRequired,
    EmailInvalid,
}

impl LeadFormError {
    /// インライン表示用のメッセージ
    pub fn message(&self) -> &'static str {
        match self {
            LeadFormError::NameRequired => "Please enter your name.",
            LeadFormError::EmailRequired => "Please enter your email address.",
            LeadFormError::EmailInvalid => "Please enter a valid email address.",
        }
    }

    /// エラー表示を付けるフィールド
    pub fn field(&self) -> &'static str {
        match self {
            LeadFormError::NameRequired => "name",
            LeadFormError::EmailRequired | LeadFormError::EmailInvalid => "email",
        }
    }
}

/// ネットワーク呼び出し前のフォーム検証
pub fn validate_lead_form(name: &str, email: &str) -> Result<(), LeadFormError> {
    if name.trim().is_empty() {
        return Err(LeadFormError::NameRequired);
    }
    if email.trim().is_empty() {
        return Err(LeadFormError::EmailRequired);
    }
    if !is_valid_email(email) {
        return Err(LeadFormError::EmailInvalid);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::{attributes::names, EmbedAttributes};

    fn leads_enabled_config() -> WidgetConfig {
        let attrs = EmbedAttributes::from_pairs([
            (names::API, "https://x.test"),
            (names::ID, "abc"),
            (names::ENABLE_LEADS, "true"),
        ]);
        WidgetConfig::from_attributes(&attrs)
    }

    #[test]
    fn test_check_allowed_when_gates_pass() {
        let config = leads_enabled_config();
        let lead = LeadState::default();
        assert!(should_check_lead_intent(
            &config,
            &lead,
            2,
            Instant::now()
        ));
    }

    #[test]
    fn test_check_blocked_when_leads_disabled() {
        let attrs = EmbedAttributes::from_pairs([
            (names::API, "https://x.test"),
            (names::ID, "abc"),
        ]);
        let config = WidgetConfig::from_attributes(&attrs);
        assert!(!should_check_lead_intent(
            &config,
            &LeadState::default(),
            5,
            Instant::now()
        ));
    }

    #[test]
    fn test_check_blocked_after_suggestion_or_submission() {
        let config = leads_enabled_config();
        let now = Instant::now();

        let suggested = LeadState {
            suggested: true,
            ..Default::default()
        };
        assert!(!should_check_lead_intent(&config, &suggested, 5, now));

        let submitted = LeadState {
            submitted: true,
            ..Default::default()
        };
        assert!(!should_check_lead_intent(&config, &submitted, 5, now));
    }

    #[test]
    fn test_check_self_throttles() {
        let config = leads_enabled_config();
        let now = Instant::now();
        let lead = LeadState {
            last_check_at: Some(now - Duration::from_secs(30)),
            ..Default::default()
        };
        assert!(!should_check_lead_intent(&config, &lead, 5, now));

        let lead = LeadState {
            last_check_at: Some(now - LEAD_CHECK_INTERVAL),
            ..Default::default()
        };
        assert!(should_check_lead_intent(&config, &lead, 5, now));
    }

    #[test]
    fn test_check_requires_two_messages() {
        let config = leads_enabled_config();
        assert!(!should_check_lead_intent(
            &config,
            &LeadState::default(),
            1,
            Instant::now()
        ));
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("dana@example.com"));
        assert!(is_valid_email("  dana@example.com  "));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.d"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_validate_lead_form_order() {
        assert_eq!(
            validate_lead_form("", "dana@example.com"),
            Err(LeadFormError::NameRequired)
        );
        assert_eq!(
            validate_lead_form("Dana", ""),
            Err(LeadFormError::EmailRequired)
        );
        assert_eq!(
            validate_lead_form("Dana", "not-an-email"),
            Err(LeadFormError::EmailInvalid)
        );
        assert_eq!(validate_lead_form("Dana", "dana@example.com"), Ok(()));
    }
}
