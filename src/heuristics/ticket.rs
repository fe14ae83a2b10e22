//! チケット提案ヒューリスティクス
//!
//! 毎ターン（回答成功後）に評価し、高々1つのルールだけを発火させる。
//! 定数はモジュール化された実装系の値。

use std::time::{Duration, Instant};

use super::phrases;
use crate::session::SuggestionTracker;

/// 前回提案からの最短間隔
pub const SUGGESTION_COOLDOWN: Duration = Duration::from_secs(120);
/// セッションあたりの提案回数上限
pub const MAX_SUGGESTIONS_PER_SESSION: u32 = 2;
/// 会話開始からの最短経過時間
pub const MIN_CONVERSATION_AGE: Duration = Duration::from_secs(30);
/// 提案に必要な最小ユーザーメッセージ数
pub const MIN_USER_MESSAGES: u32 = 2;
/// 連続unhelpful回答のトリガー回数
pub const UNHELPFUL_STREAK_TRIGGER: u32 = 3;
/// 問題検出ルールに必要な最小総メッセージ数
pub const MIN_MESSAGES_FOR_PROBLEM_RULE: u32 = 3;

/// 発火したルールの種別（優先順）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketCue {
    /// (a) ユーザーが明示的に人間の対応を要求
    ExplicitRequest,
    /// (b) 回答自体が既にチケット作成を提案している
    ///     （カウントのみ、UIは重ねて出さない）
    AnswerAlreadyOffers,
    /// (c) unhelpful回答が規定回数連続した
    RepeatedUnhelpful,
    /// (d) 緊急度の高い問題、または中程度の問題＋不満の表明
    UrgentProblem,
}

impl TicketCue {
    /// 重複UIを避けるため、提案バブルを描画すべきか
    pub fn should_render_offer(&self) -> bool {
        !matches!(self, TicketCue::AnswerAlreadyOffers)
    }
}

/// 全ゲートを通過しているか
fn gates_pass(tracker: &SuggestionTracker, user_message_count: u32, now: Instant) -> bool {
    if let Some(last) = tracker.last_suggestion_at {
        if now.duration_since(last) < SUGGESTION_COOLDOWN {
            return false;
        }
    }
    if tracker.suggestions_shown >= MAX_SUGGESTIONS_PER_SESSION {
        return false;
    }
    if now.duration_since(tracker.conversation_started_at) < MIN_CONVERSATION_AGE {
        return false;
    }
    if user_message_count < MIN_USER_MESSAGES {
        return false;
    }
    true
}

/// 1ターンぶんの評価
///
/// unhelpfulストリークの記帳はゲートの通過に関係なく毎ターン行う
/// （ゲートは提案の「表示」を抑止するだけで、観測は止めない）。
/// ルールが発火した場合はトラッカーへ提案発生を記録してから返す。
pub fn evaluate_turn(
    question: &str,
    answer: &str,
    tracker: &mut SuggestionTracker,
    user_message_count: u32,
    total_message_count: u32,
    now: Instant,
) -> Option<TicketCue> {
    let question_lower = question.to_lowercase();
    let answer_lower = answer.to_lowercase();

    // (c) の記帳: 拡張フォールバックはunhelpfulに数えない
    let is_fallback = phrases::matches_any(&answer_lower, phrases::ENHANCED_FALLBACKS);
    let is_unhelpful =
        !is_fallback && phrases::matches_any(&answer_lower, phrases::UNHELPFUL_ANSWERS);
    if is_unhelpful {
        tracker.unhelpful_streak = tracker.unhelpful_streak.saturating_add(1);
    } else {
        tracker.unhelpful_streak = 0;
    }

    if !gates_pass(tracker, user_message_count, now) {
        return None;
    }

    // (a) 明示的要求は即提案
    if phrases::matches_any(&question_lower, phrases::EXPLICIT_TICKET_REQUESTS) {
        tracker.record_suggestion(now);
        return Some(TicketCue::ExplicitRequest);
    }

    // (b) 回答が既に提案している場合は提案済み扱い
    if phrases::matches_any(&answer_lower, phrases::ANSWER_TICKET_OFFERS) {
        tracker.record_suggestion(now);
        return Some(TicketCue::AnswerAlreadyOffers);
    }

    // (c) 連続unhelpful
    if tracker.unhelpful_streak >= UNHELPFUL_STREAK_TRIGGER {
        tracker.unhelpful_streak = 0;
        tracker.record_suggestion(now);
        return Some(TicketCue::RepeatedUnhelpful);
    }

    // (d) 問題検出（質問・回答の両テキストを対象）
    if total_message_count >= MIN_MESSAGES_FOR_PROBLEM_RULE {
        let combined = format!("{} {}", question_lower, answer_lower);
        let urgent = phrases::matches_any(&combined, phrases::URGENT_PROBLEMS);
        let moderate_with_frustration =
            phrases::matches_any(&combined, phrases::MODERATE_PROBLEMS)
                && phrases::matches_any(&combined, phrases::FRUSTRATION_INDICATORS);
        if urgent || moderate_with_frustration {
            tracker.record_suggestion(now);
            return Some(TicketCue::UrgentProblem);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    /// ゲートを全て満たした状態のトラッカーを作る
    fn open_tracker(now: Instant) -> SuggestionTracker {
        SuggestionTracker::new(now - MIN_CONVERSATION_AGE - Duration::from_secs(1))
    }

    #[test]
    fn test_explicit_request_fires_first() {
        let now = Instant::now();
        let mut tracker = open_tracker(now);
        let cue = evaluate_turn(
            "I need to talk to a human",
            "Sure, happy to help",
            &mut tracker,
            3,
            6,
            now,
        );
        assert_eq!(cue, Some(TicketCue::ExplicitRequest));
        assert_eq!(tracker.suggestions_shown, 1);
        assert_eq!(tracker.last_suggestion_at, Some(now));
    }

    #[test]
    fn test_answer_offer_counts_without_rendering() {
        let now = Instant::now();
        let mut tracker = open_tracker(now);
        let cue = evaluate_turn(
            "how do I reset?",
            "Would you like to create a support ticket so someone can help you with this?",
            &mut tracker,
            3,
            6,
            now,
        )
        .unwrap();
        assert_eq!(cue, TicketCue::AnswerAlreadyOffers);
        assert!(!cue.should_render_offer());
        // 提案済みとして数え、タイムスタンプも更新される
        assert_eq!(tracker.suggestions_shown, 1);
        assert_eq!(tracker.last_suggestion_at, Some(now));
    }

    #[test]
    fn test_three_consecutive_unhelpful_answers_trigger_once() {
        let now = Instant::now();
        let mut tracker = open_tracker(now);

        for turn in 0..2 {
            let cue = evaluate_turn(
                "question",
                "I don't know the answer to that.",
                &mut tracker,
                3 + turn,
                6,
                now,
            );
            assert_eq!(cue, None, "turn {} should not fire", turn);
        }
        assert_eq!(tracker.unhelpful_streak, 2);

        let cue = evaluate_turn(
            "question",
            "I'm not sure about that one.",
            &mut tracker,
            5,
            10,
            now,
        );
        assert_eq!(cue, Some(TicketCue::RepeatedUnhelpful));
        // 発火直後にストリークはゼロへ
        assert_eq!(tracker.unhelpful_streak, 0);
    }

    #[test]
    fn test_enhanced_fallback_does_not_count_as_unhelpful() {
        let now = Instant::now();
        let mut tracker = open_tracker(now);
        tracker.unhelpful_streak = 2;

        let cue = evaluate_turn(
            "question",
            "I don't have enough information. Could you try rephrasing or asking about something else?",
            &mut tracker,
            4,
            8,
            now,
        );
        assert_eq!(cue, None);
        // フォールバック回答はストリークをリセットする
        assert_eq!(tracker.unhelpful_streak, 0);
    }

    #[test]
    fn test_helpful_answer_resets_streak() {
        let now = Instant::now();
        let mut tracker = open_tracker(now);
        tracker.unhelpful_streak = 2;

        evaluate_turn("q", "Here is exactly how to do it.", &mut tracker, 4, 8, now);
        assert_eq!(tracker.unhelpful_streak, 0);
    }

    #[test]
    fn test_urgent_problem_fires() {
        let now = Instant::now();
        let mut tracker = open_tracker(now);
        let cue = evaluate_turn(
            "My payment failed and I was charged twice",
            "Let me look into that.",
            &mut tracker,
            3,
            6,
            now,
        );
        assert_eq!(cue, Some(TicketCue::UrgentProblem));
    }

    #[test]
    fn test_moderate_problem_needs_frustration() {
        let now = Instant::now();
        let mut tracker = open_tracker(now);
        let cue = evaluate_turn(
            "The export is not working",
            "Try clearing your cache.",
            &mut tracker,
            3,
            6,
            now,
        );
        assert_eq!(cue, None);

        let cue = evaluate_turn(
            "The export is still not working, this is so frustrating",
            "Try clearing your cache.",
            &mut tracker,
            4,
            8,
            now,
        );
        assert_eq!(cue, Some(TicketCue::UrgentProblem));
    }

    #[test]
    fn test_problem_rule_needs_three_messages() {
        let now = Instant::now();
        let mut tracker = open_tracker(now);
        let cue = evaluate_turn(
            "My payment failed",
            "Let me look into that.",
            &mut tracker,
            2,
            2,
            now,
        );
        assert_eq!(cue, None);
    }

    #[test]
    fn test_cooldown_gate() {
        let now = Instant::now();
        let mut tracker = open_tracker(now);
        tracker.record_suggestion(now - Duration::from_secs(60));

        let cue = evaluate_turn(
            "I need to talk to a human",
            "ok",
            &mut tracker,
            5,
            10,
            now,
        );
        assert_eq!(cue, None);

        // 120秒経過後は再び提案可能
        let later = now + Duration::from_secs(61);
        let cue = evaluate_turn(
            "I need to talk to a human",
            "ok",
            &mut tracker,
            5,
            10,
            later,
        );
        assert_eq!(cue, Some(TicketCue::ExplicitRequest));
    }

    #[test]
    fn test_session_cap_gate() {
        let now = Instant::now();
        let mut tracker = open_tracker(now);
        tracker.suggestions_shown = MAX_SUGGESTIONS_PER_SESSION;

        let cue = evaluate_turn(
            "I need to talk to a human",
            "ok",
            &mut tracker,
            5,
            10,
            now,
        );
        assert_eq!(cue, None);
    }

    #[test]
    fn test_conversation_age_gate() {
        let now = Instant::now();
        let mut tracker = SuggestionTracker::new(now - Duration::from_secs(10));

        let cue = evaluate_turn(
            "I need to talk to a human",
            "ok",
            &mut tracker,
            5,
            10,
            now,
        );
        assert_eq!(cue, None);
    }

    #[test]
    fn test_min_user_messages_gate() {
        let now = Instant::now();
        let mut tracker = open_tracker(now);

        let cue = evaluate_turn("I need to talk to a human", "ok", &mut tracker, 1, 2, now);
        assert_eq!(cue, None);
    }

    #[test]
    fn test_streak_builds_while_gated() {
        let now = Instant::now();
        // 会話開始直後（ゲート不成立）でも記帳は進む
        let mut tracker = SuggestionTracker::new(now);
        evaluate_turn("q", "I don't know.", &mut tracker, 1, 2, now);
        assert_eq!(tracker.unhelpful_streak, 1);
    }
}
