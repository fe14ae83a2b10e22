//! セッション状態
//!
//! ページロード1回ぶんの寿命を持つ可変状態。クライアント側には
//! 何も永続化しない（リロードで全て破棄される）。

use std::time::Instant;

use crate::api::endpoints::ConversationId;

/// チケットの固定プライオリティ（確認カードでも編集不可）
pub const TICKET_PRIORITY: &str = "medium";

/// トランスクリプトへ取り込む直近バブル数の上限
pub const TRANSCRIPT_BUBBLE_LIMIT: usize = 10;

/// チケット作成フローの進行段階
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketStep {
    Subject,
    Description,
    Contact,
    Summary,
}

impl TicketStep {
    /// 次の入力を促すプロンプト文
    pub fn prompt(&self) -> &'static str {
        match self {
            TicketStep::Subject => "What should the ticket subject be?",
            TicketStep::Description => "Please describe the problem in a few sentences.",
            TicketStep::Contact => {
                "How can our team reach you? (email or account name)"
            }
            TicketStep::Summary => "Please review your ticket before submitting.",
        }
    }
}

/// 作成途中のチケット下書き
///
/// 送信成功・キャンセルで破棄。送信失敗時は保持してリトライ可能。
#[derive(Debug, Clone, PartialEq)]
pub struct TicketDraft {
    pub step: TicketStep,
    pub subject: String,
    pub description: String,
    pub contact: String,
    /// フロー開始時に凍結された会話トランスクリプト
    pub transcript: String,
    pub priority: &'static str,
}

impl TicketDraft {
    pub fn new(transcript: String) -> Self {
        Self {
            step: TicketStep::Subject,
            subject: String::new(),
            description: String::new(),
            contact: String::new(),
            transcript,
            priority: TICKET_PRIORITY,
        }
    }

    /// 送信用の説明文（本文＋トランスクリプト）
    pub fn full_description(&self) -> String {
        if self.transcript.is_empty() {
            self.description.clone()
        } else {
            format!(
                "{}\n\n--- Conversation transcript ---\n{}",
                self.description, self.transcript
            )
        }
    }
}

/// チケット提案のスロットリング記録
///
/// 提案回数は単調非減少かつ上限付きで、ページリロード以外では
/// リセットされない。
#[derive(Debug, Clone)]
pub struct SuggestionTracker {
    /// 最後に提案を出した時刻
    pub last_suggestion_at: Option<Instant>,
    /// セッション中に出した提案回数
    pub suggestions_shown: u32,
    /// 会話開始時刻
    pub conversation_started_at: Instant,
    /// 連続して役に立たなかった回答の数
    pub unhelpful_streak: u32,
}

impl SuggestionTracker {
    pub fn new(now: Instant) -> Self {
        Self {
            last_suggestion_at: None,
            suggestions_shown: 0,
            conversation_started_at: now,
            unhelpful_streak: 0,
        }
    }

    /// 提案発生を記録（UIに出さないカウントのみの場合も使う）
    pub fn record_suggestion(&mut self, now: Instant) {
        self.last_suggestion_at = Some(now);
        self.suggestions_shown = self.suggestions_shown.saturating_add(1);
    }
}

/// リード提案の状態
#[derive(Debug, Clone, Default)]
pub struct LeadState {
    /// このセッションで提案済みか（辞退を含む）
    pub suggested: bool,
    /// フォーム送信済みか。以後の提案は恒久的に抑止される
    pub submitted: bool,
    /// 最後にインテント判定を呼んだ時刻
    pub last_check_at: Option<Instant>,
    /// 会話から検出した関心プロダクト（お礼メッセージの個別化に使用）
    pub product_interest: Option<String>,
}

/// セッション状態（ページロードごとに1つ）
#[derive(Debug, Clone)]
pub struct SessionState {
    /// 匿名ユーザーID（セッション中は不変）
    pub user_id: String,
    /// サーバーが最初の回答で払い出す会話ID
    pub conversation_id: Option<ConversationId>,
    /// 送信済みユーザーメッセージ数
    pub user_message_count: u32,
    /// 入力中インジケーター表示中か
    pub typing_visible: bool,
    /// 質問リクエスト進行中か（二重送信ガード）
    pub sending: bool,
    /// 進行中のチケット下書き（質問フローと相互排他）
    pub ticket: Option<TicketDraft>,
    pub ticket_tracker: SuggestionTracker,
    pub lead: LeadState,
    /// センチメント操作の再有効化時刻
    pub sentiment_cooldown_until: Option<Instant>,
    /// フィードバック操作の再有効化時刻
    pub feedback_cooldown_until: Option<Instant>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::with_start(Instant::now())
    }

    pub fn with_start(now: Instant) -> Self {
        Self {
            user_id: crate::gui::utils::generate_anonymous_id(),
            conversation_id: None,
            user_message_count: 0,
            typing_visible: false,
            sending: false,
            ticket: None,
            ticket_tracker: SuggestionTracker::new(now),
            lead: LeadState::default(),
            sentiment_cooldown_until: None,
            feedback_cooldown_until: None,
        }
    }

    /// 会話IDを確定する。一度設定されたら以後の応答では上書きされる
    /// （最初の応答のものが恒久的に置き換える仕様）。
    pub fn adopt_conversation_id(&mut self, id: Option<ConversationId>) {
        if let Some(id) = id {
            self.conversation_id = Some(id);
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_new_session_defaults() {
        let session = SessionState::new();
        assert!(session.user_id.starts_with("anon_"));
        assert!(session.conversation_id.is_none());
        assert_eq!(session.user_message_count, 0);
        assert!(session.ticket.is_none());
        assert!(!session.lead.suggested);
        assert!(!session.lead.submitted);
    }

    #[test]
    fn test_adopt_conversation_id_keeps_latest() {
        let mut session = SessionState::new();
        session.adopt_conversation_id(None);
        assert!(session.conversation_id.is_none());

        session.adopt_conversation_id(Some(ConversationId("c1".to_string())));
        assert_eq!(session.conversation_id.as_ref().unwrap().0, "c1");

        // None の応答では既知のIDを消さない
        session.adopt_conversation_id(None);
        assert_eq!(session.conversation_id.as_ref().unwrap().0, "c1");
    }

    #[test]
    fn test_suggestion_tracker_is_monotonic() {
        let start = Instant::now();
        let mut tracker = SuggestionTracker::new(start);
        tracker.record_suggestion(start + Duration::from_secs(40));
        tracker.record_suggestion(start + Duration::from_secs(200));
        assert_eq!(tracker.suggestions_shown, 2);
        assert_eq!(
            tracker.last_suggestion_at,
            Some(start + Duration::from_secs(200))
        );
    }

    #[test]
    fn test_ticket_draft_full_description() {
        let mut draft = TicketDraft::new("[12:00:00] You: hi".to_string());
        draft.description = "Cannot log in".to_string();
        let full = draft.full_description();
        assert!(full.starts_with("Cannot log in"));
        assert!(full.contains("--- Conversation transcript ---"));
        assert!(full.contains("[12:00:00] You: hi"));
    }

    #[test]
    fn test_ticket_draft_without_transcript() {
        let mut draft = TicketDraft::new(String::new());
        draft.description = "Broken".to_string();
        assert_eq!(draft.full_description(), "Broken");
    }
}
