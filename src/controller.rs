//! 会話コントローラー
//!
//! セッション状態を専有し、UIイベントとバックエンド呼び出しを仲介する。
//! 変更は [`WidgetChange`] としてブロードキャストし、UI層（Dioxusフック）が
//! シグナルへ反映する。すべてのネットワーク失敗はこの層で回収し、
//! ページ側へ例外を漏らさない。

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::api::client::LeadSubmission;
use crate::api::endpoints::ConversationId;
use crate::api::{HttpBackend, Sentiment, SupportBackend};
use crate::embed::WidgetConfig;
use crate::gui::models::ChatBubble;
use crate::heuristics::lead::{validate_lead_form, LeadFormError};
use crate::heuristics::{self, phrases};
use crate::session::{SessionState, TicketDraft, TicketStep, TRANSCRIPT_BUBBLE_LIMIT};

/// 送信失敗時の汎用エラーバブル文言
pub const GENERIC_ERROR_TEXT: &str = "Sorry, something went wrong. Please try again.";
/// センチメント／フィードバック操作のクールダウン
pub const RATING_COOLDOWN: Duration = Duration::from_secs(10);
/// フォームのバリデーションメッセージ表示時間
pub const VALIDATION_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// コントローラーからUI層への変更通知
#[derive(Debug, Clone)]
pub enum WidgetChange {
    BubbleAdded(ChatBubble),
    TypingChanged(bool),
    SendingChanged(bool),
    PanelOpenChanged(bool),
    /// チケットフローの段階変更（None = フロー終了）
    TicketFlowChanged(Option<TicketStep>),
    LeadFormOpened {
        product_interest: Option<String>,
    },
    LeadFormClosed,
    LeadFormError(LeadFormError),
    LeadFormErrorCleared,
    /// true = 操作無効化、false = 再有効化
    SentimentLocked(bool),
    FeedbackLocked(bool),
}

struct ControllerState {
    session: SessionState,
    bubbles: Vec<ChatBubble>,
    panel_open: bool,
}

/// 会話コントローラー本体
///
/// ページロードごとに1インスタンス。ロックをawaitまたいで保持しない。
pub struct ConversationController {
    config: WidgetConfig,
    backend: Arc<dyn SupportBackend>,
    state: Mutex<ControllerState>,
    changes: broadcast::Sender<WidgetChange>,
}

impl ConversationController {
    /// セッションを指定して構築（テストや埋め込み側の制御用）
    pub fn with_session(
        config: WidgetConfig,
        backend: Arc<dyn SupportBackend>,
        session: SessionState,
    ) -> Self {
        let (changes, _) = broadcast::channel(64);
        let greeting = ChatBubble::bot(format!(
            "Hi! I'm {}. How can I help you today?",
            config.agent_name
        ));
        Self {
            config,
            backend,
            state: Mutex::new(ControllerState {
                session,
                bubbles: vec![greeting],
                panel_open: false,
            }),
            changes,
        }
    }

    pub fn new(config: WidgetConfig, backend: Arc<dyn SupportBackend>) -> Self {
        Self::with_session(config, backend, SessionState::new())
    }

    /// HTTPバックエンドで構築する標準コンストラクター
    pub fn connect(config: WidgetConfig) -> Self {
        let session = SessionState::new();
        let backend = HttpBackend::new(
            config.endpoints.clone(),
            config.chatbot_id.clone(),
            session.user_id.clone(),
        );
        Self::with_session(config, Arc::new(backend), session)
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WidgetChange> {
        self.changes.subscribe()
    }

    /// 現在のバブル一覧のスナップショット
    pub fn bubbles(&self) -> Vec<ChatBubble> {
        self.state.lock().bubbles.clone()
    }

    /// セッション状態のスナップショット
    pub fn session(&self) -> SessionState {
        self.state.lock().session.clone()
    }

    pub fn conversation_id(&self) -> Option<ConversationId> {
        self.state.lock().session.conversation_id.clone()
    }

    pub fn is_sending(&self) -> bool {
        self.state.lock().session.sending
    }

    /// 進行中のチケットフロー段階
    pub fn ticket_step(&self) -> Option<TicketStep> {
        self.state.lock().session.ticket.as_ref().map(|d| d.step)
    }

    pub fn is_panel_open(&self) -> bool {
        self.state.lock().panel_open
    }

    /// パネルの開閉を切り替え、新しい状態を返す
    pub fn toggle_panel(&self) -> bool {
        let open = {
            let mut state = self.state.lock();
            state.panel_open = !state.panel_open;
            state.panel_open
        };
        self.emit(WidgetChange::PanelOpenChanged(open));
        open
    }

    fn emit(&self, change: WidgetChange) {
        // 購読者がいない間の送信エラーは無視してよい
        let _ = self.changes.send(change);
    }

    fn push_bubble(&self, bubble: ChatBubble) {
        self.state.lock().bubbles.push(bubble.clone());
        self.emit(WidgetChange::BubbleAdded(bubble));
    }

    /// 送信アクションの入口
    ///
    /// チケットフィールド入力が進行中なら会話ターンではなく
    /// フィールド取り込みへ回す（相互排他）。
    pub async fn send_message(&self, text: &str) {
        let in_ticket_capture = self.state.lock().session.ticket.is_some();
        if in_ticket_capture {
            self.capture_ticket_field(text.trim()).await;
            return;
        }

        let text = text.trim();
        if text.is_empty() {
            return;
        }
        self.ask_turn(text).await;
    }

    /// 1会話ターン: Idle → Sending → Idle|ErrorDisplayed
    async fn ask_turn(&self, question: &str) {
        let conversation_id = {
            let mut state = self.state.lock();
            if state.session.sending {
                debug!("send ignored - a request is already in flight");
                return;
            }
            state.session.sending = true;
            state.session.typing_visible = true;
            state.session.user_message_count += 1;
            let bubble = ChatBubble::user(question);
            state.bubbles.push(bubble.clone());
            let id = state.session.conversation_id.clone();
            drop(state);
            self.emit(WidgetChange::BubbleAdded(bubble));
            id
        };
        self.emit(WidgetChange::SendingChanged(true));
        self.emit(WidgetChange::TypingChanged(true));

        let result = self.backend.ask(question, conversation_id.as_ref()).await;

        // 結果に関係なく入力を再有効化し、インジケーターを消す
        {
            let mut state = self.state.lock();
            state.session.sending = false;
            state.session.typing_visible = false;
        }
        self.emit(WidgetChange::SendingChanged(false));
        self.emit(WidgetChange::TypingChanged(false));

        match result {
            Ok(response) => {
                self.state
                    .lock()
                    .session
                    .adopt_conversation_id(response.conversation_id.clone());
                // 回答はエスケープ済みマークアップとして描画される
                self.push_bubble(ChatBubble::bot_markup(format_answer_markup(
                    &response.answer,
                )));
                self.after_answer(question, &response.answer).await;
            }
            Err(err) => {
                error!("ask request failed: {}", err);
                self.push_bubble(ChatBubble::error(GENERIC_ERROR_TEXT));
            }
        }
    }

    /// 回答成功後の提案評価。チケットルールが1つも発火しなかった
    /// 場合のみリード判定へフォールスルーする。
    async fn after_answer(&self, question: &str, answer: &str) {
        let now = Instant::now();
        let cue = if self.config.enable_tickets {
            let mut state = self.state.lock();
            let user_count = state.session.user_message_count;
            let total_count = state
                .bubbles
                .iter()
                .filter(|b| b.transcript_text().is_some())
                .count() as u32;
            heuristics::evaluate_turn(
                question,
                answer,
                &mut state.session.ticket_tracker,
                user_count,
                total_count,
                now,
            )
        } else {
            None
        };

        if let Some(cue) = cue {
            info!("ticket suggestion cue fired: {:?}", cue);
            if cue.should_render_offer() {
                self.push_bubble(ChatBubble::ticket_offer());
            }
            return;
        }

        if self.config.enable_leads {
            self.maybe_check_lead_intent(question, now).await;
        }
    }

    // --- チケット作成サブフロー ---------------------------------------

    /// チケットフローを開始し、直近の会話をトランスクリプトとして凍結する
    pub fn start_ticket_flow(&self) {
        {
            let mut state = self.state.lock();
            if !self.config.enable_tickets || state.session.ticket.is_some() {
                return;
            }
            let transcript = build_transcript(&state.bubbles);
            state.session.ticket = Some(TicketDraft::new(transcript));
        }
        self.emit(WidgetChange::TicketFlowChanged(Some(TicketStep::Subject)));
        self.push_bubble(ChatBubble::bot(TicketStep::Subject.prompt()));
    }

    /// チケット提案を断ったときの応答
    pub fn decline_ticket_offer(&self) {
        self.push_bubble(ChatBubble::bot(
            "Okay! Let me know if there's anything else I can help with.",
        ));
    }

    /// 送信アクションをチケットフィールドへ振り向ける
    async fn capture_ticket_field(&self, text: &str) {
        enum Advance {
            Reprompt(TicketStep),
            Next(TicketStep),
            Summary(TicketDraft),
            Ignore,
        }

        let advance = {
            let mut state = self.state.lock();
            let Some(draft) = state.session.ticket.as_mut() else {
                return;
            };
            if text.is_empty() {
                // 空入力は段階を進めず再プロンプト
                if draft.step == TicketStep::Summary {
                    Advance::Ignore
                } else {
                    Advance::Reprompt(draft.step)
                }
            } else {
                match draft.step {
                    TicketStep::Subject => {
                        draft.subject = text.to_string();
                        draft.step = TicketStep::Description;
                        Advance::Next(TicketStep::Description)
                    }
                    TicketStep::Description => {
                        draft.description = text.to_string();
                        draft.step = TicketStep::Contact;
                        Advance::Next(TicketStep::Contact)
                    }
                    TicketStep::Contact => {
                        draft.contact = text.to_string();
                        draft.step = TicketStep::Summary;
                        Advance::Summary(draft.clone())
                    }
                    // 確認カードの操作はボタンのみ
                    TicketStep::Summary => Advance::Ignore,
                }
            }
        };

        match advance {
            Advance::Reprompt(step) => {
                self.push_bubble(ChatBubble::bot(step.prompt()));
            }
            Advance::Next(step) => {
                self.push_bubble(ChatBubble::user(text));
                self.emit(WidgetChange::TicketFlowChanged(Some(step)));
                self.push_bubble(ChatBubble::bot(step.prompt()));
            }
            Advance::Summary(draft) => {
                self.push_bubble(ChatBubble::user(text));
                self.emit(WidgetChange::TicketFlowChanged(Some(TicketStep::Summary)));
                self.push_bubble(ChatBubble::ticket_summary(
                    draft.subject,
                    draft.description,
                    draft.contact,
                    draft.priority,
                ));
            }
            Advance::Ignore => {}
        }
    }

    /// 確認カードからの送信。失敗時は下書きを保持してリトライ可能。
    pub async fn submit_ticket(&self) {
        let draft = {
            let state = self.state.lock();
            match &state.session.ticket {
                Some(draft) if draft.step == TicketStep::Summary => draft.clone(),
                _ => return,
            }
        };
        let conversation_id = self.conversation_id();

        let result = self
            .backend
            .create_ticket(
                &draft.subject,
                &draft.full_description(),
                draft.priority,
                &draft.contact,
                conversation_id.as_ref(),
            )
            .await;

        match result {
            Ok(response) => {
                self.state.lock().session.ticket = None;
                self.emit(WidgetChange::TicketFlowChanged(None));
                self.push_bubble(ChatBubble::bot(format!(
                    "Your ticket #{} has been created. Our support team will follow up soon.",
                    response.ticket_id
                )));
            }
            Err(err) => {
                error!("ticket submission failed: {}", err);
                self.push_bubble(ChatBubble::error(
                    "Sorry, we couldn't submit your ticket. Please try again.",
                ));
            }
        }
    }

    /// フローを中断し下書きを破棄
    pub fn cancel_ticket_flow(&self) {
        let had_draft = self.state.lock().session.ticket.take().is_some();
        if had_draft {
            self.emit(WidgetChange::TicketFlowChanged(None));
            self.push_bubble(ChatBubble::bot(
                "No problem - I've cancelled the ticket. How else can I help?",
            ));
        }
    }

    // --- リード獲得フロー ---------------------------------------------

    /// インテント判定の手動トリガー（直近のユーザー発言を使用）
    pub async fn check_for_lead_intent(&self) {
        let question = {
            let state = self.state.lock();
            state
                .bubbles
                .iter()
                .rev()
                .find(|b| b.role == crate::gui::models::BubbleRole::User)
                .and_then(|b| b.transcript_text().map(str::to_string))
                .unwrap_or_default()
        };
        self.maybe_check_lead_intent(&question, Instant::now()).await;
    }

    async fn maybe_check_lead_intent(&self, question: &str, now: Instant) {
        let conversation_id = {
            let mut state = self.state.lock();
            if !heuristics::should_check_lead_intent(
                &self.config,
                &state.session.lead,
                state.session.user_message_count,
                now,
            ) {
                return;
            }
            state.session.lead.last_check_at = Some(now);
            if state.session.lead.product_interest.is_none() {
                if let Some(interest) = phrases::find_product_interest(question) {
                    state.session.lead.product_interest = Some(interest.to_string());
                }
            }
            match state.session.conversation_id.clone() {
                Some(id) => id,
                // 会話IDが無いうちはバックエンド側に文脈が無い
                None => return,
            }
        };

        match self.backend.detect_lead_intent(&conversation_id).await {
            Ok(response) => {
                let meets_threshold = match response.confidence {
                    Some(score) => score >= self.config.lead_threshold,
                    None => response.threshold_met,
                };
                if meets_threshold {
                    self.suggest_lead_form();
                }
            }
            Err(err) => {
                warn!("lead intent check failed: {}", err);
            }
        }
    }

    /// リード提案バブルを表示する。提案済み・送信済みセッションでは何もしない。
    pub fn suggest_lead_form(&self) {
        let allowed = {
            let mut state = self.state.lock();
            if !self.config.enable_leads
                || state.session.lead.suggested
                || state.session.lead.submitted
            {
                false
            } else {
                state.session.lead.suggested = true;
                true
            }
        };
        if allowed {
            self.push_bubble(ChatBubble::lead_offer());
        }
    }

    /// 提案を受けてフォームを開く
    pub fn accept_lead_offer(&self) {
        let (submitted, product_interest) = {
            let state = self.state.lock();
            (
                state.session.lead.submitted,
                state.session.lead.product_interest.clone(),
            )
        };
        if !self.config.enable_leads || submitted {
            return;
        }
        self.emit(WidgetChange::LeadFormOpened { product_interest });
    }

    /// 提案を辞退。以後このセッションでは提案しない。
    pub fn decline_lead_offer(&self) {
        self.state.lock().session.lead.suggested = true;
        self.push_bubble(ChatBubble::bot(
            "No problem! Let me know if you have any other questions.",
        ));
    }

    /// リードフォームの送信
    ///
    /// バリデーションエラーはネットワークに出る前に返し、UIには
    /// 自動的に消えるインラインメッセージとして通知する。
    pub async fn submit_lead_form(
        &self,
        name: &str,
        email: &str,
        phone: &str,
        message: &str,
    ) -> Result<(), LeadFormError> {
        if self.state.lock().session.lead.submitted {
            // 送信済みセッションでは恒久的にno-op
            return Ok(());
        }

        if let Err(validation) = validate_lead_form(name, email) {
            self.emit(WidgetChange::LeadFormError(validation));
            let changes = self.changes.clone();
            tokio::spawn(async move {
                tokio::time::sleep(VALIDATION_MESSAGE_TTL).await;
                let _ = changes.send(WidgetChange::LeadFormErrorCleared);
            });
            return Err(validation);
        }

        let submission = {
            let state = self.state.lock();
            LeadSubmission {
                name: name.trim().to_string(),
                email: email.trim().to_string(),
                phone: non_empty(phone),
                message: non_empty(message),
                product_interest: state.session.lead.product_interest.clone(),
            }
        };

        match self.backend.submit_lead(&submission).await {
            Ok(()) => {
                {
                    let mut state = self.state.lock();
                    state.session.lead.submitted = true;
                    state.session.lead.suggested = true;
                }
                self.emit(WidgetChange::LeadFormClosed);
                let first_name = submission
                    .name
                    .split_whitespace()
                    .next()
                    .unwrap_or("there")
                    .to_string();
                let thanks = match &submission.product_interest {
                    Some(interest) => format!(
                        "Thanks {}! We'll reach out shortly with more about {}.",
                        first_name, interest
                    ),
                    None => format!("Thanks {}! We'll be in touch soon.", first_name),
                };
                self.push_bubble(ChatBubble::bot(thanks));
                Ok(())
            }
            Err(err) => {
                error!("lead submission failed: {}", err);
                self.push_bubble(ChatBubble::error(
                    "Sorry, we couldn't save your details. Please try again.",
                ));
                Ok(())
            }
        }
    }

    // --- センチメント / フィードバック --------------------------------

    /// センチメント操作が現在有効か
    pub fn sentiment_available(&self) -> bool {
        match self.state.lock().session.sentiment_cooldown_until {
            Some(until) => Instant::now() >= until,
            None => true,
        }
    }

    /// 👍/👎 の送信。成功後は一定時間操作を無効化する。
    pub async fn submit_sentiment(&self, sentiment: Sentiment) {
        if !self.sentiment_available() {
            return;
        }
        self.emit(WidgetChange::SentimentLocked(true));

        let conversation_id = self.conversation_id();
        match self
            .backend
            .submit_sentiment(sentiment, conversation_id.as_ref())
            .await
        {
            Ok(()) => {
                self.state.lock().session.sentiment_cooldown_until =
                    Some(Instant::now() + RATING_COOLDOWN);
                let changes = self.changes.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(RATING_COOLDOWN).await;
                    let _ = changes.send(WidgetChange::SentimentLocked(false));
                });
            }
            Err(err) => {
                // エラー時は即座に再有効化するだけでリトライはしない
                error!("sentiment submission failed: {}", err);
                self.emit(WidgetChange::SentimentLocked(false));
            }
        }
    }

    /// 自由記述フィードバックの送信
    pub async fn submit_feedback(&self, feedback: &str) {
        let feedback = feedback.trim();
        if feedback.is_empty() {
            return;
        }
        {
            let state = self.state.lock();
            if let Some(until) = state.session.feedback_cooldown_until {
                if Instant::now() < until {
                    return;
                }
            }
        }
        self.emit(WidgetChange::FeedbackLocked(true));

        let conversation_id = self.conversation_id();
        match self
            .backend
            .submit_feedback(feedback, conversation_id.as_ref())
            .await
        {
            Ok(()) => {
                self.state.lock().session.feedback_cooldown_until =
                    Some(Instant::now() + RATING_COOLDOWN);
                self.push_bubble(ChatBubble::bot("Thank you for your feedback!"));
                let changes = self.changes.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(RATING_COOLDOWN).await;
                    let _ = changes.send(WidgetChange::FeedbackLocked(false));
                });
            }
            Err(err) => {
                error!("feedback submission failed: {}", err);
                self.push_bubble(ChatBubble::error(
                    "Sorry, we couldn't send your feedback. Please try again.",
                ));
                self.emit(WidgetChange::FeedbackLocked(false));
            }
        }
    }
}

/// 回答テキストをエスケープ済みマークアップへ整形する
///
/// `Markup` バブルはそのままDOMに挿入されるため、エスケープは
/// ここで済ませておく。改行のみ `<br>` として残す。
fn format_answer_markup(answer: &str) -> String {
    crate::gui::utils::escape_html(answer).replace('\n', "<br>")
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// 直近の会話バブルからタイムスタンプ付きトランスクリプトを組み立てる
///
/// ボタンのみの操作バブルは含めない。バックエンドへ送る説明文に
/// 付加されるプレーンテキストであり、マークアップではない。
fn build_transcript(bubbles: &[ChatBubble]) -> String {
    let lines: Vec<String> = bubbles
        .iter()
        .filter_map(|bubble| {
            bubble.transcript_text().map(|text| {
                format!(
                    "[{}] {}: {}",
                    bubble.timestamp,
                    bubble.role.speaker_label(),
                    text
                )
            })
        })
        .collect();

    lines
        .iter()
        .rev()
        .take(TRANSCRIPT_BUBBLE_LIMIT)
        .rev()
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}
