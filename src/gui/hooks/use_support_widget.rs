//! サポートウィジェット用カスタムフック
//!
//! コントローラーのブロードキャストをDioxusシグナルへ同期し、
//! コンポーネントからはアクションメソッド越しに操作させる。

use std::sync::Arc;

use dioxus::prelude::*;

use crate::api::Sentiment;
use crate::controller::{ConversationController, WidgetChange};
use crate::embed::WidgetConfig;
use crate::gui::models::ChatBubble;
use crate::heuristics::lead::LeadFormError;
use crate::session::TicketStep;

/// ウィジェットハンドル
///
/// シグナル一式とコントローラー参照を束ね、UIイベントハンドラーから
/// cloneして使う。ハンドラーは一度だけ取り付け、毎回ここから現在の
/// 状態を読む（リスナー張り替えは行わない）。
#[derive(Clone)]
pub struct WidgetHandle {
    controller: Arc<ConversationController>,
    pub bubbles: Signal<Vec<ChatBubble>>,
    pub panel_open: Signal<bool>,
    pub typing: Signal<bool>,
    pub sending: Signal<bool>,
    pub ticket_step: Signal<Option<TicketStep>>,
    pub lead_form_open: Signal<bool>,
    pub lead_prefill: Signal<Option<String>>,
    pub lead_form_error: Signal<Option<LeadFormError>>,
    pub sentiment_locked: Signal<bool>,
    pub feedback_locked: Signal<bool>,
    /// パネルが閉じている間に届いたメッセージ数（バッジ表示用）
    pub unread_count: Signal<u32>,
}

impl PartialEq for WidgetHandle {
    fn eq(&self, _other: &Self) -> bool {
        // Signalの比較は困難なので、常にfalseとして扱う
        false
    }
}

impl WidgetHandle {
    pub fn config(&self) -> &WidgetConfig {
        self.controller.config()
    }

    /// パネルの開閉
    pub fn toggle_panel(&self) {
        self.controller.toggle_panel();
    }

    /// メッセージ送信（チケット入力中はフィールド取り込みに回る）
    pub fn send_message(&self, text: String) {
        let controller = self.controller.clone();
        spawn(async move {
            controller.send_message(&text).await;
        });
    }

    pub fn start_ticket_flow(&self) {
        self.controller.start_ticket_flow();
    }

    pub fn decline_ticket_offer(&self) {
        self.controller.decline_ticket_offer();
    }

    pub fn submit_ticket(&self) {
        let controller = self.controller.clone();
        spawn(async move {
            controller.submit_ticket().await;
        });
    }

    pub fn cancel_ticket_flow(&self) {
        self.controller.cancel_ticket_flow();
    }

    pub fn accept_lead_offer(&self) {
        self.controller.accept_lead_offer();
        let mut lead_form_open = self.lead_form_open;
        lead_form_open.set(true);
    }

    pub fn decline_lead_offer(&self) {
        self.controller.decline_lead_offer();
    }

    pub fn close_lead_form(&self) {
        let mut lead_form_open = self.lead_form_open;
        lead_form_open.set(false);
    }

    pub fn submit_lead_form(&self, name: String, email: String, phone: String, message: String) {
        let controller = self.controller.clone();
        spawn(async move {
            let _ = controller
                .submit_lead_form(&name, &email, &phone, &message)
                .await;
        });
    }

    pub fn submit_sentiment(&self, sentiment: Sentiment) {
        let controller = self.controller.clone();
        spawn(async move {
            controller.submit_sentiment(sentiment).await;
        });
    }

    pub fn submit_feedback(&self, feedback: String) {
        let controller = self.controller.clone();
        spawn(async move {
            controller.submit_feedback(&feedback).await;
        });
    }
}

/// サポートウィジェット用カスタムフック
///
/// コントローラーを1つ構築し、変更ブロードキャストをシグナルへ
/// イベント駆動で反映する。
pub fn use_support_widget(config: WidgetConfig) -> WidgetHandle {
    let controller = use_hook({
        let config = config.clone();
        move || Arc::new(ConversationController::connect(config))
    });

    let bubbles = use_signal({
        let controller = controller.clone();
        move || controller.bubbles()
    });
    let panel_open = use_signal(|| false);
    let typing = use_signal(|| false);
    let sending = use_signal(|| false);
    let ticket_step = use_signal(|| None::<TicketStep>);
    let lead_form_open = use_signal(|| false);
    let lead_prefill = use_signal(|| None::<String>);
    let lead_form_error = use_signal(|| None::<LeadFormError>);
    let sentiment_locked = use_signal(|| false);
    let feedback_locked = use_signal(|| false);
    let unread_count = use_signal(|| 0u32);

    // イベント駆動同期: コントローラー → UIシグナル
    use_effect({
        let controller = controller.clone();
        move || {
            let controller = controller.clone();
            let mut bubbles = bubbles;
            let mut panel_open_sig = panel_open;
            let mut typing = typing;
            let mut sending = sending;
            let mut ticket_step = ticket_step;
            let mut lead_form_open = lead_form_open;
            let mut lead_prefill = lead_prefill;
            let mut lead_form_error = lead_form_error;
            let mut sentiment_locked = sentiment_locked;
            let mut feedback_locked = feedback_locked;
            let mut unread_count = unread_count;

            spawn(async move {
                let mut rx = controller.subscribe();
                loop {
                    match rx.recv().await {
                        Ok(change) => match change {
                            WidgetChange::BubbleAdded(bubble) => {
                                bubbles.write().push(bubble);
                                if !panel_open_sig() {
                                    let count = unread_count();
                                    unread_count.set(count + 1);
                                }
                            }
                            WidgetChange::TypingChanged(visible) => typing.set(visible),
                            WidgetChange::SendingChanged(active) => sending.set(active),
                            WidgetChange::PanelOpenChanged(open) => {
                                panel_open_sig.set(open);
                                if open {
                                    // パネルを開いたら通知バッジを消す
                                    unread_count.set(0);
                                }
                            }
                            WidgetChange::TicketFlowChanged(step) => ticket_step.set(step),
                            WidgetChange::LeadFormOpened { product_interest } => {
                                lead_prefill.set(product_interest);
                                lead_form_open.set(true);
                            }
                            WidgetChange::LeadFormClosed => lead_form_open.set(false),
                            WidgetChange::LeadFormError(error) => {
                                lead_form_error.set(Some(error))
                            }
                            WidgetChange::LeadFormErrorCleared => lead_form_error.set(None),
                            WidgetChange::SentimentLocked(locked) => {
                                sentiment_locked.set(locked)
                            }
                            WidgetChange::FeedbackLocked(locked) => feedback_locked.set(locked),
                        },
                        Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                            // 遅延でイベントを取りこぼした場合は全量を再同期
                            tracing::warn!("widget sync lagged, skipped {} events", skipped);
                            bubbles.set(controller.bubbles());
                            panel_open_sig.set(controller.is_panel_open());
                            sending.set(controller.is_sending());
                            ticket_step.set(controller.ticket_step());
                        }
                        Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                            tracing::error!("widget change broadcaster closed");
                            break;
                        }
                    }
                }
            });
        }
    });

    WidgetHandle {
        controller,
        bubbles,
        panel_open,
        typing,
        sending,
        ticket_step,
        lead_form_open,
        lead_prefill,
        lead_form_error,
        sentiment_locked,
        feedback_locked,
        unread_count,
    }
}
