use std::sync::atomic::{AtomicBool, Ordering};

use dioxus::prelude::*;

use crate::embed::WidgetConfig;
use crate::gui::components::{FeedbackModal, InputBar, LeadForm, MessageList};
use crate::gui::hooks::{use_support_widget, WidgetHandle};
use crate::gui::styles::theme::{get_embedded_css, theme_custom_properties, CssClasses};

/// 多重マウントガード
///
/// 埋め込みスクリプトが二重に読み込まれてもトグルボタンを
/// 複製しないための、プロセス全体で唯一の静的状態。
static WIDGET_MOUNTED: AtomicBool = AtomicBool::new(false);

/// ウィジェットルートコンポーネント
///
/// トグルボタンとチャットパネルを構築し、テーマをCSSカスタム
/// プロパティとしてルート要素へ適用する。
#[component]
pub fn SupportWidget(config: WidgetConfig) -> Element {
    let already_mounted = use_hook(|| WIDGET_MOUNTED.swap(true, Ordering::SeqCst));
    if already_mounted {
        tracing::warn!("chatlet widget is already mounted - skipping duplicate mount");
        return rsx! {};
    }

    if config.degraded {
        tracing::warn!("chatlet widget mounted in degraded state (missing required attributes)");
    }

    let handle = use_support_widget(config.clone());
    let theme_style = theme_custom_properties(&config);
    let position_class = config.position.as_css_class();

    rsx! {
        // ウィジェットのスタイルシートをdocument headに注入
        document::Style {
            {get_embedded_css()}
        }

        // バックエンド側の同梱スタイルシート（アセット依存、中身は解釈しない）
        if !config.degraded {
            document::Link {
                rel: "stylesheet",
                href: "{config.stylesheet_url}",
            }
        }

        div {
            class: "{CssClasses::WIDGET} {position_class}",
            style: "{theme_style}",

            if *handle.panel_open.read() {
                ChatPanel { handle: handle.clone() }
            }

            ToggleButton { handle: handle.clone() }
        }
    }
}

/// チャット起動ボタン（未読バッジ付き）
#[component]
fn ToggleButton(handle: WidgetHandle) -> Element {
    let open = *handle.panel_open.read();
    let unread = *handle.unread_count.read();

    rsx! {
        button {
            class: CssClasses::TOGGLE,
            aria_label: "Open support chat",
            onclick: {
                let handle = handle.clone();
                move |_| handle.toggle_panel()
            },

            if open { "✕" } else { "💬" }

            // パネルを開くとバッジは消える
            if !open && unread > 0 {
                span {
                    class: CssClasses::BADGE,
                    "{unread}"
                }
            }
        }
    }
}

/// チャットパネル本体
#[component]
fn ChatPanel(handle: WidgetHandle) -> Element {
    let config = handle.config().clone();
    let feedback_open = use_signal(|| false);
    let lead_form_open = *handle.lead_form_open.read();

    rsx! {
        div {
            class: CssClasses::PANEL_OPEN,

            // ヘッダー
            div {
                class: CssClasses::HEADER,

                if config.enable_avatar && !config.avatar_url.is_empty() {
                    img {
                        class: CssClasses::AVATAR,
                        src: "{config.avatar_url}",
                        alt: "",
                    }
                }

                span {
                    class: CssClasses::AGENT_NAME,
                    "{config.agent_name}"
                }

                button {
                    class: CssClasses::CLOSE_BTN,
                    aria_label: "Leave feedback",
                    disabled: *handle.feedback_locked.read(),
                    onclick: {
                        let mut feedback_open = feedback_open;
                        move |_| feedback_open.set(true)
                    },
                    "✍"
                }

                button {
                    class: CssClasses::CLOSE_BTN,
                    aria_label: "Close chat",
                    onclick: {
                        let handle = handle.clone();
                        move |_| handle.toggle_panel()
                    },
                    "✕"
                }
            }

            MessageList { handle: handle.clone() }

            if config.enable_sentiment {
                SentimentBar { handle: handle.clone() }
            }

            if lead_form_open {
                LeadForm { handle: handle.clone() }
            } else {
                InputBar { handle: handle.clone() }
            }

            if feedback_open() {
                FeedbackModal { handle: handle.clone(), open: feedback_open }
            }
        }
    }
}

/// 👍/👎 バー。送信成功後はクールダウンの間操作を無効化する。
#[component]
fn SentimentBar(handle: WidgetHandle) -> Element {
    let locked = *handle.sentiment_locked.read();

    rsx! {
        div {
            class: CssClasses::SENTIMENT_BAR,

            span { "Was this helpful?" }

            button {
                class: CssClasses::BTN_SECONDARY,
                disabled: locked,
                onclick: {
                    let handle = handle.clone();
                    move |_| handle.submit_sentiment(crate::api::Sentiment::Positive)
                },
                "👍"
            }

            button {
                class: CssClasses::BTN_SECONDARY,
                disabled: locked,
                onclick: {
                    let handle = handle.clone();
                    move |_| handle.submit_sentiment(crate::api::Sentiment::Negative)
                },
                "👎"
            }
        }
    }
}
