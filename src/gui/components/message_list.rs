use dioxus::prelude::*;

use crate::gui::hooks::WidgetHandle;
use crate::gui::models::{BubbleBody, ChatBubble};
use crate::gui::styles::theme::{get_bubble_class, CssClasses};

/// メッセージリスト
///
/// ユーザー本文はテキストノードとして描画され、マークアップとして
/// 解釈されることはない。`Markup` はコントローラーがエスケープ済みで
/// あることを保証する。入力中インジケーターは単一のフラグ駆動で、
/// 同時に2つ以上存在しない。
#[component]
pub fn MessageList(handle: WidgetHandle) -> Element {
    let bubbles = handle.bubbles.read().clone();
    let typing = *handle.typing.read();

    rsx! {
        div {
            class: CssClasses::MESSAGE_LIST,

            for bubble in bubbles {
                Bubble { key: "{bubble.id}", handle: handle.clone(), bubble: bubble.clone() }
            }

            if typing {
                div {
                    class: CssClasses::TYPING,
                    "typing"
                }
            }
        }
    }
}

#[component]
fn Bubble(handle: WidgetHandle, bubble: ChatBubble) -> Element {
    let bubble_class = get_bubble_class(&bubble.role);

    match bubble.body {
        BubbleBody::Text(ref text) => rsx! {
            div {
                class: "{bubble_class}",
                "{text}"
            }
        },
        BubbleBody::Markup(ref markup) => rsx! {
            div {
                class: "{bubble_class}",
                dangerous_inner_html: "{markup}",
            }
        },
        BubbleBody::TicketOffer => rsx! {
            div {
                class: CssClasses::SUGGESTION,

                "It looks like you might need more help. Would you like to create a support ticket?"

                div {
                    class: CssClasses::SUGGESTION_ACTIONS,

                    button {
                        class: CssClasses::BTN_PRIMARY,
                        onclick: {
                            let handle = handle.clone();
                            move |_| handle.start_ticket_flow()
                        },
                        "Create a ticket"
                    }

                    button {
                        class: CssClasses::BTN_SECONDARY,
                        onclick: {
                            let handle = handle.clone();
                            move |_| handle.decline_ticket_offer()
                        },
                        "No thanks"
                    }
                }
            }
        },
        BubbleBody::LeadOffer => rsx! {
            div {
                class: CssClasses::SUGGESTION,

                "Would you like our team to reach out with more details?"

                div {
                    class: CssClasses::SUGGESTION_ACTIONS,

                    button {
                        class: CssClasses::BTN_PRIMARY,
                        onclick: {
                            let handle = handle.clone();
                            move |_| handle.accept_lead_offer()
                        },
                        "Yes, contact me"
                    }

                    button {
                        class: CssClasses::BTN_SECONDARY,
                        onclick: {
                            let handle = handle.clone();
                            move |_| handle.decline_lead_offer()
                        },
                        "No thanks"
                    }
                }
            }
        },
        BubbleBody::TicketSummary {
            ref subject,
            ref description,
            ref contact,
            ref priority,
        } => rsx! {
            div {
                class: CssClasses::TICKET_SUMMARY,

                // 見た目は編集できそうだが確定値。編集はキャンセルしてやり直す
                dl {
                    dt { "Subject" }
                    dd { "{subject}" }
                    dt { "Description" }
                    dd { "{description}" }
                    dt { "Contact" }
                    dd { "{contact}" }
                    dt { "Priority" }
                    dd { "{priority}" }
                }

                div {
                    class: CssClasses::SUGGESTION_ACTIONS,

                    button {
                        class: CssClasses::BTN_PRIMARY,
                        onclick: {
                            let handle = handle.clone();
                            move |_| handle.submit_ticket()
                        },
                        "Submit ticket"
                    }

                    button {
                        class: CssClasses::BTN_SECONDARY,
                        onclick: {
                            let handle = handle.clone();
                            move |_| handle.cancel_ticket_flow()
                        },
                        "Cancel"
                    }
                }
            }
        },
    }
}
