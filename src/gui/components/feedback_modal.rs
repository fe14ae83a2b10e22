use dioxus::prelude::*;

use crate::gui::hooks::WidgetHandle;
use crate::gui::styles::theme::CssClasses;

/// 自由記述フィードバックのモーダル
#[component]
pub fn FeedbackModal(handle: WidgetHandle, open: Signal<bool>) -> Element {
    let mut text = use_signal(String::new);
    let locked = *handle.feedback_locked.read();

    rsx! {
        div {
            class: CssClasses::FEEDBACK_MODAL,

            div {
                class: "inner",

                span { "How are we doing?" }

                textarea {
                    class: CssClasses::FORM_INPUT,
                    rows: 4,
                    placeholder: "Tell us what you think...",
                    value: "{text}",
                    oninput: move |event| text.set(event.value()),
                }

                div {
                    class: CssClasses::SUGGESTION_ACTIONS,

                    button {
                        class: CssClasses::BTN_PRIMARY,
                        disabled: locked || text.read().trim().is_empty(),
                        onclick: {
                            let handle = handle.clone();
                            let mut open = open;
                            move |_| {
                                handle.submit_feedback(text.read().clone());
                                open.set(false);
                            }
                        },
                        "Send feedback"
                    }

                    button {
                        class: CssClasses::BTN_SECONDARY,
                        onclick: {
                            let mut open = open;
                            move |_| open.set(false)
                        },
                        "Cancel"
                    }
                }
            }
        }
    }
}
