use dioxus::prelude::*;

use crate::gui::hooks::WidgetHandle;
use crate::gui::styles::theme::CssClasses;

/// リード獲得フォーム
///
/// 名前とメールはローカル検証され、失敗時はネットワークに出ずに
/// インラインエラーが表示される（3秒で自動的に消える）。
#[component]
pub fn LeadForm(handle: WidgetHandle) -> Element {
    let mut name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut phone = use_signal(String::new);
    let mut message = use_signal({
        let prefill = handle.lead_prefill.read().clone();
        move || match &prefill {
            Some(interest) => format!("I'm interested in {}.", interest),
            None => String::new(),
        }
    });

    let error = *handle.lead_form_error.read();
    let field_class = |field: &str| -> &'static str {
        match error {
            Some(err) if err.field() == field => CssClasses::FORM_INPUT_ERROR,
            _ => CssClasses::FORM_INPUT,
        }
    };

    rsx! {
        div {
            class: CssClasses::FORM,

            div {
                class: CssClasses::FORM_GROUP,
                label { class: CssClasses::FORM_LABEL, "Name *" }
                input {
                    class: field_class("name"),
                    r#type: "text",
                    value: "{name}",
                    oninput: move |event| name.set(event.value()),
                }
            }

            div {
                class: CssClasses::FORM_GROUP,
                label { class: CssClasses::FORM_LABEL, "Email *" }
                input {
                    class: field_class("email"),
                    r#type: "email",
                    value: "{email}",
                    oninput: move |event| email.set(event.value()),
                }
            }

            div {
                class: CssClasses::FORM_GROUP,
                label { class: CssClasses::FORM_LABEL, "Phone" }
                input {
                    class: CssClasses::FORM_INPUT,
                    r#type: "tel",
                    value: "{phone}",
                    oninput: move |event| phone.set(event.value()),
                }
            }

            div {
                class: CssClasses::FORM_GROUP,
                label { class: CssClasses::FORM_LABEL, "Message" }
                input {
                    class: CssClasses::FORM_INPUT,
                    r#type: "text",
                    value: "{message}",
                    oninput: move |event| message.set(event.value()),
                }
            }

            // 自動的に消えるバリデーションメッセージ
            if let Some(err) = error {
                div {
                    class: CssClasses::VALIDATION_MESSAGE,
                    "{err.message()}"
                }
            }

            div {
                class: CssClasses::SUGGESTION_ACTIONS,

                button {
                    class: CssClasses::BTN_PRIMARY,
                    onclick: {
                        let handle = handle.clone();
                        move |_| {
                            handle.submit_lead_form(
                                name.read().clone(),
                                email.read().clone(),
                                phone.read().clone(),
                                message.read().clone(),
                            );
                        }
                    },
                    "Send"
                }

                button {
                    class: CssClasses::BTN_SECONDARY,
                    onclick: {
                        let handle = handle.clone();
                        move |_| handle.close_lead_form()
                    },
                    "Back to chat"
                }
            }
        }
    }
}
