use dioxus::prelude::*;

use crate::gui::hooks::WidgetHandle;
use crate::gui::styles::theme::CssClasses;
use crate::session::TicketStep;

/// 入力バー
///
/// リクエスト進行中は入力欄と送信ボタンを無効化する
/// （完了時の再有効化はコントローラーからの通知で行われる）。
#[component]
pub fn InputBar(handle: WidgetHandle) -> Element {
    let mut draft = use_signal(String::new);
    let sending = *handle.sending.read();
    let ticket_step = *handle.ticket_step.read();

    let placeholder = match ticket_step {
        Some(TicketStep::Subject) => "Ticket subject...",
        Some(TicketStep::Description) => "Describe the problem...",
        Some(TicketStep::Contact) => "Your email or account name...",
        Some(TicketStep::Summary) => "Review the ticket above",
        None => "Type your message...",
    };

    let send = {
        let handle = handle.clone();
        move || {
            let text = draft.read().clone();
            draft.set(String::new());
            handle.send_message(text);
        }
    };

    rsx! {
        div {
            class: CssClasses::INPUT_BAR,

            input {
                class: CssClasses::INPUT,
                r#type: "text",
                placeholder: "{placeholder}",
                value: "{draft}",
                disabled: sending,
                // パネルを開いたときにフォーカスを入力欄へ移す
                autofocus: true,
                oninput: move |event| draft.set(event.value()),
                onkeydown: {
                    let mut send = send.clone();
                    move |event: Event<KeyboardData>| {
                        if event.key() == Key::Enter {
                            send();
                        }
                    }
                },
            }

            button {
                class: CssClasses::SEND_BTN,
                disabled: sending,
                onclick: {
                    let mut send = send.clone();
                    move |_| send()
                },
                "Send"
            }
        }
    }
}
