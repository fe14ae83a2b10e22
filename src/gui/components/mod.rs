//! ウィジェットUIコンポーネント
//!
//! この層はDOM構築のみを担い、ビジネスロジックは持たない。
//! 判断はすべて [`crate::controller::ConversationController`] 側で行う。

mod feedback_modal;
mod input_bar;
mod lead_form;
mod message_list;
mod widget_root;

pub use feedback_modal::FeedbackModal;
pub use input_bar::InputBar;
pub use lead_form::LeadForm;
pub use message_list::MessageList;
pub use widget_root::SupportWidget;
