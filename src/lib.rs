pub mod api;
pub mod controller;
pub mod embed;
pub mod gui;
pub mod heuristics;
pub mod session;

// Re-export the main types for convenience
pub use api::{ApiError, ChatbotId, ConversationId, HttpBackend, Sentiment, SupportBackend};
pub use controller::{ConversationController, WidgetChange};
pub use embed::{EmbedAttributes, WidgetConfig};
pub use gui::models::{BubbleBody, BubbleRole, ChatBubble};
pub use session::{SessionState, TicketDraft, TicketStep};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_structure() {
        // Test that the main modules are accessible
        assert!(std::any::type_name::<api::EndpointSet>().contains("EndpointSet"));
        assert!(
            std::any::type_name::<controller::ConversationController>()
                .contains("ConversationController")
        );
    }

    #[test]
    fn test_public_api_availability() {
        // Key types are re-exported from the crate root
        let _: Option<ChatBubble> = None;
        let _: Option<WidgetConfig> = None;
        let _: Option<SessionState> = None;
        let _: Option<WidgetChange> = None;
    }

    #[test]
    fn test_error_types_re_exported() {
        let error = ApiError::Status {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        };
        assert!(format!("{}", error).contains("500"));
    }
}
