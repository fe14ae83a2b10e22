use serde::{Deserialize, Serialize};

/// Chatbot identifier assigned by the admin backend.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatbotId(pub String);

/// Opaque conversation token assigned by the backend on the first answer.
///
/// Once set it threads every subsequent ask/feedback/sentiment/ticket call.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(pub String);

/// The fixed set of backend endpoint URLs, derived once from the embed
/// attributes and never recomputed.
///
/// Every URL is an exact string concatenation of the normalized base
/// (always ending in `/`) and a fixed suffix; one separator convention
/// is used for all endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointSet {
    pub ask: String,
    pub feedback: String,
    pub sentiment: String,
    pub ticket: String,
    pub lead_submit: String,
    pub lead_detect: String,
}

impl EndpointSet {
    /// Normalize an API base so it always ends with a path separator.
    pub fn normalize_base(base: &str) -> String {
        if base.is_empty() || base.ends_with('/') {
            base.to_string()
        } else {
            format!("{}/", base)
        }
    }

    /// Derive the six endpoint URLs from a base and chatbot identifier.
    pub fn derive(base: &str, chatbot_id: &ChatbotId) -> Self {
        let base = Self::normalize_base(base);
        Self {
            ask: format!("{}chatbot/{}/ask", base, chatbot_id),
            feedback: format!("{}chatbot/{}/feedback", base, chatbot_id),
            sentiment: format!("{}analytics/sentiment/{}", base, chatbot_id),
            ticket: format!("{}ticket/create/{}", base, chatbot_id),
            lead_submit: format!("{}api/leads/submit", base),
            lead_detect: format!("{}api/leads/detect-intent", base),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_appends_slash() {
        assert_eq!(
            EndpointSet::normalize_base("https://x.test"),
            "https://x.test/"
        );
        assert_eq!(
            EndpointSet::normalize_base("https://x.test/"),
            "https://x.test/"
        );
    }

    #[test]
    fn test_derive_exact_urls() {
        let endpoints = EndpointSet::derive("https://x.test", &ChatbotId("abc".to_string()));
        assert_eq!(endpoints.ask, "https://x.test/chatbot/abc/ask");
        assert_eq!(endpoints.feedback, "https://x.test/chatbot/abc/feedback");
        assert_eq!(endpoints.sentiment, "https://x.test/analytics/sentiment/abc");
        assert_eq!(endpoints.ticket, "https://x.test/ticket/create/abc");
        assert_eq!(endpoints.lead_submit, "https://x.test/api/leads/submit");
        assert_eq!(endpoints.lead_detect, "https://x.test/api/leads/detect-intent");
    }

    #[test]
    fn test_derive_with_trailing_slash_is_identical() {
        let id = ChatbotId("abc".to_string());
        assert_eq!(
            EndpointSet::derive("https://x.test", &id),
            EndpointSet::derive("https://x.test/", &id)
        );
    }

    #[test]
    fn test_no_double_separators() {
        let endpoints = EndpointSet::derive("https://x.test/", &ChatbotId("abc".to_string()));
        for url in [
            &endpoints.ask,
            &endpoints.feedback,
            &endpoints.sentiment,
            &endpoints.ticket,
            &endpoints.lead_submit,
            &endpoints.lead_detect,
        ] {
            assert!(!url["https://".len()..].contains("//"), "url: {}", url);
        }
    }

    #[test]
    fn test_conversation_id_serializes_transparently() {
        let id = ConversationId("conv_1".to_string());
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"conv_1\"");
    }
}
