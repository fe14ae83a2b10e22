//! Support backend HTTP client.
//!
//! One function per backend operation; each issues a single request and
//! returns the parsed body on success. Failure classification (e.g. "no
//! answer found" vs. "server down") is left to the conversation
//! controller — this layer only distinguishes transport, status and
//! parse failures, and never retries.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::endpoints::{ChatbotId, ConversationId, EndpointSet};

/// Header carrying the session's anonymous user identifier.
pub const USER_ID_HEADER: &str = "User-ID";

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("request failed")]
    Transport(#[from] reqwest::Error),
    #[error("server returned status {status}")]
    Status { status: reqwest::StatusCode },
    #[error("failed to parse response body")]
    Parse(#[from] serde_json::Error),
}

/// Thumbs up / thumbs down rating for a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Positive,
    Negative,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
        }
    }
}

/// Fields captured by the lead form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadSubmission {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub product_interest: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AskResponse {
    pub answer: String,
    #[serde(default)]
    pub conversation_id: Option<ConversationId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TicketResponse {
    pub ticket_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeadIntentResponse {
    #[serde(default)]
    pub suggest_lead: bool,
    #[serde(default)]
    pub threshold_met: bool,
    /// Detection score in [0, 1]. One backend variant names this `score`.
    #[serde(default, alias = "score")]
    pub confidence: Option<f64>,
}

#[derive(Serialize)]
struct AskRequest<'a> {
    question: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    conversation_id: Option<&'a ConversationId>,
}

#[derive(Serialize)]
struct FeedbackRequest<'a> {
    feedback: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    conversation_id: Option<&'a ConversationId>,
}

#[derive(Serialize)]
struct SentimentRequest<'a> {
    sentiment: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    conversation_id: Option<&'a ConversationId>,
}

#[derive(Serialize)]
struct TicketRequest<'a> {
    subject: &'a str,
    description: &'a str,
    priority: &'a str,
    account_details: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    conversation_id: Option<&'a ConversationId>,
}

#[derive(Serialize)]
struct LeadSubmitRequest<'a> {
    name: &'a str,
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    chatbot_id: &'a ChatbotId,
    #[serde(skip_serializing_if = "Option::is_none")]
    product_interest: Option<&'a str>,
}

#[derive(Serialize)]
struct LeadDetectRequest<'a> {
    conversation_id: &'a ConversationId,
    chatbot_id: &'a ChatbotId,
}

/// Abstraction over the six backend operations.
///
/// The widget talks to the backend exclusively through this trait; tests
/// substitute a scripted implementation.
#[async_trait]
pub trait SupportBackend: Send + Sync {
    /// Ask a question, threading the conversation id when known.
    async fn ask(
        &self,
        question: &str,
        conversation_id: Option<&ConversationId>,
    ) -> Result<AskResponse, ApiError>;

    /// Submit free-text feedback.
    async fn submit_feedback(
        &self,
        feedback: &str,
        conversation_id: Option<&ConversationId>,
    ) -> Result<(), ApiError>;

    /// Submit a thumbs up/down rating.
    async fn submit_sentiment(
        &self,
        sentiment: Sentiment,
        conversation_id: Option<&ConversationId>,
    ) -> Result<(), ApiError>;

    /// Create a support ticket from the captured fields.
    async fn create_ticket(
        &self,
        subject: &str,
        description: &str,
        priority: &str,
        account_details: &str,
        conversation_id: Option<&ConversationId>,
    ) -> Result<TicketResponse, ApiError>;

    /// Submit a captured lead.
    async fn submit_lead(&self, lead: &LeadSubmission) -> Result<(), ApiError>;

    /// Ask the backend whether the conversation shows lead intent.
    async fn detect_lead_intent(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<LeadIntentResponse, ApiError>;
}

/// reqwest-backed implementation of [`SupportBackend`].
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    endpoints: EndpointSet,
    chatbot_id: ChatbotId,
    user_id: String,
}

impl HttpBackend {
    pub fn new(endpoints: EndpointSet, chatbot_id: ChatbotId, user_id: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoints,
            chatbot_id,
            user_id,
        }
    }

    /// POST a JSON body and return the raw response text.
    async fn post_json<B: Serialize>(&self, url: &str, body: &B) -> Result<String, ApiError> {
        let response = self
            .client
            .post(url)
            .header(USER_ID_HEADER, &self.user_id)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status { status });
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl SupportBackend for HttpBackend {
    async fn ask(
        &self,
        question: &str,
        conversation_id: Option<&ConversationId>,
    ) -> Result<AskResponse, ApiError> {
        let body = AskRequest {
            question,
            conversation_id,
        };
        let text = self.post_json(&self.endpoints.ask, &body).await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn submit_feedback(
        &self,
        feedback: &str,
        conversation_id: Option<&ConversationId>,
    ) -> Result<(), ApiError> {
        let body = FeedbackRequest {
            feedback,
            conversation_id,
        };
        self.post_json(&self.endpoints.feedback, &body).await?;
        Ok(())
    }

    async fn submit_sentiment(
        &self,
        sentiment: Sentiment,
        conversation_id: Option<&ConversationId>,
    ) -> Result<(), ApiError> {
        let body = SentimentRequest {
            sentiment: sentiment.as_str(),
            conversation_id,
        };
        self.post_json(&self.endpoints.sentiment, &body).await?;
        Ok(())
    }

    async fn create_ticket(
        &self,
        subject: &str,
        description: &str,
        priority: &str,
        account_details: &str,
        conversation_id: Option<&ConversationId>,
    ) -> Result<TicketResponse, ApiError> {
        let body = TicketRequest {
            subject,
            description,
            priority,
            account_details,
            conversation_id,
        };
        let text = self.post_json(&self.endpoints.ticket, &body).await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn submit_lead(&self, lead: &LeadSubmission) -> Result<(), ApiError> {
        let body = LeadSubmitRequest {
            name: &lead.name,
            email: &lead.email,
            phone: lead.phone.as_deref(),
            message: lead.message.as_deref(),
            chatbot_id: &self.chatbot_id,
            product_interest: lead.product_interest.as_deref(),
        };
        self.post_json(&self.endpoints.lead_submit, &body).await?;
        Ok(())
    }

    async fn detect_lead_intent(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<LeadIntentResponse, ApiError> {
        let body = LeadDetectRequest {
            conversation_id,
            chatbot_id: &self.chatbot_id,
        };
        let text = self.post_json(&self.endpoints.lead_detect, &body).await?;
        Ok(serde_json::from_str(&text)?)
    }
}
