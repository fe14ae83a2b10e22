pub mod client; // バックエンド6操作のHTTPクライアント
pub mod endpoints; // エンドポイントURL導出

pub use client::{
    ApiError, AskResponse, HttpBackend, LeadIntentResponse, LeadSubmission, Sentiment,
    SupportBackend, TicketResponse,
};
pub use endpoints::{ChatbotId, ConversationId, EndpointSet};
