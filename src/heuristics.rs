//! 提案ヒューリスティクス
//!
//! チケット提案・リード提案の判定ルール。各ルールは
//! (質問, 回答, セッションタイマー, トラッカー) に対する純述語として
//! 実装し、固定の優先順で評価する。DOMから独立してテスト可能。

pub mod lead;
pub mod phrases;
pub mod ticket;

pub use lead::{is_valid_email, should_check_lead_intent, LEAD_CHECK_INTERVAL};
pub use ticket::{evaluate_turn, TicketCue};
