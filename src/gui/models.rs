use serde::{Deserialize, Serialize};

/// メッセージバブルの発言者ロール
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum BubbleRole {
    User,
    #[default]
    Bot,
    Error,
}

impl BubbleRole {
    /// トランスクリプト出力時の話者ラベル
    pub fn speaker_label(&self) -> &'static str {
        match self {
            BubbleRole::User => "You",
            BubbleRole::Bot => "Bot",
            BubbleRole::Error => "Bot",
        }
    }
}

/// バブル本文
///
/// `Text` は常にエスケープされたテキストとして描画される。`Markup` は
/// 呼び出し側がエスケープ済みであることを前提にそのまま挿入される
/// （ユーザー入力を `Markup` に入れてはならない）。残りはボタン付きの
/// 操作バブルで、トランスクリプトには含めない。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum BubbleBody {
    Text(String),
    Markup(String),
    /// チケット作成の提案（作成する / しない）
    TicketOffer,
    /// リードフォームの提案（連絡先を残す / 残さない）
    LeadOffer,
    /// チケット送信前の確認カード（送信 / キャンセル）
    TicketSummary {
        subject: String,
        description: String,
        contact: String,
        priority: String,
    },
}

/// チャットパネルに表示される1つのバブル
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatBubble {
    pub id: String,
    pub role: BubbleRole,
    pub body: BubbleBody,
    pub timestamp: String,
}

impl ChatBubble {
    fn new(role: BubbleRole, body: BubbleBody) -> Self {
        Self {
            id: crate::gui::utils::generate_bubble_id(),
            role,
            body,
            timestamp: crate::gui::utils::format_timestamp(),
        }
    }

    /// ユーザー発言（描画時に必ずエスケープされる）
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(BubbleRole::User, BubbleBody::Text(text.into()))
    }

    /// ボット発言（プレーンテキスト）
    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(BubbleRole::Bot, BubbleBody::Text(text.into()))
    }

    /// ボット発言（エスケープ済みマークアップ）
    pub fn bot_markup(markup: impl Into<String>) -> Self {
        Self::new(BubbleRole::Bot, BubbleBody::Markup(markup.into()))
    }

    /// エラー表示
    pub fn error(text: impl Into<String>) -> Self {
        Self::new(BubbleRole::Error, BubbleBody::Text(text.into()))
    }

    pub fn ticket_offer() -> Self {
        Self::new(BubbleRole::Bot, BubbleBody::TicketOffer)
    }

    pub fn lead_offer() -> Self {
        Self::new(BubbleRole::Bot, BubbleBody::LeadOffer)
    }

    pub fn ticket_summary(
        subject: impl Into<String>,
        description: impl Into<String>,
        contact: impl Into<String>,
        priority: impl Into<String>,
    ) -> Self {
        Self::new(
            BubbleRole::Bot,
            BubbleBody::TicketSummary {
                subject: subject.into(),
                description: description.into(),
                contact: contact.into(),
                priority: priority.into(),
            },
        )
    }

    /// トランスクリプトに含める本文（操作バブルは None）
    pub fn transcript_text(&self) -> Option<&str> {
        match &self.body {
            BubbleBody::Text(text) => Some(text),
            BubbleBody::Markup(markup) => Some(markup),
            _ => None,
        }
    }
}
