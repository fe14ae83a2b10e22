//! ウィジェット設定
//!
//! デフォルト値はREADMEに記載のものと一対一で対応する。

use tracing::{error, warn};

use super::attributes::{names, EmbedAttributes};
use crate::api::endpoints::{ChatbotId, EndpointSet};

/// テーマカラーのデフォルト（ブルー）
pub const DEFAULT_THEME_COLOR: &str = "#0084ff";
/// エージェント表示名のデフォルト
pub const DEFAULT_AGENT_NAME: &str = "Assistant";
/// リード検出スコアしきい値のデフォルト
pub const DEFAULT_LEAD_THRESHOLD: f64 = 0.3;
/// トグルボタン角丸のデフォルト（px）
pub const DEFAULT_CORNER_RADIUS: u32 = 45;

/// パネルの表示位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelPosition {
    #[default]
    BottomRight,
    BottomLeft,
}

impl PanelPosition {
    fn parse(value: &str) -> Self {
        match value {
            "bottom-left" => Self::BottomLeft,
            _ => Self::BottomRight,
        }
    }

    pub fn as_css_class(&self) -> &'static str {
        match self {
            Self::BottomRight => "bottom-right",
            Self::BottomLeft => "bottom-left",
        }
    }
}

/// ウィジェット設定（構築後は不変）
///
/// 埋め込みタグ属性から一度だけ構築され、以後サーバー状態から
/// 何も再導出しない。
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetConfig {
    /// チャットボット識別子
    pub chatbot_id: ChatbotId,
    /// エージェント表示名
    pub agent_name: String,
    /// アバター画像URL（空なら既定アイコン）
    pub avatar_url: String,
    /// テーマカラー（hex）
    pub theme_color: String,
    /// 導出済みエンドポイントURL一式
    pub endpoints: EndpointSet,
    /// 同梱スタイルシートの取得先（アセット依存、プロトコルではない）
    pub stylesheet_url: String,
    /// チケット作成フロー有効（オプトアウト）
    pub enable_tickets: bool,
    /// リード獲得フロー有効（オプトイン）
    pub enable_leads: bool,
    /// スマートリード検出有効（オプトアウト、リード有効時のみ意味を持つ）
    pub enable_smart_lead_detection: bool,
    /// リード検出スコアしきい値 [0, 1]
    pub lead_threshold: f64,
    /// アバター表示（オプトアウト）
    pub enable_avatar: bool,
    /// センチメント（👍/👎）表示（オプトアウト）
    pub enable_sentiment: bool,
    /// トグルボタンの角丸（px）
    pub corner_radius: u32,
    /// パネル位置
    pub position: PanelPosition,
    /// 必須属性が欠けたまま構築されたか
    pub degraded: bool,
}

/// オプトアウト型フラグ: 属性が文字列 `"false"` のときのみ無効
fn parse_opt_out(attrs: &EmbedAttributes, name: &str) -> bool {
    attrs.get(name) != Some("false")
}

/// オプトイン型フラグ: 属性が文字列 `"true"` のときのみ有効
fn parse_opt_in(attrs: &EmbedAttributes, name: &str) -> bool {
    attrs.get(name) == Some("true")
}

impl WidgetConfig {
    /// 埋め込みタグ属性から設定を構築
    ///
    /// 必須属性（`data-api`、`data-id`）が無い場合もエラーにはせず、
    /// コンソールへ報告した上で縮退状態のまま構築を続ける。
    pub fn from_attributes(attrs: &EmbedAttributes) -> Self {
        let mut degraded = false;

        let api_base = match attrs.get(names::API) {
            Some(value) if !value.trim().is_empty() => value.trim().to_string(),
            _ => {
                error!("chatlet: required attribute {} is missing", names::API);
                degraded = true;
                String::new()
            }
        };

        let chatbot_id = match attrs.get(names::ID) {
            Some(value) if !value.trim().is_empty() => ChatbotId(value.trim().to_string()),
            _ => {
                error!("chatlet: required attribute {} is missing", names::ID);
                degraded = true;
                ChatbotId(String::new())
            }
        };

        let endpoints = EndpointSet::derive(&api_base, &chatbot_id);
        let stylesheet_url = format!("{}static/widget.css", EndpointSet::normalize_base(&api_base));

        let lead_threshold = match attrs.get(names::LEAD_THRESHOLD) {
            None => DEFAULT_LEAD_THRESHOLD,
            Some(raw) => match raw.parse::<f64>() {
                Ok(value) => value.clamp(0.0, 1.0),
                Err(_) => {
                    warn!(
                        "chatlet: {}=\"{}\" is not a number, using default",
                        names::LEAD_THRESHOLD,
                        raw
                    );
                    DEFAULT_LEAD_THRESHOLD
                }
            },
        };

        let corner_radius = attrs
            .get(names::RADIUS)
            .and_then(|raw| raw.parse::<u32>().ok())
            .unwrap_or(DEFAULT_CORNER_RADIUS);

        Self {
            chatbot_id,
            agent_name: attrs
                .get(names::NAME)
                .filter(|v| !v.is_empty())
                .unwrap_or(DEFAULT_AGENT_NAME)
                .to_string(),
            avatar_url: attrs.get(names::AVATAR).unwrap_or_default().to_string(),
            theme_color: attrs
                .get(names::THEME)
                .filter(|v| !v.is_empty())
                .unwrap_or(DEFAULT_THEME_COLOR)
                .to_string(),
            endpoints,
            stylesheet_url,
            enable_tickets: parse_opt_out(attrs, names::ENABLE_TICKETS),
            enable_leads: parse_opt_in(attrs, names::ENABLE_LEADS),
            enable_smart_lead_detection: parse_opt_out(attrs, names::ENABLE_SMART_LEAD_DETECTION),
            lead_threshold,
            enable_avatar: parse_opt_out(attrs, names::ENABLE_AVATAR),
            enable_sentiment: parse_opt_out(attrs, names::ENABLE_SENTIMENT),
            corner_radius,
            position: attrs
                .get(names::POSITION)
                .map(PanelPosition::parse)
                .unwrap_or_default(),
            degraded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_attrs() -> EmbedAttributes {
        EmbedAttributes::from_pairs([(names::API, "https://x.test"), (names::ID, "abc")])
    }

    #[test]
    fn test_defaults_applied() {
        let config = WidgetConfig::from_attributes(&minimal_attrs());
        assert_eq!(config.agent_name, DEFAULT_AGENT_NAME);
        assert_eq!(config.theme_color, DEFAULT_THEME_COLOR);
        assert_eq!(config.lead_threshold, DEFAULT_LEAD_THRESHOLD);
        assert_eq!(config.corner_radius, DEFAULT_CORNER_RADIUS);
        assert_eq!(config.position, PanelPosition::BottomRight);
        assert!(!config.degraded);
    }

    #[test]
    fn test_opt_out_semantics() {
        // 省略時・任意の文字列は有効、リテラル "false" のみ無効
        let config = WidgetConfig::from_attributes(&minimal_attrs());
        assert!(config.enable_tickets);

        let mut attrs = minimal_attrs();
        attrs.set(names::ENABLE_TICKETS, "no");
        assert!(WidgetConfig::from_attributes(&attrs).enable_tickets);

        attrs.set(names::ENABLE_TICKETS, "false");
        assert!(!WidgetConfig::from_attributes(&attrs).enable_tickets);
    }

    #[test]
    fn test_opt_in_semantics() {
        // 省略時・任意の文字列は無効、リテラル "true" のみ有効
        let config = WidgetConfig::from_attributes(&minimal_attrs());
        assert!(!config.enable_leads);

        let mut attrs = minimal_attrs();
        attrs.set(names::ENABLE_LEADS, "yes");
        assert!(!WidgetConfig::from_attributes(&attrs).enable_leads);

        attrs.set(names::ENABLE_LEADS, "true");
        assert!(WidgetConfig::from_attributes(&attrs).enable_leads);
    }

    #[test]
    fn test_missing_required_attributes_degrade() {
        let config = WidgetConfig::from_attributes(&EmbedAttributes::new());
        assert!(config.degraded);
        assert!(config.chatbot_id.0.is_empty());
    }

    #[test]
    fn test_lead_threshold_clamped_and_fallback() {
        let mut attrs = minimal_attrs();
        attrs.set(names::LEAD_THRESHOLD, "1.7");
        assert_eq!(WidgetConfig::from_attributes(&attrs).lead_threshold, 1.0);

        attrs.set(names::LEAD_THRESHOLD, "-0.5");
        assert_eq!(WidgetConfig::from_attributes(&attrs).lead_threshold, 0.0);

        attrs.set(names::LEAD_THRESHOLD, "high");
        assert_eq!(
            WidgetConfig::from_attributes(&attrs).lead_threshold,
            DEFAULT_LEAD_THRESHOLD
        );
    }

    #[test]
    fn test_stylesheet_url() {
        let config = WidgetConfig::from_attributes(&minimal_attrs());
        assert_eq!(config.stylesheet_url, "https://x.test/static/widget.css");
    }

    #[test]
    fn test_position_parsing() {
        let mut attrs = minimal_attrs();
        attrs.set(names::POSITION, "bottom-left");
        assert_eq!(
            WidgetConfig::from_attributes(&attrs).position,
            PanelPosition::BottomLeft
        );

        attrs.set(names::POSITION, "top-center");
        assert_eq!(
            WidgetConfig::from_attributes(&attrs).position,
            PanelPosition::BottomRight
        );
    }
}
