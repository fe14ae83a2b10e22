//! テーマとスタイルヘルパー
//!
//! すべてのテーマカラーはCSSカスタムプロパティ経由で適用する。
//! 要素ごとのスタイル書き換えはテーマ変更に使用しない。

use crate::embed::WidgetConfig;

/// ダーク変種を作るときの各RGBチャンネルへの固定オフセット
const DARKEN_OFFSET: i16 = -28;

/// `#rrggbb` 形式のカラー文字列をRGBに分解
pub fn parse_hex_color(value: &str) -> Option<(u8, u8, u8)> {
    let hex = value.trim().trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

/// RGBを `#rrggbb` 形式へ
pub fn rgb_to_hex(r: u8, g: u8, b: u8) -> String {
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

/// 各チャンネルへ固定オフセットを加算し [0, 255] にクランプした変種を返す
///
/// パースできない入力はそのまま返す（テーマ適用を壊さない）。
pub fn adjust_brightness(value: &str, offset: i16) -> String {
    match parse_hex_color(value) {
        Some((r, g, b)) => {
            let clamp = |c: u8| (c as i16 + offset).clamp(0, 255) as u8;
            rgb_to_hex(clamp(r), clamp(g), clamp(b))
        }
        None => value.to_string(),
    }
}

/// rgba() アニメーション用の `r, g, b` トリプレット文字列
pub fn rgb_triplet(value: &str) -> String {
    match parse_hex_color(value) {
        Some((r, g, b)) => format!("{}, {}, {}", r, g, b),
        None => "0, 132, 255".to_string(),
    }
}

/// ウィジェットルートに適用するCSSカスタムプロパティ一式を組み立てる
pub fn theme_custom_properties(config: &WidgetConfig) -> String {
    format!(
        "--chatlet-theme: {theme}; --chatlet-theme-dark: {dark}; --chatlet-theme-rgb: {rgb}; --chatlet-radius: {radius}px;",
        theme = config.theme_color,
        dark = adjust_brightness(&config.theme_color, DARKEN_OFFSET),
        rgb = rgb_triplet(&config.theme_color),
        radius = config.corner_radius,
    )
}

/// CSS クラス名の定数
pub struct CssClasses;

impl CssClasses {
    // ルート
    pub const WIDGET: &'static str = "chatlet-widget";
    pub const TOGGLE: &'static str = "chatlet-toggle";
    pub const BADGE: &'static str = "chatlet-badge";
    pub const PANEL: &'static str = "chatlet-panel";
    pub const PANEL_OPEN: &'static str = "chatlet-panel open";

    // ヘッダー
    pub const HEADER: &'static str = "chatlet-header";
    pub const AGENT_NAME: &'static str = "chatlet-agent-name";
    pub const AVATAR: &'static str = "chatlet-avatar";
    pub const CLOSE_BTN: &'static str = "chatlet-close";

    // メッセージ
    pub const MESSAGE_LIST: &'static str = "chatlet-messages";
    pub const BUBBLE: &'static str = "chatlet-bubble";
    pub const TYPING: &'static str = "chatlet-typing";

    // 入力バー
    pub const INPUT_BAR: &'static str = "chatlet-input-bar";
    pub const INPUT: &'static str = "chatlet-input";
    pub const SEND_BTN: &'static str = "chatlet-send";

    // フォーム
    pub const FORM: &'static str = "chatlet-form";
    pub const FORM_GROUP: &'static str = "chatlet-form-group";
    pub const FORM_LABEL: &'static str = "chatlet-form-label";
    pub const FORM_INPUT: &'static str = "chatlet-form-input";
    pub const FORM_INPUT_ERROR: &'static str = "chatlet-form-input input-error";
    pub const VALIDATION_MESSAGE: &'static str = "chatlet-validation-message";

    // 提案・カード
    pub const SUGGESTION: &'static str = "chatlet-suggestion";
    pub const SUGGESTION_ACTIONS: &'static str = "chatlet-suggestion-actions";
    pub const TICKET_SUMMARY: &'static str = "chatlet-ticket-summary";

    // フィードバック
    pub const SENTIMENT_BAR: &'static str = "chatlet-sentiment";
    pub const FEEDBACK_MODAL: &'static str = "chatlet-feedback-modal";

    // ボタン
    pub const BTN: &'static str = "chatlet-btn";
    pub const BTN_PRIMARY: &'static str = "chatlet-btn primary";
    pub const BTN_SECONDARY: &'static str = "chatlet-btn secondary";
}

/// メッセージロールに応じたCSSクラスを取得
pub fn get_bubble_class(role: &crate::gui::models::BubbleRole) -> String {
    let type_class = match role {
        crate::gui::models::BubbleRole::User => "user",
        crate::gui::models::BubbleRole::Bot => "bot",
        crate::gui::models::BubbleRole::Error => "error",
    };
    format!("{} {}", CssClasses::BUBBLE, type_class)
}

/// CSSの埋め込み用ヘルパー
pub fn get_embedded_css() -> &'static str {
    include_str!("theme.css")
}
