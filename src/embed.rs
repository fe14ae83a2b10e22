//! 埋め込みタグの設定読み込み
//!
//! ホストページの埋め込みタグ属性（`data-*`）を読み取り、
//! デフォルト値を補完した [`WidgetConfig`] を構築する。

pub mod attributes;
pub mod widget_config;

pub use attributes::EmbedAttributes;
pub use widget_config::{PanelPosition, WidgetConfig};
