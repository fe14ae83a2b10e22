// Core modules
pub mod models; // バブルのデータ構造
pub mod utils; // ユーティリティ関数

// Dioxus UI components
pub mod components; // UI コンポーネント
pub mod hooks; // コントローラー連携フック
pub mod styles; // スタイル

// Core functionality exports - specific imports to avoid ambiguous glob re-exports
pub use components::SupportWidget;
pub use hooks::{use_support_widget, WidgetHandle};
pub use models::{BubbleBody, BubbleRole, ChatBubble};
