//! Dioxusカスタムフック

mod use_support_widget;

pub use use_support_widget::{use_support_widget, WidgetHandle};
