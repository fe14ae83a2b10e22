//! 埋め込みタグ属性の表現

/// 属性名の定数
pub mod names {
    pub const API: &str = "data-api";
    pub const ID: &str = "data-id";
    pub const NAME: &str = "data-name";
    pub const AVATAR: &str = "data-avatar";
    pub const THEME: &str = "data-theme";
    pub const ENABLE_TICKETS: &str = "data-enable-tickets";
    pub const ENABLE_LEADS: &str = "data-enable-leads";
    pub const ENABLE_SMART_LEAD_DETECTION: &str = "data-enable-smart-lead-detection";
    pub const LEAD_THRESHOLD: &str = "data-lead-threshold";
    pub const ENABLE_AVATAR: &str = "data-enable-avatar";
    pub const ENABLE_SENTIMENT: &str = "data-enable-sentiment";
    pub const RADIUS: &str = "data-radius";
    pub const POSITION: &str = "data-position";
}

/// 埋め込みタグの `data-*` 属性一式
///
/// ブラウザ環境ではスクリプトタグから、デモバイナリではCLIフラグから
/// 構築される。値はすべて文字列のまま保持し、型付けは
/// [`super::WidgetConfig`] 側で行う。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmbedAttributes {
    entries: Vec<(String, String)>,
}

impl EmbedAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(名前, 値)` ペアの列から構築
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// 属性を設定（同名属性は後勝ちで上書き）
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == name) {
            entry.1 = value.into();
        } else {
            self.entries.push((name, value.into()));
        }
    }

    /// 属性値を取得（未設定なら None）
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pairs_and_get() {
        let attrs = EmbedAttributes::from_pairs([
            (names::API, "https://x.test"),
            (names::ID, "abc"),
        ]);
        assert_eq!(attrs.get(names::API), Some("https://x.test"));
        assert_eq!(attrs.get(names::ID), Some("abc"));
        assert_eq!(attrs.get(names::THEME), None);
    }

    #[test]
    fn test_set_overwrites() {
        let mut attrs = EmbedAttributes::new();
        attrs.set(names::THEME, "#111111");
        attrs.set(names::THEME, "#222222");
        assert_eq!(attrs.get(names::THEME), Some("#222222"));
        assert_eq!(attrs.len(), 1);
    }
}
