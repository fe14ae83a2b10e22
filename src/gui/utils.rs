// GUI用ユーティリティ関数

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// ユーザー入力をHTMLとして安全な形にエスケープ
///
/// ユーザー由来のテキストをマークアップ（トランスクリプト等）へ
/// 埋め込む前に必ず通すこと。ボット側の整形済みマークアップには適用しない。
pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// セッション単位の匿名ユーザーIDを生成
///
/// ページロードごとに1回生成され、以後すべてのリクエストの
/// `User-ID` ヘッダーとして送信される。
pub fn generate_anonymous_id() -> String {
    format!("anon_{}", uuid::Uuid::new_v4().simple())
}

/// メッセージバブル用の一意なIDを生成
pub fn generate_bubble_id() -> String {
    format!("bubble_{}", uuid::Uuid::new_v4().simple())
}

/// 時刻フォーマット
pub fn format_timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

/// 強化されたログ初期化
pub fn init_logging() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .compact(),
    );

    subscriber.try_init()?;

    Ok(())
}
