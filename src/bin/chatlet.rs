use anyhow::Result;
use clap::Parser;
use dioxus::prelude::*;

use chatlet::embed::attributes::names;
use chatlet::embed::{EmbedAttributes, WidgetConfig};
use chatlet::gui::{components::SupportWidget, utils};

/// chatlet デモホスト
///
/// 埋め込みタグ属性に相当する値をCLIフラグから合成し、
/// デスクトップウィンドウ内でウィジェットを起動する。
#[derive(Parser, Debug, Clone)]
#[command(name = "chatlet", about = "Embeddable support chat widget - demo host")]
struct Args {
    /// バックエンドAPIのベースURL（data-api 相当）
    #[arg(long)]
    api: String,

    /// チャットボット識別子（data-id 相当）
    #[arg(long = "chatbot-id")]
    chatbot_id: String,

    /// エージェント表示名
    #[arg(long)]
    name: Option<String>,

    /// アバター画像URL
    #[arg(long)]
    avatar: Option<String>,

    /// テーマカラー（hex）
    #[arg(long)]
    theme: Option<String>,

    /// トグルボタンの角丸（px）
    #[arg(long)]
    radius: Option<u32>,

    /// パネル位置（bottom-right / bottom-left）
    #[arg(long)]
    position: Option<String>,

    /// リード検出スコアしきい値 [0, 1]
    #[arg(long = "lead-threshold")]
    lead_threshold: Option<f64>,

    /// チケット作成フローを無効化
    #[arg(long = "disable-tickets")]
    disable_tickets: bool,

    /// リード獲得フローを有効化（オプトイン）
    #[arg(long = "enable-leads")]
    enable_leads: bool,

    /// スマートリード検出を無効化
    #[arg(long = "disable-smart-lead-detection")]
    disable_smart_lead_detection: bool,

    /// アバター表示を無効化
    #[arg(long = "disable-avatar")]
    disable_avatar: bool,

    /// センチメント操作を無効化
    #[arg(long = "disable-sentiment")]
    disable_sentiment: bool,
}

impl Args {
    /// CLIフラグを埋め込みタグ属性へ写像する
    fn to_attributes(&self) -> EmbedAttributes {
        let mut attrs = EmbedAttributes::new();
        attrs.set(names::API, self.api.clone());
        attrs.set(names::ID, self.chatbot_id.clone());
        if let Some(name) = &self.name {
            attrs.set(names::NAME, name.clone());
        }
        if let Some(avatar) = &self.avatar {
            attrs.set(names::AVATAR, avatar.clone());
        }
        if let Some(theme) = &self.theme {
            attrs.set(names::THEME, theme.clone());
        }
        if let Some(radius) = self.radius {
            attrs.set(names::RADIUS, radius.to_string());
        }
        if let Some(position) = &self.position {
            attrs.set(names::POSITION, position.clone());
        }
        if let Some(threshold) = self.lead_threshold {
            attrs.set(names::LEAD_THRESHOLD, threshold.to_string());
        }
        if self.disable_tickets {
            attrs.set(names::ENABLE_TICKETS, "false");
        }
        if self.enable_leads {
            attrs.set(names::ENABLE_LEADS, "true");
        }
        if self.disable_smart_lead_detection {
            attrs.set(names::ENABLE_SMART_LEAD_DETECTION, "false");
        }
        if self.disable_avatar {
            attrs.set(names::ENABLE_AVATAR, "false");
        }
        if self.disable_sentiment {
            attrs.set(names::ENABLE_SENTIMENT, "false");
        }
        attrs
    }
}

fn app() -> Element {
    let config = use_context::<WidgetConfig>();

    rsx! {
        div {
            class: "app",
            style: "
                height: 100vh;
                margin: 0;
                padding: 0;
                background: #f0f2f5;
                font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            ",

            SupportWidget { config: config.clone() }
        }
    }
}

fn main() -> Result<()> {
    utils::init_logging()?;

    let args = Args::parse();
    let config = WidgetConfig::from_attributes(&args.to_attributes());

    tracing::info!(
        "🎬 Starting chatlet demo host - chatbot {} via {}",
        config.chatbot_id,
        config.endpoints.ask
    );
    if config.degraded {
        tracing::warn!("⚠️ Widget is running in degraded mode - check required flags");
    }

    dioxus::LaunchBuilder::desktop()
        .with_cfg(
            dioxus::desktop::Config::new().with_window(
                dioxus::desktop::tao::window::WindowBuilder::new()
                    .with_title("chatlet - support widget demo")
                    .with_inner_size(dioxus::desktop::tao::dpi::LogicalSize::new(480.0, 720.0))
                    .with_resizable(true),
            ),
        )
        .with_context(config)
        .launch(app);

    tracing::info!("👋 chatlet demo host shutting down");
    Ok(())
}
