use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use pincebot_aggregator::{AggregatedReady, Aggregator};
use pincebot_assistant::{AnswerPipeline, MintlifyBackend};
use pincebot_core::config::PincebotConfig;
use pincebot_gateway::app::{self, AppState};
use pincebot_sanitize::Sanitizer;
use pincebot_slack::{
    BotFilter, ChatPlatform, Delivery, EventRouter, FeedbackHandler, ProcessingMarker, SlackClient,
};
use tracing::info;

/// Capacity of the aggregator → delivery channel.
const READY_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Parser)]
#[command(name = "pincebot-gateway", version, about = "Slack documentation assistant relay")]
struct Cli {
    /// Path to pincebot.toml (default: $PINCEBOT_CONFIG, then ~/.pincebot/pincebot.toml)
    #[arg(long)]
    config: Option<String>,

    /// Load and validate the configuration, print a redacted summary and exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "pincebot_gateway=info,pincebot_slack=info,pincebot_aggregator=info,\
                 pincebot_assistant=info,tower_http=debug"
                    .into()
            }),
        )
        .init();

    let cli = Cli::parse();

    // load config: --config > PINCEBOT_CONFIG env > ~/.pincebot/pincebot.toml
    let config_path = cli.config.or_else(|| std::env::var("PINCEBOT_CONFIG").ok());
    let config = PincebotConfig::load(config_path.as_deref()).context("loading configuration")?;
    config.validate().context("invalid configuration")?;

    if cli.check {
        println!("configuration ok: {}", config.redacted_summary());
        return Ok(());
    }
    info!(config = %config.redacted_summary(), "configuration loaded");

    let bot_token = config
        .slack
        .bot_token
        .clone()
        .context("slack.bot_token missing")?;
    let signing_secret = config
        .slack
        .signing_secret
        .clone()
        .context("slack.signing_secret missing")?;
    let api_key = config
        .assistant
        .api_key
        .clone()
        .context("assistant.api_key missing")?;

    // Slack Web API client shared by routing, delivery and feedback
    let platform: Arc<dyn ChatPlatform> =
        Arc::new(SlackClient::new(bot_token, config.slack.api_base_url.clone()));
    let marker = ProcessingMarker::new(platform.clone(), config.slack.processing_reaction.clone());

    // Ready channel: Aggregator → Delivery task
    let (ready_tx, ready_rx) = tokio::sync::mpsc::channel::<AggregatedReady>(READY_CHANNEL_CAPACITY);
    let quiet_period = Duration::from_secs(config.aggregator.quiet_period_secs);
    let aggregator = Aggregator::new(quiet_period, ready_tx);

    let backend = MintlifyBackend::new(api_key, &config.assistant)?;
    let pipeline = AnswerPipeline::new(
        Sanitizer::default(),
        Arc::new(backend),
        Duration::from_secs(config.assistant.timeout_secs),
    )
    .with_refusal_filter(config.assistant.refusal_filter);

    let delivery = Delivery::new(Arc::new(pipeline), platform.clone(), marker.clone());
    tokio::spawn(delivery.run(ready_rx));

    let filter = BotFilter::new(&config.bot_filter, config.slack.own_bot_id.clone());
    let events = EventRouter::new(aggregator.clone(), filter, marker);
    let feedback = FeedbackHandler::new(platform, config.slack.support_team_id.clone());

    let state = Arc::new(AppState::new(signing_secret, aggregator.clone(), events, feedback));
    let router = app::build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.gateway.bind, config.gateway.port).parse()?;
    info!(quiet_period_secs = quiet_period.as_secs(), "Pincebot gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let dropped = aggregator.shutdown();
    info!(dropped, "Pincebot gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
