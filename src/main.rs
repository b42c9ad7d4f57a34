mod assets;
mod config;
mod feed;

use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use radar::engine::{EngineCore, FrameOutcome};
use radar::surface::RecordingSurface;
use radar::sync::StateSynchronizer;
use tokio::sync::watch;

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Assets(#[from] assets::AssetError),
    #[error(transparent)]
    Feed(#[from] feed::FeedError),
    #[error("feed task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = config::Cli::parse();
    let url = cli.hub_url()?;
    let registry = Arc::new(assets::load_registry(&cli.maps_dir)?);
    let sync = Arc::new(StateSynchronizer::new());

    let mut core = EngineCore::new(registry, Arc::clone(&sync));
    core.set_viewport(f64::from(cli.width), f64::from(cli.height));
    core.set_ui_scale(cli.ui_scale);
    core.set_zoom(cli.zoom);
    core.set_local_name(cli.local_name.clone());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut feed = tokio::spawn(feed::run(feed::FeedConfig::new(url, cli.max_reconnects), Arc::clone(&sync), shutdown_rx));

    let mut surface = RecordingSurface::new();
    let mut ticker = tokio::time::interval(cli.frame_interval());
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let started = Instant::now();
    let mut last: Option<FrameOutcome> = None;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let feed_result = loop {
        tokio::select! {
            _ = ticker.tick() => {
                let now_ms = started.elapsed().as_secs_f64() * 1000.0;
                let outcome = core.render(&mut surface, now_ms);
                log_outcome(last, outcome);
                last = Some(outcome);
            }
            signal = &mut ctrl_c => {
                if let Err(e) = signal {
                    tracing::warn!(error = %e, "ctrl-c listener failed");
                }
                tracing::info!("shutting down");
                if shutdown_tx.send(true).is_err() {
                    tracing::debug!("feed already stopped");
                }
                break (&mut feed).await;
            }
            result = &mut feed => break result,
        }
    };

    let outcome = core.render(&mut surface, started.elapsed().as_secs_f64() * 1000.0);
    log_outcome(last, outcome);
    feed_result??;
    Ok(())
}

/// Same kind of frame, ignoring per-frame entity counts.
fn same_kind(a: FrameOutcome, b: FrameOutcome) -> bool {
    match (a, b) {
        (FrameOutcome::Drawn(_), FrameOutcome::Drawn(_)) => true,
        _ => a == b,
    }
}

/// Log when the kind of frame on screen changes; per-frame counts go to trace.
fn log_outcome(last: Option<FrameOutcome>, outcome: FrameOutcome) {
    if last.is_none_or(|prev| !same_kind(prev, outcome)) {
        match outcome {
            FrameOutcome::Status(kind) => tracing::info!(?kind, "showing status"),
            FrameOutcome::Drawn(stats) => tracing::info!(map_drawn = stats.map_drawn, "rendering map"),
            other => tracing::info!(?other, "frame"),
        }
    }
    if let FrameOutcome::Drawn(stats) = outcome {
        tracing::trace!(
            drawn = stats.drawn,
            culled = stats.culled,
            failed = stats.failed,
            skipped = stats.skipped,
            "frame stats"
        );
    }
}
