use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use bg_remover::app::BgRemoverApp;
use bg_remover::config::{UploaderConfig, DEFAULT_BATCH_WIDTH, DEFAULT_ENDPOINT};
use clap::Parser;
use eframe::egui;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Upload images in batches to a background removal service"
)]
struct Args {
    /// Base URL of the background removal service
    #[arg(long, env = "BG_REMOVER_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Number of uploads allowed in flight at once
    #[arg(short = 'b', long, env = "BG_REMOVER_BATCH_WIDTH", default_value_t = DEFAULT_BATCH_WIDTH)]
    batch_width: usize,

    /// How long the progress window stays up after the last upload (ms)
    #[arg(long, default_value_t = 500)]
    hide_delay_ms: u64,

    /// Clicks on the picker within this window are ignored (ms)
    #[arg(long, default_value_t = 100)]
    picker_cooldown_ms: u64,
}

impl From<Args> for UploaderConfig {
    fn from(args: Args) -> Self {
        Self {
            endpoint: args.endpoint,
            batch_width: args.batch_width,
            progress_hide_delay: Duration::from_millis(args.hide_delay_ms),
            picker_cooldown: Duration::from_millis(args.picker_cooldown_ms),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = UploaderConfig::from(Args::parse());
    config.validate()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let handle = runtime.handle().clone();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([720.0, 820.0])
            .with_min_inner_size([480.0, 560.0])
            .with_drag_and_drop(true),
        follow_system_theme: true,
        ..Default::default()
    };

    eframe::run_native(
        "Background Remover",
        options,
        Box::new(move |cc| Box::new(BgRemoverApp::new(cc, config, handle))),
    )
    .map_err(|e| anyhow!("failed to run UI: {e}"))?;

    runtime.shutdown_timeout(Duration::from_secs(1));
    Ok(())
}
