use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info, warn};

use pricewatch::monitor::{CheckOutcome, Monitor, MonitorConfig};
use pricewatch::EmailSettings;

/// Check product pages for price changes and email an alert when one is
/// found. Email credentials come from SENDER_EMAIL, SENDER_PASSWORD and
/// RECEIVER_EMAIL (a .env file is honored). Run it from cron or a systemd
/// timer; each invocation performs exactly one check per URL.
#[derive(Parser, Debug)]
#[command(name = "pricewatch", version, about)]
struct Cli {
    /// Product page URLs to check, in order
    #[arg(required = true)]
    urls: Vec<String>,

    /// CSS selector locating the price element
    #[arg(short, long, env = "PRICE_SELECTOR")]
    selector: String,

    /// Product name used when the page title cannot be resolved
    #[arg(short, long)]
    name: Option<String>,

    /// Directory for price history files
    #[arg(long, default_value = ".")]
    history_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pricewatch=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let email_settings = EmailSettings::from_env();
    if email_settings.is_none() {
        warn!("no email settings in environment, notifications are disabled");
    }

    for url in &cli.urls {
        if let Err(err) = url::Url::parse(url) {
            error!(%url, error = %err, "skipping invalid URL");
            continue;
        }
        info!(%url, "checking price");

        let config = MonitorConfig {
            url: url.clone(),
            price_selector: cli.selector.clone(),
            product_name: cli.name.clone(),
            email_settings: email_settings.clone(),
            history_dir: cli.history_dir.clone(),
        };

        match Monitor::new(config).await {
            Ok(mut monitor) => match monitor.check_price_change().await {
                CheckOutcome::FirstObservation { price } => {
                    info!(product = monitor.product_identity(), price, "first observation recorded");
                }
                CheckOutcome::Unchanged { price } => {
                    info!(product = monitor.product_identity(), price, "no change");
                }
                CheckOutcome::Changed { previous, current } => {
                    info!(
                        product = monitor.product_identity(),
                        previous, current, "price changed"
                    );
                }
                CheckOutcome::Skipped(err) => {
                    warn!(product = monitor.product_identity(), error = %err, "cycle skipped");
                }
            },
            Err(err) => error!(%url, error = %err, "failed to construct monitor"),
        }
    }

    Ok(())
}
