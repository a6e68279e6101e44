use std::path::PathBuf;
use std::time::Duration;

use anyhow::bail;
use clap::Parser;
use env_logger::{Builder, Env};
use log::info;
use pawprint::{BackendKind, ClientConfig, ConsoleSurface, Session};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Images to classify, one after another
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// Base URL of the inference service (overrides PAWPRINT_ENDPOINT)
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Fail instead of guessing when no endpoint is configured
    #[arg(long)]
    no_stand_in: bool,

    /// Request timeout in seconds (overrides PAWPRINT_TIMEOUT_SECS)
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Simulated latency of the stand-in classifier, in milliseconds
    #[arg(long, default_value_t = 0)]
    delay_ms: u64,
}

impl Args {
    fn config(&self) -> ClientConfig {
        let mut config = ClientConfig::from_env()
            .with_stand_in_delay(Duration::from_millis(self.delay_ms));
        if let Some(endpoint) = &self.endpoint {
            config = config.with_endpoint(endpoint.as_str());
        }
        if self.no_stand_in {
            config = config.with_stand_in(false);
        }
        if let Some(secs) = self.timeout {
            config = config.with_request_timeout(Duration::from_secs(secs));
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    Builder::from_env(Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let mut session = Session::new(args.config(), ConsoleSurface::stdout());
    match session.backend_kind() {
        Some(BackendKind::Remote) => {
            info!("Classifying with {}", session.endpoint().unwrap_or_default())
        }
        Some(BackendKind::StandIn) => {
            eprintln!("No endpoint configured: using the stand-in classifier (demo guesses only)")
        }
        None => info!("No endpoint configured and stand-in disabled"),
    }

    let mut failed = 0;
    for path in &args.images {
        println!("\n{}", path.display());
        if session.select_path(path).await.is_err() {
            failed += 1;
            continue;
        }
        if session.predict().await.is_err() {
            failed += 1;
        }
    }

    if failed > 0 {
        bail!("{} of {} images could not be classified", failed, args.images.len());
    }
    Ok(())
}
