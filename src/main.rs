use std::error::Error;
use std::io::ErrorKind;

use ai_llm_service::telemetry;
use pr_reviewer::ReviewConfig;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables from .env file.
    // A missing .env is fine in CI where the workflow sets the variables.
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(telemetry::env_filter("info"))
        .with(telemetry::layer())
        .init();

    match dotenv {
        Ok(path) => info!("loaded environment from {}", path.display()),
        Err(e) if is_missing_file(&e) => {}
        Err(e) => warn!("ignoring unreadable .env: {e}"),
    }

    let cfg = ReviewConfig::from_env().inspect_err(|e| error!("configuration: {e}"))?;

    let summary = pr_reviewer::run_review(cfg)
        .await
        .inspect_err(|e| error!("review aborted: {e}"))?;

    if summary.failed > 0 {
        info!("{} comment(s) could not be posted", summary.failed);
    }

    Ok(())
}

/// True when `.env` simply does not exist; parse and permission errors are not.
fn is_missing_file(err: &dotenvy::Error) -> bool {
    matches!(err, dotenvy::Error::Io(e) if e.kind() == ErrorKind::NotFound)
}
