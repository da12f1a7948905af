use std::process::ExitCode;

use console::cli::Cli;
use rag_gateway::telemetry;
use tracing::error;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // .env is optional; real environment variables win.
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse_args();

    // `-v` raises this workspace's crates above whatever RUST_LOG says.
    let filter = match cli.global.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        _ => telemetry::env_filter_with_level("info", cli.log_level()),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(telemetry::layer())
        .init();

    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "loaded .env");
    }

    match console::start(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "rag-console failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
