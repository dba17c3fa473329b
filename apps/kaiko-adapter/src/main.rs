//! Kaiko Adapter Binary
//!
//! Starts the Kaiko Chainlink adapter as an HTTP server, or runs a single
//! event from stdin.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin kaiko-adapter
//! echo '{"id":"1","data":{"coin":"ampl"}}' | ADAPTER_MODE=event cargo run --bin kaiko-adapter
//! ```
//!
//! # Environment Variables
//!
//! ## Required
//! - `KAIKO_API_KEY`: Kaiko API key (`API_KEY` is accepted as a fallback)
//!
//! ## Optional
//! - `ADAPTER_MODE`: http | event (default: http)
//! - `HTTP_PORT`: HTTP server port (default: 8080)
//! - `KAIKO_REGION`: us | eu (default: us)
//! - `KAIKO_BASE_URL`: Replaces the regional API host
//! - `KAIKO_TIMEOUT_SECS`, `KAIKO_MAX_ATTEMPTS`, `KAIKO_INITIAL_BACKOFF_MS`
//! - `DEFAULT_BASE_ASSET` (default: ampl), `DEFAULT_INTERVAL` (default: 1d)
//! - `QUOTE_ASSETS` (default: usd,usdt,eth,btc), `QUOTE_ASSETS_<BASE>`
//! - `RUST_LOG`, `OTEL_ENABLED`, `OTEL_EXPORTER_OTLP_ENDPOINT`, `OTEL_SERVICE_NAME`

use std::net::SocketAddr;
use std::sync::Arc;

use kaiko_adapter::application::use_cases::JobRunner;
use kaiko_adapter::infrastructure::config::{AdapterConfig, AdapterMode};
use kaiko_adapter::infrastructure::event::run_once;
use kaiko_adapter::infrastructure::http::{AppState, create_router};
use kaiko_adapter::infrastructure::market_data::KaikoMarketDataAdapter;
use kaiko_adapter::infrastructure::{metrics, telemetry};
use tokio::net::TcpListener;
use tokio::signal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    load_dotenv();
    let _telemetry = telemetry::init()?;

    let config = AdapterConfig::from_env()?;
    log_config(&config);

    let runner = Arc::new(create_runner(&config)?);

    match config.mode {
        AdapterMode::Http => serve_http(&config, runner).await?,
        AdapterMode::Event => {
            let response = run_once(&runner, tokio::io::stdin(), tokio::io::stdout()).await?;
            tracing::info!(
                job_run_id = %response.job_run_id,
                status_code = response.status_code,
                "Event handled"
            );
        }
    }

    Ok(())
}

/// Log the parsed configuration.
fn log_config(config: &AdapterConfig) {
    tracing::info!(
        mode = config.mode.as_str(),
        region = %config.kaiko.region,
        base_url_override = config.kaiko.base_url.is_some(),
        http_port = config.server.http_port,
        default_base_asset = %config.pricing.default_base_asset,
        default_interval = %config.pricing.default_interval,
        quote_overrides = config.pricing.quote_overrides.len(),
        "Configuration loaded"
    );
}

/// Wire the Kaiko adapter into a job runner.
fn create_runner(
    config: &AdapterConfig,
) -> Result<JobRunner<KaikoMarketDataAdapter>, Box<dyn std::error::Error>> {
    let market_data = KaikoMarketDataAdapter::new(config.kaiko_config())?;
    tracing::info!(region = %config.kaiko.region, "KaikoMarketDataAdapter initialized");

    Ok(JobRunner::new(
        Arc::new(market_data),
        config.pricing.resolver(),
        config.pricing.job_defaults(),
    ))
}

/// Serve jobs over HTTP until SIGINT or SIGTERM.
async fn serve_http(
    config: &AdapterConfig,
    runner: Arc<JobRunner<KaikoMarketDataAdapter>>,
) -> Result<(), Box<dyn std::error::Error>> {
    metrics::init_metrics()?;

    let state = AppState {
        runner,
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    let app = create_router(state);

    let http_addr = SocketAddr::from(([0, 0, 0, 0], config.server.http_port));
    tracing::info!(%http_addr, "HTTP server starting");
    tracing::info!("Endpoints:");
    tracing::info!("  POST /");
    tracing::info!("  GET  /health");
    tracing::info!("  GET  /metrics");

    let listener = TcpListener::bind(http_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

/// Load .env file from current directory or any ancestor directory.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
///
/// # Panics
///
/// Panics if signal handlers cannot be installed.
#[allow(clippy::expect_used)]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }
}
