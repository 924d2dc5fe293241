//! apiProxy: demo service wired on the giga engine.
//!
//! ```text
//! GET  /index               html page
//! GET  /assets/*filepath    {"filepath": ...}
//! GET  /hello/:name         greeting
//! GET  /v1/hello?name=..    greeting (logged)
//! GET  /v1/hello/:name      greeting (logged)
//! POST /user/register       echo form fields
//! POST /user/login          captcha code for `mobile`
//! ```

mod captcha;
mod handlers;
mod routes;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use giga::config::{load_config, GigaConfig};
use giga::observability::{logging, metrics};
use giga::Engine;

use crate::captcha::{CaptchaClient, LocalCaptcha};

#[derive(Parser)]
#[command(name = "api_proxy")]
#[command(about = "Demo API service built on the giga engine", long_about = None)]
struct Cli {
    /// TOML configuration file; built-in defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("failed to load {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => GigaConfig::default(),
    };

    logging::init_logging(&config.observability);
    tracing::info!(
        service = %config.app.name,
        address = %config.app.addr,
        shutdown_timeout_secs = config.server.shutdown_timeout_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let mut engine = Engine::with_config(config.server.clone());
    let captcha = CaptchaClient::new(Arc::new(LocalCaptcha::default()));
    routes::init_router(&mut engine, captcha);

    if let Err(e) = engine.run(&config.app.name, &config.app.addr).await {
        tracing::error!(error = %e, "Server failed");
        return ExitCode::FAILURE;
    }

    tracing::info!("Shutdown complete");
    ExitCode::SUCCESS
}
