mod countdown;
mod predict;
mod web;

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use crate::web::Config;

#[derive(Parser)]
#[command(name = "pass-countdown")]
#[command(about = "Live countdown to a satellite's next overhead pass")]
struct Cli {
    /// YAML config file; built-in defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match Config::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                log::error!("Failed to load config {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => Config::default(),
    };

    let (predictor, schedule) = match (config.predictor(), config.prediction_schedule()) {
        (Ok(p), Ok(s)) => (p, s),
        (Err(e), _) | (_, Err(e)) => {
            log::error!("Invalid config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    log::info!(
        "Tracking NORAD {} from {:?}",
        config.satellite.norad_id,
        predictor.source
    );

    match web::run_server(config, Arc::new(predictor), schedule).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}
