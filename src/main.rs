//! Iris Flower Classifier - Main Entry Point
//!
//! Loads the KNN model artifact, then serves one prediction request per
//! stdin line and writes one response per stdout line.

use anyhow::Result;
use iris_flower_classifier::{
    config::{LoggingConfig, ServingConfig},
    handler::PredictHandler,
    metrics::HandlerMetrics,
    types::{InferenceRequest, InferenceResponse},
};
use std::io::BufRead;
use std::time::Instant;
use tracing::{error, info, warn};

fn init_logging(config: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!("iris_flower_classifier={}", config.level))
    });

    if config.format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn main() -> Result<()> {
    // Load configuration, falling back to defaults when no file is present
    let loaded = ServingConfig::load();
    let from_file = loaded.is_ok();
    let config = loaded.unwrap_or_default();

    init_logging(&config.logging);

    info!("Starting iris flower classifier serving handler");
    if from_file {
        info!(artifact = %config.model.artifact_path, "Configuration loaded");
    } else {
        warn!(
            artifact = %config.model.artifact_path,
            "No config file found, using defaults"
        );
    }

    // Initialize metrics
    let metrics = HandlerMetrics::new();

    // Construct the handler (loads the artifact from disk)
    let handler = PredictHandler::from_config(&config)?;
    info!(
        model = %handler.model_name(),
        features = handler.feature_count(),
        "Handler ready, reading requests from stdin"
    );

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let request: InferenceRequest = match serde_json::from_str(&line) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "Failed to decode request line");
                metrics.record_failure();
                continue;
            }
        };

        let started = Instant::now();
        match handler.predict(&request.instances) {
            Ok(predictions) => {
                metrics.record_request(started.elapsed(), request.instances.len());
                let response = InferenceResponse { predictions };
                println!("{}", serde_json::to_string(&response)?);
            }
            Err(e) => {
                error!(error = %e, "Prediction failed");
                metrics.record_failure();
            }
        }
    }

    metrics.log_summary();
    info!("Shutting down");

    Ok(())
}
