//! Iris Model Trainer
//!
//! Trains the KNN fixture model on the embedded iris dataset and writes
//! the serialized artifact for the serving handler to load.

use anyhow::{Context, Result};
use iris_flower_classifier::models::train::train_iris;
use iris_flower_classifier::types::artifact::DEFAULT_ARTIFACT_PATH;
use tracing::info;

const TEST_FRACTION: f64 = 0.2;
const SPLIT_SEED: u64 = 42;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let output = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_ARTIFACT_PATH.to_string());

    info!("Training iris KNN model");
    let trained = train_iris(1..=15, TEST_FRACTION, SPLIT_SEED)?;
    info!(
        best_k = trained.best_k,
        test_accuracy = format!("{:.3}", trained.test_accuracy),
        "Training complete"
    );

    let json = serde_json::to_string_pretty(&trained.artifact)?;
    std::fs::write(&output, json).context(format!("Failed to write artifact to {:?}", output))?;
    info!(path = %output, samples = trained.artifact.sample_count(), "Artifact written");

    Ok(())
}
