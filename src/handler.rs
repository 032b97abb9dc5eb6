//! Serving handler exposing the construct-then-call contract.
//!
//! The serving harness constructs the handler once, then routes every
//! request to `predict`, `classify`, or `regress`. Only prediction is
//! backed by the KNN model; the other two are unimplemented for this
//! fixture.

use crate::config::ServingConfig;
use crate::models::loader::{LoadedModel, ModelLoader};
use crate::types::artifact::DEFAULT_ARTIFACT_PATH;
use anyhow::{bail, Result};
use ndarray::Array2;
use std::path::Path;
use tracing::{debug, info};

/// Serving handler for the iris KNN model
pub struct PredictHandler {
    model: LoadedModel,
}

impl PredictHandler {
    /// Construct the handler from the default artifact path in the
    /// working directory.
    pub fn new() -> Result<Self> {
        Self::from_path(DEFAULT_ARTIFACT_PATH)
    }

    /// Construct the handler from the configured artifact path.
    pub fn from_config(config: &ServingConfig) -> Result<Self> {
        Self::from_path(&config.model.artifact_path)
    }

    /// Construct the handler from an explicit artifact path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        info!("Reading local KNN model for serving");
        let model = ModelLoader::new().load_model(path)?;
        info!(model = %model.name, "Initialization complete");
        Ok(Self { model })
    }

    /// Name of the loaded model.
    pub fn model_name(&self) -> &str {
        &self.model.name
    }

    /// Number of features each instance row must carry.
    pub fn feature_count(&self) -> usize {
        self.model.classifier.feature_count()
    }

    /// Serve a prediction request over a batch of instance rows.
    ///
    /// Returns one class-name string per row, in input order, ready for
    /// JSON serialization.
    pub fn predict(&self, instances: &[Vec<f64>]) -> Result<Vec<String>> {
        if instances.is_empty() {
            return Ok(Vec::new());
        }

        let rows = self.to_matrix(instances)?;
        let labels = self.model.classifier.predict_batch(&rows);

        debug!(
            model = %self.model.name,
            rows = instances.len(),
            "Prediction complete"
        );

        Ok(labels
            .into_iter()
            .map(|label| self.model.class_name(label).to_string())
            .collect())
    }

    /// Serve a classification request. Not backed by this model.
    pub fn classify(&self, _instances: &[Vec<f64>]) -> Result<Vec<String>> {
        bail!("not implemented")
    }

    /// Serve a regression request. Not backed by this model.
    pub fn regress(&self, _instances: &[Vec<f64>]) -> Result<Vec<String>> {
        bail!("not implemented")
    }

    /// Validate instance rows and pack them into a matrix.
    fn to_matrix(&self, instances: &[Vec<f64>]) -> Result<Array2<f64>> {
        let expected = self.feature_count();
        let mut flat = Vec::with_capacity(instances.len() * expected);

        for (index, row) in instances.iter().enumerate() {
            if row.len() != expected {
                bail!(
                    "instance {} has {} features, expected {}",
                    index,
                    row.len(),
                    expected
                );
            }
            if let Some(value) = row.iter().find(|v| !v.is_finite()) {
                bail!("instance {} contains non-finite value {}", index, value);
            }
            flat.extend_from_slice(row);
        }

        Array2::from_shape_vec((instances.len(), expected), flat)
            .map_err(|e| anyhow::anyhow!("Failed to shape instance batch: {}", e))
    }
}
