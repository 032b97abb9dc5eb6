//! On-disk schema for the serialized KNN model

use chrono::{DateTime, Utc};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Default artifact filename, resolved against the working directory.
pub const DEFAULT_ARTIFACT_PATH: &str = "./iris_knn.json";

/// Serialized k-nearest-neighbors classifier.
///
/// Written by the `train` binary and read back by the model loader. The
/// training matrix is stored row-per-sample with one label per row; labels
/// index into `class_names`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnnArtifact {
    /// Human-readable model identifier
    pub model_name: String,

    /// Number of neighbors consulted per prediction
    pub k: usize,

    /// Feature names, in input-row order
    pub feature_names: Vec<String>,

    /// Class names; prediction labels index into this list
    pub class_names: Vec<String>,

    /// Training matrix, shape [n_samples, n_features]
    pub samples: Array2<f64>,

    /// One class label per training row
    pub labels: Vec<usize>,

    /// When the model was trained
    pub trained_at: DateTime<Utc>,
}

impl KnnArtifact {
    /// Number of features each input row must carry.
    pub fn feature_count(&self) -> usize {
        self.samples.ncols()
    }

    /// Number of training samples in the artifact.
    pub fn sample_count(&self) -> usize {
        self.samples.nrows()
    }
}
