//! KNN artifact loader

use crate::models::knn::KnnClassifier;
use crate::types::artifact::KnnArtifact;
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;
use tracing::info;

/// Loaded model with metadata
#[derive(Debug)]
pub struct LoadedModel {
    /// Model name from the artifact
    pub name: String,
    /// In-memory classifier built from the artifact
    pub classifier: KnnClassifier,
    /// Feature names, in input-row order
    pub feature_names: Vec<String>,
    /// Class names; prediction labels index into this list
    pub class_names: Vec<String>,
}

impl LoadedModel {
    /// Class name for a predicted label.
    pub fn class_name(&self, label: usize) -> &str {
        self.class_names
            .get(label)
            .map(String::as_str)
            .unwrap_or("unknown")
    }
}

/// Loader for serialized KNN artifacts
pub struct ModelLoader;

impl ModelLoader {
    /// Create a new model loader
    pub fn new() -> Self {
        Self
    }

    /// Load a model artifact from a JSON file on local disk
    pub fn load_model<P: AsRef<Path>>(&self, path: P) -> Result<LoadedModel> {
        let path = path.as_ref();

        info!(path = %path.display(), "Loading KNN model artifact");

        let raw = fs::read_to_string(path)
            .context(format!("Failed to read model artifact {:?}", path))?;
        let artifact: KnnArtifact = serde_json::from_str(&raw)
            .context(format!("Failed to parse model artifact {:?}", path))?;

        let model = self.build(artifact)?;

        info!(
            model = %model.name,
            k = model.classifier.k(),
            features = model.classifier.feature_count(),
            classes = model.class_names.len(),
            "Model loaded successfully"
        );

        Ok(model)
    }

    /// Validate an artifact and build the in-memory classifier from it
    pub fn build(&self, artifact: KnnArtifact) -> Result<LoadedModel> {
        if artifact.class_names.is_empty() {
            bail!("artifact {:?} declares no class names", artifact.model_name);
        }
        if artifact.feature_names.len() != artifact.feature_count() {
            bail!(
                "artifact {:?} names {} features but samples carry {}",
                artifact.model_name,
                artifact.feature_names.len(),
                artifact.feature_count()
            );
        }
        if artifact.samples.iter().any(|v| !v.is_finite()) {
            bail!(
                "artifact {:?} contains non-finite sample values",
                artifact.model_name
            );
        }

        let classifier = KnnClassifier::fit(
            artifact.k,
            artifact.samples,
            artifact.labels,
            artifact.class_names.len(),
        )
        .context(format!("Invalid artifact {:?}", artifact.model_name))?;

        Ok(LoadedModel {
            name: artifact.model_name,
            classifier,
            feature_names: artifact.feature_names,
            class_names: artifact.class_names,
        })
    }
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ndarray::array;

    fn sample_artifact() -> KnnArtifact {
        KnnArtifact {
            model_name: "iris_knn".to_string(),
            k: 1,
            feature_names: vec!["a".to_string(), "b".to_string()],
            class_names: vec!["zero".to_string(), "one".to_string()],
            samples: array![[0.0, 0.0], [5.0, 5.0]],
            labels: vec![0, 1],
            trained_at: Utc::now(),
        }
    }

    #[test]
    fn test_load_model_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("iris_knn.json");
        std::fs::write(&path, serde_json::to_string(&sample_artifact()).unwrap()).unwrap();

        let model = ModelLoader::new().load_model(&path).unwrap();

        assert_eq!(model.name, "iris_knn");
        assert_eq!(model.classifier.feature_count(), 2);
        assert_eq!(model.class_name(1), "one");
        assert_eq!(model.class_name(7), "unknown");
    }

    #[test]
    fn test_load_model_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ModelLoader::new()
            .load_model(dir.path().join("absent.json"))
            .unwrap_err();

        assert!(err.to_string().contains("Failed to read"));
    }

    #[test]
    fn test_load_model_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = ModelLoader::new().load_model(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_build_rejects_feature_name_mismatch() {
        let mut artifact = sample_artifact();
        artifact.feature_names.push("c".to_string());

        assert!(ModelLoader::new().build(artifact).is_err());
    }

    #[test]
    fn test_build_rejects_empty_class_names() {
        let mut artifact = sample_artifact();
        artifact.class_names.clear();
        artifact.labels = vec![0, 0];

        assert!(ModelLoader::new().build(artifact).is_err());
    }

    #[test]
    fn test_build_rejects_non_finite_samples() {
        let mut artifact = sample_artifact();
        artifact.samples[[0, 0]] = f64::NAN;

        assert!(ModelLoader::new().build(artifact).is_err());
    }
}
