//! Training routine for the iris KNN fixture model.
//!
//! Shuffles the data, holds out a test split, scans a range of `k` values
//! for the best held-out accuracy, then refits the winning `k` on the
//! full dataset.

use crate::models::dataset;
use crate::models::knn::KnnClassifier;
use crate::types::artifact::KnnArtifact;
use anyhow::{bail, Context, Result};
use chrono::Utc;
use ndarray::{Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::ops::RangeInclusive;
use tracing::{debug, info};

/// Result of a training run
pub struct TrainedModel {
    /// Serializable artifact, fitted on the full dataset
    pub artifact: KnnArtifact,
    /// Winning neighbor count
    pub best_k: usize,
    /// Held-out accuracy of the winning `k`
    pub test_accuracy: f64,
}

/// Split samples into shuffled train and test partitions.
///
/// Returns `(train_x, train_y, test_x, test_y)`.
pub fn train_test_split(
    samples: &Array2<f64>,
    labels: &[usize],
    test_fraction: f64,
    seed: u64,
) -> Result<(Array2<f64>, Vec<usize>, Array2<f64>, Vec<usize>)> {
    if !(0.0..1.0).contains(&test_fraction) || test_fraction == 0.0 {
        bail!("test_fraction must be in (0, 1), got {}", test_fraction);
    }
    if samples.nrows() != labels.len() {
        bail!(
            "sample count {} does not match label count {}",
            samples.nrows(),
            labels.len()
        );
    }

    let mut indices: Vec<usize> = (0..samples.nrows()).collect();
    indices.shuffle(&mut StdRng::seed_from_u64(seed));

    let test_size = ((samples.nrows() as f64) * test_fraction).round() as usize;
    if test_size == 0 || test_size == samples.nrows() {
        bail!(
            "test_fraction {} leaves an empty partition for {} rows",
            test_fraction,
            samples.nrows()
        );
    }

    let (test_idx, train_idx) = indices.split_at(test_size);
    let pick = |idx: &[usize]| -> (Array2<f64>, Vec<usize>) {
        (
            samples.select(Axis(0), idx),
            idx.iter().map(|&i| labels[i]).collect(),
        )
    };

    let (train_x, train_y) = pick(train_idx);
    let (test_x, test_y) = pick(test_idx);
    Ok((train_x, train_y, test_x, test_y))
}

/// Scan `k_range` for the best held-out accuracy on the embedded iris data,
/// then refit the winner on the full dataset.
pub fn train_iris(k_range: RangeInclusive<usize>, test_fraction: f64, seed: u64) -> Result<TrainedModel> {
    let samples = dataset::samples();
    let labels = dataset::labels();
    let num_classes = dataset::CLASS_NAMES.len();

    let (train_x, train_y, test_x, test_y) =
        train_test_split(&samples, &labels, test_fraction, seed)?;

    let mut best: Option<(usize, f64)> = None;
    for k in k_range {
        let candidate = KnnClassifier::fit(k, train_x.clone(), train_y.clone(), num_classes)
            .context(format!("Failed to fit candidate with k={}", k))?;
        let accuracy = candidate.accuracy(&test_x, &test_y);

        debug!(k = k, accuracy = accuracy, "Evaluated candidate");

        // Strict comparison keeps the smallest k on ties.
        if best.map_or(true, |(_, best_acc)| accuracy > best_acc) {
            best = Some((k, accuracy));
        }
    }

    let (best_k, test_accuracy) = match best {
        Some(found) => found,
        None => bail!("k range is empty"),
    };

    info!(
        best_k = best_k,
        test_accuracy = test_accuracy,
        "Selected neighbor count"
    );

    // Keep every row for the shipped model; the split only served selection.
    let artifact = KnnArtifact {
        model_name: "iris_knn".to_string(),
        k: best_k,
        feature_names: dataset::FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
        class_names: dataset::CLASS_NAMES.iter().map(|s| s.to_string()).collect(),
        samples,
        labels,
        trained_at: Utc::now(),
    };

    Ok(TrainedModel {
        artifact,
        best_k,
        test_accuracy,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::loader::ModelLoader;

    #[test]
    fn test_split_sizes_and_disjoint_rows() {
        let samples = dataset::samples();
        let labels = dataset::labels();

        let (train_x, train_y, test_x, test_y) =
            train_test_split(&samples, &labels, 0.2, 7).unwrap();

        assert_eq!(test_x.nrows(), 30);
        assert_eq!(train_x.nrows(), 120);
        assert_eq!(train_y.len(), 120);
        assert_eq!(test_y.len(), 30);
    }

    #[test]
    fn test_split_is_seeded() {
        let samples = dataset::samples();
        let labels = dataset::labels();

        let (a, _, _, _) = train_test_split(&samples, &labels, 0.2, 42).unwrap();
        let (b, _, _, _) = train_test_split(&samples, &labels, 0.2, 42).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn test_split_rejects_bad_fraction() {
        let samples = dataset::samples();
        let labels = dataset::labels();

        assert!(train_test_split(&samples, &labels, 0.0, 1).is_err());
        assert!(train_test_split(&samples, &labels, 1.0, 1).is_err());
    }

    #[test]
    fn test_train_iris_is_accurate() {
        let trained = train_iris(1..=10, 0.2, 42).unwrap();

        // Iris is nearly separable; anything below this means the scan broke.
        assert!(trained.test_accuracy >= 0.85);
        assert!(trained.best_k >= 1 && trained.best_k <= 10);
        assert_eq!(trained.artifact.sample_count(), 150);
    }

    #[test]
    fn test_trained_artifact_loads_and_predicts() {
        let trained = train_iris(1..=5, 0.2, 42).unwrap();
        let model = ModelLoader::new().build(trained.artifact).unwrap();

        // Unambiguous specimens for each species.
        let label = model
            .classifier
            .predict_row(ndarray::array![5.0, 3.4, 1.5, 0.2].view());
        assert_eq!(model.class_name(label), "setosa");

        let label = model
            .classifier
            .predict_row(ndarray::array![6.7, 3.0, 5.9, 2.2].view());
        assert_eq!(model.class_name(label), "virginica");
    }

    #[test]
    fn test_train_iris_rejects_empty_k_range() {
        #[allow(clippy::reversed_empty_ranges)]
        let result = train_iris(5..=1, 0.2, 42);
        assert!(result.is_err());
    }
}
