//! k-nearest-neighbors classifier over ndarray matrices

use anyhow::{bail, Result};
use ndarray::{Array2, ArrayView1};

/// In-memory k-nearest-neighbors classifier.
///
/// Prediction is a Euclidean-distance majority vote among the `k` nearest
/// training rows. Ties are broken in favor of the class whose nearest
/// neighbor is closest.
#[derive(Debug, Clone)]
pub struct KnnClassifier {
    k: usize,
    samples: Array2<f64>,
    labels: Vec<usize>,
    num_classes: usize,
}

impl KnnClassifier {
    /// Build a classifier from training data.
    ///
    /// `k` is clamped to the number of training rows. Labels must be dense
    /// class indices (`0..num_classes`).
    pub fn fit(k: usize, samples: Array2<f64>, labels: Vec<usize>, num_classes: usize) -> Result<Self> {
        if k == 0 {
            bail!("k must be at least 1");
        }
        if samples.nrows() == 0 {
            bail!("training set is empty");
        }
        if samples.nrows() != labels.len() {
            bail!(
                "training set has {} rows but {} labels",
                samples.nrows(),
                labels.len()
            );
        }
        if num_classes == 0 {
            bail!("num_classes must be at least 1");
        }
        if let Some(&label) = labels.iter().find(|&&l| l >= num_classes) {
            bail!("label {} out of range for {} classes", label, num_classes);
        }

        Ok(Self {
            k: k.min(samples.nrows()),
            samples,
            labels,
            num_classes,
        })
    }

    /// Effective number of neighbors consulted per prediction.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Number of features each input row must carry.
    pub fn feature_count(&self) -> usize {
        self.samples.ncols()
    }

    /// Number of classes the classifier votes over.
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Predict the class label for a single row.
    pub fn predict_row(&self, row: ArrayView1<'_, f64>) -> usize {
        // (squared distance, label) for every training row; sorting by
        // squared distance gives the same order as Euclidean.
        let mut neighbors: Vec<(f64, usize)> = self
            .samples
            .rows()
            .into_iter()
            .zip(self.labels.iter())
            .map(|(sample, &label)| {
                let dist = sample
                    .iter()
                    .zip(row.iter())
                    .map(|(a, b)| (a - b) * (a - b))
                    .sum::<f64>();
                (dist, label)
            })
            .collect();
        neighbors.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut votes = vec![0usize; self.num_classes];
        for &(_, label) in neighbors.iter().take(self.k) {
            votes[label] += 1;
        }

        let top = votes.iter().copied().max().unwrap_or(0);
        // Neighbors are distance-sorted, so the first label holding the top
        // vote count is the tied class with the closest neighbor.
        neighbors
            .iter()
            .take(self.k)
            .map(|&(_, label)| label)
            .find(|&label| votes[label] == top)
            .unwrap_or(0)
    }

    /// Predict class labels for a batch of rows.
    pub fn predict_batch(&self, rows: &Array2<f64>) -> Vec<usize> {
        rows.rows()
            .into_iter()
            .map(|row| self.predict_row(row))
            .collect()
    }

    /// Fraction of rows whose prediction matches the expected label.
    pub fn accuracy(&self, rows: &Array2<f64>, expected: &[usize]) -> f64 {
        if expected.is_empty() {
            return 0.0;
        }
        let correct = self
            .predict_batch(rows)
            .iter()
            .zip(expected.iter())
            .filter(|(predicted, expected)| predicted == expected)
            .count();
        correct as f64 / expected.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn two_cluster_classifier(k: usize) -> KnnClassifier {
        // Two well-separated clusters around (0, 0) and (10, 10).
        let samples = array![
            [0.0, 0.0],
            [0.5, 0.5],
            [0.0, 1.0],
            [10.0, 10.0],
            [10.5, 9.5],
            [9.0, 10.0],
        ];
        KnnClassifier::fit(k, samples, vec![0, 0, 0, 1, 1, 1], 2).unwrap()
    }

    #[test]
    fn test_predict_separated_clusters() {
        let model = two_cluster_classifier(3);

        assert_eq!(model.predict_row(array![0.2, 0.3].view()), 0);
        assert_eq!(model.predict_row(array![9.8, 10.2].view()), 1);
    }

    #[test]
    fn test_predict_batch_order_preserved() {
        let model = two_cluster_classifier(3);
        let rows = array![[10.0, 9.9], [0.1, 0.1], [9.5, 9.5]];

        assert_eq!(model.predict_batch(&rows), vec![1, 0, 1]);
    }

    #[test]
    fn test_tie_broken_by_nearest_neighbor() {
        // k=2 with one neighbor from each cluster; the query sits closer
        // to the class-1 cluster, so class 1 must win the tie.
        let samples = array![[0.0, 0.0], [6.0, 6.0]];
        let model = KnnClassifier::fit(2, samples, vec![0, 1], 2).unwrap();

        assert_eq!(model.predict_row(array![4.0, 4.0].view()), 1);
        assert_eq!(model.predict_row(array![1.0, 1.0].view()), 0);
    }

    #[test]
    fn test_k_clamped_to_sample_count() {
        let model = two_cluster_classifier(50);
        assert_eq!(model.k(), 6);
    }

    #[test]
    fn test_fit_rejects_zero_k() {
        let samples = array![[1.0], [2.0]];
        assert!(KnnClassifier::fit(0, samples, vec![0, 1], 2).is_err());
    }

    #[test]
    fn test_fit_rejects_label_row_mismatch() {
        let samples = array![[1.0], [2.0]];
        assert!(KnnClassifier::fit(1, samples, vec![0], 2).is_err());
    }

    #[test]
    fn test_fit_rejects_out_of_range_label() {
        let samples = array![[1.0], [2.0]];
        assert!(KnnClassifier::fit(1, samples, vec![0, 5], 2).is_err());
    }

    #[test]
    fn test_accuracy_on_training_data() {
        let model = two_cluster_classifier(1);
        let rows = array![[0.0, 0.0], [10.0, 10.0]];

        assert_eq!(model.accuracy(&rows, &[0, 1]), 1.0);
        assert_eq!(model.accuracy(&rows, &[1, 0]), 0.0);
    }
}
