//! Model loading, classification, and training

pub mod dataset;
pub mod knn;
pub mod loader;
pub mod train;

pub use knn::KnnClassifier;
pub use loader::{LoadedModel, ModelLoader};
