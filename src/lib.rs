//! Iris Flower Classifier Serving Fixture
//!
//! A local serving handler for a k-nearest-neighbors iris classifier.
//! Loads a pre-trained model artifact from disk and exposes the serving
//! harness's construct-then-call contract.

pub mod config;
pub mod handler;
pub mod metrics;
pub mod models;
pub mod types;

pub use config::ServingConfig;
pub use handler::PredictHandler;
pub use metrics::HandlerMetrics;
pub use models::{KnnClassifier, LoadedModel, ModelLoader};
pub use types::{InferenceRequest, InferenceResponse, KnnArtifact};
