//! Type definitions for the serving handler

pub mod artifact;
pub mod request;

pub use artifact::KnnArtifact;
pub use request::{InferenceRequest, InferenceResponse};
