//! Wire types for the serving harness contract

use serde::{Deserialize, Serialize};

/// Inference request as posted by the serving harness.
///
/// Each instance is one flower measurement row in the order expected by
/// the model (sepal length, sepal width, petal length, petal width).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceRequest {
    /// Batch of input rows
    pub instances: Vec<Vec<f64>>,
}

/// Inference response returned to the serving harness.
///
/// Predictions are plain class-name strings so the response serializes
/// to JSON without any further conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceResponse {
    /// One predicted class name per input row
    pub predictions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_deserialization() {
        let json = r#"{"instances": [[5.1, 3.5, 1.4, 0.2], [6.3, 2.9, 5.6, 1.8]]}"#;
        let request: InferenceRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.instances.len(), 2);
        assert_eq!(request.instances[0], vec![5.1, 3.5, 1.4, 0.2]);
    }

    #[test]
    fn test_response_serialization() {
        let response = InferenceResponse {
            predictions: vec!["setosa".to_string(), "virginica".to_string()],
        };

        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"predictions":["setosa","virginica"]}"#);
    }
}
