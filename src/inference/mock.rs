use std::sync::Mutex;

use super::{InferenceError, InferenceModel};

/// Mock model returning a constant. Stands in for an artifact in tests.
pub struct FixedModel {
    output: f64,
    n_features: Option<usize>,
}

impl FixedModel {
    pub fn new(output: f64) -> Self {
        Self {
            output,
            n_features: None,
        }
    }

    /// Declare a feature count so registry compatibility checks apply.
    pub fn with_features(mut self, n: usize) -> Self {
        self.n_features = Some(n);
        self
    }
}

impl InferenceModel for FixedModel {
    fn infer(&self, _features: &[f64]) -> Result<f64, InferenceError> {
        Ok(self.output)
    }

    fn n_features(&self) -> Option<usize> {
        self.n_features
    }

    fn format(&self) -> &'static str {
        "mock:fixed"
    }
}

/// Mock model that remembers every vector it was called with.
pub struct RecordingModel {
    output: f64,
    calls: Mutex<Vec<Vec<f64>>>,
}

impl RecordingModel {
    pub fn new(output: f64) -> Self {
        Self {
            output,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Vec<f64>> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl InferenceModel for RecordingModel {
    fn infer(&self, features: &[f64]) -> Result<f64, InferenceError> {
        self.calls
            .lock()
            .map_err(|_| InferenceError::Runtime("call log lock poisoned".into()))?
            .push(features.to_vec());
        Ok(self.output)
    }

    fn n_features(&self) -> Option<usize> {
        None
    }

    fn format(&self) -> &'static str {
        "mock:recording"
    }
}

/// Mock model whose every call fails.
pub struct FailingModel;

impl InferenceModel for FailingModel {
    fn infer(&self, _features: &[f64]) -> Result<f64, InferenceError> {
        Err(InferenceError::Runtime("model rejected input".into()))
    }

    fn n_features(&self) -> Option<usize> {
        None
    }

    fn format(&self) -> &'static str {
        "mock:failing"
    }
}
