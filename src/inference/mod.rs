//! Pre-trained model boundary.
//!
//! Every model is an opaque capability: an ordered feature vector in, one
//! scalar out. Artifacts are loaded once at startup by `ModelRegistry` and
//! shared read-only for the life of the process.

pub mod artifact;
pub mod mock;
#[cfg(feature = "onnx-models")]
pub mod onnx;
pub mod registry;

use std::path::PathBuf;

use thiserror::Error;

pub use artifact::LinearModel;
pub use mock::{FailingModel, FixedModel, RecordingModel};
pub use registry::{LoadedModelInfo, ModelRegistry};

#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Model artifact not found for '{key}' (looked for {candidates:?})")]
    ArtifactNotFound { key: String, candidates: Vec<PathBuf> },

    #[error("Invalid model artifact {path}: {reason}")]
    InvalidArtifact { path: PathBuf, reason: String },

    #[error("Model '{key}' expects {found} features but its form declares {expected}")]
    Incompatible {
        key: String,
        expected: usize,
        found: usize,
    },

    #[error("Model initialization: {0}")]
    ModelInit(String),

    #[error("Feature vector has {found} values, model expects {expected}")]
    Shape { expected: usize, found: usize },

    #[error("Feature {index} is not a finite number")]
    NonFinite { index: usize },

    #[error("Inference failed: {0}")]
    Runtime(String),
}

/// Vector-in, scalar-out inference capability.
pub trait InferenceModel: Send + Sync {
    /// Run the model on a single row.
    fn infer(&self, features: &[f64]) -> Result<f64, InferenceError>;

    /// Number of input features, when the artifact declares it.
    fn n_features(&self) -> Option<usize>;

    /// Short name of the artifact format, for logs and health output.
    fn format(&self) -> &'static str;
}

/// Reject vectors a model cannot meaningfully consume.
pub(crate) fn check_features(features: &[f64], expected: usize) -> Result<(), InferenceError> {
    if features.len() != expected {
        return Err(InferenceError::Shape {
            expected,
            found: features.len(),
        });
    }
    if let Some(index) = features.iter().position(|v| !v.is_finite()) {
        return Err(InferenceError::NonFinite { index });
    }
    Ok(())
}

/// Row width declared by a `[batch, features]` input shape: the last
/// dimension when it is concrete. Symbolic dimensions are negative.
#[cfg_attr(not(feature = "onnx-models"), allow(dead_code))]
pub(crate) fn input_width(shape: &[i64]) -> Option<usize> {
    shape
        .last()
        .copied()
        .filter(|&dim| dim > 0)
        .and_then(|dim| usize::try_from(dim).ok())
}
