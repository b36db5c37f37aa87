//! ONNX artifacts, behind the `onnx-models` feature.
//!
//! Estimators exported with a single float input of shape `[1, n]` and a
//! label or value as first output. Integer label outputs (typical for
//! converted classifiers) and float outputs are both accepted.

use std::path::Path;
use std::sync::Mutex;

use ort::session::Session;
use ort::value::ValueType;

use super::{check_features, input_width, InferenceError, InferenceModel};

/// Model executed through ONNX Runtime.
///
/// Uses interior mutability (Mutex) because `Session::run` requires `&mut self`
/// while `InferenceModel` exposes `&self` for shared use across requests.
pub struct OnnxModel {
    session: Mutex<Session>,
    n_features: Option<usize>,
}

impl OnnxModel {
    /// Load an ONNX graph. The feature count is read from the first input's
    /// last dimension; `fallback_features` is used only when that dimension
    /// is symbolic.
    pub fn load(path: &Path, fallback_features: Option<usize>) -> Result<Self, InferenceError> {
        if !path.exists() {
            return Err(InferenceError::InvalidArtifact {
                path: path.to_path_buf(),
                reason: "file does not exist".into(),
            });
        }

        let session = Session::builder()
            .map_err(|e: ort::Error| InferenceError::ModelInit(e.to_string()))?
            .with_intra_threads(1)
            .map_err(|e: ort::Error| InferenceError::ModelInit(e.to_string()))?
            .commit_from_file(path)
            .map_err(|e: ort::Error| InferenceError::ModelInit(format!("ONNX load failed: {e}")))?;

        let declared = session
            .inputs
            .first()
            .and_then(|input| match &input.input_type {
                ValueType::Tensor { shape, .. } => input_width(&shape[..]),
                _ => None,
            });
        let n_features = declared.or(fallback_features);

        tracing::info!(
            path = %path.display(),
            declared_width = ?declared,
            "ONNX model loaded"
        );

        Ok(Self {
            session: Mutex::new(session),
            n_features,
        })
    }
}

impl InferenceModel for OnnxModel {
    fn infer(&self, features: &[f64]) -> Result<f64, InferenceError> {
        use ort::value::TensorRef;

        if let Some(n) = self.n_features {
            check_features(features, n)?;
        }

        let row: Vec<f32> = features.iter().map(|&v| v as f32).collect();
        let array = ndarray::Array2::from_shape_vec((1, row.len()), row)
            .map_err(|e| InferenceError::Runtime(e.to_string()))?;
        let tensor = TensorRef::from_array_view(&array)
            .map_err(|e| InferenceError::Runtime(e.to_string()))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| InferenceError::Runtime("Session lock poisoned".to_string()))?;

        let outputs = session
            .run(ort::inputs![tensor])
            .map_err(|e| InferenceError::Runtime(format!("ONNX inference failed: {e}")))?;

        if let Ok((_, values)) = outputs[0].try_extract_tensor::<f32>() {
            return values
                .first()
                .map(|&v| f64::from(v))
                .ok_or_else(|| InferenceError::Runtime("empty float output".into()));
        }

        let (_, labels) = outputs[0]
            .try_extract_tensor::<i64>()
            .map_err(|e| InferenceError::Runtime(format!("Output extraction: {e}")))?;
        labels
            .first()
            .map(|&v| v as f64)
            .ok_or_else(|| InferenceError::Runtime("empty label output".into()))
    }

    fn n_features(&self) -> Option<usize> {
        self.n_features
    }

    fn format(&self) -> &'static str {
        "onnx"
    }
}
