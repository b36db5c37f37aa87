//! Portable JSON model artifacts.
//!
//! A fitted linear estimator reduces to coefficients, an intercept and
//! (optionally) the standard scaler fitted in front of it. Exporting those
//! to JSON makes the trained model loadable without its training runtime.
//!
//! ```json
//! { "type": "logistic_regression",
//!   "coefficients": [0.12, 0.03],
//!   "intercept": -4.1,
//!   "classes": [0, 1],
//!   "scaler": { "mean": [3.8, 120.9], "scale": [3.3, 31.9] } }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{check_features, InferenceError, InferenceModel};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegressorParams {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default)]
    pub scaler: Option<Scaler>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassifierParams {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    /// `[negative, positive]` labels; the positive one wins when the decision is > 0.
    #[serde(default = "default_classes")]
    pub classes: [f64; 2],
    #[serde(default)]
    pub scaler: Option<Scaler>,
}

fn default_classes() -> [f64; 2] {
    [0.0, 1.0]
}

/// On-disk artifact, tagged by estimator type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ArtifactFile {
    LinearRegression(RegressorParams),
    LogisticRegression(ClassifierParams),
    LinearSvc(ClassifierParams),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinearKind {
    Regressor,
    Classifier { svm: bool },
}

/// Linear estimator loaded from an `ArtifactFile`.
#[derive(Debug, Clone)]
pub struct LinearModel {
    kind: LinearKind,
    coefficients: Vec<f64>,
    intercept: f64,
    classes: [f64; 2],
    scaler: Option<Scaler>,
}

impl LinearModel {
    /// Read and validate a JSON artifact.
    pub fn load(path: &Path) -> Result<Self, InferenceError> {
        let bytes = std::fs::read(path).map_err(|source| InferenceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&bytes).map_err(|reason| InferenceError::InvalidArtifact {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// Parse and validate artifact bytes. Errors are human-readable reasons.
    pub fn from_json(bytes: &[u8]) -> Result<Self, String> {
        let file: ArtifactFile = serde_json::from_slice(bytes).map_err(|e| e.to_string())?;
        Self::from_artifact(file)
    }

    pub fn from_artifact(file: ArtifactFile) -> Result<Self, String> {
        let model = match file {
            ArtifactFile::LinearRegression(p) => Self {
                kind: LinearKind::Regressor,
                coefficients: p.coefficients,
                intercept: p.intercept,
                classes: default_classes(),
                scaler: p.scaler,
            },
            ArtifactFile::LogisticRegression(p) => Self {
                kind: LinearKind::Classifier { svm: false },
                coefficients: p.coefficients,
                intercept: p.intercept,
                classes: p.classes,
                scaler: p.scaler,
            },
            ArtifactFile::LinearSvc(p) => Self {
                kind: LinearKind::Classifier { svm: true },
                coefficients: p.coefficients,
                intercept: p.intercept,
                classes: p.classes,
                scaler: p.scaler,
            },
        };
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<(), String> {
        if self.coefficients.is_empty() {
            return Err("coefficients must not be empty".into());
        }
        if self.coefficients.iter().any(|c| !c.is_finite()) || !self.intercept.is_finite() {
            return Err("coefficients and intercept must be finite".into());
        }
        if let Some(scaler) = &self.scaler {
            let n = self.coefficients.len();
            if scaler.mean.len() != n || scaler.scale.len() != n {
                return Err(format!(
                    "scaler has {}/{} entries for {n} coefficients",
                    scaler.mean.len(),
                    scaler.scale.len()
                ));
            }
            if scaler.scale.iter().any(|s| *s == 0.0 || !s.is_finite()) {
                return Err("scaler scale entries must be finite and non-zero".into());
            }
        }
        Ok(())
    }

    pub fn kind(&self) -> LinearKind {
        self.kind
    }

    fn decision(&self, features: &[f64]) -> f64 {
        let dot: f64 = match &self.scaler {
            Some(s) => features
                .iter()
                .zip(&s.mean)
                .zip(&s.scale)
                .zip(&self.coefficients)
                .map(|(((x, m), sd), w)| (x - m) / sd * w)
                .sum(),
            None => features
                .iter()
                .zip(&self.coefficients)
                .map(|(x, w)| x * w)
                .sum(),
        };
        dot + self.intercept
    }
}

impl InferenceModel for LinearModel {
    fn infer(&self, features: &[f64]) -> Result<f64, InferenceError> {
        check_features(features, self.coefficients.len())?;
        let decision = self.decision(features);
        match self.kind {
            LinearKind::Regressor => Ok(decision),
            LinearKind::Classifier { .. } => Ok(if decision > 0.0 {
                self.classes[1]
            } else {
                self.classes[0]
            }),
        }
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.coefficients.len())
    }

    fn format(&self) -> &'static str {
        match self.kind {
            LinearKind::Regressor => "json:linear_regression",
            LinearKind::Classifier { svm: false } => "json:logistic_regression",
            LinearKind::Classifier { svm: true } => "json:linear_svc",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regression_is_dot_plus_intercept() {
        let model = LinearModel::from_json(
            br#"{"type":"linear_regression","coefficients":[2.0,3.0],"intercept":1.0}"#,
        )
        .unwrap();
        assert_eq!(model.infer(&[1.0, 1.0]).unwrap(), 6.0);
        assert_eq!(model.format(), "json:linear_regression");
        assert_eq!(model.n_features(), Some(2));
    }

    #[test]
    fn classifier_picks_positive_on_positive_decision() {
        let model = LinearModel::from_json(
            br#"{"type":"logistic_regression","coefficients":[1.0],"intercept":-5.0}"#,
        )
        .unwrap();
        assert_eq!(model.infer(&[10.0]).unwrap(), 1.0);
        assert_eq!(model.infer(&[1.0]).unwrap(), 0.0);
        // Decision exactly zero falls to the negative class.
        assert_eq!(model.infer(&[5.0]).unwrap(), 0.0);
    }

    #[test]
    fn custom_class_labels_are_returned() {
        let model = LinearModel::from_json(
            br#"{"type":"linear_svc","coefficients":[1.0],"intercept":0.0,"classes":[4.0,2.0]}"#,
        )
        .unwrap();
        assert_eq!(model.infer(&[1.0]).unwrap(), 2.0);
        assert_eq!(model.infer(&[-1.0]).unwrap(), 4.0);
        assert_eq!(model.kind(), LinearKind::Classifier { svm: true });
    }

    #[test]
    fn scaler_is_applied_before_coefficients() {
        let model = LinearModel::from_json(
            br#"{"type":"linear_regression","coefficients":[1.0],"intercept":0.0,
                 "scaler":{"mean":[10.0],"scale":[2.0]}}"#,
        )
        .unwrap();
        assert_eq!(model.infer(&[14.0]).unwrap(), 2.0);
    }

    #[test]
    fn rejects_unknown_type() {
        let err = LinearModel::from_json(br#"{"type":"random_forest"}"#).unwrap_err();
        assert!(err.contains("random_forest"), "{err}");
    }

    #[test]
    fn rejects_empty_coefficients() {
        let err = LinearModel::from_json(
            br#"{"type":"linear_regression","coefficients":[],"intercept":0.0}"#,
        )
        .unwrap_err();
        assert!(err.contains("empty"));
    }

    #[test]
    fn rejects_mismatched_scaler() {
        let err = LinearModel::from_json(
            br#"{"type":"linear_regression","coefficients":[1.0,1.0],"intercept":0.0,
                 "scaler":{"mean":[0.0],"scale":[1.0]}}"#,
        )
        .unwrap_err();
        assert!(err.contains("scaler"));
    }

    #[test]
    fn rejects_zero_scale() {
        let err = LinearModel::from_json(
            br#"{"type":"linear_regression","coefficients":[1.0],"intercept":0.0,
                 "scaler":{"mean":[0.0],"scale":[0.0]}}"#,
        )
        .unwrap_err();
        assert!(err.contains("non-zero"));
    }

    #[test]
    fn infer_rejects_wrong_length() {
        let model = LinearModel::from_json(
            br#"{"type":"linear_regression","coefficients":[1.0,1.0],"intercept":0.0}"#,
        )
        .unwrap();
        assert!(matches!(
            model.infer(&[1.0]),
            Err(InferenceError::Shape { expected: 2, found: 1 })
        ));
    }

    #[test]
    fn load_reports_path_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let err = LinearModel::load(&path).unwrap_err();
        assert!(matches!(err, InferenceError::Io { .. }));
    }

    #[test]
    fn load_reports_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, b"{not json").unwrap();
        let err = LinearModel::load(&path).unwrap_err();
        assert!(matches!(err, InferenceError::InvalidArtifact { .. }));
    }
}
