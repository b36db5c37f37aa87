//! Eager, fail-fast loading of every form's model artifact.
//!
//! The registry is built once before the server binds and is immutable
//! afterwards. A missing, unreadable or mis-sized artifact aborts startup
//! instead of surfacing on the first prediction.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use sha2::{Digest, Sha256};

use super::{InferenceError, InferenceModel, LinearModel};
use crate::forms::{FormCatalog, FormDefinition};

/// What was loaded for one model key. Reported by the health endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct LoadedModelInfo {
    pub key: String,
    pub format: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

pub struct ModelRegistry {
    models: HashMap<String, Arc<dyn InferenceModel>>,
    info: Vec<LoadedModelInfo>,
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("models", &self.info)
            .finish()
    }
}

impl ModelRegistry {
    /// Load the artifact of every form in the catalog from `dir`.
    pub fn load(dir: &Path, catalog: &FormCatalog) -> Result<Self, InferenceError> {
        let mut models: HashMap<String, Arc<dyn InferenceModel>> = HashMap::new();
        let mut info = Vec::new();

        for form in catalog.iter() {
            let (model, path) = load_artifact(dir, form)?;
            ensure_compatible(form, model.as_ref())?;

            let sha256 = fingerprint(&path)?;
            tracing::info!(
                key = form.model_key,
                format = model.format(),
                path = %path.display(),
                %sha256,
                "Model loaded"
            );

            info.push(LoadedModelInfo {
                key: form.model_key.to_string(),
                format: model.format().to_string(),
                path: Some(path),
                sha256: Some(sha256),
            });
            models.insert(form.model_key.to_string(), Arc::from(model));
        }

        Ok(Self { models, info })
    }

    /// Build from already-constructed models (tests, embedding).
    ///
    /// Applies the same compatibility check as `load` for every form whose
    /// key is present.
    pub fn from_models<I>(catalog: &FormCatalog, models: I) -> Result<Self, InferenceError>
    where
        I: IntoIterator<Item = (String, Arc<dyn InferenceModel>)>,
    {
        let models: HashMap<String, Arc<dyn InferenceModel>> = models.into_iter().collect();
        let mut info = Vec::new();
        for form in catalog.iter() {
            if let Some(model) = models.get(form.model_key) {
                ensure_compatible(form, model.as_ref())?;
                info.push(LoadedModelInfo {
                    key: form.model_key.to_string(),
                    format: model.format().to_string(),
                    path: None,
                    sha256: None,
                });
            }
        }
        Ok(Self { models, info })
    }

    pub fn get(&self, key: &str) -> Option<&dyn InferenceModel> {
        self.models.get(key).map(|m| m.as_ref())
    }

    pub fn loaded(&self) -> &[LoadedModelInfo] {
        &self.info
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

fn candidates(dir: &Path, stem: &str) -> Vec<PathBuf> {
    let mut paths = vec![dir.join(format!("{stem}.json"))];
    if cfg!(feature = "onnx-models") {
        paths.push(dir.join(format!("{stem}.onnx")));
    }
    paths
}

fn load_artifact(
    dir: &Path,
    form: &FormDefinition,
) -> Result<(Box<dyn InferenceModel>, PathBuf), InferenceError> {
    let paths = candidates(dir, form.artifact_stem);
    let Some(path) = paths.iter().find(|p| p.is_file()).cloned() else {
        return Err(InferenceError::ArtifactNotFound {
            key: form.model_key.to_string(),
            candidates: paths,
        });
    };

    #[cfg(feature = "onnx-models")]
    if path.extension().is_some_and(|e| e == "onnx") {
        let model = super::onnx::OnnxModel::load(&path, Some(form.field_count()))?;
        return Ok((Box::new(model), path));
    }

    let model = LinearModel::load(&path)?;
    Ok((Box::new(model), path))
}

fn ensure_compatible(form: &FormDefinition, model: &dyn InferenceModel) -> Result<(), InferenceError> {
    match model.n_features() {
        Some(found) if found != form.field_count() => Err(InferenceError::Incompatible {
            key: form.model_key.to_string(),
            expected: form.field_count(),
            found,
        }),
        _ => Ok(()),
    }
}

/// SHA-256 of an artifact file, for provenance in logs.
fn fingerprint(path: &Path) -> Result<String, InferenceError> {
    let bytes = std::fs::read(path).map_err(|source| InferenceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(format!("sha256:{:x}", Sha256::digest(&bytes)))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::forms::{FormDefinition, FormId, ResultRule};
    use crate::inference::FixedModel;

    /// Write a valid JSON artifact for `form` into `dir`.
    pub(crate) fn write_artifact(dir: &Path, form: &FormDefinition, n: usize) {
        let body = match form.rule {
            ResultRule::Binary { .. } => serde_json::json!({
                "type": "logistic_regression",
                "coefficients": vec![0.01; n],
                "intercept": -1.0,
            }),
            ResultRule::Estimate { .. } => serde_json::json!({
                "type": "linear_regression",
                "coefficients": vec![1.0; n],
                "intercept": 0.5,
            }),
        };
        std::fs::write(
            dir.join(format!("{}.json", form.artifact_stem)),
            serde_json::to_vec(&body).unwrap(),
        )
        .unwrap();
    }

    pub(crate) fn write_all_artifacts(dir: &Path, catalog: &FormCatalog) {
        for form in catalog.iter() {
            write_artifact(dir, form, form.field_count());
        }
    }

    #[test]
    fn loads_every_form() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = FormCatalog::standard();
        write_all_artifacts(dir.path(), &catalog);

        let registry = ModelRegistry::load(dir.path(), &catalog).unwrap();
        assert_eq!(registry.len(), 6);
        for id in FormId::ALL {
            assert!(registry.get(id.model_key()).is_some(), "missing {id}");
        }
        for info in registry.loaded() {
            assert!(info.sha256.as_deref().unwrap().starts_with("sha256:"));
            assert!(info.format.starts_with("json:"));
        }
    }

    #[test]
    fn missing_artifact_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = FormCatalog::standard();
        write_all_artifacts(dir.path(), &catalog);
        let calories = catalog.get(FormId::Calories);
        std::fs::remove_file(dir.path().join(format!("{}.json", calories.artifact_stem))).unwrap();

        let err = ModelRegistry::load(dir.path(), &catalog).unwrap_err();
        match err {
            InferenceError::ArtifactNotFound { key, candidates } => {
                assert_eq!(key, "calories");
                assert!(!candidates.is_empty());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn mis_sized_artifact_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = FormCatalog::standard();
        write_all_artifacts(dir.path(), &catalog);
        write_artifact(dir.path(), catalog.get(FormId::Diabetes), 7);

        let err = ModelRegistry::load(dir.path(), &catalog).unwrap_err();
        assert!(matches!(
            err,
            InferenceError::Incompatible { expected: 8, found: 7, .. }
        ));
    }

    #[test]
    fn corrupt_artifact_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = FormCatalog::standard();
        write_all_artifacts(dir.path(), &catalog);
        let heart = catalog.get(FormId::HeartDisease);
        std::fs::write(
            dir.path().join(format!("{}.json", heart.artifact_stem)),
            b"\x80\x04pickle",
        )
        .unwrap();

        let err = ModelRegistry::load(dir.path(), &catalog).unwrap_err();
        assert!(matches!(err, InferenceError::InvalidArtifact { .. }));
    }

    #[test]
    fn from_models_checks_declared_features() {
        let catalog = FormCatalog::standard();
        let bad: Arc<dyn InferenceModel> = Arc::new(FixedModel::new(1.0).with_features(3));
        let err = ModelRegistry::from_models(&catalog, [("diabetes".to_string(), bad)]).unwrap_err();
        assert!(matches!(err, InferenceError::Incompatible { .. }));

        let ok: Arc<dyn InferenceModel> = Arc::new(FixedModel::new(1.0));
        let registry = ModelRegistry::from_models(&catalog, [("diabetes".to_string(), ok)]).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.get("heart").is_none());
    }
}
