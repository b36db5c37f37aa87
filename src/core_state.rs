//! Process-wide application state.
//!
//! `CoreState` holds the immutable form catalog and model registry (built
//! once before the server binds) and the per-session store. It is wrapped
//! in `Arc` at startup and shared by every request handler.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::forms::{FormCatalog, FormDefinition, FormId};
use crate::inference::{InferenceModel, ModelRegistry};
use crate::pipeline::{self, PredictionReport, RawInput};
use crate::session::SessionStore;

#[derive(Debug)]
pub struct CoreState {
    catalog: FormCatalog,
    /// Read-only after construction; no lock needed.
    models: ModelRegistry,
    /// In-progress input per interactive session.
    sessions: RwLock<SessionStore>,
    started_at: DateTime<Utc>,
}

impl CoreState {
    pub fn new(catalog: FormCatalog, models: ModelRegistry) -> Self {
        Self::with_sessions(catalog, models, SessionStore::new())
    }

    pub fn with_sessions(catalog: FormCatalog, models: ModelRegistry, sessions: SessionStore) -> Self {
        Self {
            catalog,
            models,
            sessions: RwLock::new(sessions),
            started_at: Utc::now(),
        }
    }

    pub fn catalog(&self) -> &FormCatalog {
        &self.catalog
    }

    pub fn form(&self, id: FormId) -> &FormDefinition {
        self.catalog.get(id)
    }

    pub fn models(&self) -> &ModelRegistry {
        &self.models
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Model serving `form`. Only absent when the registry was built
    /// partially (tests); `ModelRegistry::load` guarantees every key.
    pub fn model_for(&self, form: FormId) -> Result<&dyn InferenceModel, CoreError> {
        let key = self.form(form).model_key;
        self.models
            .get(key)
            .ok_or_else(|| CoreError::ModelUnavailable(key.to_string()))
    }

    /// Collect + dispatch for `form` against its model.
    pub fn predict(&self, form: FormId, raw: &RawInput) -> Result<PredictionReport, CoreError> {
        let model = self.model_for(form)?;
        Ok(pipeline::run(self.form(form), raw, model))
    }

    // ── Session access ──────────────────────────────────────

    pub fn read_sessions(&self) -> Result<RwLockReadGuard<'_, SessionStore>, CoreError> {
        self.sessions.read().map_err(|_| CoreError::LockPoisoned)
    }

    pub fn write_sessions(&self) -> Result<RwLockWriteGuard<'_, SessionStore>, CoreError> {
        self.sessions.write().map_err(|_| CoreError::LockPoisoned)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Internal lock error")]
    LockPoisoned,
    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),
    #[error("No model loaded for '{0}'")]
    ModelUnavailable(String),
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::inference::FixedModel;

    /// State with a constant-output model behind every form.
    pub(crate) fn state_with_output(output: f64) -> CoreState {
        let catalog = FormCatalog::standard();
        let models = FormId::ALL.map(|id| {
            let model: Arc<dyn InferenceModel> = Arc::new(FixedModel::new(output));
            (id.model_key().to_string(), model)
        });
        let registry = ModelRegistry::from_models(&catalog, models).unwrap();
        CoreState::new(catalog, registry)
    }

    #[test]
    fn every_form_has_a_model() {
        let state = state_with_output(1.0);
        for id in FormId::ALL {
            assert!(state.model_for(id).is_ok());
        }
    }

    #[test]
    fn missing_model_is_reported() {
        let catalog = FormCatalog::standard();
        let registry = ModelRegistry::from_models(&catalog, Vec::new()).unwrap();
        let state = CoreState::new(catalog, registry);
        assert!(matches!(
            state.model_for(FormId::Calories),
            Err(CoreError::ModelUnavailable(key)) if key == "calories"
        ));
    }

    #[test]
    fn predict_runs_pipeline() {
        let state = state_with_output(0.0);
        let raw: RawInput = state
            .form(FormId::BreastCancer)
            .fields
            .iter()
            .map(|f| (f.name.clone(), "1".to_string()))
            .collect();
        let report = state.predict(FormId::BreastCancer, &raw).unwrap();
        assert_eq!(report.outcome.message(), "Malignant Tumor");
    }

    #[test]
    fn sessions_start_empty() {
        let state = state_with_output(1.0);
        assert!(state.read_sessions().unwrap().is_empty());
        state.write_sessions().unwrap().create();
        assert_eq!(state.read_sessions().unwrap().len(), 1);
    }
}
