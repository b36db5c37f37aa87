//! Shared types for the HTTP layer.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::core_state::CoreState;
use crate::forms::{FormDefinition, FormId};
use crate::pipeline::{CollectedInput, FieldWarning, PredictionResult, RawInput};
use crate::session::FormSession;

/// Shared context for all routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
}

impl ApiContext {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self { core }
    }

    /// Resolve a form slug from a path segment.
    pub fn form_by_slug(&self, slug: &str) -> Option<&FormDefinition> {
        self.core.catalog().by_slug(slug)
    }
}

// ═══════════════════════════════════════════════════════════
// Forms
// ═══════════════════════════════════════════════════════════

/// Side-menu entry.
#[derive(Debug, Serialize)]
pub struct FormSummary {
    pub slug: &'static str,
    pub title: &'static str,
    pub heading: &'static str,
    pub field_count: usize,
}

impl From<&FormDefinition> for FormSummary {
    fn from(form: &FormDefinition) -> Self {
        Self {
            slug: form.id.slug(),
            title: form.id.menu_title(),
            heading: form.heading,
            field_count: form.field_count(),
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Sessions
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
pub struct SelectFormRequest {
    pub form: String,
}

/// Raw field values. JSON scalars are accepted and kept as the text a
/// user would have typed: `33` and `"33"` are the same entry.
#[derive(Debug, Deserialize)]
pub struct FieldsRequest {
    pub values: HashMap<String, serde_json::Value>,
}

impl FieldsRequest {
    /// Text form of every value. `null` clears a field; arrays and objects
    /// are rejected.
    pub fn into_raw(self) -> Result<RawInput, ApiError> {
        self.values
            .into_iter()
            .map(|(name, value)| {
                let text = match value {
                    serde_json::Value::String(text) => text,
                    serde_json::Value::Number(n) => n.to_string(),
                    serde_json::Value::Bool(b) => b.to_string(),
                    serde_json::Value::Null => String::new(),
                    serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                        return Err(ApiError::BadRequest(format!(
                            "Value for '{name}' must be a string or number"
                        )));
                    }
                };
                Ok((name, text))
            })
            .collect()
    }
}

/// Current state of a session as seen by the client.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub active_form: FormId,
    pub values: HashMap<String, String>,
    pub warnings: Vec<FieldWarning>,
    pub coerced: usize,
    pub declared: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_result: Option<PredictionResult>,
}

impl SessionView {
    pub fn build(session: &FormSession, form: &FormDefinition) -> Self {
        let input = CollectedInput::collect(form, session.raw());
        Self {
            session_id: session.id(),
            created_at: session.created_at(),
            last_seen: session.last_seen(),
            active_form: session.active_form(),
            values: session.raw().clone(),
            warnings: input.warnings(),
            coerced: input.coerced_count(),
            declared: form.field_count(),
            last_result: session.last_result().cloned(),
        }
    }
}

/// Response to a field update: immediate per-field feedback.
#[derive(Debug, Serialize)]
pub struct FieldReport {
    pub accepted: usize,
    pub warnings: Vec<FieldWarning>,
    pub coerced: usize,
    pub declared: usize,
    pub complete: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: serde_json::Value) -> FieldsRequest {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn scalar_values_become_text() {
        let raw = request(serde_json::json!({
            "values": {"Age": 33, "BMI": 28.5, "Sex": "male", "Smoker": true, "Glucose": null}
        }))
        .into_raw()
        .unwrap();
        assert_eq!(raw["Age"], "33");
        assert_eq!(raw["BMI"], "28.5");
        assert_eq!(raw["Sex"], "male");
        assert_eq!(raw["Smoker"], "true");
        assert_eq!(raw["Glucose"], "");
    }

    #[test]
    fn nested_value_is_bad_request() {
        let err = request(serde_json::json!({"values": {"Age": [33]}}))
            .into_raw()
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(msg) if msg.contains("'Age'")));
    }
}
