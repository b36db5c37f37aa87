//! Predictor dispatch: completeness gate → ordered vector → model → message.

use serde::Serialize;

use super::collect::CollectedInput;
use crate::forms::FormId;
use crate::inference::InferenceModel;

/// Shown when the model itself fails. Kept apart from the incompleteness
/// warning so a broken artifact is not mistaken for bad input.
pub const INFERENCE_FAILED_MESSAGE: &str =
    "The prediction could not be computed. Please try again.";

/// Ordered feature vector for one form. Only constructible from complete input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRequest {
    form: FormId,
    features: Vec<f64>,
}

impl PredictionRequest {
    /// `None` unless every declared field coerced; the vector length then
    /// equals the form's field count.
    pub fn from_input(input: &CollectedInput<'_>) -> Option<Self> {
        let features = input.ordered_values()?;
        if features.len() != input.form().field_count() {
            return None;
        }
        Some(Self {
            form: input.form().id,
            features,
        })
    }

    pub fn form(&self) -> FormId {
        self.form
    }

    pub fn features(&self) -> &[f64] {
        &self.features
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub form: FormId,
    pub output: f64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DispatchOutcome {
    Success {
        #[serde(flatten)]
        result: PredictionResult,
    },
    /// Completeness gate refused; the model was not called.
    Incomplete {
        message: String,
        missing: Vec<String>,
        invalid: Vec<String>,
    },
    /// The model was called and failed.
    InferenceFailed { message: String },
}

impl DispatchOutcome {
    pub fn result(&self) -> Option<&PredictionResult> {
        match self {
            DispatchOutcome::Success { result } => Some(result),
            _ => None,
        }
    }

    /// Text for the message area: the result on success, the warning otherwise.
    pub fn message(&self) -> &str {
        match self {
            DispatchOutcome::Success { result } => &result.message,
            DispatchOutcome::Incomplete { message, .. }
            | DispatchOutcome::InferenceFailed { message } => message,
        }
    }
}

/// Run the form's model on the collected input.
///
/// Pure over `input`: calling it again with the same input and model gives
/// the same outcome.
pub fn dispatch(input: &CollectedInput<'_>, model: &dyn InferenceModel) -> DispatchOutcome {
    let form = input.form();

    let Some(request) = PredictionRequest::from_input(input) else {
        tracing::warn!(
            form = %form.id,
            coerced = input.coerced_count(),
            declared = form.field_count(),
            "Dispatch refused: form incomplete"
        );
        return DispatchOutcome::Incomplete {
            message: form.incomplete_message.to_string(),
            missing: input.missing(),
            invalid: input.invalid(),
        };
    };

    match model.infer(request.features()) {
        Ok(output) => {
            let message = form.rule.interpret(output);
            tracing::info!(form = %form.id, output, "Prediction completed");
            DispatchOutcome::Success {
                result: PredictionResult {
                    form: form.id,
                    output,
                    message,
                },
            }
        }
        Err(e) => {
            tracing::error!(form = %form.id, error = %e, "Inference failed");
            DispatchOutcome::InferenceFailed {
                message: INFERENCE_FAILED_MESSAGE.to_string(),
            }
        }
    }
}
