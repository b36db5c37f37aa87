//! The prediction pipeline shared by every form:
//! collect → coerce → (on trigger) dispatch → interpret → export.
//!
//! Each stage is parameterised by a `FormDefinition`; no stage keeps state
//! between calls.

pub mod coerce;
pub mod collect;
pub mod dispatch;
pub mod export;

use serde::Serialize;

pub use coerce::{coerce, FieldValue};
pub use collect::{CollectedInput, FieldWarning, RawInput};
pub use dispatch::{
    dispatch, DispatchOutcome, PredictionRequest, PredictionResult, INFERENCE_FAILED_MESSAGE,
};
pub use export::{export_result, ExportError, ExportedDocument};

use crate::forms::FormDefinition;
use crate::inference::InferenceModel;

/// Field warnings plus the dispatch outcome for one explicit Predict.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionReport {
    pub warnings: Vec<FieldWarning>,
    pub outcome: DispatchOutcome,
}

/// Collect `raw` against `form` and dispatch to `model`.
pub fn run(form: &FormDefinition, raw: &RawInput, model: &dyn InferenceModel) -> PredictionReport {
    let input = CollectedInput::collect(form, raw);
    PredictionReport {
        warnings: input.warnings(),
        outcome: dispatch(&input, model),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::{FormCatalog, FormId};
    use crate::inference::FixedModel;

    #[test]
    fn run_reports_warnings_alongside_refusal() {
        let catalog = FormCatalog::standard();
        let form = catalog.get(FormId::Diabetes);
        let mut raw = RawInput::new();
        raw.insert("Glucose".into(), "high".into());

        let report = run(form, &raw, &FixedModel::new(1.0));
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.outcome.message(), "Please fill in all fields correctly.");
    }

    #[test]
    fn successful_run_exports_same_text() {
        let catalog = FormCatalog::standard();
        let form = catalog.get(FormId::Parkinsons);
        let raw: RawInput = form
            .fields
            .iter()
            .map(|f| (f.name.clone(), "0.5".to_string()))
            .collect();

        let report = run(form, &raw, &FixedModel::new(1.0));
        assert!(report.warnings.is_empty());
        let result = report.outcome.result().expect("success");
        assert_eq!(result.message, "Parkinson's detected.");

        let doc = export_result(&result.message).unwrap();
        assert!(!doc.bytes.is_empty());
        assert_eq!(doc.text, report.outcome.message());
    }
}
