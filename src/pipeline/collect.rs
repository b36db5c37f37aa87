//! Field collection: raw values for one form, coerced field by field.

use std::collections::HashMap;

use serde::Serialize;

use super::coerce::{coerce, FieldValue};
use crate::forms::{FieldSpec, FormDefinition};

/// Raw user input keyed by field name.
pub type RawInput = HashMap<String, String>;

/// Field-scoped warning shown next to the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldWarning {
    pub field: String,
    pub message: String,
}

/// Coerced view of one form's input, aligned with the declared field order.
///
/// Rebuilt from scratch on every pass; holds no state between requests.
#[derive(Debug, Clone)]
pub struct CollectedInput<'a> {
    form: &'a FormDefinition,
    values: Vec<FieldValue>,
}

impl<'a> CollectedInput<'a> {
    /// Coerce each declared field independently. Names the form does not
    /// declare are ignored.
    pub fn collect(form: &'a FormDefinition, raw: &RawInput) -> Self {
        let values = form
            .fields
            .iter()
            .map(|spec| coerce(spec, raw.get(&spec.name).map(String::as_str)))
            .collect();
        Self { form, values }
    }

    pub fn form(&self) -> &'a FormDefinition {
        self.form
    }

    /// Declared fields paired with their coerced values.
    pub fn fields(&self) -> impl Iterator<Item = (&'a FieldSpec, &FieldValue)> {
        self.form.fields.iter().zip(self.values.iter())
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.fields()
            .find(|(spec, _)| spec.name == name)
            .map(|(_, value)| value)
    }

    /// One warning per field whose raw value failed to coerce, in field order.
    pub fn warnings(&self) -> Vec<FieldWarning> {
        self.fields()
            .filter(|(_, value)| value.is_invalid())
            .map(|(spec, _)| FieldWarning {
                field: spec.name.clone(),
                message: self.form.field_warning.message(&spec.name),
            })
            .collect()
    }

    /// Number of fields in the coerced set.
    pub fn coerced_count(&self) -> usize {
        self.values.iter().filter(|v| v.as_number().is_some()).count()
    }

    /// Every declared field coerced successfully.
    pub fn is_complete(&self) -> bool {
        self.coerced_count() == self.form.field_count()
    }

    pub fn missing(&self) -> Vec<String> {
        self.names_where(|v| matches!(v, FieldValue::Missing))
    }

    pub fn invalid(&self) -> Vec<String> {
        self.names_where(FieldValue::is_invalid)
    }

    fn names_where(&self, pred: impl Fn(&FieldValue) -> bool) -> Vec<String> {
        self.fields()
            .filter(|(_, value)| pred(value))
            .map(|(spec, _)| spec.name.clone())
            .collect()
    }

    /// Coerced values in declared order; `None` unless complete.
    pub(crate) fn ordered_values(&self) -> Option<Vec<f64>> {
        self.values.iter().map(FieldValue::as_number).collect()
    }
}
