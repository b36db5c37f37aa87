//! Raw field value → number.

use serde::Serialize;

use crate::forms::{FieldDomain, FieldSpec};

/// Outcome of coercing one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FieldValue {
    /// Parsed (numeric) or mapped (categorical) value, ready for the model.
    Value { value: f64 },
    /// Nothing entered yet. Not a warning: the user may still be typing.
    Missing,
    /// Entered but unusable.
    Invalid { raw: String },
}

impl FieldValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Value { value } => Some(*value),
            _ => None,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, FieldValue::Invalid { .. })
    }
}

/// Parse free text as a float. Surrounding whitespace is ignored; "inf"
/// and "NaN" parse, and are left for the model boundary to reject.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok()
}

/// Coerce one raw value against its field spec. Never panics.
///
/// A categorical field with no submitted value resolves to its first choice,
/// the same value a select box shows before the user touches it.
pub fn coerce(spec: &FieldSpec, raw: Option<&str>) -> FieldValue {
    match &spec.domain {
        FieldDomain::Numeric => coerce_numeric(raw),
        FieldDomain::Categorical { .. } => match raw.map(str::trim).filter(|r| !r.is_empty()) {
            None => match spec.default_choice() {
                Some(choice) => FieldValue::Value { value: choice.code },
                None => FieldValue::Missing,
            },
            Some(label) => match spec.code_for(label) {
                Some(value) => FieldValue::Value { value },
                None => FieldValue::Invalid {
                    raw: label.to_string(),
                },
            },
        },
    }
}

/// Only a literally empty entry is `Missing`. Whitespace-only text was typed
/// and does not parse, so it is `Invalid` and gets a field warning.
fn coerce_numeric(raw: Option<&str>) -> FieldValue {
    match raw {
        None | Some("") => FieldValue::Missing,
        Some(text) => match parse_number(text) {
            Some(value) => FieldValue::Value { value },
            None => FieldValue::Invalid {
                raw: text.to_string(),
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn age() -> FieldSpec {
        FieldSpec::numeric("Age")
    }

    fn region() -> FieldSpec {
        FieldSpec::categorical(
            "Region",
            &[
                ("southwest", 0.0),
                ("southeast", 1.0),
                ("northwest", 2.0),
                ("northeast", 3.0),
            ],
        )
    }

    #[test]
    fn non_finite_text_parses() {
        assert!(coerce(&age(), Some("NaN")).as_number().is_some_and(f64::is_nan));
        assert_eq!(
            coerce(&age(), Some("inf")),
            FieldValue::Value { value: f64::INFINITY }
        );
    }

    #[test]
    fn numeric_parses_decimals() {
        assert_eq!(coerce(&age(), Some("28.5")), FieldValue::Value { value: 28.5 });
        assert_eq!(coerce(&age(), Some("-3")), FieldValue::Value { value: -3.0 });
        assert_eq!(coerce(&age(), Some("1e2")), FieldValue::Value { value: 100.0 });
    }

    #[test]
    fn numeric_trims_whitespace() {
        assert_eq!(coerce(&age(), Some("  42 ")), FieldValue::Value { value: 42.0 });
    }

    #[test]
    fn numeric_parsing_is_deterministic() {
        for text in ["0.1", "120", "0.627", "33.6", "-0.0001"] {
            let first = coerce(&age(), Some(text));
            for _ in 0..10 {
                assert_eq!(coerce(&age(), Some(text)), first);
            }
        }
    }

    #[test]
    fn numeric_garbage_is_invalid_not_panic() {
        for text in ["abc", "12abc", "1,5", "--1", "½", "💉"] {
            assert_eq!(
                coerce(&age(), Some(text)),
                FieldValue::Invalid { raw: text.into() },
                "{text}"
            );
        }
    }

    #[test]
    fn empty_numeric_is_missing() {
        assert_eq!(coerce(&age(), None), FieldValue::Missing);
        assert_eq!(coerce(&age(), Some("")), FieldValue::Missing);
    }

    #[test]
    fn whitespace_only_numeric_is_invalid() {
        assert_eq!(
            coerce(&age(), Some("   ")),
            FieldValue::Invalid { raw: "   ".into() }
        );
        assert_eq!(coerce(&age(), Some("\t")), FieldValue::Invalid { raw: "\t".into() });
    }

    #[test]
    fn categorical_maps_declared_choices() {
        assert_eq!(coerce(&region(), Some("northeast")), FieldValue::Value { value: 3.0 });
        assert_eq!(coerce(&region(), Some("southwest")), FieldValue::Value { value: 0.0 });
    }

    #[test]
    fn categorical_defaults_to_first_choice() {
        assert_eq!(coerce(&region(), None), FieldValue::Value { value: 0.0 });
    }

    #[test]
    fn categorical_rejects_undeclared_choice() {
        assert_eq!(
            coerce(&region(), Some("atlantis")),
            FieldValue::Invalid {
                raw: "atlantis".into()
            }
        );
    }

    #[test]
    fn as_number_only_for_values() {
        assert_eq!(FieldValue::Value { value: 2.0 }.as_number(), Some(2.0));
        assert_eq!(FieldValue::Missing.as_number(), None);
        assert!(FieldValue::Invalid { raw: "x".into() }.is_invalid());
    }
}
