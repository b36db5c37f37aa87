use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════
// FormId — the six forms on the side menu
// ═══════════════════════════════════════════════════════════

/// Identifies one prediction form. Serializes as its URL slug.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormId {
    #[default]
    #[serde(rename = "diabetes")]
    Diabetes,
    #[serde(rename = "heart")]
    HeartDisease,
    #[serde(rename = "parkinsons")]
    Parkinsons,
    #[serde(rename = "insurance")]
    Insurance,
    #[serde(rename = "breast")]
    BreastCancer,
    #[serde(rename = "calories")]
    Calories,
}

impl FormId {
    /// Menu order. The first entry is the default selection.
    pub const ALL: [FormId; 6] = [
        FormId::Diabetes,
        FormId::HeartDisease,
        FormId::Parkinsons,
        FormId::Insurance,
        FormId::BreastCancer,
        FormId::Calories,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            FormId::Diabetes => "diabetes",
            FormId::HeartDisease => "heart",
            FormId::Parkinsons => "parkinsons",
            FormId::Insurance => "insurance",
            FormId::BreastCancer => "breast",
            FormId::Calories => "calories",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.slug() == slug)
    }

    /// Label shown on the side menu.
    pub fn menu_title(self) -> &'static str {
        match self {
            FormId::Diabetes => "Diabetes",
            FormId::HeartDisease => "Heart Disease",
            FormId::Parkinsons => "Parkinsons",
            FormId::Insurance => "Insurance Charges",
            FormId::BreastCancer => "Breast Cancer",
            FormId::Calories => "Calories Burnt",
        }
    }

    /// Key of the model this form dispatches to.
    pub fn model_key(self) -> &'static str {
        self.slug()
    }

    /// Position in `ALL`.
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for FormId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

// ═══════════════════════════════════════════════════════════
// FieldSpec
// ═══════════════════════════════════════════════════════════

/// One selectable value of a categorical field and the code fed to the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Choice {
    pub label: &'static str,
    pub code: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldDomain {
    /// Free text parsed as a float.
    Numeric,
    /// Select box over a closed choice set. The first choice is preselected.
    Categorical { choices: Vec<Choice> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(flatten)]
    pub domain: FieldDomain,
}

impl FieldSpec {
    pub fn numeric(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domain: FieldDomain::Numeric,
        }
    }

    pub fn categorical(name: impl Into<String>, choices: &[(&'static str, f64)]) -> Self {
        Self {
            name: name.into(),
            domain: FieldDomain::Categorical {
                choices: choices
                    .iter()
                    .map(|&(label, code)| Choice { label, code })
                    .collect(),
            },
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.domain, FieldDomain::Numeric)
    }

    pub fn choices(&self) -> &[Choice] {
        match &self.domain {
            FieldDomain::Numeric => &[],
            FieldDomain::Categorical { choices } => choices,
        }
    }

    /// Code for a declared choice; `None` for undeclared values or numeric fields.
    pub fn code_for(&self, label: &str) -> Option<f64> {
        self.choices()
            .iter()
            .find(|c| c.label == label)
            .map(|c| c.code)
    }

    pub fn default_choice(&self) -> Option<&Choice> {
        self.choices().first()
    }
}

// ═══════════════════════════════════════════════════════════
// Result interpretation
// ═══════════════════════════════════════════════════════════

/// Maps the model's scalar output to the message shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultRule {
    /// Classifier: `positive` is the sentinel label that selects
    /// `positive_message`; any other output selects `negative_message`.
    Binary {
        positive: f64,
        positive_message: &'static str,
        negative_message: &'static str,
    },
    /// Regression: value rendered with two decimals between prefix and suffix.
    Estimate {
        prefix: &'static str,
        suffix: &'static str,
    },
}

impl ResultRule {
    pub fn interpret(&self, output: f64) -> String {
        match self {
            ResultRule::Binary {
                positive,
                positive_message,
                negative_message,
            } => {
                if output == *positive {
                    (*positive_message).to_string()
                } else {
                    (*negative_message).to_string()
                }
            }
            ResultRule::Estimate { prefix, suffix } => format!("{prefix}{output:.2}{suffix}"),
        }
    }
}

/// Wording of the warning raised for a field that failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldWarningStyle {
    /// "Please enter a valid number for {field}"
    ValidNumberFor,
    /// "Invalid input for {field}"
    InvalidInputFor,
    /// "{field} should be a number"
    ShouldBeNumber,
}

impl FieldWarningStyle {
    pub fn message(self, field: &str) -> String {
        match self {
            FieldWarningStyle::ValidNumberFor => format!("Please enter a valid number for {field}"),
            FieldWarningStyle::InvalidInputFor => format!("Invalid input for {field}"),
            FieldWarningStyle::ShouldBeNumber => format!("{field} should be a number"),
        }
    }
}

// ═══════════════════════════════════════════════════════════
// FormDefinition
// ═══════════════════════════════════════════════════════════

/// Static descriptor of one predictive form. Never mutated after startup.
#[derive(Debug, Clone, Serialize)]
pub struct FormDefinition {
    pub id: FormId,
    /// Page heading, e.g. "Diabetes Prediction".
    pub heading: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<&'static str>,
    /// Declared order is the feature order the model was fitted with.
    pub fields: Vec<FieldSpec>,
    pub model_key: &'static str,
    /// Artifact file name without extension, looked up in the models directory.
    #[serde(skip_serializing)]
    pub artifact_stem: &'static str,
    pub rule: ResultRule,
    pub field_warning: FieldWarningStyle,
    /// Aggregate warning when the completeness gate refuses dispatch.
    pub incomplete_message: &'static str,
}

impl FormDefinition {
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_roundtrip_for_every_form() {
        for id in FormId::ALL {
            assert_eq!(FormId::from_slug(id.slug()), Some(id));
        }
        assert_eq!(FormId::from_slug("unknown"), None);
    }

    #[test]
    fn index_matches_menu_order() {
        for (i, id) in FormId::ALL.into_iter().enumerate() {
            assert_eq!(id.index(), i);
        }
    }

    #[test]
    fn form_id_serializes_as_slug() {
        let json = serde_json::to_string(&FormId::HeartDisease).unwrap();
        assert_eq!(json, "\"heart\"");
        let parsed: FormId = serde_json::from_str("\"breast\"").unwrap();
        assert_eq!(parsed, FormId::BreastCancer);
    }

    #[test]
    fn binary_rule_uses_sentinel() {
        let rule = ResultRule::Binary {
            positive: 1.0,
            positive_message: "yes",
            negative_message: "no",
        };
        assert_eq!(rule.interpret(1.0), "yes");
        assert_eq!(rule.interpret(0.0), "no");
        assert_eq!(rule.interpret(2.0), "no");
    }

    #[test]
    fn estimate_rule_rounds_to_two_decimals() {
        let rule = ResultRule::Estimate {
            prefix: "Cost: $",
            suffix: "",
        };
        assert_eq!(rule.interpret(1234.5), "Cost: $1234.50");
        assert_eq!(rule.interpret(0.004), "Cost: $0.00");
    }

    #[test]
    fn categorical_lookup() {
        let spec = FieldSpec::categorical("Smoker", &[("yes", 1.0), ("no", 0.0)]);
        assert_eq!(spec.code_for("yes"), Some(1.0));
        assert_eq!(spec.code_for("no"), Some(0.0));
        assert_eq!(spec.code_for("maybe"), None);
        assert_eq!(spec.default_choice().map(|c| c.label), Some("yes"));
        assert!(!spec.is_numeric());
    }

    #[test]
    fn numeric_spec_has_no_choices() {
        let spec = FieldSpec::numeric("Age");
        assert!(spec.is_numeric());
        assert!(spec.choices().is_empty());
        assert_eq!(spec.code_for("1"), None);
    }

    #[test]
    fn warning_styles() {
        assert_eq!(
            FieldWarningStyle::ValidNumberFor.message("Age"),
            "Please enter a valid number for Age"
        );
        assert_eq!(FieldWarningStyle::InvalidInputFor.message("NHR"), "Invalid input for NHR");
        assert_eq!(
            FieldWarningStyle::ShouldBeNumber.message("Feature 3"),
            "Feature 3 should be a number"
        );
    }
}
