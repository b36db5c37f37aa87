//! The six prediction forms.
//!
//! Field order in every definition is the feature order the matching model
//! artifact was fitted with. Reordering a field silently changes predictions.

use super::types::{FieldSpec, FieldWarningStyle, FormDefinition, FormId, ResultRule};

const DEFAULT_INCOMPLETE: &str = "Please fill in all fields correctly.";

/// Number of tumor-mass features on the breast cancer form.
pub const BREAST_FEATURE_COUNT: usize = 30;

/// Immutable set of all form definitions, indexed by `FormId`.
#[derive(Debug, Clone)]
pub struct FormCatalog {
    forms: [FormDefinition; 6],
}

impl FormCatalog {
    /// Build the standard catalog.
    pub fn standard() -> Self {
        Self {
            forms: FormId::ALL.map(definition_for),
        }
    }

    pub fn get(&self, id: FormId) -> &FormDefinition {
        &self.forms[id.index()]
    }

    pub fn by_slug(&self, slug: &str) -> Option<&FormDefinition> {
        FormId::from_slug(slug).map(|id| self.get(id))
    }

    /// Forms in menu order.
    pub fn iter(&self) -> impl Iterator<Item = &FormDefinition> {
        self.forms.iter()
    }
}

impl Default for FormCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn numeric_fields(names: &[&str]) -> Vec<FieldSpec> {
    names.iter().map(|n| FieldSpec::numeric(*n)).collect()
}

fn definition_for(id: FormId) -> FormDefinition {
    match id {
        FormId::Diabetes => FormDefinition {
            id,
            heading: "Diabetes Prediction",
            caption: None,
            fields: numeric_fields(&[
                "Pregnancies",
                "Glucose",
                "BloodPressure",
                "SkinThickness",
                "Insulin",
                "BMI",
                "DiabetesPedigreeFunction",
                "Age",
            ]),
            model_key: id.model_key(),
            artifact_stem: "Diabetes_prediction_trained_model",
            rule: ResultRule::Binary {
                positive: 1.0,
                positive_message: "The person is diabetic.",
                negative_message: "The person is not diabetic.",
            },
            field_warning: FieldWarningStyle::ValidNumberFor,
            incomplete_message: DEFAULT_INCOMPLETE,
        },
        FormId::HeartDisease => FormDefinition {
            id,
            heading: "Heart Disease Prediction",
            caption: None,
            fields: numeric_fields(&[
                "Age",
                "Sex",
                "Chest Pain",
                "RestBP",
                "Cholesterol",
                "FBS",
                "RestECG",
                "Max HR",
                "Exang",
                "Oldpeak",
                "Slope",
                "CA",
                "Thal",
            ]),
            model_key: id.model_key(),
            artifact_stem: "Heart_Disease_prediction_trained_model",
            rule: ResultRule::Binary {
                positive: 1.0,
                positive_message: "The person has heart disease.",
                negative_message: "No heart disease detected.",
            },
            field_warning: FieldWarningStyle::ValidNumberFor,
            incomplete_message: DEFAULT_INCOMPLETE,
        },
        FormId::Parkinsons => FormDefinition {
            id,
            heading: "Parkinson's Disease Prediction",
            caption: None,
            fields: numeric_fields(&[
                "MDVP:Fo(Hz)",
                "MDVP:Fhi(Hz)",
                "MDVP:Flo(Hz)",
                "MDVP:Jitter(%)",
                "MDVP:Jitter(Abs)",
                "MDVP:RAP",
                "MDVP:PPQ",
                "Jitter:DDP",
                "MDVP:Shimmer",
                "MDVP:Shimmer(dB)",
                "Shimmer:APQ3",
                "Shimmer:APQ5",
                "MDVP:APQ",
                "Shimmer:DDA",
                "NHR",
                "HNR",
                "RPDE",
                "DFA",
                "spread1",
                "spread2",
                "D2",
                "PPE",
            ]),
            model_key: id.model_key(),
            artifact_stem: "Parkinson_prediction_trained_model",
            rule: ResultRule::Binary {
                positive: 1.0,
                positive_message: "Parkinson's detected.",
                negative_message: "No Parkinson's disease.",
            },
            field_warning: FieldWarningStyle::InvalidInputFor,
            incomplete_message: DEFAULT_INCOMPLETE,
        },
        FormId::Insurance => FormDefinition {
            id,
            heading: "Medical Insurance Cost Prediction",
            caption: None,
            fields: vec![
                FieldSpec::numeric("Age"),
                FieldSpec::categorical("Sex", &[("male", 1.0), ("female", 0.0)]),
                FieldSpec::numeric("BMI"),
                FieldSpec::numeric("Children"),
                FieldSpec::categorical("Smoker", &[("yes", 1.0), ("no", 0.0)]),
                FieldSpec::categorical(
                    "Region",
                    &[
                        ("southwest", 0.0),
                        ("southeast", 1.0),
                        ("northwest", 2.0),
                        ("northeast", 3.0),
                    ],
                ),
            ],
            model_key: id.model_key(),
            artifact_stem: "Medical_insurance_prediction_trained_model",
            rule: ResultRule::Estimate {
                prefix: "Estimated Insurance Charge: $",
                suffix: "",
            },
            field_warning: FieldWarningStyle::ValidNumberFor,
            incomplete_message: "Please enter valid numeric values.",
        },
        FormId::BreastCancer => FormDefinition {
            id,
            heading: "Breast Cancer Prediction",
            caption: Some("Input 30 features extracted from tumor mass"),
            fields: (1..=BREAST_FEATURE_COUNT)
                .map(|i| FieldSpec::numeric(format!("Feature {i}")))
                .collect(),
            model_key: id.model_key(),
            artifact_stem: "Breast_cancer_prediction_trained_model",
            // Label 0 is the malignant class in the training data.
            rule: ResultRule::Binary {
                positive: 0.0,
                positive_message: "Malignant Tumor",
                negative_message: "Benign Tumor",
            },
            field_warning: FieldWarningStyle::ShouldBeNumber,
            incomplete_message: "Please fill all 30 features with valid numbers.",
        },
        FormId::Calories => FormDefinition {
            id,
            heading: "Calories Burnt Prediction",
            caption: None,
            fields: vec![
                FieldSpec::categorical("Gender", &[("Male", 1.0), ("Female", 0.0)]),
                FieldSpec::numeric("Age"),
                FieldSpec::numeric("Height (cm)"),
                FieldSpec::numeric("Weight (kg)"),
                FieldSpec::numeric("Exercise Duration (min)"),
                FieldSpec::numeric("Heart Rate"),
                FieldSpec::numeric("Body Temperature (°C)"),
            ],
            model_key: id.model_key(),
            artifact_stem: "Calories_burnt_prediction_trained_model",
            rule: ResultRule::Estimate {
                prefix: "Estimated Calories Burnt: ",
                suffix: " kcal",
            },
            field_warning: FieldWarningStyle::ValidNumberFor,
            incomplete_message: "Please enter all values correctly.",
        },
    }
}
