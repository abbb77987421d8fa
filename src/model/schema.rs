//! The estimator's trained feature space: input order plus the categorical
//! vocabulary seen at fit time.

use crate::error::PredictError;
use crate::model::features::{CarFeatures, FeatureValue, FEATURE_NAMES, TEXT_FEATURES};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::{fs, path::Path};

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct FeatureSchema {
    #[serde(default = "default_inputs")]
    pub inputs: Vec<String>,
    #[serde(default)]
    pub categories: BTreeMap<String, BTreeSet<String>>,
}

fn default_inputs() -> Vec<String> {
    FEATURE_NAMES.iter().map(|s| s.to_string()).collect()
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self {
            inputs: default_inputs(),
            categories: BTreeMap::new(),
        }
    }
}

impl FeatureSchema {
    pub fn from_json(content: &str) -> Result<Self, PredictError> {
        let schema: FeatureSchema = serde_json::from_str(content)
            .map_err(|e| PredictError::Schema(format!("invalid schema JSON: {e}")))?;
        schema.check()?;
        Ok(schema)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, PredictError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Every `CarFeatures` field appears once in `inputs`, and only text
    /// fields carry a vocabulary.
    pub fn check(&self) -> Result<(), PredictError> {
        let mut seen = BTreeSet::new();
        for input in &self.inputs {
            if !FEATURE_NAMES.contains(&input.as_str()) {
                return Err(PredictError::Schema(format!("unknown input `{input}`")));
            }
            if !seen.insert(input.as_str()) {
                return Err(PredictError::Schema(format!("duplicate input `{input}`")));
            }
        }
        if let Some(missing) = FEATURE_NAMES.iter().find(|f| !seen.contains(*f)) {
            return Err(PredictError::Schema(format!("input `{missing}` not listed")));
        }

        let stray = self
            .categories
            .keys()
            .find(|field| !TEXT_FEATURES.contains(&field.as_str()));
        match stray {
            Some(field) if FEATURE_NAMES.contains(&field.as_str()) => Err(PredictError::Schema(
                format!("`{field}` is numeric and cannot have categories"),
            )),
            Some(field) => Err(PredictError::Schema(format!(
                "categories given for unknown field `{field}`"
            ))),
            None => Ok(()),
        }
    }

    /// Rejects categorical values the estimator never saw during training.
    pub fn validate(&self, features: &CarFeatures) -> Result<(), PredictError> {
        for (field, known) in &self.categories {
            if let Some(FeatureValue::Text(value)) = features.value(field) {
                if !known.contains(value) {
                    return Err(PredictError::schema_mismatch(field.as_str(), value));
                }
            }
        }
        Ok(())
    }

    /// Compares `inputs` with the names a loaded model declares.
    pub fn check_model_inputs<'a>(
        &self,
        model_inputs: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), PredictError> {
        let declared: BTreeSet<&str> = model_inputs.into_iter().collect();
        let expected: BTreeSet<&str> = self.inputs.iter().map(String::as_str).collect();
        if declared != expected {
            return Err(PredictError::Schema(format!(
                "model declares inputs {declared:?}, expected {expected:?}"
            )));
        }
        Ok(())
    }
}
