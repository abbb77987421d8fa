use crate::error::PredictError;
use crate::model::estimator::PriceEstimator;
use crate::model::features::{CarFeatures, PricePrediction};
use crate::model::schema::FeatureSchema;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// The loaded estimator plus the feature space it was trained on.
///
/// Built once at startup and shared read-only by every request.
#[derive(Clone)]
pub struct ModelService {
    estimator: Arc<dyn PriceEstimator>,
    schema: Option<FeatureSchema>,
}

impl ModelService {
    pub fn new(estimator: Arc<dyn PriceEstimator>, schema: Option<FeatureSchema>) -> Self {
        Self { estimator, schema }
    }

    /// Raw price estimate. Categorical values are checked against the
    /// trained vocabulary before the estimator is called.
    pub fn predict(&self, features: &CarFeatures) -> Result<f64, PredictError> {
        if let Some(schema) = &self.schema {
            schema.validate(features)?;
        }

        let price = self.estimator.predict(features)?;
        if !price.is_finite() {
            return Err(PredictError::InvalidOutput(format!(
                "non-finite prediction {price}"
            )));
        }

        tracing::debug!(
            company = %features.company,
            name = %features.name,
            year = features.year,
            price,
            "prediction"
        );
        Ok(price)
    }

    pub fn predict_rounded(&self, features: &CarFeatures) -> Result<PricePrediction, PredictError> {
        self.predict(features).map(PricePrediction::from_raw)
    }

    pub fn input_names(&self) -> Vec<String> {
        self.estimator.input_names()
    }

    /// Trained vocabulary per categorical field; empty without a schema.
    pub fn categories(&self) -> BTreeMap<String, BTreeSet<String>> {
        self.schema
            .as_ref()
            .map(|schema| schema.categories.clone())
            .unwrap_or_default()
    }
}
