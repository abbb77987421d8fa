use crate::model::ModelService;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Shared Application State
#[derive(Clone)]
pub struct AppState {
    pub service: ModelService,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(service: ModelService) -> Self {
        Self {
            service,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

// --- DTOs ---
// The prediction request and response are `CarFeatures` / `PricePrediction`.

#[derive(Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub inputs: Vec<String>,
}

#[derive(Serialize)]
pub struct CategoriesResponse {
    #[serde(flatten)]
    pub categories: BTreeMap<String, BTreeSet<String>>,
}
