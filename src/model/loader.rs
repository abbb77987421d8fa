use crate::config::ModelConfig;
use crate::error::PredictError;
use crate::model::estimator::OnnxEstimator;
use crate::model::schema::FeatureSchema;
use crate::model::service::ModelService;
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::path::Path;
use std::sync::Arc;

// Initialize the global environment for ORT (only needed once)
pub fn init_ort() -> Result<(), PredictError> {
    ort::init().with_name("carprice").commit()?;
    Ok(())
}

/// Opens the exported pipeline and creates an inference session.
///
/// Any failure here is reported as `ModelUnavailable`: the process should
/// not start serving without a model.
pub fn load_session(
    model_path: impl AsRef<Path>,
    intra_threads: usize,
) -> Result<Session, PredictError> {
    let path = model_path.as_ref();
    let unavailable = |reason: String| PredictError::ModelUnavailable {
        path: path.display().to_string(),
        reason,
    };

    if !path.is_file() {
        return Err(unavailable("file not found".to_string()));
    }

    let session = build_session(path, intra_threads).map_err(|e| unavailable(e.to_string()))?;

    tracing::info!(path = %path.display(), "loaded model");
    for (i, input) in session.inputs.iter().enumerate() {
        tracing::info!("  input {}: {} ({:?})", i, input.name, input.input_type);
    }

    Ok(session)
}

fn build_session(path: &Path, intra_threads: usize) -> ort::Result<Session> {
    Session::builder()?
        .with_optimization_level(GraphOptimizationLevel::Level3)?
        .with_intra_threads(intra_threads.max(1))?
        .commit_from_file(path)
}

pub fn load_schema(config: &ModelConfig) -> Result<Option<FeatureSchema>, PredictError> {
    let Some(schema_path) = &config.schema_path else {
        tracing::warn!("no feature schema configured; unseen categories reach the model unchecked");
        return Ok(None);
    };

    if !Path::new(schema_path).is_file() {
        return Err(PredictError::ModelUnavailable {
            path: schema_path.clone(),
            reason: "feature schema not found".to_string(),
        });
    }

    let schema = FeatureSchema::load(schema_path)?;
    tracing::info!(
        path = %schema_path,
        inputs = ?schema.inputs,
        categorical = schema.categories.len(),
        "loaded feature schema"
    );
    Ok(Some(schema))
}

/// Everything `main` needs before binding: schema, session, service.
pub fn load_service(config: &ModelConfig) -> Result<ModelService, PredictError> {
    let schema = load_schema(config)?;
    let session = load_session(&config.path, config.intra_threads)?;

    let layout = schema.clone().unwrap_or_default();
    let estimator = OnnxEstimator::new(session, &layout)?;

    Ok(ModelService::new(Arc::new(estimator), schema))
}
