use axum::{
    extract::rejection::{JsonDataError, JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Why an inbound request body could not become a `CarFeatures`.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ValidationReason {
    /// Not JSON, wrong content type, or an unreadable body.
    Malformed,
    /// A required field is absent.
    Missing,
    /// A field is present with the wrong primitive type.
    Mistyped,
}

impl fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ValidationReason::Malformed => "malformed",
            ValidationReason::Missing => "missing",
            ValidationReason::Mistyped => "mistyped",
        };
        f.write_str(s)
    }
}

#[derive(Error, Debug)]
pub enum PredictError {
    #[error("Invalid request ({reason}): {message}")]
    Validation {
        reason: ValidationReason,
        message: String,
    },

    #[error("Value {value:?} for `{field}` is outside the model's trained feature space")]
    SchemaMismatch { field: String, value: String },

    #[error("Model unavailable at {path}: {reason}")]
    ModelUnavailable { path: String, reason: String },

    #[error("Inference failed: {0}")]
    Inference(#[from] ort::Error),

    #[error("Model produced an unusable output: {0}")]
    InvalidOutput(String),

    #[error("Inference task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Feature schema error: {0}")]
    Schema(String),

    #[error("Config error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PredictError {
    pub fn validation(reason: ValidationReason, message: impl Into<String>) -> Self {
        PredictError::Validation {
            reason,
            message: message.into(),
        }
    }

    pub fn schema_mismatch(field: impl Into<String>, value: impl Into<String>) -> Self {
        PredictError::SchemaMismatch {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Stable label used in error bodies and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            PredictError::Validation { .. } => "validation",
            PredictError::SchemaMismatch { .. } => "schema_mismatch",
            PredictError::ModelUnavailable { .. } => "model_unavailable",
            PredictError::Inference(_) => "inference",
            PredictError::InvalidOutput(_) => "invalid_output",
            PredictError::Task(_)
            | PredictError::Schema(_)
            | PredictError::Config(_)
            | PredictError::Io(_) => "internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            PredictError::Validation { .. } => StatusCode::BAD_REQUEST,
            PredictError::ModelUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for PredictError {
    fn from(rejection: JsonRejection) -> Self {
        let message = rejection.body_text();
        let reason = match &rejection {
            JsonRejection::JsonDataError(err) if is_missing_field(err) => ValidationReason::Missing,
            JsonRejection::JsonDataError(_) => ValidationReason::Mistyped,
            _ => ValidationReason::Malformed,
        };
        PredictError::validation(reason, message)
    }
}

/// True when a source in the chain is serde's own "missing field" message.
/// The body text echoes client values, so it is not searched.
fn is_missing_field(err: &JsonDataError) -> bool {
    let mut source: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(err) = source {
        if err.to_string().starts_with("missing field") {
            return true;
        }
        source = err.source();
    }
    false
}

impl IntoResponse for PredictError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            PredictError::Validation { reason, .. } => json!({
                "error": self.to_string(),
                "kind": self.kind(),
                "reason": reason,
            }),
            PredictError::Task(_)
            | PredictError::Schema(_)
            | PredictError::Config(_)
            | PredictError::Io(_) => json!({
                "error": "Internal server error",
                "kind": self.kind(),
            }),
            _ => json!({
                "error": self.to_string(),
                "kind": self.kind(),
            }),
        };

        (status, Json(body)).into_response()
    }
}
