pub mod config;
pub mod error;
pub mod model;
pub mod observability;
pub mod server;


// Re-export common types
pub use error::PredictError;
pub use model::{CarFeatures, ModelService, PricePrediction};
