pub mod estimator;
pub mod features;
pub mod loader;
pub mod schema;
pub mod service;

pub use estimator::{OnnxEstimator, PriceEstimator};
pub use features::{CarFeatures, PricePrediction};
pub use schema::FeatureSchema;
pub use service::ModelService;
