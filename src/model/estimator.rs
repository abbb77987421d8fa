use crate::error::PredictError;
use crate::model::features::{CarFeatures, FeatureValue};
use crate::model::schema::FeatureSchema;
use ort::error::ErrorCode;
use ort::session::Session;
use ort::value::{DynValue, Tensor};
use parking_lot::Mutex;

/// Anything that can turn one car into a raw price estimate.
pub trait PriceEstimator: Send + Sync {
    fn predict(&self, features: &CarFeatures) -> Result<f64, PredictError>;

    /// Input names the estimator was built against, in feed order.
    fn input_names(&self) -> Vec<String>;
}

/// The exported regression pipeline, run through ONNX Runtime.
///
/// Each input is fed as a `[1, 1]` tensor: strings for text columns,
/// `int64` for integer columns. The pipeline's encoder handles the one-hot
/// step internally.
pub struct OnnxEstimator {
    // `Session::run` takes `&mut self`
    session: Mutex<Session>,
    inputs: Vec<String>,
}

impl OnnxEstimator {
    pub fn new(session: Session, schema: &FeatureSchema) -> Result<Self, PredictError> {
        schema.check_model_inputs(session.inputs.iter().map(|input| input.name.as_str()))?;
        Ok(Self {
            session: Mutex::new(session),
            inputs: schema.inputs.clone(),
        })
    }

    fn feed(&self, features: &CarFeatures) -> Result<Vec<(String, DynValue)>, PredictError> {
        let mut feed = Vec::with_capacity(self.inputs.len());
        for input in &self.inputs {
            let value = match features.value(input) {
                Some(FeatureValue::Text(text)) => {
                    Tensor::from_string_array(([1usize, 1], &[text.to_string()][..]))?.into_dyn()
                }
                Some(FeatureValue::Integer(n)) => {
                    Tensor::from_array(([1usize, 1], vec![n]))?.into_dyn()
                }
                None => return Err(PredictError::Schema(format!("unknown input `{input}`"))),
            };
            feed.push((input.clone(), value));
        }
        Ok(feed)
    }
}

impl PriceEstimator for OnnxEstimator {
    fn predict(&self, features: &CarFeatures) -> Result<f64, PredictError> {
        let feed = self.feed(features)?;

        let mut session = self.session.lock();
        let outputs = session.run(feed).map_err(run_error)?;
        let Some((_, output)) = outputs.iter().next() else {
            return Err(PredictError::InvalidOutput("model returned no outputs".to_string()));
        };

        // Regressors export as float32 by default; double pipelines exist too.
        let first = match output.try_extract_tensor::<f32>() {
            Ok((_, data)) => data.first().map(|&v| f64::from(v)),
            Err(_) => {
                let (_, data) = output.try_extract_tensor::<f64>()?;
                data.first().copied()
            }
        };

        first.ok_or_else(|| PredictError::InvalidOutput("model returned an empty tensor".to_string()))
    }

    fn input_names(&self) -> Vec<String> {
        self.inputs.clone()
    }
}

/// The runtime reports records it cannot map into the graph's inputs (an
/// unseen category, a wrong dtype) as `InvalidArgument`; everything else is
/// an inference failure.
fn run_error(err: ort::Error) -> PredictError {
    if matches!(err.code(), ErrorCode::InvalidArgument) {
        return PredictError::schema_mismatch("record", err.message());
    }
    PredictError::Inference(err)
}
