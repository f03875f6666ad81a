use crate::error::PredictError;
use ndarray::Array4;
use ort::session::Session;
use ort::value::TensorRef;
use std::path::Path;
use std::sync::Mutex;

/// Fixed label order matching the trained artifact's class indices.
/// Must never be reordered independently of the model file.
pub const CLASS_LABELS: [&str; 4] = ["Galaxy", "Nebula", "Planet", "Star"];

/// Wrapper around the pretrained CNN exported to ONNX. The network itself
/// (three conv+maxpool stages, dense 512, softmax over 4 classes) is a
/// training-time concern; here it is an opaque tensor -> scores function.
pub struct Classifier {
    // ort sessions need &mut to run, so the shared handle serializes passes.
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
}

impl Classifier {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let session = Session::builder()?.commit_from_file(path)?;
        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .ok_or_else(|| anyhow::anyhow!("model declares no inputs"))?;
        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| anyhow::anyhow!("model declares no outputs"))?;
        log::info!(
            "loaded classification model from {} (input: {}, output: {})",
            path.display(),
            input_name,
            output_name
        );
        Ok(Self {
            session: Mutex::new(session),
            input_name,
            output_name,
        })
    }

    /// Runs one forward pass over a `(1, 150, 150, 3)` tensor and returns the
    /// probability vector, one score per entry of [`CLASS_LABELS`].
    pub fn predict(&self, input: &Array4<f32>) -> Result<Vec<f32>, PredictError> {
        let dims: Vec<i64> = input.shape().iter().map(|&d| d as i64).collect();
        let data = input
            .as_slice()
            .ok_or_else(|| PredictError::Inference("input tensor is not contiguous".into()))?;
        let tensor = TensorRef::from_array_view((dims, data))
            .map_err(|e| PredictError::Inference(e.to_string()))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| PredictError::Inference("classifier session lock poisoned".into()))?;
        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => tensor])
            .map_err(|e| PredictError::Inference(e.to_string()))?;

        let (shape, scores) = outputs[self.output_name.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(|e| PredictError::Inference(e.to_string()))?;
        if scores.len() != CLASS_LABELS.len() {
            return Err(PredictError::Inference(format!(
                "expected {} class scores, model produced shape {:?}",
                CLASS_LABELS.len(),
                shape
            )));
        }
        Ok(scores.to_vec())
    }
}
