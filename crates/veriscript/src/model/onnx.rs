use std::{path::Path, sync::Mutex};

use ort::{
    session::{Session, SessionOutputs, builder::GraphOptimizationLevel},
    value::{Tensor, TensorValueType, Value, ValueType},
};
use tracing::{debug, info};
use veriscript_preprocessing::pre_processor::FeatureVector;

use super::{Classifier, Label, LabelEncoding};
use crate::{Error, Result};

/// Classifier backed by an ONNX graph (e.g. a scikit-learn model exported
/// with `skl2onnx`).
///
/// The first input takes a `[batch, features]` f32 tensor; the first output
/// holds the predicted int64 class codes and an optional second output the
/// class probabilities.
pub struct OnnxClassifier {
    /// `Session::run` needs exclusive access.
    session: Mutex<Session>,
    input_name: String,
    expected_features: Option<usize>,
    has_probabilities: bool,
    labels: LabelEncoding,
}

fn build_session(model_bytes: &[u8], intra_threads: usize) -> Result<Session, String> {
    Session::builder()
        .map_err(|e| format!("unable to create session builder: {e}"))?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .map_err(|e| format!("unable to set optimization level: {e}"))?
        .with_intra_threads(intra_threads)
        .map_err(|e| format!("unable to set intra threads: {e}"))?
        .commit_from_memory(model_bytes)
        .map_err(|e| e.to_string())
}

fn prepare_input_for_inference(
    features: &FeatureVector,
) -> ort::Result<Value<TensorValueType<f32>>> {
    let shape = vec![1, features.dim()];
    let data = features.to_dense_f32().into_boxed_slice();

    let input = Tensor::from_array((shape, data))?;
    Ok(input)
}

/// Extracts the predicted class code from model outputs
fn parse_model_outputs(outputs: &SessionOutputs<'_>) -> Result<i64> {
    // First output: class labels (e.g., [2])
    let labels = outputs[0].try_extract_array::<i64>()?;
    labels.iter().next().copied().ok_or(Error::EmptyPrediction)
}

fn log_class_probabilities(outputs: &SessionOutputs<'_>) {
    // Second output: class probabilities, only readable when exported as a tensor
    let Ok(probs) = outputs[1].try_extract_array::<f32>() else {
        return;
    };
    if let Ok(probs) = probs.into_dimensionality::<ndarray::Ix2>()
        && probs.nrows() > 0
    {
        debug!(probabilities = ?probs.row(0).to_vec(), "Class probabilities");
    }
}

impl OnnxClassifier {
    /// Load an ONNX model from disk.
    pub fn from_path(path: &Path, labels: LabelEncoding, intra_threads: usize) -> Result<Self> {
        let load_error = |reason: String| Error::ModelLoad {
            path: path.to_path_buf(),
            reason,
        };

        let model_bytes = std::fs::read(path).map_err(|e| load_error(e.to_string()))?;
        let classifier = Self::from_memory(&model_bytes, labels, intra_threads)
            .map_err(load_error)?;
        info!(
            path = %path.display(),
            input = %classifier.input_name,
            expected_features = ?classifier.expected_features,
            "Loaded classifier"
        );
        Ok(classifier)
    }

    fn from_memory(
        model_bytes: &[u8],
        labels: LabelEncoding,
        intra_threads: usize,
    ) -> Result<Self, String> {
        let session = build_session(model_bytes, intra_threads)?;

        let input = session.inputs.first().ok_or("model declares no inputs")?;
        let input_name = input.name.clone();
        // Dynamic dimensions are negative.
        let expected_features = match &input.input_type {
            ValueType::Tensor { shape, .. } => shape
                .last()
                .and_then(|&dim| usize::try_from(dim).ok())
                .filter(|&dim| dim > 0),
            _ => None,
        };

        if session.outputs.is_empty() {
            return Err("model declares no outputs".to_string());
        }
        let has_probabilities = session.outputs.len() > 1;

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            expected_features,
            has_probabilities,
            labels,
        })
    }

    #[must_use]
    pub fn labels(&self) -> &LabelEncoding {
        &self.labels
    }

    fn run_inference(&self, input: Value<TensorValueType<f32>>) -> Result<i64> {
        let mut session = self.session.lock().map_err(|_| Error::Poisoned)?;
        let outputs = session.run(ort::inputs![self.input_name.as_str() => input])?;
        if self.has_probabilities {
            log_class_probabilities(&outputs);
        }
        parse_model_outputs(&outputs)
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, features: &FeatureVector) -> Result<Label> {
        if let Some(expected) = self.expected_features
            && expected != features.dim()
        {
            return Err(Error::DimensionMismatch {
                model: expected,
                vectorizer: features.dim(),
            });
        }

        let input = prepare_input_for_inference(features)?;
        let code = self.run_inference(input)?;
        let label = self.labels.decode(code)?;
        debug!(code, %label, "Model prediction");
        Ok(label)
    }

    fn expected_features(&self) -> Option<usize> {
        self.expected_features
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_model_is_load_error() {
        let result = OnnxClassifier::from_path(
            Path::new("/nonexistent/model.onnx"),
            LabelEncoding::default(),
            1,
        );
        assert!(matches!(result, Err(Error::ModelLoad { .. })));
    }

    #[test]
    fn test_corrupt_model_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.onnx");
        std::fs::write(&path, b"not an onnx graph").unwrap();

        let result = OnnxClassifier::from_path(&path, LabelEncoding::default(), 1);
        assert!(matches!(result, Err(Error::ModelLoad { .. })));
    }
}
