use std::path::PathBuf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Preprocessing(#[from] veriscript_preprocessing::Error),

    #[error("failed to load model from {path}: {reason}")]
    ModelLoad { path: PathBuf, reason: String },

    #[error("model inference failed: {0}")]
    Inference(#[from] ort::Error),

    #[error("model expects {model} features but the vectorizer produces {vectorizer}")]
    DimensionMismatch { model: usize, vectorizer: usize },

    #[error("model returned unknown class code {0}")]
    UnknownLabel(i64),

    #[error("model returned no prediction")]
    EmptyPrediction,

    #[error("invalid label encoding: {0}")]
    LabelEncoding(String),

    #[error("model session lock poisoned")]
    Poisoned,
}
