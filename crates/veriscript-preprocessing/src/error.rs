use std::path::PathBuf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode vectorizer artifact: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    #[error("failed to encode vectorizer artifact: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("failed to parse vectorizer export: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid vectorizer artifact: {0}")]
    InvalidArtifact(String),

    #[error("failed to unpack resource archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("failed to fetch resource bundle from {url}: {reason}")]
    Download { url: String, reason: String },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
