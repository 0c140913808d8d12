use core::fmt;
use std::{path::PathBuf, str::FromStr};

use veriscript_preprocessing::pre_processor::FeatureVector;

use crate::{Error, Result};

mod onnx;

pub use onnx::OnnxClassifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Label {
    Human,
    AI,
    Mixed,
}

impl Label {
    pub const ALL: [Self; 3] = [Self::Human, Self::AI, Self::Mixed];

    /// Returns true if this label is Human
    #[must_use]
    pub fn is_human(&self) -> bool {
        matches!(self, Self::Human)
    }

    /// Returns true if this label is AI
    #[must_use]
    pub fn is_ai(&self) -> bool {
        matches!(self, Self::AI)
    }

    /// Returns true if this label is Mixed
    #[must_use]
    pub fn is_mixed(&self) -> bool {
        matches!(self, Self::Mixed)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Human => write!(f, "human"),
            Self::AI => write!(f, "ai"),
            Self::Mixed => write!(f, "mixed"),
        }
    }
}

impl FromStr for Label {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "ai" => Ok(Self::AI),
            "mixed" => Ok(Self::Mixed),
            other => Err(format!("unknown label '{other}' (expected human, ai or mixed)")),
        }
    }
}

/// Mapping from the model's numeric class codes to labels: code `i` is
/// `order[i]`.
///
/// The default order is `ai, human, mixed` (0 = AI, 1 = Human, 2 = Mixed).
/// It has to agree with the encoding used when the model was trained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelEncoding([Label; 3]);

impl LabelEncoding {
    /// `order` must name every label exactly once.
    pub fn new(order: [Label; 3]) -> Result<Self> {
        for label in Label::ALL {
            if !order.contains(&label) {
                return Err(Error::LabelEncoding(format!(
                    "'{label}' missing from [{}, {}, {}]",
                    order[0], order[1], order[2]
                )));
            }
        }
        Ok(Self(order))
    }

    pub fn decode(&self, code: i64) -> Result<Label> {
        usize::try_from(code)
            .ok()
            .and_then(|idx| self.0.get(idx).copied())
            .ok_or(Error::UnknownLabel(code))
    }

    #[must_use]
    pub fn encode(&self, label: Label) -> i64 {
        self.0
            .iter()
            .zip(0i64..)
            .find_map(|(l, code)| (*l == label).then_some(code))
            .unwrap_or_default()
    }
}

impl Default for LabelEncoding {
    fn default() -> Self {
        Self([Label::AI, Label::Human, Label::Mixed])
    }
}

impl TryFrom<&[Label]> for LabelEncoding {
    type Error = Error;

    fn try_from(labels: &[Label]) -> Result<Self> {
        let order: [Label; 3] = labels.try_into().map_err(|_| {
            Error::LabelEncoding(format!("expected 3 labels, got {}", labels.len()))
        })?;
        Self::new(order)
    }
}

/// A trained model mapping a feature vector to a label.
pub trait Classifier {
    fn predict(&self, features: &FeatureVector) -> Result<Label>;

    /// Number of features the model was trained on, when it declares one.
    fn expected_features(&self) -> Option<usize> {
        None
    }
}

impl<C: Classifier + ?Sized> Classifier for Box<C> {
    fn predict(&self, features: &FeatureVector) -> Result<Label> {
        (**self).predict(features)
    }

    fn expected_features(&self) -> Option<usize> {
        (**self).expected_features()
    }
}

/// Where the trained artifacts live and how to interpret them.
#[derive(Debug, Clone)]
pub struct ArtifactConfig {
    pub model_path: PathBuf,
    pub vectorizer_path: PathBuf,
    pub labels: LabelEncoding,
    /// ONNX Runtime intra-op threads.
    pub intra_threads: usize,
}

impl ArtifactConfig {
    pub fn new(model_path: impl Into<PathBuf>, vectorizer_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            vectorizer_path: vectorizer_path.into(),
            labels: LabelEncoding::default(),
            intra_threads: 1,
        }
    }

    #[must_use]
    pub fn with_labels(mut self, labels: LabelEncoding) -> Self {
        self.labels = labels;
        self
    }

    #[must_use]
    pub fn with_intra_threads(mut self, intra_threads: usize) -> Self {
        self.intra_threads = intra_threads.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_encoding() {
        let encoding = LabelEncoding::default();
        assert_eq!(encoding.decode(0).unwrap(), Label::AI);
        assert_eq!(encoding.decode(1).unwrap(), Label::Human);
        assert_eq!(encoding.decode(2).unwrap(), Label::Mixed);
    }

    #[test]
    fn test_unknown_codes() {
        let encoding = LabelEncoding::default();
        assert!(matches!(encoding.decode(3), Err(Error::UnknownLabel(3))));
        assert!(matches!(encoding.decode(-1), Err(Error::UnknownLabel(-1))));
    }

    #[test]
    fn test_custom_order() {
        let encoding = LabelEncoding::new([Label::Human, Label::AI, Label::Mixed]).unwrap();
        assert_eq!(encoding.decode(0).unwrap(), Label::Human);
        assert_eq!(encoding.encode(Label::AI), 1);
        assert_eq!(encoding.encode(Label::Mixed), 2);
    }

    #[test]
    fn test_order_must_be_permutation() {
        assert!(LabelEncoding::new([Label::Human, Label::Human, Label::Mixed]).is_err());
        assert!(LabelEncoding::try_from(&[Label::Human, Label::AI][..]).is_err());
        assert!(LabelEncoding::try_from(&[Label::Mixed, Label::AI, Label::Human][..]).is_ok());
    }

    #[test]
    fn test_label_parsing() {
        assert_eq!("AI".parse::<Label>(), Ok(Label::AI));
        assert_eq!(" human ".parse::<Label>(), Ok(Label::Human));
        assert!("robot".parse::<Label>().is_err());
        assert_eq!(Label::Mixed.to_string(), "mixed");
    }

    #[test]
    fn test_artifact_config_threads_floor() {
        let config = ArtifactConfig::new("model.onnx", "vectorizer.json").with_intra_threads(0);
        assert_eq!(config.intra_threads, 1);
        assert_eq!(config.labels, LabelEncoding::default());
    }
}
