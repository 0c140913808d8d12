use std::path::Path;

use ahash::HashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{count_vectorizer::CountVectorizer, feature_vector::FeatureVector, params::VectorizerParams};
use crate::{Error, Result, pre_processor::CleanedTokens};

/// A pre-fitted TF-IDF transform: term counts over a fixed vocabulary,
/// weighted by inverse document frequency and L2-normalized.
#[derive(Clone, Debug, bincode::Encode, bincode::Decode)]
pub struct TfidfVectorizer {
    count_vectorizer: CountVectorizer,
    idf: Vec<f64>,
}

/// JSON export of a fitted vectorizer (vocabulary and IDF weights as fitted
/// by the training pipeline).
#[derive(Debug, Serialize, Deserialize)]
struct VectorizerExport {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ngram_range: Option<(usize, usize)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sublinear_tf: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min_token_chars: Option<usize>,
}

fn bincode_config() -> bincode::config::Configuration {
    bincode::config::standard()
}

fn check_params(ngram_range: (usize, usize)) -> Result<()> {
    let (min_n, max_n) = ngram_range;
    if min_n == 0 || min_n > max_n {
        return Err(Error::InvalidArtifact(format!(
            "invalid ngram_range ({min_n}, {max_n})"
        )));
    }
    Ok(())
}

impl TfidfVectorizer {
    /// Assemble a vectorizer from a fitted vocabulary and its IDF weights.
    pub fn from_parts(
        vocabulary: HashMap<String, usize>,
        idf: Vec<f64>,
        params: VectorizerParams,
    ) -> Result<Self> {
        let vectorizer = Self {
            count_vectorizer: CountVectorizer::new(vocabulary, params),
            idf,
        };
        vectorizer.validate()?;
        Ok(vectorizer)
    }

    /// Every vocabulary entry must map to a distinct IDF slot.
    fn validate(&self) -> Result<()> {
        check_params(self.params().ngram_range())?;

        let num_features = self.idf.len();
        if self.count_vectorizer.num_features() != num_features {
            return Err(Error::InvalidArtifact(format!(
                "vocabulary has {} terms but {} idf weights",
                self.count_vectorizer.num_features(),
                num_features
            )));
        }

        let mut seen = vec![false; num_features];
        for (term, &idx) in self.count_vectorizer.vocabulary() {
            match seen.get_mut(idx) {
                Some(slot) if !*slot => *slot = true,
                Some(_) => {
                    return Err(Error::InvalidArtifact(format!(
                        "feature index {idx} assigned twice (at '{term}')"
                    )));
                }
                None => {
                    return Err(Error::InvalidArtifact(format!(
                        "feature index {idx} of '{term}' out of range"
                    )));
                }
            }
        }

        if let Some(bad) = self.idf.iter().position(|w| !w.is_finite()) {
            return Err(Error::InvalidArtifact(format!(
                "idf weight at {bad} is not finite"
            )));
        }
        Ok(())
    }

    /// Decode the native (bincode) artifact.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (vectorizer, _): (Self, usize) = bincode::decode_from_slice(bytes, bincode_config())?;
        vectorizer.validate()?;
        Ok(vectorizer)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::encode_to_vec(self, bincode_config())?)
    }

    /// Parse a JSON export. Missing parameters take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let export: VectorizerExport = serde_json::from_str(json)?;
        let defaults = VectorizerParams::default();
        let ngram_range = export.ngram_range.unwrap_or(defaults.ngram_range());
        check_params(ngram_range)?;
        let params = VectorizerParams::new(
            ngram_range.0..=ngram_range.1,
            export.sublinear_tf.unwrap_or(defaults.sublinear_tf()),
            export.min_token_chars.unwrap_or(defaults.min_token_chars()),
        );
        Self::from_parts(export.vocabulary, export.idf, params)
    }

    pub fn to_json(&self) -> Result<String> {
        let params = self.params();
        let export = VectorizerExport {
            vocabulary: self.count_vectorizer.vocabulary().clone(),
            idf: self.idf.clone(),
            ngram_range: Some(params.ngram_range()),
            sublinear_tf: Some(params.sublinear_tf()),
            min_token_chars: Some(params.min_token_chars()),
        };
        Ok(serde_json::to_string(&export)?)
    }

    /// Load an artifact from disk: `.json` files are JSON exports, anything
    /// else is the native bincode format.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let vectorizer = if is_json {
            let json = std::str::from_utf8(&bytes)
                .map_err(|e| Error::InvalidArtifact(format!("{}: {e}", path.display())))?;
            Self::from_json(json)?
        } else {
            Self::from_bytes(&bytes)?
        };
        info!(
            path = %path.display(),
            num_features = vectorizer.num_features(),
            "Loaded TF-IDF vectorizer"
        );
        Ok(vectorizer)
    }

    pub fn transform(&self, document: &str) -> FeatureVector {
        let mut row_entries = self.count_vectorizer.term_counts(document);
        let sublinear_tf = self.params().sublinear_tf();

        // Apply TF-IDF transformation
        for (col_idx, val) in &mut row_entries {
            if sublinear_tf {
                *val = 1.0 + val.ln();
            }
            *val *= self.idf[*col_idx];
        }
        // Normalize row vector (L2 norm)
        let norm = row_entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, val) in &mut row_entries {
                *val /= norm;
            }
        }

        let (indices, data) = row_entries.into_iter().unzip();
        FeatureVector::new(self.num_features(), indices, data)
    }

    /// Encode cleaned tokens. `None` when there is nothing to encode.
    pub fn encode(&self, tokens: &CleanedTokens) -> Option<FeatureVector> {
        if tokens.is_empty() {
            debug!("No tokens to encode");
            return None;
        }
        let features = self.transform(&tokens.join());
        debug!(
            num_tokens = tokens.len(),
            non_zero_entries = features.nnz(),
            "Encoded tokens"
        );
        Some(features)
    }

    pub fn num_features(&self) -> usize {
        self.idf.len()
    }

    pub fn vocabulary(&self) -> &HashMap<String, usize> {
        self.count_vectorizer.vocabulary()
    }

    pub fn params(&self) -> &VectorizerParams {
        self.count_vectorizer.params()
    }
}
