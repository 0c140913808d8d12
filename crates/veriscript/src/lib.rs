//! # veriscript
//!
//! Classifies a piece of text as human-written, AI-generated or a mix of both,
//! using a pre-fitted TF-IDF vectorizer and a trained ONNX classifier.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use veriscript::{Analyzer, ArtifactConfig, UniformSampler};
//! use veriscript_preprocessing::pre_processor::{LinguisticResources, ResourceOptions};
//!
//! let resources = LinguisticResources::prepare(&ResourceOptions::default());
//! let config = ArtifactConfig::new("model.onnx", "vectorizer.json");
//! let analyzer = Analyzer::load(&config, resources)?;
//!
//! let verdict = analyzer.analyze("Some text to analyze, at least forty characters long.", &mut UniformSampler::new())?;
//! println!("{verdict}");
//! # Ok::<(), veriscript::Error>(())
//! ```
//!
//! ## Custom thresholds
//!
//! ```rust,no_run
//! # use veriscript::{Analyzer, ArtifactConfig, Thresholds};
//! # use veriscript_preprocessing::pre_processor::LinguisticResources;
//! # let config = ArtifactConfig::new("model.onnx", "vectorizer.json");
//! let analyzer = Analyzer::load(&config, LinguisticResources::default())?
//!     .with_thresholds(Thresholds {
//!         min_analysis_chars: 20,
//!         ..Thresholds::default()
//!     });
//! # Ok::<(), veriscript::Error>(())
//! ```

#[cfg(feature = "cli")]
pub mod cli;

mod error;
mod model;
mod pipeline;
mod verdict;

use tracing::debug;
use veriscript_preprocessing::pre_processor::{LinguisticResources, TfidfVectorizer};

pub use error::{Error, Result};
pub use model::{ArtifactConfig, Classifier, Label, LabelEncoding, OnnxClassifier};
pub use pipeline::{assess, preprocess};
pub use verdict::{
    AI_LIKELIHOOD_RANGE, Assessment, Category, LikelihoodSampler, MAX_INPUT_CHARS,
    MIN_ANALYSIS_CHARS, MIN_SCORE_CHARS, Thresholds, Tone, UniformSampler, Verdict, compose,
    trimmed_len,
};

/// The full pipeline: gates, preprocessing, encoding, classification and
/// verdict composition over a shared set of loaded artifacts.
pub struct Analyzer<C = OnnxClassifier> {
    vectorizer: TfidfVectorizer,
    classifier: C,
    resources: LinguisticResources,
    thresholds: Thresholds,
}

impl<C: Classifier> Analyzer<C> {
    /// Fails when the classifier declares a feature count the vectorizer does
    /// not produce.
    pub fn new(
        vectorizer: TfidfVectorizer,
        classifier: C,
        resources: LinguisticResources,
    ) -> Result<Self> {
        if let Some(expected) = classifier.expected_features()
            && expected != vectorizer.num_features()
        {
            return Err(Error::DimensionMismatch {
                model: expected,
                vectorizer: vectorizer.num_features(),
            });
        }

        Ok(Self {
            vectorizer,
            classifier,
            resources,
            thresholds: Thresholds::default(),
        })
    }

    #[must_use]
    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    #[must_use]
    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Analyze one submission.
    ///
    /// Input problems (too short, too long, nothing meaningful) come back as
    /// warning verdicts; only classifier failures are errors.
    pub fn analyze<S: LikelihoodSampler + ?Sized>(
        &self,
        text: &str,
        sampler: &mut S,
    ) -> Result<Verdict> {
        let assessment = assess(
            text,
            &self.vectorizer,
            &self.classifier,
            &self.resources,
            &self.thresholds,
        )?;
        let verdict = compose(text, assessment, &self.thresholds, sampler);
        debug!(category = ?verdict.category(), "Composed verdict");
        Ok(verdict)
    }

    #[must_use]
    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    #[must_use]
    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    #[must_use]
    pub fn resources(&self) -> &LinguisticResources {
        &self.resources
    }
}

impl Analyzer<OnnxClassifier> {
    /// Load the vectorizer and ONNX model named by `config`.
    pub fn load(config: &ArtifactConfig, resources: LinguisticResources) -> Result<Self> {
        let vectorizer = TfidfVectorizer::from_path(&config.vectorizer_path)?;
        let classifier = OnnxClassifier::from_path(
            &config.model_path,
            config.labels,
            config.intra_threads,
        )?;
        Self::new(vectorizer, classifier, resources)
    }
}
