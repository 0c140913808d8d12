//! # veriscript-preprocessing
//!
//! Turns raw text into the feature vectors the veriscript classifier consumes:
//! normalization, treebank-style tokenization, stopword filtering, WordNet
//! lemmatization and a pre-fitted TF-IDF transform.

mod error;
pub mod pre_processor;

pub use error::{Error, Result};
