//! Pre-processing stages, leaf first: normalizer, tokenizer/filter with its
//! linguistic resources, and the TF-IDF feature encoder.

mod lemmatizer;
mod normalizer;
mod resources;
mod stopwords;
mod tokenizer;
mod vectorizer;

pub use lemmatizer::{Lemmatizer, LemmatizerMode, PartOfSpeech, WordNet};
pub use normalizer::normalize;
pub use resources::{DEFAULT_BUNDLE_URLS, LinguisticResources, ResourceOptions};
pub use stopwords::{ENGLISH_STOPWORDS, Stopwords};
pub use tokenizer::{CleanedTokens, tokenize_and_filter, word_tokenize};
pub use vectorizer::{FeatureVector, TfidfVectorizer, VectorizerParams};
