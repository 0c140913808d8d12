mod count_vectorizer;
mod feature_vector;
mod ngrams;
mod params;
mod tfidf_vectorizer;

pub use feature_vector::FeatureVector;
pub use params::VectorizerParams;
pub use tfidf_vectorizer::TfidfVectorizer;
