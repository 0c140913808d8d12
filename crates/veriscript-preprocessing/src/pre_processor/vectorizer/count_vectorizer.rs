use ahash::HashMap;
use tracing::debug;

use super::{ngrams, params::VectorizerParams};

#[derive(Clone, Debug, bincode::Encode, bincode::Decode)]
pub struct CountVectorizer {
    params: VectorizerParams,
    /// Vocabulary mapping space-joined n-gram to feature index
    vocab: HashMap<String, usize>,
}

impl CountVectorizer {
    pub fn new(vocab: HashMap<String, usize>, params: VectorizerParams) -> Self {
        Self { params, vocab }
    }

    /// Words of a document as the fitted analyzer saw them: lowercased,
    /// whitespace separated, short words dropped.
    fn analyze(&self, document: &str) -> Vec<String> {
        document
            .split_whitespace()
            .map(str::to_lowercase)
            .filter(|word| word.chars().count() >= self.params.min_token_chars())
            .collect()
    }

    /// In-vocabulary term counts of one document, sorted by feature index.
    /// Out-of-vocabulary n-grams are dropped.
    #[allow(clippy::cast_precision_loss)]
    pub fn term_counts(&self, document: &str) -> Vec<(usize, f64)> {
        let words = self.analyze(document);
        let words = words.iter().map(String::as_str).collect::<Vec<_>>();
        let ngrams = ngrams::count_ngrams(&words, self.params.ngram_range());

        let mut row_entries = ngrams
            .iter()
            .filter_map(|(ngram, &count)| {
                self.vocab
                    .get(ngram)
                    .map(|&col_idx| (col_idx, count as f64))
            })
            .collect::<Vec<_>>();
        row_entries.sort_by_key(|(col_idx, _)| *col_idx);

        debug!(
            ngrams = ngrams.len(),
            in_vocabulary = row_entries.len(),
            "Counted document terms"
        );
        row_entries
    }

    pub fn num_features(&self) -> usize {
        self.vocab.len()
    }

    pub fn vocabulary(&self) -> &HashMap<String, usize> {
        &self.vocab
    }

    pub fn params(&self) -> &VectorizerParams {
        &self.params
    }
}
