use std::ops::RangeInclusive;

#[derive(Clone, Debug, PartialEq, Eq, bincode::Encode, bincode::Decode)]
pub struct VectorizerParams {
    /// Smallest and largest word n-gram, inclusive.
    ngram_range: (usize, usize),
    /// Apply sublinear tf scaling: replace term frequency `tf` with `1 + ln(tf)`.
    /// This reduces the impact of terms that occur many times in a document.
    sublinear_tf: bool,
    /// Words shorter than this (in characters) are not features.
    min_token_chars: usize,
}

impl VectorizerParams {
    pub fn new(
        ngram_range: impl Into<RangeInclusive<usize>>,
        sublinear_tf: bool,
        min_token_chars: usize,
    ) -> Self {
        let range = ngram_range.into();
        let (min_n, max_n) = range.into_inner();
        assert!(min_n >= 1, "ngram_range must start at 1 or above");
        assert!(min_n <= max_n, "ngram_range must not be empty");
        Self {
            ngram_range: (min_n, max_n),
            sublinear_tf,
            min_token_chars,
        }
    }

    #[must_use]
    pub fn ngram_range(&self) -> (usize, usize) {
        self.ngram_range
    }

    #[must_use]
    pub fn sublinear_tf(&self) -> bool {
        self.sublinear_tf
    }

    #[must_use]
    pub fn min_token_chars(&self) -> usize {
        self.min_token_chars
    }
}

impl Default for VectorizerParams {
    fn default() -> Self {
        Self {
            ngram_range: (1, 1),
            sublinear_tf: false,
            min_token_chars: 2,
        }
    }
}

impl From<((usize, usize), bool, usize)> for VectorizerParams {
    fn from(value: ((usize, usize), bool, usize)) -> Self {
        Self::new(value.0.0..=value.0.1, value.1, value.2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_unigram_word_analyzer() {
        let params = VectorizerParams::default();
        assert_eq!(params.ngram_range(), (1, 1));
        assert!(!params.sublinear_tf());
        assert_eq!(params.min_token_chars(), 2);
    }

    #[test]
    fn test_from_tuple() {
        let params = VectorizerParams::from(((1, 3), true, 1));
        assert_eq!(params.ngram_range(), (1, 3));
        assert!(params.sublinear_tf());
    }

    #[test]
    #[should_panic(expected = "ngram_range must not be empty")]
    fn test_rejects_inverted_range() {
        let _ = VectorizerParams::new(3..=1, false, 2);
    }
}
