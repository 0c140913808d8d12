use std::{io::BufRead, path::Path};

use ahash::HashSet;

use crate::{Error, Result};

/// The English stopword list shipped with the NLTK stopwords corpus (179 words).
///
/// Used when no resource bundle is available. Vectorizers fitted against a
/// different list should be paired with a bundle carrying that list.
pub const ENGLISH_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't",
    "wouldn", "wouldn't",
];

#[derive(Clone, Debug)]
pub struct Stopwords {
    words: HashSet<String>,
}

impl Stopwords {
    /// Built-in English list.
    #[must_use]
    pub fn english() -> Self {
        Self::from_words(ENGLISH_STOPWORDS.iter().copied())
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// Read a one-word-per-line list (the NLTK `corpora/stopwords/<lang>` format).
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|e| Error::io(path, e))?;
        let lines = std::io::BufReader::new(file)
            .lines()
            .collect::<std::io::Result<Vec<_>>>()
            .map_err(|e| Error::io(path, e))?;
        let stopwords = Self::from_words(lines);
        if stopwords.is_empty() {
            return Err(Error::InvalidArtifact(format!(
                "stopword list {} is empty",
                path.display()
            )));
        }
        Ok(stopwords)
    }

    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for Stopwords {
    fn default() -> Self {
        Self::english()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_list_size() {
        assert_eq!(ENGLISH_STOPWORDS.len(), 179);
        assert_eq!(Stopwords::english().len(), 179);
    }

    #[test]
    fn test_common_function_words() {
        let stopwords = Stopwords::english();
        for word in ["the", "is", "and", "a", "an", "of", "it", "don't", "t"] {
            assert!(stopwords.contains(word), "{word} should be a stopword");
        }
        assert!(!stopwords.contains("model"));
        assert!(!stopwords.contains("The"));
    }

    #[test]
    fn test_from_path_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("english");
        std::fs::write(&path, "the\n\nFoo\n  bar \n").unwrap();

        let stopwords = Stopwords::from_path(&path).unwrap();
        assert_eq!(stopwords.len(), 3);
        assert!(stopwords.contains("foo"));
        assert!(stopwords.contains("bar"));
    }

    #[test]
    fn test_from_path_rejects_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("english");
        std::fs::write(&path, "\n\n").unwrap();

        assert!(Stopwords::from_path(&path).is_err());
    }
}
