use ahash::{HashMap, HashMapExt};

/// Count every word n-gram with `n` in `ngram_range`, keyed by the
/// space-joined words.
pub fn count_ngrams(words: &[&str], ngram_range: (usize, usize)) -> HashMap<String, usize> {
    let mut ngram_counter = HashMap::new();
    let (min_n, max_n) = ngram_range;

    for n in min_n..=max_n {
        for window in words.windows(n) {
            *ngram_counter.entry(window.join(" ")).or_insert(0) += 1;
        }
    }
    ngram_counter
}
