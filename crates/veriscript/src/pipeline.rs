use tracing::debug;
use veriscript_preprocessing::pre_processor::{
    CleanedTokens, LinguisticResources, TfidfVectorizer, normalize, tokenize_and_filter,
};

use crate::{
    Result,
    model::Classifier,
    verdict::{Assessment, Thresholds, trimmed_len},
};

/// Normalize then tokenize and filter.
pub fn preprocess(text: &str, resources: &LinguisticResources) -> CleanedTokens {
    tokenize_and_filter(&normalize(text), resources)
}

/// Run the length gates, the preprocessing steps and, when there is something
/// left to classify, the classifier.
///
/// Only classifier failures are errors; every input-related outcome is an
/// [`Assessment`].
pub fn assess<C: Classifier + ?Sized>(
    text: &str,
    vectorizer: &TfidfVectorizer,
    classifier: &C,
    resources: &LinguisticResources,
    thresholds: &Thresholds,
) -> Result<Assessment> {
    let length = trimmed_len(text);
    if length < thresholds.min_analysis_chars {
        debug!(length, "Text below analysis threshold");
        return Ok(Assessment::TooShort);
    }
    if length > thresholds.max_input_chars {
        debug!(length, "Text above input size limit");
        return Ok(Assessment::TooLong);
    }

    let tokens = preprocess(text, resources);
    let Some(features) = vectorizer.encode(&tokens) else {
        return Ok(Assessment::NoMeaningfulText);
    };

    let label = classifier.predict(&features)?;
    Ok(Assessment::Classified(label))
}
