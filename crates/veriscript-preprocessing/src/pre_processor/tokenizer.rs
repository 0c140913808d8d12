use std::{borrow::Cow, ops::Deref, sync::LazyLock};

use regex::{Captures, Regex};
use tracing::debug;

use super::resources::LinguisticResources;

/// Punctuation and contraction rules, applied in order over the padded text.
/// Modelled on the Penn Treebank conventions so tokens line up with the ones
/// the vectorizer saw at fit time.
const TREEBANK_RULES: &[(&str, &str)] = &[
    // opening quotes
    (r"([«“‘„]|`+)", " $1 "),
    (r#"""#, " \" "),
    // commas and colons not inside numbers
    (r"([:,])([^\d])", " $1 $2"),
    (r"([:,])$", " $1 "),
    // ellipsis
    (r"\.{2,}", " $0 "),
    (r"[;@#$%&?!*]", " $0 "),
    (r"([^'])' ", "$1 ' "),
    (r"[\]\[(){}<>]", " $0 "),
    (r"--", " -- "),
    // closing quotes
    (r"([»”’])", " $1 "),
    (r"''", " '' "),
    // clitics
    (r"([^' ])('[sS]|'[mM]|'[dD]|') ", "$1 $2 "),
    (r"([^' ])('ll|'LL|'re|'RE|'ve|'VE|n't|N'T) ", "$1 $2 "),
    // fused contractions
    (r"(?i)\b(can)(not)\b", " $1 $2 "),
    (r"(?i)\b(d)('ye)\b", " $1 $2 "),
    (r"(?i)\b(gim)(me)\b", " $1 $2 "),
    (r"(?i)\b(gon)(na)\b", " $1 $2 "),
    (r"(?i)\b(got)(ta)\b", " $1 $2 "),
    (r"(?i)\b(lem)(me)\b", " $1 $2 "),
    (r"(?i)\b(more)('n)\b", " $1 $2 "),
    (r"(?i)\b(wan)(na)\s", " $1 $2 "),
    (r"(?i) ('t)(is)\b", " $1 $2 "),
    (r"(?i) ('t)(was)\b", " $1 $2 "),
];

static RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    TREEBANK_RULES
        .iter()
        .map(|&(pattern, replacement)| {
            (
                Regex::new(pattern).expect("tokenizer rule must be a valid regex"),
                replacement,
            )
        })
        .collect()
});

/// A word followed by a single terminal period (and optional closers).
/// Words with inner periods ("e.g.", "u.s.") are left whole.
static FINAL_PERIOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^([^.]+)(\.)([\]\)}>"'»”’]*)$"#)
        .expect("final period rule must be a valid regex")
});

/// A straight apostrophe opening a word: `'quoted`.
static LEADING_QUOTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^|\s)'(\w+)").expect("leading quote rule must be a valid regex")
});

/// Words that keep their leading apostrophe (clitics and elisions).
const ELISIONS: &[&str] = &["s", "m", "d", "t", "n", "re", "ve", "ll", "em", "tis", "twas"];

/// Abbreviations whose period stays attached.
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "mt", "vs", "etc", "inc", "ltd", "co",
    "corp", "dept", "approx", "fig", "jan", "feb", "mar", "apr", "aug", "sept", "oct", "nov",
    "dec",
];

/// Ordered, alphabetic, lowercase, stopword-free, lemmatized tokens.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CleanedTokens(Vec<String>);

impl CleanedTokens {
    /// Space-joined document, the form the vectorizer consumes.
    #[must_use]
    pub fn join(&self) -> String {
        self.0.join(" ")
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl Deref for CleanedTokens {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

fn is_abbreviation(word: &str) -> bool {
    let word = word.trim_start_matches(|c: char| !c.is_alphanumeric());
    ABBREVIATIONS
        .iter()
        .any(|abbreviation| abbreviation.eq_ignore_ascii_case(word))
}

fn split_final_period(chunk: &str) -> Cow<'_, str> {
    FINAL_PERIOD.replace(chunk, |caps: &Captures<'_>| {
        if is_abbreviation(&caps[1]) {
            caps[0].to_owned()
        } else {
            format!("{} {} {}", &caps[1], &caps[2], &caps[3])
        }
    })
}

fn split_leading_quotes(text: &str) -> Cow<'_, str> {
    LEADING_QUOTE.replace_all(text, |caps: &Captures<'_>| {
        let word = &caps[2];
        if ELISIONS.iter().any(|elision| elision.eq_ignore_ascii_case(word)) {
            caps[0].to_owned()
        } else {
            format!("{}' {word}", &caps[1])
        }
    })
}

/// Split text into word tokens, punctuation and contractions separated.
#[must_use]
pub fn word_tokenize(text: &str) -> Vec<String> {
    let mut padded = String::with_capacity(text.len() + 16);
    padded.push(' ');
    for chunk in text.split_whitespace() {
        padded.push_str(&split_final_period(chunk));
        padded.push(' ');
    }

    let padded = split_leading_quotes(&padded).into_owned();
    let tokenized = RULES
        .iter()
        .fold(padded, |acc, (regex, replacement)| {
            match regex.replace_all(&acc, *replacement) {
                Cow::Borrowed(_) => acc,
                Cow::Owned(replaced) => replaced,
            }
        });

    tokenized.split_whitespace().map(str::to_owned).collect()
}

fn is_word(token: &str) -> bool {
    !token.is_empty() && token.chars().all(char::is_alphabetic)
}

/// Tokenize normalized text and keep only alphabetic, non-stopword tokens,
/// each reduced to its lemma.
#[must_use]
pub fn tokenize_and_filter(text: &str, resources: &LinguisticResources) -> CleanedTokens {
    let tokens = word_tokenize(text);
    let total = tokens.len();

    let cleaned = tokens
        .into_iter()
        .filter(|token| is_word(token))
        .map(|token| token.to_lowercase())
        .filter(|token| !resources.stopwords().contains(token))
        .map(|token| {
            let lemma = resources.lemmatizer().lemmatize(&token);
            if is_word(&lemma) { lemma } else { token }
        })
        .collect::<Vec<_>>();

    debug!(total, kept = cleaned.len(), "Filtered tokens");
    CleanedTokens(cleaned)
}
