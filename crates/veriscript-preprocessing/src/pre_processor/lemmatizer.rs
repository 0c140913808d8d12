use std::{fmt, path::Path, str::FromStr};

use ahash::HashMap;
use tracing::debug;

use crate::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
    Adverb,
}

impl PartOfSpeech {
    pub const ALL: [Self; 4] = [Self::Noun, Self::Verb, Self::Adjective, Self::Adverb];

    /// Suffix used by the WordNet database files (`index.noun`, `noun.exc`, ...).
    #[must_use]
    pub fn file_stem(self) -> &'static str {
        match self {
            Self::Noun => "noun",
            Self::Verb => "verb",
            Self::Adjective => "adj",
            Self::Adverb => "adv",
        }
    }

    fn bit(self) -> u8 {
        1 << self.slot()
    }

    fn slot(self) -> usize {
        match self {
            Self::Noun => 0,
            Self::Verb => 1,
            Self::Adjective => 2,
            Self::Adverb => 3,
        }
    }

    /// Detachment rules: (inflected suffix, base suffix).
    fn substitutions(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Noun => &[
                ("s", ""),
                ("ses", "s"),
                ("ves", "f"),
                ("xes", "x"),
                ("zes", "z"),
                ("ches", "ch"),
                ("shes", "sh"),
                ("men", "man"),
                ("ies", "y"),
            ],
            Self::Verb => &[
                ("s", ""),
                ("ies", "y"),
                ("es", "e"),
                ("es", ""),
                ("ed", "e"),
                ("ed", ""),
                ("ing", "e"),
                ("ing", ""),
            ],
            Self::Adjective => &[("er", ""), ("est", ""), ("er", "e"), ("est", "e")],
            Self::Adverb => &[],
        }
    }
}

/// Lemma indexes and exception lists from a WordNet database.
#[derive(Clone, Debug, Default)]
pub struct WordNet {
    /// Lemma -> bitset of the parts of speech it is indexed under.
    lemmas: HashMap<String, u8>,
    exceptions: [HashMap<String, Vec<String>>; 4],
}

impl WordNet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `index.<pos>` (required) and `<pos>.exc` (optional) for every part of speech.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let mut wordnet = Self::new();
        for pos in PartOfSpeech::ALL {
            let index_path = dir.join(format!("index.{}", pos.file_stem()));
            let index = std::fs::read_to_string(&index_path).map_err(|e| Error::io(&index_path, e))?;
            wordnet.add_index(pos, &index);

            let exc_path = dir.join(format!("{}.exc", pos.file_stem()));
            match std::fs::read_to_string(&exc_path) {
                Ok(exceptions) => wordnet.add_exceptions(pos, &exceptions),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    debug!(path = %exc_path.display(), "No exception list");
                }
                Err(e) => return Err(Error::io(&exc_path, e)),
            }
        }
        debug!(
            lemmas = wordnet.lemmas.len(),
            dir = %dir.display(),
            "Loaded WordNet"
        );
        Ok(wordnet)
    }

    /// Parse an index file. Header lines start with whitespace; every other
    /// line starts with the lemma.
    pub fn add_index(&mut self, pos: PartOfSpeech, contents: &str) {
        for line in contents.lines() {
            if line.starts_with(char::is_whitespace) {
                continue;
            }
            if let Some(lemma) = line.split_whitespace().next() {
                *self.lemmas.entry(lemma.to_lowercase()).or_insert(0) |= pos.bit();
            }
        }
    }

    /// Parse an exception file: `inflected base [base ...]` per line.
    pub fn add_exceptions(&mut self, pos: PartOfSpeech, contents: &str) {
        let table = &mut self.exceptions[pos.slot()];
        for line in contents.lines() {
            let mut fields = line.split_whitespace();
            let Some(inflected) = fields.next() else {
                continue;
            };
            let bases = fields.map(str::to_owned).collect::<Vec<_>>();
            if !bases.is_empty() {
                table.insert(inflected.to_owned(), bases);
            }
        }
    }

    #[must_use]
    pub fn with_index(mut self, pos: PartOfSpeech, contents: &str) -> Self {
        self.add_index(pos, contents);
        self
    }

    #[must_use]
    pub fn with_exceptions(mut self, pos: PartOfSpeech, contents: &str) -> Self {
        self.add_exceptions(pos, contents);
        self
    }

    #[must_use]
    pub fn contains(&self, lemma: &str, pos: PartOfSpeech) -> bool {
        self.lemmas
            .get(lemma)
            .is_some_and(|bits| bits & pos.bit() != 0)
    }

    pub fn is_empty(&self) -> bool {
        self.lemmas.is_empty()
    }

    /// Base forms of `form` under `pos` that exist in the index, in discovery order.
    ///
    /// An exception entry replaces the detachment rules for that form.
    #[must_use]
    pub fn morphy(&self, form: &str, pos: PartOfSpeech) -> Vec<String> {
        let mut candidates = vec![form.to_owned()];
        match self.exceptions[pos.slot()].get(form) {
            Some(bases) => candidates.extend(bases.iter().cloned()),
            None => candidates.extend(pos.substitutions().iter().filter_map(|(old, new)| {
                form.strip_suffix(old)
                    .filter(|stem| !stem.is_empty())
                    .map(|stem| format!("{stem}{new}"))
            })),
        }

        let mut found: Vec<String> = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if self.contains(&candidate, pos) && !found.contains(&candidate) {
                found.push(candidate);
            }
        }
        found
    }
}

/// Which parts of speech the lemmatizer considers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LemmatizerMode {
    /// Noun analysis only.
    Noun,
    /// Noun, verb, adjective and adverb analyses; the shortest base form wins.
    #[default]
    AnyPos,
}

impl FromStr for LemmatizerMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "noun" | "n" => Ok(Self::Noun),
            "any" | "any-pos" => Ok(Self::AnyPos),
            other => Err(format!("unknown lemmatizer mode '{other}' (expected 'any' or 'noun')")),
        }
    }
}

impl fmt::Display for LemmatizerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Noun => write!(f, "noun"),
            Self::AnyPos => write!(f, "any"),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Lemmatizer {
    mode: LemmatizerMode,
    wordnet: Option<WordNet>,
}

impl Lemmatizer {
    #[must_use]
    pub fn new(mode: LemmatizerMode, wordnet: Option<WordNet>) -> Self {
        Self { mode, wordnet }
    }

    /// Lemmatizer without dictionary data; returns every word unchanged.
    #[must_use]
    pub fn identity(mode: LemmatizerMode) -> Self {
        Self::new(mode, None)
    }

    #[must_use]
    pub fn mode(&self) -> LemmatizerMode {
        self.mode
    }

    /// True when no WordNet data backs this lemmatizer.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.wordnet.as_ref().is_none_or(WordNet::is_empty)
    }

    /// Dictionary base form of `word`, or `word` itself when none is known.
    #[must_use]
    pub fn lemmatize(&self, word: &str) -> String {
        let Some(wordnet) = &self.wordnet else {
            return word.to_owned();
        };
        let parts: &[PartOfSpeech] = match self.mode {
            LemmatizerMode::Noun => &[PartOfSpeech::Noun],
            LemmatizerMode::AnyPos => &PartOfSpeech::ALL,
        };
        parts
            .iter()
            .flat_map(|&pos| wordnet.morphy(word, pos))
            .min_by_key(|lemma| lemma.chars().count())
            .unwrap_or_else(|| word.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDEX_NOUN: &str = "  1 This software and database is being provided\n\
        dog n 1 1 @ 1 0 02084071\n\
        leaf n 1 1 @ 1 0 13152742\n\
        leave n 1 1 @ 1 0 15137890\n\
        running n 1 1 @ 1 0 00795720\n\
        church n 1 1 @ 1 0 08080386\n\
        woman n 1 1 @ 1 0 10787470\n\
        city n 1 1 @ 1 0 08524735\n";
    const INDEX_VERB: &str = "run v 1 1 @ 1 0 01926311\nleave v 1 1 @ 1 0 02009433\nwrite v 1 1 @ 1 0 01692969\n";
    const INDEX_ADJ: &str = "good a 1 1 & 1 0 01123148\nbig a 1 1 & 1 0 01382086\n";
    const NOUN_EXC: &str = "leaves leaf leave\n";
    const VERB_EXC: &str = "ran run\nrunning run\nwrote write\n";
    const ADJ_EXC: &str = "better good well\nbigger big\n";

    fn wordnet() -> WordNet {
        WordNet::new()
            .with_index(PartOfSpeech::Noun, INDEX_NOUN)
            .with_index(PartOfSpeech::Verb, INDEX_VERB)
            .with_index(PartOfSpeech::Adjective, INDEX_ADJ)
            .with_exceptions(PartOfSpeech::Noun, NOUN_EXC)
            .with_exceptions(PartOfSpeech::Verb, VERB_EXC)
            .with_exceptions(PartOfSpeech::Adjective, ADJ_EXC)
    }

    #[test]
    fn test_index_skips_license_header() {
        let wn = wordnet();
        assert!(wn.contains("dog", PartOfSpeech::Noun));
        assert!(!wn.contains("1", PartOfSpeech::Noun));
        assert!(!wn.contains("dog", PartOfSpeech::Verb));
    }

    #[test]
    fn test_morphy_detachment_rules() {
        let wn = wordnet();
        assert_eq!(wn.morphy("dogs", PartOfSpeech::Noun), vec!["dog"]);
        assert_eq!(wn.morphy("churches", PartOfSpeech::Noun), vec!["church"]);
        assert_eq!(wn.morphy("women", PartOfSpeech::Noun), vec!["woman"]);
        assert_eq!(wn.morphy("cities", PartOfSpeech::Noun), vec!["city"]);
        assert_eq!(wn.morphy("writes", PartOfSpeech::Verb), vec!["write"]);
    }

    #[test]
    fn test_morphy_exceptions_override_rules() {
        let wn = wordnet();
        assert_eq!(wn.morphy("leaves", PartOfSpeech::Noun), vec!["leaf", "leave"]);
        assert_eq!(wn.morphy("ran", PartOfSpeech::Verb), vec!["run"]);
        assert_eq!(wn.morphy("better", PartOfSpeech::Adjective), vec!["good"]);
    }

    #[test]
    fn test_morphy_keeps_form_when_indexed() {
        let wn = wordnet();
        assert_eq!(wn.morphy("running", PartOfSpeech::Noun), vec!["running"]);
        assert!(wn.morphy("unknownword", PartOfSpeech::Noun).is_empty());
    }

    #[test]
    fn test_any_pos_prefers_shortest() {
        let lemmatizer = Lemmatizer::new(LemmatizerMode::AnyPos, Some(wordnet()));
        assert_eq!(lemmatizer.lemmatize("running"), "run");
        assert_eq!(lemmatizer.lemmatize("wrote"), "write");
        assert_eq!(lemmatizer.lemmatize("bigger"), "big");
        assert_eq!(lemmatizer.lemmatize("dogs"), "dog");
    }

    #[test]
    fn test_noun_mode_matches_default_wordnet_call() {
        let lemmatizer = Lemmatizer::new(LemmatizerMode::Noun, Some(wordnet()));
        assert_eq!(lemmatizer.lemmatize("running"), "running");
        assert_eq!(lemmatizer.lemmatize("dogs"), "dog");
        assert_eq!(lemmatizer.lemmatize("wrote"), "wrote");
    }

    #[test]
    fn test_unknown_word_unchanged() {
        let lemmatizer = Lemmatizer::new(LemmatizerMode::AnyPos, Some(wordnet()));
        assert_eq!(lemmatizer.lemmatize("zyzzyva"), "zyzzyva");
    }

    #[test]
    fn test_identity_lemmatizer_is_degraded() {
        let lemmatizer = Lemmatizer::identity(LemmatizerMode::AnyPos);
        assert!(lemmatizer.is_degraded());
        assert_eq!(lemmatizer.lemmatize("running"), "running");
        assert!(!Lemmatizer::new(LemmatizerMode::AnyPos, Some(wordnet())).is_degraded());
    }

    #[test]
    fn test_from_dir_requires_index_files() {
        let dir = tempfile::tempdir().unwrap();
        assert!(WordNet::from_dir(dir.path()).is_err());

        for pos in PartOfSpeech::ALL {
            std::fs::write(dir.path().join(format!("index.{}", pos.file_stem())), "").unwrap();
        }
        std::fs::write(dir.path().join("index.noun"), INDEX_NOUN).unwrap();
        std::fs::write(dir.path().join("noun.exc"), NOUN_EXC).unwrap();

        let wn = WordNet::from_dir(dir.path()).unwrap();
        assert_eq!(wn.morphy("leaves", PartOfSpeech::Noun), vec!["leaf", "leave"]);
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("noun".parse::<LemmatizerMode>(), Ok(LemmatizerMode::Noun));
        assert_eq!("ANY".parse::<LemmatizerMode>(), Ok(LemmatizerMode::AnyPos));
        assert!("verb".parse::<LemmatizerMode>().is_err());
        assert_eq!(LemmatizerMode::AnyPos.to_string(), "any");
    }
}
