use std::{
    fs,
    io::{Cursor, Read},
    path::{Path, PathBuf},
};

use tempfile::tempdir;
use tracing::{debug, info, warn};

use super::{
    lemmatizer::{Lemmatizer, LemmatizerMode, PartOfSpeech, WordNet},
    stopwords::Stopwords,
};
use crate::{Error, Result};

const CORPORA_DIR: &str = "corpora";
const STOPWORDS_FILE: &str = "corpora/stopwords/english";
const WORDNET_DIR: &str = "corpora/wordnet";

/// Top-level directory some bundles wrap their contents in.
const BUNDLE_ROOT: &str = "nltk_data";

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// NLTK package archives for the stopword list and WordNet.
pub const DEFAULT_BUNDLE_URLS: &[&str] = &[
    "https://raw.githubusercontent.com/nltk/nltk_data/gh-pages/packages/corpora/stopwords.zip",
    "https://raw.githubusercontent.com/nltk/nltk_data/gh-pages/packages/corpora/wordnet.zip",
];

/// Where to find (and, if missing, how to fetch) the language-resource bundle.
#[derive(Clone, Debug)]
pub struct ResourceOptions {
    /// Directory laid out like NLTK data (`corpora/stopwords`, `corpora/wordnet`).
    pub dir: Option<PathBuf>,
    /// Archives fetched into `dir` when the files are missing, in order. Each is
    /// either a `.tar.gz` bundle or an NLTK package `.zip`.
    pub urls: Vec<String>,
    pub lemmatizer_mode: LemmatizerMode,
}

impl Default for ResourceOptions {
    fn default() -> Self {
        Self {
            dir: None,
            urls: DEFAULT_BUNDLE_URLS.iter().map(ToString::to_string).collect(),
            lemmatizer_mode: LemmatizerMode::default(),
        }
    }
}

/// Stopword list and lemmatizer shared by every request.
#[derive(Clone, Debug, Default)]
pub struct LinguisticResources {
    stopwords: Stopwords,
    lemmatizer: Lemmatizer,
}

/// Bundle files relative to the resource directory. Exception lists are optional.
fn bundle_files() -> Vec<(PathBuf, bool)> {
    let wordnet = Path::new(WORDNET_DIR);
    let mut files = vec![(PathBuf::from(STOPWORDS_FILE), true)];
    for pos in PartOfSpeech::ALL {
        files.push((wordnet.join(format!("index.{}", pos.file_stem())), true));
        files.push((wordnet.join(format!("{}.exc", pos.file_stem())), false));
    }
    files
}

fn bundle_present(dir: &Path) -> bool {
    bundle_files()
        .iter()
        .filter(|(_, required)| *required)
        .all(|(file, _)| dir.join(file).exists())
}

fn download_bundle(url: &str) -> Result<Vec<u8>> {
    let download_error = |reason: String| Error::Download {
        url: url.to_owned(),
        reason,
    };

    let mut data = Vec::new();
    ureq::get(url)
        .call()
        .map_err(|e| download_error(e.to_string()))?
        .into_body()
        .into_reader()
        .read_to_end(&mut data)
        .map_err(|e| download_error(e.to_string()))?;
    Ok(data)
}

fn unpack_archive(data: &[u8], dest: &Path) -> Result<()> {
    if data.starts_with(ZIP_MAGIC) {
        zip::ZipArchive::new(Cursor::new(data))?.extract(dest)?;
    } else {
        tar::Archive::new(flate2::read::GzDecoder::new(data))
            .unpack(dest)
            .map_err(|e| Error::io(dest, e))?;
    }
    Ok(())
}

/// Find a bundle file in an unpacked archive. Bundles may be wrapped in
/// `nltk_data/` and NLTK packages drop the `corpora/` prefix.
fn locate(root: &Path, file: &Path) -> Option<PathBuf> {
    let package_relative = file.strip_prefix(CORPORA_DIR).ok();
    [root.join(BUNDLE_ROOT), root.to_path_buf()]
        .into_iter()
        .flat_map(|base| [Some(base.join(file)), package_relative.map(|rel| base.join(rel))])
        .flatten()
        .find(|candidate| candidate.is_file())
}

/// Unpack an archive and copy the bundle files it holds into `target_dir`.
fn install_bundle(data: &[u8], target_dir: &Path) -> Result<usize> {
    let temp_dir = tempdir().map_err(|e| Error::io(std::env::temp_dir(), e))?;
    unpack_archive(data, temp_dir.path())?;

    let mut copied = 0;
    for (file, _) in bundle_files() {
        let Some(from) = locate(temp_dir.path(), &file) else {
            continue;
        };
        let to = target_dir.join(&file);
        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        fs::copy(&from, &to).map_err(|e| Error::io(&to, e))?;
        copied += 1;
    }
    Ok(copied)
}

impl LinguisticResources {
    #[must_use]
    pub fn new(stopwords: Stopwords, lemmatizer: Lemmatizer) -> Self {
        Self {
            stopwords,
            lemmatizer,
        }
    }

    /// Built-in stopwords, no lemmatization data.
    #[must_use]
    pub fn builtin(mode: LemmatizerMode) -> Self {
        Self::new(Stopwords::english(), Lemmatizer::identity(mode))
    }

    /// Load the bundle from `dir`. Every required file must be present.
    pub fn load(dir: &Path, mode: LemmatizerMode) -> Result<Self> {
        let stopwords = Stopwords::from_path(&dir.join(STOPWORDS_FILE))?;
        let wordnet = WordNet::from_dir(&dir.join(WORDNET_DIR))?;
        Ok(Self::new(stopwords, Lemmatizer::new(mode, Some(wordnet))))
    }

    /// Best-effort preparation: whatever cannot be fetched or loaded falls back
    /// to the built-in stopword list and an identity lemmatizer. Never fails.
    #[must_use]
    pub fn prepare(options: &ResourceOptions) -> Self {
        let mode = options.lemmatizer_mode;
        let Some(dir) = options.dir.as_deref() else {
            warn!("No language resource directory configured, lemmatization disabled");
            return Self::builtin(mode);
        };

        if !bundle_present(dir) {
            if options.urls.is_empty() {
                warn!(
                    dir = %dir.display(),
                    "Language resources missing and no bundle URL configured"
                );
            }
            for url in &options.urls {
                info!(url, dir = %dir.display(), "Fetching language resources");
                match download_bundle(url).and_then(|data| install_bundle(&data, dir)) {
                    Ok(copied) => debug!(url, files = copied, "Language resources installed"),
                    Err(e) => warn!(url, error = %e, "Could not fetch language resources"),
                }
            }
        }

        let stopwords = Stopwords::from_path(&dir.join(STOPWORDS_FILE)).unwrap_or_else(|e| {
            debug!(error = %e, "Using built-in stopword list");
            Stopwords::english()
        });
        let lemmatizer = match WordNet::from_dir(&dir.join(WORDNET_DIR)) {
            Ok(wordnet) => Lemmatizer::new(mode, Some(wordnet)),
            Err(e) => {
                warn!(error = %e, "WordNet unavailable, lemmatization disabled");
                Lemmatizer::identity(mode)
            }
        };

        info!(
            stopwords = stopwords.len(),
            lemmatizer = %mode,
            degraded = lemmatizer.is_degraded(),
            "Language resources ready"
        );
        Self::new(stopwords, lemmatizer)
    }

    #[must_use]
    pub fn stopwords(&self) -> &Stopwords {
        &self.stopwords
    }

    #[must_use]
    pub fn lemmatizer(&self) -> &Lemmatizer {
        &self.lemmatizer
    }
}
