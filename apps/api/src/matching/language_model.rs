//! Language Model: the process-wide English lexicon used for normalization.
//!
//! Three resources make up the model:
//! - `stopwords.txt`: words dropped from every document
//! - `lexicon.txt`: known base forms; suffix detachment only succeeds when it lands on one
//! - `irregular_forms.tsv`: `inflected<TAB>base` pairs the suffix rules cannot derive
//!
//! The bundled copies are compiled in. `from_dir` reads replacements from disk.
//! Loading validates the data so that lemmatization is a fixed point:
//! `lemma(lemma(w)) == lemma(w)` for every word.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use thiserror::Error;

const BUNDLED_STOPWORDS: &str = include_str!("../../resources/stopwords.txt");
const BUNDLED_LEXICON: &str = include_str!("../../resources/lexicon.txt");
const BUNDLED_IRREGULARS: &str = include_str!("../../resources/irregular_forms.tsv");

pub const STOPWORDS_FILE: &str = "stopwords.txt";
pub const LEXICON_FILE: &str = "lexicon.txt";
pub const IRREGULARS_FILE: &str = "irregular_forms.tsv";

/// Words this short are never run through the suffix rules.
const MIN_RULE_LEN: usize = 4;

/// Suffix detachment rules, tried in order. `(suffix, replacement)`.
const DETACHMENT_RULES: &[(&str, &str)] = &[
    ("ies", "y"),
    ("sses", "ss"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("xes", "x"),
    ("zes", "z"),
    ("men", "man"),
    ("s", ""),
    ("es", "e"),
    ("es", ""),
    ("ed", "e"),
    ("ed", ""),
    ("ing", "e"),
    ("ing", ""),
];

/// Degree suffixes. Only reduce to a base listed in `COMPARATIVE_BASES`,
/// so agent nouns (`worker`, `teacher`, `poster`) keep their form.
const COMPARATIVE_RULES: &[(&str, &str)] = &[
    ("ier", "y"),
    ("iest", "y"),
    ("er", ""),
    ("est", ""),
    ("er", "e"),
    ("est", "e"),
];

/// Adjectives that take `-er` / `-est`. Added to the lexicon at load.
const COMPARATIVE_BASES: &[&str] = &[
    "big", "broad", "cheap", "clean", "close", "deep", "early", "easy", "fast", "great",
    "hard", "high", "large", "late", "long", "low", "new", "old", "quick", "safe", "short",
    "simple", "slow", "small", "smart", "strong", "wide",
];

/// Suffixes whose bare stem may carry a doubled final consonant (`planned` → `plann`).
const UNDOUBLING_SUFFIXES: &[&str] = &["ed", "ing", "er", "est"];

/// Failure to load the language resources. Always fatal at startup.
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("failed to read language resource {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{resource} line {line}: {reason}")]
    Malformed {
        resource: &'static str,
        line: usize,
        reason: String,
    },

    #[error("{resource} contains no entries")]
    Empty { resource: &'static str },

    #[error("inconsistent irregular forms: {0}")]
    Inconsistent(String),
}

/// Read-only English language resources. Shared as `Arc<LanguageModel>`.
#[derive(Debug, Clone)]
pub struct LanguageModel {
    stopwords: HashSet<String>,
    lexicon: HashSet<String>,
    irregulars: HashMap<String, String>,
}

impl LanguageModel {
    /// Parses the resources compiled into the binary.
    pub fn embedded() -> Result<Self, ResourceError> {
        Self::from_sources(BUNDLED_STOPWORDS, BUNDLED_LEXICON, BUNDLED_IRREGULARS)
    }

    /// Reads `stopwords.txt`, `lexicon.txt` and `irregular_forms.tsv` from `dir`.
    pub fn from_dir(dir: &Path) -> Result<Self, ResourceError> {
        let stopwords = read_resource(&dir.join(STOPWORDS_FILE))?;
        let lexicon = read_resource(&dir.join(LEXICON_FILE))?;
        let irregulars = read_resource(&dir.join(IRREGULARS_FILE))?;
        Self::from_sources(&stopwords, &lexicon, &irregulars)
    }

    pub fn from_sources(
        stopwords: &str,
        lexicon: &str,
        irregulars: &str,
    ) -> Result<Self, ResourceError> {
        let stopwords = parse_word_list(stopwords, STOPWORDS_FILE)?;
        let mut lexicon = parse_word_list(lexicon, LEXICON_FILE)?;
        let irregulars = parse_irregulars(irregulars)?;

        for (inflected, base) in &irregulars {
            if let Some(other) = irregulars.get(base) {
                if other != base {
                    return Err(ResourceError::Inconsistent(format!(
                        "'{inflected}' maps to '{base}', which itself maps to '{other}'"
                    )));
                }
            }
            if lexicon.contains(inflected) && inflected != base {
                return Err(ResourceError::Inconsistent(format!(
                    "'{inflected}' is listed as a base form but maps to '{base}'"
                )));
            }
        }

        if let Some(base) = COMPARATIVE_BASES.iter().find(|b| irregulars.contains_key(**b)) {
            return Err(ResourceError::Inconsistent(format!(
                "comparative base '{base}' is listed as an irregular form"
            )));
        }

        // Every irregular base and comparative base is a known base form.
        lexicon.extend(irregulars.values().cloned());
        lexicon.extend(COMPARATIVE_BASES.iter().map(|base| base.to_string()));

        Ok(Self {
            stopwords,
            lexicon,
            irregulars,
        })
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(word)
    }

    /// Reduces a lowercase word to its base form, or returns it unchanged.
    pub fn lemma<'a>(&self, word: &'a str) -> Cow<'a, str> {
        if let Some(base) = self.irregulars.get(word) {
            return Cow::Owned(base.clone());
        }
        if self.lexicon.contains(word) {
            return Cow::Borrowed(word);
        }
        if word.chars().count() < MIN_RULE_LEN || !word.chars().all(char::is_alphabetic) {
            return Cow::Borrowed(word);
        }

        if let Some(base) = detach(word, DETACHMENT_RULES, |c| self.lexicon.contains(c)) {
            return Cow::Owned(base);
        }
        if let Some(base) = detach(word, COMPARATIVE_RULES, |c| {
            COMPARATIVE_BASES.iter().any(|base| *base == c)
        }) {
            return Cow::Owned(base);
        }

        Cow::Borrowed(word)
    }

    pub fn stopword_count(&self) -> usize {
        self.stopwords.len()
    }

    pub fn lexicon_size(&self) -> usize {
        self.lexicon.len()
    }

    pub fn irregular_count(&self) -> usize {
        self.irregulars.len()
    }
}

/// First rule whose candidate (or undoubled stem) passes `known`.
fn detach(
    word: &str,
    rules: &[(&str, &str)],
    known: impl Fn(&str) -> bool,
) -> Option<String> {
    for (suffix, replacement) in rules {
        let Some(stem) = word.strip_suffix(suffix) else {
            continue;
        };
        if stem.is_empty() {
            continue;
        }
        let candidate = format!("{stem}{replacement}");
        if known(&candidate) {
            return Some(candidate);
        }
        if replacement.is_empty() && UNDOUBLING_SUFFIXES.contains(suffix) {
            if let Some(undoubled) = undouble(stem) {
                if known(undoubled) {
                    return Some(undoubled.to_string());
                }
            }
        }
    }
    None
}

/// Drops one letter of a doubled final consonant: `runn` → `run`.
fn undouble(stem: &str) -> Option<&str> {
    let mut chars = stem.chars().rev();
    let last = chars.next()?;
    let before = chars.next()?;
    if last == before && !matches!(last, 'a' | 'e' | 'i' | 'o' | 'u') {
        Some(&stem[..stem.len() - last.len_utf8()])
    } else {
        None
    }
}

fn read_resource(path: &Path) -> Result<String, ResourceError> {
    std::fs::read_to_string(path).map_err(|source| ResourceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Yields `(line_number, trimmed_line)` for every non-blank, non-comment line.
fn content_lines(source: &str) -> impl Iterator<Item = (usize, &str)> {
    source
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

fn check_word(resource: &'static str, line: usize, word: &str) -> Result<(), ResourceError> {
    if !word.chars().all(char::is_alphanumeric) {
        return Err(ResourceError::Malformed {
            resource,
            line,
            reason: format!("'{word}' is not a single alphanumeric word"),
        });
    }
    if word != word.to_lowercase() {
        return Err(ResourceError::Malformed {
            resource,
            line,
            reason: format!("'{word}' is not lowercase"),
        });
    }
    Ok(())
}

fn parse_word_list(source: &str, resource: &'static str) -> Result<HashSet<String>, ResourceError> {
    let mut words = HashSet::new();
    for (line, word) in content_lines(source) {
        check_word(resource, line, word)?;
        words.insert(word.to_string());
    }
    if words.is_empty() {
        return Err(ResourceError::Empty { resource });
    }
    Ok(words)
}

fn parse_irregulars(source: &str) -> Result<HashMap<String, String>, ResourceError> {
    let mut forms = HashMap::new();
    for (line, entry) in content_lines(source) {
        let mut fields = entry.split('\t').map(str::trim);
        let (Some(inflected), Some(base), None) = (fields.next(), fields.next(), fields.next())
        else {
            return Err(ResourceError::Malformed {
                resource: IRREGULARS_FILE,
                line,
                reason: "expected exactly two tab-separated fields".to_string(),
            });
        };
        check_word(IRREGULARS_FILE, line, inflected)?;
        check_word(IRREGULARS_FILE, line, base)?;

        if let Some(previous) = forms.insert(inflected.to_string(), base.to_string()) {
            if previous != base {
                return Err(ResourceError::Malformed {
                    resource: IRREGULARS_FILE,
                    line,
                    reason: format!("'{inflected}' already maps to '{previous}'"),
                });
            }
        }
    }
    Ok(forms)
}
