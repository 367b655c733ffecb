//! Normalizer: raw text to a canonical space-joined sequence of lemmas.
//!
//! Pipeline: lowercase → segment → lemmatize → drop stopwords, punctuation and
//! single-character tokens → join with single spaces. Order and duplicates survive.

use std::sync::Arc;

use crate::matching::language_model::LanguageModel;

/// Turns raw text into normalized text. Swap implementations in tests.
pub trait TextNormalizer: Send + Sync {
    fn normalize(&self, text: &str) -> String;
}

/// Default normalizer backed by the shared English `LanguageModel`.
pub struct LexiconNormalizer {
    model: Arc<LanguageModel>,
}

impl LexiconNormalizer {
    pub fn new(model: Arc<LanguageModel>) -> Self {
        Self { model }
    }
}

impl TextNormalizer for LexiconNormalizer {
    fn normalize(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let mut lemmas: Vec<String> = Vec::new();

        for token in segment(&lowered) {
            if self.model.is_stopword(token) {
                continue;
            }
            let lemma = self.model.lemma(token);
            if lemma.chars().count() <= 1 || self.model.is_stopword(&lemma) {
                continue;
            }
            lemmas.push(lemma.into_owned());
        }

        lemmas.join(" ")
    }
}

/// Splits text into word tokens.
///
/// A token is a run of alphanumeric characters. Tokens starting with a letter
/// keep trailing `+` / `#` (`c++`, `c#`). Everything else separates tokens, so
/// punctuation and whitespace never come out as tokens of their own.
pub fn segment(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;
    let mut has_suffix = false;

    for (idx, ch) in text.char_indices() {
        if ch.is_alphanumeric() {
            match start {
                Some(s) if has_suffix => {
                    tokens.push(&text[s..idx]);
                    start = Some(idx);
                    has_suffix = false;
                }
                Some(_) => {}
                None => start = Some(idx),
            }
        } else if matches!(ch, '+' | '#')
            && start.is_some_and(|s| text[s..].starts_with(char::is_alphabetic))
        {
            has_suffix = true;
        } else if let Some(s) = start.take() {
            tokens.push(&text[s..idx]);
            has_suffix = false;
        }
    }

    if let Some(s) = start {
        tokens.push(&text[s..]);
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> LexiconNormalizer {
        let model = LanguageModel::embedded().expect("bundled resources must load");
        LexiconNormalizer::new(Arc::new(model))
    }

    #[test]
    fn test_segment_splits_on_punctuation() {
        assert_eq!(
            segment("scikit-learn, node.js & python!"),
            vec!["scikit", "learn", "node", "js", "python"]
        );
    }

    #[test]
    fn test_segment_keeps_language_suffixes() {
        assert_eq!(segment("c++ and c# or f#."), vec!["c++", "and", "c#", "or", "f#"]);
        assert_eq!(segment("c++x"), vec!["c++", "x"]);
    }

    #[test]
    fn test_segment_ignores_plus_after_digits() {
        assert_eq!(segment("5+ years"), vec!["5", "years"]);
    }

    #[test]
    fn test_segment_handles_unicode() {
        assert_eq!(segment("café résumé"), vec!["café", "résumé"]);
    }

    #[test]
    fn test_normalize_removes_stopwords_and_lemmatizes() {
        let n = normalizer();
        assert_eq!(
            n.normalize("Seeking a Python engineer skilled in NLP and data pipelines."),
            "seek python engineer skill nlp data pipeline"
        );
    }

    #[test]
    fn test_normalize_preserves_order_and_duplicates() {
        let n = normalizer();
        assert_eq!(
            n.normalize("Rust, Python, Rust and more Rust"),
            "rust python rust rust"
        );
    }

    #[test]
    fn test_normalize_drops_single_characters() {
        let n = normalizer();
        assert_eq!(n.normalize("x y z R candidate's"), "candidate");
    }

    #[test]
    fn test_normalize_empty_and_whitespace() {
        let n = normalizer();
        assert_eq!(n.normalize(""), "");
        assert_eq!(n.normalize("   \n\t  "), "");
        assert_eq!(n.normalize("... !!! ---"), "");
    }

    #[test]
    fn test_normalize_drops_stopword_lemmas() {
        let n = normalizer();
        // "went" lemmatizes to the stopword "go".
        assert_eq!(n.normalize("went home"), "home");
    }

    #[test]
    fn test_normalize_keeps_agent_nouns_distinct() {
        let n = normalizer();
        assert_eq!(
            n.normalize("Workers, a teacher and the news poster"),
            "worker teacher news poster"
        );
        assert_ne!(n.normalize("worker"), n.normalize("work"));
    }

    #[test]
    fn test_normalize_is_idempotent_over_bundled_resources() {
        let n = normalizer();
        let lexicon = include_str!("../../resources/lexicon.txt");
        let irregulars = include_str!("../../resources/irregular_forms.tsv");

        let mut words: Vec<&str> = lexicon
            .lines()
            .filter(|line| !line.starts_with('#'))
            .collect();
        for line in irregulars.lines().filter(|line| !line.starts_with('#')) {
            words.extend(line.split('\t'));
        }
        words.extend(["faster", "bigger", "easiest", "workers", "planned", "running"]);

        let text = words.join(" ");
        let once = n.normalize(&text);
        assert!(!once.is_empty());
        assert_eq!(n.normalize(&once), once);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let n = normalizer();
        let inputs = [
            "Experienced Python engineer with NLP and machine learning background.",
            "We built scalable data pipelines using Kafka, C++ and C#; led 5+ engineers.",
            "Managing Kubernetes clusters, running benchmarks — planned migrations!",
        ];
        for input in inputs {
            let once = n.normalize(input);
            assert_eq!(n.normalize(&once), once, "not a fixed point for {input:?}");
        }
    }
}
