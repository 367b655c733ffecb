//! Score Aggregator: keyword overlap + TF-IDF similarity → `ScoreReport`.
//!
//! Algorithm:
//! 1. Normalize résumé and job text with the same normalizer
//! 2. Take the top-N job keywords by frequency
//! 3. Partition keywords into matched / missing against the résumé's token set
//! 4. keyword_score    = round(|matched| / |keywords| × 100), 0 without keywords
//! 5. similarity_score = round(cosine × 100)
//! 6. final_score      = round((keyword_score + similarity_score) / 2)
//!
//! Every rounding step rounds half to even: 12.5 → 12, 47.5 → 48, 52.5 → 52.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::matching::keywords::{extract_keywords, extract_keywords_from_normalized, DEFAULT_TOP_N};
use crate::matching::normalizer::TextNormalizer;
use crate::matching::similarity::similarity_score;

/// Result of comparing one résumé with one job description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub final_score: u32,      // 0 – 100
    pub keyword_score: u32,    // 0 – 100
    pub similarity_score: u32, // 0 – 100
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub processed_resume: String,
    pub processed_job: String,
}

/// Scores résumés against job descriptions with an injected normalizer.
///
/// Carried in `AppState` as `Arc<ResumeMatcher>`.
#[derive(Clone)]
pub struct ResumeMatcher {
    normalizer: Arc<dyn TextNormalizer>,
}

impl ResumeMatcher {
    pub fn new(normalizer: Arc<dyn TextNormalizer>) -> Self {
        Self { normalizer }
    }

    pub fn normalize(&self, text: &str) -> String {
        self.normalizer.normalize(text)
    }

    pub fn extract_keywords(&self, job_text: &str, top_n: usize) -> Vec<String> {
        extract_keywords(self.normalizer.as_ref(), job_text, top_n)
    }

    pub fn score_with_default_limit(&self, resume_text: &str, job_text: &str) -> ScoreReport {
        self.score(resume_text, job_text, DEFAULT_TOP_N)
    }

    pub fn score(&self, resume_text: &str, job_text: &str, top_n: usize) -> ScoreReport {
        let processed_resume = self.normalizer.normalize(resume_text);
        let processed_job = self.normalizer.normalize(job_text);

        let keywords = extract_keywords_from_normalized(&processed_job, top_n);
        let resume_tokens: HashSet<&str> = processed_resume.split_whitespace().collect();

        let (matched_keywords, missing_keywords): (Vec<String>, Vec<String>) = keywords
            .iter()
            .cloned()
            .partition(|kw| resume_tokens.contains(kw.as_str()));

        let keyword_score = if keywords.is_empty() {
            0
        } else {
            round_score(matched_keywords.len() as f64 / keywords.len() as f64 * 100.0)
        };
        let similarity_score = similarity_score(&processed_resume, &processed_job);
        let final_score = average_score(keyword_score, similarity_score);

        debug!(
            keyword_score,
            similarity_score,
            final_score,
            keywords = keywords.len(),
            matched = matched_keywords.len(),
            "Scored resume against job description"
        );

        ScoreReport {
            final_score,
            keyword_score,
            similarity_score,
            matched_keywords,
            missing_keywords,
            processed_resume,
            processed_job,
        }
    }
}

/// Rounds half to even and clamps to the 0 – 100 score range.
pub fn round_score(value: f64) -> u32 {
    value.round_ties_even().clamp(0.0, 100.0) as u32
}

/// Unweighted mean of two sub-scores, rounded half to even.
pub fn average_score(keyword_score: u32, similarity_score: u32) -> u32 {
    round_score(f64::from(keyword_score + similarity_score) / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::language_model::LanguageModel;
    use crate::matching::normalizer::LexiconNormalizer;

    const RESUME: &str = "Experienced Python engineer with NLP and machine learning background.";
    const JOB: &str = "Seeking a Python engineer skilled in NLP and data pipelines.";

    fn matcher() -> ResumeMatcher {
        let model = LanguageModel::embedded().expect("bundled resources must load");
        ResumeMatcher::new(Arc::new(LexiconNormalizer::new(Arc::new(model))))
    }

    /// Splits on whitespace only. Lets tests pin exact token streams.
    struct WhitespaceNormalizer;

    impl TextNormalizer for WhitespaceNormalizer {
        fn normalize(&self, text: &str) -> String {
            text.split_whitespace().collect::<Vec<_>>().join(" ")
        }
    }

    fn fake_matcher() -> ResumeMatcher {
        ResumeMatcher::new(Arc::new(WhitespaceNormalizer))
    }

    fn assert_report_invariants(report: &ScoreReport) {
        assert!(report.keyword_score <= 100);
        assert!(report.similarity_score <= 100);
        assert!(report.final_score <= 100);
        assert_eq!(
            report.final_score,
            average_score(report.keyword_score, report.similarity_score)
        );
        for kw in &report.matched_keywords {
            assert!(!report.missing_keywords.contains(kw));
        }
    }

    #[test]
    fn test_round_score_half_to_even() {
        assert_eq!(round_score(12.5), 12);
        assert_eq!(round_score(13.5), 14);
        assert_eq!(round_score(50.0), 50);
        assert_eq!(round_score(49.5), 50);
        assert_eq!(round_score(0.5), 0);
        assert_eq!(round_score(99.5), 100);
        assert_eq!(round_score(42.857), 43);
    }

    #[test]
    fn test_round_score_clamps() {
        assert_eq!(round_score(-3.0), 0);
        assert_eq!(round_score(100.4), 100);
        assert_eq!(round_score(250.0), 100);
    }

    #[test]
    fn test_average_score_boundaries() {
        assert_eq!(average_score(45, 50), 48); // 47.5
        assert_eq!(average_score(55, 50), 52); // 52.5
        assert_eq!(average_score(0, 1), 0); // 0.5
        assert_eq!(average_score(100, 99), 100); // 99.5
        assert_eq!(average_score(100, 100), 100);
    }

    #[test]
    fn test_keyword_ratio_exactly_half_rounds_to_even() {
        // 1 of 8 keywords matched → 12.5 → 12
        let report = fake_matcher().score("k1", "k1 k2 k3 k4 k5 k6 k7 k8", 25);
        assert_eq!(report.matched_keywords, vec!["k1"]);
        assert_eq!(report.missing_keywords.len(), 7);
        assert_eq!(report.keyword_score, 12);
    }

    #[test]
    fn test_empty_resume_scores_zero() {
        let report = matcher().score_with_default_limit(
            "",
            "Looking for a Python engineer with NLP experience.",
        );
        assert_eq!(report.keyword_score, 0);
        assert_eq!(report.similarity_score, 0);
        assert_eq!(report.final_score, 0);
        assert!(report.matched_keywords.is_empty());
        assert!(!report.missing_keywords.is_empty());
        assert_eq!(report.processed_resume, "");
    }

    #[test]
    fn test_both_empty_is_well_formed() {
        let report = matcher().score_with_default_limit("  ", "");
        assert_eq!(report.final_score, 0);
        assert!(report.matched_keywords.is_empty());
        assert!(report.missing_keywords.is_empty());
        assert_report_invariants(&report);
    }

    #[test]
    fn test_identical_inputs_score_100() {
        let report = matcher().score_with_default_limit(JOB, JOB);
        assert_eq!(report.similarity_score, 100);
        assert_eq!(report.keyword_score, 100);
        assert_eq!(report.final_score, 100);
        assert!(report.missing_keywords.is_empty());
    }

    #[test]
    fn test_stopword_only_input_scores_zero_against_itself() {
        let text = "the and with";
        let report = matcher().score_with_default_limit(text, text);
        assert_eq!(report.processed_job, "");
        assert_eq!(report.keyword_score, 0);
        assert_eq!(report.similarity_score, 0);
        assert_eq!(report.final_score, 0);
        assert_report_invariants(&report);
    }

    #[test]
    fn test_concrete_resume_job_pair() {
        let report = matcher().score_with_default_limit(RESUME, JOB);
        assert_eq!(
            report.matched_keywords,
            vec!["python", "engineer", "nlp"]
        );
        assert_eq!(
            report.missing_keywords,
            vec!["seek", "skill", "data", "pipeline"]
        );
        assert_eq!(report.keyword_score, 43); // 3 / 7
        assert!(report.final_score > 0 && report.final_score < 100);
        assert_report_invariants(&report);
    }

    #[test]
    fn test_partition_covers_keyword_list() {
        let m = matcher();
        let report = m.score_with_default_limit(RESUME, JOB);
        let keywords = m.extract_keywords(JOB, DEFAULT_TOP_N);

        let mut union: Vec<String> = report
            .matched_keywords
            .iter()
            .chain(report.missing_keywords.iter())
            .cloned()
            .collect();
        let mut expected = keywords.clone();
        union.sort();
        expected.sort();
        assert_eq!(union, expected);
    }

    #[test]
    fn test_partition_preserves_keyword_order() {
        let report = fake_matcher().score("b d", "a b c d a", 25);
        assert_eq!(report.matched_keywords, vec!["b", "d"]);
        assert_eq!(report.missing_keywords, vec!["a", "c"]);
    }

    #[test]
    fn test_zero_keyword_limit_gives_zero_keyword_score() {
        let report = matcher().score(RESUME, JOB, 0);
        assert_eq!(report.keyword_score, 0);
        assert!(report.matched_keywords.is_empty());
        assert!(report.missing_keywords.is_empty());
        assert!(report.similarity_score > 0);
        assert_report_invariants(&report);
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let m = matcher();
        let first = m.score(RESUME, JOB, 5);
        for _ in 0..5 {
            assert_eq!(m.score(RESUME, JOB, 5), first);
        }
    }

    #[test]
    fn test_similarity_component_is_symmetric() {
        let m = matcher();
        let forward = m.score(RESUME, JOB, 25);
        let backward = m.score(JOB, RESUME, 25);
        assert_eq!(forward.similarity_score, backward.similarity_score);
    }

    #[test]
    fn test_report_serializes_flat_fields() {
        let report = fake_matcher().score("rust", "rust go", 25);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["keyword_score"], 50);
        assert_eq!(json["matched_keywords"][0], "rust");
        assert_eq!(json["missing_keywords"][0], "go");
        assert_eq!(json["processed_job"], "rust go");
    }

    #[test]
    fn test_matcher_shared_across_threads() {
        let m = Arc::new(matcher());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let m = Arc::clone(&m);
                std::thread::spawn(move || m.score_with_default_limit(RESUME, JOB))
            })
            .collect();
        let reports: Vec<ScoreReport> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(reports.windows(2).all(|w| w[0] == w[1]));
    }
}
