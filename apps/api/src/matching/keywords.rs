//! Keyword Extractor: ranks the distinct terms of a job description by frequency.

use std::collections::HashMap;

use crate::matching::normalizer::TextNormalizer;

/// Default number of keywords pulled from a job description.
pub const DEFAULT_TOP_N: usize = 25;

/// Normalizes `job_text` and returns its `top_n` most frequent terms.
pub fn extract_keywords(normalizer: &dyn TextNormalizer, job_text: &str, top_n: usize) -> Vec<String> {
    let normalized = normalizer.normalize(job_text);
    extract_keywords_from_normalized(&normalized, top_n)
}

/// Same ranking as `extract_keywords`, for text that is already normalized.
pub fn extract_keywords_from_normalized(normalized: &str, top_n: usize) -> Vec<String> {
    rank_terms(normalized)
        .into_iter()
        .take(top_n)
        .map(|(term, _)| term)
        .collect()
}

/// Every distinct term with its frequency, most frequent first.
///
/// Equal frequencies keep the order in which the terms first appeared.
pub fn rank_terms(normalized: &str) -> Vec<(String, u32)> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, u32)> = Vec::new();

    for token in normalized.split_whitespace() {
        match positions.get(token) {
            Some(&idx) => counts[idx].1 += 1,
            None => {
                positions.insert(token, counts.len());
                counts.push((token, 1));
            }
        }
    }

    // sort_by is stable: ties stay in first-occurrence order.
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    counts
        .into_iter()
        .map(|(term, count)| (term.to_string(), count))
        .collect()
}
