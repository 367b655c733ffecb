// Résumé ↔ job description matching engine.
// Pure computation over plain text: normalization, keyword extraction,
// TF-IDF similarity and score aggregation. I/O lives in `extraction` and `handlers`.

pub mod handlers;
pub mod keywords;
pub mod language_model;
pub mod normalizer;
pub mod scoring;
pub mod similarity;
