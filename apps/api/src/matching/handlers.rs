//! Axum route handlers for the Matching API.

use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::extraction::pdf::extract_text_from_pdf;
use crate::matching::scoring::ScoreReport;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub resume_text: String,
    pub job_text: String,
    /// Negative values yield an empty keyword list. Absent → configured default.
    #[serde(default)]
    pub top_n_keywords: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct NormalizeRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct NormalizeResponse {
    pub normalized: String,
}

/// Where the job description of an upload comes from.
enum JobSource {
    Pdf(Vec<u8>),
    Text(String),
}

#[derive(Default)]
struct UploadForm {
    resume_pdf: Option<Vec<u8>>,
    job_pdf: Option<Vec<u8>>,
    job_text: Option<String>,
    top_n_keywords: Option<i64>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/match
///
/// Scores pasted résumé text against pasted job description text.
pub async fn handle_match(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> Result<Json<ScoreReport>, AppError> {
    if request.job_text.trim().is_empty() {
        return Err(AppError::Validation("job_text cannot be empty".to_string()));
    }

    let top_n = resolve_top_n(request.top_n_keywords, state.config.default_top_n_keywords);
    let report = state
        .matcher
        .score(&request.resume_text, &request.job_text, top_n);

    info!(
        final_score = report.final_score,
        matched = report.matched_keywords.len(),
        missing = report.missing_keywords.len(),
        "Match scored"
    );

    Ok(Json(report))
}

/// POST /api/v1/match/upload
///
/// Multipart form: `resume` (PDF, required), `job_file` (PDF) or `job_text`,
/// optional `top_n_keywords`. PDF extraction and scoring run on the blocking pool.
pub async fn handle_match_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ScoreReport>, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(invalid_multipart)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => form.resume_pdf = Some(field.bytes().await.map_err(invalid_multipart)?.to_vec()),
            "job_file" => form.job_pdf = Some(field.bytes().await.map_err(invalid_multipart)?.to_vec()),
            "job_text" => form.job_text = Some(field.text().await.map_err(invalid_multipart)?),
            "top_n_keywords" => {
                let raw = field.text().await.map_err(invalid_multipart)?;
                let parsed = raw.trim().parse::<i64>().map_err(|_| {
                    AppError::Validation(format!("top_n_keywords must be an integer, got '{raw}'"))
                })?;
                form.top_n_keywords = Some(parsed);
            }
            _ => {} // unknown parts are ignored
        }
    }

    let resume_pdf = form
        .resume_pdf
        .filter(|bytes| !bytes.is_empty())
        .ok_or_else(|| AppError::Validation("Please upload your resume PDF".to_string()))?;

    let job = match (form.job_pdf.filter(|b| !b.is_empty()), form.job_text) {
        (Some(bytes), _) => JobSource::Pdf(bytes),
        (None, Some(text)) if !text.trim().is_empty() => JobSource::Text(text),
        _ => {
            return Err(AppError::Validation(
                "Provide the job description as a job_file PDF or as job_text".to_string(),
            ))
        }
    };

    let top_n = resolve_top_n(form.top_n_keywords, state.config.default_top_n_keywords);
    let matcher = Arc::clone(&state.matcher);

    let report = tokio::task::spawn_blocking(move || -> Result<ScoreReport, AppError> {
        let resume_text = extract_text_from_pdf(&resume_pdf)
            .map_err(|e| AppError::unreadable_pdf("Resume", e))?;

        let job_text = match job {
            JobSource::Pdf(bytes) => {
                let text = extract_text_from_pdf(&bytes)
                    .map_err(|e| AppError::unreadable_pdf("Job Description", e))?;
                if text.is_empty() {
                    return Err(AppError::UnprocessableEntity(
                        "Job Description PDF contains no extractable text".to_string(),
                    ));
                }
                text
            }
            JobSource::Text(text) => text,
        };

        Ok(matcher.score(&resume_text, &job_text, top_n))
    })
    .await
    .context("Scoring task failed")??;

    info!(
        final_score = report.final_score,
        matched = report.matched_keywords.len(),
        missing = report.missing_keywords.len(),
        "Upload match scored"
    );

    Ok(Json(report))
}

/// POST /api/v1/normalize
///
/// Returns the normalized form of a text. Useful for inspecting what the scorer sees.
pub async fn handle_normalize(
    State(state): State<AppState>,
    Json(request): Json<NormalizeRequest>,
) -> Json<NormalizeResponse> {
    Json(NormalizeResponse {
        normalized: state.matcher.normalize(&request.text),
    })
}

/// Negative limits clamp to zero; a missing limit falls back to the configured default.
fn resolve_top_n(requested: Option<i64>, default: usize) -> usize {
    match requested {
        Some(n) => usize::try_from(n).unwrap_or(0),
        None => default,
    }
}

fn invalid_multipart(err: MultipartError) -> AppError {
    AppError::Validation(format!("Invalid multipart body: {err}"))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
