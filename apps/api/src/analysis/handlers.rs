//! Axum route handlers for the Analysis API.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::analyzer::{job_description_stats, JobDescriptionStats, MatchReport};
use crate::errors::AppError;
use crate::extraction::pdf::extract_text;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalyzeTextRequest {
    pub resume_text: String,
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub resume_file: Option<String>,
    pub report: MatchReport,
}

#[derive(Debug, Deserialize)]
pub struct JobDescriptionStatsRequest {
    pub job_description: String,
}

/// Fields collected from the upload form.
#[derive(Debug, Default)]
struct UploadForm {
    resume: Option<(Option<String>, Vec<u8>)>,
    job_description: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analyze
///
/// Multipart form: `resume` (PDF file) and `job_description` (text).
/// Extracts the resume text and returns the match report.
pub async fn handle_analyze_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let form = read_upload_form(multipart).await?;

    let (file_name, bytes) = form
        .resume
        .filter(|(_, bytes)| !bytes.is_empty())
        .ok_or_else(|| AppError::Validation("Please upload a resume PDF file".to_string()))?;
    let job_description = form
        .job_description
        .filter(|jd| !jd.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Please enter a job description".to_string()))?;

    debug!(
        "Received resume upload {:?} ({} bytes)",
        file_name,
        bytes.len()
    );

    // pdf parsing is CPU-bound
    let resume_text = tokio::task::spawn_blocking(move || extract_text(&bytes))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("extraction task failed: {e}")))??;

    let report = state.analyzer.analyze(&resume_text, &job_description).await?;

    Ok(Json(AnalyzeResponse {
        resume_file: file_name,
        report,
    }))
}

/// POST /api/v1/analyze/text
///
/// Same analysis for a resume that is already plain text.
pub async fn handle_analyze_text(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeTextRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let report = state
        .analyzer
        .analyze(&request.resume_text, &request.job_description)
        .await?;

    Ok(Json(AnalyzeResponse {
        resume_file: None,
        report,
    }))
}

/// POST /api/v1/job-description/stats
///
/// Word count and length hint shown while the job description is typed.
pub async fn handle_job_description_stats(
    Json(request): Json<JobDescriptionStatsRequest>,
) -> Result<Json<JobDescriptionStats>, AppError> {
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "Please enter a job description".to_string(),
        ));
    }
    Ok(Json(job_description_stats(&request.job_description)))
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("resume") => {
                let file_name = field.file_name().map(str::to_string);
                let bytes = field.bytes().await.map_err(multipart_error)?;
                form.resume = Some((file_name, bytes.to_vec()));
            }
            Some("job_description") => {
                form.job_description = Some(field.text().await.map_err(multipart_error)?);
            }
            other => debug!("Ignoring unexpected form field {:?}", other),
        }
    }

    Ok(form)
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("The uploaded file exceeds the size limit".to_string())
    } else {
        AppError::Validation(format!("Malformed upload: {}", err.body_text()))
    }
}
