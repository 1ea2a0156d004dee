use axum::{
    extract::{Multipart, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::parsing::UploadedDocument;
use crate::screening::composite::ScoringWeights;
use crate::screening::pipeline::{run_screening, ScreeningRequest, SkippedResume};
use crate::sessions::{RankedCandidate, ScreeningSession};
use crate::state::AppState;
use crate::storage::original_filename;

#[derive(Debug, Serialize)]
pub struct ScreeningResponse {
    /// Absent when the session could not be saved.
    pub session_id: Option<Uuid>,
    pub ranked_candidates: Vec<RankedCandidate>,
    pub skipped: Vec<SkippedResume>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persistence_error: Option<String>,
}

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub user_id: Option<String>,
}

#[derive(Deserialize)]
pub struct FileQuery {
    pub path: String,
}

/// Form fields of a screening upload before validation.
#[derive(Default)]
struct ScreeningForm {
    job_description: Option<UploadedDocument>,
    resumes: Vec<UploadedDocument>,
    skills_weight: Option<f64>,
    experience_weight: Option<f64>,
    user_id: Option<String>,
}

async fn read_form(mut multipart: Multipart) -> Result<ScreeningForm, AppError> {
    let mut form = ScreeningForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "job_description" | "resumes" => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes: Bytes = field.bytes().await?;
                let doc = UploadedDocument {
                    filename,
                    content_type,
                    bytes,
                };
                if name == "job_description" {
                    form.job_description = Some(doc);
                } else {
                    form.resumes.push(doc);
                }
            }
            "skills_weight" => form.skills_weight = Some(parse_weight(&name, &field.text().await?)?),
            "experience_weight" => {
                form.experience_weight = Some(parse_weight(&name, &field.text().await?)?)
            }
            "user_id" => {
                let value = field.text().await?;
                let value = value.trim();
                if !value.is_empty() {
                    form.user_id = Some(value.to_string());
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

fn parse_weight(field: &str, raw: &str) -> Result<f64, AppError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| AppError::Validation(format!("{field} must be a number, got '{raw}'")))
}

/// POST /api/v1/screenings
pub async fn handle_create_screening(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ScreeningResponse>, AppError> {
    let form = read_form(multipart).await?;

    let job_description = form
        .job_description
        .ok_or_else(|| AppError::Validation("A job description file is required".to_string()))?;
    if form.resumes.is_empty() {
        return Err(AppError::Validation(
            "At least one resume file is required".to_string(),
        ));
    }

    let defaults = ScoringWeights::default();
    let weights = ScoringWeights::new(
        form.skills_weight.unwrap_or(defaults.skills),
        form.experience_weight.unwrap_or(defaults.experience),
    )
    .map_err(AppError::Validation)?;
    let user_id = form
        .user_id
        .unwrap_or_else(|| state.config.default_user_id.clone());

    info!(
        "Screening {} resumes for user {user_id} (skills {}, experience {})",
        form.resumes.len(),
        weights.skills,
        weights.experience
    );

    let outcome = run_screening(
        &state.models,
        state.files.as_ref(),
        ScreeningRequest {
            job_description,
            resumes: form.resumes,
            weights,
        },
    )
    .await?;

    let (session_id, persistence_error) = match state
        .sessions
        .save(&user_id, &outcome.job_description, &outcome.ranked)
        .await
    {
        Ok(session) => (Some(session.session_id), None),
        Err(e) => {
            error!("Failed to save screening session for user {user_id}: {e}");
            (None, Some(format!("Failed to save session: {e}")))
        }
    };

    Ok(Json(ScreeningResponse {
        session_id,
        ranked_candidates: outcome.ranked,
        skipped: outcome.skipped,
        persistence_error,
    }))
}

/// GET /api/v1/screenings
pub async fn handle_list_screenings(
    State(state): State<AppState>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<Vec<ScreeningSession>>, AppError> {
    let user_id = params
        .user_id
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| state.config.default_user_id.clone());
    let sessions = state.sessions.list(&user_id).await?;
    Ok(Json(sessions))
}

/// GET /api/v1/files
pub async fn handle_download_file(
    State(state): State<AppState>,
    Query(params): Query<FileQuery>,
) -> Result<impl IntoResponse, AppError> {
    let bytes = state.files.load(&params.path).await?;
    let name = original_filename(&params.path);

    Ok((
        [
            (header::CONTENT_TYPE, content_type_for(name).to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", header_safe(name)),
            ),
        ],
        bytes,
    ))
}

fn content_type_for(filename: &str) -> &'static str {
    let lower = filename.to_ascii_lowercase();
    if lower.ends_with(".pdf") {
        "application/pdf"
    } else if lower.ends_with(".docx") {
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    } else if lower.ends_with(".txt") {
        "text/plain; charset=utf-8"
    } else {
        "application/octet-stream"
    }
}

/// Header values must be visible ASCII; anything else becomes `_`.
fn header_safe(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c == ' ' || c.is_ascii_graphic() => c,
            _ => '_',
        })
        .collect()
}
