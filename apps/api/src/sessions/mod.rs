//! Session Store: persisted screening runs and their ranked candidates.

pub mod repository;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use repository::{PgSessionRepository, SessionRepository};

/// One scored resume. Only ever stored embedded in a [`ScreeningSession`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub filename: String,
    /// Composite score; in [0, 1] for weights summing to at most 100.
    pub score: f64,
    pub explanation: String,
    /// Reference returned by the file store when the upload was saved.
    pub file_path: String,
}

/// A completed screening run. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningSession {
    pub session_id: Uuid,
    pub user_id: String,
    pub job_description: String,
    /// Highest score first, as ranked when the session was created.
    pub ranked_resumes: Vec<RankedCandidate>,
    pub created_at: DateTime<Utc>,
}
