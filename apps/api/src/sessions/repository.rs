use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use super::{RankedCandidate, ScreeningSession};
use crate::errors::AppError;

/// Persistence for screening sessions.
///
/// Carried in `AppState` as `Arc<dyn SessionRepository>`.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Writes a new session with a fresh id and the current time, creating
    /// the user record on first use.
    async fn save(
        &self,
        user_id: &str,
        job_description: &str,
        ranked: &[RankedCandidate],
    ) -> Result<ScreeningSession, AppError>;

    /// All sessions of `user_id`, newest first.
    async fn list(&self, user_id: &str) -> Result<Vec<ScreeningSession>, AppError>;
}

#[derive(Debug, FromRow)]
struct SessionRow {
    session_id: Uuid,
    user_id: String,
    job_description: String,
    ranked_resumes: Json<Vec<RankedCandidate>>,
    created_at: DateTime<Utc>,
}

impl From<SessionRow> for ScreeningSession {
    fn from(row: SessionRow) -> Self {
        ScreeningSession {
            session_id: row.session_id,
            user_id: row.user_id,
            job_description: row.job_description,
            ranked_resumes: row.ranked_resumes.0,
            created_at: row.created_at,
        }
    }
}

pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn save(
        &self,
        user_id: &str,
        job_description: &str,
        ranked: &[RankedCandidate],
    ) -> Result<ScreeningSession, AppError> {
        let session_id = Uuid::new_v4();
        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO users (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            INSERT INTO screening_sessions
                (session_id, user_id, job_description, ranked_resumes, created_at)
            VALUES ($1, $2, $3, $4, now())
            RETURNING session_id, user_id, job_description, ranked_resumes, created_at
            "#,
        )
        .bind(session_id)
        .bind(user_id)
        .bind(job_description)
        .bind(Json(ranked))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            "Saved screening session {session_id} for user {user_id} ({} candidates)",
            ranked.len()
        );
        Ok(row.into())
    }

    async fn list(&self, user_id: &str) -> Result<Vec<ScreeningSession>, AppError> {
        let rows = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT session_id, user_id, job_description, ranked_resumes, created_at
            FROM screening_sessions
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ScreeningSession::from).collect())
    }
}
