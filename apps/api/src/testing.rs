//! Deterministic stand-ins for the external capabilities, used by unit and
//! router tests.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::config::{Config, StorageConfig};
use crate::errors::AppError;
use crate::llm_client::{LlmError, TextGenerator};
use crate::nlp::lexicon::BUILTIN_SKILLS;
use crate::nlp::{Embedder, EmbeddingError, LexiconExtractor};
use crate::screening::pipeline::ScoringModels;
use crate::sessions::{RankedCandidate, ScreeningSession, SessionRepository};
use crate::state::AppState;
use crate::storage::{storage_name, FileStore, StorageError, RESUME_PREFIX};

const FAKE_DIMENSION: usize = 256;

/// Bag-of-words embedding: each lower-cased word adds 1 to a hashed bucket.
/// Texts sharing words get a higher cosine similarity.
pub struct FakeEmbedder;

#[async_trait]
impl Embedder for FakeEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut vector = vec![0.0_f32; FAKE_DIMENSION];
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            vector[fnv1a(&word.to_lowercase()) % FAKE_DIMENSION] += 1.0;
        }
        Ok(vector)
    }
}

fn fnv1a(word: &str) -> usize {
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in word.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash as usize
}

/// Canned generator that records every prompt it receives.
#[derive(Clone)]
pub struct FakeGenerator {
    reply: Option<String>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl FakeGenerator {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            prompts: Arc::default(),
        }
    }

    /// Fails every call the way a quota-exhausted service would.
    pub fn failing() -> Self {
        Self {
            reply: None,
            prompts: Arc::default(),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone().ok_or(LlmError::Api {
            status: 429,
            message: "quota exceeded".to_string(),
        })
    }
}

/// In-memory file store; `failing()` rejects every write.
#[derive(Default)]
pub struct MemoryFileStore {
    files: Mutex<HashMap<String, Vec<u8>>>,
    fail_writes: bool,
}

impl MemoryFileStore {
    pub fn failing() -> Self {
        Self {
            files: Mutex::default(),
            fail_writes: true,
        }
    }

    pub fn len(&self) -> usize {
        self.files.lock().unwrap().len()
    }
}

#[async_trait]
impl FileStore for MemoryFileStore {
    async fn save(&self, filename: &str, bytes: &[u8]) -> Result<String, StorageError> {
        if self.fail_writes {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only volume",
            )));
        }
        let path = format!("{RESUME_PREFIX}/{}", storage_name(filename));
        self.files
            .lock()
            .unwrap()
            .insert(path.clone(), bytes.to_vec());
        Ok(path)
    }

    async fn load(&self, file_path: &str) -> Result<Vec<u8>, StorageError> {
        self.files
            .lock()
            .unwrap()
            .get(file_path)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(file_path.to_string()))
    }
}

/// Session repository backed by a vector; `unavailable()` fails every call.
#[derive(Default)]
pub struct InMemorySessionRepository {
    sessions: Mutex<Vec<ScreeningSession>>,
    unavailable: bool,
}

impl InMemorySessionRepository {
    pub fn unavailable() -> Self {
        Self {
            sessions: Mutex::default(),
            unavailable: true,
        }
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn save(
        &self,
        user_id: &str,
        job_description: &str,
        ranked: &[RankedCandidate],
    ) -> Result<ScreeningSession, AppError> {
        if self.unavailable {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        let session = ScreeningSession {
            session_id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            job_description: job_description.to_string(),
            ranked_resumes: ranked.to_vec(),
            created_at: Utc::now(),
        };
        self.sessions.lock().unwrap().push(session.clone());
        Ok(session)
    }

    async fn list(&self, user_id: &str) -> Result<Vec<ScreeningSession>, AppError> {
        if self.unavailable {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        let mut sessions: Vec<_> = self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        // Stable sort, then reverse insertion order for equal timestamps.
        sessions.reverse();
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sessions)
    }
}

pub fn test_models(generator: FakeGenerator) -> ScoringModels {
    ScoringModels {
        embedder: Arc::new(FakeEmbedder),
        extractor: Arc::new(LexiconExtractor::new(BUILTIN_SKILLS).unwrap()),
        generator: Arc::new(generator),
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost/screener_test".to_string(),
        anthropic_api_key: "test-key".to_string(),
        llm_timeout: Duration::from_secs(5),
        embedding_api_url: "http://localhost:11434/v1/embeddings".to_string(),
        embedding_model: "all-minilm".to_string(),
        embedding_api_key: None,
        skill_lexicon_path: None,
        storage: StorageConfig::Local {
            root: PathBuf::from("resumes"),
        },
        max_upload_bytes: 1024 * 1024,
        default_user_id: "anonymous_user".to_string(),
        port: 0,
        rust_log: "debug".to_string(),
    }
}

pub fn test_state(
    generator: FakeGenerator,
    sessions: Arc<dyn SessionRepository>,
    files: Arc<dyn FileStore>,
) -> AppState {
    AppState {
        models: test_models(generator),
        sessions,
        files,
        config: test_config(),
    }
}
