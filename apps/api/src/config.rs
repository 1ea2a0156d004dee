use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Where uploaded resumes are kept.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageConfig {
    Local {
        root: PathBuf,
    },
    S3 {
        bucket: String,
        endpoint: String,
        access_key_id: String,
        secret_access_key: String,
    },
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub anthropic_api_key: String,
    pub llm_timeout: Duration,
    pub embedding_api_url: String,
    pub embedding_model: String,
    pub embedding_api_key: Option<String>,
    pub skill_lexicon_path: Option<PathBuf>,
    pub storage: StorageConfig,
    pub max_upload_bytes: usize,
    pub default_user_id: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let storage = match optional_env("STORAGE_BACKEND")
            .unwrap_or_else(|| "local".to_string())
            .as_str()
        {
            "local" => StorageConfig::Local {
                root: PathBuf::from(
                    optional_env("RESUME_DIR").unwrap_or_else(|| "resumes".to_string()),
                ),
            },
            "s3" => StorageConfig::S3 {
                bucket: require_env("S3_BUCKET")?,
                endpoint: require_env("S3_ENDPOINT")?,
                access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
                secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            },
            other => bail!("STORAGE_BACKEND must be 'local' or 's3', got '{other}'"),
        };

        let max_upload_mb: usize = parse_env("MAX_UPLOAD_MB", 25)?;

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            llm_timeout: Duration::from_secs(parse_env("LLM_TIMEOUT_SECS", 60)?),
            embedding_api_url: optional_env("EMBEDDING_API_URL")
                .unwrap_or_else(|| "http://localhost:11434/v1/embeddings".to_string()),
            embedding_model: optional_env("EMBEDDING_MODEL")
                .unwrap_or_else(|| "all-minilm".to_string()),
            embedding_api_key: optional_env("EMBEDDING_API_KEY"),
            skill_lexicon_path: optional_env("SKILL_LEXICON_PATH").map(PathBuf::from),
            storage,
            max_upload_bytes: max_upload_mb * 1024 * 1024,
            default_user_id: optional_env("DEFAULT_USER_ID")
                .unwrap_or_else(|| "anonymous_user".to_string()),
            port: parse_env("PORT", 8080)?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Unset and blank values are both treated as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
