//! Language capabilities used by the scoring pipeline.
//!
//! Both are loaded once at startup and are read-only afterwards. Scoring code
//! depends only on the traits so tests can substitute deterministic fakes.

pub mod embedding;
pub mod lexicon;

use async_trait::async_trait;
use thiserror::Error;

pub use embedding::{semantic_similarity, HttpEmbedder};
pub use lexicon::LexiconExtractor;

/// Entity label the extractor assigns to required skills.
pub const SKILL_LABEL: &str = "SKILL";

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("embedding API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("embedding API returned no vectors")]
    Empty,

    #[error("embedding dimensions differ: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },
}

/// A labelled span recognised in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub text: String,
    pub label: String,
}

/// Dense sentence-embedding model.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}

/// Tokenizer, noun-chunker and named-entity recogniser over raw text.
pub trait EntityExtractor: Send + Sync {
    /// Surface forms of the tokens, in text order.
    fn tokens(&self, text: &str) -> Vec<String>;

    /// Base noun phrases, in text order.
    fn noun_chunks(&self, text: &str) -> Vec<String>;

    /// Recognised entities, in text order.
    fn entities(&self, text: &str) -> Vec<Entity>;
}
