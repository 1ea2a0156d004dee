// Screening: feature extraction, composite scoring, explanations and the
// per-run orchestration that ties them to parsing, storage and persistence.
// Every external model is reached through a trait held in `ScoringModels`.

pub mod composite;
pub mod experience;
pub mod explanation;
pub mod handlers;
pub mod pipeline;
pub mod prompts;
pub mod skills;
