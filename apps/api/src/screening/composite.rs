//! Composite Scorer: blends semantic similarity, skill overlap and experience
//! into one score using caller-supplied percentage weights.
//!
//! The score lies in [0, 1] when the weights sum to at most 100 and the cosine
//! is non-negative. Outside that range it is left as computed, so distinct
//! candidates never collapse into ties.

use serde::Serialize;

/// Full credit for experience is reached at this many years.
const FULL_CREDIT_YEARS: f64 = 10.0;

/// Caller-supplied weights, each a percentage in [0, 100]. Semantic similarity
/// receives whatever is left of 100.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub skills: f64,
    pub experience: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            skills: 50.0,
            experience: 50.0,
        }
    }
}

impl ScoringWeights {
    /// Accepts weights only within [0, 100].
    pub fn new(skills: f64, experience: f64) -> Result<Self, String> {
        for (name, value) in [("skills_weight", skills), ("experience_weight", experience)] {
            if !(0.0..=100.0).contains(&value) {
                return Err(format!("{name} must be between 0 and 100, got {value}"));
            }
        }
        Ok(Self { skills, experience })
    }
}

/// Every term of one composite computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub cosine: f64,
    pub skill_ratio: f64,
    pub years_of_experience: u32,
    pub experience_score: f64,
    pub semantic_weight: f64,
    pub skills_weight: f64,
    pub effective_experience_weight: f64,
    pub composite: f64,
}

/// `min(years / 10, 1)`.
pub fn experience_score(years: u32) -> f64 {
    (f64::from(years) / FULL_CREDIT_YEARS).min(1.0)
}

/// Combines the three signals.
///
/// With no detected experience the experience weight is forced to 0 whatever
/// the caller configured, so a missing signal neither inflates nor deflates
/// the score. Its share then goes to semantic similarity.
pub fn composite_score(
    cosine: f64,
    skill_ratio: f64,
    years_of_experience: u32,
    weights: ScoringWeights,
) -> ScoreBreakdown {
    let (experience_score, effective_experience_weight) = if years_of_experience > 0 {
        (experience_score(years_of_experience), weights.experience)
    } else {
        (0.0, 0.0)
    };

    let semantic_weight = (100.0 - (weights.skills + effective_experience_weight)).max(0.0);

    let composite = (cosine * semantic_weight
        + skill_ratio * weights.skills
        + experience_score * effective_experience_weight)
        / 100.0;

    ScoreBreakdown {
        cosine,
        skill_ratio,
        years_of_experience,
        experience_score,
        semantic_weight,
        skills_weight: weights.skills,
        effective_experience_weight,
        composite,
    }
}
