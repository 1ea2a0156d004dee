//! One screening run, from uploaded files to a ranked candidate list.
//!
//! The job description is parsed, its skills extracted and its embedding
//! computed once. Each resume is then parsed, stored, scored and explained in
//! upload order, and the candidates are sorted by score.
//!
//! A resume that cannot be parsed or stored is skipped and reported; a JD that
//! cannot be parsed aborts the run. Model and LLM failures abort the run.
//! Nothing is retried.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::llm_client::TextGenerator;
use crate::nlp::{semantic_similarity, Embedder, EntityExtractor};
use crate::parsing::{parse_document_blocking, UploadedDocument};
use crate::screening::composite::{composite_score, ScoreBreakdown, ScoringWeights};
use crate::screening::experience::extract_years_of_experience;
use crate::screening::explanation::generate_explanation;
use crate::screening::skills::{extract_skills, job_skills, skill_match_ratio};
use crate::sessions::RankedCandidate;
use crate::storage::FileStore;

/// Model handles loaded once at startup and shared read-only by every run.
#[derive(Clone)]
pub struct ScoringModels {
    pub embedder: Arc<dyn Embedder>,
    pub extractor: Arc<dyn EntityExtractor>,
    pub generator: Arc<dyn TextGenerator>,
}

/// The parts of the job description every resume is compared against.
#[derive(Debug, Clone)]
pub struct JobProfile {
    pub text: String,
    pub skills: Vec<String>,
    pub embedding: Vec<f32>,
}

impl JobProfile {
    pub async fn build(models: &ScoringModels, text: String) -> Result<Self, AppError> {
        let skills = job_skills(&text, models.extractor.as_ref());
        let embedding = models.embedder.embed(&text).await?;
        info!("Job description analysed: {} skill mentions", skills.len());
        Ok(Self {
            text,
            skills,
            embedding,
        })
    }
}

/// Everything computed for one resume.
#[derive(Debug, Clone)]
pub struct ResumeEvaluation {
    pub breakdown: ScoreBreakdown,
    pub skills: Vec<String>,
    pub explanation: String,
}

#[derive(Debug)]
pub struct ScreeningRequest {
    pub job_description: UploadedDocument,
    pub resumes: Vec<UploadedDocument>,
    pub weights: ScoringWeights,
}

/// A resume left out of the ranking, and why.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedResume {
    pub filename: String,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct ScreeningOutcome {
    pub job_description: String,
    pub ranked: Vec<RankedCandidate>,
    pub skipped: Vec<SkippedResume>,
}

/// Scores one resume against a prepared job profile and asks for an explanation.
pub async fn evaluate_resume(
    models: &ScoringModels,
    job: &JobProfile,
    resume_text: &str,
    weights: ScoringWeights,
) -> Result<ResumeEvaluation, AppError> {
    let cosine =
        semantic_similarity(models.embedder.as_ref(), &job.embedding, resume_text).await?;

    let skills: Vec<String> = extract_skills(resume_text, &job.skills, models.extractor.as_ref())
        .into_iter()
        .collect();
    let skill_ratio = skill_match_ratio(skills.len(), job.skills.len());

    let years = extract_years_of_experience(resume_text);
    let breakdown = composite_score(cosine, skill_ratio, years, weights);
    debug!("Score breakdown: {breakdown:?}");

    let explanation = generate_explanation(
        models.generator.as_ref(),
        &job.text,
        resume_text,
        &skills,
        years,
    )
    .await?;

    Ok(ResumeEvaluation {
        breakdown,
        skills,
        explanation,
    })
}

/// Sorts by score, highest first. Ties keep upload order.
pub fn rank_candidates(candidates: &mut [RankedCandidate]) {
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
}

/// Runs one full screening. Saving the session is left to the caller.
pub async fn run_screening(
    models: &ScoringModels,
    files: &dyn FileStore,
    request: ScreeningRequest,
) -> Result<ScreeningOutcome, AppError> {
    let ScreeningRequest {
        job_description,
        resumes,
        weights,
    } = request;

    let jd_name = job_description.filename.clone();
    let job_text = match parse_document_blocking(job_description).await {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => {
            return Err(AppError::UnprocessableEntity(format!(
                "No text could be extracted from job description '{jd_name}'"
            )))
        }
        Err(e) => {
            return Err(AppError::UnprocessableEntity(format!(
                "Failed to parse job description '{jd_name}': {e}"
            )))
        }
    };

    let job = JobProfile::build(models, job_text).await?;

    let mut ranked = Vec::with_capacity(resumes.len());
    let mut skipped = Vec::new();

    for resume in resumes {
        let filename = resume.filename.clone();
        let bytes = resume.bytes.clone();

        let resume_text = match parse_document_blocking(resume).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                warn!("Skipping resume {filename}: no text extracted");
                skipped.push(SkippedResume {
                    filename,
                    reason: "no text could be extracted".to_string(),
                });
                continue;
            }
            Err(e) => {
                warn!("Skipping resume {filename}: {e}");
                skipped.push(SkippedResume {
                    filename,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let file_path = match files.save(&filename, &bytes).await {
            Ok(path) => path,
            Err(e) => {
                warn!("Skipping resume {filename}: could not store upload: {e}");
                skipped.push(SkippedResume {
                    filename,
                    reason: format!("could not store file: {e}"),
                });
                continue;
            }
        };

        let evaluation = evaluate_resume(models, &job, &resume_text, weights).await?;
        info!(
            "Scored {filename}: {:.3} (skills {:?}, {} years)",
            evaluation.breakdown.composite,
            evaluation.skills,
            evaluation.breakdown.years_of_experience
        );

        ranked.push(RankedCandidate {
            filename,
            score: evaluation.breakdown.composite,
            explanation: evaluation.explanation,
            file_path,
        });
    }

    rank_candidates(&mut ranked);

    Ok(ScreeningOutcome {
        job_description: job.text,
        ranked,
        skipped,
    })
}
