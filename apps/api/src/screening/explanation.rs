//! Explanation Generator: a short recruiter-facing rationale per candidate.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::llm_client::{LlmError, TextGenerator};
use crate::screening::prompts::EXPLANATION_PROMPT_TEMPLATE;

static PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{(skills|years|job_excerpt|resume_excerpt)\}")
        .expect("placeholder pattern is valid")
});

/// Leading characters of each document included in the prompt.
pub const EXCERPT_CHARS: usize = 1000;

/// Fills the explanation template in a single pass, so placeholder-like text
/// inside a document is never substituted. Documents are cut to
/// [`EXCERPT_CHARS`] characters (not bytes, so multi-byte text is never split
/// mid-character).
pub fn build_explanation_prompt(
    job_text: &str,
    resume_text: &str,
    skills: &[String],
    years_of_experience: u32,
) -> String {
    let skills = if skills.is_empty() {
        "None".to_string()
    } else {
        skills.join(", ")
    };

    let years = years_of_experience.to_string();

    PLACEHOLDER_RE
        .replace_all(EXPLANATION_PROMPT_TEMPLATE, |caps: &Captures| match &caps[1] {
            "skills" => skills.clone(),
            "years" => years.clone(),
            "job_excerpt" => excerpt(job_text).to_string(),
            _ => excerpt(resume_text).to_string(),
        })
        .into_owned()
}

/// Asks the generator for a 2-3 sentence markdown summary and returns it
/// verbatim. Single attempt; errors propagate to the screening run.
pub async fn generate_explanation(
    generator: &dyn TextGenerator,
    job_text: &str,
    resume_text: &str,
    skills: &[String],
    years_of_experience: u32,
) -> Result<String, LlmError> {
    let prompt = build_explanation_prompt(job_text, resume_text, skills, years_of_experience);
    generator.generate(&prompt).await
}

fn excerpt(text: &str) -> &str {
    match text.char_indices().nth(EXCERPT_CHARS) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeGenerator;

    #[test]
    fn test_prompt_lists_skills_and_years() {
        let prompt = build_explanation_prompt(
            "Rust engineer",
            "Jane Doe",
            &["rust".to_string(), "kubernetes".to_string()],
            6,
        );
        assert!(prompt.contains("- Detected Skills: rust, kubernetes"));
        assert!(prompt.contains("- Years of Experience: 6"));
        assert!(prompt.contains("Job Description:\nRust engineer..."));
        assert!(prompt.contains("Resume:\nJane Doe..."));
        assert!(prompt.ends_with("Respond in markdown format."));
    }

    #[test]
    fn test_prompt_says_none_without_skills() {
        let prompt = build_explanation_prompt("jd", "cv", &[], 0);
        assert!(prompt.contains("- Detected Skills: None"));
        assert!(prompt.contains("- Years of Experience: 0"));
    }

    #[test]
    fn test_documents_truncated_to_excerpt_length() {
        let job = "j".repeat(EXCERPT_CHARS + 500);
        let resume = "r".repeat(EXCERPT_CHARS + 1);
        let prompt = build_explanation_prompt(&job, &resume, &[], 0);
        assert!(prompt.contains(&format!("{}...", "j".repeat(EXCERPT_CHARS))));
        assert!(!prompt.contains(&"j".repeat(EXCERPT_CHARS + 1)));
        assert!(!prompt.contains(&"r".repeat(EXCERPT_CHARS + 1)));
    }

    #[test]
    fn test_placeholder_text_in_documents_is_left_alone() {
        let prompt = build_explanation_prompt(
            "Paste {resume_excerpt} here and list {skills}",
            "RESUME BODY",
            &["rust".to_string()],
            2,
        );
        assert!(prompt.contains("Job Description:\nPaste {resume_excerpt} here and list {skills}..."));
        assert_eq!(prompt.matches("RESUME BODY").count(), 1);
        assert!(prompt.contains("- Detected Skills: rust"));
    }

    #[test]
    fn test_truncation_counts_characters_not_bytes() {
        let text = "é".repeat(EXCERPT_CHARS + 10);
        assert_eq!(excerpt(&text).chars().count(), EXCERPT_CHARS);
        assert_eq!(excerpt("short"), "short");
    }

    #[tokio::test]
    async fn test_generator_response_returned_verbatim() {
        let generator = FakeGenerator::replying("**Good fit.** Strong Rust background.");
        let text = generate_explanation(&generator, "jd", "cv", &[], 3)
            .await
            .unwrap();
        assert_eq!(text, "**Good fit.** Strong Rust background.");

        let prompts = generator.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("- Years of Experience: 3"));
    }

    #[tokio::test]
    async fn test_generator_failure_propagates() {
        let generator = FakeGenerator::failing();
        let result = generate_explanation(&generator, "jd", "cv", &[], 0).await;
        assert!(matches!(result, Err(LlmError::Api { status: 429, .. })));
        assert_eq!(generator.prompts().len(), 1, "no retry expected");
    }
}
