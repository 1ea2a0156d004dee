//! Skill overlap between a resume and the SKILL entities of a job description.

use std::collections::{BTreeSet, HashSet};

use crate::nlp::{EntityExtractor, SKILL_LABEL};

/// SKILL entity texts of the job description, in order. Repeated mentions
/// are kept: the match ratio's denominator counts every mention.
pub fn job_skills(job_text: &str, extractor: &dyn EntityExtractor) -> Vec<String> {
    extractor
        .entities(job_text)
        .into_iter()
        .filter(|e| e.label == SKILL_LABEL)
        .map(|e| e.text)
        .collect()
}

/// Skills from `job_skills` present in the resume, lower-cased.
///
/// A token matches on exact surface form; a noun chunk matches on its
/// lower-cased text. Set semantics: each skill appears at most once.
pub fn extract_skills(
    resume_text: &str,
    job_skills: &[String],
    extractor: &dyn EntityExtractor,
) -> BTreeSet<String> {
    let wanted: HashSet<String> = job_skills.iter().map(|s| s.to_lowercase()).collect();
    if wanted.is_empty() {
        return BTreeSet::new();
    }

    let lowered = resume_text.to_lowercase();
    let mut found = BTreeSet::new();

    for token in extractor.tokens(&lowered) {
        if wanted.contains(&token) {
            found.insert(token);
        }
    }

    for chunk in extractor.noun_chunks(&lowered) {
        let chunk = chunk.to_lowercase();
        if wanted.contains(&chunk) {
            found.insert(chunk);
        }
    }

    found
}

/// `matched / required`, defined as 0 when nothing is required.
pub fn skill_match_ratio(matched: usize, required: usize) -> f64 {
    if required == 0 {
        return 0.0;
    }
    matched as f64 / required as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::LexiconExtractor;

    fn extractor() -> LexiconExtractor {
        LexiconExtractor::new(["Rust", "Kubernetes", "machine learning", "PostgreSQL", "Go"])
            .unwrap()
    }

    fn skills(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_job_skills_keep_repeated_mentions() {
        let jd = "Rust engineer. Rust on Kubernetes, machine learning a plus.";
        assert_eq!(
            job_skills(jd, &extractor()),
            vec!["Rust", "Rust", "Kubernetes", "machine learning"]
        );
    }

    #[test]
    fn test_tokens_and_chunks_are_unioned() {
        let found = extract_skills(
            "Built RUST services on Kubernetes, with Machine Learning.",
            &skills(&["Rust", "Kubernetes", "Machine Learning", "PostgreSQL"]),
            &extractor(),
        );
        let expected: BTreeSet<String> = ["rust", "kubernetes", "machine learning"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(found, expected);
    }

    #[test]
    fn test_each_skill_counted_once() {
        let found = extract_skills("rust rust rust. Rust!", &skills(&["Rust"]), &extractor());
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_no_job_skills_means_no_matches() {
        let found = extract_skills("Rust, Kubernetes, PostgreSQL", &[], &extractor());
        assert!(found.is_empty());
    }

    #[test]
    fn test_job_without_skill_entities_scores_zero() {
        let jd = "We want a kind, curious colleague.";
        let required = job_skills(jd, &extractor());
        assert!(required.is_empty());

        let found = extract_skills("Rust and Kubernetes expert", &required, &extractor());
        assert!(found.is_empty());
        assert_eq!(skill_match_ratio(found.len(), required.len()), 0.0);
    }

    #[test]
    fn test_ratio_is_exact() {
        assert_eq!(skill_match_ratio(1, 4), 0.25);
        assert_eq!(skill_match_ratio(3, 3), 1.0);
        assert_eq!(skill_match_ratio(0, 0), 0.0);
        assert!(!skill_match_ratio(0, 0).is_nan());
    }

    #[test]
    fn test_partial_multiword_chunk_does_not_match() {
        // "machine learning pipelines" is one chunk, not "machine learning".
        let found = extract_skills(
            "machine learning pipelines",
            &skills(&["machine learning"]),
            &extractor(),
        );
        assert!(found.is_empty());
    }
}
