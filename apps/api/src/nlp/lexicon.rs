//! Gazetteer-based language model.
//!
//! SKILL entities are the longest known skill phrases found on token
//! boundaries. Noun chunks are approximated as maximal runs of content words
//! inside a clause: punctuation and stop words end a chunk.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::info;

use super::{Entity, EntityExtractor, SKILL_LABEL};

/// Words joined by `.`, `-` or `/` stay one token (`node.js`, `ci/cd`,
/// `scikit-learn`); `+` and `#` are word characters (`c++`, `c#`).
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\p{L}\p{N}][\p{L}\p{N}+#]*(?:[./\-][\p{L}\p{N}+#]+)*")
        .expect("token pattern is valid")
});

const CLAUSE_BREAKS: &[char] = &[
    ',', ';', ':', '.', '!', '?', '(', ')', '[', ']', '{', '}', '"', '|', '•', '\n', '\r', '\t',
];

const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "nor", "of", "in", "on", "at", "to", "for", "from",
    "with", "without", "by", "as", "into", "onto", "over", "under", "about", "across", "via",
    "per", "than", "then", "so", "if", "while", "within", "between", "through", "during",
    "i", "me", "my", "we", "our", "us", "you", "your", "he", "she", "they", "their", "them",
    "it", "its", "this", "that", "these", "those", "who", "whom", "which", "what", "where",
    "when", "how", "is", "are", "was", "were", "be", "been", "being", "am", "has", "have",
    "had", "do", "does", "did", "will", "would", "can", "could", "should", "must", "may",
    "might", "shall", "not", "no", "yes", "also", "very", "more", "most", "all", "any",
    "each", "some", "such", "other", "both", "either", "etc", "years", "year", "plus",
    // Common resume verbs; they open clauses but are never part of a skill.
    "built", "build", "building", "developed", "develop", "developing", "designed", "design",
    "led", "lead", "leading", "managed", "manage", "managing", "worked", "work", "working",
    "used", "use", "using", "including", "includes", "implemented", "created", "maintained",
    "delivered", "shipped", "owned", "improved", "experienced", "skilled", "proficient",
    "familiar", "knowledge", "looking", "seeking", "required", "preferred", "strong",
];

/// Skills recognised when no lexicon file is configured.
pub const BUILTIN_SKILLS: &[&str] = &[
    // Languages
    "Rust", "Python", "Java", "JavaScript", "TypeScript", "Go", "Golang", "C", "C++", "C#",
    "Ruby", "PHP", "Kotlin", "Swift", "Scala", "R", "SQL", "Bash", "Haskell", "Elixir",
    // Web and frameworks
    "React", "Angular", "Vue", "Node.js", "Django", "Flask", "FastAPI", "Spring", "Rails",
    "HTML", "CSS", "GraphQL", "REST", "gRPC", "Tokio", "Axum",
    // Data
    "PostgreSQL", "MySQL", "SQLite", "MongoDB", "Redis", "Kafka", "Elasticsearch", "Spark",
    "Hadoop", "Airflow", "Snowflake", "dbt", "Pandas", "NumPy", "data engineering",
    "data analysis", "data visualization", "ETL", "Tableau", "Power BI", "Excel",
    // ML
    "machine learning", "deep learning", "natural language processing", "NLP",
    "computer vision", "PyTorch", "TensorFlow", "scikit-learn", "statistics",
    // Infrastructure
    "AWS", "Azure", "GCP", "Docker", "Kubernetes", "Terraform", "Ansible", "Linux", "CI/CD",
    "Jenkins", "Git", "microservices", "distributed systems", "cloud computing", "DevOps",
    "observability", "networking", "security",
    // Practice
    "agile", "scrum", "project management", "product management", "system design",
    "unit testing", "test automation", "technical writing", "communication", "leadership",
    "mentoring", "stakeholder management",
];

/// Rule-based tokenizer, noun-chunker and skill recogniser.
#[derive(Debug, Clone)]
pub struct LexiconExtractor {
    /// Normalised phrases: lower-case tokens joined by single spaces.
    skills: HashSet<String>,
    longest_phrase: usize,
}

impl LexiconExtractor {
    pub fn new<I, S>(phrases: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut skills = HashSet::new();
        let mut longest_phrase = 0;
        for phrase in phrases {
            let tokens = lower_tokens(phrase.as_ref());
            if tokens.is_empty() {
                continue;
            }
            longest_phrase = longest_phrase.max(tokens.len());
            skills.insert(tokens.join(" "));
        }
        if skills.is_empty() {
            bail!("skill lexicon is empty");
        }
        Ok(Self {
            skills,
            longest_phrase,
        })
    }

    /// The built-in lexicon, extended with one skill per line from `path`
    /// (blank lines and `#` comments ignored).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut phrases: Vec<String> = BUILTIN_SKILLS.iter().map(|s| s.to_string()).collect();

        if let Some(path) = path {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read skill lexicon {}", path.display()))?;
            let before = phrases.len();
            phrases.extend(
                raw.lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty() && !l.starts_with('#'))
                    .map(String::from),
            );
            info!(
                "Loaded {} skills from {}",
                phrases.len() - before,
                path.display()
            );
        }

        let extractor = Self::new(phrases)?;
        info!("Skill lexicon ready ({} phrases)", extractor.phrase_count());
        Ok(extractor)
    }

    pub fn phrase_count(&self) -> usize {
        self.skills.len()
    }
}

impl EntityExtractor for LexiconExtractor {
    fn tokens(&self, text: &str) -> Vec<String> {
        TOKEN_RE
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    fn noun_chunks(&self, text: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        let mut last_end = 0;

        for m in TOKEN_RE.find_iter(text) {
            let gap = &text[last_end..m.start()];
            last_end = m.end();

            if gap.contains(CLAUSE_BREAKS) {
                flush_chunk(&mut current, &mut chunks);
            }
            if is_stop_word(m.as_str()) {
                flush_chunk(&mut current, &mut chunks);
            } else {
                current.push(m.as_str());
            }
        }
        flush_chunk(&mut current, &mut chunks);
        chunks
    }

    fn entities(&self, text: &str) -> Vec<Entity> {
        let tokens: Vec<&str> = TOKEN_RE.find_iter(text).map(|m| m.as_str()).collect();
        let lowered: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();

        let mut entities = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            let max_len = self.longest_phrase.min(tokens.len() - i);
            let matched = (1..=max_len)
                .rev()
                .find(|&len| self.skills.contains(&lowered[i..i + len].join(" ")));

            match matched {
                Some(len) => {
                    entities.push(Entity {
                        text: tokens[i..i + len].join(" "),
                        label: SKILL_LABEL.to_string(),
                    });
                    i += len;
                }
                None => i += 1,
            }
        }
        entities
    }
}

fn lower_tokens(text: &str) -> Vec<String> {
    TOKEN_RE
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

fn is_stop_word(token: &str) -> bool {
    let lower = token.to_lowercase();
    STOP_WORDS.contains(&lower.as_str()) || lower.chars().all(|c| c.is_ascii_digit() || c == '+')
}

fn flush_chunk(current: &mut Vec<&str>, chunks: &mut Vec<String>) {
    if !current.is_empty() {
        chunks.push(current.join(" "));
        current.clear();
    }
}
