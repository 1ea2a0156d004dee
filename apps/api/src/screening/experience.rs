use once_cell::sync::Lazy;
use regex::Regex;

/// "5 years of experience", "10+ years experience", "1 year of experience".
/// The number must come first; "experience of 5 years" does not match.
static YEARS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)([0-9]+)\s*\+?\s*years? of experience|([0-9]+)\s*\+?\s*years? experience")
        .expect("experience pattern is valid")
});

/// Years of experience stated in `text`, taken from the first match only.
/// Returns 0 when nothing matches.
pub fn extract_years_of_experience(text: &str) -> u32 {
    let Some(caps) = YEARS_RE.captures(text) else {
        return 0;
    };
    caps.get(1)
        .or_else(|| caps.get(2))
        // Only digits can reach here, so the sole failure mode is overflow.
        .map(|m| m.as_str().parse::<u32>().unwrap_or(u32::MAX))
        .unwrap_or(0)
}
