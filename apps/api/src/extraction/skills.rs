//! Skill extraction: an ordered list of strategies; the first that applies wins.
//!
//! Precedence:
//! 1. `SectionListStrategy`: applies whenever a skills section was segmented.
//! 2. `KeywordScanStrategy`: vocabulary scan over the full text.
//!
//! Whatever the winning strategy returns is deduplicated into a `SkillSet`.

use regex::Regex;

use crate::models::cv::{SectionName, Sections, SkillSet};

/// Domain vocabulary for the keyword fallback.
pub const SKILL_VOCABULARY: &[&str] = &[
    "leadership",
    "communication",
    "teamwork",
    "problem solving",
    "technical",
    "management",
    "planning",
    "training",
    "security",
    "logistics",
    "operations",
    "maintenance",
    "analysis",
];

/// Skill separators inside a skills section.
const SKILL_SEPARATORS: &[char] = &[',', '•', '\n'];

/// A way of deriving raw skill tokens. `None` means "does not apply, try the next".
pub trait SkillStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn collect(&self, sections: &Sections, text: &str) -> Option<Vec<String>>;
}

/// Splits the segmented skills section on commas, bullets and newlines.
pub struct SectionListStrategy;

impl SkillStrategy for SectionListStrategy {
    fn name(&self) -> &'static str {
        "skills_section"
    }

    fn collect(&self, sections: &Sections, _text: &str) -> Option<Vec<String>> {
        let skills = sections.get(SectionName::Skills)?;
        Some(
            skills
                .split(SKILL_SEPARATORS)
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }
}

/// Whole-word, case-insensitive scan for vocabulary terms. Hits are capitalized.
pub struct KeywordScanStrategy {
    terms: Vec<(String, Regex)>,
}

impl KeywordScanStrategy {
    pub fn new(vocabulary: &[&str]) -> Result<Self, regex::Error> {
        let terms = vocabulary
            .iter()
            .map(|term| {
                let pattern = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(term)))?;
                Ok((capitalize(term), pattern))
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;
        Ok(Self { terms })
    }
}

impl SkillStrategy for KeywordScanStrategy {
    fn name(&self) -> &'static str {
        "keyword_scan"
    }

    fn collect(&self, _sections: &Sections, text: &str) -> Option<Vec<String>> {
        Some(
            self.terms
                .iter()
                .filter(|(_, pattern)| pattern.is_match(text))
                .map(|(label, _)| label.clone())
                .collect(),
        )
    }
}

pub struct SkillExtractor {
    strategies: Vec<Box<dyn SkillStrategy>>,
}

impl SkillExtractor {
    /// Section list first, then the keyword scan over `SKILL_VOCABULARY`.
    pub fn standard() -> Result<Self, regex::Error> {
        Ok(Self::with_strategies(vec![
            Box::new(SectionListStrategy),
            Box::new(KeywordScanStrategy::new(SKILL_VOCABULARY)?),
        ]))
    }

    pub fn with_strategies(strategies: Vec<Box<dyn SkillStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn extract(&self, sections: &Sections, text: &str) -> SkillSet {
        self.strategies
            .iter()
            .find_map(|strategy| {
                let tokens = strategy.collect(sections, text)?;
                tracing::debug!(
                    strategy = strategy.name(),
                    tokens = tokens.len(),
                    "Skill strategy applied"
                );
                Some(tokens)
            })
            .unwrap_or_default()
            .into_iter()
            .collect()
    }
}

/// First letter upper-case, the rest lower-case: "problem solving" → "Problem solving".
fn capitalize(term: &str) -> String {
    let mut chars = term.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills_section(content: &str) -> Sections {
        Sections {
            skills: Some(content.to_string()),
            ..Default::default()
        }
    }

    fn sorted(set: &SkillSet) -> Vec<&str> {
        let mut skills: Vec<&str> = set.iter().collect();
        skills.sort();
        skills
    }

    #[test]
    fn test_section_tokens_split_on_commas_bullets_newlines() {
        let extractor = SkillExtractor::standard().unwrap();
        let set = extractor.extract(&skills_section("Python, SQL\nLeadership"), "");
        assert_eq!(sorted(&set), vec!["Leadership", "Python", "SQL"]);
    }

    #[test]
    fn test_section_tokens_deduplicated() {
        let extractor = SkillExtractor::standard().unwrap();
        let set = extractor.extract(&skills_section("Rust • Go, Rust\n\nGo ,"), "");
        assert_eq!(sorted(&set), vec!["Go", "Rust"]);
    }

    #[test]
    fn test_section_takes_precedence_over_keywords() {
        let extractor = SkillExtractor::standard().unwrap();
        let set = extractor.extract(
            &skills_section("Welding"),
            "Strong leadership and teamwork. Skills: Welding",
        );
        assert_eq!(sorted(&set), vec!["Welding"]);
    }

    #[test]
    fn test_keyword_fallback_without_section() {
        let extractor = SkillExtractor::standard().unwrap();
        let set = extractor.extract(
            &Sections::default(),
            "Known for excellent teamwork and planning skills",
        );
        assert!(set.contains("Teamwork"));
        assert!(set.contains("Planning"));
    }

    #[test]
    fn test_keyword_scan_respects_word_boundaries() {
        let strategy = KeywordScanStrategy::new(SKILL_VOCABULARY).unwrap();
        let found = strategy
            .collect(&Sections::default(), "Securityguard; retraining; PROBLEM SOLVING")
            .unwrap();
        assert_eq!(found, vec!["Problem solving".to_string()]);
    }

    #[test]
    fn test_section_strategy_skips_without_section() {
        assert!(SectionListStrategy
            .collect(&Sections::default(), "leadership")
            .is_none());
    }

    #[test]
    fn test_empty_strategy_list_yields_empty_set() {
        let extractor = SkillExtractor::with_strategies(vec![]);
        assert!(extractor.extract(&Sections::default(), "leadership").is_empty());
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("problem solving"), "Problem solving");
        assert_eq!(capitalize("LOGISTICS"), "Logistics");
        assert_eq!(capitalize(""), "");
    }
}
