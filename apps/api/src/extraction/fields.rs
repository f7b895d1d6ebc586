//! Labeled field extraction: a data-driven table of label spellings per field.
//!
//! Each rule compiles to `(?i)(?:<labels>):?\s*([^\n]+)` with word-bounded labels.
//! The first match per field wins; the captured remainder of the line is trimmed.

use regex::Regex;
use serde::Serialize;
use tracing::warn;

use crate::extraction::duration::DateTokenizer;
use crate::models::cv::StructuredFields;

/// Single-line fields pulled by label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Contact,
    Address,
    Linkedin,
    Rank,
    ServiceDuration,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Contact => "contact",
            Field::Address => "address",
            Field::Linkedin => "linkedin",
            Field::Rank => "rank",
            Field::ServiceDuration => "service_duration",
        }
    }
}

/// One row of the field table: a field and its accepted label spellings.
#[derive(Debug, Clone, Serialize)]
pub struct FieldRule {
    pub field: Field,
    pub labels: &'static [&'static str],
}

pub const FIELD_RULES: &[FieldRule] = &[
    FieldRule {
        field: Field::Name,
        labels: &["Your Name", "Name"],
    },
    FieldRule {
        field: Field::Contact,
        labels: &["Your Contact Number", "Contact Number", "Contact"],
    },
    FieldRule {
        field: Field::Address,
        labels: &["Your Address", "Address"],
    },
    FieldRule {
        field: Field::Linkedin,
        labels: &["LinkedIn Profile", "LinkedIn"],
    },
    FieldRule {
        field: Field::Rank,
        labels: &["Military Rank", "Rank"],
    },
    FieldRule {
        field: Field::ServiceDuration,
        labels: &["Service Duration", "Service"],
    },
];

#[derive(Debug, Clone)]
struct CompiledRule {
    field: Field,
    pattern: Regex,
}

#[derive(Debug, Clone)]
pub struct FieldExtractor {
    rules: Vec<CompiledRule>,
    dates: DateTokenizer,
}

impl FieldExtractor {
    /// Extractor over the built-in `FIELD_RULES` table.
    pub fn standard() -> Result<Self, regex::Error> {
        Self::with_rules(FIELD_RULES)
    }

    pub fn with_rules(rules: &[FieldRule]) -> Result<Self, regex::Error> {
        let rules = rules
            .iter()
            .map(|rule| {
                Ok(CompiledRule {
                    field: rule.field,
                    pattern: Regex::new(&label_pattern(rule.labels))?,
                })
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;

        Ok(Self {
            rules,
            dates: DateTokenizer::new()?,
        })
    }

    pub fn extract(&self, text: &str) -> StructuredFields {
        let mut fields = StructuredFields::default();

        for rule in &self.rules {
            let slot = fields.slot_mut(rule.field);
            if slot.is_some() {
                continue;
            }
            *slot = rule
                .pattern
                .captures(text)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().trim())
                .filter(|value| !value.is_empty())
                .map(str::to_string);
        }

        if let Some(duration) = fields.service_duration.as_deref() {
            match self.dates.years_of_service(duration) {
                Ok(years) => fields.years_of_service = Some(years),
                Err(e) => warn!(
                    rule = Field::ServiceDuration.as_str(),
                    value = duration,
                    "Could not derive years of service: {e}"
                ),
            }
        }

        fields
    }
}

/// Longest spelling first so "Your Name" wins over "Name" at the same position.
fn label_pattern(labels: &[&str]) -> String {
    let mut labels: Vec<&str> = labels.to_vec();
    labels.sort_by_key(|label| std::cmp::Reverse(label.len()));
    let alternatives = labels
        .iter()
        .map(|label| bounded(label))
        .collect::<Vec<_>>()
        .join("|");
    format!(r"(?i)(?:{alternatives}):?\s*([^\n]+)")
}

/// Escaped label with word boundaries on whichever ends are word characters,
/// so "Rank" does not fire inside "Ranking" and "Name" not inside "Surname".
fn bounded(label: &str) -> String {
    let is_word = |c: Option<char>| c.is_some_and(|c| c.is_alphanumeric() || c == '_');
    let lead = if is_word(label.chars().next()) { r"\b" } else { "" };
    let tail = if is_word(label.chars().last()) { r"\b" } else { "" };
    format!("{lead}{}{tail}", regex::escape(label))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> StructuredFields {
        FieldExtractor::standard().unwrap().extract(text)
    }

    #[test]
    fn test_name_and_rank_only() {
        let fields = extract("Name: Jane Doe\nRank: Captain");
        assert_eq!(fields.name.as_deref(), Some("Jane Doe"));
        assert_eq!(fields.rank.as_deref(), Some("Captain"));
        assert!(fields.contact.is_none());
        assert!(fields.address.is_none());
        assert!(fields.linkedin.is_none());
        assert!(fields.service_duration.is_none());
        assert!(fields.years_of_service.is_none());
    }

    #[test]
    fn test_alternate_spellings_case_insensitive() {
        let fields = extract(
            "YOUR NAME: John Smith\nyour contact number: +44 7700 900123\nLinkedIn Profile: linkedin.com/in/jsmith\nMilitary Rank - Sergeant",
        );
        assert_eq!(fields.name.as_deref(), Some("John Smith"));
        assert_eq!(fields.contact.as_deref(), Some("+44 7700 900123"));
        assert_eq!(fields.linkedin.as_deref(), Some("linkedin.com/in/jsmith"));
        assert_eq!(fields.rank.as_deref(), Some("- Sergeant"));
    }

    #[test]
    fn test_first_match_wins() {
        let fields = extract("Name: First Person\nName: Second Person");
        assert_eq!(fields.name.as_deref(), Some("First Person"));
    }

    #[test]
    fn test_value_on_following_line() {
        let fields = extract("Address:\n  12 Barrack Road, Aldershot");
        assert_eq!(fields.address.as_deref(), Some("12 Barrack Road, Aldershot"));
    }

    #[test]
    fn test_label_inside_word_is_ignored() {
        let fields = extract("Username: jdoe\nRanking: top");
        assert!(fields.name.is_none());
        assert!(fields.rank.is_none());
    }

    #[test]
    fn test_label_must_start_a_word() {
        let fields = extract("Surname: Doe\nServiceman: yes");
        assert!(fields.name.is_none());
        assert!(fields.service_duration.is_none());
    }

    #[test]
    fn test_service_duration_derives_years() {
        let fields = extract("Service Duration: 01/2015 - 01/2020");
        assert_eq!(fields.service_duration.as_deref(), Some("01/2015 - 01/2020"));
        let years = fields.years_of_service.unwrap();
        assert!((years - 5.0).abs() <= 0.1, "Years was {years}");
    }

    #[test]
    fn test_service_duration_with_wrong_token_count_leaves_years_unset() {
        for text in [
            "Service Duration: Ongoing",
            "Service Duration: since 03/2011",
            "Service Duration: 01/2001 - 01/2003 and 01/2005",
        ] {
            let fields = extract(text);
            assert!(fields.service_duration.is_some(), "{text}");
            assert!(fields.years_of_service.is_none(), "{text}");
        }
    }

    #[test]
    fn test_custom_rule_table() {
        let rules = [FieldRule {
            field: Field::Name,
            labels: &["Full Name (as on ID)"],
        }];
        let extractor = FieldExtractor::with_rules(&rules).unwrap();
        let fields = extractor.extract("Full Name (as on ID): Ada Lovelace\nRank: Major");
        assert_eq!(fields.name.as_deref(), Some("Ada Lovelace"));
        assert!(fields.rank.is_none());
    }

    #[test]
    fn test_label_pattern_orders_longest_first() {
        assert_eq!(
            label_pattern(&["Name", "Your Name"]),
            r"(?i)(?:\bYour Name\b|\bName\b):?\s*([^\n]+)"
        );
    }
}
