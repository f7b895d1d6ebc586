//! Section segmentation: splits text into named blocks by header-line detection.
//!
//! A header line starts with an accepted spelling as a whole word; any trailing
//! decoration ("SKILLS & ABILITIES", "Experience (2010-2020)") is part of the
//! header and discarded. Lines after a header belong to that section until the
//! next header. A repeated header restarts its section: earlier content for it
//! is dropped.

use std::collections::HashMap;

use regex::Regex;
use serde::Serialize;

use crate::models::cv::{SectionName, Sections};

/// One row of the header table: a section and its accepted header spellings.
#[derive(Debug, Clone, Serialize)]
pub struct SectionRule {
    pub section: SectionName,
    pub headers: &'static [&'static str],
}

/// Checked in order; the first matching rule claims the line.
pub const SECTION_RULES: &[SectionRule] = &[
    SectionRule {
        section: SectionName::Experience,
        headers: &["Work Experience", "Professional Experience", "Experience"],
    },
    SectionRule {
        section: SectionName::Interests,
        headers: &["Interests", "Intrests", "Hobbies"],
    },
    SectionRule {
        section: SectionName::Education,
        headers: &[
            "Academic Qualifications",
            "Academic Qualification",
            "Education",
            "Qualifications",
        ],
    },
    SectionRule {
        section: SectionName::Skills,
        headers: &["Technical Skills", "Key Skills", "Skills"],
    },
];

const BULLET_GLYPHS: &[char] = &['•', '●', '▪', '◦', '‣', '·'];

#[derive(Debug, Clone)]
pub struct SectionSegmenter {
    rules: Vec<(SectionName, Regex)>,
}

impl SectionSegmenter {
    pub fn standard() -> Result<Self, regex::Error> {
        Self::with_rules(SECTION_RULES)
    }

    pub fn with_rules(rules: &[SectionRule]) -> Result<Self, regex::Error> {
        let rules = rules
            .iter()
            .map(|rule| Ok((rule.section, Regex::new(&header_pattern(rule.headers))?)))
            .collect::<Result<Vec<_>, regex::Error>>()?;
        Ok(Self { rules })
    }

    pub fn segment(&self, text: &str) -> Sections {
        let mut buffers: HashMap<SectionName, Vec<String>> = HashMap::new();
        let mut current: Option<SectionName> = None;

        for line in text.lines() {
            if let Some(section) = self.match_header(line) {
                current = Some(section);
                buffers.entry(section).or_default().clear();
                continue;
            }

            if let Some(section) = current {
                buffers
                    .entry(section)
                    .or_default()
                    .push(clean_line(line).to_string());
            }
        }

        let mut sections = Sections::default();
        for (section, lines) in buffers {
            let content = collapse_blank_lines(&lines.join("\n"));
            tracing::debug!(
                section = section.as_str(),
                chars = content.len(),
                "Segmented section"
            );
            sections.set(section, Some(content).filter(|c| !c.is_empty()));
        }
        sections
    }

    /// The section `line` opens, if it is a header.
    fn match_header(&self, line: &str) -> Option<SectionName> {
        self.rules
            .iter()
            .find(|(_, pattern)| pattern.is_match(line))
            .map(|(section, _)| *section)
    }
}

fn header_pattern(headers: &[&str]) -> String {
    let mut headers: Vec<&str> = headers.to_vec();
    headers.sort_by_key(|header| std::cmp::Reverse(header.len()));
    let alternatives = headers
        .iter()
        .map(|header| regex::escape(header))
        .collect::<Vec<_>>()
        .join("|");
    format!(r"(?i)^\s*(?:{alternatives})\b")
}

/// Trims the line and strips a leading bullet marker.
fn clean_line(line: &str) -> &str {
    let line = line.trim();
    let line = line.trim_start_matches(BULLET_GLYPHS).trim_start();
    match line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        Some(rest) => rest.trim_start(),
        None => line,
    }
}

/// Runs of blank lines become a single blank line; outer whitespace is trimmed.
fn collapse_blank_lines(content: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    let mut previous_blank = false;
    for line in content.split('\n') {
        let blank = line.trim().is_empty();
        if blank && previous_blank {
            continue;
        }
        out.push(if blank { "" } else { line });
        previous_blank = blank;
    }
    out.join("\n").trim().to_string()
}
