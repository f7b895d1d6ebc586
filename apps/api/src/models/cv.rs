use serde::{Deserialize, Serialize};

use crate::extraction::fields::Field;

/// Labeled single-line fields. Unmatched fields are `None`, never `""`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredFields {
    pub name: Option<String>,
    pub contact: Option<String>,
    pub address: Option<String>,
    pub linkedin: Option<String>,
    pub rank: Option<String>,
    pub service_duration: Option<String>,
    /// Derived from `service_duration` only when it holds exactly two dates.
    pub years_of_service: Option<f64>,
}

impl StructuredFields {
    pub fn slot_mut(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Name => &mut self.name,
            Field::Contact => &mut self.contact,
            Field::Address => &mut self.address,
            Field::Linkedin => &mut self.linkedin,
            Field::Rank => &mut self.rank,
            Field::ServiceDuration => &mut self.service_duration,
        }
    }

    pub fn found_count(&self) -> usize {
        [
            &self.name,
            &self.contact,
            &self.address,
            &self.linkedin,
            &self.rank,
            &self.service_duration,
        ]
        .iter()
        .filter(|v| v.is_some())
        .count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionName {
    Experience,
    Interests,
    Education,
    Skills,
}

impl SectionName {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionName::Experience => "experience",
            SectionName::Interests => "interests",
            SectionName::Education => "education",
            SectionName::Skills => "skills",
        }
    }
}

/// Multi-line free-text sections, newline-joined. Sections never seen are `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sections {
    pub experience: Option<String>,
    pub interests: Option<String>,
    pub education: Option<String>,
    pub skills: Option<String>,
}

impl Sections {
    pub fn get(&self, name: SectionName) -> Option<&str> {
        self.slot(name).as_deref()
    }

    pub fn set(&mut self, name: SectionName, content: Option<String>) {
        *self.slot_mut(name) = content;
    }

    pub fn found_count(&self) -> usize {
        [
            &self.experience,
            &self.interests,
            &self.education,
            &self.skills,
        ]
        .iter()
        .filter(|v| v.is_some())
        .count()
    }

    fn slot(&self, name: SectionName) -> &Option<String> {
        match name {
            SectionName::Experience => &self.experience,
            SectionName::Interests => &self.interests,
            SectionName::Education => &self.education,
            SectionName::Skills => &self.skills,
        }
    }

    fn slot_mut(&mut self, name: SectionName) -> &mut Option<String> {
        match name {
            SectionName::Experience => &mut self.experience,
            SectionName::Interests => &mut self.interests,
            SectionName::Education => &mut self.education,
            SectionName::Skills => &mut self.skills,
        }
    }
}

/// Deduplicated skills, kept in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillSet(Vec<String>);

impl SkillSet {
    /// Adds a trimmed skill unless it is empty or already present.
    pub fn insert(&mut self, skill: &str) -> bool {
        let skill = skill.trim();
        if skill.is_empty() || self.contains(skill) {
            return false;
        }
        self.0.push(skill.to_string());
        true
    }

    pub fn contains(&self, skill: &str) -> bool {
        self.0.iter().any(|s| s == skill)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[allow(dead_code)]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for SkillSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = SkillSet::default();
        for skill in iter {
            set.insert(skill.as_ref());
        }
        set
    }
}

/// The full extraction result for one document.
///
/// Serializes as a flat mapping: the seven field keys, the four section keys,
/// then `skills_list`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvRecord {
    #[serde(flatten)]
    pub fields: StructuredFields,
    #[serde(flatten)]
    pub sections: Sections,
    pub skills_list: SkillSet,
}
