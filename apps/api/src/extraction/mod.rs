//! CV extraction: text acquisition, labeled fields, sections and skills.

pub mod acquire;
pub mod document;
pub mod duration;
pub mod error;
pub mod fields;
pub mod handlers;
pub mod ocr;
pub mod pipeline;
pub mod sections;
pub mod skills;
