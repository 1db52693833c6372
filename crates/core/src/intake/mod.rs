//! Intake questionnaires driven by the wizard.
//!
//! Each questionnaire is a fixed set of sections with default values, five
//! labelled steps, and the fields each step requires.

pub mod socioeducational;
pub mod student_profile;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::completion::is_filled;
use crate::error::CoreError;
use crate::routes::{STUDENT_QUESTIONNAIRE_PATH, TEACHER_DIAGNOSTIC_PATH};

/// The questionnaires the portal knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntakeKind {
    /// Administrative data, support network and socioeconomic battery.
    StudentProfile,
    /// Integrated socioeducational questionnaire.
    Socioeducational,
}

impl IntakeKind {
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "student-profile" => Ok(Self::StudentProfile),
            "socioeducational" => Ok(Self::Socioeducational),
            _ => Err(CoreError::Validation(format!(
                "Invalid intake '{s}'. Must be one of: student-profile, socioeducational"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StudentProfile => "student-profile",
            Self::Socioeducational => "socioeducational",
        }
    }

    pub fn schema(&self) -> &'static dyn IntakeSchema {
        match self {
            Self::StudentProfile => &student_profile::StudentProfile,
            Self::Socioeducational => &socioeducational::Socioeducational,
        }
    }

    /// Portal page that hosts this questionnaire; its route rule gates it.
    pub fn hosting_path(&self) -> &'static str {
        match self {
            Self::StudentProfile => TEACHER_DIAGNOSTIC_PATH,
            Self::Socioeducational => STUDENT_QUESTIONNAIRE_PATH,
        }
    }
}

impl fmt::Display for IntakeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field addressed by section and name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRef {
    pub section: &'static str,
    pub field: &'static str,
}

impl FieldRef {
    pub const fn new(section: &'static str, field: &'static str) -> Self {
        Self { section, field }
    }

    pub fn get<'a>(&self, sections: &'a Map<String, Value>) -> Option<&'a Value> {
        sections.get(self.section)?.get(self.field)
    }

    /// Non-empty after trimming (strings) or filled per the completion rule.
    pub fn is_answered(&self, sections: &Map<String, Value>) -> bool {
        match self.get(sections) {
            Some(Value::String(s)) => !s.trim().is_empty(),
            Some(value) => is_filled(value),
            None => false,
        }
    }
}

/// Shape and rules of one questionnaire.
pub trait IntakeSchema: Send + Sync {
    fn kind(&self) -> IntakeKind;

    /// Storage key prefix for this questionnaire's drafts.
    fn storage_key(&self) -> &'static str;

    /// One label per step, in order.
    fn step_labels(&self) -> &'static [&'static str];

    /// Fully shaped sections with every field at its default.
    fn defaults(&self) -> Map<String, Value>;

    /// Fields that must be answered for `step` (1-based) to count as valid.
    fn required_fields(&self, step: u8) -> &'static [FieldRef];

    /// Whether the finished questionnaire satisfies its submission rules.
    /// `None` for questionnaires without such rules.
    fn completion_rule(&self, sections: &Map<String, Value>) -> Option<bool>;

    fn total_steps(&self) -> u8 {
        self.step_labels().len() as u8
    }

    fn step_label(&self, step: u8) -> Option<&'static str> {
        let index = usize::from(step).checked_sub(1)?;
        self.step_labels().get(index).copied()
    }
}

/// Unwrap a `json!` object literal.
pub(crate) fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
