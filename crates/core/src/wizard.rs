//! Resumable multi-step questionnaire wizard.
//!
//! A [`WizardController`] walks a fixed sequence of steps over the sections
//! of one [`IntakeSchema`]. Every mutation is written to the [`DraftStore`]
//! straight away so closing the wizard never loses answers. Finalizing from
//! the last step hands a [`SubmissionRecord`] to a [`SubmissionSink`] and
//! clears the draft once the sink accepts it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::completion::{self, CompletionReport};
use crate::draft_store::DraftStore;
use crate::error::CoreError;
use crate::intake::{IntakeKind, IntakeSchema};
use crate::submission::{SubmissionReceipt, SubmissionRecord, SubmissionSink};
use crate::types::PrincipalId;

/// First step number (1-based).
pub const FIRST_STEP: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardState {
    Step(u8),
    /// Finalized; the draft has been cleared.
    Submitted,
    /// Closed without submitting; the draft is kept for later.
    Aborted,
}

impl WizardState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Step(_) => "in_progress",
            Self::Submitted => "submitted",
            Self::Aborted => "aborted",
        }
    }
}

/// What gets persisted: the step the user was on plus every section.
///
/// Sections are flattened next to `current_step` so drafts written before
/// the step was tracked still load. A step that is not a whole number
/// falls back to the first step instead of losing the saved sections.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedDraft {
    #[serde(default = "first_step", deserialize_with = "lenient_step")]
    current_step: u8,
    #[serde(flatten)]
    sections: Map<String, Value>,
}

fn first_step() -> u8 {
    FIRST_STEP
}

/// Saturates large steps so the caller's clamp lands on the last step.
fn lenient_step<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(match raw.as_u64() {
        Some(step) => u8::try_from(step).unwrap_or(u8::MAX),
        None => FIRST_STEP,
    })
}

/// Serializable view of an open wizard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WizardSnapshot {
    pub intake: IntakeKind,
    pub status: &'static str,
    pub current_step: Option<u8>,
    pub total_steps: u8,
    pub step_label: Option<&'static str>,
    pub step_valid: bool,
    pub all_steps_valid: bool,
    pub progress: CompletionReport,
    pub sections: Map<String, Value>,
}

pub struct WizardController {
    schema: &'static dyn IntakeSchema,
    store: DraftStore,
    key: String,
    owner: PrincipalId,
    state: WizardState,
    sections: Map<String, Value>,
}

impl WizardController {
    /// Storage key of `owner`'s draft for `schema`.
    pub fn draft_key(schema: &dyn IntakeSchema, owner: &str) -> String {
        format!("{}:{}", schema.storage_key(), owner)
    }

    /// Resume `owner`'s draft, or start from defaults if there is none.
    ///
    /// Saved values are laid over the defaults so the draft is always fully
    /// shaped; fields the schema no longer knows are dropped.
    pub fn open(schema: &'static dyn IntakeSchema, store: DraftStore, owner: &str) -> Self {
        let key = Self::draft_key(schema, owner);
        let mut sections = schema.defaults();
        let mut step = FIRST_STEP;

        if let Some(saved) = store.load::<PersistedDraft>(&key) {
            overlay(&mut sections, saved.sections);
            step = saved.current_step.clamp(FIRST_STEP, schema.total_steps());
            tracing::debug!(key = %key, step, "Resumed wizard draft");
        }

        Self {
            schema,
            store,
            key,
            owner: owner.to_string(),
            state: WizardState::Step(step),
            sections,
        }
    }

    pub fn schema(&self) -> &'static dyn IntakeSchema {
        self.schema
    }

    pub fn state(&self) -> WizardState {
        self.state
    }

    pub fn current_step(&self) -> Option<u8> {
        match self.state {
            WizardState::Step(step) => Some(step),
            _ => None,
        }
    }

    pub fn total_steps(&self) -> u8 {
        self.schema.total_steps()
    }

    pub fn sections(&self) -> &Map<String, Value> {
        &self.sections
    }

    // -- navigation --

    /// Advance one step, stopping at the last. Never blocked by validity.
    pub fn next(&mut self) -> WizardState {
        if let WizardState::Step(step) = self.state {
            self.state = WizardState::Step((step + 1).min(self.total_steps()));
            self.persist();
        }
        self.state
    }

    /// Go back one step, stopping at the first.
    pub fn prev(&mut self) -> WizardState {
        if let WizardState::Step(step) = self.state {
            self.state = WizardState::Step(step.saturating_sub(1).max(FIRST_STEP));
            self.persist();
        }
        self.state
    }

    /// Close without submitting. The draft stays in storage.
    pub fn cancel(&mut self) {
        self.state = WizardState::Aborted;
    }

    /// Throw away all progress: clear storage and restart from defaults.
    pub fn discard(&mut self) {
        self.store.clear(&self.key);
        self.sections = self.schema.defaults();
        self.state = WizardState::Step(FIRST_STEP);
        tracing::info!(key = %self.key, "Wizard progress discarded");
    }

    // -- editing --

    /// Set one field and persist.
    pub fn set_field(&mut self, section: &str, field: &str, value: Value) -> Result<(), CoreError> {
        let mut fields = Map::new();
        fields.insert(field.to_string(), value);
        self.update_section(section, fields)
    }

    /// Set several fields of one section and persist once.
    ///
    /// All fields are checked before any is written, so an unknown field
    /// leaves the section untouched.
    pub fn update_section(&mut self, section: &str, fields: Map<String, Value>) -> Result<(), CoreError> {
        self.ensure_open()?;
        let mut updated = self
            .sections
            .get(section)
            .cloned()
            .ok_or_else(|| unknown_section(section))?;

        for (field, value) in fields {
            let slot = updated
                .get_mut(&field)
                .ok_or_else(|| unknown_field(section, &field))?;
            assign(slot, value, section, &field)?;
        }

        self.sections.insert(section.to_string(), updated);
        self.persist();
        Ok(())
    }

    // -- validity & progress --

    /// Whether every required field of `step` is answered.
    pub fn step_valid(&self, step: u8) -> bool {
        self.schema
            .required_fields(step)
            .iter()
            .all(|field| field.is_answered(&self.sections))
    }

    pub fn all_steps_valid(&self) -> bool {
        (FIRST_STEP..=self.total_steps()).all(|step| self.step_valid(step))
    }

    /// Share of filled fields across every section.
    pub fn progress(&self) -> CompletionReport {
        completion::evaluate_map(&self.sections)
    }

    pub fn snapshot(&self) -> WizardSnapshot {
        let current_step = self.current_step();
        WizardSnapshot {
            intake: self.schema.kind(),
            status: self.state.as_str(),
            current_step,
            total_steps: self.total_steps(),
            step_label: current_step.and_then(|step| self.schema.step_label(step)),
            step_valid: current_step.is_some_and(|step| self.step_valid(step)),
            all_steps_valid: self.all_steps_valid(),
            progress: self.progress(),
            sections: self.sections.clone(),
        }
    }

    // -- finalize --

    /// Build the submission for the current answers. Only allowed on the
    /// last step.
    pub fn build_submission(&self) -> Result<SubmissionRecord, CoreError> {
        let last = self.total_steps();
        match self.state {
            WizardState::Step(step) if step == last => {}
            WizardState::Step(step) => {
                return Err(CoreError::Validation(format!(
                    "Cannot finalize: must be on step {last} ({}), currently on step {step}",
                    self.schema.step_label(last).unwrap_or_default()
                )));
            }
            _ => return Err(closed_error(self.state)),
        }

        Ok(SubmissionRecord {
            id: Uuid::now_v7(),
            intake: self.schema.kind(),
            submitted_by: self.owner.clone(),
            sections: self.sections.clone(),
            registered_at: chrono::Utc::now(),
            completed: self.schema.completion_rule(&self.sections),
        })
    }

    /// Hand the submission to `sink` and close the wizard.
    ///
    /// The draft is cleared only after the sink accepts the record. On a
    /// sink failure the wizard stays on the last step with its draft intact
    /// so the caller can retry.
    pub async fn finalize(&mut self, sink: &dyn SubmissionSink) -> Result<SubmissionReceipt, CoreError> {
        let record = self.build_submission()?;
        let id = record.id;
        let registered_at = record.registered_at;
        let completed = record.completed;

        let stored_id = match sink.persist(record).await {
            Ok(stored_id) => stored_id,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Submission failed; draft kept");
                return Err(match e {
                    CoreError::SubmissionFailed(msg) => CoreError::SubmissionFailed(msg),
                    other => CoreError::SubmissionFailed(other.to_string()),
                });
            }
        };

        self.store.clear(&self.key);
        self.state = WizardState::Submitted;

        tracing::info!(
            intake = %self.schema.kind(),
            owner = %self.owner,
            submission_id = %id,
            stored_id = %stored_id,
            completed = ?completed,
            "Questionnaire submitted"
        );

        Ok(SubmissionReceipt {
            id,
            stored_id,
            registered_at,
            completed,
        })
    }

    // -- helpers --

    fn ensure_open(&self) -> Result<(), CoreError> {
        match self.state {
            WizardState::Step(_) => Ok(()),
            state => Err(closed_error(state)),
        }
    }

    fn persist(&self) {
        let draft = PersistedDraft {
            current_step: self.current_step().unwrap_or(FIRST_STEP),
            sections: self.sections.clone(),
        };
        self.store.save(&self.key, &draft);
    }
}

/// Replace `slot` with `value`, merging into nested mappings so they keep
/// their shape. A value must be of the same kind as the one it replaces,
/// so a field never drifts from the kind of its default.
fn assign(slot: &mut Value, value: Value, section: &str, field: &str) -> Result<(), CoreError> {
    match (slot, value) {
        (Value::Object(existing), Value::Object(incoming)) => {
            for (key, value) in incoming {
                let nested = existing
                    .get_mut(&key)
                    .ok_or_else(|| unknown_field(section, &format!("{field}.{key}")))?;
                assign(nested, value, section, &format!("{field}.{key}"))?;
            }
            Ok(())
        }
        (slot, value) => {
            let expected = ValueKind::of(slot);
            if !expected.accepts(&value) {
                return Err(CoreError::Validation(format!(
                    "Field '{section}.{field}' expects {}",
                    expected.describe()
                )));
            }
            *slot = value;
            Ok(())
        }
    }
}

/// Lay saved values over defaults. Unknown keys are dropped, and a saved
/// value of a different kind than its default leaves the default in place.
fn overlay(defaults: &mut Map<String, Value>, saved: Map<String, Value>) {
    for (key, value) in saved {
        match (defaults.get_mut(&key), value) {
            (Some(Value::Object(target)), Value::Object(source)) => overlay(target, source),
            (Some(slot), value) if ValueKind::of(slot).accepts(&value) => *slot = value,
            _ => {}
        }
    }
}

/// Shape class of a draft field, taken from its default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueKind {
    Scalar,
    List,
    Mapping,
}

impl ValueKind {
    fn of(value: &Value) -> Self {
        match value {
            Value::Object(_) => Self::Mapping,
            Value::Array(_) => Self::List,
            _ => Self::Scalar,
        }
    }

    fn accepts(self, value: &Value) -> bool {
        !value.is_null() && Self::of(value) == self
    }

    fn describe(self) -> &'static str {
        match self {
            Self::Scalar => "a single value",
            Self::List => "a list",
            Self::Mapping => "an object",
        }
    }
}

fn unknown_section(section: &str) -> CoreError {
    CoreError::Validation(format!("Unknown section '{section}'"))
}

fn unknown_field(section: &str, field: &str) -> CoreError {
    CoreError::Validation(format!("Unknown field '{field}' in section '{section}'"))
}

fn closed_error(state: WizardState) -> CoreError {
    CoreError::Validation(format!("Wizard is {} and no longer editable", state.as_str()))
}
