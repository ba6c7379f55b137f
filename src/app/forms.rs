//! Create and update modal forms.
//!
//! Forms only collect input. Submitting yields [`FormOutcome::Submit`] with
//! the captured [`FormValues`]; the table page decides which request to send.
//!
use crossterm::event::KeyCode;

use crate::model::FormValues;

/// Result of feeding a key to a form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormOutcome {
    Submit(FormValues),
    Cancel,
}

/// One editable line in a form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextField {
    pub label: &'static str,
    pub value: String,
    pub required: bool,
}

impl TextField {
    fn new(label: &'static str, value: impl Into<String>, required: bool) -> Self {
        Self {
            label,
            value: value.into(),
            required,
        }
    }

    fn edit(&mut self, code: KeyCode) {
        match code {
            KeyCode::Backspace => {
                self.value.pop();
            }
            KeyCode::Char(c) => self.value.push(c),
            _ => {}
        }
    }

    fn missing(&self) -> bool {
        self.required && self.value.trim().is_empty()
    }

    fn captured(&self) -> Option<String> {
        let v = self.value.trim();
        if v.is_empty() { None } else { Some(v.to_string()) }
    }
}

fn validate(fields: &[&TextField]) -> Option<String> {
    fields
        .iter()
        .find(|f| f.missing())
        .map(|f| format!("{} is required", f.label))
}

/// Modal collecting a new record's description.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateForm {
    pub desc: TextField,
    pub error: Option<String>,
}

impl Default for CreateForm {
    fn default() -> Self {
        Self::new()
    }
}

impl CreateForm {
    pub fn new() -> Self {
        Self {
            desc: TextField::new("Description", "", true),
            error: None,
        }
    }

    /// Enter confirms, Esc cancels, anything else edits the description.
    pub fn handle_key(&mut self, code: KeyCode) -> Option<FormOutcome> {
        match code {
            KeyCode::Esc => Some(FormOutcome::Cancel),
            KeyCode::Enter => self.submit(),
            other => {
                self.desc.edit(other);
                self.error = None;
                None
            }
        }
    }

    /// Validate and return the captured fields, or record the validation error.
    pub fn submit(&mut self) -> Option<FormOutcome> {
        if let Some(err) = validate(&[&self.desc]) {
            self.error = Some(err);
            return None;
        }
        Some(FormOutcome::Submit(FormValues {
            name: None,
            desc: self.desc.captured(),
            key: None,
        }))
    }
}

/// Modal pre-filled from an existing record's editable fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateForm {
    pub name: TextField,
    pub desc: TextField,
    /// Carried through unchanged; identifies the record being edited.
    pub key: Option<u64>,
    pub focus: usize,
    pub error: Option<String>,
}

impl UpdateForm {
    const FIELDS: usize = 2;

    /// Build the form from a snapshot. Empty values never produce a form.
    pub fn open(values: FormValues) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        Some(Self {
            name: TextField::new("Name", values.name.unwrap_or_default(), true),
            desc: TextField::new("Description", values.desc.unwrap_or_default(), true),
            key: values.key,
            focus: 0,
            error: None,
        })
    }

    /// Current (possibly edited) values.
    pub fn values(&self) -> FormValues {
        FormValues {
            name: self.name.captured(),
            desc: self.desc.captured(),
            key: self.key,
        }
    }

    fn focused_mut(&mut self) -> &mut TextField {
        if self.focus == 0 { &mut self.name } else { &mut self.desc }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Option<FormOutcome> {
        match code {
            KeyCode::Esc => Some(FormOutcome::Cancel),
            KeyCode::Enter => self.submit(),
            KeyCode::Tab | KeyCode::Down => {
                self.focus = (self.focus + 1) % Self::FIELDS;
                None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = (self.focus + Self::FIELDS - 1) % Self::FIELDS;
                None
            }
            other => {
                self.focused_mut().edit(other);
                self.error = None;
                None
            }
        }
    }

    pub fn submit(&mut self) -> Option<FormOutcome> {
        if let Some(err) = validate(&[&self.name, &self.desc]) {
            self.error = Some(err);
            return None;
        }
        Some(FormOutcome::Submit(self.values()))
    }
}
