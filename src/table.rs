//! Record collection and the shared add/edit form.
//!
//! `TableStore` owns the rows and the single form buffer. Every handler runs
//! to completion synchronously; derived views (search, pages) are computed
//! elsewhere from `records`.

use std::fmt::{Display, Formatter};

use crate::error::ValidationError;

/// Age as committed from the form.
///
/// Committing text without a leading integer stores `NotANumber` instead of
/// rejecting the row; only emptiness is validated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Age {
    Years(i64),
    NotANumber,
}

impl Age {
    /// Parse the integer prefix of `text`, like a lenient `parseInt`.
    ///
    /// Leading whitespace is skipped and an optional sign is accepted; the
    /// longest following run of ASCII digits is the value, saturating at the
    /// `i64` bounds. No digits at all yields `NotANumber`.
    pub fn parse(text: &str) -> Self {
        let t = text.trim_start();
        let (negative, rest) = match t.as_bytes().first() {
            Some(b'-') => (true, &t[1..]),
            Some(b'+') => (false, &t[1..]),
            _ => (false, t),
        };
        let digits = rest.bytes().take_while(u8::is_ascii_digit);
        let mut seen = false;
        let mut value: i64 = 0;
        for d in digits {
            seen = true;
            let d = i64::from(d - b'0');
            value = if negative {
                value.saturating_mul(10).saturating_sub(d)
            } else {
                value.saturating_mul(10).saturating_add(d)
            };
        }
        if seen { Age::Years(value) } else { Age::NotANumber }
    }
}

impl Display for Age {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Age::Years(v) => write!(f, "{v}"),
            Age::NotANumber => f.write_str("NaN"),
        }
    }
}

/// One row of the table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    pub id: u64,
    pub name: String,
    pub age: Age,
}

impl Record {
    pub fn new(id: u64, name: impl Into<String>, age: i64) -> Self {
        Self { id, name: name.into(), age: Age::Years(age) }
    }
}

/// Editable fields of the form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormField {
    Name,
    Age,
}

impl FormField {
    pub fn next(self) -> Self {
        match self {
            FormField::Name => FormField::Age,
            FormField::Age => FormField::Name,
        }
    }
}

/// The add/edit input buffer. `id == None` means add mode.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormState {
    pub id: Option<u64>,
    pub name: String,
    pub age: String,
}

impl FormState {
    pub fn is_edit(&self) -> bool {
        self.id.is_some()
    }

    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Age => &self.age,
        }
    }

    fn field_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Name => &mut self.name,
            FormField::Age => &mut self.age,
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() || self.age.is_empty() {
            return Err(ValidationError);
        }
        Ok(())
    }
}

impl From<&Record> for FormState {
    fn from(r: &Record) -> Self {
        Self { id: Some(r.id), name: r.name.clone(), age: r.age.to_string() }
    }
}

#[derive(Clone, Debug, Default)]
pub struct TableStore {
    pub records: Vec<Record>,
    pub form: FormState,
}

impl TableStore {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records, form: FormState::default() }
    }

    /// Id for the next added row: last row's id + 1, or 1 when empty.
    ///
    /// This follows insertion order, not the largest id, so it can repeat an
    /// id that is still present when the last row is not the maximum.
    pub fn next_id(&self) -> u64 {
        self.records.last().map_or(1, |r| r.id + 1)
    }

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        *self.form.field_mut(field) = value.into();
    }

    pub fn push_char(&mut self, field: FormField, c: char) {
        self.form.field_mut(field).push(c);
    }

    pub fn pop_char(&mut self, field: FormField) {
        self.form.field_mut(field).pop();
    }

    /// Append a row from the form and reset it.
    pub fn add(&mut self) -> Result<u64, ValidationError> {
        self.form.validate()?;
        let id = self.next_id();
        let record = Record {
            id,
            name: self.form.name.clone(),
            age: Age::parse(&self.form.age),
        };
        tracing::debug!(id, name = %record.name, "record added");
        self.records.push(record);
        self.clear_form();
        Ok(id)
    }

    /// Load the row with `id` into the form. Unknown ids leave the form alone.
    pub fn edit(&mut self, id: u64) -> bool {
        match self.records.iter().find(|r| r.id == id) {
            Some(r) => {
                self.form = FormState::from(r);
                true
            }
            None => false,
        }
    }

    /// Replace the row matching `form.id` with the form's values and reset the form.
    pub fn update(&mut self) -> Result<(), ValidationError> {
        self.form.validate()?;
        if let Some(id) = self.form.id {
            let age = Age::parse(&self.form.age);
            for r in self.records.iter_mut().filter(|r| r.id == id) {
                r.name = self.form.name.clone();
                r.age = age;
            }
            tracing::debug!(id, "record updated");
        }
        self.clear_form();
        Ok(())
    }

    /// Commit the form: update in edit mode, add otherwise.
    pub fn submit(&mut self) -> Result<(), ValidationError> {
        if self.form.is_edit() { self.update() } else { self.add().map(|_| ()) }
    }

    pub fn delete(&mut self, id: u64) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        let removed = self.records.len() != before;
        if removed {
            tracing::debug!(id, "record deleted");
        }
        removed
    }

    pub fn clear_form(&mut self) {
        self.form = FormState::default();
    }

    pub fn replace_all(&mut self, records: Vec<Record>) {
        self.records = records;
    }

    pub fn get(&self, id: u64) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }
}
