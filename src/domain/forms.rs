//! Form buffers backing the create/edit modal.

use chrono::NaiveDate;
use serde_json::{Map, Number, Value};
use thiserror::Error;

/// Input kind of a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text.
    Text,
    /// Masked text; left blank on edit means unchanged.
    Secret,
    /// Whole number.
    Integer,
    /// Decimal number.
    Decimal,
    /// `YYYY-MM-DD` date.
    Date,
    /// One of a fixed set of values.
    Choice(&'static [&'static str]),
}

/// Static description of one form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormField {
    /// JSON key in the request payload.
    pub key: &'static str,
    /// Label shown next to the input.
    pub label: &'static str,
    /// Input kind.
    pub kind: FieldKind,
    /// Whether a blank value is rejected.
    pub required: bool,
}

impl FormField {
    /// Required field.
    #[must_use]
    pub const fn required(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            label,
            kind,
            required: true,
        }
    }

    /// Optional field.
    #[must_use]
    pub const fn optional(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            label,
            kind,
            required: false,
        }
    }
}

/// Form conversion errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum FormError {
    #[error("{field} is required")]
    Missing { field: &'static str },

    #[error("{field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Transient buffer holding the values of an open modal form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormBuffer {
    fields: &'static [FormField],
    values: Vec<String>,
    focus: usize,
}

impl FormBuffer {
    /// Empty form; choice fields start on their first option.
    #[must_use]
    pub fn new(fields: &'static [FormField]) -> Self {
        let values = fields
            .iter()
            .map(|f| match f.kind {
                FieldKind::Choice(options) => {
                    options.first().map(ToString::to_string).unwrap_or_default()
                }
                _ => String::new(),
            })
            .collect();

        Self {
            fields,
            values,
            focus: 0,
        }
    }

    /// Form pre-filled from existing values. Missing trailing values stay blank.
    #[must_use]
    pub fn with_values(fields: &'static [FormField], values: Vec<String>) -> Self {
        let mut form = Self::new(fields);
        for (slot, value) in form.values.iter_mut().zip(values) {
            *slot = value;
        }
        form
    }

    /// Field descriptions.
    #[must_use]
    pub const fn fields(&self) -> &'static [FormField] {
        self.fields
    }

    /// Current values, aligned with [`FormBuffer::fields`].
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Value of a field by key.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .position(|f| f.key == key)
            .and_then(|i| self.values.get(i))
            .map(String::as_str)
    }

    /// Sets a field by key. Unknown keys are ignored.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        if let Some(i) = self.fields.iter().position(|f| f.key == key)
            && let Some(slot) = self.values.get_mut(i)
        {
            *slot = value.into();
        }
    }

    /// Index of the focused field.
    #[must_use]
    pub const fn focus(&self) -> usize {
        self.focus
    }

    /// Moves focus to the next field, wrapping.
    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    /// Moves focus to the previous field, wrapping.
    pub fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        }
    }

    /// Types a character into the focused field. Choice fields ignore typing.
    pub fn input_char(&mut self, c: char) {
        let Some(field) = self.fields.get(self.focus) else {
            return;
        };
        if matches!(field.kind, FieldKind::Choice(_)) {
            return;
        }
        if let Some(value) = self.values.get_mut(self.focus) {
            value.push(c);
        }
    }

    /// Deletes the last character of the focused field.
    pub fn backspace(&mut self) {
        let is_choice = self
            .fields
            .get(self.focus)
            .is_some_and(|f| matches!(f.kind, FieldKind::Choice(_)));
        if is_choice {
            return;
        }
        if let Some(value) = self.values.get_mut(self.focus) {
            value.pop();
        }
    }

    /// Cycles the focused choice field.
    pub fn cycle_choice(&mut self, forward: bool) {
        let Some(FieldKind::Choice(options)) = self.fields.get(self.focus).map(|f| f.kind) else {
            return;
        };
        if options.is_empty() {
            return;
        }
        let Some(value) = self.values.get_mut(self.focus) else {
            return;
        };

        let current = options.iter().position(|o| o == value);
        let next = match (current, forward) {
            (None, _) => 0,
            (Some(i), true) => (i + 1) % options.len(),
            (Some(i), false) => (i + options.len() - 1) % options.len(),
        };
        *value = options[next].to_string();
    }

    /// Converts the buffer into a JSON request body.
    ///
    /// Blank optional fields are omitted. Blank secrets are omitted even when
    /// required, unless `creating` is set.
    ///
    /// # Errors
    /// Returns the first missing or unparsable field.
    pub fn to_payload(&self, creating: bool) -> Result<Map<String, Value>, FormError> {
        let mut payload = Map::new();

        for (field, raw) in self.fields.iter().zip(&self.values) {
            let raw = raw.trim();

            if raw.is_empty() {
                let must_fill = field.required && (creating || field.kind != FieldKind::Secret);
                if must_fill {
                    return Err(FormError::Missing { field: field.label });
                }
                continue;
            }

            let value = match field.kind {
                FieldKind::Text | FieldKind::Secret => Value::String(raw.to_string()),
                FieldKind::Integer => raw
                    .parse::<i64>()
                    .map(Value::from)
                    .map_err(|e| FormError::Invalid {
                        field: field.label,
                        reason: e.to_string(),
                    })?,
                FieldKind::Decimal => raw
                    .parse::<f64>()
                    .ok()
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .ok_or_else(|| FormError::Invalid {
                        field: field.label,
                        reason: format!("{raw:?} is not a number"),
                    })?,
                FieldKind::Date => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .map(|d| Value::String(d.format("%Y-%m-%d").to_string()))
                    .map_err(|_| FormError::Invalid {
                        field: field.label,
                        reason: "expected YYYY-MM-DD".to_string(),
                    })?,
                FieldKind::Choice(options) => {
                    if !options.contains(&raw) {
                        return Err(FormError::Invalid {
                            field: field.label,
                            reason: format!("must be one of {}", options.join(", ")),
                        });
                    }
                    Value::String(raw.to_string())
                }
            };

            payload.insert(field.key.to_string(), value);
        }

        Ok(payload)
    }
}
