//! Field schema for inbound account documents.
//!
//! # Responsibilities
//! - Declare every accepted field with its required flag and value kind
//! - Check a JSON payload against a schema in one deterministic pass
//! - Produce typed field values or a `DataValidationError`
//!
//! # Design Decisions
//! - JSON `null` is treated the same as an absent field
//! - Fields not named in the schema are ignored
//! - Fields are checked in schema order, so the first failure is stable

use std::collections::HashMap;

use chrono::NaiveDate;
use serde_json::Value;

use super::error::DataValidationError;

/// Wire format for date fields.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Kind of value a field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Any JSON string.
    Text,
    /// A JSON string with at least one character.
    NonEmptyText,
    /// A JSON string in `YYYY-MM-DD` form.
    Date,
}

impl FieldKind {
    fn expected(self) -> &'static str {
        match self {
            FieldKind::Text | FieldKind::NonEmptyText => "a string",
            FieldKind::Date => "a date string",
        }
    }
}

/// One named field of a payload schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub required: bool,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            required: true,
            kind,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            required: false,
            kind,
        }
    }
}

/// Schema of an inbound account document.
pub const ACCOUNT_SCHEMA: &[FieldSpec] = &[
    FieldSpec::required("name", FieldKind::NonEmptyText),
    FieldSpec::required("email", FieldKind::Text),
    FieldSpec::required("address", FieldKind::Text),
    FieldSpec::required("phone_number", FieldKind::Text),
    FieldSpec::optional("date_joined", FieldKind::Date),
];

/// A field value that passed its kind check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Date(NaiveDate),
}

/// Values of a payload that passed a schema check.
///
/// Only fields present in the payload appear here. Required fields are
/// guaranteed to be present.
#[derive(Debug, Clone, Default)]
pub struct CheckedPayload {
    values: HashMap<&'static str, FieldValue>,
}

impl CheckedPayload {
    /// Take a text field out of the payload.
    pub fn take_text(&mut self, name: &str) -> Option<String> {
        match self.values.remove(name) {
            Some(FieldValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Read a date field.
    pub fn date(&self, name: &str) -> Option<NaiveDate> {
        match self.values.get(name) {
            Some(FieldValue::Date(date)) => Some(*date),
            _ => None,
        }
    }
}

/// Check `payload` against `schema`.
pub fn check(
    schema: &[FieldSpec],
    payload: &Value,
) -> Result<CheckedPayload, DataValidationError> {
    let object = payload.as_object().ok_or(DataValidationError::NotAnObject)?;
    let mut checked = CheckedPayload::default();

    for spec in schema {
        let raw = match object.get(spec.name) {
            None | Some(Value::Null) => {
                if spec.required {
                    return Err(DataValidationError::MissingField(spec.name));
                }
                continue;
            }
            Some(raw) => raw,
        };

        let text = raw.as_str().ok_or(DataValidationError::WrongKind {
            field: spec.name,
            expected: spec.kind.expected(),
        })?;

        let value = match spec.kind {
            FieldKind::Text => FieldValue::Text(text.to_owned()),
            FieldKind::NonEmptyText => {
                if text.is_empty() {
                    return Err(DataValidationError::Empty(spec.name));
                }
                FieldValue::Text(text.to_owned())
            }
            FieldKind::Date => {
                let date = NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|_| {
                    DataValidationError::BadDate {
                        field: spec.name,
                        value: text.to_owned(),
                    }
                })?;
                FieldValue::Date(date)
            }
        };
        checked.values.insert(spec.name, value);
    }

    Ok(checked)
}
