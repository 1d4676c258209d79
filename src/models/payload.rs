//! Field-by-field reading of untyped JSON request bodies.
//!
//! Every problem is recorded as an issue instead of failing fast, so a client
//! sees the whole list at once.

use serde_json::{Map, Value};

use crate::errors::AppError;

/// Reads fields out of a JSON object, collecting issues as it goes.
pub struct Payload<'a> {
    fields: Option<&'a Map<String, Value>>,
    issues: Vec<String>,
}

impl<'a> Payload<'a> {
    pub fn new(body: &'a Value) -> Self {
        match body.as_object() {
            Some(fields) => Self {
                fields: Some(fields),
                issues: Vec::new(),
            },
            None => Self {
                fields: None,
                issues: vec!["Payload must be a JSON object".to_string()],
            },
        }
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.fields
            .and_then(|fields| fields.get(key))
            .filter(|v| !v.is_null())
    }

    /// A string that must be present and not blank.
    pub fn required_text(&mut self, key: &str, label: &str) -> String {
        match self.get(key) {
            Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
            Some(Value::String(_)) | None => {
                self.issues.push(format!("{} is required", label));
                String::new()
            }
            Some(_) => {
                self.issues.push(format!("{} must be a string", label));
                String::new()
            }
        }
    }

    /// A string or null. Empty strings read as absent.
    pub fn optional_text(&mut self, key: &str, label: &str) -> Option<String> {
        match self.get(key) {
            Some(Value::String(s)) if s.is_empty() => None,
            Some(Value::String(s)) => Some(s.clone()),
            None => None,
            Some(_) => {
                self.issues.push(format!("{} must be a string", label));
                None
            }
        }
    }

    /// An array of strings, or `None` when absent.
    pub fn string_list(&mut self, key: &str, label: &str) -> Option<Vec<String>> {
        let value = self.get(key)?;
        let items = value.as_array().and_then(|items| {
            items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
        });

        if items.is_none() {
            self.issues
                .push(format!("{} must be an array of strings", label));
        }
        items
    }

    /// A boolean, or `None` when absent.
    pub fn flag(&mut self, key: &str, label: &str) -> Option<bool> {
        match self.get(key) {
            Some(Value::Bool(b)) => Some(*b),
            None => None,
            Some(_) => {
                self.issues.push(format!("{} must be true or false", label));
                None
            }
        }
    }

    /// Record an issue found by the caller.
    pub fn issue(&mut self, message: impl Into<String>) {
        self.issues.push(message.into());
    }

    /// Fail with every collected issue, or hand back `value`.
    pub fn finish<T>(self, value: T) -> Result<T, AppError> {
        if self.issues.is_empty() {
            Ok(value)
        } else {
            Err(AppError::validation(self.issues))
        }
    }
}
