//! Request-time form validation.
//!
//! Submitted payloads arrive as flat key-value mappings; the builders in this
//! module validate them against field descriptors, producing typed values or
//! a set of field errors for re-rendering.

pub mod group;
pub mod survey;

use std::collections::HashMap;

use serde::Serialize;

/// Field-level and form-level validation errors.
#[derive(Debug, Default, Clone, Serialize)]
pub struct FormErrors {
    fields: HashMap<String, String>,
    form: Vec<String>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error against a single field.
    pub fn add_field(&mut self, name: impl Into<String>, message: impl Into<String>) {
        self.fields.insert(name.into(), message.into());
    }

    /// Record an error against the form as a whole.
    pub fn add_form(&mut self, message: impl Into<String>) {
        self.form.push(message.into());
    }

    /// The error recorded against the given field, if any.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// The form-level errors.
    pub fn form_errors(&self) -> &[String] {
        &self.form
    }

    /// Fold another set of errors into this one.
    pub fn merge(&mut self, other: FormErrors) {
        self.fields.extend(other.fields);
        self.form.extend(other.form);
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.form.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merged_errors_accumulate() {
        let mut errors = FormErrors::new();
        errors.add_field("name", "This field is required");

        let mut others = FormErrors::new();
        others.add_form("Submitted question rows were malformed");
        errors.merge(others);

        assert!(!errors.is_empty());
        assert_eq!(errors.field("name"), Some("This field is required"));
        assert_eq!(errors.form_errors().len(), 1);
    }
}
