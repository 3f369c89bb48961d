//! Collect-all form validation.
//!
//! Every schema checks all of its rules against the raw submission and
//! gathers every violation; the caller gets either a fully typed payload or
//! a single `ValidationError` whose display is the comma-joined message
//! list. Schemas never fail fast on the first bad field.

pub mod schemas;

use std::collections::HashMap;
use thiserror::Error;

pub use schemas::{
    validate_image, validate_profile, validate_property, validate_review, ImagePayload,
    ProfilePayload, PropertyPayload, ReviewPayload,
};

/// Flat string-keyed submission as received from the presentation layer,
/// text fields and file parts side by side.
#[derive(Debug, Clone, Default)]
pub struct RawForm {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

/// A binary file part lifted out of a multipart submission.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl RawForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn set_file(&mut self, key: impl Into<String>, file: UploadedFile) {
        self.files.insert(key.into(), file);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn file(&self, key: &str) -> Option<&UploadedFile> {
        self.files.get(key)
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("{}", .messages.join(", "))]
pub struct ValidationError {
    pub messages: Vec<String>,
}

impl ValidationError {
    pub fn new(messages: Vec<String>) -> Self {
        Self { messages }
    }
}

/// Required text field. Absent or empty pushes `required_msg`.
pub(crate) fn text(
    form: &RawForm,
    key: &str,
    required_msg: &str,
    errors: &mut Vec<String>,
) -> Option<String> {
    match form.get(key) {
        Some(value) if !value.is_empty() => Some(value.to_string()),
        _ => {
            errors.push(required_msg.to_string());
            None
        }
    }
}

/// Required text field with an upper length bound.
pub(crate) fn text_max(
    form: &RawForm,
    key: &str,
    required_msg: &str,
    max: usize,
    max_msg: &str,
    errors: &mut Vec<String>,
) -> Option<String> {
    let value = text(form, key, required_msg, errors)?;
    if value.chars().count() > max {
        errors.push(max_msg.to_string());
        return None;
    }
    Some(value)
}

/// Numeric field coerced from its text form; must parse as an integer >= 0.
pub(crate) fn non_negative_int(
    form: &RawForm,
    key: &str,
    label: &str,
    errors: &mut Vec<String>,
) -> Option<i32> {
    match form.get(key).and_then(|v| v.trim().parse::<i32>().ok()) {
        Some(n) if n >= 0 => Some(n),
        _ => {
            errors.push(format!("{label} must be a whole number of zero or more"));
            None
        }
    }
}

/// Required text field whose whitespace-separated word count must fall in
/// `[min_words, max_words]`, bounds inclusive.
pub(crate) fn word_bounded_text(
    form: &RawForm,
    key: &str,
    required_msg: &str,
    min_words: usize,
    max_words: usize,
    bounds_msg: &str,
    errors: &mut Vec<String>,
) -> Option<String> {
    let value = text(form, key, required_msg, errors)?;
    let words = value.split_whitespace().count();
    if words < min_words || words > max_words {
        errors.push(bounds_msg.to_string());
        return None;
    }
    Some(value)
}
