//! Field-level validation primitives and the issue collector.
//!
//! Validators return `Err(message)` per field; DTO `validate()` methods feed
//! them through [`Issues`] so a failing request reports **every** bad field
//! in one response instead of stopping at the first.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;

/// URL-safe slug: lowercase alphanumeric runs separated by single hyphens.
static SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("slug regex is valid"));

/// Four-digit year, e.g. `"2024"`.
static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}$").expect("year regex is valid"));

/// Pragmatic email shape check: one `@`, no whitespace, a dot in the domain.
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid"));

/// Accumulated `field -> message` validation failures.
///
/// Keeps the first message per field and serializes as a flat JSON object,
/// which is exactly the `issues` payload of a 400 response.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Issues {
    fields: BTreeMap<String, String>,
}

impl Issues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure for `field`. The first message wins.
    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    /// Run a field validator and record its failure, if any.
    pub fn check(&mut self, field: &str, result: Result<(), String>) {
        if let Err(message) = result {
            self.push(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// The collected failures as `(field, message)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `Ok(())` when no issues were collected, `Err(self)` otherwise.
    pub fn into_result(self) -> Result<(), Issues> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

pub fn required(value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err("is required".to_string());
    }
    Ok(())
}

pub fn min_len(value: &str, min: usize) -> Result<(), String> {
    if value.chars().count() < min {
        return Err(format!("must be at least {min} characters"));
    }
    Ok(())
}

pub fn slug(value: &str) -> Result<(), String> {
    if !SLUG_RE.is_match(value) {
        return Err("must be a URL-safe slug (lowercase letters, digits, hyphens)".to_string());
    }
    Ok(())
}

pub fn year(value: &str) -> Result<(), String> {
    if !YEAR_RE.is_match(value) {
        return Err("must be a 4-digit year".to_string());
    }
    Ok(())
}

pub fn email(value: &str) -> Result<(), String> {
    if !EMAIL_RE.is_match(value) {
        return Err("must be a valid email address".to_string());
    }
    Ok(())
}

/// Absolute http(s) URL.
pub fn http_url(value: &str) -> Result<(), String> {
    match url::Url::parse(value) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        _ => Err("must be an absolute http(s) URL".to_string()),
    }
}

/// Like [`http_url`] but empty strings pass (optional URL fields).
pub fn http_url_or_empty(value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Ok(());
    }
    http_url(value)
}

pub fn rating(value: f64) -> Result<(), String> {
    if !(0.0..=5.0).contains(&value) || !value.is_finite() {
        return Err("must be between 0 and 5".to_string());
    }
    Ok(())
}

pub fn progress(value: i32) -> Result<(), String> {
    if !(0..=100).contains(&value) {
        return Err("must be between 0 and 100".to_string());
    }
    Ok(())
}

pub fn role_name(value: &str) -> Result<(), String> {
    if value.parse::<crate::roles::Role>().is_err() {
        return Err(format!(
            "must be one of: {}",
            crate::roles::Role::all_names().join(", ")
        ));
    }
    Ok(())
}

/// Parse a wire boolean that only accepts the literal strings
/// `"true"`/`"false"`. Anything else means "no filter", never a falsy
/// default.
pub fn literal_bool(value: &str) -> Option<bool> {
    match value {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Normalize an email for storage and uniqueness comparison.
pub fn normalize_email(value: &str) -> String {
    value.trim().to_lowercase()
}
