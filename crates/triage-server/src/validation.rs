//! Request validation.
//!
//! Collects one message per offending field and reports them together,
//! so a submitter fixes everything in one round trip. Fields arrive as
//! raw JSON values; a wrongly-typed field gets its own validation message
//! instead of a deserialization rejection. Enum labels go through the
//! value-constructors in `triage_core::model`; nothing here re-implements
//! a bounds check.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use triage_core::model::{IntakePatch, NewIntake, Status, Urgency};
use triage_core::query::{Sort, SortColumn, SortDirection};

use crate::error::ApiError;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

#[derive(Debug, Deserialize)]
pub struct CreateIntakeRequest {
    pub name: Option<Value>,
    pub email: Option<Value>,
    pub description: Option<Value>,
    pub urgency: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateIntakeRequest {
    pub status: Option<Value>,
    pub internal_notes: Option<Value>,
}

/// Missing, non-string, and blank all earn the same message.
fn required_text(value: Option<&Value>, message: &str, errors: &mut Vec<String>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => {
            errors.push(message.to_string());
            None
        }
    }
}

/// Validate a submission, trimming the text fields.
pub fn validate_create(req: &CreateIntakeRequest) -> Result<NewIntake, ApiError> {
    let mut errors = Vec::new();

    let name = required_text(
        req.name.as_ref(),
        "name is required and must be a non-empty string",
        &mut errors,
    );

    let email = match required_text(
        req.email.as_ref(),
        "email is required and must be a non-empty string",
        &mut errors,
    ) {
        Some(email) if !EMAIL_RE.is_match(&email) => {
            errors.push("email must be a valid email address".to_string());
            None
        }
        other => other,
    };

    let description = required_text(
        req.description.as_ref(),
        "description is required and must be a non-empty string",
        &mut errors,
    );

    let urgency = match req.urgency.as_ref() {
        None => {
            errors.push("urgency is required".to_string());
            None
        }
        Some(value) => {
            let parsed = value.as_i64().and_then(Urgency::new);
            if parsed.is_none() {
                errors.push("urgency must be an integer between 1 and 5".to_string());
            }
            parsed
        }
    };

    if errors.is_empty() {
        if let (Some(name), Some(email), Some(description), Some(urgency)) =
            (name, email, description, urgency)
        {
            return Ok(NewIntake {
                name,
                email,
                description,
                urgency,
            });
        }
    }
    Err(ApiError::Validation(errors))
}

/// Validate an update patch. The status label must be one of the three
/// known values; whether the patch is empty is the lifecycle's call, not
/// ours.
pub fn validate_update(req: &UpdateIntakeRequest) -> Result<IntakePatch, ApiError> {
    let mut errors = Vec::new();

    let status = match req.status.as_ref() {
        None => None,
        Some(Value::String(raw)) => {
            let parsed = Status::parse(raw);
            if parsed.is_none() {
                errors.push(format!("status must be one of: {}", Status::LABELS.join(", ")));
            }
            parsed
        }
        Some(_) => {
            errors.push(format!("status must be one of: {}", Status::LABELS.join(", ")));
            None
        }
    };

    let internal_notes = match req.internal_notes.as_ref() {
        None => None,
        Some(Value::String(notes)) => Some(notes.clone()),
        Some(_) => {
            errors.push("internal_notes must be a string".to_string());
            None
        }
    };

    if errors.is_empty() {
        Ok(IntakePatch {
            status,
            internal_notes,
        })
    } else {
        Err(ApiError::Validation(errors))
    }
}

/// Resolve the sort query parameters, falling back to the engine default
/// (`created_at desc`) for absent ones.
pub fn parse_sort(sort: Option<&str>, dir: Option<&str>) -> Result<Sort, ApiError> {
    let mut errors = Vec::new();
    let default = Sort::default();

    let column = match sort {
        None => Some(default.column),
        Some(raw) => {
            let parsed = SortColumn::parse(raw);
            if parsed.is_none() {
                errors.push(
                    "sort must be one of: id, name, email, description, category, status, \
                     urgency, created_at"
                        .to_string(),
                );
            }
            parsed
        }
    };

    let direction = match dir {
        None => Some(default.direction),
        Some(raw) => {
            let parsed = SortDirection::parse(raw);
            if parsed.is_none() {
                errors.push("dir must be one of: asc, desc".to_string());
            }
            parsed
        }
    };

    match (column, direction) {
        (Some(column), Some(direction)) => Ok(Sort { column, direction }),
        _ => Err(ApiError::Validation(errors)),
    }
}
