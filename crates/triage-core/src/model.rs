//! Intake record and its value types.
//!
//! Each bounded value (category, status, urgency) has exactly one
//! constructor/validator here; every boundary that accepts the value goes
//! through it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Classifier-assigned topic label. Set once at creation, never
/// reviewer-editable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Billing,
    TechnicalSupport,
    NewMatterProject,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Billing => "billing",
            Self::TechnicalSupport => "technical_support",
            Self::NewMatterProject => "new_matter_project",
            Self::Other => "other",
        }
    }

    /// Parse a wire label. Returns `None` for anything outside the four
    /// known labels.
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "billing" => Some(Self::Billing),
            "technical_support" => Some(Self::TechnicalSupport),
            "new_matter_project" => Some(Self::NewMatterProject),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Reviewer-controlled triage state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    New,
    InReview,
    Resolved,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::InReview => "in_review",
            Self::Resolved => "resolved",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "new" => Some(Self::New),
            "in_review" => Some(Self::InReview),
            "resolved" => Some(Self::Resolved),
            _ => None,
        }
    }

    /// All accepted labels, in declaration order. Used for validation
    /// messages.
    pub const LABELS: [&'static str; 3] = ["new", "in_review", "resolved"];
}

/// Submitter-assigned priority, 1 (low) to 5 (high).
///
/// Deserialization funnels through [`Urgency::new`], so an out-of-range
/// value is rejected at the wire boundary too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "i64")]
pub struct Urgency(u8);

impl Urgency {
    pub const MIN: i64 = 1;
    pub const MAX: i64 = 5;

    /// Sole constructor; rejects anything outside `[1, 5]`.
    pub fn new(value: i64) -> Option<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Some(Self(value as u8))
        } else {
            None
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl From<Urgency> for u8 {
    fn from(urgency: Urgency) -> Self {
        urgency.0
    }
}

impl TryFrom<i64> for Urgency {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
            .ok_or_else(|| format!("urgency must be an integer between 1 and 5, got {value}"))
    }
}

/// A submitted help/support request.
///
/// Owned by the store; `category` and `created_at` are write-once, `status`
/// and `internal_notes` mutate only through [`crate::lifecycle`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub description: String,
    pub urgency: Urgency,
    pub category: Category,
    pub status: Status,
    pub internal_notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated submission input. Callers trim and validate before
/// constructing; the classifier assigns the category at insert time.
#[derive(Debug, Clone)]
pub struct NewIntake {
    pub name: String,
    pub email: String,
    pub description: String,
    pub urgency: Urgency,
}

/// Partial update to a record's mutable fields. Only the fields present
/// participate; there is deliberately no way to patch category.
#[derive(Debug, Clone, Default)]
pub struct IntakePatch {
    pub status: Option<Status>,
    pub internal_notes: Option<String>,
}

impl IntakePatch {
    /// True when the patch carries no recognized mutable field.
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.internal_notes.is_none()
    }
}
