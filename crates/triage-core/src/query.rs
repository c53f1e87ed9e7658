//! Queue query engine: filtering and ordering for the reviewer view.
//!
//! The store hands over an unordered bag of records; this module owns all
//! filter and sort semantics. Filters are raw label strings compared for
//! equality and are deliberately not validated — an unrecognized value
//! simply matches nothing.

use crate::model::IntakeRecord;
use std::cmp::Ordering;

/// Optional equality constraints, combined with AND.
#[derive(Debug, Clone, Default)]
pub struct QueueFilter {
    pub status: Option<String>,
    pub category: Option<String>,
}

/// Sortable columns of the reviewer queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Id,
    Name,
    Email,
    Description,
    Category,
    Status,
    Urgency,
    CreatedAt,
}

impl SortColumn {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Email => "email",
            Self::Description => "description",
            Self::Category => "category",
            Self::Status => "status",
            Self::Urgency => "urgency",
            Self::CreatedAt => "created_at",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "id" => Some(Self::Id),
            "name" => Some(Self::Name),
            "email" => Some(Self::Email),
            "description" => Some(Self::Description),
            "category" => Some(Self::Category),
            "status" => Some(Self::Status),
            "urgency" => Some(Self::Urgency),
            "created_at" => Some(Self::CreatedAt),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

/// Sort order for the queue. Defaults to newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl Default for Sort {
    fn default() -> Self {
        Self {
            column: SortColumn::CreatedAt,
            direction: SortDirection::Desc,
        }
    }
}

/// Filter and order records for the reviewer queue.
///
/// Input records are never mutated; the result is a new sequence. The sort
/// is stable, so records with equal keys keep their input order.
pub fn query(records: &[IntakeRecord], filter: &QueueFilter, sort: Sort) -> Vec<IntakeRecord> {
    let mut out: Vec<IntakeRecord> = records
        .iter()
        .filter(|r| matches_filter(r, filter))
        .cloned()
        .collect();

    out.sort_by(|a, b| {
        let ord = compare(a, b, sort.column);
        match sort.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
    out
}

fn matches_filter(record: &IntakeRecord, filter: &QueueFilter) -> bool {
    if let Some(status) = &filter.status {
        if record.status.as_str() != status {
            return false;
        }
    }
    if let Some(category) = &filter.category {
        if record.category.as_str() != category {
            return false;
        }
    }
    true
}

fn compare(a: &IntakeRecord, b: &IntakeRecord, column: SortColumn) -> Ordering {
    match column {
        SortColumn::Id => a.id.cmp(&b.id),
        SortColumn::Urgency => a.urgency.cmp(&b.urgency),
        SortColumn::CreatedAt => a.created_at.cmp(&b.created_at),
        // Person-entered text sorts case-insensitively
        SortColumn::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortColumn::Email => a.email.to_lowercase().cmp(&b.email.to_lowercase()),
        SortColumn::Description => a.description.to_lowercase().cmp(&b.description.to_lowercase()),
        // Labels sort on the raw label string
        SortColumn::Category => a.category.as_str().cmp(b.category.as_str()),
        SortColumn::Status => a.status.as_str().cmp(b.status.as_str()),
    }
}
