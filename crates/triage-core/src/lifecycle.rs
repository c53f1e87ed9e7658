//! Intake lifecycle: partial updates to the mutable fields.
//!
//! Only `status` and `internal_notes` can change after creation. A patch
//! with neither field is rejected rather than silently succeeding, and any
//! accepted change bumps `updated_at` even when the new value equals the
//! old one. Status transitions are unrestricted: any label may move to any
//! other, including `resolved -> resolved` and backward moves.

use crate::model::{IntakePatch, IntakeRecord};
use crate::store::{IntakeStore, StoreError};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Update failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UpdateError {
    #[error("Intake not found: {id}")]
    NotFound { id: i64 },

    #[error("No fields to update")]
    NoFields,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Apply a patch to the record with the given id.
///
/// Returns the full updated record on success. Patch values are assumed
/// already validated against their enums by the caller; no transition
/// legality is checked here.
pub fn update_intake(
    store: &IntakeStore,
    id: i64,
    patch: &IntakePatch,
) -> Result<IntakeRecord, UpdateError> {
    update_intake_at(store, id, patch, Utc::now())
}

/// Like [`update_intake`] but with an explicit `now` timestamp.
/// Use this in tests to avoid flaky clock-dependent assertions.
pub fn update_intake_at(
    store: &IntakeStore,
    id: i64,
    patch: &IntakePatch,
    now: DateTime<Utc>,
) -> Result<IntakeRecord, UpdateError> {
    if patch.is_empty() {
        return Err(UpdateError::NoFields);
    }

    if !store.update_fields(id, patch, now)? {
        return Err(UpdateError::NotFound { id });
    }

    tracing::debug!(
        id,
        status = patch.status.map(|s| s.as_str()),
        notes_changed = patch.internal_notes.is_some(),
        "intake updated"
    );

    store
        .get_intake(id)?
        .ok_or(UpdateError::NotFound { id })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, NewIntake, Status, Urgency};
    use chrono::TimeZone;

    fn seeded_store() -> (IntakeStore, IntakeRecord) {
        let store = IntakeStore::memory().unwrap();
        let record = store
            .insert_intake_at(
                &NewIntake {
                    name: "Ada".to_string(),
                    email: "ada@example.com".to_string(),
                    description: "please advise".to_string(),
                    urgency: Urgency::new(2).unwrap(),
                },
                Category::Other,
                Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
            )
            .unwrap();
        (store, record)
    }

    #[test]
    fn notes_only_patch_leaves_status_alone() {
        let (store, record) = seeded_store();
        let later = Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap();

        let updated = update_intake_at(
            &store,
            record.id,
            &IntakePatch {
                status: None,
                internal_notes: Some("x".to_string()),
            },
            later,
        )
        .unwrap();

        assert_eq!(updated.status, Status::New);
        assert_eq!(updated.internal_notes, "x");
        assert_eq!(updated.updated_at, later);
        assert_eq!(updated.created_at, record.created_at);
    }

    #[test]
    fn status_only_patch_leaves_notes_alone() {
        let (store, record) = seeded_store();

        let updated = update_intake(
            &store,
            record.id,
            &IntakePatch {
                status: Some(Status::InReview),
                internal_notes: None,
            },
        )
        .unwrap();

        assert_eq!(updated.status, Status::InReview);
        assert_eq!(updated.internal_notes, "");
    }

    #[test]
    fn empty_patch_is_rejected_and_record_unchanged() {
        let (store, record) = seeded_store();

        let err = update_intake(&store, record.id, &IntakePatch::default()).unwrap_err();
        assert_eq!(err, UpdateError::NoFields);

        let after = store.get_intake(record.id).unwrap().unwrap();
        assert_eq!(after, record);
    }

    #[test]
    fn unknown_id_is_not_found() {
        let (store, _) = seeded_store();

        let err = update_intake(
            &store,
            424242,
            &IntakePatch {
                status: Some(Status::Resolved),
                internal_notes: None,
            },
        )
        .unwrap_err();
        assert_eq!(err, UpdateError::NotFound { id: 424242 });
    }

    #[test]
    fn identity_transition_still_bumps_updated_at() {
        let (store, record) = seeded_store();
        let later = Utc.with_ymd_and_hms(2024, 1, 3, 9, 0, 0).unwrap();

        // new -> new is allowed and still counts as an accepted change.
        let updated = update_intake_at(
            &store,
            record.id,
            &IntakePatch {
                status: Some(Status::New),
                internal_notes: None,
            },
            later,
        )
        .unwrap();

        assert_eq!(updated.status, Status::New);
        assert_eq!(updated.updated_at, later);
    }

    #[test]
    fn backward_transition_is_allowed() {
        let (store, record) = seeded_store();

        update_intake(
            &store,
            record.id,
            &IntakePatch {
                status: Some(Status::Resolved),
                internal_notes: None,
            },
        )
        .unwrap();

        let reopened = update_intake(
            &store,
            record.id,
            &IntakePatch {
                status: Some(Status::New),
                internal_notes: None,
            },
        )
        .unwrap();
        assert_eq!(reopened.status, Status::New);
    }
}
