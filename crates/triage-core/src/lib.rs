//! Core triage engine for incoming support intakes.
//!
//! An unauthenticated submitter files an intake, the keyword classifier
//! assigns it a category at submission time, and an authenticated reviewer
//! filters, sorts, and updates the resulting queue.
//!
//! Module map:
//! - [`classify`]: deterministic keyword classification (pure)
//! - [`model`]: the intake record and its value types
//! - [`store`]: SQLite-backed persistence for intake records
//! - [`lifecycle`]: partial updates to a record's mutable fields
//! - [`query`]: queue filtering and ordering for the reviewer view
//! - [`auth`]: the reviewer gate consumed by protected operations

pub mod auth;
pub mod classify;
pub mod lifecycle;
pub mod model;
pub mod query;
pub mod store;

pub use classify::classify;
pub use model::{Category, IntakePatch, IntakeRecord, NewIntake, Status, Urgency};
pub use store::IntakeStore;
