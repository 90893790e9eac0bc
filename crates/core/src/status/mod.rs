//! Status generators.
//!
//! One generator per status taxonomy, each reducing its evidence
//! collections to exactly one value from a closed set:
//!
//! - [`consent`]: one answer from a patient's consent responses
//! - [`triage`]: whether clinical triage gates vaccination
//! - [`vaccination`]: whether the patient is vaccinated, due or eligible
//! - [`programme`]: the composed programme-level status
//! - [`session`]: the outcome of a single session visit
//! - [`registration`]: attendance/completion of a single session
//!
//! Generators expect evidence collections sorted in reverse chronological
//! order (most recent first) and re-filter invalidated, withdrawn and
//! discarded records defensively. All "today" comparisons use an explicit
//! date supplied at construction, so identical inputs always produce
//! identical outputs.

pub mod consent;
pub mod programme;
pub mod registration;
pub mod session;
pub mod triage;
pub mod vaccination;
