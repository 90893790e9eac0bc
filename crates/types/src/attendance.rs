//! Session attendance.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether a patient attended a session on a given date.
///
/// The register is tri-state: a recorded `true`, a recorded `false`, or no
/// record at all (callers pass `Option<&AttendanceRecord>` for the latter).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub patient_id: Uuid,
    pub session_id: Uuid,
    pub date: NaiveDate,
    pub attending: bool,
}
