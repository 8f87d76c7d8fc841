//! Daily attendance.
//!
//! A student has at most one record per calendar date. Recording attendance
//! for a date that already has a record overwrites its status in place.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::{
  ValidationError,
  error::Result,
  input::{clean, parse_student_id},
  student::StudentId,
};

/// Wire and storage format for attendance dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
  AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum AttendanceStatus {
  #[default]
  Present,
  Absent,
}

impl AttendanceStatus {
  pub const ALL: [AttendanceStatus; 2] = [Self::Present, Self::Absent];

  pub fn is_present(self) -> bool { matches!(self, Self::Present) }
}

/// A persisted attendance row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
  pub id:         i64,
  pub student_id: StudentId,
  pub date:       NaiveDate,
  pub status:     AttendanceStatus,
}

/// Whether an upsert created a row or overwrote an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum UpsertOutcome {
  Inserted,
  Updated,
}

/// Validated input for [`StudentStore::record_attendance`](crate::store::StudentStore::record_attendance).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAttendance {
  pub student_id: StudentId,
  pub date:       NaiveDate,
  pub status:     AttendanceStatus,
}

impl NewAttendance {
  /// Parse raw form values. A blank status means [`AttendanceStatus::Present`].
  pub fn new(student_id: &str, date: &str, status: &str) -> Result<Self> {
    let date = clean(date);
    let Some(student_id) = parse_student_id(student_id) else {
      return Err(ValidationError::MissingAttendanceFields);
    };
    if date.is_empty() {
      return Err(ValidationError::MissingAttendanceFields);
    }

    let date = NaiveDate::parse_from_str(&date, DATE_FORMAT)
      .map_err(|_| ValidationError::InvalidDate(date.clone()))?;

    let status = match clean(status) {
      s if s.is_empty() => AttendanceStatus::default(),
      s => s.parse().map_err(|_| ValidationError::InvalidStatus(s))?,
    };

    Ok(Self { student_id, date, status })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn status_defaults_to_present() {
    let a = NewAttendance::new("4", "2024-09-02", "").unwrap();
    assert_eq!(a.student_id, 4);
    assert_eq!(a.date, NaiveDate::from_ymd_opt(2024, 9, 2).unwrap());
    assert_eq!(a.status, AttendanceStatus::Present);
  }

  #[test]
  fn status_parses_case_insensitively() {
    let a = NewAttendance::new("4", "2024-09-02", "absent").unwrap();
    assert_eq!(a.status, AttendanceStatus::Absent);
    assert_eq!(a.status.to_string(), "Absent");
  }

  #[test]
  fn unknown_status_is_rejected() {
    assert_eq!(
      NewAttendance::new("4", "2024-09-02", "Late"),
      Err(ValidationError::InvalidStatus("Late".into())),
    );
  }

  #[test]
  fn missing_student_or_date_is_rejected() {
    assert_eq!(
      NewAttendance::new("", "2024-09-02", "Present"),
      Err(ValidationError::MissingAttendanceFields),
    );
    assert_eq!(
      NewAttendance::new("0", "2024-09-02", "Present"),
      Err(ValidationError::MissingAttendanceFields),
    );
    assert_eq!(
      NewAttendance::new("4", "  ", "Present"),
      Err(ValidationError::MissingAttendanceFields),
    );
  }

  #[test]
  fn malformed_date_is_rejected() {
    assert_eq!(
      NewAttendance::new("4", "02/09/2024", "Present"),
      Err(ValidationError::InvalidDate("02/09/2024".into())),
    );
  }
}
