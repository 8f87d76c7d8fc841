//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, attendance dates as
//! `YYYY-MM-DD`, and attendance status as its display name.

use chrono::{DateTime, NaiveDate, Utc};
use classbook_core::{
  attendance::{AttendanceRecord, AttendanceStatus, DATE_FORMAT},
  marks::{MarkRecord, Marks},
  report::{AttendanceTally, MarkTally, StudentReport},
  student::{Student, StudentId},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(format!("timestamp {s:?}: {e}")))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::Decode(format!("date {s:?}: {e}")))
}

// ─── AttendanceStatus ────────────────────────────────────────────────────────

pub fn encode_status(status: AttendanceStatus) -> &'static str {
  match status {
    AttendanceStatus::Present => "Present",
    AttendanceStatus::Absent => "Absent",
  }
}

pub fn decode_status(s: &str) -> Result<AttendanceStatus> {
  match s {
    "Present" => Ok(AttendanceStatus::Present),
    "Absent" => Ok(AttendanceStatus::Absent),
    other => Err(Error::Decode(format!("unknown attendance status: {other:?}"))),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `students` row.
pub struct RawStudent {
  pub id:         StudentId,
  pub name:       String,
  pub roll:       String,
  pub class:      String,
  pub skills:     String,
  pub created_at: String,
}

/// Column list matching [`RawStudent::from_row`], qualified with `s.`.
pub const STUDENT_COLUMNS: &str = "s.id, s.name, s.roll, s.class, s.skills, s.created_at";

impl RawStudent {
  /// Read the six leading columns of `row` (see [`STUDENT_COLUMNS`]).
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      name:       row.get(1)?,
      roll:       row.get(2)?,
      class:      row.get(3)?,
      skills:     row.get(4)?,
      created_at: row.get(5)?,
    })
  }

  pub fn into_student(self) -> Result<Student> {
    Ok(Student {
      id:         self.id,
      name:       self.name,
      roll:       self.roll,
      class:      self.class,
      skills:     self.skills,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read from an `attendance` row.
pub struct RawAttendance {
  pub id:         i64,
  pub student_id: StudentId,
  pub date:       String,
  pub status:     String,
}

impl RawAttendance {
  pub fn into_record(self) -> Result<AttendanceRecord> {
    Ok(AttendanceRecord {
      id:         self.id,
      student_id: self.student_id,
      date:       decode_date(&self.date)?,
      status:     decode_status(&self.status)?,
    })
  }
}

/// Raw values read from a `marks` row. Marks are stored in hundredths.
pub fn mark_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<MarkRecord> {
  Ok(MarkRecord {
    id:         row.get(0)?,
    student_id: row.get(1)?,
    subject:    row.get(2)?,
    term:       row.get(3)?,
    marks:      Marks(row.get(4)?),
  })
}

/// A student row joined with its attendance and marks aggregates.
pub struct RawReport {
  pub student:     RawStudent,
  pub present_cnt: u32,
  pub total_cnt:   u32,
  pub mark_sum:    i64,
  pub mark_cnt:    u32,
}

impl RawReport {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      student:     RawStudent::from_row(row)?,
      present_cnt: row.get(6)?,
      total_cnt:   row.get(7)?,
      mark_sum:    row.get(8)?,
      mark_cnt:    row.get(9)?,
    })
  }

  pub fn into_report(self) -> Result<StudentReport> {
    Ok(StudentReport::new(
      self.student.into_student()?,
      AttendanceTally { present: self.present_cnt, total: self.total_cnt },
      MarkTally { sum: self.mark_sum, count: self.mark_cnt },
    ))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn status_round_trips_through_storage_text() {
    for status in AttendanceStatus::ALL {
      assert_eq!(decode_status(encode_status(status)).unwrap(), status);
    }
    assert!(matches!(decode_status("present"), Err(Error::Decode(_))));
  }

  #[test]
  fn date_uses_iso_format() {
    let d = NaiveDate::from_ymd_opt(2024, 1, 9).unwrap();
    assert_eq!(encode_date(d), "2024-01-09");
    assert_eq!(decode_date("2024-01-09").unwrap(), d);
  }
}
