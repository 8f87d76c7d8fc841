//! The `StudentStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g.
//! `classbook-store-sqlite`). The portal depends on this abstraction, not on
//! any concrete backend.

use std::future::Future;

use crate::{
  attendance::{AttendanceRecord, NewAttendance, UpsertOutcome},
  marks::{MarkRecord, NewMark},
  report::StudentReport,
  student::{NewStudent, Student, StudentId},
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// A single typed predicate over students. Backends bind every value as a
/// parameter; nothing here is ever spliced into query text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
  /// Case-insensitive substring match against name or roll. Wildcard
  /// characters in the text match literally.
  Search(String),
  /// Exact match on class.
  ClassIs(String),
}

/// Parameters for [`StudentStore::report`]. All conditions must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentQuery {
  pub conditions: Vec<Condition>,
}

impl StudentQuery {
  /// Every student, unfiltered.
  pub fn all() -> Self { Self::default() }

  /// Add a search condition; blank text adds nothing.
  pub fn search(mut self, text: &str) -> Self {
    let text = text.trim();
    if !text.is_empty() {
      self.conditions.push(Condition::Search(text.to_owned()));
    }
    self
  }

  /// Add a class condition; a blank class adds nothing.
  pub fn class(mut self, class: &str) -> Self {
    let class = class.trim();
    if !class.is_empty() {
      self.conditions.push(Condition::ClassIs(class.to_owned()));
    }
    self
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Classbook store backend.
///
/// Students and marks are insert-only; attendance is upserted on
/// `(student_id, date)`. Nothing is ever deleted through this trait.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait StudentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Commands ──────────────────────────────────────────────────────────

  /// Persist a new student. Fails if the roll is already taken.
  fn add_student(
    &self,
    input: NewStudent,
  ) -> impl Future<Output = Result<Student, Self::Error>> + Send + '_;

  /// Insert or overwrite the attendance record for `(student_id, date)`.
  /// Fails if the student does not exist.
  fn record_attendance(
    &self,
    input: NewAttendance,
  ) -> impl Future<Output = Result<(AttendanceRecord, UpsertOutcome), Self::Error>>
  + Send
  + '_;

  /// Append a mark record. Fails if the student does not exist.
  fn record_marks(
    &self,
    input: NewMark,
  ) -> impl Future<Output = Result<MarkRecord, Self::Error>> + Send + '_;

  // ── Lookups ───────────────────────────────────────────────────────────

  /// Retrieve a student by id. Returns `None` if not found.
  fn get_student(
    &self,
    id: StudentId,
  ) -> impl Future<Output = Result<Option<Student>, Self::Error>> + Send + '_;

  /// All attendance records for a student, oldest date first.
  fn attendance_for(
    &self,
    student_id: StudentId,
  ) -> impl Future<Output = Result<Vec<AttendanceRecord>, Self::Error>> + Send + '_;

  /// All mark records for a student in insertion order.
  fn marks_for(
    &self,
    student_id: StudentId,
  ) -> impl Future<Output = Result<Vec<MarkRecord>, Self::Error>> + Send + '_;

  /// Every student ordered by name, for form selectors.
  fn student_options(
    &self,
  ) -> impl Future<Output = Result<Vec<Student>, Self::Error>> + Send + '_;

  /// Distinct class values in ascending order, for the filter selector.
  fn class_options(
    &self,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;

  // ── Reports ───────────────────────────────────────────────────────────

  /// Students matching `query`, newest first, each with attendance
  /// percentage and average marks over their full history.
  fn report<'a>(
    &'a self,
    query: &'a StudentQuery,
  ) -> impl Future<Output = Result<Vec<StudentReport>, Self::Error>> + Send + 'a;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn blank_filters_add_no_conditions() {
    assert_eq!(StudentQuery::all().search("  ").class(""), StudentQuery::all());
  }

  #[test]
  fn filters_are_trimmed_and_kept_in_order() {
    let q = StudentQuery::all().search(" ana ").class("CSE-3A");
    assert_eq!(q.conditions, vec![
      Condition::Search("ana".into()),
      Condition::ClassIs("CSE-3A".into()),
    ]);
  }
}
