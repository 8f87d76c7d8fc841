//! Error types for `classbook-core`.
//!
//! Every variant describes operator input that was rejected before anything
//! reached the store. The `Display` text is shown to the operator verbatim.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
  #[error("Please fill Name, Roll, and Class.")]
  MissingStudentFields,

  #[error("Please choose student and date.")]
  MissingAttendanceFields,

  #[error("Please fill all fields.")]
  MissingMarksFields,

  #[error("Invalid date {0:?}; expected YYYY-MM-DD.")]
  InvalidDate(String),

  #[error("Invalid attendance status {0:?}; expected Present or Absent.")]
  InvalidStatus(String),

  #[error("Invalid marks {0:?}; expected a number.")]
  InvalidMarks(String),

  #[error("Marks cannot be negative (got {0}).")]
  NegativeMarks(f64),
}

pub type Result<T, E = ValidationError> = std::result::Result<T, E>;
