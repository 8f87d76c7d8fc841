//! Normalisation shared by the form validators.

use crate::student::StudentId;

/// Trim surrounding whitespace; every text field is stored trimmed.
pub(crate) fn clean(raw: &str) -> String { raw.trim().to_owned() }

/// Parse a selector value into a student id. Blank, non-numeric, zero and
/// negative values all mean "no student chosen".
pub(crate) fn parse_student_id(raw: &str) -> Option<StudentId> {
  raw.trim().parse::<StudentId>().ok().filter(|id| *id > 0)
}
