//! Subject-wise marks. Append-only: every submission is a new record and
//! every record counts towards the student's average.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
  ValidationError,
  error::Result,
  input::{clean, parse_student_id},
  student::StudentId,
};

/// A score held exactly in hundredths: `78.50` is `Marks(7850)`.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Marks(pub i64);

impl Marks {
  pub fn hundredths(self) -> i64 { self.0 }

  pub fn value(self) -> f64 { self.0 as f64 / 100.0 }
}

impl fmt::Display for Marks {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let sign = if self.0 < 0 { "-" } else { "" };
    let abs = self.0.unsigned_abs();
    write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
  }
}

/// A persisted mark row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkRecord {
  pub id:         i64,
  pub student_id: StudentId,
  pub subject:    String,
  pub term:       String,
  pub marks:      Marks,
}

/// Validated input for [`StudentStore::record_marks`](crate::store::StudentStore::record_marks).
#[derive(Debug, Clone, PartialEq)]
pub struct NewMark {
  pub student_id: StudentId,
  pub subject:    String,
  pub term:       String,
  /// Non-negative.
  pub marks:      Marks,
}

impl NewMark {
  pub fn new(student_id: &str, subject: &str, term: &str, marks: &str) -> Result<Self> {
    let subject = clean(subject);
    let term    = clean(term);
    let raw     = clean(marks);

    let student_id = parse_student_id(student_id);
    let (Some(student_id), false, false, false) =
      (student_id, subject.is_empty(), term.is_empty(), raw.is_empty())
    else {
      return Err(ValidationError::MissingMarksFields);
    };

    let marks = parse_marks(&raw)?;
    Ok(Self { student_id, subject, term, marks })
  }
}

/// Parse a plain decimal (`78`, `78.5`, `.75`) into hundredths, rounding
/// half up on the third fractional digit. The arithmetic is exact, so
/// `1.005` becomes `1.01`.
fn parse_marks(raw: &str) -> Result<Marks> {
  let invalid = || ValidationError::InvalidMarks(raw.to_owned());

  let (negative, unsigned) = match raw.strip_prefix('-') {
    Some(rest) => (true, rest),
    None => (false, raw.strip_prefix('+').unwrap_or(raw)),
  };
  let (whole, frac) = unsigned.split_once('.').unwrap_or((unsigned, ""));

  let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
  if (whole.is_empty() && frac.is_empty()) || !all_digits(whole) || !all_digits(frac) {
    return Err(invalid());
  }

  let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().map_err(|_| invalid())? };
  let mut digits = frac.bytes().map(|b| i64::from(b - b'0')).chain(std::iter::repeat(0));
  let (tenths, hundredths, thousandths) = (
    digits.next().unwrap_or(0),
    digits.next().unwrap_or(0),
    digits.next().unwrap_or(0),
  );
  let round_up = i64::from(thousandths >= 5);

  let total = whole
    .checked_mul(100)
    .and_then(|v| v.checked_add(tenths * 10 + hundredths + round_up))
    .ok_or_else(invalid)?;

  if negative && total != 0 {
    return Err(ValidationError::NegativeMarks(-(total as f64) / 100.0));
  }
  Ok(Marks(total))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_and_rounds_to_two_places() {
    let m = NewMark::new("2", " Mathematics ", "Midterm 1", "78.456").unwrap();
    assert_eq!(m.student_id, 2);
    assert_eq!(m.subject, "Mathematics");
    assert_eq!(m.term, "Midterm 1");
    assert_eq!(m.marks, Marks(7846));
  }

  #[test]
  fn half_hundredths_round_up_exactly() {
    assert_eq!(parse_marks("1.005"), Ok(Marks(101)));
    assert_eq!(parse_marks("2.675"), Ok(Marks(268)));
    assert_eq!(parse_marks("1.0049999"), Ok(Marks(100)));
    assert_eq!(parse_marks("99.995"), Ok(Marks(10000)));
  }

  #[test]
  fn plain_decimal_forms() {
    assert_eq!(parse_marks("78"), Ok(Marks(7800)));
    assert_eq!(parse_marks("78.5"), Ok(Marks(7850)));
    assert_eq!(parse_marks(".75"), Ok(Marks(75)));
    assert_eq!(parse_marks("+3."), Ok(Marks(300)));
  }

  #[test]
  fn display_has_two_places() {
    assert_eq!(Marks(7850).to_string(), "78.50");
    assert_eq!(Marks(5).to_string(), "0.05");
    assert_eq!(Marks(101).value(), 1.01);
  }

  #[test]
  fn zero_is_allowed() {
    assert_eq!(NewMark::new("2", "Physics", "Finals", "0").unwrap().marks, Marks(0));
    assert_eq!(NewMark::new("2", "Physics", "Finals", "-0").unwrap().marks, Marks(0));
  }

  #[test]
  fn negative_marks_are_rejected() {
    assert_eq!(
      NewMark::new("2", "Physics", "Finals", "-5"),
      Err(ValidationError::NegativeMarks(-5.0)),
    );
  }

  #[test]
  fn unparsable_marks_are_rejected() {
    for raw in ["seventy", "NaN", "inf", "7o", ".", "1e2", "1.2.3", "99999999999999999999"] {
      assert_eq!(
        NewMark::new("2", "Physics", "Finals", raw),
        Err(ValidationError::InvalidMarks(raw.into())),
      );
    }
  }

  #[test]
  fn every_field_is_required() {
    for (id, subject, term, marks) in [
      ("", "Physics", "Finals", "50"),
      ("2", "", "Finals", "50"),
      ("2", "Physics", " ", "50"),
      ("2", "Physics", "Finals", ""),
    ] {
      assert_eq!(
        NewMark::new(id, subject, term, marks),
        Err(ValidationError::MissingMarksFields),
      );
    }
  }
}
