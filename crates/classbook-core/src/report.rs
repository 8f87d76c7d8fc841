//! Derived per-student metrics. Never stored; always computed on read.
//!
//! Storage backends hand over raw tallies ([`AttendanceTally`],
//! [`MarkTally`]); the formulas and the health classification live here so
//! every backend reports identical numbers.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{marks::Marks, student::Student};

/// `numerator / denominator` rounded half up, in exact integer arithmetic.
/// Both operands are non-negative and `denominator` is non-zero.
fn div_half_up(numerator: u64, denominator: u64) -> u64 {
  (2 * numerator + denominator) / (2 * denominator)
}

// ─── Tallies ─────────────────────────────────────────────────────────────────

/// Present and total attendance counts over a student's full history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttendanceTally {
  pub present: u32,
  pub total:   u32,
}

impl AttendanceTally {
  /// `present / total × 100`, rounded to two places; `0` with no records.
  pub fn percent(&self) -> f64 {
    if self.total == 0 {
      return 0.0;
    }
    let hundredths = div_half_up(u64::from(self.present) * 10_000, u64::from(self.total));
    hundredths as f64 / 100.0
  }
}

/// Sum (in hundredths) and count of all mark records for a student.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkTally {
  pub sum:   i64,
  pub count: u32,
}

impl MarkTally {
  /// Arithmetic mean rounded to two places; `0` with no records.
  pub fn average(&self) -> f64 {
    if self.count == 0 {
      return 0.0;
    }
    let sum = u64::try_from(self.sum).unwrap_or(0);
    Marks(div_half_up(sum, u64::from(self.count)) as i64).value()
  }
}

impl FromIterator<Marks> for MarkTally {
  fn from_iter<I: IntoIterator<Item = Marks>>(iter: I) -> Self {
    iter.into_iter().fold(Self::default(), |acc, m| Self {
      sum:   acc.sum + m.hundredths(),
      count: acc.count + 1,
    })
  }
}

// ─── Health ──────────────────────────────────────────────────────────────────

/// Three-tier classification of a student's standing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum Health {
  Good,
  Average,
  #[strum(serialize = "Needs Attention")]
  #[serde(rename = "Needs Attention")]
  NeedsAttention,
}

impl Health {
  /// Both thresholds are inclusive.
  pub fn classify(attendance_percent: f64, avg_marks: f64) -> Self {
    if attendance_percent >= 75.0 && avg_marks >= 60.0 {
      Self::Good
    } else if attendance_percent >= 60.0 || avg_marks >= 50.0 {
      Self::Average
    } else {
      Self::NeedsAttention
    }
  }
}

// ─── Report row ──────────────────────────────────────────────────────────────

/// One dashboard / export row: a student plus their derived metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentReport {
  pub student:            Student,
  pub attendance_percent: f64,
  pub avg_marks:          f64,
}

impl StudentReport {
  pub fn new(student: Student, attendance: AttendanceTally, marks: MarkTally) -> Self {
    Self {
      student,
      attendance_percent: attendance.percent(),
      avg_marks: marks.average(),
    }
  }

  pub fn health(&self) -> Health { Health::classify(self.attendance_percent, self.avg_marks) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn attendance_percent() {
    assert_eq!(AttendanceTally { present: 3, total: 4 }.percent(), 75.0);
    assert_eq!(AttendanceTally { present: 0, total: 0 }.percent(), 0.0);
    assert_eq!(AttendanceTally { present: 0, total: 5 }.percent(), 0.0);
    assert_eq!(AttendanceTally { present: 2, total: 3 }.percent(), 66.67);
  }

  #[test]
  fn average_marks() {
    let tally: MarkTally = [7000, 8000, 9000].into_iter().map(Marks).collect();
    assert_eq!(tally.count, 3);
    assert_eq!(tally.average(), 80.0);
    assert_eq!(MarkTally::default().average(), 0.0);

    let tally: MarkTally = [7850, 9125, 6400].into_iter().map(Marks).collect();
    assert_eq!(tally.average(), 77.92);
  }

  #[test]
  fn average_on_a_half_hundredth_rounds_up() {
    let tally: MarkTally = [100, 101].into_iter().map(Marks).collect();
    assert_eq!(tally.average(), 1.01);

    let tally: MarkTally = [1, 2, 2, 2].into_iter().map(Marks).collect();
    assert_eq!(tally.average(), 0.02);
  }

  #[test]
  fn health_tiers() {
    assert_eq!(Health::classify(80.0, 65.0), Health::Good);
    assert_eq!(Health::classify(80.0, 40.0), Health::Average);
    assert_eq!(Health::classify(50.0, 55.0), Health::Average);
    assert_eq!(Health::classify(50.0, 40.0), Health::NeedsAttention);
  }

  #[test]
  fn health_thresholds_are_inclusive() {
    assert_eq!(Health::classify(75.0, 60.0), Health::Good);
    assert_eq!(Health::classify(74.99, 60.0), Health::Average);
    assert_eq!(Health::classify(75.0, 59.99), Health::Average);
    assert_eq!(Health::classify(60.0, 0.0), Health::Average);
    assert_eq!(Health::classify(0.0, 50.0), Health::Average);
    assert_eq!(Health::classify(59.99, 49.99), Health::NeedsAttention);
  }

  #[test]
  fn health_display_names() {
    assert_eq!(Health::Good.to_string(), "Good");
    assert_eq!(Health::NeedsAttention.to_string(), "Needs Attention");
    assert_eq!("Needs Attention".parse::<Health>().unwrap(), Health::NeedsAttention);
  }

  #[test]
  fn attendance_percent_rounds_half_up_exactly() {
    // 1/32 = 3.125%, 1/400 = 0.25%, 1/8000 = 0.0125%
    assert_eq!(AttendanceTally { present: 1, total: 32 }.percent(), 3.13);
    assert_eq!(AttendanceTally { present: 1, total: 400 }.percent(), 0.25);
    assert_eq!(AttendanceTally { present: 1, total: 8000 }.percent(), 0.01);
  }
}
