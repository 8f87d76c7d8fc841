//! Students: the row every attendance and mark record hangs off.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ValidationError, error::Result, input::clean};

/// Store-generated identity. Ids only ever grow, so "newest first" is
/// "highest id first".
pub type StudentId = i64;

/// A persisted student. Never updated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
  pub id:         StudentId,
  pub name:       String,
  pub roll:       String,
  pub class:      String,
  /// Free text; empty when the operator left it out.
  pub skills:     String,
  pub created_at: DateTime<Utc>,
}

impl Student {
  /// Selector label, e.g. `Ananya Rao — 23CS1042 (CSE-3A)`.
  pub fn label(&self) -> String {
    format!("{} — {} ({})", self.name, self.roll, self.class)
  }
}

/// Validated input for [`StudentStore::add_student`](crate::store::StudentStore::add_student).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
  pub name:   String,
  pub roll:   String,
  pub class:  String,
  pub skills: String,
}

impl NewStudent {
  /// Trim every field and require name, roll and class.
  pub fn new(name: &str, roll: &str, class: &str, skills: &str) -> Result<Self> {
    let name  = clean(name);
    let roll  = clean(roll);
    let class = clean(class);

    if name.is_empty() || roll.is_empty() || class.is_empty() {
      return Err(ValidationError::MissingStudentFields);
    }

    Ok(Self { name, roll, class, skills: clean(skills) })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn trims_and_defaults_skills() {
    let s = NewStudent::new(" Ananya Rao ", "23CS1042 ", " CSE-3A", "").unwrap();
    assert_eq!(s.name, "Ananya Rao");
    assert_eq!(s.roll, "23CS1042");
    assert_eq!(s.class, "CSE-3A");
    assert_eq!(s.skills, "");
  }

  #[test]
  fn blank_required_field_is_rejected() {
    for (name, roll, class) in [("", "r1", "c"), ("n", "   ", "c"), ("n", "r1", "\t")] {
      assert_eq!(
        NewStudent::new(name, roll, class, "Python"),
        Err(ValidationError::MissingStudentFields),
      );
    }
  }

  #[test]
  fn label_matches_selector_format() {
    let s = Student {
      id:         3,
      name:       "Bikram Thapa".into(),
      roll:       "23CS1007".into(),
      class:      "CSE-3B".into(),
      skills:     String::new(),
      created_at: Utc::now(),
    };
    assert_eq!(s.label(), "Bikram Thapa — 23CS1007 (CSE-3B)");
  }
}
