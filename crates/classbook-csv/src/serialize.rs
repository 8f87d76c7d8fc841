//! RFC 4180 style serializer with `\n` record terminators.

use classbook_core::report::StudentReport;

use crate::HEADER;

/// Timestamp layout of the "Last Updated" column.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub(crate) fn serialize(rows: &[StudentReport]) -> String {
  let mut out = String::new();
  write_record(&mut out, HEADER.iter().copied());

  for row in rows {
    let s = &row.student;
    let id = s.id.to_string();
    let attendance = format!("{:.2}", row.attendance_percent);
    let average = format!("{:.2}", row.avg_marks);
    let updated = s.created_at.format(TIMESTAMP_FORMAT).to_string();

    write_record(&mut out, [
      id.as_str(),
      s.name.as_str(),
      s.roll.as_str(),
      s.class.as_str(),
      s.skills.as_str(),
      attendance.as_str(),
      average.as_str(),
      updated.as_str(),
    ]);
  }

  out
}

// ─── Field escaping ──────────────────────────────────────────────────────────

fn write_record<'a>(out: &mut String, fields: impl IntoIterator<Item = &'a str>) {
  for (i, field) in fields.into_iter().enumerate() {
    if i > 0 {
      out.push(',');
    }
    write_field(out, field);
  }
  out.push('\n');
}

/// Quote only when the field contains a delimiter, quote, or line break;
/// inner quotes are doubled.
fn write_field(out: &mut String, field: &str) {
  if field.contains([',', '"', '\n', '\r']) {
    out.push('"');
    out.push_str(&field.replace('"', "\"\""));
    out.push('"');
  } else {
    out.push_str(field);
  }
}

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Utc};
  use classbook_core::{
    marks::Marks,
    report::{AttendanceTally, MarkTally},
    student::Student,
  };

  use super::*;

  fn report(id: i64, name: &str, skills: &str, att: (u32, u32), marks: &[i64]) -> StudentReport {
    StudentReport::new(
      Student {
        id,
        name: name.into(),
        roll: format!("23CS10{id:02}"),
        class: "CSE-3A".into(),
        skills: skills.into(),
        created_at: Utc.with_ymd_and_hms(2024, 9, 1, 8, 30, 0).unwrap(),
      },
      AttendanceTally { present: att.0, total: att.1 },
      marks.iter().copied().map(Marks).collect::<MarkTally>(),
    )
  }

  #[test]
  fn empty_report_is_header_only() {
    assert_eq!(
      serialize(&[]),
      "ID,Name,Roll,Class,Skills,Attendance %,Average Marks,Last Updated\n"
    );
  }

  #[test]
  fn golden_output() {
    let rows = [
      report(2, "Bikram Thapa", "", (0, 0), &[]),
      report(1, "Ananya Rao", "Python, C++", (3, 4), &[7000, 8000, 9000]),
    ];
    let expected = "\
ID,Name,Roll,Class,Skills,Attendance %,Average Marks,Last Updated
2,Bikram Thapa,23CS1002,CSE-3A,,0.00,0.00,2024-09-01 08:30:00
1,Ananya Rao,23CS1001,CSE-3A,\"Python, C++\",75.00,80.00,2024-09-01 08:30:00
";
    assert_eq!(serialize(&rows), expected);
  }

  #[test]
  fn numbers_always_have_two_decimals() {
    let rows = [report(1, "A", "", (2, 3), &[7850, 9125, 6400])];
    let out = serialize(&rows);
    let line = out.lines().nth(1).unwrap();
    assert!(line.contains(",66.67,77.92,"), "{line}");
  }

  #[test]
  fn half_hundredth_average_rounds_up() {
    let rows = [report(1, "A", "", (0, 0), &[100, 101])];
    let out = serialize(&rows);
    assert!(out.lines().nth(1).unwrap().contains(",0.00,1.01,"), "{out}");
  }

  #[test]
  fn quotes_and_newlines_are_escaped() {
    let mut out = String::new();
    write_field(&mut out, "say \"hi\"");
    assert_eq!(out, "\"say \"\"hi\"\"\"");

    let mut out = String::new();
    write_field(&mut out, "line\nbreak");
    assert_eq!(out, "\"line\nbreak\"");
  }
}
