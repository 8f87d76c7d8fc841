//! CSV codec for the Classbook student report.
//!
//! Turns [`StudentReport`] rows into the fixed-header export file. Pure
//! synchronous; no HTTP or database dependencies. Output is byte-stable for
//! identical input: numbers always carry two decimals with a `.` separator,
//! rows end with `\n`, and nothing depends on locale.
//!
//! # Quick start
//!
//! ```no_run
//! use classbook_csv::serialize;
//!
//! let csv = serialize(&[]);
//! assert_eq!(csv, "ID,Name,Roll,Class,Skills,Attendance %,Average Marks,Last Updated\n");
//! ```

mod serialize;

use chrono::{DateTime, Utc};
use classbook_core::report::StudentReport;

/// Column names, in output order.
pub const HEADER: [&str; 8] = [
  "ID",
  "Name",
  "Roll",
  "Class",
  "Skills",
  "Attendance %",
  "Average Marks",
  "Last Updated",
];

/// MIME type for the export response.
pub const CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// Serialize `rows` (in the given order) under the fixed header.
pub fn serialize(rows: &[StudentReport]) -> String { serialize::serialize(rows) }

/// Download name for an export produced at `at`,
/// e.g. `student_report_20240902_141503.csv`.
pub fn export_filename(at: DateTime<Utc>) -> String {
  format!("student_report_{}.csv", at.format("%Y%m%d_%H%M%S"))
}
