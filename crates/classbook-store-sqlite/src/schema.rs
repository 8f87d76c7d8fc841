//! SQL schema for the Classbook SQLite store.
//!
//! Executed at every connection startup. There is no migration path; the
//! version number only marks the layout.
//!
//! The roll index calls `casefold`, which [`register_functions`] must have
//! installed on the connection before this batch runs.

use rusqlite::functions::FunctionFlags;

/// Install the scalar functions the schema and queries rely on.
///
/// `casefold(text)` lowercases with full Unicode rules, unlike SQLite's
/// built-in `lower()` and `NOCASE`, which only fold ASCII.
pub fn register_functions(conn: &rusqlite::Connection) -> rusqlite::Result<()> {
  conn.create_scalar_function(
    "casefold",
    1,
    FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
    |ctx| {
      let text: Option<String> = ctx.get(0)?;
      Ok(text.map(|t| t.to_lowercase()))
    },
  )
}

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS students (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    roll        TEXT NOT NULL,
    class       TEXT NOT NULL,
    skills      TEXT NOT NULL DEFAULT '',
    created_at  TEXT NOT NULL          -- ISO 8601 UTC; server-assigned
);

-- One row per student per day; re-recording a day overwrites `status`.
CREATE TABLE IF NOT EXISTS attendance (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id  INTEGER NOT NULL REFERENCES students(id) ON DELETE CASCADE,
    date        TEXT NOT NULL,         -- YYYY-MM-DD
    status      TEXT NOT NULL CHECK (status IN ('Present', 'Absent')),
    UNIQUE (student_id, date)
);

-- Append-only; several rows per (student, subject, term) are allowed.
CREATE TABLE IF NOT EXISTS marks (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id  INTEGER NOT NULL REFERENCES students(id) ON DELETE CASCADE,
    subject     TEXT NOT NULL,
    term        TEXT NOT NULL,
    marks       INTEGER NOT NULL CHECK (marks >= 0)  -- hundredths
);

-- Rolls are unique regardless of case, in any script.
CREATE UNIQUE INDEX IF NOT EXISTS students_roll_key ON students(casefold(roll));
CREATE INDEX IF NOT EXISTS students_class_idx ON students(class);
CREATE INDEX IF NOT EXISTS marks_student_idx  ON marks(student_id);

PRAGMA user_version = 2;
";
