//! [`SqliteStore`]: the SQLite implementation of [`StudentStore`].

use std::path::Path;

use chrono::Utc;
use classbook_core::{
  attendance::{AttendanceRecord, NewAttendance, UpsertOutcome},
  marks::{MarkRecord, NewMark},
  report::StudentReport,
  store::{StudentQuery, StudentStore},
  student::{NewStudent, Student, StudentId},
};
use rusqlite::{OptionalExtension as _, TransactionBehavior};

use crate::{
  Error, Result,
  encode::{
    RawAttendance, RawReport, RawStudent, STUDENT_COLUMNS, encode_date, encode_dt,
    encode_status, mark_from_row,
  },
  query::where_clause,
  schema::{SCHEMA, register_functions},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Classbook store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  /// Missing parent directories are created first.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
      && !parent.as_os_str().is_empty()
    {
      tokio::fs::create_dir_all(parent).await?;
    }

    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    tracing::info!(path = %path.display(), "student store ready");
    Ok(store)
  }

  /// Open an in-memory store, mainly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  pub(crate) async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        register_functions(conn)?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

/// `true` when `err` is SQLite rejecting a write on a UNIQUE constraint.
fn is_unique_violation(err: &tokio_rusqlite::Error) -> bool {
  matches!(
    err,
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, _))
      if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}

fn student_exists(conn: &rusqlite::Connection, id: StudentId) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row("SELECT 1 FROM students WHERE id = ?1", [id], |_| Ok(()))
      .optional()?
      .is_some(),
  )
}

// ─── StudentStore impl ───────────────────────────────────────────────────────

impl StudentStore for SqliteStore {
  type Error = Error;

  // ── Commands ──────────────────────────────────────────────────────────────

  async fn add_student(&self, input: NewStudent) -> Result<Student> {
    let created_at = Utc::now();
    let at_str     = encode_dt(created_at);
    let row        = input.clone();

    let id: StudentId = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO students (name, roll, class, skills, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![row.name, row.roll, row.class, row.skills, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await
      .map_err(|e| {
        if is_unique_violation(&e) {
          Error::Conflict(input.roll.clone())
        } else {
          Error::Database(e)
        }
      })?;

    tracing::debug!(id, roll = %input.roll, "student inserted");
    Ok(Student {
      id,
      name: input.name,
      roll: input.roll,
      class: input.class,
      skills: input.skills,
      created_at,
    })
  }

  async fn record_attendance(
    &self,
    input: NewAttendance,
  ) -> Result<(AttendanceRecord, UpsertOutcome)> {
    let student_id = input.student_id;
    let date_str   = encode_date(input.date);
    let status_str = encode_status(input.status);

    // Read-then-write inside one IMMEDIATE transaction: the write lock is
    // taken before the read, so a concurrent writer for the same day lands
    // strictly before or after this one.
    let written: Option<(i64, UpsertOutcome)> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        if !student_exists(&tx, student_id)? {
          return Ok(None);
        }

        let existing: Option<i64> = tx
          .query_row(
            "SELECT id FROM attendance WHERE student_id = ?1 AND date = ?2",
            rusqlite::params![student_id, date_str],
            |r| r.get(0),
          )
          .optional()?;

        let written = match existing {
          Some(id) => {
            tx.execute(
              "UPDATE attendance SET status = ?1 WHERE id = ?2",
              rusqlite::params![status_str, id],
            )?;
            (id, UpsertOutcome::Updated)
          }
          None => {
            tx.execute(
              "INSERT INTO attendance (student_id, date, status) VALUES (?1, ?2, ?3)",
              rusqlite::params![student_id, date_str, status_str],
            )?;
            (tx.last_insert_rowid(), UpsertOutcome::Inserted)
          }
        };

        tx.commit()?;
        Ok(Some(written))
      })
      .await?;

    let (id, outcome) = written.ok_or(Error::StudentNotFound(student_id))?;
    let record = AttendanceRecord {
      id,
      student_id,
      date: input.date,
      status: input.status,
    };
    Ok((record, outcome))
  }

  async fn record_marks(&self, input: NewMark) -> Result<MarkRecord> {
    let student_id = input.student_id;
    let (subject, term) = (input.subject.clone(), input.term.clone());
    let marks = input.marks.hundredths();

    let id: Option<i64> = self
      .conn
      .call(move |conn| {
        if !student_exists(conn, student_id)? {
          return Ok(None);
        }
        conn.execute(
          "INSERT INTO marks (student_id, subject, term, marks) VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![student_id, subject, term, marks],
        )?;
        Ok(Some(conn.last_insert_rowid()))
      })
      .await?;

    let id = id.ok_or(Error::StudentNotFound(student_id))?;
    Ok(MarkRecord {
      id,
      student_id,
      subject: input.subject,
      term: input.term,
      marks: input.marks,
    })
  }

  // ── Lookups ───────────────────────────────────────────────────────────────

  async fn get_student(&self, id: StudentId) -> Result<Option<Student>> {
    let raw: Option<RawStudent> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {STUDENT_COLUMNS} FROM students s WHERE s.id = ?1"),
              [id],
              RawStudent::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawStudent::into_student).transpose()
  }

  async fn attendance_for(&self, student_id: StudentId) -> Result<Vec<AttendanceRecord>> {
    let raws: Vec<RawAttendance> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, student_id, date, status FROM attendance
           WHERE student_id = ?1
           ORDER BY date ASC",
        )?;
        let rows = stmt
          .query_map([student_id], |row| {
            Ok(RawAttendance {
              id:         row.get(0)?,
              student_id: row.get(1)?,
              date:       row.get(2)?,
              status:     row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAttendance::into_record).collect()
  }

  async fn marks_for(&self, student_id: StudentId) -> Result<Vec<MarkRecord>> {
    let marks = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, student_id, subject, term, marks FROM marks
           WHERE student_id = ?1
           ORDER BY id ASC",
        )?;
        let rows = stmt
          .query_map([student_id], mark_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(marks)
  }

  async fn student_options(&self) -> Result<Vec<Student>> {
    let raws: Vec<RawStudent> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {STUDENT_COLUMNS} FROM students s ORDER BY s.name ASC, s.id ASC"
        ))?;
        let rows = stmt
          .query_map([], RawStudent::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawStudent::into_student).collect()
  }

  async fn class_options(&self) -> Result<Vec<String>> {
    let classes = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare("SELECT DISTINCT class FROM students ORDER BY class ASC")?;
        let rows = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(classes)
  }

  // ── Reports ───────────────────────────────────────────────────────────────

  async fn report(&self, query: &StudentQuery) -> Result<Vec<StudentReport>> {
    let clause = where_clause(query);

    let raws: Vec<RawReport> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {STUDENT_COLUMNS},
                  COALESCE(a.present_cnt, 0),
                  COALESCE(a.total_cnt,   0),
                  COALESCE(m.mark_sum,    0),
                  COALESCE(m.mark_cnt,    0)
           FROM students s
           LEFT JOIN (
             SELECT student_id,
                    SUM(status = 'Present') AS present_cnt,
                    COUNT(*)                AS total_cnt
             FROM attendance GROUP BY student_id
           ) a ON a.student_id = s.id
           LEFT JOIN (
             SELECT student_id,
                    SUM(marks) AS mark_sum,
                    COUNT(*)   AS mark_cnt
             FROM marks GROUP BY student_id
           ) m ON m.student_id = s.id
           {}
           ORDER BY s.id DESC",
          clause.sql
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(clause.params), RawReport::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawReport::into_report).collect()
  }
}
