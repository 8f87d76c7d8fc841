//! Error type for `classbook-store-sqlite`.

use classbook_core::student::StudentId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("could not create database directory: {0}")]
  Io(#[from] std::io::Error),

  /// A uniqueness constraint rejected the write.
  #[error("roll {0:?} already exists")]
  Conflict(String),

  #[error("student not found: {0}")]
  StudentNotFound(StudentId),

  /// A stored column did not decode into its domain type.
  #[error("decode error: {0}")]
  Decode(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
