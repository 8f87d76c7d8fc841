//! CSV download of every student's summary, newest first.

use axum::{
  http::{StatusCode, header},
  response::{IntoResponse, Response},
};
use chrono::Utc;
use classbook_core::store::{StudentQuery, StudentStore};

use super::store_failed;
use crate::AppState;

pub async fn handler<S: StudentStore>(state: &AppState<S>) -> Response {
  let rows = match state.store.report(&StudentQuery::all()).await {
    Ok(rows) => rows,
    Err(e) => return store_failed(state, e),
  };

  let body = classbook_csv::serialize(&rows);
  let filename = classbook_csv::export_filename(Utc::now());
  tracing::info!(rows = rows.len(), %filename, "report exported");

  (
    StatusCode::OK,
    [
      (header::CONTENT_TYPE, classbook_csv::CONTENT_TYPE.to_string()),
      (header::CONTENT_DISPOSITION, format!("attachment; filename={filename}")),
    ],
    body,
  )
    .into_response()
}
