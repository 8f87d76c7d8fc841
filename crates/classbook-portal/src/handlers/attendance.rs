//! `add_attendance` command: one record per student per day, last write wins.

use axum::response::Response;
use classbook_core::{attendance::NewAttendance, store::StudentStore};

use super::{Submission, redirect, rejected, store_failed};
use crate::{AppState, flash::Flash, pages::View};

pub async fn add<S: StudentStore>(state: &AppState<S>, form: &Submission) -> Response {
  let input = match NewAttendance::new(&form.student_id, &form.date, &form.status) {
    Ok(input) => input,
    Err(e) => return rejected(state, View::Attendance, e),
  };

  match state.store.record_attendance(input).await {
    Ok((record, outcome)) => {
      tracing::info!(
        student_id = record.student_id,
        date = %record.date,
        status = %record.status,
        %outcome,
        "attendance saved"
      );
      redirect(state, View::Attendance, Flash::success("Attendance saved."))
    }
    Err(e) => store_failed(state, e),
  }
}
