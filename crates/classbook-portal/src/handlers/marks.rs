//! `add_marks` command. Every submission appends a new record.

use axum::response::Response;
use classbook_core::{marks::NewMark, store::StudentStore};

use super::{Submission, redirect, rejected, store_failed};
use crate::{AppState, flash::Flash, pages::View};

pub async fn add<S: StudentStore>(state: &AppState<S>, form: &Submission) -> Response {
  let input = match NewMark::new(&form.student_id, &form.subject, &form.term, &form.marks) {
    Ok(input) => input,
    Err(e) => return rejected(state, View::Marks, e),
  };

  match state.store.record_marks(input).await {
    Ok(mark) => {
      tracing::info!(
        id = mark.id,
        student_id = mark.student_id,
        subject = %mark.subject,
        term = %mark.term,
        marks = %mark.marks,
        "marks saved"
      );
      redirect(state, View::Marks, Flash::success("Marks saved."))
    }
    Err(e) => store_failed(state, e),
  }
}
