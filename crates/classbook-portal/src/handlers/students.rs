//! `add_student` command.

use axum::response::Response;
use classbook_core::{store::StudentStore, student::NewStudent};

use super::{Submission, redirect, rejected, store_failed};
use crate::{AppState, flash::Flash, pages::View};

pub async fn add<S: StudentStore>(state: &AppState<S>, form: &Submission) -> Response {
  let input = match NewStudent::new(&form.name, &form.roll, &form.class, &form.skills) {
    Ok(input) => input,
    Err(e) => return rejected(state, View::AddStudent, e),
  };

  match state.store.add_student(input).await {
    Ok(student) => {
      tracing::info!(id = student.id, roll = %student.roll, class = %student.class, "student added");
      redirect(state, View::AddStudent, Flash::success("Student added successfully!"))
    }
    Err(e) => store_failed(state, e),
  }
}
