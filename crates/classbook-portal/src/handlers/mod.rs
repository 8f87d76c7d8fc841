pub mod attendance;
pub mod export;
pub mod marks;
pub mod students;
pub mod view;

use axum::{
  Form,
  extract::{State, rejection::FormRejection},
  response::{IntoResponse, Redirect, Response},
};
use classbook_core::{ValidationError, store::StudentStore};
use serde::Deserialize;

use crate::{AppState, error::Error, flash::Flash, pages::View};

/// The `action` field of a POSTed form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
  AddStudent,
  AddAttendance,
  AddMarks,
  ExportCsv,
}

/// Every field any form posts. Missing fields arrive as empty strings and
/// are rejected by the `New*` constructors in `classbook-core`.
#[derive(Debug, Deserialize)]
pub struct Submission {
  pub action:     Action,
  #[serde(default)]
  pub name:       String,
  #[serde(default)]
  pub roll:       String,
  #[serde(default)]
  pub class:      String,
  #[serde(default)]
  pub skills:     String,
  #[serde(default)]
  pub student_id: String,
  #[serde(default)]
  pub date:       String,
  #[serde(default)]
  pub status:     String,
  #[serde(default)]
  pub subject:    String,
  #[serde(default)]
  pub term:       String,
  #[serde(default)]
  pub marks:      String,
}

/// `POST /`: dispatch on the form's `action`.
pub async fn submit<S>(
  State(state): State<AppState<S>>,
  form: Result<Form<Submission>, FormRejection>,
) -> Response
where
  S: StudentStore + Clone + 'static,
{
  let Form(form) = match form {
    Ok(form) => form,
    Err(rejection) => return Error::BadRequest(rejection.body_text()).into_response(),
  };

  match form.action {
    Action::AddStudent => students::add(&state, &form).await,
    Action::AddAttendance => attendance::add(&state, &form).await,
    Action::AddMarks => marks::add(&state, &form).await,
    Action::ExportCsv => export::handler(&state).await,
  }
}

// ─── Redirect helpers ────────────────────────────────────────────────────────

/// 303 to `view`, carrying `flash` as a signed token.
pub(crate) fn redirect<S: StudentStore>(state: &AppState<S>, view: View, flash: Flash) -> Response {
  let target = match state.flash.sign(&flash) {
    Ok(token) => format!("{}&flash={token}", view.href()),
    Err(e) => {
      tracing::warn!(error = %e, "could not sign flash message");
      view.href()
    }
  };
  Redirect::to(&target).into_response()
}

/// Input failed validation: nothing was written.
pub(crate) fn rejected<S: StudentStore>(
  state: &AppState<S>,
  view: View,
  err: ValidationError,
) -> Response {
  tracing::debug!(error = %err, %view, "submission rejected");
  redirect(state, view, Flash::error(err.to_string()))
}

/// The store refused or failed the write.
pub(crate) fn store_failed<S: StudentStore>(state: &AppState<S>, err: S::Error) -> Response {
  tracing::error!(error = %err, "store write failed");
  redirect(state, View::Dashboard, Flash::error(format!("Database error: {err}")))
}
