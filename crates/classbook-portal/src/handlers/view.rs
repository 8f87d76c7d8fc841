//! `GET /`: render the view named by `?action=`.

use axum::{
  extract::{Query, State},
  response::Html,
};
use chrono::Local;
use classbook_core::store::{StudentQuery, StudentStore};
use serde::Deserialize;

use crate::{
  AppState,
  error::Error,
  flash::Flash,
  pages::{self, Content, Page, View},
};

#[derive(Debug, Default, Deserialize)]
pub struct ViewParams {
  pub action: Option<String>,
  pub q:      Option<String>,
  pub class:  Option<String>,
  pub flash:  Option<String>,
}

pub async fn handler<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<ViewParams>,
) -> Result<Html<String>, Error>
where
  S: StudentStore + Clone + 'static,
{
  let view = params
    .action
    .as_deref()
    .and_then(|action| action.parse::<View>().ok())
    .unwrap_or_default();
  let flash = params.flash.as_deref().and_then(|token| verify_flash(&state, token));
  let today = Local::now().date_naive();

  let body = match view {
    View::Dashboard => {
      let q = params.q.as_deref().unwrap_or_default().trim();
      let class = params.class.as_deref().unwrap_or_default().trim();
      let query = StudentQuery::all().search(q).class(class);

      let rows = state.store.report(&query).await.map_err(Error::store)?;
      let classes = state.store.class_options().await.map_err(Error::store)?;
      pages::render(&Page {
        flash: flash.as_ref(),
        today,
        content: Content::Dashboard { rows: &rows, classes: &classes, q, class },
      })
    }
    View::AddStudent => pages::render(&Page {
      flash: flash.as_ref(),
      today,
      content: Content::AddStudent,
    }),
    View::Attendance | View::Marks => {
      let students = state.store.student_options().await.map_err(Error::store)?;
      let content = if view == View::Attendance {
        Content::Attendance { students: &students }
      } else {
        Content::Marks { students: &students }
      };
      pages::render(&Page { flash: flash.as_ref(), today, content })
    }
  };

  Ok(Html(body))
}

fn verify_flash<S: StudentStore>(state: &AppState<S>, token: &str) -> Option<Flash> {
  match state.flash.verify(token) {
    Ok(flash) => Some(flash),
    Err(e) => {
      tracing::debug!(error = %e, "ignoring flash token");
      None
    }
  }
}
