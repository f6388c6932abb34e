//! HTTP endpoint handlers. These are thin wrappers that forward to the
//! session store. Each handler is instrumented; errors map to a JSON body
//! with an appropriate status code.

use std::sync::Arc;
use axum::{extract::{State, Query}, http::StatusCode, Json, response::IntoResponse};
use tracing::{info, instrument};

use crate::protocol::*;
use crate::quiz::QuizError;
use crate::state::AppState;

/// Map core errors to HTTP responses. Contract violations (answering with
/// no active question, double submission) are 409s: the client drove the
/// session out of order, the user did nothing wrong.
fn error_response(e: QuizError) -> (StatusCode, Json<ErrorOut>) {
  let status = match e {
    QuizError::UnknownSession(_) => StatusCode::NOT_FOUND,
    QuizError::NoActiveQuestion | QuizError::AlreadyAnswered => StatusCode::CONFLICT,
    QuizError::UnknownPoem(_) | QuizError::EmptyDataset => StatusCode::INTERNAL_SERVER_ERROR,
  };
  (status, Json(ErrorOut { error: e.to_string() }))
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state, body), fields(mode = ?body.mode))]
pub async fn http_new_session(
  State(state): State<Arc<AppState>>,
  Json(body): Json<NewSessionIn>,
) -> impl IntoResponse {
  let (id, session) = state.create_session(body.mode).await;
  info!(target: "quiz", session = %id, "HTTP session created");
  Json(session_out(&id, &session))
}

#[instrument(level = "info", skip(state), fields(session = %q.session_id))]
pub async fn http_get_session(
  State(state): State<Arc<AppState>>,
  Query(q): Query<SessionQuery>,
) -> Result<Json<SessionOut>, (StatusCode, Json<ErrorOut>)> {
  let session = state.session_snapshot(&q.session_id).await.map_err(error_response)?;
  Ok(Json(session_out(&q.session_id, &session)))
}

#[instrument(level = "info", skip(state, body), fields(session = %body.session_id, mode = ?body.mode))]
pub async fn http_set_mode(
  State(state): State<Arc<AppState>>,
  Json(body): Json<ModeIn>,
) -> Result<Json<SessionOut>, (StatusCode, Json<ErrorOut>)> {
  let session = state.set_mode(&body.session_id, body.mode).await.map_err(error_response)?;
  Ok(Json(session_out(&body.session_id, &session)))
}

#[instrument(level = "info", skip(state), fields(session = %q.session_id))]
pub async fn http_get_question(
  State(state): State<Arc<AppState>>,
  Query(q): Query<QuestionQuery>,
) -> Result<Json<QuestionOut>, (StatusCode, Json<ErrorOut>)> {
  let (question, _) = state.next_question(&q.session_id).await.map_err(error_response)?;
  info!(target: "quiz", session = %q.session_id, poem = question.poem_id, "HTTP question served");
  Ok(Json(question_out(&question)))
}

#[instrument(level = "info", skip(state, body), fields(session = %body.session_id, answer_len = body.answer.len()))]
pub async fn http_post_answer(
  State(state): State<Arc<AppState>>,
  Json(body): Json<AnswerIn>,
) -> Result<Json<AnswerOut>, (StatusCode, Json<ErrorOut>)> {
  let (ev, session) = state
    .submit_answer(&body.session_id, &body.answer)
    .await
    .map_err(error_response)?;
  info!(target: "quiz", session = %body.session_id, outcome = ?ev.outcome, "HTTP submit_answer evaluated");
  Ok(Json(answer_out(&ev, &session)))
}

#[instrument(level = "info", skip(state, body), fields(session = %body.session_id))]
pub async fn http_post_reset(
  State(state): State<Arc<AppState>>,
  Json(body): Json<ResetIn>,
) -> Result<Json<SessionOut>, (StatusCode, Json<ErrorOut>)> {
  let session = state.reset_score(&body.session_id).await.map_err(error_response)?;
  Ok(Json(session_out(&body.session_id, &session)))
}
