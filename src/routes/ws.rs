//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to the session store. We reply with a single JSON message per
//! request, mirroring the HTTP API.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{info, error, instrument, debug};

use crate::protocol::{
  answer_out, question_out, session_out, ClientWsMessage, ServerWsMessage,
};
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "hyakunin_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "hyakunin_backend", "WebSocket connected");
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        // Parse, dispatch, serialize response.
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target = "hyakunin_backend", "WS received: {:?}", &incoming);
            handle_client_ws(incoming, &state).await
          }
          Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "hyakunin_backend", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "hyakunin_backend", "WebSocket disconnected");
}

#[instrument(level = "info", skip(state))]
async fn handle_client_ws(msg: ClientWsMessage, state: &AppState) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::StartSession { mode } => {
      let (id, session) = state.create_session(mode).await;
      tracing::info!(target: "quiz", session = %id, "WS session created");
      ServerWsMessage::Session { session: session_out(&id, &session) }
    }

    ClientWsMessage::GetSession { session_id } => match state.session_snapshot(&session_id).await {
      Ok(session) => ServerWsMessage::Session { session: session_out(&session_id, &session) },
      Err(e) => ServerWsMessage::Error { message: e.to_string() },
    },

    ClientWsMessage::SetMode { session_id, mode } => match state.set_mode(&session_id, mode).await {
      Ok(session) => {
        tracing::info!(target: "quiz", session = %session_id, ?mode, "WS mode switched");
        ServerWsMessage::Session { session: session_out(&session_id, &session) }
      }
      Err(e) => ServerWsMessage::Error { message: e.to_string() },
    },

    ClientWsMessage::NextQuestion { session_id } => match state.next_question(&session_id).await {
      Ok((q, _)) => {
        tracing::info!(target: "quiz", session = %session_id, poem = q.poem_id, "WS question served");
        ServerWsMessage::Question { question: question_out(&q) }
      }
      Err(e) => ServerWsMessage::Error { message: e.to_string() },
    },

    ClientWsMessage::SubmitAnswer { session_id, answer } => {
      match state.submit_answer(&session_id, &answer).await {
        Ok((ev, session)) => {
          tracing::info!(target: "quiz", session = %session_id, outcome = ?ev.outcome, "WS submit_answer evaluated");
          ServerWsMessage::AnswerResult { result: answer_out(&ev, &session) }
        }
        Err(e) => ServerWsMessage::Error { message: e.to_string() },
      }
    }

    ClientWsMessage::ResetScore { session_id } => match state.reset_score(&session_id).await {
      Ok(session) => ServerWsMessage::Session { session: session_out(&session_id, &session) },
      Err(e) => ServerWsMessage::Error { message: e.to_string() },
    },
  }
}
