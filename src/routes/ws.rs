//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to core logic. We reply with a single JSON message per request.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{info, error, instrument, debug};

use crate::error::ApiError;
use crate::logic;
use crate::protocol::{ClientWsMessage, PuzzleView, ServerWsMessage};
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "newslesle_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "newslesle_backend", "WebSocket connected");
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        // Parse, dispatch, serialize response.
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target: "newslesle_backend", "WS received: {:?}", &incoming);
            handle_client_ws(incoming, &state).await
          }
          Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "newslesle_backend", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "newslesle_backend", "WebSocket disconnected");
}

fn puzzle_reply(res: Result<PuzzleView, ApiError>) -> ServerWsMessage {
  match res {
    Ok(puzzle) => ServerWsMessage::Puzzle { puzzle },
    Err(e) => error_reply(e),
  }
}

fn error_reply(e: ApiError) -> ServerWsMessage {
  match e {
    ApiError::LimitReached => ServerWsMessage::LimitReached {
      message: "All done! Come back tomorrow for more headlines to solve!".into(),
    },
    ApiError::NoHeadline => ServerWsMessage::NoHeadline,
    other => ServerWsMessage::Error { message: other.to_string() },
  }
}

#[instrument(level = "info", skip(state))]
async fn handle_client_ws(msg: ClientWsMessage, state: &AppState) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::Status { date } => ServerWsMessage::Status { status: logic::status(state, date).await },

    ClientWsMessage::NewPuzzle { date } => {
      let res = logic::new_puzzle(state, date).await;
      if let Ok(v) = &res {
        info!(target: "puzzle", id = %v.id, "WS new_puzzle served");
      }
      puzzle_reply(res)
    }

    ClientWsMessage::Guess { puzzle_id, letter } => {
      puzzle_reply(logic::apply_guess(state, puzzle_id, &letter).await)
    }

    ClientWsMessage::Discard { puzzle_id } => match logic::discard_puzzle(state, puzzle_id).await {
      Ok(()) => ServerWsMessage::Discarded { puzzle_id },
      Err(e) => error_reply(e),
    },
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::GameConfig;

  #[tokio::test]
  async fn ws_messages_drive_a_puzzle() {
    let mut st = AppState::with_parts(GameConfig::default(), None);
    st.bank.truncate(1);
    let answer = st.bank[0].headline.clone();

    let msg: ClientWsMessage = serde_json::from_str(r#"{"type":"new_puzzle","date":"2024-06-01"}"#).expect("msg");
    let id = match handle_client_ws(msg, &st).await {
      ServerWsMessage::Puzzle { puzzle } => puzzle.id,
      other => panic!("unexpected reply: {other:?}"),
    };

    let mut last = None;
    for c in answer.chars().filter(|c| c.is_ascii_uppercase()) {
      let msg = ClientWsMessage::Guess { puzzle_id: id, letter: c.to_string() };
      last = Some(handle_client_ws(msg, &st).await);
    }
    match last {
      Some(ServerWsMessage::Puzzle { puzzle }) => {
        assert!(puzzle.result.expect("result").won);
      }
      other => panic!("unexpected reply: {other:?}"),
    }

    let reply = handle_client_ws(ClientWsMessage::NewPuzzle { date: None }, &st).await;
    assert!(matches!(reply, ServerWsMessage::NoHeadline));

    let reply = handle_client_ws(ClientWsMessage::Discard { puzzle_id: id }, &st).await;
    assert!(matches!(reply, ServerWsMessage::Discarded { .. }));
  }

  #[tokio::test]
  async fn bad_guess_target_is_an_error_reply() {
    let st = AppState::with_parts(GameConfig::default(), None);
    let msg = ClientWsMessage::Guess { puzzle_id: uuid::Uuid::new_v4(), letter: "A".into() };
    assert!(matches!(handle_client_ws(msg, &st).await, ServerWsMessage::Error { .. }));
  }
}
