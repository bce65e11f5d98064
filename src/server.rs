// HTTP control transport and static UI
//
// Thin outer layer: decodes an operator command payload and forwards it
// into the driver mailbox. Malformed or partial payloads decode to the
// empty command (a no-op) rather than an error; nothing here blocks on
// the driver.

use std::path::PathBuf;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::debug;

use crate::command::{Command, CommandSender};
use crate::effect::Effect;

/// Build the control router: `POST /update` for commands, `GET /effects`
/// for the catalog, everything else served from the static UI directory.
pub fn router(commands: CommandSender, static_dir: PathBuf) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods(Any);

    Router::new()
        .route("/update", post(update))
        .route("/effects", get(effects))
        .fallback_service(ServeDir::new(static_dir))
        .layer(cors)
        .with_state(commands)
}

async fn update(State(commands): State<CommandSender>, body: Bytes) -> StatusCode {
    let command: Command = serde_json::from_slice(&body).unwrap_or_default();
    debug!(?command, "control update");
    // Overwrite-on-full: if the driver hasn't polled the previous command
    // yet, the newest one wins.
    commands.send_replace(Some(command));
    StatusCode::NO_CONTENT
}

async fn effects() -> Json<Vec<&'static str>> {
    Json(Effect::ALL.iter().map(|e| e.name()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command;

    #[tokio::test]
    async fn test_update_forwards_into_mailbox() {
        let (tx, mut rx) = command::mailbox();
        let status = update(State(tx), Bytes::from_static(br#"{"effect": 6}"#)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(command::poll(&mut rx).unwrap().effect, Some(6));
    }

    #[tokio::test]
    async fn test_garbage_payload_becomes_a_noop() {
        let (tx, mut rx) = command::mailbox();
        let status = update(State(tx), Bytes::from_static(b"not json at all")).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(command::poll(&mut rx), Some(Command::default()));
    }

    #[tokio::test]
    async fn test_effects_lists_whole_catalog() {
        let Json(names) = effects().await;
        assert_eq!(names.len(), Effect::COUNT);
        assert!(names.contains(&"sparkle"));
    }
}
