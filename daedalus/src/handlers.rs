use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use mazelib::{Direction, Reply, SessionMove, SessionStats};

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct AwakeParams {
    width: Option<usize>,
    height: Option<usize>,
    braid: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct SessionParam {
    session: Option<Uuid>,
}

/// Starts a new session and wakes the agent up at the start of a fresh
/// maze. The session id travels back in the `x-session-id` header; clients
/// that never read it keep talking to their most recent session.
pub async fn awake(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AwakeParams>,
) -> (StatusCode, HeaderMap, Json<Reply>) {
    let width = params.width.unwrap_or(state.config.width);
    let height = params.height.unwrap_or(state.config.height);
    let braid = params.braid.unwrap_or(state.config.braid);

    let mut registry = state.registry.lock().await;
    let mut rng = rand::thread_rng();
    match registry.start_session(width, height, braid, &mut rng) {
        Ok((id, survey)) => {
            if state.config.debug {
                if let Some(maze) = registry.maze(Some(id)) {
                    debug!("maze for session {id}:\n{maze}");
                }
            }
            let mut headers = HeaderMap::new();
            if let Ok(value) = HeaderValue::from_str(&id.to_string()) {
                headers.insert("x-session-id", value);
            }
            (StatusCode::OK, headers, Json(Reply::with_survey(survey)))
        }
        Err(err) => {
            warn!(error = %err, width, height, "failed to start session");
            (
                StatusCode::CONFLICT,
                HeaderMap::new(),
                Json(Reply::failure(err.to_string())),
            )
        }
    }
}

/// Moves the agent one room over. Walls and boundaries answer 409 with an
/// error reply; reaching the treasure answers with the victory message.
pub async fn move_direction(
    State(state): State<Arc<AppState>>,
    Path(direction): Path<String>,
    Query(params): Query<SessionParam>,
) -> (StatusCode, Json<Reply>) {
    let dir: Direction = match direction.parse() {
        Ok(dir) => dir,
        Err(err) => {
            return (StatusCode::BAD_REQUEST, Json(Reply::failure(err.to_string())));
        }
    };

    let mut registry = state.registry.lock().await;
    match registry.move_agent(params.session, dir) {
        Ok(SessionMove::Victory { steps }) => (
            StatusCode::OK,
            Json(Reply::victorious(format!(
                "Victory achieved in {} steps",
                steps
            ))),
        ),
        Ok(SessionMove::Moved(survey)) => {
            if state.config.debug {
                if let Some(maze) = registry.maze(params.session) {
                    debug!("after {dir}:\n{maze}");
                }
            }
            (StatusCode::OK, Json(Reply::with_survey(survey)))
        }
        Err(err) => (StatusCode::CONFLICT, Json(Reply::failure(err.to_string()))),
    }
}

/// Survey of an arbitrary room, bounds checked.
pub async fn discover(
    State(state): State<Arc<AppState>>,
    Path((x, y)): Path<(i64, i64)>,
    Query(params): Query<SessionParam>,
) -> (StatusCode, Json<Reply>) {
    let registry = state.registry.lock().await;
    match registry.discover(params.session, x, y) {
        Ok(survey) => (StatusCode::OK, Json(Reply::with_survey(survey))),
        Err(err) => (StatusCode::CONFLICT, Json(Reply::failure(err.to_string()))),
    }
}

/// Reports how the process has done so far. Unlike the historical server
/// this does not kill the process; Ctrl+C prints the same line.
pub async fn done(State(state): State<Arc<AppState>>) -> Json<SessionStats> {
    let stats = state.registry.lock().await.stats();
    info!(
        "Labyrinth solved {} times with an avg of {} steps",
        stats.sessions_solved, stats.average_steps
    );
    Json(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Args;
    use mazelib::SessionRegistry;
    use tokio::sync::Mutex;

    fn state(width: usize, height: usize) -> Arc<AppState> {
        Arc::new(AppState {
            registry: Mutex::new(SessionRegistry::new()),
            config: Args {
                port: 0,
                width,
                height,
                braid: 0.0,
                debug: false,
            },
        })
    }

    #[tokio::test]
    async fn awake_hands_out_a_session_id() {
        let (status, headers, Json(reply)) = awake(
            State(state(4, 4)),
            Query(AwakeParams {
                width: None,
                height: None,
                braid: None,
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(!reply.error);
        let id = headers.get("x-session-id").unwrap().to_str().unwrap();
        assert!(id.parse::<Uuid>().is_ok());
    }

    #[tokio::test]
    async fn oversized_awake_is_rejected() {
        let (status, _headers, Json(reply)) = awake(
            State(state(4, 4)),
            Query(AwakeParams {
                width: Some(usize::MAX),
                height: Some(2),
                braid: None,
            }),
        )
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert!(reply.error);
        assert!(reply.message.contains("exceeds"), "got: {}", reply.message);
    }

    #[tokio::test]
    async fn done_reports_stats_for_a_fresh_process() {
        let Json(stats) = done(State(state(4, 4))).await;
        assert_eq!(stats.sessions_solved, 0);
        assert_eq!(stats.average_steps, 0);
    }
}
