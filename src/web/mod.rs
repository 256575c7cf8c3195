use std::{
    convert::Infallible,
    net::SocketAddr,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use anyhow::{Context, Result};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tokio::{net::TcpListener, sync::broadcast};
use tokio_stream::{wrappers::BroadcastStream, Stream, StreamExt};
use tracing::{info, warn};

use crate::{
    components::{TileCategory, TileId},
    engine::PassSummary,
    presentation::GridFrame,
    scenario::Scenario,
    session::{Session, SessionError},
    snapshot::SaveState,
    world::GridError,
};

#[derive(Clone, Serialize)]
pub struct StateEnvelope {
    pub scenario: String,
    pub has_save: bool,
    pub summary: Option<PassSummary>,
    pub frame: GridFrame,
}

#[derive(Clone, Serialize)]
pub struct TileResponse {
    pub id: TileId,
    pub category: TileCategory,
    pub score: u32,
    pub global_score: u64,
}

struct AppState {
    session: Mutex<Session>,
    broadcaster: broadcast::Sender<String>,
}

impl AppState {
    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, session: &Session) {
        match serde_json::to_string(&session.frame()) {
            // No subscribers is not an error.
            Ok(payload) => {
                let _ = self.broadcaster.send(payload);
            }
            Err(err) => warn!(%err, "frame not published"),
        }
    }
}

pub struct WebServerConfig {
    pub scenario: Scenario,
    pub host: String,
    pub port: u16,
}

pub fn router(session: Session) -> Router {
    let (tx, _) = broadcast::channel::<String>(128);
    let state = Arc::new(AppState {
        session: Mutex::new(session),
        broadcaster: tx,
    });

    Router::new()
        .route("/api/state", get(latest_state))
        .route("/api/tiles/:id/advance", post(advance_tile))
        .route("/api/tiles/:id/reset", post(reset_tile))
        .route("/api/tiles/:id/bump", post(bump_tile))
        .route("/api/rescore", post(rescore))
        .route("/api/save", post(save))
        .route("/api/load", post(load))
        .route("/api/events", get(stream_events))
        .with_state(state)
}

pub async fn run(config: WebServerConfig) -> Result<()> {
    let WebServerConfig {
        scenario,
        host,
        port,
    } = config;

    let session = Session::from_scenario(&scenario)
        .with_context(|| format!("Failed to start scenario '{}'", scenario.name))?;
    let router = router(session);

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("Invalid listen address {host}:{port}"))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(scenario = %scenario.name, %addr, "serving town");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutting down");
}

pub struct ApiError(SessionError);

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            SessionError::Grid(GridError::InvalidIndex { .. }) => StatusCode::NOT_FOUND,
            SessionError::Grid(GridError::LoadSizeMismatch { .. }) => StatusCode::CONFLICT,
            SessionError::Grid(GridError::MissingComponent { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            SessionError::NothingSaved => StatusCode::NOT_FOUND,
            SessionError::Pass(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            warn!(err = %self.0, "request failed");
        }
        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, Json(body)).into_response()
    }
}

fn tile_response(session: &Session, id: TileId) -> Result<TileResponse, ApiError> {
    let tile = session.grid().tile(id).map_err(SessionError::from)?;
    Ok(TileResponse {
        id,
        category: tile.category,
        score: tile.score,
        global_score: session.grid().global_score(),
    })
}

async fn latest_state(State(state): State<Arc<AppState>>) -> Json<StateEnvelope> {
    let session = state.session();
    Json(StateEnvelope {
        scenario: session.scenario_name().to_string(),
        has_save: session.saved().is_some(),
        summary: session.last_summary().cloned(),
        frame: session.frame(),
    })
}

async fn advance_tile(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TileId>,
) -> Result<Json<TileResponse>, ApiError> {
    let mut session = state.session();
    session.advance_tile(id)?;
    state.publish(&session);
    Ok(Json(tile_response(&session, id)?))
}

async fn reset_tile(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TileId>,
) -> Result<Json<TileResponse>, ApiError> {
    let mut session = state.session();
    session.reset_tile(id)?;
    state.publish(&session);
    Ok(Json(tile_response(&session, id)?))
}

async fn bump_tile(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TileId>,
) -> Result<Json<TileResponse>, ApiError> {
    let mut session = state.session();
    session.bump_score(id)?;
    state.publish(&session);
    Ok(Json(tile_response(&session, id)?))
}

async fn rescore(State(state): State<Arc<AppState>>) -> Result<Json<PassSummary>, ApiError> {
    let mut session = state.session();
    let summary = session.rescore()?.clone();
    state.publish(&session);
    Ok(Json(summary))
}

async fn save(State(state): State<Arc<AppState>>) -> Json<SaveState> {
    let mut session = state.session();
    Json(session.save().clone())
}

async fn load(State(state): State<Arc<AppState>>) -> Result<Json<GridFrame>, ApiError> {
    let mut session = state.session();
    session.load()?;
    state.publish(&session);
    Ok(Json(session.frame()))
}

async fn stream_events(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.broadcaster.subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|msg| match msg {
        Ok(payload) => Some(Ok(Event::default().event("frame").data(payload))),
        Err(_) => None,
    });
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(2))
            .text("keep-alive"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        let cases = [
            (
                SessionError::Grid(GridError::InvalidIndex {
                    id: 9,
                    tile_count: 4,
                }),
                StatusCode::NOT_FOUND,
            ),
            (
                SessionError::Grid(GridError::LoadSizeMismatch {
                    expected: 4,
                    found: 2,
                }),
                StatusCode::CONFLICT,
            ),
            (SessionError::NothingSaved, StatusCode::NOT_FOUND),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }
}
