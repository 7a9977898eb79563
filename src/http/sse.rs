//! SSE heartbeat stream
//!
//! A streaming connection emits one `connected` event, then periodic
//! `heartbeat` events until the peer disconnects. Axum drops the
//! stream (and with it the interval) when the connection closes, so
//! no explicit cancellation is needed beyond that.

use axum::{
    extract::{Path, State},
    response::sse::{Event, Sse},
};
use futures::stream::{self, Stream, StreamExt};
use serde_json::json;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::IntervalStream;
use tracing::info;

use crate::http::AppState;

/// Heartbeat stream handler
///
/// Referencing the session here creates it implicitly, same as the
/// JSON-RPC endpoint.
pub async fn heartbeat_handler(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    state.services.sessions.get_or_create(&session_id);
    info!(session_id = %session_id, "Heartbeat stream opened");

    let period = Duration::from_secs(state.services.config.server.heartbeat_interval_sec);

    let connected = stream::once(async move {
        Ok(Event::default()
            .event("connected")
            .data(json!({ "session_id": session_id }).to_string()))
    });

    // First heartbeat one full period after `connected`
    let ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
    let heartbeats = IntervalStream::new(ticker).map(|_| {
        Ok(Event::default()
            .event("heartbeat")
            .data(json!({ "status": "alive" }).to_string()))
    });

    Sse::new(connected.chain(heartbeats))
}
