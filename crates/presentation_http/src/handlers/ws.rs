//! Websocket subscription handler
//!
//! Protocol: the client sends the location id as its first text frame
//! (bare or JSON-quoted). The server answers with one JSON text frame per
//! tick until either side goes away. If the subscription cannot start, the
//! server sends a single `{error, message}` frame and closes.

use std::{fmt::Display, sync::Arc};

use application::{ApplicationError, ports::TickSink};
use async_trait::async_trait;
use axum::{
    extract::{
        State,
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade, close_code},
    },
    response::Response,
};
use domain::{AggregatedTick, LocationId};
use futures::{Sink, SinkExt, Stream, StreamExt};
use serde::Serialize;
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};

use crate::{error::ErrorResponse, state::AppState};

/// Upgrade `GET /ws` and run one subscription on the socket
pub async fn subscribe(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (sender, mut receiver) = socket.split();
    let sink = Arc::new(WebSocketSink::new(sender));

    let location_id = match read_location_id(&mut receiver).await {
        Ok(Some(id)) => id,
        Ok(None) => {
            debug!("Client left before naming a location");
            return;
        },
        Err(body) => {
            sink.reject(&body, close_code::POLICY).await;
            return;
        },
    };

    let session = match state.aggregation.start(&location_id).await {
        Ok(session) => session,
        Err(e) => {
            warn!(%location_id, error = %e, "Subscription rejected");
            let code = match &e {
                ApplicationError::Domain(_) | ApplicationError::NotFound(_) => close_code::POLICY,
                _ => close_code::ERROR,
            };
            sink.reject(&ErrorResponse::from_application_error(&e), code)
                .await;
            return;
        },
    };

    let (cancel_tx, cancel_rx) = watch::channel(false);
    let watcher = tokio::spawn(watch_connection(receiver, state.shutdown.clone(), cancel_tx));

    let tick_sink: Arc<dyn TickSink> = Arc::clone(&sink) as Arc<dyn TickSink>;
    let result = state
        .aggregation
        .run_session(session, tick_sink, cancel_rx)
        .await;
    watcher.abort();

    match result {
        Ok(summary) => {
            info!(
                session_id = %summary.session_id,
                ticks = summary.ticks_emitted,
                "Subscription ended"
            );
            sink.close(close_code::NORMAL, "").await;
        },
        // The socket is already gone
        Err(ApplicationError::DeliveryFailure(_)) => {},
        Err(e) => {
            sink.reject(&ErrorResponse::from_application_error(&e), close_code::ERROR)
                .await;
        },
    }
}

/// Wait for the first text frame and parse it as a location id
///
/// `Ok(None)` means the client closed before sending one.
async fn read_location_id<S, E>(receiver: &mut S) -> Result<Option<LocationId>, ErrorResponse>
where
    S: Stream<Item = Result<Message, E>> + Unpin,
    E: Display,
{
    while let Some(frame) = receiver.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                return LocationId::parse(text.as_str()).map(Some).map_err(|e| {
                    ErrorResponse::new("invalid_request", format!("invalid location id: {e}"))
                });
            },
            Ok(Message::Binary(_)) => {
                return Err(ErrorResponse::new(
                    "invalid_request",
                    "expected the location id as a text frame",
                ));
            },
            Ok(Message::Ping(_) | Message::Pong(_)) => {},
            Ok(Message::Close(_)) => return Ok(None),
            Err(e) => {
                debug!(error = %e, "Websocket read failed");
                return Ok(None);
            },
        }
    }
    Ok(None)
}

/// Flip `cancel` once the client disconnects or the server shuts down
///
/// Frames after the first are ignored. A dropped shutdown sender counts
/// as shutdown.
async fn watch_connection<S, E>(
    mut receiver: S,
    mut shutdown: watch::Receiver<bool>,
    cancel: watch::Sender<bool>,
) where
    S: Stream<Item = Result<Message, E>> + Unpin,
    E: Display,
{
    if !*shutdown.borrow_and_update() {
        loop {
            tokio::select! {
                frame = receiver.next() => match frame {
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("Client disconnected");
                        break;
                    },
                    Some(Err(e)) => {
                        debug!(error = %e, "Websocket read failed");
                        break;
                    },
                    Some(Ok(_)) => {},
                },
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        debug!("Server shutting down");
                        break;
                    }
                },
            }
        }
    }
    // The loop may already be gone
    let _ = cancel.send(true);
}

/// Tick sink writing JSON text frames to a websocket
pub struct WebSocketSink<S> {
    sender: Mutex<S>,
}

impl<S> std::fmt::Debug for WebSocketSink<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebSocketSink").finish_non_exhaustive()
    }
}

impl<S> WebSocketSink<S>
where
    S: Sink<Message> + Unpin + Send,
    S::Error: Display,
{
    pub fn new(sender: S) -> Self {
        Self {
            sender: Mutex::new(sender),
        }
    }

    async fn send_json<T: Serialize + Sync>(&self, value: &T) -> Result<(), ApplicationError> {
        let json = serde_json::to_string(value)
            .map_err(|e| ApplicationError::Internal(format!("Failed to encode frame: {e}")))?;
        self.sender
            .lock()
            .await
            .send(Message::Text(json.into()))
            .await
            .map_err(|e| ApplicationError::DeliveryFailure(e.to_string()))
    }

    /// Send a close frame, ignoring a socket that is already closed
    pub async fn close(&self, code: u16, reason: &str) {
        let frame = CloseFrame {
            code,
            reason: reason.to_string().into(),
        };
        if let Err(e) = self.sender.lock().await.send(Message::Close(Some(frame))).await {
            debug!(error = %e, "Close frame not delivered");
        }
    }

    /// Send an error frame and close
    pub async fn reject(&self, body: &ErrorResponse, code: u16) {
        if let Err(e) = self.send_json(body).await {
            debug!(error = %e, "Error frame not delivered");
        }
        self.close(code, &body.error).await;
    }
}

#[async_trait]
impl<S> TickSink for WebSocketSink<S>
where
    S: Sink<Message> + Unpin + Send + 'static,
    S::Error: Display,
{
    async fn emit(&self, tick: &AggregatedTick) -> Result<(), ApplicationError> {
        self.send_json(tick).await
    }
}
