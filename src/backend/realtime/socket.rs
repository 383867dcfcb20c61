/**
 * WebSocket Relay
 *
 * `GET /socket` upgrades to a WebSocket. Every text frame a client sends is
 * turned into a `receiveMessage` event and broadcast to all connected
 * sockets, the sender included. There are no rooms and no persistence.
 *
 * Each connection runs two halves:
 * - a spawned task forwarding broadcast events to the socket
 * - the receive loop relaying client frames into the broadcast channel
 *
 * When the client goes away the forwarding task is aborted.
 */

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;

use crate::backend::realtime::broadcast::{broadcast_event, RealtimeEventBroadcast};
use crate::shared::RealtimeEvent;

/// Upgrade handler for `GET /socket`
pub async fn handle_socket_upgrade(
    State(broadcast_tx): State<RealtimeEventBroadcast>,
    upgrade: WebSocketUpgrade,
) -> Response {
    // Subscribe before the upgrade completes so no event sent afterwards is missed
    let broadcast_rx = broadcast_tx.subscribe();
    upgrade.on_upgrade(move |socket| relay(socket, broadcast_tx, broadcast_rx))
}

async fn relay(
    socket: WebSocket,
    broadcast_tx: RealtimeEventBroadcast,
    mut broadcast_rx: tokio::sync::broadcast::Receiver<RealtimeEvent>,
) {
    tracing::info!("[Realtime] Socket connected ({} open)", broadcast_tx.receiver_count());
    let (mut sink, mut stream) = socket.split();

    let mut forward = tokio::spawn(async move {
        loop {
            let event = match broadcast_rx.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("[Realtime] Socket lagged, skipped {} events", skipped);
                    continue;
                }
                Err(RecvError::Closed) => break,
            };
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!("[Realtime] Failed to serialize event: {:?}", e);
                    continue;
                }
            };
            if sink.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    loop {
        tokio::select! {
            frame = stream.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        tracing::debug!("[Realtime] Frame received ({} bytes)", text.len());
                        broadcast_event(&broadcast_tx, RealtimeEvent::from_client_text(text.as_str()));
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::debug!("[Realtime] Socket error: {}", e);
                        break;
                    }
                }
            }
            _ = &mut forward => break,
        }
    }

    forward.abort();
    tracing::info!("[Realtime] Socket disconnected");
}
