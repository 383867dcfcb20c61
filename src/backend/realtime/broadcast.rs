/**
 * Real-time Event Broadcasting
 *
 * Events are fanned out with `tokio::sync::broadcast`: every connected
 * socket holds a receiver and gets its own copy of each event. Sending is
 * fire-and-forget; with no sockets connected the event is simply dropped.
 */

use tokio::sync::broadcast;

use crate::shared::RealtimeEvent;

/// Events buffered per receiver before a slow socket starts lagging
pub const CHANNEL_CAPACITY: usize = 1000;

/// Sender half shared through `AppState`
pub type RealtimeEventBroadcast = broadcast::Sender<RealtimeEvent>;

/// Broadcast a real-time event to all subscribers
///
/// Returns the number of receivers the event reached (0 if nobody listens).
pub fn broadcast_event(broadcast_tx: &RealtimeEventBroadcast, event: RealtimeEvent) -> usize {
    match broadcast_tx.send(event) {
        Ok(subscriber_count) => {
            tracing::debug!("[Realtime] Event broadcast to {} subscribers", subscriber_count);
            subscriber_count
        }
        Err(_) => {
            tracing::debug!("[Realtime] No subscribers to receive event");
            0
        }
    }
}
