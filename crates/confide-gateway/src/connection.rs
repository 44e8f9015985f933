use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use axum::body::Bytes;
use futures_util::{Sink, SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, trace, warn};

use confide_types::events::FeedEvent;

use crate::dispatcher::Dispatcher;

/// Heartbeat interval: server sends a Ping every 15 seconds.
/// If 2 consecutive Pongs are missed (~30s), the connection is dropped.
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(15);

/// Serve one live feed subscriber until it disconnects.
///
/// The feed is read-only: anything the client sends other than Pong/Close
/// is ignored.
pub async fn handle_connection(socket: WebSocket, dispatcher: Dispatcher, policy_version: String) {
    let (mut sender, mut receiver) = socket.split();

    // Subscribe before Ready so nothing published in between is lost
    let mut feed_rx = dispatcher.subscribe();

    let ready = FeedEvent::Ready { policy_version };
    if send_event(&mut sender, &ready).await.is_err() {
        return;
    }

    info!("Live feed subscriber connected ({} total)", dispatcher.subscriber_count());

    let mut heartbeat = tokio::time::interval(HEARTBEAT_INTERVAL);
    heartbeat.tick().await;
    let mut pong_received = true;
    let mut missed_heartbeats: u8 = 0;

    loop {
        tokio::select! {
            result = feed_rx.recv() => {
                let event = match result {
                    Ok(event) => event,
                    Err(RecvError::Lagged(n)) => {
                        warn!("Feed subscriber lagged by {} events", n);
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                };

                if send_event(&mut sender, &event).await.is_err() {
                    break;
                }
            }
            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(Message::Pong(_))) => pong_received = true,
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(other)) => trace!("Ignoring client frame: {:?}", other),
                    Some(Err(e)) => {
                        debug!("Feed socket error: {}", e);
                        break;
                    }
                }
            }
            _ = heartbeat.tick() => {
                if std::mem::replace(&mut pong_received, false) {
                    missed_heartbeats = 0;
                } else {
                    missed_heartbeats += 1;
                    if missed_heartbeats >= 2 {
                        warn!("Heartbeat timeout (missed {} pongs), dropping subscriber", missed_heartbeats);
                        break;
                    }
                }
                if sender.send(Message::Ping(Bytes::new())).await.is_err() {
                    break;
                }
            }
        }
    }

    drop(feed_rx);
    info!("Live feed subscriber disconnected ({} remaining)", dispatcher.subscriber_count());
}

async fn send_event<S>(sender: &mut S, event: &FeedEvent) -> Result<(), ()>
where
    S: Sink<Message> + Unpin,
{
    let text = match serde_json::to_string(event) {
        Ok(text) => text,
        Err(e) => {
            warn!("Failed to serialize feed event: {}", e);
            return Ok(());
        }
    };
    sender.send(Message::Text(text.into())).await.map_err(|_| ())
}
