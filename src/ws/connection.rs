//! WebSocket connection loop.
//!
//! Handles the read/write loop for a single WebSocket connection,
//! dispatching incoming commands and forwarding filtered member events.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use super::messages::{WsCommand, WsMessage, WsMessageType, parse_guild_ids};
use super::subscription::SubscriptionManager;
use crate::domain::MemberEvent;
use crate::service::MemberUpdateService;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Reads commands from the client and dispatches them.
/// - Forwards matching events from the [`broadcast::Receiver`] to the client.
pub async fn run_connection(
    socket: WebSocket,
    mut event_rx: broadcast::Receiver<MemberEvent>,
    member_service: Arc<MemberUpdateService>,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut subs = SubscriptionManager::new();

    loop {
        tokio::select! {
            // Incoming message from client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let reply = handle_text_message(&text, &mut subs, &member_service);
                        if let Some(json) = to_json(&reply)
                            && ws_tx.send(Message::text(json)).await.is_err() {
                                break;
                            }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(err)) => {
                        tracing::debug!(error = %err, "ws read failed");
                        break;
                    }
                    _ => {}
                }
            }
            // Event from EventBus
            event = event_rx.recv() => {
                match event {
                    Ok(member_event) => {
                        if !subs.matches(&member_event) {
                            continue;
                        }
                        let payload = match serde_json::to_value(&member_event) {
                            Ok(payload) => payload,
                            Err(err) => {
                                tracing::warn!(error = %err, event = member_event.name(), "failed to encode member event");
                                continue;
                            }
                        };
                        let msg = WsMessage::new(
                            uuid::Uuid::new_v4().to_string(),
                            WsMessageType::Event,
                            payload,
                        );
                        if let Some(json) = to_json(&msg)
                            && ws_tx.send(Message::text(json)).await.is_err() {
                                break;
                            }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "ws client lagged behind event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::debug!("ws connection closed");
}

fn to_json(msg: &WsMessage) -> Option<String> {
    serde_json::to_string(msg)
        .inspect_err(|err| tracing::warn!(error = %err, "failed to encode ws message"))
        .ok()
}

/// Handles a text message from the client, returning the reply.
fn handle_text_message(
    text: &str,
    subs: &mut SubscriptionManager,
    member_service: &MemberUpdateService,
) -> WsMessage {
    let Ok(msg) = serde_json::from_str::<WsMessage>(text) else {
        return WsMessage::error(String::new(), 400, "malformed JSON");
    };

    let command = match serde_json::from_value::<WsCommand>(msg.payload) {
        Ok(command) => command,
        Err(err) => {
            tracing::debug!(error = %err, "rejected ws command");
            return WsMessage::error(msg.id, 404, "unknown command");
        }
    };

    match command {
        WsCommand::Subscribe { guild_ids, events } => {
            let (ids, wildcard, invalid) = parse_guild_ids(&guild_ids);
            subs.subscribe(&ids, wildcard);
            let unknown_events = subs.filter_events(&events);
            WsMessage::new(
                msg.id,
                WsMessageType::Response,
                serde_json::json!({
                    "subscribed": ids.iter().map(ToString::to_string).collect::<Vec<_>>(),
                    "count": subs.count(),
                    "wildcard": subs.is_subscribed_all(),
                    "invalid_guild_ids": invalid,
                    "unknown_events": unknown_events,
                }),
            )
        }
        WsCommand::Unsubscribe { guild_ids } => {
            let (ids, wildcard, invalid) = parse_guild_ids(&guild_ids);
            subs.unsubscribe(&ids, wildcard);
            WsMessage::new(
                msg.id,
                WsMessageType::Response,
                serde_json::json!({
                    "unsubscribed": ids.iter().map(ToString::to_string).collect::<Vec<_>>(),
                    "remaining_count": subs.count(),
                    "wildcard": subs.is_subscribed_all(),
                    "invalid_guild_ids": invalid,
                }),
            )
        }
        WsCommand::MemberUpdate { old, new } => match member_service.handle_update(&old, &new) {
            Ok(report) => match serde_json::to_value(&report) {
                Ok(payload) => WsMessage::new(msg.id, WsMessageType::Response, payload),
                Err(err) => WsMessage::error(msg.id, 3000, &err.to_string()),
            },
            Err(err) => WsMessage::error(msg.id, err.error_code(), &err.to_string()),
        },
    }
}
