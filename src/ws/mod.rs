//! WebSocket layer: connection handling, message routing, subscriptions.
//!
//! The WebSocket endpoint at `/ws` streams member events to subscribers,
//! filtered per guild, and accepts member updates as commands.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;
