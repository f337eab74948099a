//! # guild-member-gateway
//!
//! Splits generic guild member update notifications into fine-grained,
//! named member events.
//!
//! An upstream chat client delivers a pair of member snapshots (before and
//! after) for every member update. The [`domain::ChangeDetector`] compares
//! them field by field and emits one [`domain::MemberEvent`] per detected
//! change, such as `boost-started`, `role-added` or `nickname-changed`.
//! When nothing specific changed, or the previous snapshot was incomplete,
//! a single `unhandled-update` is emitted instead.
//!
//! ## Architecture
//!
//! ```text
//! Upstream client (member update pairs)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── MemberUpdateService (service/)
//!     │     └── ChangeDetector (domain/)
//!     │
//!     └── EventBus (domain/) ──► WS subscribers
//! ```

pub mod api;
pub mod app;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod ws;
