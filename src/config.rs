//! Gateway configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).
//!
//! | Variable                  | Default                      |
//! |---------------------------|------------------------------|
//! | `LISTEN_ADDR`             | `0.0.0.0:3000`               |
//! | `EVENT_BUS_CAPACITY`      | `10000`                      |
//! | `AVATAR_CDN_BASE_URL`     | `https://cdn.discordapp.com` |
//! | `AVATAR_STATIC_EXTENSION` | `webp`                       |
//! | `AVATAR_SIZE`             | unset (no `size` query)      |
//! | `LOG_FORMAT`              | `text` (`json` also allowed) |

use std::net::SocketAddr;

use crate::domain::avatar::{AvatarCdn, DEFAULT_CDN_BASE_URL, StaticExtension};

/// Top-level gateway configuration.
///
/// Loaded once at startup via [`GatewayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// Capacity of the EventBus broadcast channel.
    pub event_bus_capacity: usize,

    /// Resolver used for member avatar URLs.
    pub avatar_cdn: AvatarCdn,

    /// Emit logs as JSON lines instead of human-readable text.
    pub log_json: bool,
}

impl GatewayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`], or if the avatar settings are invalid.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()?;

        let event_bus_capacity = parse_env("EVENT_BUS_CAPACITY", 10_000);

        let cdn_base_url = std::env::var("AVATAR_CDN_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_CDN_BASE_URL.to_string());
        let extension = match std::env::var("AVATAR_STATIC_EXTENSION") {
            Ok(raw) => raw.parse::<StaticExtension>()?,
            Err(_) => StaticExtension::default(),
        };
        let size = match std::env::var("AVATAR_SIZE") {
            Ok(raw) => Some(raw.parse::<u16>()?),
            Err(_) => None,
        };
        let avatar_cdn = AvatarCdn::new(&cdn_base_url, extension, size)?;

        let log_json = std::env::var("LOG_FORMAT")
            .is_ok_and(|v| v.eq_ignore_ascii_case("json"));

        Ok(Self {
            listen_addr,
            event_bus_capacity,
            avatar_cdn,
            log_json,
        })
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
