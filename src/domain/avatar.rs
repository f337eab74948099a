//! Guild avatar URL resolution.
//!
//! Members may carry a guild-specific avatar, identified by a hash. The hash
//! is turned into a CDN URL of the form
//! `{base}/guilds/{guild}/users/{user}/avatars/{hash}.{ext}[?size=N]`.
//! Animated avatars (hash prefix `a_`) always resolve to `.gif`.

use std::fmt::{self, Write as _};
use std::str::FromStr;

use super::{GuildId, UserId};
use crate::error::GatewayError;

/// Default CDN origin used by the chat platform.
pub const DEFAULT_CDN_BASE_URL: &str = "https://cdn.discordapp.com";

/// Hash prefix marking an animated avatar.
const ANIMATED_PREFIX: &str = "a_";

/// Image format used for non-animated avatars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StaticExtension {
    /// `.webp`
    #[default]
    Webp,
    /// `.png`
    Png,
    /// `.jpg`
    Jpg,
    /// `.jpeg`
    Jpeg,
}

impl StaticExtension {
    /// Returns the file extension without the leading dot.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Webp => "webp",
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Jpeg => "jpeg",
        }
    }
}

impl fmt::Display for StaticExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StaticExtension {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "webp" => Ok(Self::Webp),
            "png" => Ok(Self::Png),
            "jpg" => Ok(Self::Jpg),
            "jpeg" => Ok(Self::Jpeg),
            other => Err(GatewayError::InvalidRequest(format!(
                "unsupported avatar extension: {other}"
            ))),
        }
    }
}

/// Resolves guild avatar hashes to CDN URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarCdn {
    base_url: String,
    extension: StaticExtension,
    size: Option<u16>,
}

impl Default for AvatarCdn {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CDN_BASE_URL.to_string(),
            extension: StaticExtension::default(),
            size: None,
        }
    }
}

impl AvatarCdn {
    /// Creates a resolver for the given CDN origin. A trailing `/` is
    /// stripped.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] if `size` is set but is not
    /// a power of two in `16..=4096`, or if `base_url` is not an
    /// `http(s)://` URL.
    pub fn new(
        base_url: &str,
        extension: StaticExtension,
        size: Option<u16>,
    ) -> Result<Self, GatewayError> {
        let base_url = base_url.trim_end_matches('/');
        if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
            return Err(GatewayError::InvalidRequest(format!(
                "avatar CDN base URL must be http(s): {base_url}"
            )));
        }
        if let Some(size) = size
            && !(size.is_power_of_two() && (16..=4096).contains(&size))
        {
            return Err(GatewayError::InvalidRequest(format!(
                "avatar size must be a power of two between 16 and 4096, got {size}"
            )));
        }
        Ok(Self {
            base_url: base_url.to_string(),
            extension,
            size,
        })
    }

    /// Resolves `hash` to the member's guild avatar URL.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidAvatarHash`] if the hash is empty or
    /// contains anything besides ASCII alphanumerics and `_`.
    pub fn member_avatar_url(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        hash: &str,
    ) -> Result<String, GatewayError> {
        if hash.is_empty() || !hash.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
            return Err(GatewayError::InvalidAvatarHash(hash.to_string()));
        }

        let ext = if hash.starts_with(ANIMATED_PREFIX) {
            "gif"
        } else {
            self.extension.as_str()
        };

        let mut url = format!(
            "{}/guilds/{guild_id}/users/{user_id}/avatars/{hash}.{ext}",
            self.base_url
        );
        if let Some(size) = self.size {
            // Writing to a String cannot fail.
            let _ = write!(url, "?size={size}");
        }
        Ok(url)
    }
}
