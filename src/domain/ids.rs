//! Type-safe snowflake identifiers.
//!
//! Guilds, users and roles are all identified by 64-bit snowflakes on the
//! chat platform. Each gets its own newtype so a role id can never be passed
//! where a guild id is expected.
//!
//! Snowflakes serialize as JSON strings (JavaScript clients cannot represent
//! every `u64` as a number) and deserialize from either a string or a number.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use utoipa::ToSchema;

/// Wire form accepted when deserializing a snowflake.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawSnowflake {
    Text(String),
    Number(u64),
}

impl RawSnowflake {
    fn into_u64<E: serde::de::Error>(self) -> Result<u64, E> {
        match self {
            Self::Number(n) => Ok(n),
            Self::Text(s) => s
                .parse()
                .map_err(|_| E::custom(format!("invalid snowflake: {s:?}"))),
        }
    }
}

macro_rules! snowflake_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, ToSchema)]
        #[schema(value_type = String, example = "175928847299117063")]
        pub struct $name(u64);

        impl $name {
            /// Wraps a raw snowflake value.
            #[must_use]
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// Returns the raw snowflake value.
            #[must_use]
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse().map(Self)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(&self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                RawSnowflake::deserialize(deserializer)?
                    .into_u64()
                    .map(Self)
            }
        }
    };
}

snowflake_id! {
    /// Identifier of a guild (the community a member belongs to).
    GuildId
}

snowflake_id! {
    /// Identifier of a user. Together with a [`GuildId`] it names a member.
    UserId
}

snowflake_id! {
    /// Identifier of a guild role.
    RoleId
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_string() {
        let id = GuildId::new(175_928_847_299_117_063);
        let json = serde_json::to_string(&id).unwrap_or_default();
        assert_eq!(json, "\"175928847299117063\"");
    }

    #[test]
    fn deserializes_from_string_or_number() {
        let Ok(from_str) = serde_json::from_str::<RoleId>("\"42\"") else {
            panic!("string form should parse");
        };
        let Ok(from_num) = serde_json::from_str::<RoleId>("42") else {
            panic!("number form should parse");
        };
        assert_eq!(from_str, from_num);
        assert_eq!(from_str.get(), 42);
    }

    #[test]
    fn rejects_non_numeric_string() {
        assert!(serde_json::from_str::<UserId>("\"abc\"").is_err());
        assert!(serde_json::from_str::<UserId>("-1").is_err());
    }

    #[test]
    fn display_and_from_str_agree() {
        let id = UserId::new(80_351_110_224_678_912);
        let parsed: Result<UserId, _> = id.to_string().parse();
        assert_eq!(parsed.ok(), Some(id));
    }

    #[test]
    fn hash_works_in_hashmap() {
        use std::collections::HashMap;
        let id = GuildId::from(7);
        let mut map = HashMap::new();
        map.insert(id, "test");
        assert_eq!(map.get(&id), Some(&"test"));
    }
}
