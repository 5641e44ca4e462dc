use std::fmt;

use strum::{Display, EnumString, IntoStaticStr};

/// Opaque identifier bound to exactly one [`super::PlayerRecord`] for its lifetime.
///
/// Tokens are issued once at registration and never reused.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Token(String);

impl Token {
    /// Prefix of every player key in the key/value store.
    pub const KEY_PREFIX: &'static str = "player:";

    /// Wraps an identifier produced by a token generator.
    ///
    /// Generators must never produce an empty string; use [`Token::parse`]
    /// for caller-supplied input.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Wraps a caller-supplied identifier. Returns `None` for empty input.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            None
        } else {
            Some(Self(raw.to_owned()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Storage key of the record owned by this token (`player:<token>`).
    pub fn storage_key(&self) -> String {
        format!("{}{}", Self::KEY_PREFIX, self.0)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hit-point zone on a player, addressed by scanning the matching tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Location {
    Head,
    Chest,
    Back,
}

impl Location {
    pub const ALL: [Location; 3] = [Location::Head, Location::Chest, Location::Back];

    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}
