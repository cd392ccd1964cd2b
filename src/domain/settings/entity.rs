//! Guild settings entity and related types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{parse_guild_id, validate_prefix, SettingsValidationError};

/// Guild identifier - a Discord snowflake, serialized as a decimal string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GuildId(u64);

impl GuildId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl From<u64> for GuildId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl FromStr for GuildId {
    type Err = SettingsValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_guild_id(s).map(Self)
    }
}

impl TryFrom<String> for GuildId {
    type Error = SettingsValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GuildId> for String {
    fn from(id: GuildId) -> Self {
        id.0.to_string()
    }
}

impl fmt::Display for GuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Command prefix - non-empty, no whitespace, bounded length
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Prefix(String);

impl Prefix {
    /// Prefix assigned to a guild the first time it is seen
    pub const DEFAULT: &'static str = ">>";

    pub fn new(prefix: impl Into<String>) -> Result<Self, SettingsValidationError> {
        let prefix = prefix.into();
        validate_prefix(&prefix)?;
        Ok(Self(prefix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Prefix {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl TryFrom<String> for Prefix {
    type Error = SettingsValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Prefix> for String {
    fn from(prefix: Prefix) -> Self {
        prefix.0
    }
}

impl PartialEq<str> for Prefix {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Prefix {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Store-assigned record identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsId(Uuid);

impl SettingsId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SettingsId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SettingsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-guild settings record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildSettings {
    /// Assigned by the durable store on insert
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<SettingsId>,
    guild_id: GuildId,
    prefix: Prefix,
}

impl GuildSettings {
    /// Create a not-yet-persisted record
    pub fn new(guild_id: GuildId, prefix: Prefix) -> Self {
        Self {
            id: None,
            guild_id,
            prefix,
        }
    }

    /// Create a not-yet-persisted record with the default prefix
    pub fn with_default_prefix(guild_id: GuildId) -> Self {
        Self::new(guild_id, Prefix::default())
    }

    pub fn with_id(mut self, id: SettingsId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn id(&self) -> Option<SettingsId> {
        self.id
    }

    pub fn guild_id(&self) -> GuildId {
        self.guild_id
    }

    pub fn prefix(&self) -> &Prefix {
        &self.prefix
    }

    pub fn set_prefix(&mut self, prefix: Prefix) {
        self.prefix = prefix;
    }
}
