//! The `prefix` command

use tracing::warn;

use crate::domain::settings::{GuildId, SettingsError, SettingsRepository};
use crate::infrastructure::settings::PrefixService;

pub const USAGE: &str = "Usage: `prefix change <new prefix>`";
pub const MISSING_VALUE_REPLY: &str = "You need to specify your new prefix";
pub const CHANGE_FAILED_REPLY: &str = "Error changing your prefix...";
pub const CHANGED_REPLY: &str = "Prefix has changed to:";

/// Sub-commands of `prefix`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefixCommand {
    /// `change <new>`
    Change(String),
    /// `change` without a value
    MissingValue,
    /// `set`, which has no behavior of its own
    Set,
    Unknown(String),
}

impl PrefixCommand {
    /// Parses the words following `prefix`; `None` when there are none
    pub fn parse(args: &[&str]) -> Option<Self> {
        let (sub_command, rest) = args.split_first()?;

        let command = match *sub_command {
            "" => return None,
            "change" => match rest.first() {
                Some(value) => Self::Change((*value).to_string()),
                None => Self::MissingValue,
            },
            "set" => Self::Set,
            other => Self::Unknown(other.to_string()),
        };

        Some(command)
    }

    /// Runs the command and renders the reply
    pub async fn execute<R: SettingsRepository>(
        self,
        service: &PrefixService<R>,
        guild_id: GuildId,
    ) -> String {
        match self {
            Self::Change(value) => match service.change_prefix(guild_id, &value).await {
                Ok(prefix) => format!("{} `{}`", CHANGED_REPLY, prefix),
                Err(SettingsError::PrefixUnchanged { prefix }) => {
                    format!("Prefix is already set to `{}`", prefix)
                }
                Err(SettingsError::InvalidPrefix(e)) => format!("Invalid prefix: {}", e),
                Err(e) => {
                    warn!(guild_id = %guild_id, error = %e, "Error changing prefix");
                    CHANGE_FAILED_REPLY.to_string()
                }
            },
            Self::MissingValue => MISSING_VALUE_REPLY.to_string(),
            Self::Set => USAGE.to_string(),
            Self::Unknown(sub_command) => {
                format!("Unknown prefix command `{}`. {}", sub_command, USAGE)
            }
        }
    }
}
