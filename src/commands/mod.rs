//! Chat command surface built on the prefix service

mod prefix;

pub use prefix::{
    PrefixCommand, CHANGED_REPLY, CHANGE_FAILED_REPLY, MISSING_VALUE_REPLY, USAGE,
};

use tracing::debug;

use crate::domain::settings::{GuildId, Prefix, SettingsError, SettingsRepository};
use crate::infrastructure::settings::PrefixService;

/// A command word and its arguments, cut out of a chat message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation<'a> {
    pub command: &'a str,
    pub args: Vec<&'a str>,
}

/// Cuts the guild prefix off `content` and splits the rest into words
///
/// Returns `None` when the message does not start with the prefix or holds
/// nothing after it.
pub fn strip_prefix<'a>(content: &'a str, prefix: &Prefix) -> Option<Invocation<'a>> {
    let rest = content.strip_prefix(prefix.as_str())?;
    let mut words = rest.split_whitespace();
    let command = words.next()?;

    Some(Invocation {
        command,
        args: words.collect(),
    })
}

/// Handles a chat message sent in a guild, returning the reply to post
///
/// Only the `prefix` command is understood; anything else yields no reply.
/// Fails only when the guild's prefix itself cannot be resolved.
pub async fn handle_message<R: SettingsRepository>(
    service: &PrefixService<R>,
    guild_id: GuildId,
    content: &str,
) -> Result<Option<String>, SettingsError> {
    let prefix = service.get_prefix(guild_id).await?;

    let Some(invocation) = strip_prefix(content, &prefix) else {
        return Ok(None);
    };

    match invocation.command {
        "prefix" => match PrefixCommand::parse(&invocation.args) {
            Some(command) => Ok(Some(command.execute(service, guild_id).await)),
            None => Ok(None),
        },
        other => {
            debug!(guild_id = %guild_id, command = other, "Ignoring unknown command");
            Ok(None)
        }
    }
}
