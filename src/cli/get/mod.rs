//! Get command - prints a guild's settings as JSON

use clap::Args;

use crate::domain::{GuildId, SettingsRepository};

use super::Runtime;

#[derive(Args, Clone)]
pub struct GetArgs {
    /// Guild snowflake
    pub guild_id: GuildId,
}

pub async fn run(args: GetArgs) -> anyhow::Result<()> {
    let runtime = Runtime::start().await?;

    let outcome = runtime.state.repository.get_settings(args.guild_id).await?;
    println!("{}", serde_json::to_string_pretty(outcome.value())?);

    runtime.shutdown();
    Ok(())
}
