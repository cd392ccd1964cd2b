//! Prefix command - runs `prefix <args...>` for a guild and prints the reply

use clap::Args;

use crate::commands::PrefixCommand;
use crate::domain::GuildId;

use super::Runtime;

#[derive(Args, Clone)]
pub struct PrefixArgs {
    /// Guild snowflake
    pub guild_id: GuildId,

    /// Sub-command and its arguments, e.g. `change !!`
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

pub async fn run(args: PrefixArgs) -> anyhow::Result<()> {
    let runtime = Runtime::start().await?;
    let words: Vec<&str> = args.args.iter().map(String::as_str).collect();

    match PrefixCommand::parse(&words) {
        Some(command) => {
            let reply = command
                .execute(runtime.state.prefix_service.as_ref(), args.guild_id)
                .await;
            println!("{}", reply);
        }
        None => {
            let prefix = runtime.state.prefix_service.get_prefix(args.guild_id).await?;
            println!("{}", prefix);
        }
    }

    runtime.shutdown();
    Ok(())
}
