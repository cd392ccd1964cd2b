//! Message command - feeds one chat message through the command surface

use clap::Args;

use crate::commands::handle_message;
use crate::domain::GuildId;

use super::Runtime;

#[derive(Args, Clone)]
pub struct MessageArgs {
    /// Guild snowflake
    pub guild_id: GuildId,

    /// Message content, including the guild prefix
    pub content: String,
}

pub async fn run(args: MessageArgs) -> anyhow::Result<()> {
    let runtime = Runtime::start().await?;

    if let Some(reply) =
        handle_message(runtime.state.prefix_service.as_ref(), args.guild_id, &args.content)
            .await?
    {
        println!("{}", reply);
    }

    runtime.shutdown();
    Ok(())
}
