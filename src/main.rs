use clap::Parser;
use guild_settings::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Get(args) => cli::get::run(args).await,
        Command::Prefix(args) => cli::prefix::run(args).await,
        Command::Message(args) => cli::message::run(args).await,
        Command::Check => cli::check::run().await,
    }
}
