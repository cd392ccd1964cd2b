//! Check command - start-up already pings both tiers

use super::Runtime;

pub async fn run() -> anyhow::Result<()> {
    let runtime = Runtime::start().await?;

    runtime.state.repository.ping().await?;
    println!("ok");

    runtime.shutdown();
    Ok(())
}
