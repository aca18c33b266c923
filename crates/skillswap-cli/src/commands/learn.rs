// crates/skillswap-cli/src/commands/learn.rs
//
// `skillswap learn --id ID` — express interest in learning a shared skill.
//
// Informational only: nothing is written to the store.

use clap::Args;
use serde_json::json;

use crate::context::Context;
use crate::output::format_json;

/// Learn request options.
#[derive(Debug, Args)]
pub struct LearnCmd {
    /// ID of the skill to learn.
    #[arg(long)]
    id: String,
}

/// Run the learn command.
pub async fn run(ctx: &Context, cmd: &LearnCmd) -> Result<(), Box<dyn std::error::Error>> {
    let controller = ctx.controller()?;
    controller.load_all().await?;
    controller.request_learn(&cmd.id)?;

    let record = controller
        .records()
        .iter()
        .find(|r| r.id == cmd.id)
        .cloned()
        .ok_or("skill disappeared during lookup")?;

    if ctx.json() {
        println!(
            "{}",
            format_json(&json!({
                "id": record.id,
                "category": record.category,
                "owner": record.owner,
            }))
        );
    } else {
        println!("Requested to learn {} from {}", record.category, record.owner);
        println!("Reach out to the owner to arrange a session.");
    }
    Ok(())
}
