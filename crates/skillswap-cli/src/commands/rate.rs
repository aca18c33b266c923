// crates/skillswap-cli/src/commands/rate.rs
//
// `skillswap rate --id ID --stars N` — rate a shared skill.

use clap::Args;
use serde_json::json;

use skillswap_client::OperationKind;

use crate::context::Context;
use crate::output::{format_banner, format_json, stars};

/// Rating options.
#[derive(Debug, Args)]
pub struct RateCmd {
    /// ID of the skill to rate.
    #[arg(long)]
    id: String,

    /// Stars, 1 to 5.
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    stars: u8,
}

/// Run the rate command.
pub async fn run(ctx: &Context, cmd: &RateCmd) -> Result<(), Box<dyn std::error::Error>> {
    let controller = ctx.connected_controller().await?;
    if !ctx.json() {
        println!("[pending] {}", OperationKind::Rate.pending_message());
    }

    let result = controller.rate(&cmd.id, cmd.stars).await;
    let banner = controller.transaction();

    if ctx.json() {
        println!(
            "{}",
            format_json(&json!({
                "id": cmd.id,
                "rating": cmd.stars,
                "status": banner.status,
                "message": banner.message,
            }))
        );
    } else if let Some(line) = format_banner(&banner) {
        println!("{}", line);
    }

    result?;
    if !ctx.json() {
        println!("  {} {}", cmd.id, stars(cmd.stars));
    }
    Ok(())
}
