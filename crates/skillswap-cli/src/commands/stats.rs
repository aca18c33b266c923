// crates/skillswap-cli/src/commands/stats.rs
//
// `skillswap stats` — per-category counts and shares.

use crate::context::Context;
use crate::output::{format_json, format_table, stat_rows};

/// Run the stats command.
pub async fn run(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let controller = ctx.controller()?;
    controller.load_all().await?;
    let stats = controller.stats();

    if ctx.json() {
        println!("{}", format_json(&stats));
        return Ok(());
    }

    println!("Total skills shared: {}", stats.total);
    println!();
    println!("{}", format_table(&stat_rows(&stats)));
    Ok(())
}
