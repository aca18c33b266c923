// crates/skillswap-cli/src/commands/list.rs
//
// `skillswap list [--search S] [--category C]` — show shared skills.

use clap::Args;

use skillswap_client::CategoryFilter;

use crate::context::Context;
use crate::output::{format_json, format_table, RecordRow};

/// Listing options.
#[derive(Debug, Args)]
pub struct ListCmd {
    /// Case-insensitive match against skill type or owner address.
    #[arg(long, default_value = "")]
    search: String,

    /// Skill type to show: programming, cooking, language, other, or all.
    #[arg(long, default_value = "all")]
    category: CategoryFilter,
}

/// Run the list command.
pub async fn run(ctx: &Context, cmd: &ListCmd) -> Result<(), Box<dyn std::error::Error>> {
    let controller = ctx.controller()?;
    controller.load_all().await?;
    let records = controller.view(&cmd.search, cmd.category);

    if ctx.json() {
        println!("{}", format_json(&records));
        return Ok(());
    }

    if records.is_empty() {
        println!("No skills shared yet. Be the first with `skillswap submit`.");
        return Ok(());
    }

    let rows: Vec<RecordRow> = records.iter().map(RecordRow::from).collect();
    println!("{}", format_table(&rows));
    println!(
        "{} of {} skills (filter: {})",
        records.len(),
        controller.records().len(),
        cmd.category
    );
    Ok(())
}
