// crates/skillswap-cli/src/commands/submit.rs
//
// `skillswap submit --category C` — share a new skill.

use clap::Args;
use serde_json::json;

use skillswap_client::OperationKind;
use skillswap_core::record::{SkillCategory, SkillDraft};

use crate::context::Context;
use crate::output::{format_banner, format_json};

/// Submission form.
#[derive(Debug, Args)]
pub struct SubmitCmd {
    /// Skill type: programming, cooking, language, or other.
    #[arg(long)]
    category: SkillCategory,

    /// What you can teach.
    #[arg(long, default_value = "")]
    description: String,

    /// How long you have been doing it.
    #[arg(long, default_value = "")]
    experience: String,
}

impl SubmitCmd {
    fn draft(&self) -> SkillDraft {
        SkillDraft::new(self.category)
            .with_description(self.description.clone())
            .with_experience(self.experience.clone())
    }
}

/// Run the submit command.
pub async fn run(ctx: &Context, cmd: &SubmitCmd) -> Result<(), Box<dyn std::error::Error>> {
    let controller = ctx.connected_controller().await?;
    if !ctx.json() {
        println!("[pending] {}", OperationKind::Submit.pending_message());
    }

    let result = controller.submit(cmd.draft()).await;
    let banner = controller.transaction();

    if ctx.json() {
        let body = match &result {
            Ok(id) => json!({ "id": id, "status": banner.status, "message": banner.message }),
            Err(_) => json!({ "status": banner.status, "message": banner.message }),
        };
        println!("{}", format_json(&body));
    } else if let Some(line) = format_banner(&banner) {
        println!("{}", line);
    }

    let id = result?;
    if !ctx.json() {
        println!("  Skill ID: {}", id);
    }
    Ok(())
}
