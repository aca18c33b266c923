// crates/skillswap-cli/src/commands/init.rs
//
// `skillswap init` — write the default config, create the data directory,
// and generate a wallet if none exists yet.

use std::fs;
use std::path::Path;

use crate::commands::wallet::write_new_key;
use crate::config::{expand_tilde, DEFAULT_CONFIG_TOML};
use crate::context::Context;

/// Run the init command.
pub async fn run(ctx: &Context, config_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    println!("Initializing SkillSwap...");

    if Path::new(config_path).exists() {
        println!("  Config:  {} (kept)", config_path);
    } else {
        if let Some(parent) = Path::new(config_path).parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(config_path, DEFAULT_CONFIG_TOML)?;
        println!("  Config:  {} (created)", config_path);
    }

    let data_dir = expand_tilde(&ctx.config.data_dir);
    fs::create_dir_all(&data_dir)?;
    println!("  Data:    {}", data_dir);

    let key_path = expand_tilde(&ctx.config.wallet_key_path);
    if Path::new(&key_path).exists() {
        println!("  Wallet:  {} (kept)", ctx.load_wallet()?.address());
    } else {
        let address = write_new_key(&key_path, false)?;
        println!("  Wallet:  {} (created)", address);
    }

    println!();
    println!("Done. Share your first skill with `skillswap submit --category <type>`.");
    Ok(())
}
