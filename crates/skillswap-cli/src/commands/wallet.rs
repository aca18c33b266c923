// crates/skillswap-cli/src/commands/wallet.rs
//
// `skillswap wallet {create, show}` — key management commands.

use std::fs;
use std::path::Path;

use clap::Subcommand;
use serde_json::json;

use skillswap_core::crypto::Keypair;
use skillswap_core::identity::address_from_public_key;

use crate::config::expand_tilde;
use crate::context::Context;
use crate::output::format_json;

/// Wallet management subcommands.
#[derive(Debug, Subcommand)]
pub enum WalletCmd {
    /// Generate a new ed25519 keypair and save its secret key.
    Create {
        /// Overwrite an existing key file.
        #[arg(long)]
        force: bool,
    },
    /// Show the wallet address and public key.
    Show,
}

/// Run the wallet subcommand.
pub async fn run(ctx: &Context, cmd: &WalletCmd) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        WalletCmd::Create { force } => create_wallet(ctx, *force),
        WalletCmd::Show => show_wallet(ctx),
    }
}

/// Write a fresh key file at `path`. Refuses to replace an existing one
/// unless `force` is set. Returns the new address.
pub fn write_new_key(path: &str, force: bool) -> Result<String, Box<dyn std::error::Error>> {
    if Path::new(path).exists() && !force {
        return Err(format!(
            "A wallet already exists at {}. Pass --force to replace it.",
            path
        )
        .into());
    }
    if let Some(parent) = Path::new(path).parent() {
        fs::create_dir_all(parent)?;
    }

    let keypair = Keypair::generate();
    fs::write(path, keypair.secret_hex())?;
    Ok(address_from_public_key(&keypair.public_key_bytes()))
}

fn create_wallet(ctx: &Context, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let path = expand_tilde(&ctx.config.wallet_key_path);
    let address = write_new_key(&path, force)?;

    if ctx.json() {
        println!("{}", format_json(&json!({ "address": address, "key_path": path })));
        return Ok(());
    }

    println!("Wallet created successfully.");
    println!("  Address:  {}", address);
    println!("  Saved to: {}", path);
    println!();
    println!("IMPORTANT: Back up your secret key file securely.");

    Ok(())
}

fn show_wallet(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let wallet = ctx.load_wallet()?;
    let address = wallet.address();

    if ctx.json() {
        println!("{}", format_json(&json!({ "address": address })));
    } else {
        println!("Wallet address: {}", address);
        println!(
            "Signing:        {}",
            if ctx.config.auto_approve {
                "automatic"
            } else {
                "prompt per write"
            }
        );
    }

    Ok(())
}
