// crates/skillswap-cli/src/commands/mod.rs
//
// Command module declarations for the SkillSwap CLI.

pub mod init;
pub mod learn;
pub mod list;
pub mod rate;
pub mod shell;
pub mod stats;
pub mod submit;
pub mod wallet;
