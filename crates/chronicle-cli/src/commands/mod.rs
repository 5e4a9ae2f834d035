//! CLI command definitions and handlers.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod serve;
pub mod user;

/// Chronicle - a recording companion for a narrative web game
#[derive(Parser)]
#[command(name = "chronicle")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the sqlite database (created on first use)
    #[arg(long, global = true, default_value = "chronicle.db")]
    pub db: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the recording server
    Serve(serve::ServeArgs),

    /// Manage submitter accounts and API keys
    #[command(subcommand)]
    User(user::UserCommands),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Serve(args) => serve::execute(args, &self.db).await,
            Commands::User(cmd) => user::execute(cmd, &self.db).await,
        }
    }
}
