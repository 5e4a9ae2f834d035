//! Submitter account management.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use std::path::Path;

use chronicle_db::queries::users;
use chronicle_db::DbPool;

#[derive(Subcommand)]
pub enum UserCommands {
    /// Create a submitter account and print its API key
    Add(AddArgs),

    /// List all submitter accounts
    List,
}

#[derive(Args)]
pub struct AddArgs {
    /// Display name for the account
    pub name: String,

    /// Grant admin rights
    #[arg(long)]
    pub admin: bool,
}

pub async fn execute(cmd: UserCommands, db_path: &Path) -> Result<()> {
    let pool = DbPool::open(db_path)?;
    match cmd {
        UserCommands::Add(args) => add(&pool, args),
        UserCommands::List => list(&pool),
    }
}

fn add(pool: &DbPool, args: AddArgs) -> Result<()> {
    let api_key = uuid::Uuid::new_v4().simple().to_string();
    let user = pool.with_conn(|conn| users::create(conn, &args.name, &api_key, args.admin))?;

    println!(
        "{} Created user {} (id {})",
        "✓".green().bold(),
        user.name.cyan(),
        user.id
    );
    println!("  API key: {}", user.api_key.yellow());
    Ok(())
}

fn list(pool: &DbPool) -> Result<()> {
    let users = pool.with_conn(users::list)?;
    if users.is_empty() {
        println!("{}", "No users yet. Try: chronicle user add <name>".dimmed());
        return Ok(());
    }
    for user in users {
        let role = if user.is_admin { " [admin]" } else { "" };
        println!(
            "{:>4}  {}{}  {}",
            user.id,
            user.name.cyan(),
            role.yellow(),
            user.api_key.dimmed()
        );
    }
    Ok(())
}
