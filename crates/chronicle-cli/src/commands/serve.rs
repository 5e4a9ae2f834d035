//! Recording server command.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long, default_value = "7777")]
    pub port: u16,

    /// Base URL images are fetched from
    #[arg(long, default_value = "https://images.fallenlondon.com")]
    pub image_base_url: String,

    /// Directory downloaded images are cached in
    #[arg(long, default_value = "images")]
    pub image_cache_dir: PathBuf,
}

pub async fn execute(args: ServeArgs, db_path: &Path) -> Result<()> {
    let pool = Arc::new(chronicle_db::DbPool::open(db_path)?);

    println!();
    println!("  {} {}", "Chronicle".cyan().bold(), "Recording Server".bold());
    println!();
    println!(
        "  {}  http://127.0.0.1:{}/api/submit",
        "Submit API".green(),
        args.port
    );
    println!(
        "  {}    http://127.0.0.1:{}/api/locations/{{id}}",
        "Read API".green(),
        args.port
    );
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();

    chronicle_web::run_server(pool, args.port, args.image_base_url, args.image_cache_dir).await?;

    Ok(())
}
