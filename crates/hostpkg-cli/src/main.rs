//! `hostpkg` -- a rootless package manager.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use hostpkg_cli::ops::Context;
use hostpkg_cli::{Cli, Commands};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let ctx = Context::new()?;
    let _lock = hostpkg_core::PrefixLock::acquire()?;

    let result = match cli.command {
        Commands::Install { name, full_deps, no_deps } => {
            hostpkg_cli::cmd::install::install(&ctx, &name, full_deps, no_deps)
        }
        Commands::Update { name } => hostpkg_cli::cmd::update::update(&ctx, &name),
        Commands::Remove { name, force, no_auto_remove } => {
            hostpkg_cli::cmd::remove::remove(&ctx, &name, force, no_auto_remove)
        }
        Commands::Search { query, all } => hostpkg_cli::cmd::search::search(&ctx, &query, all),
        Commands::Info { name } => hostpkg_cli::cmd::info::info(&ctx, &name),
        Commands::List => hostpkg_cli::cmd::list::list(&ctx),
        Commands::UpdateMetadata => hostpkg_cli::cmd::update_metadata::update_metadata(&ctx),
        Commands::FixSymlinks => hostpkg_cli::cmd::fix_symlinks::fix_symlinks(&ctx),
    };

    if let Err(ref err) = result {
        ctx.reporter.error(&err.to_string());
    }
    result
}
