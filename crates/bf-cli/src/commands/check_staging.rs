//! Check-staging command implementation

use anyhow::Result;

use crate::cli::{CheckStagingArgs, GlobalArgs};
use crate::commands::common::{display_path, load_context, ExitCode};

/// Execute the check-staging command
///
/// Exits with status 1 when ingestion is required.
pub async fn execute(args: &CheckStagingArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = load_context(global)?;
    let check = ctx.layout().check();

    if check.is_complete() {
        println!(
            "All staging files exist in {}",
            display_path(&ctx.project_dir, &ctx.staging_root())
        );
        return Ok(());
    }

    println!("Ingestion is required. Missing staging files:");
    let shown = if args.all { check.missing.len() } else { 1 };
    for path in check.missing.iter().take(shown) {
        println!("  {}", display_path(&ctx.project_dir, path));
    }
    if shown < check.missing.len() {
        println!("  ... and {} more", check.missing.len() - shown);
    }

    Err(ExitCode(1).into())
}
