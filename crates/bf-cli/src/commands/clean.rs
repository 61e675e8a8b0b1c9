//! Clean command implementation

use anyhow::Result;
use std::fs;

use crate::cli::{CleanArgs, GlobalArgs};
use crate::commands::common::{display_path, load_context};

/// Execute the clean command
pub async fn execute(args: &CleanArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = load_context(global)?;
    let targets = [ctx.staging_root(), ctx.transformed_root()];

    if args.dry_run {
        println!("Dry run - would clean the following directories:");
    } else {
        println!("Cleaning {}", ctx.project_dir.display());
    }

    let mut cleaned_count = 0;
    let mut skipped_count = 0;

    for target in &targets {
        let shown = display_path(&ctx.project_dir, target);
        if !target.exists() {
            if global.verbose {
                println!("  Skipping (not found): {}", shown);
            }
            skipped_count += 1;
            continue;
        }

        if args.dry_run {
            println!("  Would remove: {}", shown);
            cleaned_count += 1;
            continue;
        }

        match fs::remove_dir_all(target) {
            Ok(_) => {
                println!("  Removed: {}", shown);
                cleaned_count += 1;
            }
            Err(e) => {
                eprintln!("  Failed to remove {}: {}", shown, e);
            }
        }
    }

    println!();
    if args.dry_run {
        println!(
            "Would clean {} director{}, {} not found",
            cleaned_count,
            if cleaned_count == 1 { "y" } else { "ies" },
            skipped_count
        );
    } else {
        println!(
            "Cleaned {} director{}, {} skipped",
            cleaned_count,
            if cleaned_count == 1 { "y" } else { "ies" },
            skipped_count
        );
    }

    Ok(())
}

#[cfg(test)]
#[path = "clean_test.rs"]
mod tests;
