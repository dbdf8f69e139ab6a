use anyhow::Context;
use colored::Colorize;
use vcvcat_merge::{MergeConfig, MergeOutcome, PendingMerge, SchemaWarning};
use vcvcat_types::{read_patch, write_patch};

use crate::cli::Cli;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let first = read_patch(&cli.in1)
        .with_context(|| format!("failed to load {}", cli.in1.display()))?;
    let second = read_patch(&cli.in2)
        .with_context(|| format!("failed to load {}", cli.in2.display()))?;

    let config = MergeConfig::default();
    let pending = PendingMerge::new(first, second, &config)?;
    report_warnings(pending.warnings());
    let outcome = pending.run()?;

    write_patch(&cli.out, &outcome.patch)
        .with_context(|| format!("failed to write {}", cli.out.display()))?;
    report_summary(&outcome, &cli);
    Ok(())
}

fn report_warnings(warnings: &[SchemaWarning]) {
    for warning in warnings {
        eprintln!(
            "{} unknown key '{}' in {} - merge may be incomplete.",
            "Warning:".yellow().bold(),
            warning.key,
            warning.source
        );
        eprintln!(" Please check for a new version of vcvcat");
    }
}

fn report_summary(outcome: &MergeOutcome, cli: &Cli) {
    eprintln!(
        "{} Merged {} modules and {} cables into {}",
        "✓".green().bold(),
        outcome.patch.modules.len(),
        outcome.patch.cables.len(),
        cli.out.display().to_string().bold()
    );
    eprintln!(
        "  Imported patch: {} columns x {} rows, placed from row {}",
        outcome.second_bounds.width(),
        outcome.second_bounds.height(),
        outcome.second_bounds.min_row.saturating_add(outcome.row_offset)
    );
    if !outcome.remap.is_empty() {
        eprintln!("  Renumbered ids: {}", outcome.remap.len().to_string().yellow());
        for (old, new) in outcome.remap.iter() {
            tracing::debug!(%old, %new, "renumbered id");
        }
    }
}
