//! Translate command implementation.

use super::{load_policies, InputArgs};
use anyhow::{Context, Result};
use nsm_translator::{translate_all, OutputFormat, Reporter};
use std::fs;
use tracing::{info, warn};

/// Runs the translate command.
pub fn run(input: &InputArgs, format: &str, out_file: Option<&str>) -> Result<()> {
    let format: OutputFormat = format.parse()?;

    let policies = load_policies(input)?;
    if policies.is_empty() {
        warn!("No network policies found");
    }

    let firewall_policies = translate_all(&policies);
    let rule_count: usize = firewall_policies.iter().map(|p| p.rules.len()).sum();
    info!(
        "Translated {} policies into {} firewall rules",
        firewall_policies.len(),
        rule_count
    );

    let report = Reporter::new(format)
        .render(&firewall_policies)
        .with_context(|| "Failed to render firewall rules")?;

    match out_file {
        Some(path) => {
            fs::write(path, &report)
                .with_context(|| format!("Failed to write output file: {path}"))?;
            info!("Firewall rules written to: {}", path);
        }
        None => print!("{report}"),
    }

    Ok(())
}
