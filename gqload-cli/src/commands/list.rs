use anyhow::{Context, Result};
use colored::Colorize;
use gqload_scenarios::{all_scenarios, OperationRegistry};

/// Print the scenarios and every registered operation
pub fn handle_list() -> Result<()> {
    println!("{}", "Scenarios:".bold());
    for scenario in all_scenarios() {
        println!("  {:<18} {}", scenario.name().green(), scenario.description());
    }

    let registry = OperationRegistry::builtin().context("Failed to build operation registry")?;
    println!();
    println!("{}", format!("Operations ({}):", registry.len()).bold());
    for template in registry.iter() {
        println!("  {:<32} {}", template.name, template.kind);
    }
    Ok(())
}
