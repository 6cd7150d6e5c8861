// SPDX-FileCopyrightText: 2026 adkafka Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `adkafka check` command implementation.
//!
//! Validates the configuration, resolves every template macro, and prints
//! one summary line per plugin plus any quoting warnings.

use std::io::IsTerminal;

use adkafka_config::{PluginConfig, ValidatedBuild};
use adkafka_core::AdkafkaError;
use adkafka_emit::IocArtifacts;

/// Run the `adkafka check` command.
///
/// With `--plain`, or when stdout is not a terminal, disables colors.
pub fn run_check(build: &ValidatedBuild, plain: bool) -> Result<(), AdkafkaError> {
    let artifacts = crate::artifacts(build)?;
    let use_color = !plain && std::io::stdout().is_terminal();

    println!();
    println!("  adkafka check");
    println!("  {}", "-".repeat(50));

    for plugin in &build.plugins {
        let warned = artifacts.hazards.iter().any(|h| h.port == plugin.port());
        println!("  {} {}", status_symbol(warned, use_color), summary_line(plugin));
    }

    println!("  {}", "-".repeat(50));
    println!("  {}", layout_line(&artifacts));
    println!(
        "  {} plugin(s) valid, {} warning(s)",
        build.plugins.len(),
        artifacts.hazards.len()
    );
    println!();

    Ok(())
}

fn status_symbol(warned: bool, use_color: bool) -> String {
    let (symbol, warn) = if warned { ("[warn]", true) } else { ("[ok]  ", false) };
    if !use_color {
        return symbol.to_string();
    }
    use colored::Colorize;
    if warn {
        symbol.yellow().to_string()
    } else {
        symbol.green().to_string()
    }
}

/// One-line description of a validated plugin.
pub fn summary_line(plugin: &PluginConfig) -> String {
    format!(
        "{} <- {}:{} -> {} topic={} queue={} blocking={}",
        plugin.port(),
        plugin.array_source_port(),
        plugin.array_source_address(),
        plugin.broker_address(),
        plugin.topic(),
        plugin.queue_depth(),
        u8::from(plugin.blocking()),
    )
}

fn layout_line(artifacts: &IocArtifacts) -> String {
    let mut line = format!(
        "variant={} host={} quote_strings={}",
        artifacts.variant, artifacts.host_arch, artifacts.quote_style
    );
    if !artifacts.layout.lib_files.is_empty() {
        line.push_str(&format!(" libs={}", artifacts.layout.lib_files.join(",")));
    }
    if !artifacts.layout.dbd_files.is_empty() {
        line.push_str(&format!(" dbds={}", artifacts.layout.dbd_files.join(",")));
    }
    line
}
