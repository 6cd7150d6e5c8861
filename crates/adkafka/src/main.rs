// SPDX-FileCopyrightText: 2026 adkafka Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! adkafka - IOC builder for the EPICS areaDetector Kafka plugin.
//!
//! This is the binary entry point. Generated text goes to stdout; logs and
//! diagnostics go to stderr.

mod build;
mod check;
mod templates;

use std::path::PathBuf;

use adkafka_config::{BuildConfig, ConfigError, ValidatedBuild};
use adkafka_core::{AdkafkaError, QuoteStyle, TemplateVariant};
use adkafka_emit::{assemble, IocArtifacts};
use clap::{Parser, Subcommand};

/// adkafka - IOC builder for the EPICS areaDetector Kafka plugin.
#[derive(Parser, Debug)]
#[command(name = "adkafka", version, about, long_about = None)]
struct Cli {
    /// Read only this config file instead of the adkafka.toml hierarchy.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Base template variant (file-writer or plugin-base).
    #[arg(long, global = true)]
    variant: Option<TemplateVariant>,

    /// EPICS host architecture, e.g. linux-x86_64 or windows-x64.
    #[arg(long, global = true)]
    host_arch: Option<String>,

    /// Quoting of broker address and topic (legacy or quoted).
    #[arg(long, global = true)]
    quote_strings: Option<QuoteStyle>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate the configuration and summarize each plugin.
    Check {
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
    /// Print the KafkaPluginConfigure startup lines.
    Emit,
    /// Print the ADPluginKafka.template substitutions.
    Substitutions {
        /// Print JSON instead of the substitution file format.
        #[arg(long)]
        json: bool,
    },
    /// List the template fragments and macros of the selected variant.
    Templates {
        /// List every known fragment instead of the selected variant's layout.
        #[arg(long)]
        all: bool,
    },
    /// Write the startup script, substitutions and build info into a directory.
    Build {
        /// Output directory (created if missing).
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(errors) => {
            adkafka_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.build.log_level);

    if let Err(e) = run(cli.command, config) {
        eprintln!("adkafka: {e}");
        std::process::exit(1);
    }
}

fn run(command: Commands, config: BuildConfig) -> Result<(), AdkafkaError> {
    match command {
        Commands::Templates { all } => templates::run_templates(&config.build, all),
        Commands::Check { plain } => check::run_check(&validated(config)?, plain),
        Commands::Emit => {
            let artifacts = artifacts(&validated(config)?)?;
            print!("{}", artifacts.startup);
            Ok(())
        }
        Commands::Substitutions { json } => {
            let artifacts = artifacts(&validated(config)?)?;
            if json {
                println!("{}", artifacts.substitutions_json()?);
            } else {
                print!("{}", artifacts.substitutions_file());
            }
            Ok(())
        }
        Commands::Build { out_dir } => {
            let artifacts = artifacts(&validated(config)?)?;
            build::run_build(&artifacts, &out_dir)
        }
    }
}

/// Load raw configuration and apply command-line overrides to `[build]`.
fn load_config(cli: &Cli) -> Result<BuildConfig, Vec<ConfigError>> {
    let mut config = adkafka_config::load(cli.config.as_deref())?;
    if let Some(variant) = cli.variant {
        config.build.variant = variant;
    }
    if let Some(arch) = &cli.host_arch {
        config.build.host_arch = Some(arch.clone());
    }
    if let Some(style) = cli.quote_strings {
        config.build.quote_strings = style;
    }
    if let Some(level) = &cli.log_level {
        config.build.log_level = level.clone();
    }
    Ok(config)
}

fn validated(config: BuildConfig) -> Result<ValidatedBuild, AdkafkaError> {
    adkafka_config::validate_build(config).map_err(report)
}

/// Assemble and log any unquoted-argument hazards.
fn artifacts(build: &ValidatedBuild) -> Result<IocArtifacts, AdkafkaError> {
    let artifacts = assemble(build).map_err(report)?;
    for hazard in &artifacts.hazards {
        tracing::warn!(
            port = %hazard.port,
            field = hazard.field,
            value = %hazard.value,
            "{}; iocsh may split this unquoted argument (set build.quote_strings = \"quoted\")",
            hazard.reason
        );
    }
    Ok(artifacts)
}

/// Render diagnostics and collapse them into one error for the exit path.
fn report(errors: Vec<ConfigError>) -> AdkafkaError {
    adkafka_config::render_errors(&errors);
    AdkafkaError::Config(format!("{} configuration error(s)", errors.len()))
}

/// Initializes the tracing subscriber with the given log level.
///
/// Logs go to stderr so stdout carries only generated text.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("adkafka={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
