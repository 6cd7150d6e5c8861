// SPDX-FileCopyrightText: 2026 adkafka Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Build parameter system for the ADPluginKafka IOC builder.
//!
//! Provides TOML configuration parsing with strict key checking
//! (`deny_unknown_fields`), XDG file hierarchy lookup, environment variable
//! overrides, field validation into immutable [`PluginConfig`]s, and
//! Elm-style diagnostic error rendering with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use adkafka_config::load_and_validate;
//!
//! let build = load_and_validate(None).expect("config errors");
//! for plugin in &build.plugins {
//!     println!("plugin port: {}", plugin.port());
//! }
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{render_errors, ConfigError, ValidationError, ValidationKind};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{BuildConfig, BuildSection, ParamValue, PluginConfig, PluginParams};
pub use validation::{validate, validate_config};

/// A build configuration whose plugins have all passed validation.
#[derive(Debug, Clone)]
pub struct ValidatedBuild {
    /// The `[build]` section as loaded (after any caller overrides).
    pub settings: BuildSection,
    /// Validated plugins in declaration order.
    pub plugins: Vec<PluginConfig>,
}

/// Load raw configuration, converting Figment failures into diagnostics.
///
/// With `path`, only that file (plus environment overrides) is read;
/// otherwise the XDG hierarchy is used.
pub fn load(path: Option<&Path>) -> Result<BuildConfig, Vec<ConfigError>> {
    let result = match path {
        Some(path) => loader::load_config_from_path(path),
        None => loader::load_config(),
    };
    result.map_err(|err| {
        let toml_sources = collect_toml_sources(path);
        diagnostic::figment_to_config_errors(err, &toml_sources)
    })
}

/// Validate an already loaded configuration.
pub fn validate_build(config: BuildConfig) -> Result<ValidatedBuild, Vec<ConfigError>> {
    let plugins = validation::validate_config(&config)?;
    Ok(ValidatedBuild {
        settings: config.build,
        plugins,
    })
}

/// Load configuration from a file or the XDG hierarchy and validate it.
pub fn load_and_validate(path: Option<&Path>) -> Result<ValidatedBuild, Vec<ConfigError>> {
    validate_build(load(path)?)
}

/// Load configuration from a TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<ValidatedBuild, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => validate_build(config),
        Err(err) => {
            let sources = vec![("<inline>".to_string(), toml_content.to_string())];
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Collect TOML source file contents for error span resolution.
fn collect_toml_sources(explicit: Option<&Path>) -> Vec<(String, String)> {
    let mut sources = Vec::new();

    if let Some(path) = explicit {
        if let Ok(content) = std::fs::read_to_string(path) {
            sources.push((path.display().to_string(), content));
        }
        return sources;
    }

    if let Ok(content) = std::fs::read_to_string(loader::CONFIG_FILE_NAME) {
        let path = std::env::current_dir()
            .map(|d| d.join(loader::CONFIG_FILE_NAME).display().to_string())
            .unwrap_or_else(|_| loader::CONFIG_FILE_NAME.to_string());
        sources.push((path, content));
    }

    if let Some(path) = loader::user_config_path()
        && let Ok(content) = std::fs::read_to_string(&path)
    {
        sources.push((path.display().to_string(), content));
    }

    let system_path = Path::new(loader::SYSTEM_CONFIG_PATH);
    if let Ok(content) = std::fs::read_to_string(system_path) {
        sources.push((system_path.display().to_string(), content));
    }

    sources
}
