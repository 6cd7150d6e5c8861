// SPDX-FileCopyrightText: 2026 adkafka Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./adkafka.toml` > `~/.config/adkafka/adkafka.toml` > `/etc/adkafka/adkafka.toml`
//! with environment variable overrides via the `ADKAFKA_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::BuildConfig;

/// Name of the local and XDG config file.
pub const CONFIG_FILE_NAME: &str = "adkafka.toml";

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/adkafka/adkafka.toml";

/// Path of the per-user config file, if a config directory exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("adkafka").join(CONFIG_FILE_NAME))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/adkafka/adkafka.toml` (system-wide)
/// 3. `~/.config/adkafka/adkafka.toml` (user XDG config)
/// 4. `./adkafka.toml` (local directory)
/// 5. `ADKAFKA_*` environment variables
pub fn load_config() -> Result<BuildConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no environment).
pub fn load_config_from_str(toml_content: &str) -> Result<BuildConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BuildConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
///
/// A missing file is an error here, unlike in the XDG hierarchy.
pub fn load_config_from_path(path: &Path) -> Result<BuildConfig, figment::Error> {
    if !path.is_file() {
        return Err(figment::Error::from(format!(
            "config file `{}` does not exist",
            path.display()
        )));
    }
    Figment::new()
        .merge(Serialized::defaults(BuildConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for XDG config loading.
pub fn build_figment() -> Figment {
    let mut figment = Figment::new()
        .merge(Serialized::defaults(BuildConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH));
    if let Some(user) = user_config_path() {
        figment = figment.merge(Toml::file(user));
    }
    figment
        .merge(Toml::file(CONFIG_FILE_NAME))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because keys contain
/// underscores: `ADKAFKA_BUILD_HOST_ARCH` must map to `build.host_arch`,
/// not `build.host.arch`. Only the `[build]` section is overridable; the
/// `[[plugin]]` array has no stable environment spelling.
fn env_provider() -> Env {
    Env::prefixed("ADKAFKA_")
        .filter(|key| key.as_str().to_ascii_lowercase().starts_with("build_"))
        .map(|key| {
            key.as_str()
                .to_ascii_lowercase()
                .replacen("build_", "build.", 1)
                .into()
        })
}
