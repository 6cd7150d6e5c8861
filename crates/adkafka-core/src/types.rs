// SPDX-FileCopyrightText: 2026 adkafka Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Build-time enums shared by the config, template and emit crates.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Name of the environment variable EPICS build systems use for the host architecture.
pub const EPICS_HOST_ARCH_ENV: &str = "EPICS_HOST_ARCH";

/// Which base template shape `ADPluginKafka.template` is instantiated with.
///
/// Selected once per build; never switched at runtime.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum TemplateVariant {
    /// Basic plugin template plus the file-writer template (`ADBase` + `NDFile`).
    #[default]
    FileWriter,
    /// `NDPluginBase` only, auto-instantiated, with explicit library and dbd lists.
    PluginBase,
}

/// How string arguments after `maxMemory` are written on the startup line.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum QuoteStyle {
    /// Broker address and topic are written as bare iocsh words.
    #[default]
    Legacy,
    /// Broker address and topic are double-quoted like the other strings.
    Quoted,
}

/// Host architecture family, used only to pick library file names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum HostArch {
    #[default]
    Linux,
    Windows,
}

impl HostArch {
    /// Classify an EPICS architecture string such as `linux-x86_64` or `windows-x64`.
    ///
    /// Only the operating-system component (before the first `-`) is inspected,
    /// so `darwin-aarch64` is not mistaken for a Windows target. This
    /// deliberately replaces the legacy "contains `win` anywhere" test.
    pub fn from_epics_arch(arch: &str) -> Self {
        let os = arch.trim().split('-').next().unwrap_or_default();
        if os.starts_with("win") || os == "cygwin" {
            HostArch::Windows
        } else {
            HostArch::Linux
        }
    }

    /// Read `EPICS_HOST_ARCH` from the environment, defaulting to Linux.
    pub fn detect() -> Self {
        match std::env::var(EPICS_HOST_ARCH_ENV) {
            Ok(arch) => {
                tracing::debug!(%arch, "host architecture from environment");
                Self::from_epics_arch(&arch)
            }
            Err(_) => HostArch::Linux,
        }
    }

    /// Resolve an explicit architecture if given, otherwise fall back to [`HostArch::detect`].
    pub fn resolve(explicit: Option<&str>) -> Self {
        match explicit {
            Some(arch) if !arch.trim().is_empty() => Self::from_epics_arch(arch),
            _ => Self::detect(),
        }
    }

    pub fn is_windows(self) -> bool {
        self == HostArch::Windows
    }
}
