// SPDX-FileCopyrightText: 2026 adkafka Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Whole-build assembly: every plugin's startup block and template row.
//!
//! Either every plugin resolves and the complete artifact set is returned,
//! or nothing is returned. Callers write files only from a successful
//! [`IocArtifacts`].

use adkafka_config::{ConfigError, ValidatedBuild};
use adkafka_core::{AdkafkaError, HostArch, QuoteStyle, TemplateVariant};
use adkafka_template::{template_substitutions, Substitutions, TemplateLayout};
use serde::Serialize;

use crate::startup::{startup_block, unquoted_hazards, Hazard};
use crate::substitutions::{render_json, render_substitutions};

/// Everything one IOC build produces.
#[derive(Debug, Clone)]
pub struct IocArtifacts {
    pub variant: TemplateVariant,
    pub host_arch: HostArch,
    pub quote_style: QuoteStyle,
    pub layout: TemplateLayout,
    /// Startup blocks for all plugins, in declaration order.
    pub startup: String,
    pub substitutions: Vec<Substitutions>,
    /// Unquoted values iocsh may misread; empty unless the style is legacy.
    pub hazards: Vec<Hazard>,
}

/// Machine-readable summary written next to the generated files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildInfo {
    pub variant: TemplateVariant,
    pub host_arch: HostArch,
    pub quote_strings: QuoteStyle,
    pub template_file: String,
    pub auto_instantiate: bool,
    pub lib_files: Vec<String>,
    pub dbd_files: Vec<String>,
    pub ports: Vec<String>,
}

impl IocArtifacts {
    /// The `.substitutions` file contents.
    pub fn substitutions_file(&self) -> String {
        render_substitutions(&self.substitutions)
    }

    pub fn substitutions_json(&self) -> Result<String, AdkafkaError> {
        render_json(&self.substitutions)
    }

    pub fn build_info(&self) -> BuildInfo {
        BuildInfo {
            variant: self.variant,
            host_arch: self.host_arch,
            quote_strings: self.quote_style,
            template_file: self.layout.template_file.clone(),
            auto_instantiate: self.layout.auto_instantiate,
            lib_files: self.layout.lib_files.clone(),
            dbd_files: self.layout.dbd_files.clone(),
            ports: self.substitutions.iter().map(|s| s.port.clone()).collect(),
        }
    }
}

/// Resolve every validated plugin into startup text and template rows.
///
/// Template macros the caller forgot (such as `P` or `R`) are reported as
/// per-plugin `MissingField` errors; all plugins are checked before failing.
pub fn assemble(build: &ValidatedBuild) -> Result<IocArtifacts, Vec<ConfigError>> {
    let settings = &build.settings;
    let host_arch = HostArch::resolve(settings.host_arch.as_deref());
    let layout = TemplateLayout::for_variant(settings.variant, host_arch);
    let style = settings.quote_strings;

    let mut errors = Vec::new();
    let mut substitutions = Vec::with_capacity(build.plugins.len());
    for plugin in &build.plugins {
        match template_substitutions(plugin, &layout) {
            Ok(subs) => substitutions.push(subs),
            Err(field_errors) => {
                errors.extend(field_errors.into_iter().map(|source| ConfigError::Plugin {
                    plugin: plugin.port().to_string(),
                    source,
                }));
            }
        }
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    let startup = build
        .plugins
        .iter()
        .map(|plugin| startup_block(plugin, style))
        .collect::<Vec<_>>()
        .join("\n");
    let hazards = build
        .plugins
        .iter()
        .flat_map(|plugin| unquoted_hazards(plugin, style))
        .collect();

    tracing::info!(
        plugins = build.plugins.len(),
        variant = %settings.variant,
        host_arch = %host_arch,
        "IOC build assembled"
    );

    Ok(IocArtifacts {
        variant: settings.variant,
        host_arch,
        quote_style: style,
        layout,
        startup,
        substitutions,
        hazards,
    })
}
