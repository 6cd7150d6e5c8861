// SPDX-FileCopyrightText: 2026 adkafka Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Template fragments: the macro sets each database template contributes.
//!
//! A fragment declares every macro its template reads and where the value
//! comes from. Fragments are combined by a layout; see
//! [`crate::substitution`] for the merge.

use std::collections::BTreeMap;

use adkafka_config::model::field;
use adkafka_config::{PluginConfig, ValidationError};
use serde::Serialize;

/// Macro name to value, ordered by name.
pub type MacroMap = BTreeMap<String, String>;

/// A named plugin parameter a macro can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PluginField {
    Port,
    QueueDepth,
    Blocking,
    ArraySourcePort,
    ArraySourceAddress,
}

impl PluginField {
    /// Render the field of `config` as a macro value.
    pub fn value(self, config: &PluginConfig) -> String {
        match self {
            PluginField::Port => config.port().to_string(),
            PluginField::QueueDepth => config.queue_depth().to_string(),
            PluginField::Blocking => u8::from(config.blocking()).to_string(),
            PluginField::ArraySourcePort => config.array_source_port().to_string(),
            PluginField::ArraySourceAddress => config.array_source_address().to_string(),
        }
    }

    /// Parameter name as it appears in the build configuration.
    pub fn param_name(self) -> &'static str {
        match self {
            PluginField::Port => field::PORT,
            PluginField::QueueDepth => field::QUEUE_DEPTH,
            PluginField::Blocking => field::BLOCKING,
            PluginField::ArraySourcePort => field::ARRAY_SOURCE_PORT,
            PluginField::ArraySourceAddress => field::ARRAY_SOURCE_ADDRESS,
        }
    }
}

/// Where a macro's value comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum MacroSource {
    /// Bound to a named plugin parameter.
    Param { field: PluginField },
    /// Taken from the caller's extra macros, else `default`. No default means required.
    Extra { default: Option<String> },
}

/// One macro a template reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MacroSpec {
    pub name: String,
    pub description: String,
    pub source: MacroSource,
}

impl MacroSpec {
    pub fn param(name: &str, description: &str, field: PluginField) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            source: MacroSource::Param { field },
        }
    }

    pub fn extra(name: &str, description: &str, default: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            source: MacroSource::Extra {
                default: default.map(str::to_string),
            },
        }
    }

    /// Whether the caller must supply this macro.
    pub fn is_required(&self) -> bool {
        matches!(self.source, MacroSource::Extra { default: None })
    }
}

/// Produces one fragment of the final macro map for a plugin.
pub trait FragmentProducer {
    /// Display name (e.g. `NDPluginBase`).
    fn name(&self) -> &str;

    /// Produce this fragment's macros. Missing required macros are reported
    /// as `MissingField` errors naming `macros.<NAME>`.
    fn produce(&self, config: &PluginConfig) -> Result<MacroMap, Vec<ValidationError>>;
}

/// A database template and the macros it reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateFragment {
    pub name: String,
    pub template_file: String,
    pub description: String,
    pub macros: Vec<MacroSpec>,
}

impl TemplateFragment {
    pub fn macro_spec(&self, name: &str) -> Option<&MacroSpec> {
        self.macros.iter().find(|m| m.name == name)
    }
}

impl FragmentProducer for TemplateFragment {
    fn name(&self) -> &str {
        &self.name
    }

    fn produce(&self, config: &PluginConfig) -> Result<MacroMap, Vec<ValidationError>> {
        let mut values = MacroMap::new();
        let mut errors = Vec::new();

        for spec in &self.macros {
            let value = match &spec.source {
                MacroSource::Param { field } => Some(field.value(config)),
                MacroSource::Extra { default } => config
                    .extra_macros()
                    .get(&spec.name)
                    .cloned()
                    .or_else(|| default.clone()),
            };
            match value {
                Some(value) => {
                    values.insert(spec.name.clone(), value);
                }
                None => errors.push(ValidationError::missing(format!(
                    "{}.{}",
                    field::MACROS,
                    spec.name
                ))),
            }
        }

        if errors.is_empty() {
            Ok(values)
        } else {
            Err(errors)
        }
    }
}

/// Passes every caller-supplied macro through unchanged.
///
/// Merged first, so any macro a template binds explicitly overrides it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtraMacros;

impl FragmentProducer for ExtraMacros {
    fn name(&self) -> &str {
        "extra macros"
    }

    fn produce(&self, config: &PluginConfig) -> Result<MacroMap, Vec<ValidationError>> {
        Ok(config.extra_macros().clone())
    }
}
