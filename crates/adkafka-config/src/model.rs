// SPDX-FileCopyrightText: 2026 adkafka Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the ADPluginKafka IOC builder.
//!
//! Raw input (`BuildConfig`, `PluginParams`) is loosely typed so that
//! validation can report precise field errors instead of opaque parse
//! failures. The validated `PluginConfig` is strongly typed and immutable.

use std::collections::BTreeMap;
use std::fmt;

use adkafka_core::{QuoteStyle, TemplateVariant};
use serde::{Deserialize, Serialize};

/// Default number of NDArrays the plugin input queue may hold.
pub const DEFAULT_QUEUE_DEPTH: u32 = 3;

/// Callbacks block the upstream port unless told otherwise.
pub const DEFAULT_BLOCKING: bool = true;

/// Default sub-address on the upstream NDArray port.
pub const DEFAULT_ARRAY_SOURCE_ADDRESS: u32 = 0;

/// Field names used in diagnostics and in the TOML `[[plugin]]` table.
pub mod field {
    pub const PORT: &str = "port";
    pub const ARRAY_SOURCE_PORT: &str = "array_source_port";
    pub const ARRAY_SOURCE_ADDRESS: &str = "array_source_address";
    pub const BROKER_ADDRESS: &str = "broker_address";
    pub const TOPIC: &str = "topic";
    pub const QUEUE_DEPTH: &str = "queue_depth";
    pub const BLOCKING: &str = "blocking";
    pub const MACROS: &str = "macros";
}

/// Top-level build configuration.
///
/// Loaded from TOML files with environment variable overrides for the
/// `[build]` section. Each `[[plugin]]` entry is one Kafka plugin instance.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    /// Settings that apply to the whole IOC build.
    #[serde(default)]
    pub build: BuildSection,

    /// Kafka plugin instances, one per `[[plugin]]` table.
    #[serde(default, rename = "plugin")]
    pub plugins: Vec<PluginParams>,
}

/// The `[build]` section.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BuildSection {
    /// Base template shape used for `ADPluginKafka.template`.
    #[serde(default)]
    pub variant: TemplateVariant,

    /// EPICS host architecture (e.g. `linux-x86_64`). Falls back to
    /// `EPICS_HOST_ARCH` when unset.
    #[serde(default)]
    pub host_arch: Option<String>,

    /// Quoting of broker address and topic on the startup line.
    #[serde(default)]
    pub quote_strings: QuoteStyle,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            variant: TemplateVariant::default(),
            host_arch: None,
            quote_strings: QuoteStyle::default(),
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// A loosely typed parameter value as it arrives from TOML or the environment.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl ParamValue {
    /// Short type name used in `InvalidType` diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            ParamValue::Bool(_) => "boolean",
            ParamValue::Int(_) => "integer",
            ParamValue::Float(_) => "float",
            ParamValue::Text(_) => "string",
        }
    }

    /// Render the value as a template macro value. Booleans become `1`/`0`.
    pub fn to_macro_value(&self) -> String {
        match self {
            ParamValue::Bool(b) => u8::from(*b).to_string(),
            ParamValue::Int(i) => i.to_string(),
            ParamValue::Float(f) => f.to_string(),
            ParamValue::Text(s) => s.clone(),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Text(s) => write!(f, "\"{s}\""),
            other => f.write_str(&other.to_macro_value()),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

/// Raw named parameters for one Kafka plugin, before validation.
///
/// Accepts both the snake_case names and the upper-case names used by IOC
/// definition files (`PORT`, `NDARRAY_PORT`, `BROKER_ADDR`, ...). Anything
/// the database templates need beyond the plugin's own parameters goes in
/// `macros`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PluginParams {
    /// Asyn port name of the plugin.
    #[serde(default, alias = "PORT", skip_serializing_if = "Option::is_none")]
    pub port: Option<ParamValue>,

    /// Upstream NDArray port.
    #[serde(default, alias = "NDARRAY_PORT", skip_serializing_if = "Option::is_none")]
    pub array_source_port: Option<ParamValue>,

    /// Address on the upstream NDArray port.
    #[serde(default, alias = "NDARRAY_ADDR", skip_serializing_if = "Option::is_none")]
    pub array_source_address: Option<ParamValue>,

    /// Kafka broker connection string.
    #[serde(default, alias = "BROKER_ADDR", skip_serializing_if = "Option::is_none")]
    pub broker_address: Option<ParamValue>,

    /// Kafka topic.
    #[serde(default, alias = "TOPIC", skip_serializing_if = "Option::is_none")]
    pub topic: Option<ParamValue>,

    /// Input array queue size.
    #[serde(default, alias = "QUEUE", skip_serializing_if = "Option::is_none")]
    pub queue_depth: Option<ParamValue>,

    /// Blocking callbacks flag.
    #[serde(default, alias = "BLOCK", skip_serializing_if = "Option::is_none")]
    pub blocking: Option<ParamValue>,

    /// Extra template macros (`P`, `R`, `TIMEOUT`, ...).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub macros: BTreeMap<String, ParamValue>,
}

impl PluginParams {
    /// Parameters with the four required fields set and everything else defaulted.
    pub fn new(
        port: impl Into<String>,
        array_source_port: impl Into<String>,
        broker_address: impl Into<String>,
        topic: impl Into<String>,
    ) -> Self {
        Self {
            port: Some(ParamValue::Text(port.into())),
            array_source_port: Some(ParamValue::Text(array_source_port.into())),
            broker_address: Some(ParamValue::Text(broker_address.into())),
            topic: Some(ParamValue::Text(topic.into())),
            ..Self::default()
        }
    }

    pub fn with_queue_depth(mut self, depth: i64) -> Self {
        self.queue_depth = Some(ParamValue::Int(depth));
        self
    }

    pub fn with_blocking(mut self, blocking: bool) -> Self {
        self.blocking = Some(ParamValue::Bool(blocking));
        self
    }

    pub fn with_array_source_address(mut self, address: i64) -> Self {
        self.array_source_address = Some(ParamValue::Int(address));
        self
    }

    pub fn with_macro(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.macros.insert(name.into(), value.into());
        self
    }

    /// Best-effort label for diagnostics: the port name if it is a string.
    pub fn label(&self, index: usize) -> String {
        match &self.port {
            Some(ParamValue::Text(port)) if !port.trim().is_empty() => port.trim().to_string(),
            _ => format!("plugin[{index}]"),
        }
    }
}

/// A validated Kafka plugin configuration.
///
/// Only [`crate::validation::validate`] constructs one, so every instance
/// satisfies the field invariants. Fields are read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginConfig {
    port: String,
    array_source_port: String,
    array_source_address: u32,
    broker_address: String,
    topic: String,
    queue_depth: u32,
    blocking: bool,
    extra_macros: BTreeMap<String, String>,
}

impl PluginConfig {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_validated(
        port: String,
        array_source_port: String,
        array_source_address: u32,
        broker_address: String,
        topic: String,
        queue_depth: u32,
        blocking: bool,
        extra_macros: BTreeMap<String, String>,
    ) -> Self {
        Self {
            port,
            array_source_port,
            array_source_address,
            broker_address,
            topic,
            queue_depth,
            blocking,
            extra_macros,
        }
    }

    pub fn port(&self) -> &str {
        &self.port
    }

    pub fn array_source_port(&self) -> &str {
        &self.array_source_port
    }

    pub fn array_source_address(&self) -> u32 {
        self.array_source_address
    }

    pub fn broker_address(&self) -> &str {
        &self.broker_address
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn queue_depth(&self) -> u32 {
        self.queue_depth
    }

    pub fn blocking(&self) -> bool {
        self.blocking
    }

    /// Caller-supplied template macros, already rendered to strings.
    pub fn extra_macros(&self) -> &BTreeMap<String, String> {
        &self.extra_macros
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_defaults() {
        let config: BuildConfig = toml::from_str("").unwrap();
        assert_eq!(config.build.variant, TemplateVariant::FileWriter);
        assert_eq!(config.build.quote_strings, QuoteStyle::Legacy);
        assert_eq!(config.build.log_level, "info");
        assert!(config.build.host_arch.is_none());
        assert!(config.plugins.is_empty());
    }

    #[test]
    fn plugin_array_deserializes() {
        let toml_str = r#"
[build]
variant = "plugin-base"

[[plugin]]
port = "KAFKA1"
array_source_port = "CAM1"
broker_address = "localhost:9092"
topic = "detector-data"
queue_depth = 5
blocking = false

[plugin.macros]
P = "BL01T"
TIMEOUT = 2

[[plugin]]
PORT = "KAFKA2"
NDARRAY_PORT = "CAM2"
BROKER_ADDR = "broker:9092"
TOPIC = "other"
"#;
        let config: BuildConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.build.variant, TemplateVariant::PluginBase);
        assert_eq!(config.plugins.len(), 2);
        let first = &config.plugins[0];
        assert_eq!(first.port, Some(ParamValue::from("KAFKA1")));
        assert_eq!(first.queue_depth, Some(ParamValue::Int(5)));
        assert_eq!(first.blocking, Some(ParamValue::Bool(false)));
        assert_eq!(first.macros.get("TIMEOUT"), Some(&ParamValue::Int(2)));
        let second = &config.plugins[1];
        assert_eq!(second.port, Some(ParamValue::from("KAFKA2")));
        assert_eq!(second.array_source_port, Some(ParamValue::from("CAM2")));
        assert!(second.queue_depth.is_none());
    }

    #[test]
    fn plugin_deny_unknown_fields() {
        let toml_str = r#"
[[plugin]]
port = "KAFKA1"
brokr_address = "localhost:9092"
"#;
        assert!(toml::from_str::<BuildConfig>(toml_str).is_err());
    }

    #[test]
    fn param_value_macro_rendering() {
        assert_eq!(ParamValue::Bool(true).to_macro_value(), "1");
        assert_eq!(ParamValue::Bool(false).to_macro_value(), "0");
        assert_eq!(ParamValue::Int(-4).to_macro_value(), "-4");
        assert_eq!(ParamValue::Float(0.5).to_macro_value(), "0.5");
        assert_eq!(ParamValue::from("I/O Intr").to_macro_value(), "I/O Intr");
        assert_eq!(ParamValue::from("x").to_string(), "\"x\"");
    }

    #[test]
    fn label_prefers_port_name() {
        let params = PluginParams::new(" KAFKA1 ", "CAM1", "b", "t");
        assert_eq!(params.label(3), "KAFKA1");
        assert_eq!(PluginParams::default().label(3), "plugin[3]");
    }
}
