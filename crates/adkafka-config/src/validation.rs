// SPDX-FileCopyrightText: 2026 adkafka Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Validation of raw plugin parameters into [`PluginConfig`]s.
//!
//! Collects every problem instead of failing fast, so one run of
//! `adkafka check` reports all mistakes in a config file.

use std::collections::{BTreeMap, HashSet};

use crate::diagnostic::{ConfigError, ValidationError};
use crate::model::{
    field, BuildConfig, ParamValue, PluginConfig, PluginParams, DEFAULT_ARRAY_SOURCE_ADDRESS,
    DEFAULT_BLOCKING, DEFAULT_QUEUE_DEPTH,
};

/// iocsh integer arguments are C `int`s.
const MAX_IOCSH_INT: i64 = i32::MAX as i64;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate one plugin's raw parameters.
///
/// Returns the validated, immutable configuration or every field error found.
/// Nothing is emitted for a plugin that fails here.
pub fn validate(params: &PluginParams) -> Result<PluginConfig, Vec<ValidationError>> {
    let mut errors = Vec::new();

    let port = required_string(field::PORT, params.port.as_ref(), &mut errors);
    let array_source_port = required_string(
        field::ARRAY_SOURCE_PORT,
        params.array_source_port.as_ref(),
        &mut errors,
    );
    let broker_address = required_string(
        field::BROKER_ADDRESS,
        params.broker_address.as_ref(),
        &mut errors,
    );
    let topic = required_string(field::TOPIC, params.topic.as_ref(), &mut errors);
    let queue_depth = bounded_integer(
        field::QUEUE_DEPTH,
        params.queue_depth.as_ref(),
        DEFAULT_QUEUE_DEPTH,
        1,
        &mut errors,
    );
    let array_source_address = bounded_integer(
        field::ARRAY_SOURCE_ADDRESS,
        params.array_source_address.as_ref(),
        DEFAULT_ARRAY_SOURCE_ADDRESS,
        0,
        &mut errors,
    );
    let blocking = boolean(field::BLOCKING, params.blocking.as_ref(), &mut errors);
    if let (Some(port), Some(source)) = (&port, &array_source_port)
        && port == source
    {
        errors.push(ValidationError::out_of_range(
            field::ARRAY_SOURCE_PORT,
            source,
            "an upstream port other than the plugin's own `port`",
        ));
    }
    let extra_macros = extra_macros(&params.macros, &mut errors);

    match (
        port,
        array_source_port,
        broker_address,
        topic,
        queue_depth,
        array_source_address,
        blocking,
    ) {
        (
            Some(port),
            Some(array_source_port),
            Some(broker_address),
            Some(topic),
            Some(queue_depth),
            Some(array_source_address),
            Some(blocking),
        ) if errors.is_empty() => Ok(PluginConfig::from_validated(
            port,
            array_source_port,
            array_source_address,
            broker_address,
            topic,
            queue_depth,
            blocking,
            extra_macros,
        )),
        _ => Err(errors),
    }
}

/// Validate a whole build configuration.
///
/// Runs [`validate`] on every `[[plugin]]` entry and the cross-plugin checks:
/// at least one plugin, unique port names, no plugin reading arrays from
/// another Kafka plugin, and a known log level.
pub fn validate_config(config: &BuildConfig) -> Result<Vec<PluginConfig>, Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut plugins = Vec::with_capacity(config.plugins.len());

    if !LOG_LEVELS.contains(&config.build.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "build.log_level `{}` is not one of {}",
                config.build.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.plugins.is_empty() {
        errors.push(ConfigError::Validation {
            message: "no [[plugin]] entries configured".to_string(),
        });
    }

    for (i, params) in config.plugins.iter().enumerate() {
        match validate(params) {
            Ok(plugin) => plugins.push(plugin),
            Err(field_errors) => {
                let label = params.label(i);
                errors.extend(field_errors.into_iter().map(|source| ConfigError::Plugin {
                    plugin: label.clone(),
                    source,
                }));
            }
        }
    }

    // Asyn port names share one namespace per IOC.
    let mut seen_ports = HashSet::new();
    for plugin in &plugins {
        if !seen_ports.insert(plugin.port()) {
            errors.push(ConfigError::Validation {
                message: format!("duplicate plugin port `{}` in [[plugin]] array", plugin.port()),
            });
        }
    }

    // Kafka plugins consume NDArrays but never produce them.
    for plugin in &plugins {
        let source = plugin.array_source_port();
        if source != plugin.port() && seen_ports.contains(source) {
            errors.push(ConfigError::Validation {
                message: format!(
                    "plugin `{}` reads arrays from `{source}`, which is a Kafka plugin port and produces no NDArrays",
                    plugin.port()
                ),
            });
        }
    }

    if errors.is_empty() {
        tracing::debug!(count = plugins.len(), "plugin parameters validated");
        Ok(plugins)
    } else {
        Err(errors)
    }
}

fn required_string(
    name: &str,
    value: Option<&ParamValue>,
    errors: &mut Vec<ValidationError>,
) -> Option<String> {
    match value {
        None => {
            errors.push(ValidationError::missing(name));
            None
        }
        Some(ParamValue::Text(s)) if s.trim().is_empty() => {
            errors.push(ValidationError::missing(name));
            None
        }
        Some(ParamValue::Text(s)) => Some(s.trim().to_string()),
        Some(other) => {
            errors.push(ValidationError::invalid_type(name, "string", other.type_name()));
            None
        }
    }
}

/// Coerce an integer field and check `min <= value <= i32::MAX`.
fn bounded_integer(
    name: &str,
    value: Option<&ParamValue>,
    default: u32,
    min: i64,
    errors: &mut Vec<ValidationError>,
) -> Option<u32> {
    let raw = match value {
        None => return Some(default),
        Some(ParamValue::Int(i)) => *i,
        Some(ParamValue::Text(s)) => match s.trim().parse::<i64>() {
            Ok(i) => i,
            Err(_) => {
                errors.push(ValidationError::invalid_type(
                    name,
                    "integer",
                    format!("string \"{s}\""),
                ));
                return None;
            }
        },
        Some(other) => {
            errors.push(ValidationError::invalid_type(name, "integer", other.type_name()));
            return None;
        }
    };

    if raw < min {
        let constraint = if min == 0 {
            "non-negative".to_string()
        } else {
            format!("at least {min}")
        };
        errors.push(ValidationError::out_of_range(name, raw, constraint));
        return None;
    }
    if raw > MAX_IOCSH_INT {
        errors.push(ValidationError::out_of_range(
            name,
            raw,
            format!("at most {MAX_IOCSH_INT}"),
        ));
        return None;
    }

    u32::try_from(raw).ok()
}

fn boolean(name: &str, value: Option<&ParamValue>, errors: &mut Vec<ValidationError>) -> Option<bool> {
    match value {
        None => Some(DEFAULT_BLOCKING),
        Some(ParamValue::Bool(b)) => Some(*b),
        Some(ParamValue::Int(0)) => Some(false),
        Some(ParamValue::Int(1)) => Some(true),
        Some(ParamValue::Int(i)) => {
            errors.push(ValidationError::out_of_range(name, i, "0 or 1"));
            None
        }
        Some(ParamValue::Text(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => Some(true),
            "0" | "false" | "no" => Some(false),
            _ => {
                errors.push(ValidationError::invalid_type(
                    name,
                    "boolean or 0/1",
                    format!("string \"{s}\""),
                ));
                None
            }
        },
        Some(other) => {
            errors.push(ValidationError::invalid_type(
                name,
                "boolean or 0/1",
                other.type_name(),
            ));
            None
        }
    }
}

fn extra_macros(
    macros: &BTreeMap<String, ParamValue>,
    errors: &mut Vec<ValidationError>,
) -> BTreeMap<String, String> {
    let mut rendered = BTreeMap::new();
    for (name, value) in macros {
        if is_macro_name(name) {
            rendered.insert(name.clone(), value.to_macro_value());
        } else {
            errors.push(ValidationError::invalid_type(
                format!("{}.{name}", field::MACROS),
                "macro name of ASCII letters, digits and `_`",
                format!("\"{name}\""),
            ));
        }
    }
    rendered
}

fn is_macro_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::ValidationKind;

    fn scenario() -> PluginParams {
        PluginParams::new("KAFKA1", "CAM1", "localhost:9092", "detector-data")
            .with_array_source_address(0)
            .with_queue_depth(5)
            .with_blocking(true)
    }

    fn has_error(errors: &[ValidationError], kind: ValidationKind, field: &str) -> bool {
        errors.iter().any(|e| e.kind() == kind && e.field() == field)
    }

    #[test]
    fn scenario_validates() {
        let config = validate(&scenario()).unwrap();
        assert_eq!(config.port(), "KAFKA1");
        assert_eq!(config.array_source_port(), "CAM1");
        assert_eq!(config.array_source_address(), 0);
        assert_eq!(config.broker_address(), "localhost:9092");
        assert_eq!(config.topic(), "detector-data");
        assert_eq!(config.queue_depth(), 5);
        assert!(config.blocking());
        assert!(config.extra_macros().is_empty());
    }

    #[test]
    fn defaults_applied() {
        let config = validate(&PluginParams::new("K", "C", "b:1", "t")).unwrap();
        assert_eq!(config.queue_depth(), 3);
        assert_eq!(config.array_source_address(), 0);
        assert!(config.blocking());
    }

    #[test]
    fn each_missing_required_field_is_named() {
        for name in [
            field::PORT,
            field::ARRAY_SOURCE_PORT,
            field::BROKER_ADDRESS,
            field::TOPIC,
        ] {
            let mut params = scenario();
            match name {
                field::PORT => params.port = None,
                field::ARRAY_SOURCE_PORT => params.array_source_port = None,
                field::BROKER_ADDRESS => params.broker_address = None,
                _ => params.topic = None,
            }
            let errors = validate(&params).unwrap_err();
            assert_eq!(errors.len(), 1, "{name}: {errors:?}");
            assert!(has_error(&errors, ValidationKind::MissingField, name));
        }
    }

    #[test]
    fn blank_string_counts_as_missing() {
        let mut params = scenario();
        params.topic = Some(ParamValue::from("   "));
        let errors = validate(&params).unwrap_err();
        assert!(has_error(&errors, ValidationKind::MissingField, field::TOPIC));
    }

    #[test]
    fn all_errors_are_collected() {
        let errors = validate(&PluginParams::default().with_queue_depth(0)).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert!(has_error(&errors, ValidationKind::OutOfRange, field::QUEUE_DEPTH));
    }

    #[test]
    fn queue_depth_bounds() {
        for bad in [0, -1, -100] {
            let errors = validate(&scenario().with_queue_depth(bad)).unwrap_err();
            assert!(has_error(&errors, ValidationKind::OutOfRange, field::QUEUE_DEPTH));
        }
        assert_eq!(validate(&scenario().with_queue_depth(3)).unwrap().queue_depth(), 3);

        let errors = validate(&scenario().with_queue_depth(i64::from(i32::MAX) + 1)).unwrap_err();
        assert!(has_error(&errors, ValidationKind::OutOfRange, field::QUEUE_DEPTH));
    }

    #[test]
    fn array_source_address_bounds() {
        let errors = validate(&scenario().with_array_source_address(-1)).unwrap_err();
        assert!(has_error(
            &errors,
            ValidationKind::OutOfRange,
            field::ARRAY_SOURCE_ADDRESS
        ));
        assert_eq!(
            validate(&scenario().with_array_source_address(0))
                .unwrap()
                .array_source_address(),
            0
        );
    }

    #[test]
    fn integer_strings_are_coerced() {
        let mut params = scenario();
        params.queue_depth = Some(ParamValue::from("7"));
        params.array_source_address = Some(ParamValue::from(" 2 "));
        let config = validate(&params).unwrap();
        assert_eq!(config.queue_depth(), 7);
        assert_eq!(config.array_source_address(), 2);
    }

    #[test]
    fn wrong_types_are_reported() {
        let mut params = scenario();
        params.queue_depth = Some(ParamValue::from("deep"));
        params.port = Some(ParamValue::Int(1));
        params.array_source_address = Some(ParamValue::Float(1.5));
        let errors = validate(&params).unwrap_err();
        assert!(has_error(&errors, ValidationKind::InvalidType, field::QUEUE_DEPTH));
        assert!(has_error(&errors, ValidationKind::InvalidType, field::PORT));
        assert!(has_error(
            &errors,
            ValidationKind::InvalidType,
            field::ARRAY_SOURCE_ADDRESS
        ));
    }

    #[test]
    fn blocking_coercion() {
        let cases = [
            (ParamValue::Bool(false), false),
            (ParamValue::Int(0), false),
            (ParamValue::Int(1), true),
            (ParamValue::from("0"), false),
            (ParamValue::from("YES"), true),
            (ParamValue::from("false"), false),
        ];
        for (value, expected) in cases {
            let mut params = scenario();
            params.blocking = Some(value.clone());
            assert_eq!(validate(&params).unwrap().blocking(), expected, "{value:?}");
        }

        let mut params = scenario();
        params.blocking = Some(ParamValue::Int(2));
        let errors = validate(&params).unwrap_err();
        assert!(has_error(&errors, ValidationKind::OutOfRange, field::BLOCKING));

        params.blocking = Some(ParamValue::from("maybe"));
        let errors = validate(&params).unwrap_err();
        assert!(has_error(&errors, ValidationKind::InvalidType, field::BLOCKING));
    }

    #[test]
    fn extra_macros_rendered_and_checked() {
        let params = scenario()
            .with_macro("P", "BL01T-EA-KAFKA-01")
            .with_macro("ENABLED", true)
            .with_macro("TIMEOUT", 2);
        let config = validate(&params).unwrap();
        assert_eq!(config.extra_macros()["P"], "BL01T-EA-KAFKA-01");
        assert_eq!(config.extra_macros()["ENABLED"], "1");
        assert_eq!(config.extra_macros()["TIMEOUT"], "2");

        let errors = validate(&scenario().with_macro("1P", "x")).unwrap_err();
        assert!(has_error(&errors, ValidationKind::InvalidType, "macros.1P"));
        let errors = validate(&scenario().with_macro("A-B", "x")).unwrap_err();
        assert!(has_error(&errors, ValidationKind::InvalidType, "macros.A-B"));
    }

    #[test]
    fn duplicate_ports_fail_validation() {
        let config = BuildConfig {
            plugins: vec![scenario(), scenario().with_queue_depth(2)],
            ..BuildConfig::default()
        };
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("duplicate plugin port `KAFKA1`"))
        ));
    }

    #[test]
    fn array_source_cannot_be_own_port() {
        let params = PluginParams::new("KAFKA1", "KAFKA1", "localhost:9092", "detector-data");
        let errors = validate(&params).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(has_error(&errors, ValidationKind::OutOfRange, field::ARRAY_SOURCE_PORT));

        let config = BuildConfig {
            plugins: vec![params],
            ..BuildConfig::default()
        };
        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(
            &errors[..],
            [ConfigError::Plugin { plugin, source }]
                if plugin == "KAFKA1" && source.field() == field::ARRAY_SOURCE_PORT
        ));
    }

    #[test]
    fn array_source_cannot_be_another_kafka_plugin() {
        let config = BuildConfig {
            plugins: vec![scenario(), PluginParams::new("KAFKA2", "KAFKA1", "b", "t")],
            ..BuildConfig::default()
        };
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            &errors[0],
            ConfigError::Validation { message }
                if message.contains("plugin `KAFKA2` reads arrays from `KAFKA1`")
        ));
    }

    #[test]
    fn sibling_plugins_may_share_a_source() {
        let config = BuildConfig {
            plugins: vec![scenario(), PluginParams::new("KAFKA2", "CAM1", "b", "t")],
            ..BuildConfig::default()
        };
        assert_eq!(validate_config(&config).unwrap().len(), 2);
    }

    #[test]
    fn empty_build_fails_validation() {
        let errors = validate_config(&BuildConfig::default()).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("no [[plugin]]"))
        ));
    }

    #[test]
    fn bad_log_level_fails_validation() {
        let mut config = BuildConfig {
            plugins: vec![scenario()],
            ..BuildConfig::default()
        };
        config.build.log_level = "verbose".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("log_level"))
        ));
    }

    #[test]
    fn plugin_errors_are_labelled() {
        let config = BuildConfig {
            plugins: vec![scenario(), PluginParams::new("KAFKA2", "CAM2", "b", "")],
            ..BuildConfig::default()
        };
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        match &errors[0] {
            ConfigError::Plugin { plugin, source } => {
                assert_eq!(plugin, "KAFKA2");
                assert_eq!(source.field(), field::TOPIC);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn valid_build_returns_plugins_in_order() {
        let config = BuildConfig {
            plugins: vec![scenario(), PluginParams::new("KAFKA2", "CAM2", "b", "t")],
            ..BuildConfig::default()
        };
        let plugins = validate_config(&config).unwrap();
        let ports: Vec<&str> = plugins.iter().map(|p| p.port()).collect();
        assert_eq!(ports, vec!["KAFKA1", "KAFKA2"]);
    }
}
