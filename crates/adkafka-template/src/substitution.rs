// SPDX-FileCopyrightText: 2026 adkafka Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Merging fragment macro maps into one template instantiation.
//!
//! Producers are merged in order and later producers override earlier
//! ones. A layout merges the caller's extra macros first, then each
//! included template, then the Kafka template itself.

use adkafka_config::{PluginConfig, ValidationError};
use serde::Serialize;

use crate::catalog::TemplateLayout;
use crate::fragment::{ExtraMacros, FragmentProducer, MacroMap};

/// The macro values for one instantiation of the plugin template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Substitutions {
    pub template_file: String,
    /// Port of the plugin this row belongs to.
    pub port: String,
    pub macros: MacroMap,
}

/// Merge the output of `producers` in order.
///
/// Errors from every producer are collected; a macro reported missing by
/// several templates is reported once.
pub fn merge_fragments(
    config: &PluginConfig,
    producers: &[&dyn FragmentProducer],
) -> Result<MacroMap, Vec<ValidationError>> {
    let mut merged = MacroMap::new();
    let mut errors: Vec<ValidationError> = Vec::new();

    for producer in producers {
        match producer.produce(config) {
            Ok(map) => {
                tracing::debug!(
                    fragment = producer.name(),
                    macros = map.len(),
                    port = config.port(),
                    "merged template fragment"
                );
                merged.extend(map);
            }
            Err(fragment_errors) => {
                for error in fragment_errors {
                    if !errors.contains(&error) {
                        errors.push(error);
                    }
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(merged)
    } else {
        Err(errors)
    }
}

/// Produce the template macro values for `config` under `layout`.
pub fn template_substitutions(
    config: &PluginConfig,
    layout: &TemplateLayout,
) -> Result<Substitutions, Vec<ValidationError>> {
    let mut producers: Vec<&dyn FragmentProducer> = Vec::with_capacity(layout.fragments.len() + 1);
    producers.push(&ExtraMacros);
    producers.extend(layout.fragments.iter().map(|f| f as &dyn FragmentProducer));

    let macros = merge_fragments(config, &producers)?;
    Ok(Substitutions {
        template_file: layout.template_file.clone(),
        port: config.port().to_string(),
        macros,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::{MacroSpec, PluginField, TemplateFragment};
    use adkafka_config::{validate, PluginParams};
    use adkafka_core::{HostArch, TemplateVariant};

    fn scenario() -> PluginConfig {
        validate(
            &PluginParams::new("KAFKA1", "CAM1", "localhost:9092", "detector-data")
                .with_queue_depth(5)
                .with_macro("P", "BL01T-EA-KAFKA-01")
                .with_macro("R", ":KAFKA:"),
        )
        .unwrap()
    }

    fn pairs(subs: &Substitutions) -> Vec<(&str, &str)> {
        subs.macros
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    #[test]
    fn file_writer_substitutions() {
        let layout = TemplateLayout::for_variant(TemplateVariant::FileWriter, HostArch::Linux);
        let subs = template_substitutions(&scenario(), &layout).unwrap();
        assert_eq!(subs.template_file, "ADPluginKafka.template");
        assert_eq!(subs.port, "KAFKA1");
        assert_eq!(
            pairs(&subs),
            vec![
                ("ADDR", "0"),
                ("BLOCK", "1"),
                ("P", "BL01T-EA-KAFKA-01"),
                ("PORT", "KAFKA1"),
                ("QUEUE", "5"),
                ("R", ":KAFKA:"),
                ("TIMEOUT", "1"),
            ]
        );
    }

    #[test]
    fn plugin_base_substitutions() {
        let layout = TemplateLayout::for_variant(TemplateVariant::PluginBase, HostArch::Linux);
        let subs = template_substitutions(&scenario(), &layout).unwrap();
        assert_eq!(
            pairs(&subs),
            vec![
                ("ADDR", "0"),
                ("BLOCK", "1"),
                ("ENABLED", "0"),
                ("NDARRAY_ADDR", "0"),
                ("NDARRAY_PORT", "CAM1"),
                ("P", "BL01T-EA-KAFKA-01"),
                ("PORT", "KAFKA1"),
                ("QUEUE", "5"),
                ("R", ":KAFKA:"),
                ("SCANRATE", "I/O Intr"),
                ("TIMEOUT", "1"),
            ]
        );
    }

    #[test]
    fn named_fields_override_extras() {
        let config = validate(
            &PluginParams::new("KAFKA1", "CAM1", "b", "t")
                .with_queue_depth(5)
                .with_macro("P", "X")
                .with_macro("R", "Y")
                .with_macro("QUEUE", 99)
                .with_macro("CUSTOM", "kept"),
        )
        .unwrap();
        let layout = TemplateLayout::for_variant(TemplateVariant::FileWriter, HostArch::Linux);
        let subs = template_substitutions(&config, &layout).unwrap();
        assert_eq!(subs.macros["QUEUE"], "5");
        assert_eq!(subs.macros["CUSTOM"], "kept");
    }

    #[test]
    fn later_fragment_wins() {
        let first = TemplateFragment {
            name: "first".to_string(),
            template_file: "first.template".to_string(),
            description: String::new(),
            macros: vec![MacroSpec::extra("SCAN", "", Some("1 second"))],
        };
        let second = TemplateFragment {
            name: "second".to_string(),
            template_file: "second.template".to_string(),
            description: String::new(),
            macros: vec![
                MacroSpec::extra("SCAN", "", Some("I/O Intr")),
                MacroSpec::param("PORT", "", PluginField::Port),
            ],
        };
        let config = scenario();
        let merged = merge_fragments(&config, &[&first, &second]).unwrap();
        assert_eq!(merged["SCAN"], "I/O Intr");
        let merged = merge_fragments(&config, &[&second, &first]).unwrap();
        assert_eq!(merged["SCAN"], "1 second");
    }

    #[test]
    fn missing_prefix_reported_once() {
        let config = validate(&PluginParams::new("KAFKA1", "CAM1", "b", "t")).unwrap();
        let layout = TemplateLayout::for_variant(TemplateVariant::FileWriter, HostArch::Linux);
        let errors = template_substitutions(&config, &layout).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field()).collect();
        assert_eq!(fields, vec!["macros.P", "macros.R"]);
    }

    #[test]
    fn substitutions_are_deterministic() {
        let layout = TemplateLayout::for_variant(TemplateVariant::PluginBase, HostArch::Linux);
        let config = scenario();
        assert_eq!(
            template_substitutions(&config, &layout).unwrap(),
            template_substitutions(&config, &layout).unwrap()
        );
    }

    #[test]
    fn substitutions_serialize_to_json() {
        let layout = TemplateLayout::for_variant(TemplateVariant::FileWriter, HostArch::Linux);
        let subs = template_substitutions(&scenario(), &layout).unwrap();
        let json = serde_json::to_value(&subs).unwrap();
        assert_eq!(json["port"], "KAFKA1");
        assert_eq!(json["macros"]["QUEUE"], "5");
    }
}
