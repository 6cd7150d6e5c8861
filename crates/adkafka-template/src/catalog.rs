// SPDX-FileCopyrightText: 2026 adkafka Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in template catalog.
//!
//! Returns the hardcoded fragments for the areaDetector templates that
//! `ADPluginKafka.template` includes, and assembles them into the layout
//! for each [`TemplateVariant`]. No files are read.

use adkafka_core::{HostArch, TemplateVariant};
use serde::Serialize;

use crate::fragment::{MacroSpec, PluginField, TemplateFragment};

/// The plugin's own database template.
pub const KAFKA_TEMPLATE_FILE: &str = "ADPluginKafka.template";

/// Database definition files loaded for the auto-instantiated variant.
const DBD_FILES: &[&str] = &["ADPluginKafka"];

const LINUX_LIBS: &[&str] = &["ADPluginKafka", "rdkafka++", "rdkafka"];

/// librdkafka ships with a `lib` prefix in its Windows import libraries.
const WINDOWS_LIBS: &[&str] = &["ADPluginKafka", "librdkafkacpp", "librdkafka"];

/// How `ADPluginKafka.template` is instantiated for one variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateLayout {
    pub variant: TemplateVariant,
    /// The template the substitutions are written against.
    pub template_file: String,
    /// Included fragments in merge order; the Kafka fragment is last.
    pub fragments: Vec<TemplateFragment>,
    /// Whether the IOC builder instantiates the template without an explicit entry.
    pub auto_instantiate: bool,
    pub lib_files: Vec<String>,
    pub dbd_files: Vec<String>,
}

impl TemplateLayout {
    /// Build the layout for `variant` on `arch`.
    pub fn for_variant(variant: TemplateVariant, arch: HostArch) -> Self {
        match variant {
            TemplateVariant::FileWriter => Self {
                variant,
                template_file: KAFKA_TEMPLATE_FILE.to_string(),
                fragments: vec![ad_base(), nd_file(), kafka_plugin()],
                auto_instantiate: false,
                lib_files: Vec::new(),
                dbd_files: Vec::new(),
            },
            TemplateVariant::PluginBase => Self {
                variant,
                template_file: KAFKA_TEMPLATE_FILE.to_string(),
                fragments: vec![nd_plugin_base(), kafka_plugin()],
                auto_instantiate: true,
                lib_files: lib_files(arch),
                dbd_files: DBD_FILES.iter().map(|s| s.to_string()).collect(),
            },
        }
    }

    /// Names of every macro the layout declares, sorted and deduplicated.
    pub fn macro_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .fragments
            .iter()
            .flat_map(|f| f.macros.iter().map(|m| m.name.clone()))
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

/// Library names to link for the Kafka plugin on `arch`.
pub fn lib_files(arch: HostArch) -> Vec<String> {
    let libs = if arch.is_windows() {
        WINDOWS_LIBS
    } else {
        LINUX_LIBS
    };
    libs.iter().map(|s| s.to_string()).collect()
}

/// Macros every asyn-port template takes.
fn asyn_port_macros() -> Vec<MacroSpec> {
    vec![
        MacroSpec::extra("P", "Device prefix", None),
        MacroSpec::extra("R", "Device suffix", None),
        MacroSpec::param("PORT", "Asyn port name", PluginField::Port),
        MacroSpec::extra("ADDR", "Asyn port address", Some("0")),
        MacroSpec::extra("TIMEOUT", "Asyn timeout", Some("1")),
    ]
}

/// `ADBase.template`: the basic areaDetector record set.
pub fn ad_base() -> TemplateFragment {
    TemplateFragment {
        name: "ADBase".to_string(),
        template_file: "ADBase.template".to_string(),
        description: "Basic areaDetector records".to_string(),
        macros: asyn_port_macros(),
    }
}

/// `NDFile.template`: file-writer records.
pub fn nd_file() -> TemplateFragment {
    TemplateFragment {
        name: "NDFile".to_string(),
        template_file: "NDFile.template".to_string(),
        description: "File path, name and capture records".to_string(),
        macros: asyn_port_macros(),
    }
}

/// `NDPluginBase.template`: records common to all NDArray plugins.
pub fn nd_plugin_base() -> TemplateFragment {
    let mut macros = asyn_port_macros();
    macros.extend([
        MacroSpec::param(
            "NDARRAY_PORT",
            "Input array port",
            PluginField::ArraySourcePort,
        ),
        MacroSpec::param(
            "NDARRAY_ADDR",
            "Input array port address",
            PluginField::ArraySourceAddress,
        ),
        MacroSpec::extra("ENABLED", "Enable callbacks at startup", Some("0")),
        MacroSpec::extra("SCANRATE", "Scan rate for status records", Some("I/O Intr")),
    ]);
    TemplateFragment {
        name: "NDPluginBase".to_string(),
        template_file: "NDPluginBase.template".to_string(),
        description: "Records common to all NDArray plugins".to_string(),
        macros,
    }
}

/// `ADPluginKafka.template`: the Kafka plugin's own records.
pub fn kafka_plugin() -> TemplateFragment {
    let mut macros = asyn_port_macros();
    macros.extend([
        MacroSpec::param("QUEUE", "Input array queue size", PluginField::QueueDepth),
        MacroSpec::param("BLOCK", "Blocking callbacks", PluginField::Blocking),
    ]);
    TemplateFragment {
        name: "ADPluginKafka".to_string(),
        template_file: KAFKA_TEMPLATE_FILE.to_string(),
        description: "Kafka broker, topic and producer status records".to_string(),
        macros,
    }
}

/// Every fragment the catalog knows, for listing.
pub fn builtin_fragments() -> Vec<TemplateFragment> {
    vec![ad_base(), nd_file(), nd_plugin_base(), kafka_plugin()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_writer_layout() {
        let layout = TemplateLayout::for_variant(TemplateVariant::FileWriter, HostArch::Linux);
        let names: Vec<&str> = layout.fragments.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["ADBase", "NDFile", "ADPluginKafka"]);
        assert!(!layout.auto_instantiate);
        assert!(layout.lib_files.is_empty());
        assert!(layout.dbd_files.is_empty());
        assert_eq!(layout.template_file, "ADPluginKafka.template");
    }

    #[test]
    fn plugin_base_layout() {
        let layout = TemplateLayout::for_variant(TemplateVariant::PluginBase, HostArch::Linux);
        let names: Vec<&str> = layout.fragments.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["NDPluginBase", "ADPluginKafka"]);
        assert!(layout.auto_instantiate);
        assert_eq!(layout.lib_files, vec!["ADPluginKafka", "rdkafka++", "rdkafka"]);
        assert_eq!(layout.dbd_files, vec!["ADPluginKafka"]);
    }

    #[test]
    fn windows_library_names() {
        let layout = TemplateLayout::for_variant(TemplateVariant::PluginBase, HostArch::Windows);
        assert_eq!(
            layout.lib_files,
            vec!["ADPluginKafka", "librdkafkacpp", "librdkafka"]
        );
        // The file-writer variant carries no library list on any host.
        let layout = TemplateLayout::for_variant(TemplateVariant::FileWriter, HostArch::Windows);
        assert!(layout.lib_files.is_empty());
    }

    #[test]
    fn kafka_fragment_is_last() {
        for variant in [TemplateVariant::FileWriter, TemplateVariant::PluginBase] {
            let layout = TemplateLayout::for_variant(variant, HostArch::Linux);
            assert_eq!(
                layout.fragments.last().map(|f| f.template_file.as_str()),
                Some(KAFKA_TEMPLATE_FILE)
            );
        }
    }

    #[test]
    fn macro_names_are_deduplicated() {
        let layout = TemplateLayout::for_variant(TemplateVariant::PluginBase, HostArch::Linux);
        assert_eq!(
            layout.macro_names(),
            vec![
                "ADDR",
                "BLOCK",
                "ENABLED",
                "NDARRAY_ADDR",
                "NDARRAY_PORT",
                "P",
                "PORT",
                "QUEUE",
                "R",
                "SCANRATE",
                "TIMEOUT"
            ]
        );
    }

    #[test]
    fn catalog_lists_four_fragments() {
        assert_eq!(builtin_fragments().len(), 4);
    }
}
