// SPDX-FileCopyrightText: 2026 adkafka Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `adkafka templates` command implementation.

use adkafka_config::BuildSection;
use adkafka_core::{AdkafkaError, HostArch};
use adkafka_template::{builtin_fragments, MacroSource, MacroSpec, TemplateFragment, TemplateLayout};

/// Print the fragments and macro table of the configured variant, or of
/// every known fragment with `all`.
pub fn run_templates(settings: &BuildSection, all: bool) -> Result<(), AdkafkaError> {
    if all {
        for fragment in builtin_fragments() {
            print!("{}", describe_fragment(&fragment));
        }
        return Ok(());
    }
    let arch = HostArch::resolve(settings.host_arch.as_deref());
    let layout = TemplateLayout::for_variant(settings.variant, arch);
    print!("{}", describe_layout(&layout));
    Ok(())
}

/// Human-readable listing of a layout.
pub fn describe_layout(layout: &TemplateLayout) -> String {
    let mut out = format!(
        "{} ({}, auto_instantiate={})\n",
        layout.template_file, layout.variant, layout.auto_instantiate
    );
    for fragment in &layout.fragments {
        out.push_str(&describe_fragment(fragment));
    }
    if !layout.lib_files.is_empty() {
        out.push_str(&format!("\n  libs: {}\n", layout.lib_files.join(", ")));
    }
    if !layout.dbd_files.is_empty() {
        out.push_str(&format!("  dbds: {}\n", layout.dbd_files.join(", ")));
    }
    out
}

fn describe_fragment(fragment: &TemplateFragment) -> String {
    let mut out = format!(
        "\n  {} [{}]\n    {}\n",
        fragment.name, fragment.template_file, fragment.description
    );
    for spec in &fragment.macros {
        out.push_str(&format!("    {:<14} {}\n", spec.name, source_text(spec)));
    }
    out
}

fn source_text(spec: &MacroSpec) -> String {
    match &spec.source {
        MacroSource::Param { field } => format!("<- {} ({})", field.param_name(), spec.description),
        MacroSource::Extra { default: Some(d) } => {
            format!("default \"{d}\" ({})", spec.description)
        }
        MacroSource::Extra { default: None } => format!("required ({})", spec.description),
    }
}
