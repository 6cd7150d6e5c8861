// SPDX-FileCopyrightText: 2026 adkafka Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rendering of EPICS `.substitutions` files.

use adkafka_core::AdkafkaError;
use adkafka_template::Substitutions;

/// Render records in the `msi`/`dbLoadTemplate` substitution format.
///
/// Consecutive records for the same template share a `file` block. A new
/// `pattern` line starts whenever a record's macro names differ from the
/// previous record's, so no row ever leaves a column undefined.
pub fn render_substitutions(records: &[Substitutions]) -> String {
    let mut out = String::new();
    let mut current_file: Option<&str> = None;
    let mut current_columns: Option<Vec<&str>> = None;

    for record in records {
        if current_file != Some(record.template_file.as_str()) {
            if current_file.is_some() {
                out.push_str("}\n\n");
            }
            out.push_str(&format!("file \"{}\"\n{{\n", record.template_file));
            current_file = Some(record.template_file.as_str());
            current_columns = None;
        }

        let columns: Vec<&str> = record.macros.keys().map(String::as_str).collect();
        if current_columns.as_ref() != Some(&columns) {
            out.push_str(&format!("pattern {{ {} }}\n", columns.join(", ")));
            current_columns = Some(columns);
        }

        let values: Vec<String> = record
            .macros
            .values()
            .map(String::as_str)
            .map(quote_value)
            .collect();
        out.push_str(&format!("    {{ {} }}\n", values.join(", ")));
    }

    if current_file.is_some() {
        out.push_str("}\n");
    }
    out
}

/// Render records as pretty-printed JSON.
pub fn render_json(records: &[Substitutions]) -> Result<String, AdkafkaError> {
    serde_json::to_string_pretty(records).map_err(|e| AdkafkaError::Serialization(e.to_string()))
}

fn quote_value(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}
