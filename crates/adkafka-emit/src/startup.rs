// SPDX-FileCopyrightText: 2026 adkafka Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `KafkaPluginConfigure` startup-script line.

use adkafka_config::model::field;
use adkafka_config::PluginConfig;
use adkafka_core::QuoteStyle;
use serde::Serialize;

/// iocsh command registered by the plugin.
pub const CONFIGURE_COMMAND: &str = "KafkaPluginConfigure";

/// `maxMemory` value meaning "no limit on the NDArray pool".
pub const MAX_MEMORY_UNBOUNDED: i64 = -1;

/// Comment printed above each configure line, documenting the argument order.
pub const SIGNATURE_COMMENT: &str = "# KafkaPluginConfigure(portName, queueSize, blockingCallbacks, NDArrayPort, NDArrayAddr, maxMemory, brokerAddress, topic)";

/// Format the configure line for `config`.
///
/// Argument order is fixed: port, queue size, blocking flag, NDArray port,
/// NDArray address, `-1`, broker address, topic. Port names are always
/// quoted; with [`QuoteStyle::Legacy`] the broker address and topic are
/// written as bare words.
///
/// Port names are escaped with [`quote`] in both styles, so a port name
/// containing `"` or `\` differs from the legacy builder, which pasted it
/// between quotes unescaped and produced a line iocsh could not parse.
pub fn emit(config: &PluginConfig, style: QuoteStyle) -> String {
    format!(
        "{CONFIGURE_COMMAND}({}, {}, {}, {}, {}, {MAX_MEMORY_UNBOUNDED}, {}, {})",
        quote(config.port()),
        config.queue_depth(),
        u8::from(config.blocking()),
        quote(config.array_source_port()),
        config.array_source_address(),
        styled(config.broker_address(), style),
        styled(config.topic(), style),
    )
}

/// The signature comment followed by the configure line.
pub fn startup_block(config: &PluginConfig, style: QuoteStyle) -> String {
    format!("{SIGNATURE_COMMENT}\n{}\n", emit(config, style))
}

fn styled(value: &str, style: QuoteStyle) -> String {
    match style {
        QuoteStyle::Legacy => value.to_string(),
        QuoteStyle::Quoted => quote(value),
    }
}

/// Double-quote an iocsh string argument, escaping `\` and `"`.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// A bare-word argument iocsh would not read back as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hazard {
    pub port: String,
    pub field: &'static str,
    pub value: String,
    pub reason: String,
}

/// Characters that end or alter an unquoted iocsh word.
const SEPARATORS: &[char] = &[',', '(', ')', '"', '\'', '\\'];

/// Values that would be split or mangled when written unquoted.
///
/// Only meaningful for [`QuoteStyle::Legacy`]; quoted output has no hazards.
/// A comma-separated broker list is the common case.
pub fn unquoted_hazards(config: &PluginConfig, style: QuoteStyle) -> Vec<Hazard> {
    if style == QuoteStyle::Quoted {
        return Vec::new();
    }

    [
        (field::BROKER_ADDRESS, config.broker_address()),
        (field::TOPIC, config.topic()),
    ]
    .into_iter()
    .filter_map(|(name, value)| {
        let offending = value
            .chars()
            .find(|c| c.is_whitespace() || SEPARATORS.contains(c))?;
        let reason = if offending.is_whitespace() {
            "contains whitespace".to_string()
        } else {
            format!("contains `{offending}`")
        };
        Some(Hazard {
            port: config.port().to_string(),
            field: name,
            value: value.to_string(),
            reason,
        })
    })
    .collect()
}
