// SPDX-FileCopyrightText: 2026 adkafka Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the ADPluginKafka IOC builder.

use std::path::PathBuf;

use thiserror::Error;

/// The primary error type used by the assembly and CLI layers.
///
/// Field-level validation problems are reported through the richer
/// diagnostics of `adkafka-config`; this type carries them once they have
/// been rendered or aggregated.
#[derive(Debug, Error)]
pub enum AdkafkaError {
    /// Configuration errors, already rendered as diagnostics.
    #[error("configuration error: {0}")]
    Config(String),

    /// Reading or writing a build artifact failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Structured output could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl AdkafkaError {
    /// Wrap an I/O error together with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
