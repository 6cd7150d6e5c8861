// SPDX-FileCopyrightText: 2026 adkafka Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text emission for the ADPluginKafka IOC builder.
//!
//! Turns validated plugin configurations into the `KafkaPluginConfigure`
//! startup-script lines and the `ADPluginKafka.template` substitution file.
//! Nothing here performs I/O; writing the text is the caller's job.

pub mod assemble;
pub mod startup;
pub mod substitutions;

pub use assemble::{assemble, BuildInfo, IocArtifacts};
pub use adkafka_core::QuoteStyle;
pub use startup::{emit, startup_block, unquoted_hazards, Hazard};
pub use substitutions::{render_json, render_substitutions};
