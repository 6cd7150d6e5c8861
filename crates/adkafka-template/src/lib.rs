// SPDX-FileCopyrightText: 2026 adkafka Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database template composition for the ADPluginKafka IOC builder.
//!
//! `ADPluginKafka.template` includes one of two base template sets. Each
//! template is a [`TemplateFragment`] declaring the macros it reads; a
//! [`TemplateLayout`] lists the fragments for a variant, and
//! [`template_substitutions`] merges their macro maps for one plugin.

pub mod catalog;
pub mod fragment;
pub mod substitution;

pub use catalog::{builtin_fragments, TemplateLayout, KAFKA_TEMPLATE_FILE};
pub use fragment::{FragmentProducer, MacroMap, MacroSource, MacroSpec, PluginField, TemplateFragment};
pub use substitution::{merge_fragments, template_substitutions, Substitutions};
