// SPDX-FileCopyrightText: 2026 adkafka Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the ADPluginKafka IOC builder.
//!
//! Holds the error type and the small set of build-time enums that every
//! other crate in the workspace agrees on.

pub mod error;
pub mod types;

pub use error::AdkafkaError;
pub use types::{HostArch, QuoteStyle, TemplateVariant, EPICS_HOST_ARCH_ENV};
