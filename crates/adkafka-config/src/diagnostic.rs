// SPDX-FileCopyrightText: 2026 adkafka Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Validation errors and the Figment-to-miette error bridge.
//!
//! Field-level problems are [`ValidationError`]s. Everything the loader or the
//! cross-plugin checks report is a [`ConfigError`], which renders as an
//! Elm-style miette diagnostic with source spans and "did you mean?"
//! suggestions based on Jaro-Winkler similarity.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use strum::Display;
use thiserror::Error;

/// Minimum Jaro-Winkler similarity score to suggest a correction.
/// Catches typos like `brokr_address` -> `broker_address` and
/// `plugin-bse` -> `plugin-base` while filtering noise.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// Category of a field validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ValidationKind {
    MissingField,
    InvalidType,
    OutOfRange,
}

/// A single field that failed validation. Always names the field.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ValidationError {
    /// A required field is absent or empty.
    #[error("missing required field `{field}`")]
    #[diagnostic(
        code(adkafka::config::missing_field),
        help("set `{field}` to a non-empty value")
    )]
    MissingField { field: String },

    /// A field has a value that cannot be coerced to its type.
    #[error("invalid type for `{field}`: expected {expected}, found {found}")]
    #[diagnostic(code(adkafka::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        field: String,
        expected: String,
        found: String,
    },

    /// A numeric field is outside its permitted range.
    #[error("`{field}` is out of range: got {value}, must be {constraint}")]
    #[diagnostic(code(adkafka::config::out_of_range))]
    OutOfRange {
        field: String,
        value: String,
        constraint: String,
    },
}

impl ValidationError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    pub fn invalid_type(
        field: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::InvalidType {
            field: field.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn out_of_range(
        field: impl Into<String>,
        value: impl ToString,
        constraint: impl Into<String>,
    ) -> Self {
        Self::OutOfRange {
            field: field.into(),
            value: value.to_string(),
            constraint: constraint.into(),
        }
    }

    pub fn kind(&self) -> ValidationKind {
        match self {
            ValidationError::MissingField { .. } => ValidationKind::MissingField,
            ValidationError::InvalidType { .. } => ValidationKind::InvalidType,
            ValidationError::OutOfRange { .. } => ValidationKind::OutOfRange,
        }
    }

    /// The offending field name.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::MissingField { field }
            | ValidationError::InvalidType { field, .. }
            | ValidationError::OutOfRange { field, .. } => field,
        }
    }
}

/// A configuration error with rich diagnostic information.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// An unknown key was found in the configuration.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(adkafka::config::unknown_key),
        help("{}", format_unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        /// The unrecognized key name.
        key: String,
        /// Suggested correction via fuzzy matching, if any.
        suggestion: Option<String>,
        /// List of valid keys for the section.
        valid_keys: String,
        #[label("this key is not recognized")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// An enum-valued key (e.g. `build.variant`) has an unknown value.
    #[error("unknown value `{value}` for `{key}`")]
    #[diagnostic(
        code(adkafka::config::unknown_value),
        help("{}", format_unknown_key_help(suggestion.as_deref(), valid_values))
    )]
    UnknownValue {
        key: String,
        value: String,
        suggestion: Option<String>,
        valid_values: String,
    },

    /// A configuration value has the wrong type at parse time.
    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(code(adkafka::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        key: String,
        detail: String,
        expected: String,
    },

    /// A required key is missing at parse time.
    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(adkafka::config::missing_key),
        help("add `{key} = <value>` to your adkafka.toml")
    )]
    MissingKey { key: String },

    /// A `[[plugin]]` entry failed field validation.
    #[error("plugin `{plugin}`: {source}")]
    #[diagnostic(code(adkafka::config::plugin))]
    Plugin {
        /// Port name of the plugin, or `plugin[N]` when it has none.
        plugin: String,
        #[source]
        #[diagnostic_source]
        source: ValidationError,
    },

    /// A validation error spanning the whole build (duplicate ports, no plugins).
    #[error("validation error: {message}")]
    #[diagnostic(code(adkafka::config::validation))]
    Validation { message: String },

    /// Catch-all for other configuration errors.
    #[error("configuration error: {0}")]
    #[diagnostic(code(adkafka::config::other))]
    Other(String),
}

impl ConfigError {
    /// The underlying field error, if this is a per-plugin validation failure.
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            ConfigError::Plugin { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Format the help message for unknown key errors.
fn format_unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid values: {valid_keys}"),
        None => format!("valid values: {valid_keys}"),
    }
}

/// Convert a `figment::Error` into a list of `ConfigError` diagnostics.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    use figment::error::Kind;

    let mut errors = Vec::new();

    for error in err {
        let key = error
            .path
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(".");

        let config_error = match &error.kind {
            Kind::UnknownField(field, expected) => {
                let valid_keys: Vec<&str> = expected.to_vec();
                let suggestion = suggest_key(field, &valid_keys);
                let (span, src) = find_source_span(&error, field, toml_sources);

                ConfigError::UnknownKey {
                    key: field.clone(),
                    suggestion,
                    valid_keys: valid_keys.join(", "),
                    span,
                    src,
                }
            }
            Kind::UnknownVariant(value, expected) => {
                let valid: Vec<&str> = expected.to_vec();
                ConfigError::UnknownValue {
                    key,
                    value: value.clone(),
                    suggestion: suggest_key(value, &valid),
                    valid_values: valid.join(", "),
                }
            }
            Kind::MissingField(field) => ConfigError::MissingKey {
                key: field.clone().into_owned(),
            },
            Kind::InvalidType(actual, expected) => ConfigError::InvalidType {
                key,
                detail: format!("found {actual}, expected {expected}"),
                expected: expected.to_string(),
            },
            _ => ConfigError::Other(format!("{error}")),
        };

        errors.push(config_error);
    }

    errors
}

/// Find source span for an error in the TOML source files.
fn find_source_span(
    error: &figment::error::Error,
    field: &str,
    toml_sources: &[(String, String)],
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let source_path = error
        .metadata
        .as_ref()
        .and_then(|m| m.source.as_ref())
        .and_then(|s| match s {
            figment::Source::File(path) => Some(path.display().to_string()),
            _ => None,
        });

    // Inline sources carry no file path; fall back to the only source given.
    let source = match source_path {
        Some(path) => toml_sources
            .iter()
            .find(|(p, _)| *p == path)
            .map(|(p, content)| (p.as_str(), content.as_str())),
        None if toml_sources.len() == 1 => toml_sources
            .first()
            .map(|(p, content)| (p.as_str(), content.as_str())),
        None => None,
    };

    if let Some((path, content)) = source {
        let section: Vec<String> = error.path.iter().map(|s| s.to_string()).collect();

        if let Some(offset) = find_key_offset(content, &section, field) {
            let span = SourceSpan::new(offset.into(), field.len());
            let named = NamedSource::new(path, content.to_string());
            return (Some(span), Some(named));
        }
    }

    (None, None)
}

/// Find the byte offset of a key in TOML content, relative to a section path.
///
/// For `path = ["build"]` and `field = "varient"`, finds the `[build]` header
/// and searches for `varient` after it. Array tables (`[[plugin]]`) match
/// on the same header text. Top-level fields are searched from the start.
pub fn find_key_offset(content: &str, path: &[String], field: &str) -> Option<usize> {
    let search_start = match path.first() {
        None => 0,
        Some(section) => {
            let header = format!("[{section}]");
            content.find(&header).map(|pos| pos + header.len())?
        }
    };

    let remaining = &content[search_start..];

    let mut byte_offset = 0;
    for line in remaining.lines() {
        let trimmed = line.trim_start();
        if let Some(after) = trimmed.strip_prefix(field)
            && (after.starts_with(' ') || after.starts_with('=') || after.starts_with('\t'))
        {
            let field_start_in_line = line.len() - trimmed.len();
            return Some(search_start + byte_offset + field_start_in_line);
        }
        byte_offset += line.len() + 1;
    }

    None
}

/// Suggest a similar key name using Jaro-Winkler string similarity.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    let mut best_score = SUGGESTION_THRESHOLD;
    let mut best_match = None;

    for &key in valid_keys {
        let score = strsim::jaro_winkler(unknown, key);
        if score > best_score {
            best_score = score;
            best_match = Some(key.to_string());
        }
    }

    best_match
}

/// Render a list of `ConfigError`s to stderr using miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    use miette::GraphicalReportHandler;

    let handler = GraphicalReportHandler::new();
    for error in errors {
        let mut buf = String::new();
        let diagnostic: &dyn Diagnostic = error;
        if handler.render_report(&mut buf, diagnostic).is_ok() {
            eprint!("{buf}");
        } else {
            eprintln!("Error: {error}");
        }
    }
}
