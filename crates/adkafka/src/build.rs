// SPDX-FileCopyrightText: 2026 adkafka Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `adkafka build` command implementation.
//!
//! Renders every artifact before touching the output directory, then writes
//! each file through a temporary file in the same directory so a failed run
//! never leaves a half-written script behind.

use std::io::Write;
use std::path::{Path, PathBuf};

use adkafka_core::AdkafkaError;
use adkafka_emit::IocArtifacts;
use tempfile::NamedTempFile;

/// iocsh script with the `KafkaPluginConfigure` lines.
pub const STARTUP_FILE: &str = "kafka-plugins.cmd";
/// Substitutions for `ADPluginKafka.template`.
pub const SUBSTITUTIONS_FILE: &str = "ADPluginKafka.substitutions";
/// Machine-readable summary of the build.
pub const BUILD_INFO_FILE: &str = "build-info.json";

/// Run the `adkafka build` command.
pub fn run_build(artifacts: &IocArtifacts, out_dir: &Path) -> Result<(), AdkafkaError> {
    let written = write_artifacts(artifacts, out_dir)?;
    for path in &written {
        println!("wrote {}", path.display());
    }
    Ok(())
}

/// Write all artifacts into `out_dir`, returning the paths written.
pub fn write_artifacts(
    artifacts: &IocArtifacts,
    out_dir: &Path,
) -> Result<Vec<PathBuf>, AdkafkaError> {
    let build_info = serde_json::to_string_pretty(&artifacts.build_info())
        .map_err(|e| AdkafkaError::Serialization(e.to_string()))?;
    let files = [
        (STARTUP_FILE, artifacts.startup.clone()),
        (SUBSTITUTIONS_FILE, artifacts.substitutions_file()),
        (BUILD_INFO_FILE, format!("{build_info}\n")),
    ];

    std::fs::create_dir_all(out_dir).map_err(|e| AdkafkaError::io(out_dir, e))?;

    let mut written = Vec::with_capacity(files.len());
    for (name, contents) in files {
        let path = out_dir.join(name);
        write_atomic(&path, out_dir, &contents)?;
        tracing::debug!(path = %path.display(), bytes = contents.len(), "artifact written");
        written.push(path);
    }
    tracing::info!(dir = %out_dir.display(), files = written.len(), "IOC build written");
    Ok(written)
}

fn write_atomic(path: &Path, dir: &Path, contents: &str) -> Result<(), AdkafkaError> {
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| AdkafkaError::io(dir, e))?;
    tmp.write_all(contents.as_bytes())
        .map_err(|e| AdkafkaError::io(tmp.path(), e))?;
    tmp.persist(path)
        .map_err(|e| AdkafkaError::io(path, e.error))?;
    Ok(())
}
