// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for IDL conversion and code generation.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, GenError>;

/// Generation errors.
///
/// Every variant is fatal for the package being generated: the first error
/// stops the run.
#[derive(Debug, Error)]
pub enum GenError {
    /// A referenced interface file does not exist.
    #[error("Could not find IDL file: {}", .0.display())]
    MissingInput(PathBuf),

    /// The external generator could not be spawned or exited non-zero.
    #[error("'{}' failed: {reason}", .program.display())]
    GeneratorFailed { program: PathBuf, reason: String },

    /// The generator exited cleanly but never produced the full output set.
    #[error("failed to generate the expected files for '{package}/{interface}' after {attempts} attempts")]
    OutputVerification {
        package: String,
        interface: String,
        attempts: u32,
    },

    /// The vendor IDL compiler is not installed under the resolved root.
    #[error("{} could not be found", .0.display())]
    ToolchainNotFound(PathBuf),

    /// A required environment variable is not set.
    #[error("\"{0}\" not set")]
    EnvironmentMisconfigured(String),

    /// Malformed `prefix:relative` interface path.
    #[error("Invalid interface path '{path}': {reason}")]
    InvalidInterfacePath { path: String, reason: String },

    /// The external format translator failed.
    #[error("Translation to '{format}' failed: {reason}")]
    Translation { format: String, reason: String },

    #[error("Invalid substitution pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("Generator arguments error: {0}")]
    Arguments(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GenError {
    pub(crate) fn generator_status(program: &std::path::Path, status: ExitStatus) -> Self {
        let reason = match status.code() {
            Some(code) => format!("exited with status {code}"),
            None => "terminated by signal".to_string(),
        };
        Self::GeneratorFailed {
            program: program.to_path_buf(),
            reason,
        }
    }
}
