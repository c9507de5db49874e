// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Interface format translation.
//!
//! `.msg`, `.srv` and `.action` files are turned into IDL by the upstream
//! interface tooling. This module only defines the seam and a driver for the
//! `rosidl translate` command.

use crate::error::{GenError, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Output formats requested from the translator.
pub const FORMAT_IDL: &str = "idl";
pub const FORMAT_DDS_IDL: &str = "dds_idl";

/// Converts interface files between description formats.
pub trait Translator {
    /// Translate `interface_files` to `output_format` below `output_path`.
    ///
    /// Returns the translated files.
    fn translate(
        &self,
        package_name: &str,
        interface_files: &[&str],
        include_paths: &[PathBuf],
        output_format: &str,
        output_path: &Path,
    ) -> Result<Vec<PathBuf>>;
}

/// Runs `<program> translate ...` and reads one translated path per stdout
/// line.
#[derive(Debug, Clone)]
pub struct CommandTranslator {
    program: PathBuf,
}

impl CommandTranslator {
    pub const DEFAULT_PROGRAM: &'static str = "rosidl";

    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn build(
        &self,
        package_name: &str,
        interface_files: &[&str],
        include_paths: &[PathBuf],
        output_format: &str,
        output_path: &Path,
    ) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("translate")
            .arg("--output-format")
            .arg(output_format)
            .arg("--output-path")
            .arg(output_path);
        for include_path in include_paths {
            cmd.arg("-I").arg(include_path);
        }
        cmd.arg(package_name).args(interface_files);
        cmd
    }
}

impl Default for CommandTranslator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PROGRAM)
    }
}

impl Translator for CommandTranslator {
    fn translate(
        &self,
        package_name: &str,
        interface_files: &[&str],
        include_paths: &[PathBuf],
        output_format: &str,
        output_path: &Path,
    ) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(output_path)?;
        tracing::info!(
            "Translating {} interface file(s) of {} to {}",
            interface_files.len(),
            package_name,
            output_format
        );

        let failed = |reason: String| GenError::Translation {
            format: output_format.to_string(),
            reason,
        };
        let output = self
            .build(
                package_name,
                interface_files,
                include_paths,
                output_format,
                output_path,
            )
            .stderr(Stdio::inherit())
            .output()
            .map_err(|e| failed(format!("{}: {e}", self.program.display())))?;
        if !output.status.success() {
            return Err(failed(format!(
                "{} exited with {}",
                self.program.display(),
                output.status
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(PathBuf::from)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line() {
        let translator = CommandTranslator::default();
        let cmd = translator.build(
            "pkg",
            &["p:msg/A.msg", "p:srv/B.srv"],
            &[PathBuf::from("/inc")],
            FORMAT_DDS_IDL,
            Path::new("/out/tmp"),
        );
        assert_eq!(cmd.get_program(), "rosidl");
        let args: Vec<_> = cmd
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec![
                "translate",
                "--output-format",
                "dds_idl",
                "--output-path",
                "/out/tmp",
                "-I",
                "/inc",
                "pkg",
                "p:msg/A.msg",
                "p:srv/B.srv",
            ]
        );
    }
}
