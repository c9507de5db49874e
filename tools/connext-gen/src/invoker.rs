// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! `rtiddsgen` driver.
//!
//! For every IDL file: convert it to the Connext dialect, run the generator,
//! check the six expected sources exist, and patch the message header.
//!
//! A generator that exits non-zero fails the run right away. A generator that
//! exits zero without producing every expected file is run again, up to
//! [`RetryPolicy::MAX_ATTEMPTS`] times in total.

use crate::command::{CommandDescriptor, Platform};
use crate::error::{GenError, Result};
use crate::idl::{mirrored_output_dir, DialectConverter};
use crate::patch::patch_generated_header;
use std::fs;
use std::path::{Path, PathBuf};

/// Suffixes `rtiddsgen` appends to the interface stem.
pub const GENERATED_SUFFIXES: [&str; 6] = [
    ".h",
    ".cxx",
    "Plugin.h",
    "Plugin.cxx",
    "Support.h",
    "Support.cxx",
];

/// Expected generator outputs for `stem` in `output_dir`.
pub fn expected_outputs(output_dir: &Path, stem: &str) -> Vec<PathBuf> {
    GENERATED_SUFFIXES
        .iter()
        .map(|suffix| output_dir.join(format!("{stem}{suffix}")))
        .collect()
}

/// Bounded reinvocation on output verification failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
}

impl RetryPolicy {
    /// Hard upper bound on generator runs per interface.
    pub const MAX_ATTEMPTS: u32 = 5;

    /// Policy allowing `max_attempts` runs, clamped to `1..=MAX_ATTEMPTS`.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.clamp(1, Self::MAX_ATTEMPTS),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Run `step` until `done` holds, at most `max_attempts` times.
    ///
    /// Errors from `step` are returned as is. Returns the attempt number that
    /// satisfied `done`, or `None` once the attempts are exhausted.
    pub fn run<S, D>(&self, mut step: S, mut done: D) -> Result<Option<u32>>
    where
        S: FnMut(u32) -> Result<()>,
        D: FnMut(u32) -> bool,
    {
        for attempt in 1..=self.max_attempts {
            step(attempt)?;
            if done(attempt) {
                return Ok(Some(attempt));
            }
        }
        Ok(None)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::MAX_ATTEMPTS)
    }
}

/// Drives the Connext IDL compiler for one package.
#[derive(Debug, Clone)]
pub struct Invoker {
    idl_pp: PathBuf,
    platform: Platform,
    retry: RetryPolicy,
}

impl Invoker {
    /// Invoker for the generator executable `idl_pp`.
    pub fn new(idl_pp: impl Into<PathBuf>) -> Self {
        Self {
            idl_pp: idl_pp.into(),
            platform: Platform::current(),
            retry: RetryPolicy::default(),
        }
    }

    /// Override the platform family used for flags and patching.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn idl_pp(&self) -> &Path {
        &self.idl_pp
    }

    /// Generate sources for each IDL file into its two-level mirrored
    /// directory below `output_base`.
    ///
    /// Stops at the first error. Returns every generated file, in input order.
    pub fn generate(
        &self,
        package_name: &str,
        idl_files: &[PathBuf],
        include_dirs: &[PathBuf],
        output_base: &Path,
    ) -> Result<Vec<PathBuf>> {
        let mut generated = Vec::with_capacity(idl_files.len() * GENERATED_SUFFIXES.len());
        for idl_file in idl_files {
            if !idl_file.exists() {
                return Err(GenError::MissingInput(idl_file.clone()));
            }
            let output_dir = mirrored_output_dir(idl_file, output_base);
            generated.extend(self.generate_file(package_name, idl_file, include_dirs, &output_dir)?);
        }
        Ok(generated)
    }

    /// Generate sources for a single IDL file into `output_dir`.
    pub fn generate_file(
        &self,
        package_name: &str,
        idl_file: &Path,
        include_dirs: &[PathBuf],
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>> {
        if !idl_file.exists() {
            return Err(GenError::MissingInput(idl_file.to_path_buf()));
        }
        fs::create_dir_all(output_dir)?;

        let converted = DialectConverter::new()?.convert_into(idl_file, output_dir)?;
        let cmd = CommandDescriptor::build(
            &self.idl_pp,
            package_name,
            include_dirs,
            output_dir,
            &converted,
            self.platform,
        );

        let msg_name = idl_file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let outputs = expected_outputs(output_dir, &msg_name);

        tracing::info!("Generating Connext sources for {}/{}", package_name, msg_name);
        let max_attempts = self.retry.max_attempts();
        let verified = self.retry.run(
            |attempt| {
                if attempt > 1 {
                    tracing::warn!(
                        "Running code generator again (retry {} of {})...",
                        attempt,
                        max_attempts
                    );
                }
                self.execute(&cmd)
            },
            |_| {
                let complete = outputs.iter().all(|path| path.exists());
                if !complete {
                    tracing::warn!(
                        "'{}' failed to generate the expected files for '{}/{}'",
                        self.idl_pp.display(),
                        package_name,
                        msg_name
                    );
                }
                complete
            },
        )?;

        if verified.is_none() {
            return Err(GenError::OutputVerification {
                package: package_name.to_string(),
                interface: msg_name,
                attempts: max_attempts,
            });
        }

        if !self.platform.is_windows() {
            patch_generated_header(&outputs[0])?;
        }

        Ok(outputs)
    }

    fn execute(&self, cmd: &CommandDescriptor) -> Result<()> {
        tracing::debug!("Running: {}", cmd);
        let status = cmd
            .to_command()
            .status()
            .map_err(|e| GenError::GeneratorFailed {
                program: cmd.program().to_path_buf(),
                reason: e.to_string(),
            })?;
        if !status.success() {
            return Err(GenError::generator_status(cmd.program(), status));
        }
        Ok(())
    }
}

/// Run `idl_pp` over `idl_files` with the default policy for this platform.
pub fn generate_dds_connext_cpp(
    package_name: &str,
    idl_files: &[PathBuf],
    include_dirs: &[PathBuf],
    output_base: &Path,
    idl_pp: &Path,
) -> Result<Vec<PathBuf>> {
    Invoker::new(idl_pp).generate(package_name, idl_files, include_dirs, output_base)
}
