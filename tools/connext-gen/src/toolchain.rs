// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Locating the RTI Connext IDL compiler.

use crate::command::Platform;
use crate::error::{GenError, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Environment variable naming the Connext installation root.
pub const NDDSHOME: &str = "NDDSHOME";

/// Installation root assumed when `NDDSHOME` is unset (non-Windows only).
pub const DEFAULT_NDDSHOME: &str = "/usr";

/// Candidate generator executables for an installation root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub nddshome: PathBuf,
    pub ddsgen: PathBuf,
    pub ddsgen_server: PathBuf,
}

impl Toolchain {
    /// Resolve the installation root from `lookup` (usually the process
    /// environment).
    pub fn resolve<F>(platform: Platform, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let nddshome = match (lookup(NDDSHOME), platform) {
            (Some(home), _) => PathBuf::from(home),
            (None, Platform::Windows) => {
                return Err(GenError::EnvironmentMisconfigured(NDDSHOME.to_string()))
            }
            (None, Platform::Unix) => PathBuf::from(DEFAULT_NDDSHOME),
        };
        Ok(Self::at(nddshome, platform))
    }

    /// Executables below an explicit installation root.
    pub fn at(nddshome: impl Into<PathBuf>, platform: Platform) -> Self {
        let nddshome = nddshome.into();
        let (ddsgen, ddsgen_server) = match platform {
            Platform::Windows => ("rtiddsgen.bat", "rtiddsgen_server.bat"),
            Platform::Unix => ("rtiddsgen", "rtiddsgen_server"),
        };
        let bin = nddshome.join("bin");
        Self {
            ddsgen: bin.join(ddsgen),
            ddsgen_server: bin.join(ddsgen_server),
            nddshome,
        }
    }

    /// Pick the executable to run.
    ///
    /// The server variant wins when it exists and answers `-n_version`,
    /// otherwise the standard generator must exist.
    pub fn select(&self) -> Result<PathBuf> {
        if self.ddsgen_server.exists() && probe_version(&self.ddsgen_server) {
            tracing::debug!("Using {}", self.ddsgen_server.display());
            return Ok(self.ddsgen_server.clone());
        }
        if !self.ddsgen.exists() {
            return Err(GenError::ToolchainNotFound(self.ddsgen.clone()));
        }
        tracing::debug!("Using {}", self.ddsgen.display());
        Ok(self.ddsgen.clone())
    }
}

/// Whether `executable -n_version` exits successfully.
pub fn probe_version(executable: &Path) -> bool {
    match Command::new(executable)
        .arg("-n_version")
        .stdout(Stdio::null())
        .status()
    {
        Ok(status) => status.success(),
        Err(e) => {
            tracing::debug!("Probing {} failed: {}", executable.display(), e);
            false
        }
    }
}

/// Find the RTI Connext IDL compiler using the process environment.
pub fn find_rti_connext_idl_preprocessor() -> Result<PathBuf> {
    Toolchain::resolve(Platform::current(), |key| std::env::var_os(key))?.select()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_unix_default_root() {
        let toolchain = Toolchain::resolve(Platform::Unix, |_| None).unwrap();
        assert_eq!(toolchain.nddshome, PathBuf::from("/usr"));
        assert_eq!(toolchain.ddsgen, PathBuf::from("/usr/bin/rtiddsgen"));
        assert_eq!(
            toolchain.ddsgen_server,
            PathBuf::from("/usr/bin/rtiddsgen_server")
        );
    }

    #[test]
    fn test_windows_requires_nddshome() {
        let result = Toolchain::resolve(Platform::Windows, |_| None);
        assert!(matches!(
            result,
            Err(GenError::EnvironmentMisconfigured(ref var)) if var == "NDDSHOME"
        ));
    }

    #[test]
    fn test_windows_batch_names() {
        let toolchain = Toolchain::resolve(Platform::Windows, |key| {
            (key == NDDSHOME).then(|| OsString::from("C:/rti"))
        })
        .unwrap();
        assert_eq!(toolchain.ddsgen, Path::new("C:/rti").join("bin").join("rtiddsgen.bat"));
        assert_eq!(
            toolchain.ddsgen_server,
            Path::new("C:/rti").join("bin").join("rtiddsgen_server.bat")
        );
    }

    #[test]
    fn test_env_root_used() {
        let toolchain = Toolchain::resolve(Platform::Unix, |_| Some(OsString::from("/opt/rti")))
            .unwrap();
        assert_eq!(toolchain.ddsgen, PathBuf::from("/opt/rti/bin/rtiddsgen"));
    }

    #[test]
    fn test_nothing_installed() {
        let temp_dir = TempDir::new().unwrap();
        let toolchain = Toolchain::at(temp_dir.path(), Platform::Unix);
        match toolchain.select() {
            Err(GenError::ToolchainNotFound(path)) => assert_eq!(path, toolchain.ddsgen),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
