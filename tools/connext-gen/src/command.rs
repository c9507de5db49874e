// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! `rtiddsgen` command line construction.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Platform family, as far as `rtiddsgen` invocation is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Unix,
}

impl Platform {
    /// Platform this binary was built for.
    pub const fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Unix
        }
    }

    pub fn is_windows(self) -> bool {
        matches!(self, Self::Windows)
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::current()
    }
}

/// Ordered argv for one `rtiddsgen` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDescriptor {
    program: PathBuf,
    args: Vec<OsString>,
}

impl CommandDescriptor {
    /// Build the invocation for `idl_file`.
    ///
    /// On Windows `-dllExportMacroSuffix <package>` is spliced in five
    /// arguments from the end of the argv, ahead of `-namespace`.
    pub fn build(
        program: &Path,
        package_name: &str,
        include_dirs: &[PathBuf],
        output_dir: &Path,
        idl_file: &Path,
        platform: Platform,
    ) -> Self {
        let mut args: Vec<OsString> = Vec::with_capacity(include_dirs.len() * 2 + 12);
        for include_dir in include_dirs {
            args.push("-I".into());
            args.push(include_dir.into());
        }
        args.push("-d".into());
        args.push(output_dir.into());
        args.extend(
            ["-language", "C++", "-namespace", "-update", "typefiles", "-unboundedSupport"]
                .iter()
                .map(OsString::from),
        );
        args.push(idl_file.into());

        let mut cmd = Self {
            program: program.to_path_buf(),
            args,
        };
        if platform.is_windows() {
            // Position is counted on the full argv, program included.
            let at = cmd.argv_len() - 5;
            cmd.insert(at, ["-dllExportMacroSuffix".into(), package_name.into()]);
        }
        cmd
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Length of the full argv, program included.
    pub fn argv_len(&self) -> usize {
        self.args.len() + 1
    }

    /// Full argv, program first.
    pub fn argv(&self) -> Vec<OsString> {
        std::iter::once(self.program.clone().into_os_string())
            .chain(self.args.iter().cloned())
            .collect()
    }

    fn insert(&mut self, argv_index: usize, items: [OsString; 2]) {
        let at = argv_index.saturating_sub(1);
        let tail = self.args.split_off(at);
        self.args.extend(items);
        self.args.extend(tail);
    }

    pub fn to_command(&self) -> std::process::Command {
        let mut command = std::process::Command::new(&self.program);
        command.args(&self.args);
        command
    }
}

impl std::fmt::Display for CommandDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}
