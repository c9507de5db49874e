// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Interface file arguments.
//!
//! An interface file is given either as a relative path, resolved against
//! the current directory, or as `prefix:relative/path`, where the relative
//! part is resolved against `prefix`. The relative part decides where the
//! generated code lands (`msg/Foo.idl` generates into `<output>/msg/`).

use crate::error::{GenError, Result};
use std::fmt;
use std::path::{Path, PathBuf};

/// An interface file split into absolute prefix and relative path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfacePath {
    prefix: PathBuf,
    relative: PathBuf,
}

impl InterfacePath {
    pub fn new(prefix: impl Into<PathBuf>, relative: impl Into<PathBuf>) -> Result<Self> {
        let prefix = prefix.into();
        let relative = relative.into();
        if relative.is_absolute() {
            return Err(GenError::InvalidInterfacePath {
                path: relative.display().to_string(),
                reason: "interface definition file path cannot be absolute".to_string(),
            });
        }
        Ok(Self { prefix, relative })
    }

    /// Parse `prefix:relative` or a bare relative path.
    ///
    /// The split happens at the last `:`.
    pub fn parse(arg: &str) -> Result<Self> {
        match arg.rsplit_once(':') {
            Some((prefix, relative)) => Self::new(absolute(Path::new(prefix))?, relative),
            None => Self::new(std::env::current_dir()?, arg),
        }
    }

    /// Interpret an existing path as `parent-of-parent : parent/name`.
    ///
    /// Used for files handed back by the translator, which writes
    /// `<output>/<subfolder>/<name>`.
    pub fn from_file(path: &Path) -> Result<Self> {
        let invalid = || GenError::InvalidInterfacePath {
            path: path.display().to_string(),
            reason: "expected <prefix>/<subfolder>/<file>".to_string(),
        };
        let name = path.file_name().ok_or_else(invalid)?;
        let folder = path.parent().ok_or_else(invalid)?;
        let subfolder = folder.file_name().ok_or_else(invalid)?;
        let prefix = folder.parent().ok_or_else(invalid)?;
        Self::new(absolute(prefix)?, Path::new(subfolder).join(name))
    }

    /// Interpret a path handed back by the translator: an existing file is
    /// split with [`InterfacePath::from_file`], anything else is parsed as
    /// tuple notation.
    pub fn from_translated(path: &Path) -> Result<Self> {
        if path.is_file() {
            Self::from_file(path)
        } else {
            Self::parse(&path.to_string_lossy())
        }
    }

    pub fn prefix(&self) -> &Path {
        &self.prefix
    }

    pub fn relative(&self) -> &Path {
        &self.relative
    }

    /// Absolute location of the file.
    pub fn path(&self) -> PathBuf {
        self.prefix.join(&self.relative)
    }

    /// Directory part of the relative path (`msg`, `srv`, `action`...).
    pub fn subfolder(&self) -> &Path {
        self.relative.parent().unwrap_or_else(|| Path::new(""))
    }

    /// File name without extension.
    pub fn stem(&self) -> String {
        self.relative
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn is_idl(&self) -> bool {
        self.relative.extension().is_some_and(|ext| ext == "idl")
    }
}

impl fmt::Display for InterfacePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}",
            self.prefix.display(),
            self.relative.to_string_lossy().replace('\\', "/")
        )
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// Split interface arguments by file name suffix.
///
/// Returns `(matching, rest)`, both in input order.
pub fn partition_by_suffix<'a>(files: &'a [String], suffix: &str) -> (Vec<&'a str>, Vec<&'a str>) {
    files
        .iter()
        .map(String::as_str)
        .partition(|path| path.ends_with(suffix))
}

/// IDL tuples (`prefix:relative`) out of interface arguments, skipping
/// anything that is not an `.idl` file.
pub fn idl_tuples_from_interface_files(files: &[String]) -> Result<Vec<InterfacePath>> {
    let mut tuples = Vec::with_capacity(files.len());
    for file in files {
        let interface = InterfacePath::parse(file)?;
        if interface.is_idl() {
            tuples.push(interface);
        }
    }
    Ok(tuples)
}

/// `CamelCase` to `lower_case_underscore`, the way generated file names are
/// spelled (`PointCloud2` becomes `point_cloud2`, `HTTPHeader` becomes
/// `http_header`).
pub fn camel_to_snake(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            {
                out.push('_');
            }
        }
        out.extend(c.to_lowercase());
    }
    out
}
