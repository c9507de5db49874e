// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Generic IDL to Connext IDL dialect conversion.
//!
//! `rtiddsgen` has no fixed-width integer primitives, so `int8` .. `uint64`
//! are rewritten to their classic IDL spellings. A token is only rewritten
//! when it is bounded on both sides by `<`, `>`, `,` or whitespace, which
//! leaves identifiers such as `myint8field` alone.

use crate::error::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Fixed-width token and its Connext spelling, in application order.
pub const TYPE_SUBSTITUTIONS: [(&str, &str); 8] = [
    ("int8", "octet"),
    ("uint8", "octet"),
    ("int16", "short"),
    ("uint16", "unsigned short"),
    ("int32", "long"),
    ("uint32", "unsigned long"),
    ("int64", "long long"),
    ("uint64", "unsigned long long"),
];

/// Line rewriter applying [`TYPE_SUBSTITUTIONS`] one after the other.
#[derive(Debug, Clone)]
pub struct DialectConverter {
    rules: Vec<(Regex, String)>,
}

impl DialectConverter {
    pub fn new() -> Result<Self> {
        let rules = TYPE_SUBSTITUTIONS
            .iter()
            .map(|(token, replacement)| {
                let re = Regex::new(&format!(r"([<>,\s]){}([<>,\s])", regex::escape(token)))?;
                Ok((re, format!("${{1}}{replacement}${{2}}")))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Rewrite a single line.
    ///
    /// Each pattern consumes its boundary characters, so of two tokens sharing
    /// one separator (`<int8,int8>`) only the first is rewritten by a pass.
    pub fn convert_line(&self, line: &str) -> String {
        let mut out = line.to_string();
        for (re, replacement) in &self.rules {
            out = re.replace_all(&out, replacement.as_str()).into_owned();
        }
        out
    }

    /// Rewrite a whole document line by line, keeping line terminators.
    pub fn convert_str(&self, content: &str) -> String {
        content
            .split_inclusive('\n')
            .map(|line| self.convert_line(line))
            .collect()
    }

    /// Convert `input` and write the result below `output_base`.
    ///
    /// Returns the path of the written file. An existing file at that path
    /// is overwritten.
    pub fn convert_file(&self, input: &Path, output_base: &Path) -> Result<PathBuf> {
        self.convert_into(input, &mirrored_output_dir(input, output_base))
    }

    /// Convert `input` into `output_dir`, keeping its file name.
    pub fn convert_into(&self, input: &Path, output_dir: &Path) -> Result<PathBuf> {
        let content = fs::read_to_string(input)?;

        fs::create_dir_all(output_dir)?;
        let output = match input.file_name() {
            Some(name) => output_dir.join(name),
            None => output_dir.to_path_buf(),
        };

        fs::write(&output, self.convert_str(&content))?;
        tracing::debug!("Converted {} -> {}", input.display(), output.display());
        Ok(output)
    }
}

/// Convert a generic IDL file to a Connext compatible one.
///
/// The new file keeps the base name of `input` and lands in
/// `{output_base}/{grandparent}/{parent}/`.
pub fn convert_to_connext_idl(input: &Path, output_base: &Path) -> Result<PathBuf> {
    DialectConverter::new()?.convert_file(input, output_base)
}

/// `{output_base}/{basename(dirname(dirname(path)))}/{basename(dirname(path))}`
pub fn mirrored_output_dir(path: &Path, output_base: &Path) -> PathBuf {
    let folder = path.parent().unwrap_or_else(|| Path::new(""));
    let parent_folder = folder.parent().unwrap_or_else(|| Path::new(""));
    let mut dir = output_base.to_path_buf();
    for level in [parent_folder, folder] {
        if let Some(name) = level.file_name() {
            dir.push(name);
        }
    }
    dir
}
