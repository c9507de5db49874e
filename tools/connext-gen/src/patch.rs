// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Post-processing of `rtiddsgen` output.
//!
//! GCC has no way to silence `-Wunused-variable` for a single global, and
//! the generated headers define string constants as
//! `static const DDS_Char * Constants__...`. Those lines get
//! `__attribute__((unused))` prepended.

use crate::error::Result;
use std::fs;
use std::path::Path;

/// Prefix of the string constant definitions emitted by `rtiddsgen`.
pub const CONSTANT_PREFIX: &str = "static const DDS_Char * Constants__";

/// Annotation injected before [`CONSTANT_PREFIX`].
pub const UNUSED_ATTRIBUTE: &str = "__attribute__((unused)) ";

/// Rewrite `path` through `callback`.
///
/// The file is split on `\n` and joined back the same way, so line endings
/// and a trailing newline survive. Nothing is written unless the callback
/// reports a modification.
pub fn modify_file<F>(path: &Path, callback: F) -> Result<bool>
where
    F: FnOnce(&mut [String]) -> bool,
{
    let content = fs::read_to_string(path)?;
    let mut lines: Vec<String> = content.split('\n').map(str::to_string).collect();

    let modified = callback(lines.as_mut_slice());
    if modified {
        fs::write(path, lines.join("\n"))?;
    }
    Ok(modified)
}

/// Prepend [`UNUSED_ATTRIBUTE`] to every string constant definition.
///
/// Matching lines lose their leading indentation.
pub fn inject_unused_attribute(lines: &mut [String]) -> bool {
    let mut modified = false;
    for line in lines.iter_mut() {
        let trimmed = line.trim_start();
        if !trimmed.starts_with(CONSTANT_PREFIX) {
            continue;
        }
        *line = format!("{UNUSED_ATTRIBUTE}{trimmed}");
        modified = true;
    }
    modified
}

/// Patch a generated message header in place.
pub fn patch_generated_header(path: &Path) -> Result<bool> {
    let modified = modify_file(path, inject_unused_attribute)?;
    if modified {
        tracing::debug!("Injected unused attribute into {}", path.display());
    }
    Ok(modified)
}
