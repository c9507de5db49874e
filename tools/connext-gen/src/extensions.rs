// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! `generate` command extensions.
//!
//! Two entry points are registered under the name [`EXTENSION_NAME`]:
//! - [`ExtensionKind::Type`]: Connext IDL plus `rtiddsgen` sources,
//! - [`ExtensionKind::Typesupport`]: visibility header and templated glue.

use crate::command::Platform;
use crate::error::Result;
use crate::interface::{partition_by_suffix, InterfacePath};
use crate::invoker::Invoker;
use crate::templates::{
    generate_visibility_control_file, GeneratorArguments, TypeSupportTemplates, VISIBILITY_HEADER,
    VISIBILITY_TEMPLATE,
};
use crate::toolchain::{find_rti_connext_idl_preprocessor, Toolchain};
use crate::translate::{CommandTranslator, Translator, FORMAT_DDS_IDL, FORMAT_IDL};
use std::fs;
use std::path::{Path, PathBuf};

/// Name both extensions are registered under.
pub const EXTENSION_NAME: &str = "connext_cpp";

/// Suffix of files already in the Connext IDL dialect.
pub const DDS_IDL_SUFFIX: &str = "_.idl";

/// Suffix of plain IDL files.
pub const IDL_SUFFIX: &str = ".idl";

/// A code generation plugin.
pub trait GenerateCommandExtension {
    /// Generate code for `interface_files` of `package_name` into
    /// `output_path`, returning the generated files.
    fn generate(
        &self,
        package_name: &str,
        interface_files: &[String],
        include_paths: &[PathBuf],
        output_path: &Path,
    ) -> Result<Vec<PathBuf>>;
}

/// Extension point kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionKind {
    Type,
    Typesupport,
}

/// How the generator executable is found.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Locator {
    /// `NDDSHOME` lookup with server variant probing.
    #[default]
    Environment,
    /// An installation root given explicitly.
    Root(PathBuf),
    /// A generator executable given explicitly.
    Executable(PathBuf),
}

impl Locator {
    pub fn locate(&self, platform: Platform) -> Result<PathBuf> {
        match self {
            Self::Environment => find_rti_connext_idl_preprocessor(),
            Self::Root(root) => Toolchain::at(root, platform).select(),
            Self::Executable(path) => Ok(path.clone()),
        }
    }
}

/// Shared extension settings.
pub struct ExtensionContext {
    pub translator: Box<dyn Translator>,
    pub locator: Locator,
    pub platform: Platform,
    pub template_dir: Option<PathBuf>,
}

impl Default for ExtensionContext {
    fn default() -> Self {
        Self {
            translator: Box::new(CommandTranslator::default()),
            locator: Locator::default(),
            platform: Platform::current(),
            template_dir: None,
        }
    }
}

impl ExtensionContext {
    /// Interface tuples for `interface_files`, translating anything not
    /// ending in `suffix` to `output_format` below `{output_path}/tmp`.
    fn normalize(
        &self,
        package_name: &str,
        interface_files: &[String],
        include_paths: &[PathBuf],
        suffix: &str,
        output_format: &str,
        output_path: &Path,
    ) -> Result<Vec<InterfacePath>> {
        let (ready, pending) = partition_by_suffix(interface_files, suffix);
        let mut tuples = ready
            .into_iter()
            .map(InterfacePath::parse)
            .collect::<Result<Vec<_>>>()?;

        if !pending.is_empty() {
            let translated = self.translator.translate(
                package_name,
                &pending,
                include_paths,
                output_format,
                &output_path.join("tmp"),
            )?;
            for path in translated {
                tuples.push(InterfacePath::from_translated(&path)?);
            }
        }

        tuples.retain(InterfacePath::is_idl);
        Ok(tuples)
    }
}

/// Connext IDL and `rtiddsgen` sources.
#[derive(Default)]
pub struct GenerateDdsConnextCpp {
    ctx: ExtensionContext,
}

impl GenerateDdsConnextCpp {
    pub fn new(ctx: ExtensionContext) -> Self {
        Self { ctx }
    }
}

impl GenerateCommandExtension for GenerateDdsConnextCpp {
    fn generate(
        &self,
        package_name: &str,
        interface_files: &[String],
        include_paths: &[PathBuf],
        output_path: &Path,
    ) -> Result<Vec<PathBuf>> {
        let idl_pp = self.ctx.locator.locate(self.ctx.platform)?;

        let tuples = self.ctx.normalize(
            package_name,
            interface_files,
            include_paths,
            DDS_IDL_SUFFIX,
            FORMAT_DDS_IDL,
            output_path,
        )?;

        let invoker = Invoker::new(idl_pp).with_platform(self.ctx.platform);
        let mut generated = Vec::new();
        for tuple in &tuples {
            let output_dir = output_path.join(tuple.subfolder());
            fs::create_dir_all(&output_dir)?;
            generated.extend(invoker.generate_file(
                package_name,
                &tuple.path(),
                include_paths,
                &output_dir,
            )?);
        }
        Ok(generated)
    }
}

/// Visibility control header and type support wrappers.
#[derive(Default)]
pub struct GenerateConnextCppTypesupport {
    ctx: ExtensionContext,
}

impl GenerateConnextCppTypesupport {
    pub fn new(ctx: ExtensionContext) -> Self {
        Self { ctx }
    }
}

impl GenerateCommandExtension for GenerateConnextCppTypesupport {
    fn generate(
        &self,
        package_name: &str,
        interface_files: &[String],
        include_paths: &[PathBuf],
        output_path: &Path,
    ) -> Result<Vec<PathBuf>> {
        let idl_pp = self.ctx.locator.locate(self.ctx.platform)?;
        tracing::debug!("Connext IDL compiler: {}", idl_pp.display());

        let tuples = self.ctx.normalize(
            package_name,
            interface_files,
            include_paths,
            IDL_SUFFIX,
            FORMAT_IDL,
            output_path,
        )?;

        let template_dir = self.ctx.template_dir.as_deref();
        let visibility_template = template_dir
            .map(|dir| dir.join(VISIBILITY_TEMPLATE))
            .filter(|path| path.exists());
        let mut generated = vec![generate_visibility_control_file(
            package_name,
            visibility_template.as_deref(),
            &output_path.join("msg").join(VISIBILITY_HEADER),
        )?];

        let mut args = GeneratorArguments::new(package_name, output_path, &tuples);
        args.template_dir = self.ctx.template_dir.clone();
        args.write_to(
            &output_path
                .join("tmp")
                .join(format!("{package_name}__connext_cpp_typesupport_args.json")),
        )?;

        generated.extend(TypeSupportTemplates::load(template_dir)?.generate(&args)?);
        Ok(generated)
    }
}

/// Look up a registered extension.
pub fn extension(
    kind: ExtensionKind,
    name: &str,
    ctx: ExtensionContext,
) -> Option<Box<dyn GenerateCommandExtension>> {
    if name != EXTENSION_NAME {
        return None;
    }
    let ext: Box<dyn GenerateCommandExtension> = match kind {
        ExtensionKind::Type => Box::new(GenerateDdsConnextCpp::new(ctx)),
        ExtensionKind::Typesupport => Box::new(GenerateConnextCppTypesupport::new(ctx)),
    };
    Some(ext)
}
