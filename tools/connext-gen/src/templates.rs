// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type support glue generation.
//!
//! Two kinds of output:
//! - the per-package visibility control header, a CMake style `.h.in` with
//!   `@PROJECT_NAME@` / `@PROJECT_NAME_UPPER@` placeholders,
//! - per-interface C++ wrappers rendered with Tera from a
//!   [`GeneratorArguments`] descriptor.
//!
//! Default templates are compiled in; a template directory holding
//! `<name>.tera` files overrides them one by one.

use crate::error::Result;
use crate::interface::{camel_to_snake, InterfacePath};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tera::Tera;

/// Visibility control template file name.
pub const VISIBILITY_TEMPLATE: &str = "rosidl_typesupport_connext_cpp__visibility_control.h.in";

/// Visibility control header file name.
pub const VISIBILITY_HEADER: &str = "rosidl_typesupport_connext_cpp__visibility_control.h";

/// Template name to output file pattern; `%s` is the snake_case interface
/// name.
pub const TYPESUPPORT_MAPPING: [(&str, &str); 2] = [
    (
        "idl__rosidl_typesupport_connext_cpp.hpp",
        "%s__rosidl_typesupport_connext_cpp.hpp",
    ),
    ("idl__dds_connext__type_support.cpp", "%s__type_support.cpp"),
];

const DEFAULT_VISIBILITY: &str =
    include_str!("../resource/rosidl_typesupport_connext_cpp__visibility_control.h.in");
const DEFAULT_HPP: &str = include_str!("../resource/idl__rosidl_typesupport_connext_cpp.hpp.tera");
const DEFAULT_CPP: &str = include_str!("../resource/idl__dds_connext__type_support.cpp.tera");

/// Render the visibility control header for `package_name`.
///
/// Reads `template_path` if given, the built-in template otherwise.
pub fn generate_visibility_control_file(
    package_name: &str,
    template_path: Option<&Path>,
    output_path: &Path,
) -> Result<PathBuf> {
    let template = match template_path {
        Some(path) => fs::read_to_string(path)?,
        None => DEFAULT_VISIBILITY.to_string(),
    };
    let content = template
        .replace("@PROJECT_NAME@", package_name)
        .replace("@PROJECT_NAME_UPPER@", &package_name.to_uppercase());

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }
    write_if_changed(output_path, &content)?;
    Ok(output_path.to_path_buf())
}

/// Arguments file consumed by the type support generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorArguments {
    pub package_name: String,
    pub output_dir: PathBuf,
    #[serde(default)]
    pub template_dir: Option<PathBuf>,
    /// `prefix:relative` IDL tuples.
    pub idl_tuples: Vec<String>,
    #[serde(default)]
    pub ros_interface_dependencies: Vec<String>,
    #[serde(default)]
    pub target_dependencies: Vec<PathBuf>,
}

impl GeneratorArguments {
    pub fn new(package_name: &str, output_dir: &Path, idl_tuples: &[InterfacePath]) -> Self {
        Self {
            package_name: package_name.to_string(),
            output_dir: output_dir.to_path_buf(),
            template_dir: None,
            idl_tuples: idl_tuples.iter().map(ToString::to_string).collect(),
            ros_interface_dependencies: Vec::new(),
            target_dependencies: Vec::new(),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// The two per-interface type support templates.
pub struct TypeSupportTemplates {
    tera: Tera,
}

impl TypeSupportTemplates {
    /// Load templates, preferring `<template_dir>/<name>.tera` over the
    /// built-in ones.
    pub fn load(template_dir: Option<&Path>) -> Result<Self> {
        let mut tera = Tera::default();
        for ((name, _), default) in TYPESUPPORT_MAPPING.iter().zip([DEFAULT_HPP, DEFAULT_CPP]) {
            let override_path = template_dir.map(|dir| dir.join(format!("{name}.tera")));
            match override_path.filter(|path| path.exists()) {
                Some(path) => {
                    tracing::debug!("Loading template {}", path.display());
                    tera.add_raw_template(name, &fs::read_to_string(&path)?)?;
                }
                None => tera.add_raw_template(name, default)?,
            }
        }
        Ok(Self { tera })
    }

    /// Expand every template once per IDL tuple of `args`.
    pub fn generate(&self, args: &GeneratorArguments) -> Result<Vec<PathBuf>> {
        let mut generated = Vec::with_capacity(args.idl_tuples.len() * TYPESUPPORT_MAPPING.len());
        for tuple in &args.idl_tuples {
            let interface = InterfacePath::parse(tuple)?;
            let ctx = interface_context(&args.package_name, &interface);
            let output_dir = args.output_dir.join(interface.subfolder());
            fs::create_dir_all(&output_dir)?;

            for (template, pattern) in TYPESUPPORT_MAPPING {
                let rendered = self.tera.render(template, &ctx)?;
                let output = output_dir.join(pattern.replace("%s", &camel_to_snake(&interface.stem())));
                write_if_changed(&output, &rendered)?;
                generated.push(output);
            }
        }
        tracing::info!(
            "Expanded {} type support file(s) for {}",
            generated.len(),
            args.package_name
        );
        Ok(generated)
    }
}

fn interface_context(package_name: &str, interface: &InterfacePath) -> tera::Context {
    let interface_name = interface.stem();
    let interface_snake = camel_to_snake(&interface_name);
    let subfolder = interface.subfolder().to_string_lossy().replace('\\', "/");
    let header_guard = format!(
        "{}__{}__{}__ROSIDL_TYPESUPPORT_CONNEXT_CPP_HPP_",
        package_name.to_uppercase(),
        subfolder.replace('/', "__").to_uppercase(),
        interface_snake.to_uppercase()
    );

    let mut ctx = tera::Context::new();
    ctx.insert("package_name", package_name);
    ctx.insert("subfolder", &subfolder);
    ctx.insert("interface_name", &interface_name);
    ctx.insert("interface_snake", &interface_snake);
    ctx.insert("dds_name", &format!("{interface_name}_"));
    ctx.insert("header_guard", &header_guard);
    ctx.insert("idl_tuple", &interface.to_string());
    ctx
}

/// Expand the type support templates for an arguments file.
pub fn generate_cpp(arguments_file: &Path, template_dir: Option<&Path>) -> Result<Vec<PathBuf>> {
    let args = GeneratorArguments::from_file(arguments_file)?;
    let template_dir = template_dir.or(args.template_dir.as_deref());
    TypeSupportTemplates::load(template_dir)?.generate(&args)
}

/// Skip the write when the file already holds `content`, so build systems
/// keep their timestamps.
fn write_if_changed(path: &Path, content: &str) -> Result<()> {
    if fs::read_to_string(path).is_ok_and(|existing| existing == content) {
        return Ok(());
    }
    fs::write(path, content)?;
    Ok(())
}
