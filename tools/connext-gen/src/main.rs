// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! connext-gen CLI
//!
//! # Usage
//!
//! ```bash
//! # Connext IDL + rtiddsgen sources through the `connext_cpp` type extension
//! connext-gen generate --kind type --package-name geometry_msgs \
//!     --output-path build/dds_connext share/geometry_msgs:msg/Point.idl
//!
//! # Drive rtiddsgen directly
//! connext-gen dds-connext-cpp --package-name geometry_msgs --idl-pp /usr/bin/rtiddsgen \
//!     --output-basepath build -I share share/geometry_msgs/msg/Point_.idl
//!
//! # Print the generator that would be used
//! NDDSHOME=/opt/rti_connext_dds-6.0.1 connext-gen locate
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use connext_gen::{
    extension, find_rti_connext_idl_preprocessor, generate_cpp, CommandTranslator,
    ExtensionContext, ExtensionKind, Invoker, Locator,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "connext-gen")]
#[command(author = "naskel.com")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "RTI Connext IDL adaptation and rtiddsgen driver for ROS interfaces")]
struct Cli {
    /// Log level (trace, debug, info, warn, error) or filter directive
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    /// Verbose mode (debug logs)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a `connext_cpp` generate extension
    Generate {
        /// Extension kind
        #[arg(long, value_enum)]
        kind: KindArg,

        /// Name of the interface package
        #[arg(long)]
        package_name: String,

        /// Output directory
        #[arg(long, default_value = ".")]
        output_path: PathBuf,

        /// Include paths for interface dependencies
        #[arg(short = 'I', long = "include-path")]
        include_paths: Vec<PathBuf>,

        /// Connext installation root (overrides NDDSHOME lookup)
        #[arg(long)]
        nddshome: Option<PathBuf>,

        /// Interface format translator executable
        #[arg(long, default_value = CommandTranslator::DEFAULT_PROGRAM)]
        translator: PathBuf,

        /// Directory holding template overrides
        #[arg(long)]
        templates: Option<PathBuf>,

        /// Interface files, optionally as `prefix:relative/path`
        #[arg(value_name = "FILE", required = true)]
        interface_files: Vec<String>,
    },

    /// Run rtiddsgen over Connext IDL files
    DdsConnextCpp {
        /// Name of the interface package
        #[arg(long)]
        package_name: String,

        /// rtiddsgen executable (located through NDDSHOME if omitted)
        #[arg(long)]
        idl_pp: Option<PathBuf>,

        /// Base directory for converted IDL and generated sources
        #[arg(long)]
        output_basepath: PathBuf,

        /// Include directories passed to rtiddsgen
        #[arg(short = 'I', long = "include-dir")]
        include_dirs: Vec<PathBuf>,

        /// IDL files
        #[arg(value_name = "FILE", required = true)]
        idl_files: Vec<PathBuf>,
    },

    /// Expand the type support templates from an arguments file
    TypesupportCpp {
        /// JSON generator arguments file
        #[arg(long)]
        generator_arguments_file: PathBuf,

        /// Directory holding template overrides
        #[arg(long)]
        templates: Option<PathBuf>,
    },

    /// Print the Connext IDL compiler that would be used
    Locate,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Type,
    Typesupport,
}

impl From<KindArg> for ExtensionKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Type => ExtensionKind::Type,
            KindArg::Typesupport => ExtensionKind::Typesupport,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("connext_gen=debug")
    } else {
        EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let generated = match cli.command {
        Commands::Generate {
            kind,
            package_name,
            output_path,
            include_paths,
            nddshome,
            translator,
            templates,
            interface_files,
        } => {
            let ctx = ExtensionContext {
                translator: Box::new(CommandTranslator::new(translator)),
                locator: nddshome.map_or(Locator::Environment, Locator::Root),
                template_dir: templates,
                ..Default::default()
            };
            let ext = extension(kind.into(), connext_gen::extensions::EXTENSION_NAME, ctx)
                .context("connext_cpp extension not registered")?;
            ext.generate(&package_name, &interface_files, &include_paths, &output_path)
                .with_context(|| format!("Failed to generate {kind:?} code for {package_name}"))?
        }
        Commands::DdsConnextCpp {
            package_name,
            idl_pp,
            output_basepath,
            include_dirs,
            idl_files,
        } => {
            let idl_pp = match idl_pp {
                Some(path) => path,
                None => find_rti_connext_idl_preprocessor()
                    .context("Failed to locate the Connext IDL compiler")?,
            };
            Invoker::new(idl_pp)
                .generate(&package_name, &idl_files, &include_dirs, &output_basepath)
                .with_context(|| format!("Failed to generate Connext sources for {package_name}"))?
        }
        Commands::TypesupportCpp {
            generator_arguments_file,
            templates,
        } => generate_cpp(&generator_arguments_file, templates.as_deref()).with_context(|| {
            format!(
                "Failed to expand templates from {}",
                generator_arguments_file.display()
            )
        })?,
        Commands::Locate => {
            let idl_pp = find_rti_connext_idl_preprocessor()
                .context("Failed to locate the Connext IDL compiler")?;
            println!("{}", idl_pp.display());
            return Ok(());
        }
    };

    for path in &generated {
        println!("{}", path.display());
    }
    tracing::info!("[OK] {} file(s) generated", generated.len());
    Ok(())
}
