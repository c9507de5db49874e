// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! RTI Connext code generation for ROS interface packages.
//!
//! Adapts generic IDL to the Connext dialect, drives `rtiddsgen` and patches
//! its output, and expands the type support glue templates.
//!
//! # Example
//!
//! ```rust,ignore
//! use connext_gen::{find_rti_connext_idl_preprocessor, Invoker};
//!
//! let idl_pp = find_rti_connext_idl_preprocessor()?;
//! let generated = Invoker::new(idl_pp).generate(
//!     "geometry_msgs",
//!     &["share/geometry_msgs/msg/Point.idl".into()],
//!     &["share".into()],
//!     "build/rosidl_generator_dds_idl".as_ref(),
//! )?;
//! ```

pub mod command;
pub mod error;
pub mod extensions;
pub mod idl;
pub mod interface;
pub mod invoker;
pub mod patch;
pub mod templates;
pub mod toolchain;
pub mod translate;

pub use command::{CommandDescriptor, Platform};
pub use error::{GenError, Result};
pub use extensions::{
    extension, ExtensionContext, ExtensionKind, GenerateCommandExtension,
    GenerateConnextCppTypesupport, GenerateDdsConnextCpp, Locator,
};
pub use idl::{convert_to_connext_idl, DialectConverter};
pub use interface::InterfacePath;
pub use invoker::{generate_dds_connext_cpp, Invoker, RetryPolicy};
pub use templates::{generate_cpp, GeneratorArguments, TypeSupportTemplates};
pub use toolchain::{find_rti_connext_idl_preprocessor, Toolchain};
pub use translate::{CommandTranslator, Translator};
