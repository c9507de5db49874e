// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! End-to-end runs against small `/bin/sh` stand-ins for `rtiddsgen`.

#![cfg(unix)]

use connext_gen::{GenError, Invoker, Platform, Toolchain};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

// Writing a script while another test forks can leave the script busy
// (ETXTBSY) at exec time; script creation and runs are serialized.
static PROCESS_LOCK: Mutex<()> = Mutex::new(());

fn lock() -> std::sync::MutexGuard<'static, ()> {
    PROCESS_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

fn write_script(path: &Path, body: &str) {
    fs::write(path, format!("#!/bin/sh\n{body}")).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

/// Fake generator that logs each run and writes the six outputs starting
/// with run `succeed_on` (0 = never). Exits with `exit_code`.
fn fake_generator(dir: &Path, succeed_on: u32, exit_code: i32) -> (PathBuf, PathBuf) {
    let script = dir.join("rtiddsgen");
    let runs = dir.join("runs.log");
    let body = format!(
        r#"echo "$*" >> "{runs}"
out=""
last=""
while [ $# -gt 0 ]; do
  if [ "$1" = "-d" ]; then out="$2"; fi
  last="$1"
  shift
done
n=$(wc -l < "{runs}")
stem=$(basename "$last" .idl)
if [ {succeed_on} -gt 0 ] && [ "$n" -ge {succeed_on} ]; then
  for s in .h .cxx Plugin.h Plugin.cxx Support.h Support.cxx; do
    : > "$out/$stem$s"
  done
  printf '  static const DDS_Char * Constants__NAME = "n";\n' > "$out/$stem.h"
fi
exit {exit_code}
"#,
        runs = runs.display(),
    );
    write_script(&script, &body);
    (script, runs)
}

fn run_count(runs: &Path) -> usize {
    fs::read_to_string(runs)
        .map(|content| content.lines().count())
        .unwrap_or(0)
}

fn idl_fixture(root: &Path) -> PathBuf {
    let dir = root.join("share/test_msgs/msg");
    fs::create_dir_all(&dir).unwrap();
    let idl = dir.join("Sample.idl");
    fs::write(
        &idl,
        "module test_msgs { module msg {\n  struct Sample {\n    sequence<uint8> data;\n    int64 stamp;\n  };\n}; };\n",
    )
    .unwrap();
    idl
}

#[test]
fn never_writing_generator_runs_five_times() {
    let _guard = lock();
    let temp_dir = TempDir::new().unwrap();
    let (script, runs) = fake_generator(temp_dir.path(), 0, 0);
    let idl = idl_fixture(temp_dir.path());

    let result = Invoker::new(&script).with_platform(Platform::Unix).generate(
        "test_msgs",
        &[idl],
        &[],
        &temp_dir.path().join("out"),
    );

    match result {
        Err(err @ GenError::OutputVerification { .. }) => {
            assert!(err.to_string().contains("failed to generate"));
        }
        other => panic!("unexpected: {other:?}"),
    }
    assert_eq!(run_count(&runs), 5);
}

#[test]
fn generator_succeeding_on_third_run() {
    let _guard = lock();
    let temp_dir = TempDir::new().unwrap();
    let (script, runs) = fake_generator(temp_dir.path(), 3, 0);
    let idl = idl_fixture(temp_dir.path());
    let out = temp_dir.path().join("out");

    let generated = Invoker::new(&script)
        .with_platform(Platform::Unix)
        .generate("test_msgs", &[idl], &[PathBuf::from("/inc")], &out)
        .unwrap();

    assert_eq!(run_count(&runs), 3);
    let out_dir = out.join("test_msgs/msg");
    assert_eq!(generated.len(), 6);
    assert!(generated.iter().all(|p| p.starts_with(&out_dir) && p.exists()));

    // Converted IDL sits next to the generated sources.
    let converted = fs::read_to_string(out_dir.join("Sample.idl")).unwrap();
    assert!(converted.contains("sequence<octet> data;"));
    assert!(converted.contains("long long stamp;"));

    // The generator saw the converted file and the include dir.
    let log = fs::read_to_string(&runs).unwrap();
    let first = log.lines().next().unwrap();
    assert!(first.starts_with("-I /inc -d "));
    assert!(first.ends_with(&format!(
        "-language C++ -namespace -update typefiles -unboundedSupport {}",
        out_dir.join("Sample.idl").display()
    )));
    assert!(!first.contains("-dllExportMacroSuffix"));

    let header = fs::read_to_string(out_dir.join("Sample.h")).unwrap();
    assert_eq!(
        header,
        "__attribute__((unused)) static const DDS_Char * Constants__NAME = \"n\";\n"
    );
}

#[test]
fn windows_platform_skips_header_patch() {
    let _guard = lock();
    let temp_dir = TempDir::new().unwrap();
    let (script, runs) = fake_generator(temp_dir.path(), 1, 0);
    let idl = idl_fixture(temp_dir.path());
    let out = temp_dir.path().join("out");

    Invoker::new(&script)
        .with_platform(Platform::Windows)
        .generate("test_msgs", &[idl], &[], &out)
        .unwrap();

    let header = fs::read_to_string(out.join("test_msgs/msg/Sample.h")).unwrap();
    assert!(header.starts_with("  static const DDS_Char"));
    let log = fs::read_to_string(&runs).unwrap();
    assert!(log.contains("-dllExportMacroSuffix test_msgs -namespace"));
}

#[test]
fn failing_generator_is_not_retried() {
    let _guard = lock();
    let temp_dir = TempDir::new().unwrap();
    let (script, runs) = fake_generator(temp_dir.path(), 1, 3);
    let idl = idl_fixture(temp_dir.path());

    let result = Invoker::new(&script).generate(
        "test_msgs",
        &[idl],
        &[],
        &temp_dir.path().join("out"),
    );

    assert!(matches!(result, Err(GenError::GeneratorFailed { .. })));
    assert_eq!(run_count(&runs), 1);
}

#[test]
fn missing_interface_stops_before_any_run() {
    let _guard = lock();
    let temp_dir = TempDir::new().unwrap();
    let (script, runs) = fake_generator(temp_dir.path(), 1, 0);
    let idl = idl_fixture(temp_dir.path());
    let missing = temp_dir.path().join("share/test_msgs/msg/Missing.idl");

    let result = Invoker::new(&script).generate(
        "test_msgs",
        &[missing, idl],
        &[],
        &temp_dir.path().join("out"),
    );

    assert!(matches!(result, Err(GenError::MissingInput(_))));
    assert_eq!(run_count(&runs), 0);
}

#[test]
fn server_variant_preferred_when_it_answers() {
    let _guard = lock();
    let temp_dir = TempDir::new().unwrap();
    let bin = temp_dir.path().join("bin");
    fs::create_dir_all(&bin).unwrap();
    write_script(&bin.join("rtiddsgen"), "exit 0\n");
    write_script(&bin.join("rtiddsgen_server"), "[ \"$1\" = \"-n_version\" ]\n");

    let toolchain = Toolchain::at(temp_dir.path(), Platform::Unix);
    assert_eq!(toolchain.select().unwrap(), bin.join("rtiddsgen_server"));
}

#[test]
fn broken_server_variant_falls_back() {
    let _guard = lock();
    let temp_dir = TempDir::new().unwrap();
    let bin = temp_dir.path().join("bin");
    fs::create_dir_all(&bin).unwrap();
    write_script(&bin.join("rtiddsgen"), "exit 0\n");
    write_script(&bin.join("rtiddsgen_server"), "exit 1\n");

    let toolchain = Toolchain::at(temp_dir.path(), Platform::Unix);
    assert_eq!(toolchain.select().unwrap(), bin.join("rtiddsgen"));
}

#[test]
fn broken_server_variant_without_standard_generator() {
    let _guard = lock();
    let temp_dir = TempDir::new().unwrap();
    let bin = temp_dir.path().join("bin");
    fs::create_dir_all(&bin).unwrap();
    write_script(&bin.join("rtiddsgen_server"), "exit 1\n");

    let toolchain = Toolchain::at(temp_dir.path(), Platform::Unix);
    assert!(matches!(
        toolchain.select(),
        Err(GenError::ToolchainNotFound(path)) if path == bin.join("rtiddsgen")
    ));
}

/// Translator stand-in writing `<output>/<subfolder>/<Name>_.idl`.
struct CopyTranslator;

impl connext_gen::Translator for CopyTranslator {
    fn translate(
        &self,
        _package_name: &str,
        interface_files: &[&str],
        _include_paths: &[PathBuf],
        _output_format: &str,
        output_path: &Path,
    ) -> connext_gen::Result<Vec<PathBuf>> {
        let mut out = Vec::new();
        for file in interface_files {
            let interface = connext_gen::InterfacePath::parse(file)?;
            let dir = output_path.join(interface.subfolder());
            fs::create_dir_all(&dir)?;
            let path = dir.join(format!("{}_.idl", interface.stem()));
            fs::write(&path, "struct Translated_ { uint32 value; };\n")?;
            out.push(path);
        }
        Ok(out)
    }
}

#[test]
fn type_extension_generates_per_subfolder() {
    use connext_gen::{ExtensionContext, GenerateCommandExtension, GenerateDdsConnextCpp, Locator};

    let _guard = lock();
    let temp_dir = TempDir::new().unwrap();
    let (script, runs) = fake_generator(temp_dir.path(), 1, 0);
    let share = temp_dir.path().join("share/pkg");
    fs::create_dir_all(share.join("msg")).unwrap();
    fs::create_dir_all(share.join("srv")).unwrap();
    fs::write(share.join("msg/Native_.idl"), "struct Native_ { int16 a; };\n").unwrap();
    fs::write(share.join("srv/Translated.srv"), "int32 a\n---\n").unwrap();
    let out = temp_dir.path().join("out");

    let ext = GenerateDdsConnextCpp::new(ExtensionContext {
        translator: Box::new(CopyTranslator),
        locator: Locator::Executable(script),
        platform: Platform::Unix,
        template_dir: None,
    });
    let files = vec![
        format!("{}:msg/Native_.idl", share.display()),
        format!("{}:srv/Translated.srv", share.display()),
    ];
    let generated = ext.generate("pkg", &files, &[], &out).unwrap();

    assert_eq!(run_count(&runs), 2);
    assert_eq!(generated.len(), 12);
    assert!(out.join("msg/Native_.cxx").exists());
    assert!(out.join("srv/Translated_Support.h").exists());
    assert_eq!(
        fs::read_to_string(out.join("msg/Native_.idl")).unwrap(),
        "struct Native_ { short a; };\n"
    );
}
