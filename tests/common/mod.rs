// Shared test helpers for integration tests
#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};

/// A scratch layout with a fake toolchain per version:
///
/// ```text
/// <tmp>/
/// ├── toolchains/go<version>/bin/go   fake executable
/// ├── src/                             walk root
/// ├── out/                             log sinks
/// └── calls.log                        one line per invocation
/// ```
pub struct Fixture {
    pub temp_dir: TempDir,
    /// Canonical path of `temp_dir`.
    pub base: PathBuf,
}

impl Fixture {
    pub fn new(versions: &[&str]) -> Self {
        let temp_dir = tempdir().expect("Failed to create temporary directory");
        let base = fs::canonicalize(temp_dir.path()).expect("Failed to canonicalize temp dir");
        fs::create_dir_all(base.join("src")).expect("Failed to create src directory");

        let fixture = Self { temp_dir, base };
        for version in versions {
            fixture.install_fake_toolchain(version);
        }
        fixture
    }

    pub fn src(&self) -> PathBuf {
        self.base.join("src")
    }

    pub fn out(&self) -> PathBuf {
        self.base.join("out")
    }

    pub fn calls_log(&self) -> PathBuf {
        self.base.join("calls.log")
    }

    pub fn toolchain_root(&self, version: &str) -> PathBuf {
        self.base.join("toolchains").join(format!("go{}", version))
    }

    /// Writes a fake `go` for `version`. It records every call in
    /// `calls.log`, echoes its arguments and environment, fails when the
    /// target contains `fail-on-<version>` and hangs when it contains
    /// `hang-on-<version>`.
    pub fn install_fake_toolchain(&self, version: &str) {
        let bin_dir = self.toolchain_root(version).join("bin");
        fs::create_dir_all(&bin_dir).expect("Failed to create bin directory");
        let script = format!(
            r#"#!/bin/sh
VERSION="{version}"
echo "$VERSION $1 $2" >> "{calls}"
echo "action=$1 arg=$2"
echo "GOPATH=$GOPATH"
echo "GOROOT=$GOROOT"
if [ -f "$2" ] && grep -q "hang-on-$VERSION" "$2"; then
    exec sleep 30
fi
if [ -f "$2" ] && grep -q "fail-on-$VERSION" "$2"; then
    echo "boom from $VERSION" >&2
    exit 3
fi
exit 0
"#,
            version = version,
            calls = self.calls_log().display()
        );
        let bin = bin_dir.join("go");
        fs::write(&bin, script).expect("Failed to write fake toolchain");
        fs::set_permissions(&bin, fs::Permissions::from_mode(0o755))
            .expect("Failed to mark fake toolchain executable");
    }

    /// Creates a source file under the walk root, creating parent directories.
    pub fn write_source(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.src().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create source directory");
        }
        fs::write(&path, content).expect("Failed to write source file");
        path
    }

    /// Writes a config pointing at the fake toolchains and returns its path.
    /// `extra` is appended verbatim at the top level, before any table.
    pub fn write_config(&self, versions: &[&str], packages: &[&str], extra: &str) -> PathBuf {
        self.write_config_with(versions, packages, extra, "")
    }

    pub fn write_config_with(
        &self,
        versions: &[&str],
        packages: &[&str],
        extra: &str,
        toolchain_extra: &str,
    ) -> PathBuf {
        let quote = |items: &[&str]| {
            items
                .iter()
                .map(|i| format!("\"{}\"", i))
                .collect::<Vec<_>>()
                .join(", ")
        };
        let toolchains = self.base.join("toolchains");
        let content = format!(
            r#"language = "en"
versions = [{versions}]
packages = [{packages}]
{extra}

[toolchain]
root = "{toolchains}/go{{version}}"
binary = "{toolchains}/go{{version}}/bin/go"
{toolchain_extra}

[output]
dir = "{out}"
"#,
            versions = quote(versions),
            packages = quote(packages),
            extra = extra,
            toolchains = toolchains.display(),
            toolchain_extra = toolchain_extra,
            out = self.out().display(),
        );
        let path = self.base.join("matrix.toml");
        fs::write(&path, content).expect("Failed to write config");
        path
    }

    pub fn read_out(&self, name: &str) -> String {
        fs::read_to_string(self.out().join(name))
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", name, e))
    }

    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.calls_log())
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

/// Marker labels of a sink, in order.
pub fn markers(log: &str) -> Vec<String> {
    log.lines()
        .filter_map(|line| line.strip_prefix(">>>>> "))
        .map(str::to_string)
        .collect()
}

/// The text of the section that follows the marker `label`.
pub fn section<'a>(log: &'a str, label: &str) -> &'a str {
    let marker = format!(">>>>> {}\n", label);
    let start = log
        .find(&marker)
        .unwrap_or_else(|| panic!("marker `{}` not found in:\n{}", label, log))
        + marker.len();
    let rest = &log[start..];
    match rest.find("\n>>>>> ") {
        Some(end) => &rest[..end],
        None => rest,
    }
}

pub fn path_str(path: &Path) -> String {
    path.display().to_string()
}
