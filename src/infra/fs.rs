//! # File System Operations Module / 文件系统操作模块
//!
//! Path resolution helpers and the [`Sink`] type, the truncate-created log file
//! that receives section markers and subprocess output.
//!
//! 路径解析辅助函数以及 [`Sink`] 类型：以截断方式创建、接收分段标记和子进程输出的日志文件。

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Stdio;

/// Prefix of every section marker line.
/// 每个分段标记行的前缀。
pub const MARKER_PREFIX: &str = ">>>>> ";

/// Returns the current working directory.
pub fn current_dir() -> Result<PathBuf> {
    std::env::current_dir().context("Failed to determine the current working directory")
}

/// Gets the absolute path from a potentially relative path.
///
/// # Arguments
/// * `path` - Path to canonicalize
///
/// # Returns
/// Canonicalized absolute path, or an error if the path doesn't exist
pub fn absolute_path(path: &Path) -> Result<PathBuf> {
    fs::canonicalize(path).with_context(|| format!("Failed to resolve path: {}", path.display()))
}

/// Resolves `dir` against `base` when relative.
pub fn resolve_dir(base: &Path, dir: &str) -> PathBuf {
    let dir = Path::new(dir);
    if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        base.join(dir)
    }
}

/// Resolves `dir` against `base` when relative and makes sure it exists.
/// 当 `dir` 为相对路径时基于 `base` 解析，并确保目录存在。
pub fn ensure_dir(base: &Path, dir: &str) -> Result<PathBuf> {
    let resolved = resolve_dir(base, dir);
    fs::create_dir_all(&resolved)
        .with_context(|| format!("Failed to create output directory: {}", resolved.display()))?;
    absolute_path(&resolved)
}

/// A log file receiving sections of subprocess output.
///
/// The file is truncated on creation. Marker lines are written through the
/// sink itself while children write through duplicated handles that share the
/// same file offset, so sections land in invocation order. Dropping the sink
/// closes it; [`Sink::close`] additionally reports flush errors.
///
/// 接收子进程输出分段的日志文件。
/// 创建时截断文件。标记行通过 sink 本身写入，子进程则通过共享同一文件偏移量的
/// 复制句柄写入，因此各分段按调用顺序排列。
#[derive(Debug)]
pub struct Sink {
    path: PathBuf,
    file: File,
}

impl Sink {
    /// Creates (or truncates) the sink at `path`.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create log file: {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `\n>>>>> <label>\n`.
    pub fn write_marker(&mut self, label: &str) -> Result<()> {
        self.write_text(&format!("\n{}{}\n", MARKER_PREFIX, label))
    }

    /// Appends a line produced by the runner itself, e.g. a timeout note.
    pub fn write_note(&mut self, note: &str) -> Result<()> {
        self.write_text(&format!("[toolchain-matrix] {}\n", note))
    }

    fn write_text(&mut self, text: &str) -> Result<()> {
        self.file
            .write_all(text.as_bytes())
            .with_context(|| format!("Failed to write log file: {}", self.path.display()))
    }

    /// Duplicated handles for a child's stdout and stderr.
    /// 为子进程的 stdout 和 stderr 复制的文件句柄。
    pub fn child_stdio(&self) -> Result<(Stdio, Stdio)> {
        let clone = || {
            self.file
                .try_clone()
                .with_context(|| format!("Failed to duplicate log file handle: {}", self.path.display()))
        };
        Ok((Stdio::from(clone()?), Stdio::from(clone()?)))
    }

    /// Flushes the sink to disk and closes it.
    /// 将日志文件刷新到磁盘并关闭。
    pub fn close(mut self) -> Result<()> {
        self.file
            .flush()
            .and_then(|_| self.file.sync_all())
            .with_context(|| format!("Failed to close log file: {}", self.path.display()))
    }
}
