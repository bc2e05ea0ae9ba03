//! # Models Module / 数据模型模块
//!
//! Plain data types shared by the planner, the executor and the reporters.
//!
//! 规划器、执行器和报告器共享的数据类型。

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// What the toolchain is asked to do with a target.
/// 工具链对目标执行的操作。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    /// `<binary> run <path>`
    Run,
    /// `<binary> test <path>`
    Test,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Run => write!(f, "run"),
            Action::Test => write!(f, "test"),
        }
    }
}

/// A source file selected for execution or testing by its name.
/// 根据文件名选中、需要运行或测试的源文件。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Target {
    pub path: PathBuf,
    pub action: Action,
}

impl Target {
    /// File name of the target, used to name per-file sinks. Kept as an
    /// `OsStr` so that distinct non-UTF-8 names map to distinct sinks.
    /// 目标的文件名，用于命名按文件分组的日志文件。
    pub fn file_name(&self) -> &OsStr {
        self.path
            .file_name()
            .unwrap_or_else(|| self.path.as_os_str())
    }
}

/// How subprocess output is grouped into log sinks.
/// 子进程输出如何分组到日志文件。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Grouping {
    /// One sink per target, one section per version.
    /// 每个目标一个日志文件，每个版本一个分段。
    #[default]
    PerFile,
    /// One sink per version, one section per target.
    /// 每个版本一个日志文件，每个目标一个分段。
    PerVersion,
}

impl fmt::Display for Grouping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grouping::PerFile => write!(f, "per-file"),
            Grouping::PerVersion => write!(f, "per-version"),
        }
    }
}

/// An installed toolchain resolved for one version.
/// 针对某个版本解析出的已安装工具链。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolchainInstance {
    pub version: String,
    /// Installation root, exported through the root variable.
    pub root: PathBuf,
    /// The toolchain executable.
    pub binary: PathBuf,
    /// Isolated per-version workspace, exported through the workspace variable.
    pub workspace: PathBuf,
    pub workspace_env: String,
    pub root_env: String,
}

impl ToolchainInstance {
    /// Environment pairs set on every subprocess launched for this version.
    /// 为此版本启动的每个子进程设置的环境变量。
    pub fn env(&self) -> [(&str, &PathBuf); 2] {
        [
            (self.workspace_env.as_str(), &self.workspace),
            (self.root_env.as_str(), &self.root),
        ]
    }
}

/// One marker-plus-output section inside a sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Text after `>>>>> ` in the marker line.
    pub label: String,
    /// Index into the plan's targets.
    pub target: usize,
    /// Index into the resolved toolchains.
    pub toolchain: usize,
}

/// A log sink and the sections written into it, in order.
/// 一个日志文件及其按顺序写入的分段。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkGroup {
    /// File name of the sink inside the output directory.
    pub file_name: OsString,
    pub sections: Vec<Section>,
}

/// Outcome of a single toolchain invocation.
/// 单次工具链调用的结果。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum InvocationStatus {
    Success,
    /// The process exited unsuccessfully. `code` is `None` when it was killed
    /// by a signal.
    Failed { code: Option<i32> },
    /// The executable could not be started at all.
    SpawnFailed { message: String },
    TimedOut,
    Cancelled,
}

impl InvocationStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, InvocationStatus::Success)
    }

    /// Short label for console and HTML output.
    /// 用于控制台和 HTML 输出的简短标签。
    pub fn short_label(&self) -> String {
        match self {
            InvocationStatus::Success => "ok".to_string(),
            InvocationStatus::Failed { code: Some(code) } => format!("exit {}", code),
            InvocationStatus::Failed { code: None } => "signal".to_string(),
            InvocationStatus::SpawnFailed { .. } => "spawn failed".to_string(),
            InvocationStatus::TimedOut => "timeout".to_string(),
            InvocationStatus::Cancelled => "cancelled".to_string(),
        }
    }

    /// CSS class used by the HTML report.
    pub fn css_class(&self) -> &'static str {
        match self {
            InvocationStatus::Success => "passed",
            InvocationStatus::Failed { .. } => "failed",
            InvocationStatus::SpawnFailed { .. } | InvocationStatus::TimedOut => "error",
            InvocationStatus::Cancelled => "skipped",
        }
    }
}

/// What kind of invocation a record describes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum InvocationKind {
    Install { package: String },
    Target { action: Action, path: PathBuf },
}

/// A record of one toolchain invocation, kept only for reporting.
/// 一次工具链调用的记录，仅用于报告。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvocationRecord {
    pub version: String,
    #[serde(flatten)]
    pub kind: InvocationKind,
    /// Sink that received the output; `None` for installs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sink: Option<PathBuf>,
    #[serde(flatten)]
    pub status: InvocationStatus,
    #[serde(rename = "duration_secs", serialize_with = "serialize_secs")]
    pub duration: Duration,
}

fn serialize_secs<S: serde::Serializer>(duration: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(duration.as_secs_f64())
}

impl InvocationRecord {
    pub fn target_path(&self) -> Option<&PathBuf> {
        match &self.kind {
            InvocationKind::Target { path, .. } => Some(path),
            InvocationKind::Install { .. } => None,
        }
    }
}
