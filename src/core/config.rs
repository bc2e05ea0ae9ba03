//! # Configuration Module / 配置模块
//!
//! Defines the `ToolchainMatrix.toml` schema: which toolchain versions to run,
//! which packages to pre-install, where each toolchain lives, which files count
//! as targets, and where log sinks are written. Every field has a default so an
//! empty file (or no file at all) reproduces the stock Go setup.
//!
//! 定义 `ToolchainMatrix.toml` 的结构：要运行的工具链版本、需要预装的依赖包、
//! 每个工具链的安装位置、哪些文件属于目标，以及日志输出的位置。
//! 所有字段都有默认值。

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::models::Grouping;

/// Name of the configuration file looked up when `--config` is not given.
/// 未指定 `--config` 时查找的配置文件名。
pub const DEFAULT_CONFIG_FILE: &str = "ToolchainMatrix.toml";

/// Placeholder substituted with the version in path templates.
pub const VERSION_PLACEHOLDER: &str = "{version}";

/// The entire matrix configuration, loaded from a TOML file.
/// 从 TOML 文件加载的完整矩阵配置。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MatrixConfig {
    /// The language for console messages (e.g., "en", "zh-CN").
    /// 控制台消息的语言（例如 "en", "zh-CN"）。
    pub language: String,
    /// Toolchain versions, in execution order.
    /// 工具链版本，按执行顺序排列。
    pub versions: Vec<String>,
    /// Dependency packages installed into every version's workspace.
    /// 安装到每个版本工作区的依赖包。
    pub packages: Vec<String>,
    /// How output is grouped into log sinks.
    /// 输出如何分组到日志文件中。
    pub grouping: Grouping,
    pub toolchain: ToolchainConfig,
    pub targets: TargetsConfig,
    pub output: OutputConfig,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            versions: ["1.8.7", "1.9.7", "1.10.4", "1.11"]
                .iter()
                .map(|v| v.to_string())
                .collect(),
            packages: vec!["golang.org/x/time/rate".to_string()],
            grouping: Grouping::PerFile,
            toolchain: ToolchainConfig::default(),
            targets: TargetsConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// Where a toolchain version is installed and how it is driven.
/// 工具链版本的安装位置以及如何调用它。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ToolchainConfig {
    /// Installation root template, e.g. `/opt/go/go{version}`.
    /// 安装根目录模板。
    pub root: String,
    /// Executable template, e.g. `/opt/go/go{version}/bin/go`.
    /// 可执行文件模板。
    pub binary: String,
    /// Workspace directory holding one isolated sub-directory per version.
    /// Relative paths are resolved against the walk root.
    /// 工作区目录，每个版本一个隔离的子目录。相对路径基于遍历根目录解析。
    pub workspace: String,
    /// Environment variable that receives the per-version workspace.
    pub workspace_env: String,
    /// Environment variable that receives the installation root.
    pub root_env: String,
    /// Sub-command used to fetch a package (`<binary> get <package>`).
    pub install_action: String,
    /// Sub-command used for run targets (`<binary> run <path>`).
    pub run_action: String,
    /// Sub-command used for test targets (`<binary> test <path>`).
    pub test_action: String,
    /// Optional per-invocation timeout in seconds. Invocations that exceed it
    /// are killed and recorded as timed out.
    /// 可选的单次调用超时（秒）。超时的调用会被终止并记录为超时。
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            root: "/opt/go/go{version}".to_string(),
            binary: "/opt/go/go{version}/bin/go".to_string(),
            workspace: "gopath".to_string(),
            workspace_env: "GOPATH".to_string(),
            root_env: "GOROOT".to_string(),
            install_action: "get".to_string(),
            run_action: "run".to_string(),
            test_action: "test".to_string(),
            timeout_secs: None,
        }
    }
}

/// File-name rules used to classify walked files.
/// 用于对遍历到的文件进行分类的文件名规则。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TargetsConfig {
    /// Files ending with this suffix are tested.
    pub test_suffix: String,
    /// Other files ending with this suffix are run.
    pub source_suffix: String,
    /// File names that are never classified, wherever they appear.
    /// 无论出现在何处都不会被分类的文件名。
    pub exclude: Vec<String>,
}

impl Default for TargetsConfig {
    fn default() -> Self {
        Self {
            test_suffix: "_test.go".to_string(),
            source_suffix: ".go".to_string(),
            exclude: vec!["walktest.go".to_string()],
        }
    }
}

/// Where log sinks are written.
/// 日志文件的写入位置。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for log sinks. Relative paths are resolved against the
    /// current working directory.
    /// 日志文件目录。相对路径基于当前工作目录解析。
    pub dir: String,
    /// Suffix appended to the file name or version to form the sink name.
    pub log_suffix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: ".".to_string(),
            log_suffix: ".txt".to_string(),
        }
    }
}

impl MatrixConfig {
    /// Checks the fields that would otherwise make a run meaningless or
    /// destructive (an empty source suffix matches every file).
    /// 检查会导致运行无意义或具有破坏性的字段（空的源文件后缀会匹配所有文件）。
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("targets.test_suffix", &self.targets.test_suffix),
            ("targets.source_suffix", &self.targets.source_suffix),
            ("toolchain.binary", &self.toolchain.binary),
            ("toolchain.workspace", &self.toolchain.workspace),
            ("toolchain.workspace_env", &self.toolchain.workspace_env),
            ("toolchain.root_env", &self.toolchain.root_env),
            ("toolchain.install_action", &self.toolchain.install_action),
            ("toolchain.run_action", &self.toolchain.run_action),
            ("toolchain.test_action", &self.toolchain.test_action),
            ("output.log_suffix", &self.output.log_suffix),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                bail!("`{}` must not be empty", field);
            }
        }
        if self.toolchain.timeout_secs == Some(0) {
            bail!("`toolchain.timeout_secs` must be greater than zero");
        }
        Ok(())
    }
}

/// Parses a matrix configuration from TOML text and validates it.
pub fn parse_matrix_config(content: &str) -> Result<MatrixConfig> {
    let config: MatrixConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Loads and validates the configuration file at `path`.
/// 加载并验证 `path` 处的配置文件。
pub fn load_matrix_config(path: &Path) -> Result<MatrixConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_matrix_config(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}
