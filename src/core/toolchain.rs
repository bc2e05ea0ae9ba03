//! # Toolchain Resolution Module / 工具链解析模块
//!
//! Turns the path templates of the configuration into concrete
//! [`ToolchainInstance`]s, one per configured version.
//!
//! 将配置中的路径模板解析为具体的 [`ToolchainInstance`]，每个配置版本一个。

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::core::config::{MatrixConfig, VERSION_PLACEHOLDER};
use crate::core::models::ToolchainInstance;

/// Expands `~` and environment variables in `template`, then substitutes
/// every `{version}` placeholder.
///
/// 展开 `template` 中的 `~` 和环境变量，然后替换所有 `{version}` 占位符。
pub fn expand_template(template: &str, version: &str) -> Result<String> {
    let expanded = shellexpand::full(template)
        .with_context(|| format!("Failed to expand path template `{}`", template))?;
    Ok(expanded.replace(VERSION_PLACEHOLDER, version))
}

/// Resolves the workspace root against the walk root.
/// 基于遍历根目录解析工作区根目录。
pub fn workspace_root(config: &MatrixConfig, walk_root: &Path) -> Result<PathBuf> {
    let expanded = shellexpand::full(&config.toolchain.workspace).with_context(|| {
        format!(
            "Failed to expand workspace path `{}`",
            config.toolchain.workspace
        )
    })?;
    let path = PathBuf::from(expanded.as_ref());
    Ok(if path.is_absolute() {
        path
    } else {
        walk_root.join(path)
    })
}

/// Resolves every configured version into a toolchain instance, preserving
/// the configured order.
///
/// 将每个配置的版本解析为工具链实例，保持配置顺序。
pub fn resolve_toolchains(
    config: &MatrixConfig,
    workspace_root: &Path,
) -> Result<Vec<ToolchainInstance>> {
    config
        .versions
        .iter()
        .map(|version| {
            Ok(ToolchainInstance {
                version: version.clone(),
                root: PathBuf::from(expand_template(&config.toolchain.root, version)?),
                binary: PathBuf::from(expand_template(&config.toolchain.binary, version)?),
                workspace: workspace_root.join(version),
                workspace_env: config.toolchain.workspace_env.clone(),
                root_env: config.toolchain.root_env.clone(),
            })
        })
        .collect()
}
