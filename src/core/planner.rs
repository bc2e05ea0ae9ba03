//! # Execution Planner Module / 执行计划模块
//!
//! Walks the source tree, classifies files into run and test targets, and lays
//! the resulting (target, version) pairs out into log sinks according to the
//! configured [`Grouping`].
//!
//! 遍历源码树，将文件分类为运行目标和测试目标，并根据配置的 [`Grouping`]
//! 将 (目标, 版本) 组合分配到各个日志文件中。

use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::core::config::TargetsConfig;
use crate::core::models::{Action, Grouping, Section, SinkGroup, Target, ToolchainInstance};

/// Everything discovered by one walk of the source tree.
/// 一次源码树遍历所发现的全部内容。
#[derive(Debug, Default)]
pub struct ExecutionPlan {
    /// Targets in walk order.
    /// 按遍历顺序排列的目标。
    pub targets: Vec<Target>,
    /// Whether the workspace subtree was found and pruned.
    /// 是否发现并跳过了工作区子树。
    pub workspace_pruned: bool,
}

impl ExecutionPlan {
    pub fn count(&self, action: Action) -> usize {
        self.targets.iter().filter(|t| t.action == action).count()
    }
}

/// Classifies a single file name. Test targets win over run targets, so
/// `a_test.go` is tested even though it also ends with `.go`.
///
/// 对单个文件名进行分类。测试目标优先于运行目标。
pub fn classify(file_name: &str, rules: &TargetsConfig) -> Option<Action> {
    if rules.exclude.iter().any(|excluded| excluded == file_name) {
        return None;
    }
    if file_name.ends_with(&rules.test_suffix) {
        Some(Action::Test)
    } else if file_name.ends_with(&rules.source_suffix) {
        Some(Action::Run)
    } else {
        None
    }
}

/// Walks `root` depth-first, entries sorted by file name, and collects every
/// classified file. The subtree rooted at `workspace_root` is never entered.
///
/// Any error reading the root or a directory aborts the walk.
///
/// 深度优先遍历 `root`（按文件名排序），收集所有被分类的文件。
/// 永远不会进入 `workspace_root` 子树。读取根目录或任何目录出错都会中止遍历。
pub fn plan_targets(
    root: &Path,
    workspace_root: &Path,
    rules: &TargetsConfig,
) -> Result<ExecutionPlan> {
    let mut workspace_pruned = false;
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            let inside_workspace = entry.path().starts_with(workspace_root);
            if inside_workspace {
                workspace_pruned = true;
            }
            !inside_workspace
        });

    let mut targets = Vec::new();
    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
        if entry.file_type().is_dir() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy();
        if let Some(action) = classify(&file_name, rules) {
            targets.push(Target {
                path: entry.path().to_path_buf(),
                action,
            });
        }
    }

    Ok(ExecutionPlan {
        targets,
        workspace_pruned,
    })
}

/// Lays out the sinks for a plan.
///
/// * `PerFile`: one sink per target named `<file name><log_suffix>`, one
///   section per version labelled with the version.
/// * `PerVersion`: one sink per version named `<version><log_suffix>`, one
///   section per target labelled with the target path.
///
/// 为执行计划安排日志文件布局。
pub fn plan_sinks(
    grouping: Grouping,
    targets: &[Target],
    toolchains: &[ToolchainInstance],
    log_suffix: &str,
) -> Vec<SinkGroup> {
    match grouping {
        Grouping::PerFile => targets
            .iter()
            .enumerate()
            .map(|(target_idx, target)| SinkGroup {
                file_name: {
                    let mut name = target.file_name().to_os_string();
                    name.push(log_suffix);
                    name
                },
                sections: toolchains
                    .iter()
                    .enumerate()
                    .map(|(toolchain_idx, toolchain)| Section {
                        label: toolchain.version.clone(),
                        target: target_idx,
                        toolchain: toolchain_idx,
                    })
                    .collect(),
            })
            .collect(),
        Grouping::PerVersion => toolchains
            .iter()
            .enumerate()
            .map(|(toolchain_idx, toolchain)| SinkGroup {
                file_name: OsString::from(format!("{}{}", toolchain.version, log_suffix)),
                sections: targets
                    .iter()
                    .enumerate()
                    .map(|(target_idx, target)| Section {
                        label: target.path.display().to_string(),
                        target: target_idx,
                        toolchain: toolchain_idx,
                    })
                    .collect(),
            })
            .collect(),
    }
}

/// Resolves a sink file name inside the output directory.
pub fn sink_path(output_dir: &Path, group: &SinkGroup) -> PathBuf {
    output_dir.join(&group.file_name)
}
