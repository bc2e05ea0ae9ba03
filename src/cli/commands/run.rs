//! # Run Command Module / 运行命令模块
//!
//! This module implements the `run` command: load the configuration, resolve
//! the toolchains, install dependencies, walk the tree and run every target
//! under every version, then report.
//!
//! 此模块实现 `run` 命令：加载配置、解析工具链、安装依赖、遍历目录树、
//! 在每个版本下运行每个目标，最后输出报告。

use anyhow::{Result, bail};
use colored::*;
use std::path::{Path, PathBuf};
use tokio::signal;
use tokio_util::sync::CancellationToken;

use crate::{
    core::{
        config::{self, DEFAULT_CONFIG_FILE, MatrixConfig},
        execution::{ExecutionReport, RunContext, execute_groups, install_dependencies},
        models::{Action, Grouping},
        planner, toolchain,
    },
    infra::{fs, t},
    reporting::{console, html::generate_html_report, json},
};

/// Options of the `run` command, as parsed from the command line.
/// 从命令行解析出的 `run` 命令选项。
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Explicit config file; `None` means `ToolchainMatrix.toml` if present.
    pub config: Option<PathBuf>,
    pub root: PathBuf,
    /// Overrides the configured grouping.
    pub grouping: Option<Grouping>,
    pub skip_install: bool,
    pub dry_run: bool,
    pub html: Option<PathBuf>,
    pub json: Option<PathBuf>,
    /// Language given with `--lang`; wins over the configured language.
    pub explicit_lang: Option<String>,
}

/// Executes the run command with the provided options.
///
/// Subprocess failures never make this fail. Errors are returned for
/// configuration, traversal, log file and report I/O problems, and when the
/// run was interrupted.
///
/// 使用给定选项执行 run 命令。子进程失败永远不会导致此函数失败。
/// 配置、遍历、日志文件和报告 I/O 出错以及运行被中断时返回错误。
pub async fn execute(options: RunOptions) -> Result<()> {
    let cwd = fs::current_dir()?;
    let (mut matrix, config_source) = load_config(options.config.as_deref(), &cwd)?;

    if options.explicit_lang.is_none() {
        crate::init_locale(Some(matrix.language.as_str()));
    }
    if let Some(grouping) = options.grouping {
        matrix.grouping = grouping;
    }

    let root = fs::absolute_path(&options.root)?;
    let workspace_root = toolchain::workspace_root(&matrix, &root)?;
    let toolchains = toolchain::resolve_toolchains(&matrix, &workspace_root)?;

    println!("{}", t!("config_source", source = config_source));
    println!("{}", t!("root_detected", path = root.display()));
    println!("{}", t!("workspace_detected", path = workspace_root.display()));
    println!("{}", t!("grouping_selected", grouping = matrix.grouping.to_string().yellow()));
    console::print_toolchains(&toolchains);

    if toolchains.is_empty() {
        println!("{}", t!("no_versions").yellow());
    }

    let plan = planner::plan_targets(&root, &workspace_root, &matrix.targets)?;
    println!(
        "{}",
        t!(
            "targets_found",
            tests = plan.count(Action::Test),
            runs = plan.count(Action::Run)
        )
        .cyan()
    );
    if plan.workspace_pruned {
        println!("{}", t!("workspace_pruned").dimmed());
    }

    let groups = planner::plan_sinks(
        matrix.grouping,
        &plan.targets,
        &toolchains,
        &matrix.output.log_suffix,
    );

    if options.dry_run {
        let output_dir = fs::resolve_dir(&cwd, &matrix.output.dir);
        console::print_plan(&plan.targets, &groups, &output_dir);
        return Ok(());
    }

    let output_dir = fs::ensure_dir(&cwd, &matrix.output.dir)?;
    let stop_token = setup_signal_handler();

    let ctx = RunContext {
        config: &matrix,
        toolchains: &toolchains,
        root: &root,
        output_dir: &output_dir,
        stop_token,
    };

    let mut report = ExecutionReport::default();
    if options.skip_install {
        println!("{}", t!("install_skipped").dimmed());
    } else if !matrix.packages.is_empty() {
        println!("\n{}", t!("install_banner").bold());
        install_dependencies(&ctx, &mut report).await;
    }

    if plan.targets.is_empty() {
        println!("{}", t!("no_targets").green());
    } else {
        println!("\n{}", t!("execution_banner").bold());
    }
    // Per-version sinks exist even for an empty tree, so stale logs are truncated.
    execute_groups(&ctx, &plan.targets, &groups, &mut report).await?;

    console::print_summary(&report.records, &report.sinks);

    if let Some(html_path) = &options.html {
        generate_html_report(&plan.targets, &toolchains, &report.records, html_path)?;
        println!("{}", t!("html_report_written", path = html_path.display()));
    }
    if let Some(json_path) = &options.json {
        json::write_json_report(
            &json::JsonReport {
                generated_at: chrono::Local::now(),
                grouping: matrix.grouping,
                interrupted: report.interrupted,
                toolchains: &toolchains,
                sinks: &report.sinks,
                invocations: &report.records,
            },
            json_path,
        )?;
        println!("{}", t!("json_report_written", path = json_path.display()));
    }

    if report.interrupted {
        bail!(t!("run_interrupted").to_string());
    }

    println!("\n{}", t!("run_complete").green().bold());
    Ok(())
}

/// Loads the configuration.
///
/// An explicit path must exist. Without one, `ToolchainMatrix.toml` in the
/// current directory is used when present, otherwise the built-in defaults.
///
/// 加载配置。显式指定的路径必须存在；未指定时，若当前目录存在
/// `ToolchainMatrix.toml` 则使用它，否则使用内置默认值。
pub fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<(MatrixConfig, String)> {
    match explicit {
        Some(path) => {
            let path = fs::absolute_path(path)?;
            let matrix = config::load_matrix_config(&path)?;
            Ok((matrix, path.display().to_string()))
        }
        None => {
            let default_path = cwd.join(DEFAULT_CONFIG_FILE);
            if default_path.is_file() {
                let matrix = config::load_matrix_config(&default_path)?;
                Ok((matrix, default_path.display().to_string()))
            } else {
                Ok((MatrixConfig::default(), t!("builtin_defaults").to_string()))
            }
        }
    }
}

/// Sets up a Ctrl-C handler that cancels the returned token.
fn setup_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            println!("\n{}", t!("shutdown_signal").yellow());
            token_clone.cancel();
        }
    });

    token
}
