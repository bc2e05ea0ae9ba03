//! # Console Reporting Module / 控制台报告模块
//!
//! Colored, localized progress lines and the end-of-run summary. Nothing here
//! influences the exit status of a run.
//!
//! 带颜色和本地化的进度行以及运行结束时的摘要。这里的任何内容都不影响运行的退出状态。

use colored::*;
use std::path::Path;

use crate::core::models::{
    Action, InvocationKind, InvocationRecord, InvocationStatus, SinkGroup, Target,
    ToolchainInstance,
};
use crate::infra::t;

pub fn print_install_start(version: &str, command: &str) {
    println!(
        "{}",
        t!("install_start", version = version, command = command).blue()
    );
}

pub fn print_sink_start(path: &Path) {
    println!("{}", t!("sink_start", path = path.display()).cyan().bold());
}

pub fn print_target_start(version: &str, command: &str) {
    println!("{}", t!("target_start", version = version, command = command).blue());
}

/// Prints the outcome of one invocation, colored by status.
/// 打印一次调用的结果，按状态着色。
pub fn print_invocation_result(record: &InvocationRecord) {
    let line = format!(
        "    {} {} ({:.2?})",
        "→".dimmed(),
        record.status.short_label(),
        record.duration
    );
    let colored_line = match &record.status {
        InvocationStatus::Success => line.green(),
        InvocationStatus::Failed { .. } => line.yellow(),
        InvocationStatus::SpawnFailed { message } => {
            format!("{}: {}", line, message).red()
        }
        InvocationStatus::TimedOut => line.red(),
        InvocationStatus::Cancelled => line.dimmed(),
    };
    println!("{}", colored_line);
}

/// Prints the resolved toolchains, one per line.
pub fn print_toolchains(toolchains: &[ToolchainInstance]) {
    println!("{}", t!("toolchains_banner").bold());
    for toolchain in toolchains {
        println!(
            "  - {:<10} {} ({}={}, {}={})",
            toolchain.version.yellow(),
            toolchain.binary.display(),
            toolchain.root_env,
            toolchain.root.display(),
            toolchain.workspace_env,
            toolchain.workspace.display()
        );
    }
}

/// Prints the sink layout without running anything (`--dry-run`).
/// 打印日志文件布局而不运行任何内容（`--dry-run`）。
pub fn print_plan(targets: &[Target], groups: &[SinkGroup], output_dir: &Path) {
    println!("{}", t!("plan_banner").bold());
    for group in groups {
        println!("  {}", output_dir.join(&group.file_name).display().to_string().cyan());
        for section in &group.sections {
            let target = &targets[section.target];
            let action = match target.action {
                Action::Run => "run".green(),
                Action::Test => "test".magenta(),
            };
            println!("    >>>>> {:<30} {} {}", section.label, action, target.path.display());
        }
    }
}

/// Prints the final summary: per-status counts and the sinks written.
///
/// # Output Format / 输出格式
/// ```text
/// --- Matrix Summary ---
///   installs:    4 ok, 0 failed
///   invocations: 6 ok, 2 failed, 0 errors
///   log files:
///     - /work/a.go.txt
/// ```
pub fn print_summary(records: &[InvocationRecord], sinks: &[std::path::PathBuf]) {
    let (installs, targets): (Vec<_>, Vec<_>) = records
        .iter()
        .partition(|r| matches!(r.kind, InvocationKind::Install { .. }));

    let count = |records: &[&InvocationRecord], pred: fn(&InvocationStatus) -> bool| {
        records.iter().filter(|r| pred(&r.status)).count()
    };

    println!("\n{}", t!("summary_banner").bold());
    println!(
        "  {}",
        t!(
            "summary_installs",
            ok = count(&installs, InvocationStatus::is_success),
            failed = installs.len() - count(&installs, InvocationStatus::is_success)
        )
    );
    println!(
        "  {}",
        t!(
            "summary_invocations",
            ok = count(&targets, InvocationStatus::is_success).to_string().green(),
            failed = count(&targets, is_failed).to_string().yellow(),
            errors = count(&targets, is_error).to_string().red()
        )
    );

    if !sinks.is_empty() {
        println!("  {}", t!("summary_sinks"));
        for sink in sinks {
            println!("    - {}", sink.display());
        }
    }
}

fn is_failed(status: &InvocationStatus) -> bool {
    matches!(status, InvocationStatus::Failed { .. })
}

fn is_error(status: &InvocationStatus) -> bool {
    matches!(
        status,
        InvocationStatus::SpawnFailed { .. } | InvocationStatus::TimedOut
    )
}
