//! # Execution Module / 执行模块
//!
//! Drives the toolchains: installs dependency packages for every version, then
//! walks the planned sink groups, writing one marker per section and running
//! the toolchain with its output redirected into the sink.
//!
//! Everything here is strictly sequential. A failing subprocess is recorded
//! and never changes control flow; only sink I/O errors abort a run.
//!
//! 驱动各工具链：先为每个版本安装依赖包，然后遍历规划好的日志文件分组，
//! 为每个分段写入标记行，并将工具链的输出重定向到日志文件。
//! 所有操作严格顺序执行。子进程失败只会被记录，不会改变控制流；
//! 只有日志文件的 I/O 错误才会中止运行。

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use crate::core::config::MatrixConfig;
use crate::core::models::{
    Action, InvocationKind, InvocationRecord, InvocationStatus, SinkGroup, Target,
    ToolchainInstance,
};
use crate::core::planner::sink_path;
use crate::infra::command::{display_command, run_to_completion, toolchain_command};
use crate::infra::fs::Sink;
use crate::reporting::console;

/// Shared inputs of a matrix run.
/// 一次矩阵运行的共享输入。
pub struct RunContext<'a> {
    pub config: &'a MatrixConfig,
    pub toolchains: &'a [ToolchainInstance],
    /// Walk root; also the working directory of every child.
    pub root: &'a Path,
    /// Directory receiving the log sinks.
    pub output_dir: &'a Path,
    pub stop_token: CancellationToken,
}

impl RunContext<'_> {
    fn timeout(&self) -> Option<Duration> {
        self.config.toolchain.timeout_secs.map(Duration::from_secs)
    }

    fn action_name(&self, action: Action) -> &str {
        match action {
            Action::Run => &self.config.toolchain.run_action,
            Action::Test => &self.config.toolchain.test_action,
        }
    }
}

/// Records produced by a run, plus whether it was cut short by Ctrl-C.
/// 运行产生的记录，以及是否被 Ctrl-C 中断。
#[derive(Debug, Default)]
pub struct ExecutionReport {
    pub records: Vec<InvocationRecord>,
    /// Sinks created, in creation order.
    pub sinks: Vec<PathBuf>,
    pub interrupted: bool,
}

/// Installs every configured package for every configured version, in
/// version-major, package-minor order. Child output goes to our stderr.
///
/// Failures are recorded and otherwise ignored.
///
/// 按“版本优先、包其次”的顺序为每个版本安装每个配置的包。子进程输出写入本程序的 stderr。
/// 失败只会被记录，其他情况下被忽略。
pub async fn install_dependencies(ctx: &RunContext<'_>, report: &mut ExecutionReport) {
    let install_action = &ctx.config.toolchain.install_action;

    for toolchain in ctx.toolchains {
        for package in &ctx.config.packages {
            if ctx.stop_token.is_cancelled() {
                report.interrupted = true;
                return;
            }

            console::print_install_start(
                &toolchain.version,
                &display_command(toolchain, install_action, package),
            );

            let cmd = toolchain_command(toolchain, install_action, package, ctx.root);
            let start = Instant::now();
            let status = run_to_completion(
                cmd,
                Stdio::from(std::io::stderr()),
                Stdio::from(std::io::stderr()),
                ctx.timeout(),
                &ctx.stop_token,
            )
            .await;

            let record = InvocationRecord {
                version: toolchain.version.clone(),
                kind: InvocationKind::Install {
                    package: package.clone(),
                },
                sink: None,
                status,
                duration: start.elapsed(),
            };
            console::print_invocation_result(&record);
            if record.status == InvocationStatus::Cancelled {
                report.interrupted = true;
            }
            report.records.push(record);
        }
    }
}

/// Runs every section of every sink group.
///
/// Each sink is created (truncated) when its group starts and closed when the
/// group ends, before the next sink is opened.
///
/// # Returns
/// An error only when a sink cannot be created, written or closed.
///
/// 运行每个日志文件分组的每个分段。
/// 每个日志文件在其分组开始时创建（截断），在分组结束时关闭，然后才打开下一个。
/// 仅当日志文件无法创建、写入或关闭时返回错误。
pub async fn execute_groups(
    ctx: &RunContext<'_>,
    targets: &[Target],
    groups: &[SinkGroup],
    report: &mut ExecutionReport,
) -> Result<()> {
    for group in groups {
        if ctx.stop_token.is_cancelled() {
            report.interrupted = true;
            break;
        }

        let path = sink_path(ctx.output_dir, group);
        let mut sink = Sink::create(&path)?;
        report.sinks.push(path);
        console::print_sink_start(sink.path());

        let result = run_group(ctx, targets, group, &mut sink, report).await;
        let closed = sink.close();
        result?;
        closed?;
    }
    Ok(())
}

async fn run_group(
    ctx: &RunContext<'_>,
    targets: &[Target],
    group: &SinkGroup,
    sink: &mut Sink,
    report: &mut ExecutionReport,
) -> Result<()> {
    for section in &group.sections {
        if ctx.stop_token.is_cancelled() {
            report.interrupted = true;
            return Ok(());
        }

        let target = &targets[section.target];
        let toolchain = &ctx.toolchains[section.toolchain];
        let record = run_section(ctx, target, toolchain, &section.label, sink).await?;
        if record.status == InvocationStatus::Cancelled {
            report.interrupted = true;
        }
        report.records.push(record);
    }
    Ok(())
}

/// Writes the marker for one section and runs the toolchain into the sink.
/// 为一个分段写入标记行，并运行工具链，输出写入日志文件。
pub async fn run_section(
    ctx: &RunContext<'_>,
    target: &Target,
    toolchain: &ToolchainInstance,
    label: &str,
    sink: &mut Sink,
) -> Result<InvocationRecord> {
    let action = ctx.action_name(target.action);
    sink.write_marker(label)?;

    console::print_target_start(
        &toolchain.version,
        &display_command(toolchain, action, &target.path.to_string_lossy()),
    );

    let (stdout, stderr) = sink.child_stdio()?;
    let cmd = toolchain_command(toolchain, action, &target.path, ctx.root);
    let start = Instant::now();
    let status = run_to_completion(cmd, stdout, stderr, ctx.timeout(), &ctx.stop_token).await;
    let duration = start.elapsed();

    if let (InvocationStatus::TimedOut, Some(secs)) = (&status, ctx.config.toolchain.timeout_secs) {
        sink.write_note(&format!("timed out after {}s", secs))?;
    }

    let record = InvocationRecord {
        version: toolchain.version.clone(),
        kind: InvocationKind::Target {
            action: target.action,
            path: target.path.clone(),
        },
        sink: Some(sink.path().to_path_buf()),
        status,
        duration,
    };
    console::print_invocation_result(&record);
    Ok(record)
}
