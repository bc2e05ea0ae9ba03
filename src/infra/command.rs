//! # Command Execution Module / 命令执行模块
//!
//! Builds toolchain invocations and runs them to completion, with optional
//! timeout and cancellation. The per-version environment is attached to each
//! `Command`; the runner's own environment is never modified.
//!
//! 构建工具链调用并运行至结束，支持可选的超时和取消。
//! 每个版本的环境变量附加在各自的 `Command` 上，从不修改运行器自身的环境。

use std::ffi::OsStr;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::process::{Child, Command};
use tokio_util::sync::CancellationToken;

use crate::core::models::{InvocationStatus, ToolchainInstance};

/// Builds `<binary> <action> <argument>` for `toolchain`, with the version's
/// workspace and installation root exported to the child only.
///
/// # Arguments
/// * `toolchain` - The resolved toolchain for one version.
/// * `action` - The toolchain sub-command (`get`, `run`, `test`, ...).
/// * `argument` - The package or target path.
/// * `working_dir` - Directory the child runs in.
///
/// 为 `toolchain` 构建 `<binary> <action> <argument>` 命令，
/// 版本的工作区和安装根目录只导出给子进程。
pub fn toolchain_command(
    toolchain: &ToolchainInstance,
    action: &str,
    argument: impl AsRef<OsStr>,
    working_dir: &Path,
) -> Command {
    let mut cmd = Command::new(&toolchain.binary);
    cmd.arg(action).arg(argument).current_dir(working_dir);
    for (key, value) in toolchain.env() {
        cmd.env(key, value);
    }
    cmd
}

/// Renders a command line for display, quoting arguments the way a POSIX
/// shell would need them.
///
/// 渲染用于显示的命令行，按 POSIX shell 的需要对参数加引号。
pub fn display_command(toolchain: &ToolchainInstance, action: &str, argument: &str) -> String {
    let binary = toolchain.binary.to_string_lossy();
    let parts = [binary.as_ref(), action, argument];
    shlex::try_join(parts).unwrap_or_else(|_| parts.join(" "))
}

/// Spawns `cmd` with the given output streams and waits for it.
///
/// Never fails: a process that cannot be started is reported as
/// [`InvocationStatus::SpawnFailed`]. When `timeout` elapses or `stop_token`
/// is cancelled the child is killed before returning.
///
/// # Returns
/// The final [`InvocationStatus`] of the child.
///
/// 使用给定的输出流派生 `cmd` 并等待其结束。
/// 此函数不会失败：无法启动的进程会被报告为 [`InvocationStatus::SpawnFailed`]。
/// 超时或 `stop_token` 被取消时，子进程会在返回前被终止。
pub async fn run_to_completion(
    mut cmd: Command,
    stdout: Stdio,
    stderr: Stdio,
    timeout: Option<Duration>,
    stop_token: &CancellationToken,
) -> InvocationStatus {
    cmd.stdin(Stdio::null())
        .stdout(stdout)
        .stderr(stderr)
        .kill_on_drop(true);

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => {
            return InvocationStatus::SpawnFailed {
                message: e.to_string(),
            };
        }
    };

    let status = tokio::select! {
        biased;
        _ = stop_token.cancelled() => InvocationStatus::Cancelled,
        waited = wait_with_timeout(&mut child, timeout) => match waited {
            Some(Ok(exit)) => status_from_exit(exit),
            Some(Err(e)) => InvocationStatus::SpawnFailed { message: e.to_string() },
            None => InvocationStatus::TimedOut,
        },
    };

    if matches!(
        status,
        InvocationStatus::Cancelled | InvocationStatus::TimedOut
    ) {
        // The child may already be gone; nothing left to do in that case.
        let _ = child.kill().await;
    }

    status
}

/// Waits for `child`, giving up after `timeout` if one is set.
/// Returns `None` when the timeout elapsed.
async fn wait_with_timeout(
    child: &mut Child,
    timeout: Option<Duration>,
) -> Option<std::io::Result<ExitStatus>> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, child.wait()).await.ok(),
        None => Some(child.wait().await),
    }
}

fn status_from_exit(exit: ExitStatus) -> InvocationStatus {
    if exit.success() {
        InvocationStatus::Success
    } else {
        InvocationStatus::Failed { code: exit.code() }
    }
}
