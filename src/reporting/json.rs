//! # JSON Reporting Module / JSON 报告模块
//!
//! Machine-readable dump of a run: the resolved toolchains and every
//! invocation record.
//!
//! 运行结果的机器可读导出：解析出的工具链以及每条调用记录。

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::models::{Grouping, InvocationRecord, ToolchainInstance};

#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub generated_at: DateTime<Local>,
    pub grouping: Grouping,
    pub interrupted: bool,
    pub toolchains: &'a [ToolchainInstance],
    pub sinks: &'a [PathBuf],
    pub invocations: &'a [InvocationRecord],
}

/// Serializes `report` as pretty-printed JSON into `output_path`.
/// 将 `report` 以格式化 JSON 写入 `output_path`。
pub fn write_json_report(report: &JsonReport<'_>, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize JSON report")?;
    fs::write(output_path, json)
        .with_context(|| format!("Failed to write JSON report: {}", output_path.display()))
}
