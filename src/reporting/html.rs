//! # HTML Reporting Module / HTML 报告模块
//!
//! Renders the invocation records as a single self-contained HTML page: a grid
//! with one row per target and one column per version, plus the install
//! outcomes. Each cell links the status to the log file holding its output.
//!
//! 将调用记录渲染为一个独立的 HTML 页面：每个目标一行、每个版本一列的网格，
//! 以及依赖安装结果。每个单元格的状态都链接到包含其输出的日志文件。

use anyhow::{Context, Result};
use chrono::Local;
use maud::{DOCTYPE, Markup, html};
use std::fs;
use std::path::Path;

use crate::core::models::{InvocationKind, InvocationRecord, Target, ToolchainInstance};
use crate::infra::t;

/// Embedded CSS styles for HTML reports / HTML 报告的嵌入式 CSS 样式
const HTML_STYLE: &str = r#"
body { font-family: -apple-system, "Segoe UI", Helvetica, Arial, sans-serif; margin: 2em; color: #24292e; }
h1 { font-size: 1.6em; }
.meta { color: #6a737d; margin-bottom: 1.5em; }
table { border-collapse: collapse; margin-bottom: 2em; }
th, td { border: 1px solid #e1e4e8; padding: 6px 12px; text-align: left; }
th { background: #f6f8fa; }
td.status a { color: inherit; text-decoration: none; }
td.passed { background: #dcffe4; }
td.failed { background: #fff5b1; }
td.error { background: #ffdce0; }
td.skipped, td.missing { background: #f6f8fa; color: #6a737d; }
"#;

/// Builds the report page.
///
/// # Arguments / 参数
/// * `targets` - Targets in walk order (rows)
///               按遍历顺序排列的目标（行）
/// * `toolchains` - Toolchains in configured order (columns)
///                  按配置顺序排列的工具链（列）
/// * `records` - All invocation records of the run
///               本次运行的所有调用记录
pub fn render_html_report(
    targets: &[Target],
    toolchains: &[ToolchainInstance],
    records: &[InvocationRecord],
) -> Markup {
    let installs: Vec<&InvocationRecord> = records
        .iter()
        .filter(|r| matches!(r.kind, InvocationKind::Install { .. }))
        .collect();

    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (t!("html_report.title")) }
                style { (maud::PreEscaped(HTML_STYLE)) }
            }
            body {
                h1 { (t!("html_report.title")) }
                p.meta {
                    (t!("html_report.generated_at", time = Local::now().format("%Y-%m-%d %H:%M:%S")))
                }

                @if !installs.is_empty() {
                    h2 { (t!("html_report.installs")) }
                    table {
                        thead { tr {
                            th { (t!("html_report.version")) }
                            th { (t!("html_report.package")) }
                            th { (t!("html_report.status")) }
                        } }
                        tbody {
                            @for record in &installs {
                                tr {
                                    td { (record.version) }
                                    td {
                                        @if let InvocationKind::Install { package } = &record.kind {
                                            code { (package) }
                                        }
                                    }
                                    td class={ "status " (record.status.css_class()) } {
                                        (record.status.short_label())
                                    }
                                }
                            }
                        }
                    }
                }

                h2 { (t!("html_report.matrix")) }
                table {
                    thead { tr {
                        th { (t!("html_report.target")) }
                        th { (t!("html_report.action")) }
                        @for toolchain in toolchains {
                            th { (toolchain.version) }
                        }
                    } }
                    tbody {
                        @for target in targets {
                            tr {
                                td { code { (target.path.display().to_string()) } }
                                td { (target.action.to_string()) }
                                @for toolchain in toolchains {
                                    (matrix_cell(find_record(records, target, &toolchain.version)))
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn find_record<'a>(
    records: &'a [InvocationRecord],
    target: &Target,
    version: &str,
) -> Option<&'a InvocationRecord> {
    records
        .iter()
        .find(|r| r.version == version && r.target_path() == Some(&target.path))
}

fn matrix_cell(record: Option<&InvocationRecord>) -> Markup {
    match record {
        Some(record) => {
            let href = record.sink.as_deref().map(sink_href).unwrap_or_default();
            html! {
                td class={ "status " (record.status.css_class()) } {
                    a href=(href) { (record.status.short_label()) }
                    " "
                    small { (format!("{:.2}s", record.duration.as_secs_f64())) }
                }
            }
        }
        None => html! { td.status.missing { "-" } },
    }
}

fn sink_href(sink: &Path) -> String {
    format!("file://{}", sink.display())
}

/// Renders and writes the HTML report to `output_path`.
/// 渲染 HTML 报告并写入 `output_path`。
pub fn generate_html_report(
    targets: &[Target],
    toolchains: &[ToolchainInstance],
    records: &[InvocationRecord],
    output_path: &Path,
) -> Result<()> {
    let markup = render_html_report(targets, toolchains, records);
    fs::write(output_path, markup.into_string())
        .with_context(|| format!("Failed to write HTML report: {}", output_path.display()))
}
