//! # Reporting Module / 报告模块
//!
//! Console progress and summaries, plus the optional HTML matrix report and
//! JSON dump. Reports describe a run; they never change its exit status.
//!
//! 控制台进度和摘要，以及可选的 HTML 矩阵报告和 JSON 导出。
//! 报告只描述运行结果，从不改变其退出状态。

pub mod console;
pub mod html;
pub mod json;

pub use console::print_summary;
pub use html::generate_html_report;
pub use json::write_json_report;
