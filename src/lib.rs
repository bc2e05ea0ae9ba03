//! # Toolchain Matrix Library / Toolchain Matrix 库
//!
//! This library provides the core functionality for the `toolchain-matrix`
//! tool, which runs or tests every source file in a tree under several
//! installed toolchain versions and captures the output in log files.
//!
//! 此库为 `toolchain-matrix` 工具提供核心功能：在多个已安装的工具链版本下
//! 运行或测试源码树中的每个源文件，并将输出记录到日志文件中。
//!
//! ## Modules / 模块
//!
//! - `core` - Configuration, models, planning and sequential execution
//! - `infra` - Subprocess execution, log sinks and path handling
//! - `reporting` - Console, HTML and JSON reporting
//! - `cli` - Command-line interface and commands
//!
//! - `core` - 配置、数据模型、执行计划和顺序执行
//! - `infra` - 子进程执行、日志文件和路径处理
//! - `reporting` - 控制台、HTML 和 JSON 报告
//! - `cli` - 命令行接口和命令

pub mod cli;
pub mod core;
pub mod infra;
pub mod reporting;

// Re-export commonly used items
pub use core::config;
pub use core::models;
pub use core::planner;

/// Picks the language for console messages and activates it.
///
/// An explicit choice wins; otherwise the system locale is used. The full
/// locale (e.g. "zh-CN") is tried first, then its language part (e.g. "en"
/// from "en-US"), and finally the default language ("en").
///
/// 选择控制台消息的语言并激活。显式指定的语言优先，否则使用系统语言。
/// 依次尝试完整语言标识（如 "zh-CN"）、语言部分（如 "en-US" 中的 "en"），最后回退到 "en"。
pub fn init_locale(explicit: Option<&str>) -> String {
    let requested = explicit
        .map(str::to_string)
        .or_else(sys_locale::get_locale)
        .unwrap_or_else(|| "en".to_string());
    let available_locales = rust_i18n::available_locales!();

    let lang = if available_locales.contains(&requested.as_str()) {
        requested.as_str()
    } else {
        requested
            .split(['-', '_'])
            .next()
            .filter(|lang_code| available_locales.contains(lang_code))
            .unwrap_or("en")
    };

    rust_i18n::set_locale(lang);
    lang.to_string()
}

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");
