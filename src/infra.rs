//! # Infrastructure Module / 基础设施模块
//!
//! This module provides infrastructure services for the runner:
//! subprocess execution, log sinks and path handling, and i18n support.
//!
//! 此模块为运行器提供基础设施服务：子进程执行、日志文件与路径处理，以及国际化支持。

pub mod command;
pub mod fs;

// Re-export i18n functions for easier access
pub use rust_i18n::t;
