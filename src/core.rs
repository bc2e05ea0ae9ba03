//! # Core Module / 核心模块
//!
//! Configuration, data models, toolchain resolution, planning (tree walk and
//! sink layout) and sequential execution.
//!
//! 配置、数据模型、工具链解析、执行计划（目录遍历和日志文件布局）以及顺序执行。

pub mod config;
pub mod execution;
pub mod models;
pub mod planner;
pub mod toolchain;

// Re-exports
pub use config::MatrixConfig;
pub use execution::{ExecutionReport, RunContext};
pub use planner::ExecutionPlan;
