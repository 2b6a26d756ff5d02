//! 工具模块 - 通用工具函数和类型
//!
//! - [`AppError`] / [`AppResponse`] - 应用错误类型和响应结构
//! - [`logger`] - 日志初始化
//! - [`time`] - 业务时区的日期工具

pub mod error;
pub mod logger;
pub mod result;
pub mod time;

pub use error::{AppError, AppResponse};
pub use result::AppResult;
