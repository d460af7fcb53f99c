//! Service Pulse - 健康检测聚合库
//!
//! 这是一个用Rust编写的健康检测聚合库，支持：
//! - HTTP/HTTPS可达性检测与响应谓词
//! - TCP端口连通性检测
//! - 数据库连接往返检测
//! - 磁盘/内存阈值检测
//! - 超时归一化与失败隔离
//! - 单一确定性聚合报告

pub mod config;
pub mod error;
pub mod health;
pub mod logging;

// 重新导出主要类型
pub use config::{Config, GlobalConfig, ProbeConfig};
pub use error::{CheckError, ProbeError, ServicePulseError};
pub use health::{
    check_status, check_status_with, HealthCheckExecutor, HealthReport, HealthStatus, StatusResult,
};

/// 库版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 库名称
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// 库描述
pub const APP_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
