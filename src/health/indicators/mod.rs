//! 健康指标变体
//!
//! 每个变体包装一种外部系统，把各自的失败路径归一化为已诊断失败

pub mod database;
pub mod disk;
pub mod http;
pub mod memory;
pub mod tcp;

// 重新导出主要类型
pub use database::{
    DatabaseCheckOptions, DatabaseHealthIndicator, DatabasePinger, DATABASE_CAPABILITY,
};
pub use disk::{DiskCheckOptions, DiskHealthIndicator};
pub use http::{
    HttpCheckOptions, HttpHealthIndicator, HttpPingProbe, PingResponse, HTTP_CLIENT_CAPABILITY,
};
pub use memory::{MemoryCheckOptions, MemoryHealthIndicator};
pub use tcp::{TcpCheckOptions, TcpHealthIndicator};
