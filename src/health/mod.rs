//! 健康检测模块
//!
//! 提供状态数据结构、超时保护、依赖能力校验、指标变体与检测执行器

pub mod capability;
pub mod executor;
pub mod indicator;
pub mod indicators;
pub mod result;
pub mod timeout;

// 重新导出主要类型
pub use capability::CapabilityRegistry;
pub use executor::{health_check, HealthCheckExecutor, HealthIndicatorFunction};
pub use indicator::{HealthIndicator, ProbeResult};
pub use result::{
    check_status, check_status_with, HealthReport, HealthStatus, IndicatorStatus, ReportStatus,
    StatusResult,
};
pub use timeout::{with_deadline, TimeoutExpired};
