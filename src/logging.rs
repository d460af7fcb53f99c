//! 日志系统模块
//!
//! 提供结构化日志配置和初始化功能

use log::LevelFilter;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

/// 日志配置结构
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// 日志级别
    pub level: LevelFilter,
    /// 是否输出到控制台
    pub console: bool,
    /// 是否使用JSON格式
    pub json_format: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::Info,
            console: true,
            json_format: false,
        }
    }
}

/// 全局初始化标记
static LOGGING_INITIALIZED: OnceLock<()> = OnceLock::new();

/// 把日志级别转换为过滤指令
fn level_directive(level: LevelFilter) -> &'static str {
    match level {
        LevelFilter::Off => "off",
        LevelFilter::Error => "error",
        LevelFilter::Warn => "warn",
        LevelFilter::Info => "info",
        LevelFilter::Debug => "debug",
        LevelFilter::Trace => "trace",
    }
}

/// 安装全局订阅器，已有订阅器时静默跳过
fn set_global<S>(subscriber: S)
where
    S: tracing::Subscriber + Send + Sync + 'static,
{
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// 初始化日志系统
///
/// 环境变量 `RUST_LOG` 优先于配置中的级别。
/// 重复调用是幂等的，只有第一次调用生效。
///
/// # 参数
/// * `config` - 日志配置
pub fn init_logging(config: &LogConfig) -> crate::error::Result<()> {
    LOGGING_INITIALIZED.get_or_init(|| {
        // 桥接 log 宏到 tracing
        let _ = tracing_log::LogTracer::init();

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(level_directive(config.level)));
        let registry = registry().with(filter);

        match (config.json_format, config.console) {
            (true, true) => set_global(registry.with(fmt::layer().json())),
            (true, false) => {
                set_global(registry.with(fmt::layer().json().with_writer(std::io::sink)))
            }
            (false, true) => set_global(registry.with(fmt::layer())),
            (false, false) => set_global(registry.with(fmt::layer().with_writer(std::io::sink))),
        }
    });

    Ok(())
}
