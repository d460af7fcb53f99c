//! 配置数据结构定义
//!
//! 定义探测配置结构体和验证逻辑

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 主配置结构，包含全局配置和探测列表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// 全局配置项
    pub global: GlobalConfig,
    /// 探测配置列表
    #[serde(default)]
    pub probes: Vec<ProbeConfig>,
}

/// 全局配置结构
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GlobalConfig {
    /// 默认探测超时时间（毫秒）
    #[serde(default = "default_timeout_ms")]
    pub default_timeout_ms: u64,
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// 最大并发检测数
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_checks: usize,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            default_timeout_ms: default_timeout_ms(),
            log_level: default_log_level(),
            max_concurrent_checks: default_max_concurrent(),
        }
    }
}

/// 单个探测的配置结构
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProbeConfig {
    /// 探测名称，作为聚合报告中的指标键，单次运行内必须唯一
    pub name: String,
    /// 是否启用
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// 探测特定的超时时间（毫秒），缺省使用全局默认值
    pub timeout_ms: Option<u64>,
    /// 探测类型与目标参数
    #[serde(flatten)]
    pub target: ProbeTarget,
}

/// 探测类型与目标参数
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProbeTarget {
    /// HTTP可达性探测
    Http {
        /// 检测目标URL
        url: String,
        /// HTTP方法
        #[serde(default = "default_method")]
        method: String,
        /// 请求头
        #[serde(default)]
        headers: HashMap<String, String>,
    },
    /// TCP连通性探测
    Tcp {
        /// 目标主机
        host: String,
        /// 目标端口
        port: u16,
    },
    /// 磁盘空间探测
    Disk {
        /// 检测路径
        path: String,
        /// 已用空间百分比阈值
        threshold_percent: Option<f64>,
        /// 已用空间字节数阈值
        threshold_bytes: Option<u64>,
    },
    /// 进程内存探测
    Memory {
        /// 常驻内存字节数上限
        max_rss_bytes: u64,
    },
}

// 默认值函数
fn default_timeout_ms() -> u64 {
    1000
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_max_concurrent() -> usize {
    50
}
fn default_enabled() -> bool {
    true
}
fn default_method() -> String {
    "GET".to_string()
}

/// 配置验证函数
///
/// # 参数
/// * `config` - 要验证的配置
///
/// # 返回
/// * `Result<(), String>` - 验证结果，错误时返回错误信息
pub fn validate_config(config: &Config) -> Result<(), String> {
    // 验证全局配置
    if config.global.default_timeout_ms == 0 {
        return Err("默认超时时间不能为0".to_string());
    }

    if config.global.max_concurrent_checks == 0 {
        return Err("最大并发检测数不能为0".to_string());
    }

    // 验证日志级别
    let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_log_levels.contains(&config.global.log_level.as_str()) {
        return Err(format!(
            "无效的日志级别: {}，支持的级别: {:?}",
            config.global.log_level, valid_log_levels
        ));
    }

    // 验证探测配置
    let mut seen_names = std::collections::HashSet::new();
    for probe in &config.probes {
        if probe.name.is_empty() {
            return Err("探测名称不能为空".to_string());
        }

        // 名称是聚合报告中的指标键，重复属于调用方错误，提前拒绝
        if !seen_names.insert(probe.name.as_str()) {
            return Err(format!("探测名称重复: {}", probe.name));
        }

        if probe.timeout_ms == Some(0) {
            return Err(format!("探测 {} 的超时时间不能为0", probe.name));
        }

        match &probe.target {
            ProbeTarget::Http { url, method, .. } => {
                if url.is_empty() {
                    return Err(format!("探测 {} 的URL不能为空", probe.name));
                }
                let valid_methods = ["GET", "POST", "PUT", "DELETE", "HEAD", "OPTIONS", "PATCH"];
                if !valid_methods.contains(&method.to_uppercase().as_str()) {
                    return Err(format!("探测 {} 的HTTP方法无效: {}", probe.name, method));
                }
            }
            ProbeTarget::Tcp { host, port } => {
                if host.is_empty() {
                    return Err(format!("探测 {} 的主机不能为空", probe.name));
                }
                if *port == 0 {
                    return Err(format!("探测 {} 的端口不能为0", probe.name));
                }
            }
            ProbeTarget::Disk {
                path,
                threshold_percent,
                threshold_bytes,
            } => {
                if path.is_empty() {
                    return Err(format!("探测 {} 的路径不能为空", probe.name));
                }
                if threshold_percent.is_none() && threshold_bytes.is_none() {
                    return Err(format!("探测 {} 未设置磁盘阈值", probe.name));
                }
                if let Some(percent) = threshold_percent {
                    if !(0.0..=100.0).contains(percent) {
                        return Err(format!(
                            "探测 {} 的百分比阈值超出范围: {}",
                            probe.name, percent
                        ));
                    }
                }
            }
            ProbeTarget::Memory { max_rss_bytes } => {
                if *max_rss_bytes == 0 {
                    return Err(format!("探测 {} 的内存上限不能为0", probe.name));
                }
            }
        }
    }

    Ok(())
}
