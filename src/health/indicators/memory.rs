//! 进程内存指标实现
//!
//! 读取当前进程的常驻内存并与阈值比较，超出阈值视为不健康

use crate::error::CheckError;
use crate::health::indicator::{HealthIndicator, ProbeResult};
use crate::health::result::{check_status, check_status_with};
use async_trait::async_trait;
use serde_json::json;

/// 内存检测选项
#[derive(Debug, Clone)]
pub struct MemoryCheckOptions {
    /// 常驻内存（RSS）字节数上限
    pub threshold_bytes: u64,
}

impl MemoryCheckOptions {
    /// 创建指定RSS上限的检测选项
    pub fn rss(threshold_bytes: u64) -> Self {
        Self { threshold_bytes }
    }
}

/// 内存健康指标实现
#[derive(Clone)]
pub struct MemoryHealthIndicator {
    /// 默认检测选项
    options: MemoryCheckOptions,
}

impl MemoryHealthIndicator {
    /// 创建内存健康指标
    pub fn new(options: MemoryCheckOptions) -> Self {
        Self { options }
    }

    /// 读取当前进程的常驻内存（字节）
    #[cfg(target_os = "linux")]
    fn read_process_rss() -> std::io::Result<u64> {
        let status = std::fs::read_to_string("/proc/self/status")?;

        for line in status.lines() {
            // 形如 "VmRSS:     12345 kB"
            if line.starts_with("VmRSS:") {
                let parts: Vec<&str> = line.split_whitespace().collect();
                if parts.len() >= 2 {
                    let kb: u64 = parts[1].parse().unwrap_or(0);
                    return Ok(kb * 1024);
                }
            }
        }

        Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "VmRSS 字段不存在",
        ))
    }

    #[cfg(not(target_os = "linux"))]
    fn read_process_rss() -> std::io::Result<u64> {
        Err(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "当前平台不支持进程内存检测",
        ))
    }

    /// 检测进程常驻内存是否超出阈值
    ///
    /// 读取失败属于平台或配置问题，不折叠进报告。
    ///
    /// # 参数
    /// * `key` - 聚合报告中使用的指标键
    /// * `options` - 检测选项
    pub async fn check_rss(&self, key: &str, options: MemoryCheckOptions) -> ProbeResult {
        let used =
            Self::read_process_rss().map_err(|e| anyhow::anyhow!("读取进程内存失败: {}", e))?;

        if used >= options.threshold_bytes {
            let message = "Used rss exceeded the set threshold";
            return Err(CheckError::unhealthy(
                message,
                check_status_with(
                    key,
                    false,
                    [
                        ("message".to_string(), json!(message)),
                        ("used_bytes".to_string(), json!(used)),
                        (
                            "threshold_bytes".to_string(),
                            json!(options.threshold_bytes),
                        ),
                    ],
                ),
            )
            .into());
        }

        Ok(check_status(key, true))
    }
}

#[async_trait]
impl HealthIndicator for MemoryHealthIndicator {
    fn name(&self) -> &'static str {
        "MemoryHealthIndicator"
    }

    async fn check(&self, key: &str) -> ProbeResult {
        self.check_rss(key, self.options.clone()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProbeError;
    use crate::health::result::HealthStatus;

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_check_rss_under_threshold_is_up() {
        let indicator = MemoryHealthIndicator::new(MemoryCheckOptions::rss(u64::MAX));
        let result = indicator
            .check_rss("memory_rss", MemoryCheckOptions::rss(u64::MAX))
            .await
            .unwrap();

        assert_eq!(result.get("memory_rss").unwrap().status, HealthStatus::Up);
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_check_rss_exceeded_threshold_is_diagnosed() {
        // 阈值1字节，任何运行中的进程都会超出
        let indicator = MemoryHealthIndicator::new(MemoryCheckOptions::rss(1));
        let err = indicator
            .check_rss("memory_rss", MemoryCheckOptions::rss(1))
            .await
            .unwrap_err();

        let check = match err {
            ProbeError::Check(check) => check,
            other => panic!("应为已诊断失败: {other:?}"),
        };
        let status = check.causes().get("memory_rss").unwrap();
        assert_eq!(status.status, HealthStatus::Down);
        assert_eq!(
            status.detail("message"),
            Some(&json!("Used rss exceeded the set threshold"))
        );
        assert!(status.detail("used_bytes").is_some());
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_indicator_trait_uses_default_options() {
        let indicator = MemoryHealthIndicator::new(MemoryCheckOptions::rss(u64::MAX));
        assert!(indicator.check("memory_rss").await.is_ok());
        assert_eq!(indicator.name(), "MemoryHealthIndicator");
    }
}
