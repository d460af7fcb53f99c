//! 磁盘空间指标实现
//!
//! 读取文件系统用量并与阈值比较，超出阈值视为不健康

use crate::error::CheckError;
use crate::health::indicator::{HealthIndicator, ProbeResult};
use crate::health::result::{check_status, check_status_with};
use async_trait::async_trait;
use serde_json::json;
use std::path::PathBuf;

/// 磁盘检测选项
///
/// 阈值按已用空间给出，百分比与字节数至少设置其一；
/// 两者都设置时任一超出即视为不健康。
#[derive(Debug, Clone)]
pub struct DiskCheckOptions {
    /// 检测路径，用量按该路径所在文件系统统计
    pub path: PathBuf,
    /// 已用空间百分比阈值（0.0 - 100.0）
    pub threshold_percent: Option<f64>,
    /// 已用空间字节数阈值
    pub threshold_bytes: Option<u64>,
}

impl DiskCheckOptions {
    /// 创建按百分比设限的检测选项
    pub fn percent(path: impl Into<PathBuf>, threshold_percent: f64) -> Self {
        Self {
            path: path.into(),
            threshold_percent: Some(threshold_percent),
            threshold_bytes: None,
        }
    }

    /// 创建按字节数设限的检测选项
    pub fn bytes(path: impl Into<PathBuf>, threshold_bytes: u64) -> Self {
        Self {
            path: path.into(),
            threshold_percent: None,
            threshold_bytes: Some(threshold_bytes),
        }
    }
}

/// 磁盘健康指标实现
#[derive(Clone)]
pub struct DiskHealthIndicator {
    /// 默认检测选项
    options: DiskCheckOptions,
}

impl DiskHealthIndicator {
    /// 创建磁盘健康指标
    pub fn new(options: DiskCheckOptions) -> Self {
        Self { options }
    }

    /// 读取路径所在文件系统的总容量与可用容量（字节）
    #[cfg(unix)]
    fn read_filesystem_usage(path: &std::path::Path) -> std::io::Result<(u64, u64)> {
        let stat = nix::sys::statvfs::statvfs(path)?;
        let fragment_size = stat.fragment_size() as u64;
        let total = stat.blocks() as u64 * fragment_size;
        let available = stat.blocks_available() as u64 * fragment_size;
        Ok((total, available))
    }

    #[cfg(not(unix))]
    fn read_filesystem_usage(_path: &std::path::Path) -> std::io::Result<(u64, u64)> {
        Err(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "当前平台不支持磁盘空间检测",
        ))
    }

    /// 检测文件系统已用空间是否超出阈值
    ///
    /// 读取用量失败（路径不存在等）属于配置错误，不折叠进报告。
    ///
    /// # 参数
    /// * `key` - 聚合报告中使用的指标键
    /// * `options` - 检测选项
    pub async fn check_storage(&self, key: &str, options: DiskCheckOptions) -> ProbeResult {
        if options.threshold_percent.is_none() && options.threshold_bytes.is_none() {
            return Err(anyhow::anyhow!("磁盘检测未设置阈值: {}", key).into());
        }

        let (total, available) = Self::read_filesystem_usage(&options.path)
            .map_err(|e| anyhow::anyhow!("读取磁盘用量失败: {}: {}", options.path.display(), e))?;

        let used = total.saturating_sub(available);
        let used_percent = if total > 0 {
            used as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        let percent_exceeded = options
            .threshold_percent
            .map(|threshold| used_percent >= threshold)
            .unwrap_or(false);
        let bytes_exceeded = options
            .threshold_bytes
            .map(|threshold| used >= threshold)
            .unwrap_or(false);

        if percent_exceeded || bytes_exceeded {
            let message = "Used disk storage exceeded the set threshold";
            return Err(CheckError::unhealthy(
                message,
                check_status_with(
                    key,
                    false,
                    [
                        ("message".to_string(), json!(message)),
                        (
                            "path".to_string(),
                            json!(options.path.display().to_string()),
                        ),
                        ("used_bytes".to_string(), json!(used)),
                        (
                            "used_percent".to_string(),
                            json!(format!("{used_percent:.1}")),
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
impl HealthIndicator for DiskHealthIndicator {
    fn name(&self) -> &'static str {
        "DiskHealthIndicator"
    }

    async fn check(&self, key: &str) -> ProbeResult {
        self.check_storage(key, self.options.clone()).await
    }
}
