//! TCP可达性指标实现
//!
//! 在限时内尝试建立TCP连接，连接成功即视为健康

use crate::error::CheckError;
use crate::health::indicator::{HealthIndicator, ProbeResult};
use crate::health::result::{check_status, check_status_with};
use crate::health::timeout::with_deadline;
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use tokio::net::TcpStream;
use tracing::debug;

/// TCP检测选项
#[derive(Debug, Clone)]
pub struct TcpCheckOptions {
    /// 目标主机
    pub host: String,
    /// 目标端口
    pub port: u16,
    /// 超时时间
    pub timeout: Duration,
}

impl TcpCheckOptions {
    /// 创建指向 host:port 的检测选项，默认超时1秒
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            timeout: Duration::from_secs(1),
        }
    }

    /// 设置超时时间
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// TCP健康指标实现
#[derive(Clone)]
pub struct TcpHealthIndicator {
    /// 检测选项
    options: TcpCheckOptions,
}

impl TcpHealthIndicator {
    /// 创建TCP健康指标
    pub fn new(options: TcpCheckOptions) -> Self {
        Self { options }
    }

    /// 执行一次TCP连通性检测
    ///
    /// 连接被拒绝或失败转换为已诊断失败；截止时间先到产出超时失败。
    /// 连接成功后立即关闭，不发送任何数据。
    pub async fn ping_check(&self, key: &str) -> ProbeResult {
        let target = format!("{}:{}", self.options.host, self.options.port);
        debug!("TCP检测开始: {} -> {}", key, target);

        match with_deadline(self.options.timeout, TcpStream::connect(&target)).await {
            Err(_) => Err(CheckError::timeout(
                self.options.timeout,
                check_status_with(
                    key,
                    false,
                    [(
                        "message".to_string(),
                        json!(format!(
                            "timeout of {}ms exceeded",
                            self.options.timeout.as_millis()
                        )),
                    )],
                ),
            )
            .into()),
            Ok(Err(error)) => {
                let message = error.to_string();
                Err(CheckError::unhealthy(
                    message.clone(),
                    check_status_with(
                        key,
                        false,
                        [
                            ("message".to_string(), json!(message)),
                            ("address".to_string(), json!(target)),
                        ],
                    ),
                )
                .into())
            }
            Ok(Ok(_stream)) => Ok(check_status(key, true)),
        }
    }
}

#[async_trait]
impl HealthIndicator for TcpHealthIndicator {
    fn name(&self) -> &'static str {
        "TcpHealthIndicator"
    }

    async fn check(&self, key: &str) -> ProbeResult {
        self.ping_check(key).await
    }
}
