//! 数据库连通性指标实现
//!
//! 通过注入的连接句柄执行一次最小往返，区分超时与连接后出错

use crate::error::{CapabilityError, CheckError};
use crate::health::capability::CapabilityRegistry;
use crate::health::indicator::{HealthIndicator, ProbeResult};
use crate::health::result::{check_status, check_status_with};
use crate::health::timeout::with_deadline;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// 数据库连接能力在注册表中的名称
pub const DATABASE_CAPABILITY: &str = "database";

/// 数据库连接往返能力
///
/// 由调用方以预配置的连接句柄实现：执行一次无副作用的最小往返
/// （开启会话、执行空查询等）。具体的线上协议是实现方的事情，
/// 指标只关心往返是否在限时内成功。
#[async_trait]
pub trait DatabasePinger: Send + Sync {
    /// 执行一次最小往返
    async fn ping(&self) -> anyhow::Result<()>;
}

/// 数据库检测选项
#[derive(Debug, Clone)]
pub struct DatabaseCheckOptions {
    /// 超时时间，默认1000毫秒
    pub timeout: Duration,
}

impl Default for DatabaseCheckOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(1000),
        }
    }
}

/// 数据库健康指标实现
#[derive(Clone)]
pub struct DatabaseHealthIndicator {
    /// 注入的连接句柄
    pinger: Arc<dyn DatabasePinger>,
    /// 默认检测选项
    options: DatabaseCheckOptions,
}

impl std::fmt::Debug for DatabaseHealthIndicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseHealthIndicator")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl DatabaseHealthIndicator {
    /// 使用显式连接句柄创建指标
    pub fn new(pinger: Arc<dyn DatabasePinger>) -> Self {
        Self {
            pinger,
            options: DatabaseCheckOptions::default(),
        }
    }

    /// 从能力注册表解析连接句柄创建指标
    ///
    /// 注册时以 `Arc<dyn DatabasePinger>` 作为条目类型：
    /// `registry.register(DATABASE_CAPABILITY, Arc::new(pinger_handle))`
    pub fn from_registry(registry: &CapabilityRegistry) -> Result<Self, CapabilityError> {
        let pinger = registry
            .resolve::<Arc<dyn DatabasePinger>>("DatabaseHealthIndicator", DATABASE_CAPABILITY)?;
        Ok(Self {
            pinger: (*pinger).clone(),
            options: DatabaseCheckOptions::default(),
        })
    }

    /// 设置默认超时时间
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = timeout;
        self
    }

    /// 在限时内对数据库执行一次最小往返
    ///
    /// 超时与"连接成功但出错"在诊断字段中严格区分：前者给出
    /// 超时说明，后者携带驱动返回的错误信息。
    ///
    /// # 参数
    /// * `key` - 聚合报告中使用的指标键
    /// * `options` - 检测选项
    pub async fn ping_check(&self, key: &str, options: DatabaseCheckOptions) -> ProbeResult {
        debug!("数据库检测开始: {}", key);

        match with_deadline(options.timeout, self.pinger.ping()).await {
            Err(_) => Err(CheckError::timeout(
                options.timeout,
                check_status_with(
                    key,
                    false,
                    [(
                        "message".to_string(),
                        json!(format!(
                            "timeout of {}ms exceeded",
                            options.timeout.as_millis()
                        )),
                    )],
                ),
            )
            .into()),
            Ok(Err(error)) => Err(CheckError::unhealthy(
                format!("{key} is not available"),
                check_status_with(
                    key,
                    false,
                    [("message".to_string(), json!(error.to_string()))],
                ),
            )
            .into()),
            Ok(Ok(())) => Ok(check_status(key, true)),
        }
    }
}

#[async_trait]
impl HealthIndicator for DatabaseHealthIndicator {
    fn name(&self) -> &'static str {
        "DatabaseHealthIndicator"
    }

    fn required_capabilities(&self) -> &'static [&'static str] {
        &[DATABASE_CAPABILITY]
    }

    async fn check(&self, key: &str) -> ProbeResult {
        self.ping_check(key, self.options.clone()).await
    }
}
