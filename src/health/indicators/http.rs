//! HTTP可达性指标实现
//!
//! 提供URL可达性检测，支持多种HTTP方法、超时处理和响应谓词

use crate::error::{CapabilityError, CheckError};
use crate::health::capability::CapabilityRegistry;
use crate::health::indicator::{HealthIndicator, ProbeResult};
use crate::health::result::{check_status, check_status_with};
use crate::health::timeout::with_deadline;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, StatusCode};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// HTTP客户端能力在注册表中的名称
pub const HTTP_CLIENT_CAPABILITY: &str = "http-client";

/// HTTP检测选项
#[derive(Debug, Clone)]
pub struct HttpCheckOptions {
    /// 超时时间
    pub timeout: Duration,
    /// HTTP方法
    pub method: Method,
    /// 请求头
    pub headers: HashMap<String, String>,
    /// 请求体（JSON）
    pub body: Option<Value>,
    /// 单次调用使用的预配置客户端，优先于指标持有的客户端
    pub http_client: Option<Client>,
}

impl Default for HttpCheckOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            method: Method::GET,
            headers: HashMap::new(),
            body: None,
            http_client: None,
        }
    }
}

/// 谓词可见的响应视图
///
/// 响应体在谓词执行前已完整读出，谓词本身保持同步
#[derive(Debug, Clone)]
pub struct PingResponse {
    /// HTTP状态码
    pub status: StatusCode,
    /// 响应头
    pub headers: HeaderMap,
    /// 响应体文本
    pub body: String,
}

/// HTTP健康指标实现
///
/// 持有一个注入的HTTP客户端；调用方也可以在单次检测中
/// 通过选项传入预配置的客户端，避免重复解析。
#[derive(Debug, Clone)]
pub struct HttpHealthIndicator {
    /// HTTP客户端
    client: Client,
}

impl HttpHealthIndicator {
    /// 使用显式客户端创建指标
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// 从能力注册表解析客户端创建指标
    ///
    /// 能力缺失时立即同步失败，不会执行任何探测逻辑
    pub fn from_registry(registry: &CapabilityRegistry) -> Result<Self, CapabilityError> {
        let client = registry.resolve::<Client>("HttpHealthIndicator", HTTP_CLIENT_CAPABILITY)?;
        Ok(Self {
            client: (*client).clone(),
        })
    }

    /// 构建HTTP请求
    fn build_request(&self, url: &str, options: &HttpCheckOptions) -> reqwest::RequestBuilder {
        let client = options.http_client.as_ref().unwrap_or(&self.client);
        let mut request = client.request(options.method.clone(), url);

        for (key, value) in &options.headers {
            request = request.header(key, value);
        }

        if let Some(body) = &options.body {
            request = request.json(body);
        }

        request
    }

    /// 归类传输层错误，生成清晰易读的描述
    fn describe_transport_error(error: &reqwest::Error) -> String {
        if error.is_timeout() {
            "Request timeout".to_string()
        } else if error.is_connect() {
            "Connection refused".to_string()
        } else if error.is_request() {
            "Invalid request".to_string()
        } else if let Some(status) = error.status() {
            format!(
                "HTTP {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )
        } else if error.is_decode() {
            "Response decode error".to_string()
        } else {
            let error_str = error.to_string();
            if error_str.contains("dns") || error_str.contains("DNS") {
                "DNS resolution failed".to_string()
            } else if error_str.contains("certificate")
                || error_str.contains("tls")
                || error_str.contains("ssl")
            {
                "SSL/TLS certificate error".to_string()
            } else {
                format!("Request failed: {}", error_str)
            }
        }
    }

    /// 由传输层错误生成已诊断失败
    ///
    /// 错误自带状态码时，一并写入 statusCode/statusText 诊断字段
    fn transport_error(key: &str, error: &reqwest::Error) -> CheckError {
        let message = Self::describe_transport_error(error);
        let mut details = vec![("message".to_string(), json!(message.clone()))];

        if let Some(status) = error.status() {
            details.push(("statusCode".to_string(), json!(status.as_u16())));
            details.push((
                "statusText".to_string(),
                json!(status.canonical_reason().unwrap_or("Unknown")),
            ));
        }

        CheckError::unhealthy(message.clone(), check_status_with(key, false, details))
    }

    /// 由错误状态码生成已诊断失败
    fn status_error(key: &str, status: StatusCode) -> CheckError {
        let status_text = status.canonical_reason().unwrap_or("Unknown");
        let message = format!("HTTP {} {}", status.as_u16(), status_text);

        CheckError::unhealthy(
            message.clone(),
            check_status_with(
                key,
                false,
                [
                    ("message".to_string(), json!(message)),
                    ("statusCode".to_string(), json!(status.as_u16())),
                    ("statusText".to_string(), json!(status_text)),
                ],
            ),
        )
    }

    /// 生成超时失败
    fn timeout_error(key: &str, timeout: Duration) -> CheckError {
        CheckError::timeout(
            timeout,
            check_status_with(
                key,
                false,
                [(
                    "message".to_string(),
                    json!(format!("timeout of {}ms exceeded", timeout.as_millis())),
                )],
            ),
        )
    }

    /// 检测URL在限时内是否可达
    ///
    /// 2xx 响应视为健康；非 2xx 响应转换为携带 statusCode/statusText
    /// 诊断字段的已诊断失败；传输层错误归类后同样转换为已诊断失败；
    /// 截止时间先到则产出超时失败。
    ///
    /// # 参数
    /// * `key` - 聚合报告中使用的指标键
    /// * `url` - 检测目标URL
    /// * `options` - 检测选项
    pub async fn ping_check(&self, key: &str, url: &str, options: HttpCheckOptions) -> ProbeResult {
        debug!("HTTP检测开始: {} -> {}", key, url);
        let request = self.build_request(url, &options);

        match with_deadline(options.timeout, request.send()).await {
            Err(_) => Err(Self::timeout_error(key, options.timeout).into()),
            Ok(Err(error)) => Err(Self::transport_error(key, &error).into()),
            Ok(Ok(response)) => {
                let status = response.status();
                if status.is_success() {
                    Ok(check_status(key, true))
                } else {
                    Err(Self::status_error(key, status).into())
                }
            }
        }
    }

    /// 以调用方谓词评估响应
    ///
    /// 谓词为假且响应本身是错误响应时，诊断信息优先采用该响应的
    /// statusCode/statusText 细节；谓词为假且响应正常时，只给出
    /// 通用的不可用描述。谓词为真时即使响应是错误状态也视为健康。
    ///
    /// # 参数
    /// * `key` - 聚合报告中使用的指标键
    /// * `url` - 检测目标URL
    /// * `predicate` - 响应谓词，返回 false 表示不健康
    /// * `options` - 检测选项
    pub async fn response_check<F>(
        &self,
        key: &str,
        url: &str,
        predicate: F,
        options: HttpCheckOptions,
    ) -> ProbeResult
    where
        F: FnOnce(&PingResponse) -> bool + Send,
    {
        let request = self.build_request(url, &options);

        let response = match with_deadline(options.timeout, request.send()).await {
            Err(_) => return Err(Self::timeout_error(key, options.timeout).into()),
            Ok(Err(error)) => return Err(Self::transport_error(key, &error).into()),
            Ok(Ok(response)) => response,
        };

        let status = response.status();
        let headers = response.headers().clone();
        let body = match response.text().await {
            Ok(body) => body,
            Err(error) => return Err(Self::transport_error(key, &error).into()),
        };

        let view = PingResponse {
            status,
            headers,
            body,
        };

        if predicate(&view) {
            return Ok(check_status(key, true));
        }

        if !status.is_success() {
            // 错误响应的细节优先于通用描述
            Err(Self::status_error(key, status).into())
        } else {
            Err(CheckError::unhealthy(
                format!("{key} is not available"),
                check_status(key, false),
            )
            .into())
        }
    }
}

/// 绑定了目标URL的HTTP探测
///
/// 把指标与固定目标组合成可复用的 [`HealthIndicator`]
#[derive(Clone)]
pub struct HttpPingProbe {
    /// 底层HTTP指标
    indicator: HttpHealthIndicator,
    /// 检测目标URL
    url: String,
    /// 检测选项
    options: HttpCheckOptions,
}

impl HttpPingProbe {
    /// 创建绑定目标的HTTP探测
    pub fn new(indicator: HttpHealthIndicator, url: impl Into<String>) -> Self {
        Self {
            indicator,
            url: url.into(),
            options: HttpCheckOptions::default(),
        }
    }

    /// 设置检测选项
    pub fn with_options(mut self, options: HttpCheckOptions) -> Self {
        self.options = options;
        self
    }
}

#[async_trait]
impl HealthIndicator for HttpPingProbe {
    fn name(&self) -> &'static str {
        "HttpHealthIndicator"
    }

    fn required_capabilities(&self) -> &'static [&'static str] {
        &[HTTP_CLIENT_CAPABILITY]
    }

    async fn check(&self, key: &str) -> ProbeResult {
        self.indicator
            .ping_check(key, &self.url, self.options.clone())
            .await
    }
}
