//! 错误处理模块
//!
//! 定义健康检测聚合库的统一错误类型

use crate::health::result::StatusResult;
use std::time::Duration;
use thiserror::Error;

/// Service Pulse 库的主要错误类型
#[derive(Error, Debug)]
pub enum ServicePulseError {
    /// 配置相关错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// 检测运行相关错误
    #[error("健康检测执行错误: {0}")]
    Executor(#[from] ExecutorError),

    /// 依赖能力缺失错误
    #[error("依赖能力错误: {0}")]
    Capability(#[from] CapabilityError),

    /// IO错误
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    /// JSON序列化/反序列化错误
    #[error("JSON错误: {0}")]
    Json(#[from] serde_json::Error),

    /// 其他错误
    #[error("其他错误: {0}")]
    Other(#[from] anyhow::Error),
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 配置文件解析错误
    #[error("配置文件解析失败: {0}")]
    ParseError(String),

    /// 配置验证错误
    #[error("配置验证失败: {0}")]
    ValidationError(String),

    /// 配置文件不存在
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    /// 环境变量替换错误
    #[error("环境变量替换失败: {var}")]
    EnvVarError { var: String },
}

/// 已诊断的检测失败
///
/// 与普通错误不同，该错误始终携带一份状态快照，描述失败发生时
/// 哪个指标处于 down 状态，执行器据此将失败折叠进聚合报告。
#[derive(Error, Debug)]
pub enum CheckError {
    /// 指标完成检测并判定为不健康
    #[error("{message}")]
    Unhealthy {
        /// 人类可读的失败描述
        message: String,
        /// 导致失败的状态快照
        causes: StatusResult,
    },

    /// 操作超出截止时间
    ///
    /// 区别于"完成但不健康"：超时意味着底层操作没有在限期内给出任何结论
    #[error("timeout of {}ms exceeded", timeout.as_millis())]
    Timeout {
        /// 配置的截止时间
        timeout: Duration,
        /// 导致失败的状态快照
        causes: StatusResult,
    },
}

impl CheckError {
    /// 构造不健康失败
    pub fn unhealthy(message: impl Into<String>, causes: StatusResult) -> Self {
        CheckError::Unhealthy {
            message: message.into(),
            causes,
        }
    }

    /// 构造超时失败
    pub fn timeout(timeout: Duration, causes: StatusResult) -> Self {
        CheckError::Timeout { timeout, causes }
    }

    /// 失败时的状态快照
    pub fn causes(&self) -> &StatusResult {
        match self {
            CheckError::Unhealthy { causes, .. } => causes,
            CheckError::Timeout { causes, .. } => causes,
        }
    }

    /// 取出状态快照，消耗错误本身
    pub fn into_causes(self) -> StatusResult {
        match self {
            CheckError::Unhealthy { causes, .. } => causes,
            CheckError::Timeout { causes, .. } => causes,
        }
    }
}

/// 单个探测调用的失败类型
///
/// 指标负责把所有预期内的失败路径归一化为 [`CheckError`]；
/// 任何未被包装的错误都视为未识别失败，会让整次检测运行失败。
#[derive(Error, Debug)]
pub enum ProbeError {
    /// 已诊断失败，携带状态快照，可被执行器折叠进聚合报告
    #[error(transparent)]
    Check(#[from] CheckError),

    /// 未识别失败，没有可合并的状态快照
    #[error(transparent)]
    Fatal(#[from] anyhow::Error),
}

/// 执行器错误类型
#[derive(Error, Debug)]
pub enum ExecutorError {
    /// 同一次运行中出现重复的指标键
    #[error("检测结果键重复: {key}")]
    DuplicateKey { key: String },

    /// 某个探测抛出了未识别错误，整次运行终止
    #[error(transparent)]
    Fatal(#[from] anyhow::Error),
}

/// 依赖能力错误类型
#[derive(Error, Debug)]
pub enum CapabilityError {
    /// 所需能力未注册
    #[error("{caller} 缺少可选依赖能力 \"{capability}\"，请先在 CapabilityRegistry 中注册后再执行检测")]
    Missing { capability: String, caller: String },

    /// 能力已注册但类型不符
    #[error("{caller} 请求的依赖能力 \"{capability}\" 类型不匹配")]
    TypeMismatch { capability: String, caller: String },
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, ServicePulseError>;
