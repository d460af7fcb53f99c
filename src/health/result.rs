//! 健康检测结果数据结构
//!
//! 定义健康状态枚举、单指标状态记录、状态快照和聚合报告

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// 健康状态枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// 指标正常
    Up,
    /// 指标异常
    Down,
}

impl HealthStatus {
    /// 判断状态是否为健康
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Up)
    }

    /// 返回状态的字符串表示
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Up => "up",
            HealthStatus::Down => "down",
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 单个指标的状态记录
///
/// 除 `status` 外允许携带任意诊断字段，序列化时平铺在同一层级
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorStatus {
    /// 健康状态
    pub status: HealthStatus,
    /// 附加诊断字段
    #[serde(flatten)]
    pub details: serde_json::Map<String, Value>,
}

impl IndicatorStatus {
    /// 创建指定状态的记录
    pub fn new(is_healthy: bool) -> Self {
        Self {
            status: if is_healthy {
                HealthStatus::Up
            } else {
                HealthStatus::Down
            },
            details: serde_json::Map::new(),
        }
    }

    /// 创建健康状态记录
    pub fn up() -> Self {
        Self::new(true)
    }

    /// 创建不健康状态记录
    pub fn down() -> Self {
        Self::new(false)
    }

    /// 添加诊断字段
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// 读取诊断字段
    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details.get(key)
    }
}

/// 一次检测产生的状态快照
///
/// 指标键到状态记录的映射，一经产生即视为不可变。
/// 底层使用 BTreeMap，保证报告中的键序与完成顺序无关。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusResult(BTreeMap<String, IndicatorStatus>);

impl StatusResult {
    /// 创建空快照
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建单键快照
    pub fn single(key: impl Into<String>, status: IndicatorStatus) -> Self {
        let mut inner = BTreeMap::new();
        inner.insert(key.into(), status);
        Self(inner)
    }

    /// 快照是否为空
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 快照中的指标数量
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// 读取指定键的状态记录
    pub fn get(&self, key: &str) -> Option<&IndicatorStatus> {
        self.0.get(key)
    }

    /// 是否包含指定键
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// 遍历所有指标键
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// 遍历所有键值对
    pub fn iter(&self) -> impl Iterator<Item = (&String, &IndicatorStatus)> {
        self.0.iter()
    }

    /// 合并另一份快照
    ///
    /// 合并是键的并集；同一次运行中键不允许冲突，
    /// 冲突属于调用方错误，返回冲突的键而不是静默覆盖。
    pub fn merge(&mut self, other: StatusResult) -> std::result::Result<(), String> {
        for (key, status) in other.0 {
            if self.0.contains_key(&key) {
                return Err(key);
            }
            self.0.insert(key, status);
        }
        Ok(())
    }
}

impl IntoIterator for StatusResult {
    type Item = (String, IndicatorStatus);
    type IntoIter = std::collections::btree_map::IntoIter<String, IndicatorStatus>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// 构造单键状态快照
///
/// 所有指标共用的纯构造函数，产出 `{ key: { status: "up"|"down" } }`
pub fn check_status(key: &str, is_healthy: bool) -> StatusResult {
    StatusResult::single(key, IndicatorStatus::new(is_healthy))
}

/// 构造带附加诊断字段的单键状态快照
pub fn check_status_with<I>(key: &str, is_healthy: bool, details: I) -> StatusResult
where
    I: IntoIterator<Item = (String, Value)>,
{
    let mut status = IndicatorStatus::new(is_healthy);
    status.details.extend(details);
    StatusResult::single(key, status)
}

/// 聚合报告的整体状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    /// 所有指标均健康
    Ok,
    /// 至少一个指标不健康
    Error,
}

/// 一次检测运行的聚合报告
///
/// 不变量：`details` 恒为 `info` 与 `error` 的并集；
/// `status` 为 `error` 当且仅当 `error` 非空。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    /// 整体状态
    pub status: ReportStatus,
    /// 健康指标的结果
    pub info: StatusResult,
    /// 不健康指标的结果
    pub error: StatusResult,
    /// 全部指标的结果
    pub details: StatusResult,
}

impl HealthReport {
    /// 由成功与失败两部分构造聚合报告
    ///
    /// 调用方保证两部分键不相交（执行器在合并阶段已拒绝冲突）
    pub fn from_partitions(info: StatusResult, error: StatusResult) -> Self {
        let mut details = info.clone();
        for (key, status) in error.clone() {
            details.0.insert(key, status);
        }

        let status = if error.is_empty() {
            ReportStatus::Ok
        } else {
            ReportStatus::Error
        };

        Self {
            status,
            info,
            error,
            details,
        }
    }

    /// 整体是否健康
    pub fn is_healthy(&self) -> bool {
        matches!(self.status, ReportStatus::Ok)
    }

    /// 转换为JSON字符串
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// 从JSON字符串创建
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
