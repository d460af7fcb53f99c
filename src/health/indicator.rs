//! 健康指标抽象
//!
//! 定义所有指标变体共用的检测接口

use crate::error::{CapabilityError, ProbeError};
use crate::health::capability::CapabilityRegistry;
use crate::health::result::StatusResult;
use async_trait::async_trait;

/// 单个探测调用的结果类型
///
/// 成功产出一份状态快照；失败时要么是可折叠的已诊断失败，
/// 要么是导致整次运行终止的未识别失败。
pub type ProbeResult = std::result::Result<StatusResult, ProbeError>;

/// 健康指标trait，定义检测接口
///
/// 每个变体包装一种外部系统（HTTP端点、TCP端口、数据库连接、
/// 系统资源），为命名检查产出一份状态快照。变体必须把所有预期内的
/// 失败路径归一化为已诊断失败，只有真正的编程或配置错误才允许
/// 以未识别失败逃逸。
#[async_trait]
pub trait HealthIndicator: Send + Sync {
    /// 指标标识，用于依赖校验与错误信息
    fn name(&self) -> &'static str;

    /// 声明所依赖的可选外部能力
    fn required_capabilities(&self) -> &'static [&'static str] {
        &[]
    }

    /// 在执行任何探测逻辑前校验依赖能力是否齐备
    fn validate(&self, registry: &CapabilityRegistry) -> Result<(), CapabilityError> {
        registry.ensure(self.name(), self.required_capabilities())
    }

    /// 执行健康检测
    ///
    /// # 参数
    /// * `key` - 本次检查在聚合报告中使用的指标键
    ///
    /// # 返回
    /// * `ProbeResult` - 状态快照或失败
    async fn check(&self, key: &str) -> ProbeResult;
}
