//! 健康检测执行器模块
//!
//! 运行一组探测调用，隔离已诊断失败并聚合为单一报告

use crate::error::{ExecutorError, ProbeError};
use crate::health::indicator::ProbeResult;
use crate::health::result::{HealthReport, StatusResult};
use futures::future::{join_all, BoxFuture};
use futures::FutureExt;
use std::future::Future;
use tracing::{debug, error, warn};

/// 零参数探测调用
///
/// 每次检测运行时被调用一次，内部通常委托给某个健康指标。
/// 执行器对调用内部做什么一无所知，也因此不做任何I/O。
pub type HealthIndicatorFunction = Box<dyn Fn() -> BoxFuture<'static, ProbeResult> + Send + Sync>;

/// 把异步闭包包装成探测调用
///
/// # 参数
/// * `f` - 返回探测结果的异步闭包
pub fn health_check<F, Fut>(f: F) -> HealthIndicatorFunction
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ProbeResult> + Send + 'static,
{
    Box::new(move || f().boxed())
}

/// 健康检测执行器
///
/// 接受有序的探测调用序列并发运行，把每个调用的结果归入
/// 成功或失败两部分，最终构造聚合报告。合并对不同键可交换，
/// 报告形状与各调用的完成顺序无关。
#[derive(Debug, Default)]
pub struct HealthCheckExecutor;

impl HealthCheckExecutor {
    /// 创建执行器
    pub fn new() -> Self {
        Self
    }

    /// 运行一次健康检测
    ///
    /// 每个调用的结局：
    /// * 成功 - 状态快照并入 `info` 与 `details`
    /// * 已诊断失败 - 携带的状态快照并入 `error` 与 `details`，
    ///   不影响其余调用
    /// * 未识别失败 - 没有可合并的快照，整次运行以该错误终止，
    ///   不产出部分报告；多个未识别失败时按输入顺序取第一个
    ///
    /// 指标键在一次运行中必须唯一，冲突视为调用方错误。
    ///
    /// # 参数
    /// * `checks` - 探测调用序列
    ///
    /// # 返回
    /// * `Result<HealthReport, ExecutorError>` - 聚合报告或终止错误
    pub async fn check(
        &self,
        checks: Vec<HealthIndicatorFunction>,
    ) -> Result<HealthReport, ExecutorError> {
        debug!("开始健康检测运行，共 {} 个探测", checks.len());

        let outcomes = join_all(checks.iter().map(|check| check())).await;

        let mut info = StatusResult::new();
        let mut errors = StatusResult::new();

        for outcome in outcomes {
            match outcome {
                Ok(result) => {
                    info.merge(result)
                        .map_err(|key| ExecutorError::DuplicateKey { key })?;
                }
                Err(ProbeError::Check(check_error)) => {
                    warn!("探测产出已诊断失败: {}", check_error);
                    errors
                        .merge(check_error.into_causes())
                        .map_err(|key| ExecutorError::DuplicateKey { key })?;
                }
                Err(ProbeError::Fatal(fatal)) => {
                    error!("探测抛出未识别错误，终止本次运行: {}", fatal);
                    return Err(ExecutorError::Fatal(fatal));
                }
            }
        }

        // 成功与失败两部分之间的键冲突
        for key in errors.keys() {
            if info.contains_key(key) {
                return Err(ExecutorError::DuplicateKey { key: key.clone() });
            }
        }

        let report = HealthReport::from_partitions(info, errors);
        debug!(
            "健康检测运行结束: {} 正常, {} 异常",
            report.info.len(),
            report.error.len()
        );
        Ok(report)
    }
}
