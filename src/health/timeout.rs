//! 超时保护模块
//!
//! 为任意异步操作附加截止时间，把"过慢"归一化为独立的失败类型

use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// 截止时间已过错误
///
/// 仅表示"等待被放弃"，与"操作完成但结果不健康"严格区分。
/// 指标通常把它包装成带超时说明的已诊断失败。
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("操作在 {}ms 内未完成", deadline.as_millis())]
pub struct TimeoutExpired {
    /// 配置的截止时间
    pub deadline: Duration,
}

/// 在截止时间内等待异步操作完成
///
/// 操作先完成则返回其结果；截止时间先到则返回 [`TimeoutExpired`]
/// 并停止等待。底层操作自身的取消是操作自己的责任，这里只放弃等待；
/// 定时器随等待结束一起释放，不会泄漏。
///
/// # 参数
/// * `deadline` - 截止时间
/// * `future` - 被保护的异步操作
pub async fn with_deadline<F>(deadline: Duration, future: F) -> Result<F::Output, TimeoutExpired>
where
    F: Future,
{
    tokio::time::timeout(deadline, future)
        .await
        .map_err(|_| TimeoutExpired { deadline })
}
