//! 依赖能力注册表模块
//!
//! 指标运行前对可选外部能力（HTTP客户端、数据库连接等）做存在性校验，
//! 把下游难以排查的空引用失败提前转换为明确的配置错误

use crate::error::CapabilityError;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// 依赖能力注册表
///
/// 由调用方显式构造并注册能力，取代环境级的依赖注入查找。
/// 指标通过 [`ensure`](CapabilityRegistry::ensure) 在执行任何探测逻辑之前
/// 同步校验所需能力是否齐备。
#[derive(Default)]
pub struct CapabilityRegistry {
    /// 能力名称到类型擦除句柄的映射
    entries: HashMap<String, Arc<dyn Any + Send + Sync>>,
}

impl CapabilityRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册一项能力
    ///
    /// # 参数
    /// * `name` - 能力名称，如 `"http-client"`
    /// * `value` - 能力实例句柄
    pub fn register<T>(&mut self, name: impl Into<String>, value: Arc<T>)
    where
        T: Send + Sync + 'static,
    {
        self.entries.insert(name.into(), value);
    }

    /// 是否已注册指定能力
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// 解析指定能力
    ///
    /// # 参数
    /// * `caller` - 调用方标识，用于错误信息
    /// * `name` - 能力名称
    ///
    /// # 返回
    /// * `Result<Arc<T>, CapabilityError>` - 能力句柄，未注册或类型不符时报错
    pub fn resolve<T>(&self, caller: &str, name: &str) -> Result<Arc<T>, CapabilityError>
    where
        T: Send + Sync + 'static,
    {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| CapabilityError::Missing {
                capability: name.to_string(),
                caller: caller.to_string(),
            })?;

        entry
            .clone()
            .downcast::<T>()
            .map_err(|_| CapabilityError::TypeMismatch {
                capability: name.to_string(),
                caller: caller.to_string(),
            })
    }

    /// 校验一组能力是否齐备
    ///
    /// 同步执行，发现第一个缺失的能力立即失败，错误信息中
    /// 同时给出能力名称与调用方，便于定位配置问题。
    ///
    /// # 参数
    /// * `caller` - 调用方标识
    /// * `names` - 所需能力名称列表
    pub fn ensure(&self, caller: &str, names: &[&str]) -> Result<(), CapabilityError> {
        for name in names {
            if !self.entries.contains_key(*name) {
                return Err(CapabilityError::Missing {
                    capability: (*name).to_string(),
                    caller: caller.to_string(),
                });
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for CapabilityRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityRegistry")
            .field("capabilities", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_resolve() {
        let mut registry = CapabilityRegistry::new();
        registry.register("answer", Arc::new(42u32));

        let value: Arc<u32> = registry.resolve("TestIndicator", "answer").unwrap();
        assert_eq!(*value, 42);
    }

    #[test]
    fn test_missing_capability_names_caller() {
        let registry = CapabilityRegistry::new();

        let err = registry
            .resolve::<u32>("HttpHealthIndicator", "http-client")
            .unwrap_err();

        match &err {
            CapabilityError::Missing { capability, caller } => {
                assert_eq!(capability, "http-client");
                assert_eq!(caller, "HttpHealthIndicator");
            }
            other => panic!("意外的错误类型: {other:?}"),
        }
        // 错误信息应同时包含能力名称与调用方
        let message = err.to_string();
        assert!(message.contains("http-client"));
        assert!(message.contains("HttpHealthIndicator"));
    }

    #[test]
    fn test_type_mismatch() {
        let mut registry = CapabilityRegistry::new();
        registry.register("answer", Arc::new(42u32));

        let err = registry
            .resolve::<String>("TestIndicator", "answer")
            .unwrap_err();
        assert!(matches!(err, CapabilityError::TypeMismatch { .. }));
    }

    #[test]
    fn test_ensure_all_present() {
        let mut registry = CapabilityRegistry::new();
        registry.register("http-client", Arc::new(1u8));
        registry.register("database", Arc::new(2u8));

        assert!(registry
            .ensure("TestIndicator", &["http-client", "database"])
            .is_ok());
    }

    #[test]
    fn test_ensure_fails_fast_on_first_missing() {
        let mut registry = CapabilityRegistry::new();
        registry.register("http-client", Arc::new(1u8));

        let err = registry
            .ensure("DatabaseHealthIndicator", &["http-client", "database"])
            .unwrap_err();

        assert!(matches!(
            err,
            CapabilityError::Missing { capability, .. } if capability == "database"
        ));
    }
}
