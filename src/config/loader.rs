//! 配置加载器实现
//!
//! 提供TOML配置文件解析、环境变量替换和错误处理功能

use crate::config::types::{validate_config, Config};
use crate::error::{ConfigError, Result};
use async_trait::async_trait;
use std::path::Path;

/// 配置加载器trait，定义配置加载接口
#[async_trait]
pub trait ConfigLoader: Send + Sync {
    /// 从文件加载配置
    ///
    /// # 参数
    /// * `path` - 配置文件路径
    ///
    /// # 返回
    /// * `Result<Config>` - 加载的配置或错误
    async fn load_from_file<P: AsRef<Path> + Send>(&self, path: P) -> Result<Config>;

    /// 从字符串加载配置
    ///
    /// # 参数
    /// * `content` - 配置文件内容
    ///
    /// # 返回
    /// * `Result<Config>` - 加载的配置或错误
    async fn load_from_string(&self, content: &str) -> Result<Config>;

    /// 验证配置
    ///
    /// # 参数
    /// * `config` - 要验证的配置
    ///
    /// # 返回
    /// * `Result<()>` - 验证结果
    fn validate(&self, config: &Config) -> Result<()>;
}

/// TOML配置加载器实现
#[derive(Debug, Clone, Default)]
pub struct TomlConfigLoader {
    /// 是否启用环境变量替换
    enable_env_substitution: bool,
}

impl TomlConfigLoader {
    /// 创建新的TOML配置加载器
    ///
    /// # 参数
    /// * `enable_env_substitution` - 是否启用环境变量替换
    pub fn new(enable_env_substitution: bool) -> Self {
        Self {
            enable_env_substitution,
        }
    }

    /// 替换字符串中 `${VAR_NAME}` 格式的环境变量
    ///
    /// 变量名只允许字母、数字和下划线；未闭合或非法的占位符原样保留
    fn substitute_env_vars(&self, content: &str) -> Result<String> {
        if !self.enable_env_substitution {
            return Ok(content.to_string());
        }

        let mut result = String::with_capacity(content.len());
        let mut rest = content;

        while let Some(start) = rest.find("${") {
            result.push_str(&rest[..start]);
            let after = &rest[start + 2..];

            let Some(end) = after.find('}') else {
                result.push_str("${");
                rest = after;
                continue;
            };

            let var_name = &after[..end];
            let is_valid_name = !var_name.is_empty()
                && var_name
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_')
                && !var_name.starts_with(|c: char| c.is_ascii_digit());

            if !is_valid_name {
                result.push_str("${");
                rest = after;
                continue;
            }

            match std::env::var(var_name) {
                Ok(value) => result.push_str(&value),
                Err(_) => {
                    return Err(ConfigError::EnvVarError {
                        var: var_name.to_string(),
                    }
                    .into());
                }
            }

            rest = &after[end + 1..];
        }

        result.push_str(rest);
        Ok(result)
    }

    /// 解析TOML内容
    fn parse_toml(&self, content: &str) -> Result<Config> {
        // 替换环境变量
        let processed_content = self.substitute_env_vars(content)?;

        // 解析TOML
        let config: Config = toml::from_str(&processed_content)
            .map_err(|e| ConfigError::ParseError(format!("TOML解析失败: {}", e)))?;

        Ok(config)
    }
}

#[async_trait]
impl ConfigLoader for TomlConfigLoader {
    async fn load_from_file<P: AsRef<Path> + Send>(&self, path: P) -> Result<Config> {
        let path = path.as_ref();

        // 检查文件是否存在
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_string_lossy().to_string(),
            }
            .into());
        }

        // 读取文件内容
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ConfigError::ParseError(format!("读取文件失败: {}", e)))?;

        // 解析并验证配置
        let config = self.parse_toml(&content)?;
        self.validate(&config)?;

        log::info!("成功加载配置文件: {}", path.display());
        Ok(config)
    }

    async fn load_from_string(&self, content: &str) -> Result<Config> {
        let config = self.parse_toml(content)?;
        self.validate(&config)?;
        Ok(config)
    }

    fn validate(&self, config: &Config) -> Result<()> {
        validate_config(config).map_err(|e| ConfigError::ValidationError(e).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::ProbeTarget;
    use std::io::Write;

    const SAMPLE_CONFIG: &str = r#"
        [global]
        default_timeout_ms = 2000
        log_level = "debug"

        [[probes]]
        name = "upstream"
        type = "http"
        url = "https://example.com/health"

        [[probes]]
        name = "cache"
        type = "tcp"
        host = "127.0.0.1"
        port = 6379
        timeout_ms = 500
    "#;

    #[tokio::test]
    async fn test_load_from_string() {
        let loader = TomlConfigLoader::new(false);
        let config = loader.load_from_string(SAMPLE_CONFIG).await.unwrap();

        assert_eq!(config.global.default_timeout_ms, 2000);
        assert_eq!(config.global.log_level, "debug");
        // 未显式配置的项使用默认值
        assert_eq!(config.global.max_concurrent_checks, 50);
        assert_eq!(config.probes.len(), 2);
        assert_eq!(config.probes[1].timeout_ms, Some(500));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE_CONFIG.as_bytes()).unwrap();

        let loader = TomlConfigLoader::new(false);
        let config = loader.load_from_file(file.path()).await.unwrap();

        assert_eq!(config.probes[0].name, "upstream");
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let loader = TomlConfigLoader::new(false);
        let result = loader
            .load_from_file("/nonexistent/service-pulse.toml")
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_invalid_config_rejected() {
        let loader = TomlConfigLoader::new(false);
        let content = r#"
            [global]
            default_timeout_ms = 0
        "#;

        let result = loader.load_from_string(content).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_env_var_substitution() {
        std::env::set_var("SERVICE_PULSE_TEST_HOST", "redis.internal");

        let loader = TomlConfigLoader::new(true);
        let content = r#"
            [global]

            [[probes]]
            name = "cache"
            type = "tcp"
            host = "${SERVICE_PULSE_TEST_HOST}"
            port = 6379
        "#;

        let config = loader.load_from_string(content).await.unwrap();
        assert_eq!(
            config.probes[0].target,
            ProbeTarget::Tcp {
                host: "redis.internal".to_string(),
                port: 6379
            }
        );
    }

    #[tokio::test]
    async fn test_missing_env_var_is_error() {
        let loader = TomlConfigLoader::new(true);
        let content = r#"
            [global]

            [[probes]]
            name = "cache"
            type = "tcp"
            host = "${SERVICE_PULSE_UNSET_VAR}"
            port = 6379
        "#;

        let result = loader.load_from_string(content).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_unclosed_placeholder_preserved() {
        let loader = TomlConfigLoader::new(true);
        let substituted = loader.substitute_env_vars("prefix ${not closed").unwrap();
        assert_eq!(substituted, "prefix ${not closed");
    }
}
