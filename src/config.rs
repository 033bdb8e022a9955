//! 程序配置
//!
//! 支持三种来源（从低到高优先级）：内置默认值 → TOML 配置文件 → 环境变量

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 下游报告生成服务的基础 URL
    pub api_base_url: String,
    /// 空间标识（URL 路径段 `{space}`）
    pub space_id: String,
    /// 同一 ticker 相邻两步之间的间隔（毫秒）
    pub step_delay_ms: u64,
    /// 单次 HTTP 请求超时（秒）
    pub request_timeout_secs: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "https://insights.example.com".to_string(),
            space_id: "koala-gains".to_string(),
            step_delay_ms: 1000,
            request_timeout_secs: 120,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从环境变量加载配置，缺失项回落到默认值
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            api_base_url: std::env::var("INSIGHTS_API_BASE_URL").unwrap_or(default.api_base_url),
            space_id: std::env::var("INSIGHTS_SPACE_ID").unwrap_or(default.space_id),
            step_delay_ms: std::env::var("INSIGHTS_STEP_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.step_delay_ms),
            request_timeout_secs: std::env::var("INSIGHTS_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.request_timeout_secs),
            verbose_logging: std::env::var("INSIGHTS_VERBOSE_LOGGING")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.verbose_logging),
        }
    }

    /// 从 TOML 文件加载配置
    pub async fn from_file(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("无法读取配置文件: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("无法解析配置文件: {}", path.display()))?;

        Ok(config)
    }

    /// 步间延迟
    pub fn step_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.step_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.step_delay_ms, 1000);
        assert!(!config.verbose_logging);
    }

    #[test]
    fn test_parse_toml_config() {
        let toml_str = r#"
            api_base_url = "http://localhost:3000"
            step_delay_ms = 0
        "#;
        let config: Config = toml::from_str(toml_str).expect("解析配置失败");
        assert_eq!(config.api_base_url, "http://localhost:3000");
        assert_eq!(config.step_delay_ms, 0);
        // 未指定项回落到默认值
        assert_eq!(config.request_timeout_secs, 120);
    }
}
