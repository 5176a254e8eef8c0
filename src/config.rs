use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 后端 API 根地址
    pub api_base_url: String,
    /// 图片等媒体资源的根地址（相对 URL 会拼接在它后面）
    pub media_base_url: String,
    /// 持久化会话文件
    pub session_file: String,
    /// 列表默认每页条数
    pub page_size: u32,
    /// 创建成功后保留表单展示的时长（毫秒）
    pub success_reset_delay_ms: u64,
    /// HTTP 请求超时（秒）
    pub request_timeout_secs: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

/// 只用于判断 TOML 中是否显式给出了媒体地址
#[derive(Deserialize)]
struct MediaOverride {
    media_base_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:1337".to_string(),
            media_base_url: "http://localhost:1337".to_string(),
            session_file: "session.json".to_string(),
            page_size: 25,
            success_reset_delay_ms: 2000,
            request_timeout_secs: 30,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 默认值 → `INVENTORY_CONFIG` 指向的 TOML 文件 → 环境变量
    pub fn load() -> Result<Self, ConfigError> {
        let base = match std::env::var("INVENTORY_CONFIG") {
            Ok(path) => Self::from_toml_file(path)?,
            Err(_) => Self::default(),
        };
        Ok(base.with_env_overrides())
    }

    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 从 TOML 文件加载，缺失的字段使用默认值
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        let mut config: Config = toml::from_str(content)?;
        let explicit: MediaOverride = toml::from_str(content)?;
        // 没有单独配置媒体地址时，跟随 API 地址
        if explicit.media_base_url.is_none() {
            config.media_base_url = config.api_base_url.clone();
        }
        Ok(config)
    }

    fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_base_url = lookup("BASE_API_URL").unwrap_or(self.api_base_url);
        let media_base_url = lookup("MEDIA_BASE_URL").unwrap_or_else(|| {
            if lookup("BASE_API_URL").is_some() && self.media_base_url == Config::default().media_base_url {
                api_base_url.clone()
            } else {
                self.media_base_url
            }
        });
        Self {
            api_base_url,
            media_base_url,
            session_file: lookup("SESSION_FILE").unwrap_or(self.session_file),
            page_size: lookup("PAGE_SIZE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.page_size),
            success_reset_delay_ms: lookup("SUCCESS_RESET_DELAY_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.success_reset_delay_ms),
            request_timeout_secs: lookup("REQUEST_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.request_timeout_secs),
            verbose_logging: lookup("VERBOSE_LOGGING")
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.verbose_logging),
        }
    }

    pub fn success_reset_delay(&self) -> Duration {
        Duration::from_millis(self.success_reset_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_toml_partial_uses_defaults() {
        let config = Config::from_toml_str(
            r#"
            api_base_url = "https://inventory.example.com"
            page_size = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.api_base_url, "https://inventory.example.com");
        assert_eq!(config.media_base_url, "https://inventory.example.com");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.success_reset_delay_ms, 2000);
        assert_eq!(config.session_file, "session.json");
    }

    #[test]
    fn test_env_overrides_and_bad_values() {
        let env: HashMap<&str, &str> = [
            ("BASE_API_URL", "http://10.0.0.2:1337"),
            ("PAGE_SIZE", "not-a-number"),
            ("VERBOSE_LOGGING", "true"),
        ]
        .into_iter()
        .collect();

        let config = Config::default().with_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.api_base_url, "http://10.0.0.2:1337");
        assert_eq!(config.media_base_url, "http://10.0.0.2:1337");
        // 无法解析的值回退到上一层
        assert_eq!(config.page_size, 25);
        assert!(config.verbose_logging);
    }

    #[test]
    fn test_media_url_mentioned_only_in_comment_follows_api() {
        let config = Config::from_toml_str(
            r#"
            # media_base_url 默认跟随 api_base_url
            api_base_url = "https://inventory.example.com"
            "#,
        )
        .unwrap();
        assert_eq!(config.media_base_url, "https://inventory.example.com");

        let config = Config::from_toml_str(
            r#"
            api_base_url = "https://inventory.example.com"
            media_base_url = "https://cdn.example.com"
            "#,
        )
        .unwrap();
        assert_eq!(config.media_base_url, "https://cdn.example.com");
    }

    #[test]
    fn test_malformed_toml_is_error() {
        assert!(Config::from_toml_str("page_size = \"many\"").is_err());
    }
}
