//! 静态配置
//!
//! 启动时加载一次，之后只读。
//! 优先级：ENV > config.toml > 默认值，ENV 前缀 AFF，分隔符 __
//! 示例：AFF__SERVER__PORT=9999

use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};

static CONFIG: OnceLock<Arc<StaticConfig>> = OnceLock::new();

/// 读取全局配置；`init_config` 没跑过时（测试里）退回默认值
pub fn get_config() -> Arc<StaticConfig> {
    CONFIG
        .get_or_init(|| Arc::new(StaticConfig::default()))
        .clone()
}

/// 加载 config.toml + 环境变量并固化为全局配置
pub fn init_config() {
    CONFIG.get_or_init(|| Arc::new(StaticConfig::load()));
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub redirect: RedirectConfig,
}

impl StaticConfig {
    pub fn load() -> Self {
        use config::{Config, Environment, File};

        let path = "config.toml";
        let built = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("AFF")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .and_then(|settings| settings.try_deserialize::<StaticConfig>());

        match built {
            Ok(config) => {
                if std::path::Path::new(path).exists() {
                    eprintln!("[INFO] Configuration loaded from: {}", path);
                }
                config
            }
            Err(e) => {
                eprintln!("[ERROR] Bad configuration, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// 渲染一份带全部默认值的示例 config.toml
    pub fn generate_sample_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub database_url: String,
    pub pool_size: u32,
    pub retry_count: u32,
    pub retry_base_delay_ms: u64,
    pub retry_max_delay_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://afflink.db?mode=rwc".into(),
            pool_size: 10,
            retry_count: 3,
            retry_base_delay_ms: 100,
            retry_max_delay_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// tracing EnvFilter 指令，如 "info" 或 "afflink=debug,info"
    pub level: String,
    /// "plain" 或 "json"
    pub format: String,
    pub file: Option<String>,
    pub max_backups: u32,
    pub enable_rotation: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "plain".into(),
            file: None,
            max_backups: 7,
            enable_rotation: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedirectConfig {
    /// 空路径访问时跳转的默认地址
    pub default_url: String,
    /// 短码长度（62 符号字母表）
    pub code_length: usize,
}

impl Default for RedirectConfig {
    fn default() -> Self {
        Self {
            default_url: "https://example.com".into(),
            code_length: 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StaticConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.retry_count, 3);
        assert_eq!(config.redirect.code_length, 6);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_sample_config_is_valid_toml() {
        let sample = StaticConfig::generate_sample_config();
        let parsed: StaticConfig = toml::from_str(&sample).expect("sample must round-trip");
        assert_eq!(parsed.server.host, "127.0.0.1");
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let parsed: StaticConfig =
            toml::from_str("[server]\nport = 9000\n").expect("partial config must parse");
        assert_eq!(parsed.server.port, 9000);
        assert_eq!(parsed.server.host, "127.0.0.1");
        assert_eq!(parsed.database.pool_size, 10);
    }
}
