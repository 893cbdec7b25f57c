//! 配置管理
//!
//! 从 YAML 文件加载网关配置。查找顺序：
//! 1. 显式传入的路径
//! 2. `GATECAST_CONFIG` 环境变量
//! 3. `~/.gatecast/config.yaml`
//!
//! 默认路径下文件不存在时使用默认配置；显式指定的文件必须存在。

use crate::dispatch::bus::DEFAULT_BUS_BASE_URL;
use crate::models::route::Route;
use crate::router::StaticRouteTable;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// 配置文件路径环境变量
pub const CONFIG_ENV: &str = "GATECAST_CONFIG";

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 读取失败
    #[error("读取配置文件失败 {path}: {message}")]
    Read { path: String, message: String },

    /// 解析失败
    #[error("解析配置文件失败 {path}: {message}")]
    Parse { path: String, message: String },

    /// 配置值无效
    #[error("配置无效: {0}")]
    Invalid(String),
}

/// 网关配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// 监听配置
    pub server: ServerConfig,
    /// 静态路由表：`{version}/{service}` → 路由
    pub routes: HashMap<String, Route>,
    /// 路由存储配置
    pub store: StoreConfig,
    /// 消息总线配置
    pub bus: BusConfig,
    /// 出站调用配置
    pub outbound: OutboundConfig,
    /// 日志配置
    pub logging: LoggingConfig,
}

/// 监听配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 请求体大小上限（字节）
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8787,
            max_body_bytes: 1024 * 1024,
        }
    }
}

/// 路由存储配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub enabled: bool,
    /// SQLite 文件路径，缺省为 `~/.gatecast/routes.db`
    pub db_path: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            db_path: None,
        }
    }
}

/// 消息总线配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusConfig {
    pub base_url: String,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BUS_BASE_URL.to_string(),
        }
    }
}

/// 出站调用配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutboundConfig {
    /// 连接超时（毫秒）
    pub connect_timeout_ms: u64,
    /// 请求超时（毫秒），0 表示不限
    pub request_timeout_ms: u64,
    /// 全局代理
    pub proxy: Option<String>,
}

impl Default for OutboundConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 10_000,
            request_timeout_ms: 30_000,
            proxy: None,
        }
    }
}

impl OutboundConfig {
    /// 连接超时
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// 请求超时，0 表示不限
    pub fn request_timeout(&self) -> Option<Duration> {
        if self.request_timeout_ms > 0 {
            Some(Duration::from_millis(self.request_timeout_ms))
        } else {
            None
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl GatewayConfig {
    /// 校验配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port 不能为 0".to_string()));
        }
        if self.server.max_body_bytes == 0 {
            return Err(ConfigError::Invalid(
                "server.max_body_bytes 不能为 0".to_string(),
            ));
        }
        Ok(())
    }

    /// 构建静态路由表
    pub fn static_table(&self) -> StaticRouteTable {
        StaticRouteTable::from_routes(self.routes.clone())
    }

    /// 监听地址
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 从 YAML 文本解析
    pub fn from_yaml(text: &str, origin: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(text).map_err(|e| ConfigError::Parse {
            path: origin.to_string(),
            message: e.to_string(),
        })
    }
}

/// 默认配置文件路径
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".gatecast").join("config.yaml"))
}

/// 加载配置
pub fn load_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let explicit = path
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

    let (config_path, required) = match explicit {
        Some(p) => (p, true),
        None => match default_config_path() {
            Some(p) => (p, false),
            None => return Ok(GatewayConfig::default()),
        },
    };

    if !config_path.exists() {
        if required {
            return Err(ConfigError::Read {
                path: config_path.display().to_string(),
                message: "文件不存在".to_string(),
            });
        }
        tracing::info!(
            "[CONFIG] 配置文件不存在，使用默认配置: {}",
            config_path.display()
        );
        return Ok(GatewayConfig::default());
    }

    let text = std::fs::read_to_string(&config_path).map_err(|e| ConfigError::Read {
        path: config_path.display().to_string(),
        message: e.to_string(),
    })?;
    let config = GatewayConfig::from_yaml(&text, &config_path.display().to_string())?;
    config.validate()?;

    tracing::info!(
        "[CONFIG] 已加载配置: {} (静态路由 {} 条)",
        config_path.display(),
        config.routes.len()
    );
    Ok(config)
}
