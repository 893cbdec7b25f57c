//! 路由模型
//!
//! 描述一个下游后端目标以及访问它所需的凭证配置。

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// 路由类型
///
/// 未知类型不会导致解析失败，而是保留原始字符串，由分发器返回 501。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RouteType {
    /// REST HTTP 后端
    Rest,
    /// Ably 发布/订阅消息总线
    Ably,
    /// 未支持的类型（保留原始值）
    Unknown(String),
}

impl RouteType {
    /// 获取类型字符串
    pub fn as_str(&self) -> &str {
        match self {
            RouteType::Rest => "REST",
            RouteType::Ably => "ABLY",
            RouteType::Unknown(raw) => raw,
        }
    }
}

impl From<String> for RouteType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "REST" => RouteType::Rest,
            "ABLY" => RouteType::Ably,
            _ => RouteType::Unknown(value),
        }
    }
}

impl From<RouteType> for String {
    fn from(value: RouteType) -> Self {
        match value {
            RouteType::Unknown(raw) => raw,
            other => other.as_str().to_string(),
        }
    }
}

impl Default for RouteType {
    fn default() -> Self {
        RouteType::Unknown(String::new())
    }
}

/// 读取 `type` 字段：缺失或 null 视为空类型，非字符串值保留其 JSON 文本
fn deserialize_route_type<'de, D>(deserializer: D) -> Result<RouteType, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(raw) => RouteType::from(raw),
        Value::Null => RouteType::default(),
        other => RouteType::Unknown(other.to_string()),
    })
}

impl fmt::Display for RouteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 单条路由配置
///
/// 解析后只读，每次请求重新获取，不跨请求缓存。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// 路由类型，缺失或无法识别时由分发器返回 501
    #[serde(rename = "type", default, deserialize_with = "deserialize_route_type")]
    pub route_type: RouteType,
    /// REST 目标地址
    #[serde(rename = "targetUrl", default, skip_serializing_if = "Option::is_none")]
    pub target_url: Option<String>,
    /// 字面量凭证
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// 凭证所在的密钥名（token 为空时使用）
    #[serde(
        rename = "authKeyEnvName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub auth_key_env_name: Option<String>,
    /// 消息总线频道名
    #[serde(rename = "channelName", default, skip_serializing_if = "Option::is_none")]
    pub channel_name: Option<String>,
    /// 注入到转发负载中的表名
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
}

impl Route {
    /// 创建 REST 路由
    pub fn rest(target_url: impl Into<String>) -> Self {
        Self {
            route_type: RouteType::Rest,
            target_url: Some(target_url.into()),
            token: None,
            auth_key_env_name: None,
            channel_name: None,
            table_name: None,
        }
    }

    /// 创建消息总线路由
    pub fn ably(channel_name: impl Into<String>) -> Self {
        Self {
            route_type: RouteType::Ably,
            target_url: None,
            token: None,
            auth_key_env_name: None,
            channel_name: Some(channel_name.into()),
            table_name: None,
        }
    }

    /// 设置字面量凭证
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// 设置凭证密钥名
    pub fn with_auth_key_env_name(mut self, name: impl Into<String>) -> Self {
        self.auth_key_env_name = Some(name.into());
        self
    }

    /// 设置注入表名
    pub fn with_table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = Some(table_name.into());
        self
    }
}

/// 构建路由键 `{version}/{service}`
///
/// 不做转义或校验，任意字符原样拼接。
pub fn route_key(version: &str, service: &str) -> String {
    format!("{}/{}", version, service)
}
