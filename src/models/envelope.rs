//! 信封模型
//!
//! 入站请求信封与两种出站响应信封：
//! - 认证/校验阶段使用 `ack`/`nack` 信封
//! - 分发阶段使用 `success`/`error` 信封
//!
//! 两种形状由不同阶段产生，下游可能依赖其中任意一种，不做合并。

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 默认请求 ID
pub const DEFAULT_REQUEST_ID: &str = "unknown";

/// 默认 API 版本
pub const DEFAULT_VERSION: &str = "v1";

/// 入站请求信封（已通过校验）
///
/// 字符串形式的 `request_id`/`version`/`service`/`type` 只用于路由键、日志与 nack；
/// 转发时输出的是 `fields` 中客户端原样发送的值（缺失时为默认值）。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GatewayRequest {
    /// 请求 ID
    #[serde(skip)]
    pub request_id: String,
    /// API 版本
    #[serde(skip)]
    pub version: String,
    /// 服务名
    #[serde(skip)]
    pub service: String,
    /// 业务负载（任意 JSON 值）
    pub payload: Value,
    /// 请求体中的 `type` 字段（仅用于不支持类型的错误信息）
    #[serde(skip)]
    pub request_type: Option<String>,
    /// `payload` 以外的信封字段，转发时原样保留
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl GatewayRequest {
    /// 创建请求信封
    pub fn new(service: impl Into<String>, payload: Value) -> Self {
        let service = service.into();
        let mut fields = Map::new();
        fields.insert("service".to_string(), Value::String(service.clone()));

        Self {
            request_id: String::new(),
            version: String::new(),
            service,
            payload,
            request_type: None,
            fields,
        }
        .with_request_id(DEFAULT_REQUEST_ID)
        .with_version(DEFAULT_VERSION)
    }

    /// 设置请求 ID
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self.fields.insert(
            "request_id".to_string(),
            Value::String(self.request_id.clone()),
        );
        self
    }

    /// 设置版本
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self.fields
            .insert("version".to_string(), Value::String(self.version.clone()));
        self
    }

    /// 路由键 `{version}/{service}`
    pub fn route_key(&self) -> String {
        super::route::route_key(&self.version, &self.service)
    }
}

/// ack/nack 信封类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AckType {
    Ack,
    Nack,
}

/// 认证/校验阶段的响应信封
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AckEnvelope {
    #[serde(rename = "type")]
    pub kind: AckType,
    pub request_id: String,
    pub payload: Value,
}

impl AckEnvelope {
    /// 构建 ack 信封
    pub fn ack(request_id: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: AckType::Ack,
            request_id: request_id.into(),
            payload,
        }
    }

    /// 构建 nack 信封，负载为 `{status: "error", code, message}`
    pub fn nack(request_id: impl Into<String>, code: &str, message: impl Into<String>) -> Self {
        Self {
            kind: AckType::Nack,
            request_id: request_id.into(),
            payload: serde_json::json!({
                "status": "error",
                "code": code,
                "message": message.into(),
            }),
        }
    }
}

/// 分发阶段的响应信封
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchEnvelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DispatchEnvelope {
    /// 消息已被总线接收
    pub fn accepted(message: impl Into<String>) -> Self {
        Self {
            success: true,
            status: Some("Accepted".to_string()),
            message: Some(message.into()),
            error: None,
        }
    }

    /// 分发失败
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            status: None,
            message: None,
            error: Some(error.into()),
        }
    }
}
