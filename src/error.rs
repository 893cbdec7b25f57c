//! 网关错误类型
//!
//! 定义一次请求周期内所有终止性错误及其响应形状

use crate::models::envelope::{AckEnvelope, DispatchEnvelope};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// 网关错误
///
/// 认证/校验阶段的错误以 nack 信封返回（HTTP 400），
/// 分发阶段的错误以 `{success: false, error}` 返回。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// 缺少或格式错误的 Authorization 头
    #[error("Missing or malformed Authorization header")]
    Unauthorized,

    /// Token 不匹配
    #[error("Invalid token")]
    InvalidToken,

    /// 请求体不是合法 JSON
    #[error("Request body is not valid JSON")]
    InvalidJson,

    /// 必填字段缺失
    #[error("Missing or empty field: {field}")]
    InvalidField { field: &'static str },

    /// 静态表与存储中都没有路由
    #[error("No route configured for {key}")]
    NoRoute { key: String },

    /// 不支持的路由类型
    #[error("Unsupported route type: {request_type}")]
    UnsupportedType { request_type: String },

    /// 消息总线发布失败（包含总线返回的错误内容）
    #[error("{0}")]
    BusPublishFailed(String),

    /// 处理器内部失败，原始错误只记录在服务端日志中
    #[error("Gateway processing failed")]
    GatewayProcessingFailed,
}

impl GatewayError {
    /// 获取错误码
    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::Unauthorized => "UNAUTHORIZED",
            GatewayError::InvalidToken => "INVALID_TOKEN",
            GatewayError::InvalidJson => "INVALID_JSON",
            GatewayError::InvalidField { .. } => "INVALID_FIELD",
            GatewayError::NoRoute { .. } => "NO_ROUTE",
            GatewayError::UnsupportedType { .. } => "UNSUPPORTED_TYPE",
            GatewayError::BusPublishFailed(_) => "BUS_PUBLISH_FAILED",
            GatewayError::GatewayProcessingFailed => "GATEWAY_PROCESSING_FAILED",
        }
    }

    /// 获取对应的 HTTP 状态码
    pub fn status_code(&self) -> u16 {
        match self {
            GatewayError::Unauthorized
            | GatewayError::InvalidToken
            | GatewayError::InvalidJson
            | GatewayError::InvalidField { .. }
            | GatewayError::NoRoute { .. } => 400,
            GatewayError::UnsupportedType { .. } => 501,
            GatewayError::BusPublishFailed(_) => 502,
            GatewayError::GatewayProcessingFailed => 500,
        }
    }

    /// 是否属于认证/校验阶段（nack 信封）
    pub fn is_nack(&self) -> bool {
        self.status_code() == 400
    }

    /// 转换为 HTTP 响应
    pub fn to_response(&self, request_id: &str) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if self.is_nack() {
            let envelope = AckEnvelope::nack(request_id, self.code(), self.to_string());
            (status, Json(envelope)).into_response()
        } else {
            (status, Json(DispatchEnvelope::failure(self.to_string()))).into_response()
        }
    }

    /// 记录带上下文的错误日志
    pub fn log_with_context(&self, trace_id: &str, request_id: &str) {
        if self.is_nack() {
            tracing::warn!(
                trace_id = %trace_id,
                request_id = %request_id,
                code = %self.code(),
                "[GATEWAY] 请求被拒绝: {}",
                self
            );
        } else {
            tracing::error!(
                trace_id = %trace_id,
                request_id = %request_id,
                code = %self.code(),
                "[GATEWAY] 分发失败: {}",
                crate::logger::sanitize_log_message(&self.to_string())
            );
        }
    }
}
