//! 后端处理器 Trait 定义
//!
//! 每种路由类型对应一个处理器实现，由分发器按类型注册与查找。

use crate::models::envelope::GatewayRequest;
use crate::models::route::Route;
use async_trait::async_trait;
use axum::response::Response;

/// 处理器调用结果
pub type HandlerResult<T> = Result<T, HandlerError>;

/// 处理器错误
///
/// 分发器只记录该错误，对调用方统一返回通用的 500 响应。
#[derive(Debug, Clone)]
pub struct HandlerError {
    /// 错误类型
    pub kind: HandlerErrorKind,
    /// 错误消息
    pub message: String,
    /// HTTP 状态码（如果有）
    pub status_code: Option<u16>,
}

impl std::fmt::Display for HandlerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(code) = self.status_code {
            write!(f, "{} ({}): {}", self.kind, code, self.message)
        } else {
            write!(f, "{}: {}", self.kind, self.message)
        }
    }
}

impl std::error::Error for HandlerError {}

/// 处理器错误类型枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerErrorKind {
    /// 路由配置不完整
    InvalidRoute,
    /// 网络错误
    NetworkError,
    /// 请求超时
    Timeout,
    /// 后端响应无法处理
    InvalidResponse,
    /// 处理器任务异常终止
    Panicked,
    /// 其他错误
    Other,
}

impl std::fmt::Display for HandlerErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRoute => write!(f, "InvalidRoute"),
            Self::NetworkError => write!(f, "NetworkError"),
            Self::Timeout => write!(f, "Timeout"),
            Self::InvalidResponse => write!(f, "InvalidResponse"),
            Self::Panicked => write!(f, "Panicked"),
            Self::Other => write!(f, "Other"),
        }
    }
}

impl HandlerError {
    /// 创建新的处理器错误
    pub fn new(kind: HandlerErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status_code: None,
        }
    }

    /// 路由缺少必需字段
    pub fn missing_field(route: &Route, field: &str) -> Self {
        Self::new(
            HandlerErrorKind::InvalidRoute,
            format!("{} 路由缺少字段 {}", route.route_type, field),
        )
    }
}

impl From<reqwest::Error> for HandlerError {
    fn from(e: reqwest::Error) -> Self {
        let kind = if e.is_timeout() {
            HandlerErrorKind::Timeout
        } else if e.is_connect() || e.is_request() {
            HandlerErrorKind::NetworkError
        } else if e.is_body() || e.is_decode() {
            HandlerErrorKind::InvalidResponse
        } else {
            HandlerErrorKind::Other
        };
        Self {
            kind,
            message: e.to_string(),
            status_code: e.status().map(|s| s.as_u16()),
        }
    }
}

/// 后端处理器 Trait
#[async_trait]
pub trait BackendHandler: Send + Sync {
    /// 把请求信封转发到路由指定的后端
    async fn handle(&self, route: &Route, request: &GatewayRequest) -> HandlerResult<Response>;

    /// 获取处理器名称
    fn name(&self) -> &str;
}
