//! 认证门
//!
//! 校验入站请求的 Bearer Token。所有请求统一校验，路由级 token
//! 只作用于出站调用。

use crate::error::GatewayError;
use crate::secrets::Secrets;
use subtle::ConstantTimeEq;

/// Bearer 前缀（区分大小写，单个空格）
const BEARER_PREFIX: &str = "Bearer ";

/// 认证门
#[derive(Clone)]
pub struct AuthGate {
    /// 期望的网关 Token
    expected_token: Option<String>,
}

impl AuthGate {
    /// 创建新的认证门
    pub fn new(expected_token: Option<String>) -> Self {
        Self { expected_token }
    }

    /// 从密钥表读取网关 Token
    pub fn from_secrets(secrets: &Secrets) -> Self {
        let expected_token = secrets.gateway_token().map(str::to_string);
        if expected_token.is_none() {
            tracing::warn!("[AUTH] 未配置 GATEWAY_TOKEN，所有请求都将被拒绝");
        }
        Self::new(expected_token)
    }

    /// 校验 Authorization 头
    ///
    /// Token 取头部值中第二个以空白分隔的片段。
    pub fn authenticate(&self, header: Option<&str>) -> Result<(), GatewayError> {
        let header = match header {
            Some(h) if h.starts_with(BEARER_PREFIX) => h,
            _ => return Err(GatewayError::Unauthorized),
        };

        let provided = header.split_whitespace().nth(1).unwrap_or("");
        match &self.expected_token {
            Some(expected) if provided.as_bytes().ct_eq(expected.as_bytes()).into() => Ok(()),
            _ => Err(GatewayError::InvalidToken),
        }
    }
}

impl std::fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGate")
            .field("configured", &self.expected_token.is_some())
            .finish()
    }
}
