//! 出站 HTTP 客户端工厂
//!
//! 为 REST 转发和总线发布创建共享的 reqwest 客户端。
//! 出站调用使用有界超时，不做重试：超时即为该请求的终止性失败。

use reqwest::{Client, Proxy};
use std::time::Duration;
use thiserror::Error;

/// 客户端错误类型
#[derive(Debug, Error)]
pub enum ClientError {
    /// 无效的代理 URL
    #[error("无效的代理 URL: {0}")]
    InvalidProxy(String),

    /// 客户端构建错误
    #[error("客户端构建错误: {0}")]
    Build(String),
}

/// 出站客户端工厂
#[derive(Debug, Clone)]
pub struct ClientFactory {
    /// 全局代理 URL
    proxy: Option<String>,
    /// 连接超时时间
    connect_timeout: Duration,
    /// 请求超时时间（None 表示不限）
    request_timeout: Option<Duration>,
}

impl Default for ClientFactory {
    fn default() -> Self {
        Self {
            proxy: None,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl ClientFactory {
    /// 创建新的客户端工厂
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置代理
    pub fn with_proxy(mut self, proxy_url: Option<String>) -> Self {
        self.proxy = proxy_url.filter(|p| !p.trim().is_empty());
        self
    }

    /// 设置连接超时时间
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// 设置请求超时时间
    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// 请求超时时间
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    /// 检查代理 URL 协议
    ///
    /// 支持 `socks5://`、`http://`、`https://`
    pub fn check_proxy_url(url: &str) -> Result<(), ClientError> {
        let lower = url.to_lowercase();
        if ["socks5://", "http://", "https://"]
            .iter()
            .any(|scheme| lower.starts_with(scheme))
        {
            Ok(())
        } else {
            Err(ClientError::InvalidProxy(url.to_string()))
        }
    }

    /// 创建 HTTP 客户端
    pub fn build(&self) -> Result<Client, ClientError> {
        let mut builder = Client::builder().connect_timeout(self.connect_timeout);

        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(url) = &self.proxy {
            Self::check_proxy_url(url)?;
            let proxy = Proxy::all(url).map_err(|e| ClientError::InvalidProxy(e.to_string()))?;
            builder = builder.proxy(proxy);
        }

        builder.build().map_err(|e| ClientError::Build(e.to_string()))
    }
}
