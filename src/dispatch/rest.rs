//! REST 转发处理器
//!
//! 把请求信封作为 JSON 请求体 POST 到路由的 `targetUrl`，
//! 后端响应（状态码与响应体）原样返回给调用方，不做信封包装。

use super::credential::resolve_credential;
use super::traits::{BackendHandler, HandlerError, HandlerErrorKind, HandlerResult};
use crate::models::envelope::GatewayRequest;
use crate::models::route::Route;
use crate::secrets::Secrets;
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, StatusCode},
    response::Response,
};
use reqwest::Client;
use std::sync::Arc;

/// REST 转发处理器
pub struct RestHandler {
    client: Client,
    secrets: Arc<Secrets>,
}

impl RestHandler {
    /// 创建新的 REST 处理器
    pub fn new(client: Client, secrets: Arc<Secrets>) -> Self {
        Self { client, secrets }
    }
}

#[async_trait]
impl BackendHandler for RestHandler {
    async fn handle(&self, route: &Route, request: &GatewayRequest) -> HandlerResult<Response> {
        let target_url = route
            .target_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| HandlerError::missing_field(route, "targetUrl"))?;

        let mut builder = self
            .client
            .post(target_url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(request);

        if let Some(credential) = resolve_credential(route, &self.secrets) {
            builder = builder.bearer_auth(credential);
        }

        tracing::info!(
            "[REST] 转发请求: request_id={} target={}",
            request.request_id,
            target_url
        );

        let resp = builder.send().await?;
        let status = resp.status().as_u16();
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = resp.bytes().await?;

        tracing::info!(
            "[REST] 后端响应: request_id={} status={} bytes={}",
            request.request_id,
            status,
            body.len()
        );

        let mut response = Response::builder().status(
            StatusCode::from_u16(status).map_err(|e| {
                HandlerError::new(HandlerErrorKind::InvalidResponse, e.to_string())
            })?,
        );
        if let Some(content_type) = content_type {
            response = response.header(header::CONTENT_TYPE, content_type);
        }

        response
            .body(Body::from(body))
            .map_err(|e| HandlerError::new(HandlerErrorKind::InvalidResponse, e.to_string()))
    }

    fn name(&self) -> &str {
        "rest"
    }
}
