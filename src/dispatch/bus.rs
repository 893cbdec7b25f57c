//! 消息总线发布处理器
//!
//! 把负载包装成具名事件发布到 Ably REST 频道：
//! - 目标：`{base_url}/{urlencode(channelName)}/messages`
//! - 事件名：`payload.action`，缺失时为 `gateway-event`
//! - 请求体：`[{"name": 事件名, "data": payload}]`
//! - 认证：`Basic base64(凭证)`，凭证本身即为 Ably key，不再拼接 `user:pass`

use super::credential::resolve_credential;
use super::traits::{BackendHandler, HandlerError, HandlerResult};
use crate::error::GatewayError;
use crate::models::envelope::{DispatchEnvelope, GatewayRequest};
use crate::models::route::Route;
use crate::secrets::Secrets;
use async_trait::async_trait;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde_json::{json, Value};
use std::sync::Arc;

/// 默认总线地址
pub const DEFAULT_BUS_BASE_URL: &str = "https://rest.ably.io/channels";

/// 默认事件名
pub const DEFAULT_EVENT_NAME: &str = "gateway-event";

/// 消息总线处理器
pub struct BusHandler {
    client: Client,
    secrets: Arc<Secrets>,
    base_url: String,
}

impl BusHandler {
    /// 创建新的总线处理器
    pub fn new(client: Client, secrets: Arc<Secrets>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            secrets,
            base_url: base_url.into(),
        }
    }

    /// 频道发布地址
    pub fn publish_url(&self, channel: &str) -> String {
        format!(
            "{}/{}/messages",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(channel)
        )
    }
}

/// 事件名：非空字符串的 `payload.action`，否则为默认值
pub fn event_name(payload: &Value) -> &str {
    payload
        .get("action")
        .and_then(Value::as_str)
        .filter(|a| !a.is_empty())
        .unwrap_or(DEFAULT_EVENT_NAME)
}

/// 发布请求体
pub fn publish_body(payload: &Value) -> Value {
    json!([{ "name": event_name(payload), "data": payload }])
}

/// Basic 认证头的值
pub fn basic_auth_value(credential: &str) -> String {
    format!("Basic {}", STANDARD.encode(credential))
}

#[async_trait]
impl BackendHandler for BusHandler {
    async fn handle(&self, route: &Route, request: &GatewayRequest) -> HandlerResult<Response> {
        let channel = route
            .channel_name
            .as_deref()
            .filter(|c| !c.is_empty())
            .ok_or_else(|| HandlerError::missing_field(route, "channelName"))?;

        let url = self.publish_url(channel);
        let mut builder = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(publish_body(&request.payload).to_string());

        if let Some(credential) = resolve_credential(route, &self.secrets) {
            builder = builder.header(reqwest::header::AUTHORIZATION, basic_auth_value(credential));
        }

        tracing::info!(
            "[BUS] 发布消息: request_id={} channel={} event={}",
            request.request_id,
            channel,
            event_name(&request.payload)
        );

        let resp = builder.send().await?;
        let status = resp.status();
        if status.is_success() {
            let envelope =
                DispatchEnvelope::accepted(format!("Message published to channel {}", channel));
            return Ok((StatusCode::OK, Json(envelope)).into_response());
        }

        let body = resp.text().await?;
        tracing::warn!(
            "[BUS] 发布失败: request_id={} channel={} status={} body={}",
            request.request_id,
            channel,
            status,
            crate::logger::sanitize_log_message(&body)
        );
        Ok(GatewayError::BusPublishFailed(body).to_response(&request.request_id))
    }

    fn name(&self) -> &str {
        "ably"
    }
}
