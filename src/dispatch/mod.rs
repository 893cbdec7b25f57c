//! 分发层
//!
//! 按路由类型选择后端处理器并调用。
//!
//! # 架构设计
//!
//! ```text
//! dispatch/
//! ├── traits.rs       # BackendHandler trait 与处理器错误
//! ├── injection.rs    # table_name 注入/删除
//! ├── credential.rs   # 出站凭证解析
//! ├── rest.rs         # REST 转发（响应原样透传）
//! └── bus.rs          # Ably 总线发布（响应包装为信封）
//! ```
//!
//! 处理器按 [`RouteType`] 注册在表中，新增后端类型只需注册新的实现。

pub mod bus;
pub mod credential;
pub mod injection;
pub mod rest;
pub mod traits;

pub use bus::BusHandler;
pub use injection::{apply_table_name, InjectionOutcome};
pub use rest::RestHandler;
pub use traits::{BackendHandler, HandlerError, HandlerErrorKind, HandlerResult};

use crate::error::GatewayError;
use crate::models::envelope::GatewayRequest;
use crate::models::route::{Route, RouteType};
use crate::secrets::Secrets;
use axum::response::Response;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;

/// 请求体未携带 `type` 时错误信息中的占位值
const UNSPECIFIED_TYPE: &str = "unspecified";

/// 分发器
#[derive(Clone, Default)]
pub struct Dispatcher {
    handlers: HashMap<RouteType, Arc<dyn BackendHandler>>,
}

impl Dispatcher {
    /// 创建空分发器
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册 REST 与 ABLY 处理器
    pub fn with_default_handlers(
        client: Client,
        secrets: Arc<Secrets>,
        bus_base_url: impl Into<String>,
    ) -> Self {
        let mut dispatcher = Self::new();
        dispatcher.register(
            RouteType::Rest,
            Arc::new(RestHandler::new(client.clone(), secrets.clone())),
        );
        dispatcher.register(
            RouteType::Ably,
            Arc::new(BusHandler::new(client, secrets, bus_base_url)),
        );
        dispatcher
    }

    /// 注册处理器，同类型的旧处理器被替换
    pub fn register(&mut self, route_type: RouteType, handler: Arc<dyn BackendHandler>) {
        self.handlers.insert(route_type, handler);
    }

    /// 检查类型是否已注册
    pub fn supports(&self, route_type: &RouteType) -> bool {
        self.handlers.contains_key(route_type)
    }

    /// 分发请求
    ///
    /// 1. 按路由配置注入或删除 `table_name`
    /// 2. 按路由类型选择处理器，未注册返回 501
    /// 3. 处理器的任何失败（包括 panic）统一转换为 500
    pub async fn dispatch(&self, route: &Route, mut request: GatewayRequest) -> Response {
        let outcome = apply_table_name(route, &mut request.payload);
        match outcome {
            InjectionOutcome::Skipped => tracing::warn!(
                "[DISPATCH] 负载不是对象，跳过 table_name 处理: request_id={}",
                request.request_id
            ),
            InjectionOutcome::Stripped => tracing::info!(
                "[DISPATCH] 已删除客户端提供的 table_name: request_id={}",
                request.request_id
            ),
            _ => {}
        }

        let Some(handler) = self.handlers.get(&route.route_type).cloned() else {
            // 错误信息读取的是请求体中的 type 字段，而不是路由的类型
            let request_type = request
                .request_type
                .clone()
                .unwrap_or_else(|| UNSPECIFIED_TYPE.to_string());
            tracing::warn!(
                "[DISPATCH] 不支持的路由类型: request_id={} route_type={}",
                request.request_id,
                route.route_type
            );
            return GatewayError::UnsupportedType { request_type }.to_response(&request.request_id);
        };

        let request_id = request.request_id.clone();
        let handler_name = handler.name().to_string();
        let route = route.clone();
        let task = tokio::spawn(async move { handler.handle(&route, &request).await });

        let error = match task.await {
            Ok(Ok(response)) => return response,
            Ok(Err(e)) => e,
            Err(join_error) => HandlerError::new(HandlerErrorKind::Panicked, join_error.to_string()),
        };

        tracing::error!(
            "[DISPATCH] 处理器失败: request_id={} handler={} error={}",
            request_id,
            handler_name,
            crate::logger::sanitize_log_message(&error.to_string())
        );
        GatewayError::GatewayProcessingFailed.to_response(&request_id)
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut types: Vec<&str> = self.handlers.keys().map(RouteType::as_str).collect();
        types.sort_unstable();
        f.debug_struct("Dispatcher").field("handlers", &types).finish()
    }
}
