//! HTTP 服务模块
//!
//! 只暴露一个端点 `POST /api`：
//! - 其他路径返回 404
//! - `/api` 上的其他方法返回 405

pub mod handlers;

use crate::auth::AuthGate;
use crate::client::ClientFactory;
use crate::config::GatewayConfig;
use crate::database::{self, dao::RouteDao};
use crate::dispatch::Dispatcher;
use crate::router::{
    RouteResolver, RouteStore, RouteStoreAdapter, SqliteRouteStore, StaticRouteTable,
};
use crate::secrets::Secrets;
use axum::{extract::DefaultBodyLimit, http::StatusCode, routing::post, Router};
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;

/// 共享状态
///
/// 请求之间只共享只读数据：静态路由表与存储句柄。
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthGate>,
    pub resolver: Arc<RouteResolver>,
    pub dispatcher: Arc<Dispatcher>,
}

impl AppState {
    /// 创建共享状态
    pub fn new(auth: AuthGate, resolver: RouteResolver, dispatcher: Dispatcher) -> Self {
        Self {
            auth: Arc::new(auth),
            resolver: Arc::new(resolver),
            dispatcher: Arc::new(dispatcher),
        }
    }

    /// 按配置组装共享状态
    ///
    /// 存储启用但无法打开时记录错误并以无存储模式继续，此时只使用静态路由。
    pub fn from_config(config: &GatewayConfig, secrets: Secrets) -> Result<Self, String> {
        let secrets = Arc::new(secrets);
        let auth = AuthGate::from_secrets(&secrets);

        let store = if config.store.enabled {
            match database::init_database(config.store.db_path.as_deref()) {
                Ok(conn) => {
                    match RouteDao::list_keys(&conn.lock()) {
                        Ok(keys) => {
                            tracing::info!("[SERVER] 路由存储中有 {} 个键: {:?}", keys.len(), keys)
                        }
                        Err(e) => tracing::warn!("[SERVER] 无法列出存储路由: {}", e),
                    }
                    let store: Arc<dyn RouteStore> = Arc::new(SqliteRouteStore::new(conn));
                    Some(store)
                }
                Err(e) => {
                    tracing::error!("[SERVER] 路由存储不可用，仅使用静态路由: {}", e);
                    None
                }
            }
        } else {
            None
        };
        let resolver = RouteResolver::new(
            Arc::new(config.static_table()),
            RouteStoreAdapter::new(store),
        );

        let factory = ClientFactory::new()
            .with_connect_timeout(config.outbound.connect_timeout())
            .with_request_timeout(config.outbound.request_timeout())
            .with_proxy(config.outbound.proxy.clone());
        match factory.request_timeout() {
            Some(timeout) => tracing::info!("[SERVER] 出站请求超时: {:?}，不重试", timeout),
            None => tracing::warn!("[SERVER] 出站请求未设置超时"),
        }
        let client = factory.build().map_err(|e| e.to_string())?;
        let dispatcher =
            Dispatcher::with_default_handlers(client, secrets, config.bus.base_url.clone());

        for key in unsupported_static_routes(resolver.static_table(), &dispatcher) {
            tracing::warn!("[SERVER] 静态路由类型不受支持，请求将返回 501: {}", key);
        }

        Ok(Self::new(auth, resolver, dispatcher))
    }
}

/// 静态路由表中没有对应处理器的键（按字母序）
pub fn unsupported_static_routes(table: &StaticRouteTable, dispatcher: &Dispatcher) -> Vec<String> {
    table
        .keys()
        .into_iter()
        .filter(|key| {
            table
                .get(key)
                .map_or(false, |route| !dispatcher.supports(&route.route_type))
        })
        .map(str::to_string)
        .collect()
}

/// 构建路由
pub fn build_router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route(
            "/api",
            post(handlers::gateway_api).fallback(|| async { StatusCode::METHOD_NOT_ALLOWED }),
        )
        .fallback(|| async { StatusCode::NOT_FOUND })
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .with_state(state)
}

/// 启动服务
pub async fn serve(config: GatewayConfig, secrets: Secrets) -> Result<(), String> {
    let state = AppState::from_config(&config, secrets)?;
    tracing::info!(
        "[SERVER] 静态路由 {} 条: {:?}",
        state.resolver.static_table().len(),
        state.resolver.static_table().keys()
    );

    let app = build_router(state, config.server.max_body_bytes);
    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| format!("无法监听 {}: {}", addr, e))?;
    tracing::info!("[SERVER] 网关已启动: http://{}/api", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| format!("服务异常退出: {}", e))
}
