//! 网关 API 端点
//!
//! `POST /api`：认证 → 解析信封 → 解析路由 → 分发。

use crate::error::GatewayError;
use crate::models::envelope::DEFAULT_REQUEST_ID;
use crate::server::AppState;
use crate::validator::parse_request;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap},
    response::Response,
};

/// POST /api - 网关入口
pub async fn gateway_api(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let trace_id = uuid::Uuid::new_v4().to_string();

    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    if let Err(e) = state.auth.authenticate(authorization) {
        e.log_with_context(&trace_id, DEFAULT_REQUEST_ID);
        return e.to_response(DEFAULT_REQUEST_ID);
    }

    let request = match parse_request(&body) {
        Ok(request) => request,
        Err(failure) => {
            failure
                .error
                .log_with_context(&trace_id, &failure.request_id);
            return failure.error.to_response(&failure.request_id);
        }
    };

    let key = request.route_key();
    let Some((route, source)) = state.resolver.resolve_with_source(&key).await else {
        let e = GatewayError::NoRoute { key };
        e.log_with_context(&trace_id, &request.request_id);
        return e.to_response(&request.request_id);
    };

    tracing::info!(
        trace_id = %trace_id,
        request_id = %request.request_id,
        "[GATEWAY] 路由解析成功: key={} type={} source={:?}",
        key,
        route.route_type,
        source
    );

    let response = state.dispatcher.dispatch(&route, request).await;
    tracing::info!(
        trace_id = %trace_id,
        "[GATEWAY] 请求完成: key={} status={}",
        key,
        response.status().as_u16()
    );
    response
}
