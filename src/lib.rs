//! gatecast：带认证的 JSON 网关
//!
//! 单一入口 `POST /api` 接收请求信封，按 `{version}/{service}` 解析路由，
//! 将请求转发到 REST 后端或发布到消息总线频道。

pub mod auth;
pub mod client;
pub mod config;
pub mod database;
pub mod dispatch;
pub mod error;
pub mod logger;
pub mod models;
pub mod router;
pub mod secrets;
pub mod server;
pub mod validator;

#[cfg(test)]
mod test_support;

pub use config::{load_config, GatewayConfig};
pub use error::GatewayError;
pub use secrets::Secrets;
pub use server::{build_router, serve, AppState};
