//! 数据模型
//!
//! - `route`：路由配置与路由类型
//! - `envelope`：入站请求信封与响应信封

pub mod envelope;
pub mod route;

pub use envelope::{AckEnvelope, AckType, DispatchEnvelope, GatewayRequest};
pub use route::{route_key, Route, RouteType};
