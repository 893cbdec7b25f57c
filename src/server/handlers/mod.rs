//! HTTP 请求处理器

mod gateway_api;

pub use gateway_api::gateway_api;
