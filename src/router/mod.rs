//! 路由系统模块
//!
//! 将 `{version}/{service}` 路由键解析为下游路由配置。
//!
//! 解析顺序：
//! - 静态路由表（启动时从配置加载，精确匹配）
//! - 路由存储（持久化键值存储，失败统一视为未找到）
//!
//! 每次请求都重新解析，不跨请求缓存。

mod resolver;
mod static_table;
mod store;

pub use resolver::{RouteResolver, RouteSource};
pub use static_table::StaticRouteTable;
pub use store::{RouteStore, RouteStoreAdapter, SqliteRouteStore, StoreError};
