//! 路由解析器
//!
//! 先查静态路由表（精确匹配），未命中再查路由存储。
//! 静态表总是优先，不做合并或覆盖。

use super::static_table::StaticRouteTable;
use super::store::RouteStoreAdapter;
use crate::models::route::Route;
use std::sync::Arc;

/// 路由来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteSource {
    /// 静态路由表
    Static,
    /// 路由存储
    Store,
}

/// 路由解析器
#[derive(Debug, Clone)]
pub struct RouteResolver {
    static_table: Arc<StaticRouteTable>,
    store: RouteStoreAdapter,
}

impl RouteResolver {
    /// 创建新的路由解析器
    pub fn new(static_table: Arc<StaticRouteTable>, store: RouteStoreAdapter) -> Self {
        Self {
            static_table,
            store,
        }
    }

    /// 解析路由键
    ///
    /// 存储中不存在与数据损坏对调用方不做区分，均返回 `None`。
    pub async fn resolve(&self, key: &str) -> Option<Route> {
        self.resolve_with_source(key).await.map(|(route, _)| route)
    }

    /// 解析路由键并返回来源
    pub async fn resolve_with_source(&self, key: &str) -> Option<(Route, RouteSource)> {
        if let Some(route) = self.static_table.get(key) {
            tracing::debug!("[ROUTER] 静态路由命中: {}", key);
            return Some((route.clone(), RouteSource::Static));
        }

        let route = self.store.get(key).await?;
        tracing::debug!("[ROUTER] 存储路由命中: {}", key);
        Some((route, RouteSource::Store))
    }

    /// 静态路由表
    pub fn static_table(&self) -> &StaticRouteTable {
        &self.static_table
    }
}
