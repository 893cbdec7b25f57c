//! 路由存储适配
//!
//! 包装持久化键值存储：按键返回解析后的路由或 `None`。
//! 存储层错误与解析错误只记录日志，统一视为不存在。

use crate::database::dao::RouteDao;
use crate::database::DbConnection;
use crate::models::route::Route;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// 存储错误
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    /// 数据库错误
    #[error("数据库错误: {0}")]
    Database(String),

    /// 后台任务失败
    #[error("存储任务失败: {0}")]
    Task(String),
}

/// 路由存储 trait
///
/// 只需提供按键读取原始 JSON 值的能力；网关从不写入路由。
#[async_trait]
pub trait RouteStore: Send + Sync {
    /// 读取键对应的原始值
    async fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// 存储名称
    fn name(&self) -> &str;
}

/// SQLite 路由存储
#[derive(Clone)]
pub struct SqliteRouteStore {
    conn: DbConnection,
}

impl SqliteRouteStore {
    /// 创建新的 SQLite 存储
    pub fn new(conn: DbConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl RouteStore for SqliteRouteStore {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        let conn = self.conn.clone();
        let key = key.to_string();
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock();
            RouteDao::get_value(&guard, &key)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
        .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn name(&self) -> &str {
        "sqlite"
    }
}

/// 路由存储适配器
///
/// 未配置存储时直接返回 `None`，不发起查询。
#[derive(Clone, Default)]
pub struct RouteStoreAdapter {
    store: Option<Arc<dyn RouteStore>>,
}

impl RouteStoreAdapter {
    /// 创建适配器
    pub fn new(store: Option<Arc<dyn RouteStore>>) -> Self {
        Self { store }
    }

    /// 未配置存储的适配器
    pub fn unavailable() -> Self {
        Self { store: None }
    }

    /// 是否配置了存储
    pub fn is_available(&self) -> bool {
        self.store.is_some()
    }

    /// 按键获取路由，任何错误都返回 `None`
    pub async fn get(&self, key: &str) -> Option<Route> {
        let store = self.store.as_ref()?;

        let raw = match store.get_raw(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::error!("[ROUTE_STORE] 查询失败: store={} key={} error={}", store.name(), key, e);
                return None;
            }
        };

        match serde_json::from_str::<Route>(&raw) {
            Ok(route) => Some(route),
            Err(e) => {
                tracing::warn!("[ROUTE_STORE] 路由数据无法解析，视为不存在: key={} error={}", key, e);
                None
            }
        }
    }
}

impl std::fmt::Debug for RouteStoreAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteStoreAdapter")
            .field("store", &self.store.as_ref().map(|s| s.name().to_string()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::init_in_memory;
    use crate::models::route::RouteType;

    struct FailingStore;

    #[async_trait]
    impl RouteStore for FailingStore {
        async fn get_raw(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Database("disk I/O error".to_string()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn sqlite_adapter() -> (DbConnection, RouteStoreAdapter) {
        let conn = init_in_memory().unwrap();
        let store: Arc<dyn RouteStore> = Arc::new(SqliteRouteStore::new(conn.clone()));
        (conn, RouteStoreAdapter::new(Some(store)))
    }

    #[tokio::test]
    async fn test_unavailable_store_returns_none() {
        let adapter = RouteStoreAdapter::unavailable();
        assert!(!adapter.is_available());
        assert!(adapter.get("v1/orders").await.is_none());
    }

    #[tokio::test]
    async fn test_sqlite_store_hit() {
        let (conn, adapter) = sqlite_adapter();
        let route = Route::rest("https://backend.example/orders").with_table_name("orders");
        RouteDao::upsert(&conn.lock(), "v1/orders", &route).unwrap();

        assert_eq!(adapter.get("v1/orders").await, Some(route));
        assert!(adapter.get("v1/other").await.is_none());
    }

    #[tokio::test]
    async fn test_malformed_value_is_absent() {
        let (conn, adapter) = sqlite_adapter();
        RouteDao::insert_raw(&conn.lock(), "v1/bad", "{not json").unwrap();
        RouteDao::insert_raw(&conn.lock(), "v1/shape", r#"{"type": "REST", "targetUrl": 5}"#)
            .unwrap();

        assert!(adapter.get("v1/bad").await.is_none());
        assert!(adapter.get("v1/shape").await.is_none());
    }

    #[tokio::test]
    async fn test_value_without_type_is_a_route() {
        let (conn, adapter) = sqlite_adapter();
        RouteDao::insert_raw(&conn.lock(), "v1/events", r#"{"channelName": "events"}"#).unwrap();

        let route = adapter.get("v1/events").await.unwrap();
        assert_eq!(route.route_type, RouteType::default());
        assert_eq!(route.channel_name.as_deref(), Some("events"));
    }

    #[tokio::test]
    async fn test_store_error_is_suppressed() {
        let adapter = RouteStoreAdapter::new(Some(Arc::new(FailingStore)));
        assert!(adapter.get("v1/orders").await.is_none());
    }
}
