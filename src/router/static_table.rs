//! 静态路由表
//!
//! 启动时从配置加载，之后只读，优先级高于路由存储。

use crate::models::route::Route;
use std::collections::HashMap;

/// 静态路由表
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticRouteTable {
    routes: HashMap<String, Route>,
}

impl StaticRouteTable {
    /// 创建空表
    pub fn new() -> Self {
        Self::default()
    }

    /// 从键值对创建
    pub fn from_routes<I, K>(routes: I) -> Self
    where
        I: IntoIterator<Item = (K, Route)>,
        K: Into<String>,
    {
        Self {
            routes: routes.into_iter().map(|(k, r)| (k.into(), r)).collect(),
        }
    }

    /// 精确匹配查找
    pub fn get(&self, key: &str) -> Option<&Route> {
        self.routes.get(key)
    }

    /// 路由数量
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// 所有键（按字母序）
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.routes.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_lookup() {
        let table = StaticRouteTable::from_routes([
            ("v99/demorest", Route::rest("https://demo.example/rest")),
            ("v1/events", Route::ably("events")),
        ]);

        assert_eq!(table.len(), 2);
        assert!(table.get("v99/demorest").is_some());
        assert!(table.get("v99/DemoRest").is_none());
        assert!(table.get("v99/demorest/").is_none());
        assert_eq!(table.keys(), vec!["v1/events", "v99/demorest"]);
    }

    #[test]
    fn test_empty_table() {
        let table = StaticRouteTable::new();
        assert!(table.is_empty());
        assert!(table.get("v1/anything").is_none());
    }
}
