//! `table_name` 字段注入
//!
//! 路由配置了 `table_name` 时写入负载并覆盖客户端的值；
//! 未配置时删除客户端提供的 `table_name`，防止伪造目标表。

use crate::models::route::Route;
use serde_json::Value;

/// 保留字段名
pub const TABLE_NAME_FIELD: &str = "table_name";

/// 注入结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InjectionOutcome {
    /// 写入了路由的表名
    Injected,
    /// 删除了客户端提供的表名
    Stripped,
    /// 负载无需修改
    Unchanged,
    /// 负载不是对象，跳过
    Skipped,
}

/// 按路由配置注入或删除 `table_name`
pub fn apply_table_name(route: &Route, payload: &mut Value) -> InjectionOutcome {
    let Some(fields) = payload.as_object_mut() else {
        return InjectionOutcome::Skipped;
    };

    match &route.table_name {
        Some(table_name) => {
            fields.insert(
                TABLE_NAME_FIELD.to_string(),
                Value::String(table_name.clone()),
            );
            InjectionOutcome::Injected
        }
        None => {
            if fields.remove(TABLE_NAME_FIELD).is_some() {
                InjectionOutcome::Stripped
            } else {
                InjectionOutcome::Unchanged
            }
        }
    }
}
