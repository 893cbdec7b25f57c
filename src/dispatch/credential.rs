//! 出站凭证解析

use crate::models::route::Route;
use crate::secrets::Secrets;

/// 解析路由的出站凭证
///
/// 非空的 `token` 优先；否则按 `authKeyEnvName` 从密钥表读取；都没有则返回 `None`。
pub fn resolve_credential<'a>(route: &'a Route, secrets: &'a Secrets) -> Option<&'a str> {
    if let Some(token) = route.token.as_deref().filter(|t| !t.is_empty()) {
        return Some(token);
    }
    route
        .auth_key_env_name
        .as_deref()
        .and_then(|name| secrets.get(name))
}
