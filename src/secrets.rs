//! 密钥上下文
//!
//! 启动时一次性捕获的名称 → 值映射，显式传入认证门和后端处理器。

use std::collections::HashMap;
use std::ffi::OsString;
use std::fmt;

/// 入站网关 Token 的固定密钥名
pub const GATEWAY_TOKEN_NAME: &str = "GATEWAY_TOKEN";

/// 只读密钥表
#[derive(Clone, Default)]
pub struct Secrets {
    values: HashMap<String, String>,
}

impl Secrets {
    /// 从进程环境变量捕获，跳过非 UTF-8 的条目
    pub fn from_env() -> Self {
        Self::from_os_pairs(std::env::vars_os())
    }

    /// 从操作系统字符串键值对构建，无法转换为 UTF-8 的条目被忽略
    pub fn from_os_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        Self::from_pairs(
            pairs
                .into_iter()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?))),
        )
    }

    /// 从键值对构建
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let values = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(_, v): &(String, String)| !v.is_empty())
            .collect();
        Self { values }
    }

    /// 按名称获取密钥，空值视为不存在
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// 入站网关 Token
    pub fn gateway_token(&self) -> Option<&str> {
        self.get(GATEWAY_TOKEN_NAME)
    }
}

// 不输出密钥值
impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.values.keys().collect();
        names.sort();
        f.debug_struct("Secrets").field("names", &names).finish()
    }
}
