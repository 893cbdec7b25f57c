//! 日志管理模块
use once_cell::sync::Lazy;
use regex::Regex;
use std::str::FromStr;
use tracing::Level;

/// 初始化全局日志订阅器
///
/// 无法识别的级别回退为 `info`；重复初始化时忽略。
pub fn init_logging(level: &str) {
    let max_level = Level::from_str(level.trim()).unwrap_or(Level::INFO);
    let _ = tracing_subscriber::fmt()
        .with_max_level(max_level)
        .with_target(false)
        .try_init();
}

/// 脱敏规则：凭证类字段与认证头
static SANITIZE_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        // Bearer token
        (r"Bearer\s+[A-Za-z0-9._~+/=:-]+", "Bearer ***"),
        // Basic 认证
        (r"Basic\s+[A-Za-z0-9+/=]+", "Basic ***"),
        // API key 各种格式
        (
            r#"api[_-]?key["']?\s*[:=]\s*["']?[A-Za-z0-9._:-]+"#,
            "api_key: ***",
        ),
        // 通用 token
        (r#"token["']?\s*[:=]\s*["']?[A-Za-z0-9._:-]+"#, "token: ***"),
        // authorization header
        (
            r#"[Aa]uthorization["']?\s*[:=]\s*["']?[A-Za-z0-9._\s-]+"#,
            "authorization: ***",
        ),
        // password
        (r#"password["']?\s*[:=]\s*["']?[^\s"',}]+"#, "password: ***"),
        // secret
        (
            r#"secret["']?\s*[:=]\s*["']?[A-Za-z0-9._-]+"#,
            "secret: ***",
        ),
    ]
    .into_iter()
    .filter_map(|(pattern, replacement)| Regex::new(pattern).ok().map(|re| (re, replacement)))
    .collect()
});

/// 日志脱敏，覆盖认证头与常见凭证字段
pub fn sanitize_log_message(message: &str) -> String {
    let mut sanitized = message.to_string();
    for (re, replacement) in SANITIZE_PATTERNS.iter() {
        sanitized = re.replace_all(&sanitized, *replacement).to_string();
    }
    sanitized
}
