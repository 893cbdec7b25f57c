//! 请求校验
//!
//! 依次检查：JSON 解析 → `service` → `payload`，遇到第一个失败即返回。
//! `request_id` 与 `version` 只做默认值填充，不会导致失败。

use crate::error::GatewayError;
use crate::models::envelope::{GatewayRequest, DEFAULT_REQUEST_ID, DEFAULT_VERSION};
use serde_json::{Map, Value};

/// 校验失败结果，携带已解析出的请求 ID 以便构造 nack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    pub request_id: String,
    pub error: GatewayError,
}

/// 解析并校验请求体
pub fn parse_request(body: &[u8]) -> Result<GatewayRequest, ValidationFailure> {
    let value: Value = serde_json::from_slice(body).map_err(|_| ValidationFailure {
        request_id: DEFAULT_REQUEST_ID.to_string(),
        error: GatewayError::InvalidJson,
    })?;

    let mut fields = match value {
        Value::Object(map) => map,
        _ => {
            return Err(ValidationFailure {
                request_id: DEFAULT_REQUEST_ID.to_string(),
                error: GatewayError::InvalidField { field: "service" },
            })
        }
    };

    let request_id = fill_default(&mut fields, "request_id", DEFAULT_REQUEST_ID);
    let fail = |field: &'static str| ValidationFailure {
        request_id: request_id.clone(),
        error: GatewayError::InvalidField { field },
    };

    let Some(service) = fields.get("service").and_then(service_segment) else {
        return Err(fail("service"));
    };

    // 任何 JSON 值（包括 null、{}、0、false）都算存在
    let payload = fields.remove("payload").ok_or_else(|| fail("payload"))?;

    let version = fill_default(&mut fields, "version", DEFAULT_VERSION);
    let request_type = fields
        .get("type")
        .filter(|v| !v.is_null())
        .map(stringify);

    Ok(GatewayRequest {
        request_id,
        version,
        service,
        payload,
        request_type,
        fields,
    })
}

/// 读取字段的字符串形式；缺失或 null 时把默认值写回信封
fn fill_default(fields: &mut Map<String, Value>, key: &str, default: &str) -> String {
    match fields.get(key) {
        None | Some(Value::Null) => {
            fields.insert(key.to_string(), Value::String(default.to_string()));
            default.to_string()
        }
        Some(value) => stringify(value),
    }
}

/// `service` 的路由键片段：非空字符串、非零数字或 `true`
fn service_segment(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> Result<GatewayRequest, ValidationFailure> {
        parse_request(value.to_string().as_bytes())
    }

    #[test]
    fn test_invalid_json() {
        let failure = parse_request(b"{not json").unwrap_err();
        assert_eq!(failure.error, GatewayError::InvalidJson);
        assert_eq!(failure.request_id, "unknown");
    }

    #[test]
    fn test_defaults_applied() {
        let request = parse(json!({"service": "orders", "payload": {}})).unwrap();
        assert_eq!(request.request_id, "unknown");
        assert_eq!(request.version, "v1");
        assert_eq!(request.service, "orders");
        assert_eq!(request.payload, json!({}));
        assert!(request.request_type.is_none());
        let mut keys: Vec<&str> = request.fields.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["request_id", "service", "version"]);
    }

    #[test]
    fn test_missing_service() {
        let failure = parse(json!({"request_id": "r-1", "payload": {}})).unwrap_err();
        assert_eq!(failure.error, GatewayError::InvalidField { field: "service" });
        assert_eq!(failure.request_id, "r-1");
    }

    #[test]
    fn test_empty_service_rejected() {
        for service in [json!(""), json!(null), json!(0), json!(false), json!({}), json!([])] {
            let failure = parse(json!({"service": service, "payload": {}})).unwrap_err();
            assert_eq!(failure.error, GatewayError::InvalidField { field: "service" });
        }
    }

    #[test]
    fn test_missing_payload() {
        let failure = parse(json!({"service": "orders"})).unwrap_err();
        assert_eq!(failure.error, GatewayError::InvalidField { field: "payload" });
    }

    #[test]
    fn test_falsy_payloads_are_present() {
        for payload in [json!({}), json!(0), json!(false), json!(null), json!("")] {
            let request = parse(json!({"service": "orders", "payload": payload.clone()})).unwrap();
            assert_eq!(request.payload, payload);
        }
    }

    #[test]
    fn test_service_checked_before_payload() {
        let failure = parse(json!({})).unwrap_err();
        assert_eq!(failure.error, GatewayError::InvalidField { field: "service" });
    }

    #[test]
    fn test_non_object_body() {
        let failure = parse(json!([1, 2, 3])).unwrap_err();
        assert_eq!(failure.error, GatewayError::InvalidField { field: "service" });
    }

    #[test]
    fn test_type_and_extra_fields_kept() {
        let request = parse(json!({
            "request_id": 42,
            "version": "v2",
            "service": "orders",
            "payload": {"a": 1},
            "type": "GRPC",
            "source": "mobile"
        }))
        .unwrap();

        assert_eq!(request.request_id, "42");
        assert_eq!(request.route_key(), "v2/orders");
        assert_eq!(request.request_type.as_deref(), Some("GRPC"));
        assert_eq!(request.fields.get("source"), Some(&json!("mobile")));
    }

    #[test]
    fn test_scalar_service_forms_key() {
        let request = parse(json!({"service": 7, "payload": {}})).unwrap();
        assert_eq!(request.route_key(), "v1/7");

        let request = parse(json!({"service": true, "payload": {}})).unwrap();
        assert_eq!(request.route_key(), "v1/true");
    }

    #[test]
    fn test_forwarded_envelope_keeps_original_values() {
        let request = parse(json!({
            "request_id": 42,
            "version": 2,
            "service": 7,
            "payload": {"a": 1},
            "type": 5
        }))
        .unwrap();
        assert_eq!(request.request_id, "42");
        assert_eq!(request.route_key(), "2/7");

        let forwarded = serde_json::to_value(&request).unwrap();
        assert_eq!(
            forwarded,
            json!({
                "request_id": 42,
                "version": 2,
                "service": 7,
                "payload": {"a": 1},
                "type": 5
            })
        );
    }

    #[test]
    fn test_forwarded_envelope_fills_defaults() {
        let request = parse(json!({"service": "orders", "payload": {}, "request_id": null})).unwrap();
        let forwarded = serde_json::to_value(&request).unwrap();

        assert_eq!(forwarded["request_id"], "unknown");
        assert_eq!(forwarded["version"], "v1");
        assert!(forwarded.get("type").is_none());
    }
}
