//! 事件数据模型
//!
//! 元数据记录（轻量事件存根）、详情记录（完整事件体）与请求/响应配对

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::ser::SerializeTuple;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// 元数据记录
///
/// `request_id` 存在且非空时，表示本记录是该 ID 对应请求的响应。
/// 其余字段原样保留，供前端展示
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MetadataRecord {
    #[cfg(test)]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            request_id: None,
            extra: Map::new(),
        }
    }

    #[cfg(test)]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// 有效的关联请求 ID（空字符串视为未设置）
    pub fn linked_request_id(&self) -> Option<&str> {
        self.request_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// 事件时间（保留上游原始值，按需解析）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventDate(pub Value);

impl EventDate {
    /// 解析为 UTC 时间，无法解析时返回 None
    ///
    /// 支持 RFC3339、带数字时区偏移、无时区（按 UTC 处理）、纯日期以及毫秒时间戳
    pub fn parse(&self) -> Option<DateTime<Utc>> {
        match &self.0 {
            Value::String(s) => parse_date_str(s.trim()),
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.round() as i64))
                .and_then(DateTime::from_timestamp_millis),
            _ => None,
        }
    }
}

fn parse_date_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// 事件详情记录
///
/// `event_id` 与 [`MetadataRecord::id`] 对应。未识别的字段原样保留
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub event_id: String,
    #[serde(default)]
    pub event_date: EventDate,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_status")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<i64>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// 通常为字符串数组，其他形态原样透传
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Value>,
    /// 字符串（可能是 JSON 文本）或对象
    #[serde(default)]
    pub entity: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
impl DetailRecord {
    pub fn new(event_id: impl Into<String>, event_date: impl Into<Value>) -> Self {
        Self {
            event_id: event_id.into(),
            event_date: EventDate(event_date.into()),
            event_type: None,
            status: None,
            uri: None,
            headers: None,
            entity: Value::Null,
            extra: Map::new(),
        }
    }
}

/// 请求/响应配对
///
/// 至少一侧非空；单侧为空表示未匹配的孤立记录。
/// 序列化为两元素数组 `[request, response]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationPair {
    request: Option<String>,
    response: Option<String>,
}

impl CorrelationPair {
    /// 构建配对，两侧均为空时返回 None
    pub fn new(request: Option<String>, response: Option<String>) -> Option<Self> {
        if request.is_none() && response.is_none() {
            return None;
        }
        Some(Self { request, response })
    }

    pub fn request(&self) -> Option<&str> {
        self.request.as_deref()
    }

    pub fn response(&self) -> Option<&str> {
        self.response.as_deref()
    }

    /// 按顺序返回两侧非空的 ID
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.request().into_iter().chain(self.response())
    }
}

impl Serialize for CorrelationPair {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.request)?;
        tuple.serialize_element(&self.response)?;
        tuple.end()
    }
}

/// 上游的 ID 字段偶尔是数字，统一转为字符串
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "期望字符串或数字，实际为 {}",
            other
        ))),
    }
}

fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// 状态码容错解析：数字或数字字符串，其它情况视为缺失
fn lenient_status<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_metadata_keeps_unknown_fields() {
        let meta: MetadataRecord = serde_json::from_value(json!({
            "id": "evt-1",
            "requestId": "evt-0",
            "source": "gateway",
            "tags": ["a", "b"]
        }))
        .unwrap();

        assert_eq!(meta.id, "evt-1");
        assert_eq!(meta.linked_request_id(), Some("evt-0"));
        assert_eq!(meta.extra.get("source"), Some(&json!("gateway")));

        let back = serde_json::to_value(&meta).unwrap();
        assert_eq!(back["requestId"], "evt-0");
        assert_eq!(back["tags"], json!(["a", "b"]));
    }

    #[test]
    fn test_metadata_empty_or_null_request_id_is_unlinked() {
        let empty: MetadataRecord =
            serde_json::from_value(json!({"id": "a", "requestId": ""})).unwrap();
        assert_eq!(empty.linked_request_id(), None);

        let null: MetadataRecord =
            serde_json::from_value(json!({"id": "a", "requestId": null})).unwrap();
        assert_eq!(null.linked_request_id(), None);
    }

    #[test]
    fn test_metadata_numeric_id() {
        let meta: MetadataRecord = serde_json::from_value(json!({"id": 42})).unwrap();
        assert_eq!(meta.id, "42");
    }

    #[test]
    fn test_metadata_missing_id_rejected() {
        let result = serde_json::from_value::<MetadataRecord>(json!({"requestId": "x"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_detail_tolerates_malformed_fields() {
        let detail: DetailRecord = serde_json::from_value(json!({
            "eventId": "e1",
            "eventDate": "not a date",
            "eventType": "HTTP_REQUEST",
            "status": "201",
            "headers": "Content-Type: text/plain",
            "entity": {"ok": true},
            "traceId": "t-1"
        }))
        .unwrap();

        assert_eq!(detail.status, Some(201));
        assert_eq!(detail.event_date.parse(), None);
        assert_eq!(detail.headers, Some(json!("Content-Type: text/plain")));
        assert_eq!(detail.entity, json!({"ok": true}));
        assert_eq!(detail.extra.get("traceId"), Some(&json!("t-1")));
    }

    #[test]
    fn test_detail_serializes_camel_case() {
        let mut detail = DetailRecord::new("e1", "2024-05-01T10:00:00Z");
        detail.event_type = Some("HTTP_RESPONSE".to_string());
        detail.status = Some(200);

        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(value["eventId"], "e1");
        assert_eq!(value["eventDate"], "2024-05-01T10:00:00Z");
        assert_eq!(value["eventType"], "HTTP_RESPONSE");
        assert_eq!(value["status"], 200);
        assert!(value.get("uri").is_none());
    }

    #[test]
    fn test_event_date_formats() {
        let expected = "2024-03-01T12:30:00Z".parse::<DateTime<Utc>>().unwrap();

        let cases = [
            json!("2024-03-01T12:30:00Z"),
            json!("2024-03-01T14:30:00+02:00"),
            json!("2024-03-01T12:30:00.000+0000"),
            json!("2024-03-01T12:30:00"),
            json!("2024-03-01 12:30:00"),
            json!(expected.timestamp_millis()),
        ];
        for raw in cases {
            assert_eq!(EventDate(raw.clone()).parse(), Some(expected), "{}", raw);
        }

        let day = EventDate(json!("2024-03-01")).parse().unwrap();
        assert_eq!(day.to_rfc3339(), "2024-03-01T00:00:00+00:00");
    }

    #[test]
    fn test_event_date_fractional_millis() {
        let expected = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
        assert_eq!(EventDate(json!(1.7e12)).parse(), Some(expected));
        assert_eq!(EventDate(json!(1_700_000_000_000.4)).parse(), Some(expected));
    }

    #[test]
    fn test_event_date_unparsable() {
        assert_eq!(EventDate(Value::Null).parse(), None);
        assert_eq!(EventDate(json!("yesterday")).parse(), None);
        assert_eq!(EventDate(json!({"date": 1})).parse(), None);
    }

    #[test]
    fn test_pair_rejects_double_null() {
        assert!(CorrelationPair::new(None, None).is_none());
        assert!(CorrelationPair::new(Some("a".into()), None).is_some());
        assert!(CorrelationPair::new(None, Some("b".into())).is_some());
    }

    #[test]
    fn test_pair_serializes_as_array() {
        let pair = CorrelationPair::new(Some("a".into()), None).unwrap();
        assert_eq!(serde_json::to_value(&pair).unwrap(), json!(["a", null]));

        let both = CorrelationPair::new(Some("a".into()), Some("b".into())).unwrap();
        let ids: Vec<&str> = both.ids().collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
