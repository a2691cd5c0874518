//! 레코드 정규화기
//!
//! [`RawLogEntry`]를 수집 엔드포인트 형식의 [`LogRecord`]로 변환합니다.
//!
//! # 처리 순서
//! 1. 기본값: 수신 시각, `info`, 원본 본문, 라벨/이미지 기반 `service.name`, 환경 태그
//! 2. 본문이 JSON 객체이면 표준 키로 기본값을 덮어쓰고 나머지 키는 attributes로 복사
//! 3. JSON 객체가 아니면 본문에서 레벨 키워드를 탐색
//!
//! 정규화는 실패하지 않습니다. 표준 키의 타입이 맞지 않으면 해당 키가 없는 것으로 취급합니다.
//!
//! # 사용 예시
//! ```ignore
//! use logship_log_pipeline::config::AdapterConfig;
//! use logship_log_pipeline::normalizer::normalize;
//!
//! let record = normalize(&entry, &AdapterConfig::default());
//! assert_eq!(record.severity_text, "info");
//! ```

use std::collections::BTreeMap;

use chrono::DateTime;
use serde_json::{Map, Value};

use logship_core::types::{
    COMPOSE_SERVICE_LABEL, LogRecord, RESOURCE_DEPLOYMENT_ENVIRONMENT, RESOURCE_NAMESPACE,
    RESOURCE_SERVICE_NAME, RawLogEntry,
};

use crate::config::AdapterConfig;
use crate::severity::{Severity, classify, scan};

/// 특별 처리되어 attributes에 들어가지 않는 JSON 키
pub const RESERVED_KEYS: [&str; 7] = [
    "timestamp",
    "level",
    "message",
    "service",
    "namespace",
    "env",
    "environment",
];

/// 엔트리를 정규화합니다.
pub fn normalize(entry: &RawLogEntry, config: &AdapterConfig) -> LogRecord {
    let mut severity = Severity::info();
    let mut timestamp = entry.received_at.timestamp();
    let mut message = entry.data.clone();
    let mut attributes = BTreeMap::new();
    let mut resources = BTreeMap::new();

    let service_name = entry
        .container
        .label(COMPOSE_SERVICE_LABEL)
        .unwrap_or(entry.container.image.as_str());
    resources.insert(RESOURCE_SERVICE_NAME.to_owned(), service_name.to_owned());

    if !config.environment.is_empty() {
        resources.insert(
            RESOURCE_DEPLOYMENT_ENVIRONMENT.to_owned(),
            config.environment.clone(),
        );
    }

    let object = if config.auto_parse_json {
        parse_object(&entry.data)
    } else {
        None
    };

    match object {
        Some(object) => {
            if let Some(ts) = string_field(&object, "timestamp")
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            {
                timestamp = ts.timestamp();
            }
            if let Some(level) = string_field(&object, "level") {
                severity = classify(level);
            }
            if let Some(text) = string_field(&object, "message") {
                message = text.to_owned();
            }
            // environment가 env보다 우선
            for key in ["env", "environment"] {
                if let Some(env) = string_field(&object, key) {
                    resources.insert(RESOURCE_DEPLOYMENT_ENVIRONMENT.to_owned(), env.to_owned());
                }
            }
            if let Some(service) = string_field(&object, "service") {
                resources.insert(RESOURCE_SERVICE_NAME.to_owned(), service.to_owned());
            }
            if let Some(namespace) = string_field(&object, "namespace") {
                resources.insert(RESOURCE_NAMESPACE.to_owned(), namespace.to_owned());
            }

            for (key, value) in object {
                if RESERVED_KEYS.contains(&key.as_str()) {
                    continue;
                }
                attributes.insert(key, stringify(value));
            }
        }
        None if config.auto_log_level_string_match => {
            if let Some(found) = scan(&entry.data) {
                severity = found;
            }
        }
        None => {}
    }

    LogRecord {
        timestamp,
        severity_text: severity.text,
        severity_number: severity.number,
        attributes,
        resources,
        message,
    }
}

/// 본문이 JSON 객체일 때만 파싱 결과를 반환합니다.
fn parse_object(data: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(data) {
        Ok(Value::Object(object)) => Some(object),
        _ => None,
    }
}

fn string_field<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    object.get(key).and_then(Value::as_str)
}

fn stringify(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}
