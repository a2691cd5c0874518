//! logship.toml 통합 설정 테스트
//!
//! - logship.toml.example 파싱 테스트
//! - 부분 설정 (일부 섹션만) 로딩 테스트
//! - 환경변수 우선순위 테스트
//! - 빈 파일 / 잘못된 형식 에러 테스트

use logship_core::config::LogshipConfig;
use logship_core::error::{ConfigError, LogshipError};

const EXAMPLE: &str = include_str!("../../../logship.toml.example");

// =============================================================================
// logship.toml.example 파싱 테스트
// =============================================================================

#[test]
fn example_config_parses_successfully() {
    let config = LogshipConfig::parse(EXAMPLE).expect("example config should parse");

    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.general.log_format, "json");
}

#[test]
fn example_config_passes_validation() {
    let config = LogshipConfig::parse(EXAMPLE).expect("should parse");
    config
        .validate()
        .expect("example config should pass validation");
}

#[test]
fn example_config_matches_code_defaults() {
    let example = LogshipConfig::parse(EXAMPLE).expect("should parse");
    let defaults = LogshipConfig::default();

    assert_eq!(example.adapter.auto_parse_json, defaults.adapter.auto_parse_json);
    assert_eq!(
        example.adapter.auto_log_level_string_match,
        defaults.adapter.auto_log_level_string_match
    );
    assert_eq!(example.adapter.environment, defaults.adapter.environment);
    assert_eq!(example.adapter.channel_capacity, defaults.adapter.channel_capacity);
    assert_eq!(example.filter.name, defaults.filter.name);
    assert_eq!(example.filter.labels, defaults.filter.labels);
    assert_eq!(example.delivery.endpoint, defaults.delivery.endpoint);
    assert_eq!(example.delivery.timeout_secs, defaults.delivery.timeout_secs);
    assert_eq!(
        example.delivery.flush_interval_ms,
        defaults.delivery.flush_interval_ms
    );
    assert_eq!(example.metrics.enabled, defaults.metrics.enabled);
    assert_eq!(example.metrics.port, defaults.metrics.port);
}

// =============================================================================
// 부분 설정 테스트
// =============================================================================

#[test]
fn partial_config_filter_only() {
    let toml = r#"
[filter]
name = "*_db"
sources = "stdout"
labels = "com.example.tier:back*"
"#;
    let config = LogshipConfig::parse(toml).expect("should parse");
    config.validate().expect("should validate");

    assert_eq!(config.filter.name, "*_db");
    assert_eq!(config.filter.sources, "stdout");
    assert_eq!(config.filter.labels, "com.example.tier:back*");
    // 다른 섹션은 기본값
    assert_eq!(config.delivery.endpoint, "http://localhost:8082");
    assert!(config.adapter.auto_parse_json);
}

#[test]
fn partial_config_delivery_only() {
    let toml = r#"
[delivery]
endpoint = "https://collector.internal:4318/logs"
flush_interval_ms = 1000
"#;
    let config = LogshipConfig::parse(toml).expect("should parse");
    config.validate().expect("should validate");

    assert_eq!(config.delivery.endpoint, "https://collector.internal:4318/logs");
    assert_eq!(config.delivery.flush_interval_ms, 1000);
    assert_eq!(config.delivery.timeout_secs, 10);
}

#[test]
fn partial_config_adapter_disables_parsing() {
    let toml = r#"
[adapter]
auto_parse_json = false
auto_log_level_string_match = false
environment = "qa"
"#;
    let config = LogshipConfig::parse(toml).expect("should parse");

    assert!(!config.adapter.auto_parse_json);
    assert!(!config.adapter.auto_log_level_string_match);
    assert_eq!(config.adapter.environment, "qa");
}

// =============================================================================
// 환경변수 우선순위 테스트
// =============================================================================

#[test]
#[serial_test::serial]
fn env_override_takes_precedence_over_toml() {
    let toml = r#"
[delivery]
endpoint = "http://from-file:8082"
"#;

    let original = std::env::var("LOGSHIP_DELIVERY_ENDPOINT").ok();
    // SAFETY: serial 테스트에서만 환경변수를 조작합니다.
    unsafe {
        std::env::set_var("LOGSHIP_DELIVERY_ENDPOINT", "http://from-env:8082");
    }

    let mut config = LogshipConfig::parse(toml).expect("should parse");
    config.apply_env_overrides();
    let result = config.delivery.endpoint.clone();

    // SAFETY: 테스트 정리
    unsafe {
        match original {
            Some(val) => std::env::set_var("LOGSHIP_DELIVERY_ENDPOINT", val),
            None => std::env::remove_var("LOGSHIP_DELIVERY_ENDPOINT"),
        }
    }

    assert_eq!(result, "http://from-env:8082");
}

#[test]
#[serial_test::serial]
fn legacy_endpoint_overrides_toml() {
    let toml = r#"
[delivery]
endpoint = "http://from-file:8082"
"#;

    // SAFETY: serial 테스트에서만 환경변수를 조작합니다.
    unsafe {
        std::env::set_var("SIGNOZ_LOG_ENDPOINT", "http://legacy:8082");
    }

    let mut config = LogshipConfig::parse(toml).expect("should parse");
    config.apply_env_overrides();

    // SAFETY: 테스트 정리
    unsafe {
        std::env::remove_var("SIGNOZ_LOG_ENDPOINT");
    }

    assert_eq!(config.delivery.endpoint, "http://legacy:8082");
}

#[test]
#[serial_test::serial]
fn legacy_disable_flag_only_needs_presence() {
    // SAFETY: serial 테스트에서만 환경변수를 조작합니다.
    unsafe {
        std::env::set_var("DISABLE_LOG_LEVEL_STRING_MATCH", "false");
    }

    let mut config = LogshipConfig::default();
    config.apply_env_overrides();

    // SAFETY: 테스트 정리
    unsafe {
        std::env::remove_var("DISABLE_LOG_LEVEL_STRING_MATCH");
    }

    // 값과 무관하게 존재만으로 비활성화
    assert!(!config.adapter.auto_log_level_string_match);
    assert!(config.adapter.auto_parse_json);
}

#[test]
#[serial_test::serial]
fn env_override_numeric_field() {
    // SAFETY: serial 테스트에서만 환경변수를 조작합니다.
    unsafe {
        std::env::set_var("LOGSHIP_METRICS_PORT", "19464");
        std::env::set_var("LOGSHIP_DELIVERY_TIMEOUT_SECS", "not-a-number");
    }

    let mut config = LogshipConfig::default();
    config.apply_env_overrides();

    // SAFETY: 테스트 정리
    unsafe {
        std::env::remove_var("LOGSHIP_METRICS_PORT");
        std::env::remove_var("LOGSHIP_DELIVERY_TIMEOUT_SECS");
    }

    assert_eq!(config.metrics.port, 19464);
    // 파싱 실패 시 원래 값 유지
    assert_eq!(config.delivery.timeout_secs, 10);
}

// =============================================================================
// 에러 케이스
// =============================================================================

#[test]
fn empty_string_parses_with_defaults() {
    let config = LogshipConfig::parse("").expect("empty should parse");
    config.validate().expect("defaults should validate");
}

#[test]
fn comments_only_parses_with_defaults() {
    let config = LogshipConfig::parse("# nothing here\n# at all\n").expect("should parse");
    assert_eq!(config.delivery.flush_interval_ms, 5000);
}

#[test]
fn malformed_toml_returns_parse_error() {
    let result = LogshipConfig::parse("[delivery\nendpoint = ");
    assert!(matches!(
        result,
        Err(LogshipError::Config(ConfigError::ParseFailed { .. }))
    ));
}

#[test]
fn wrong_type_for_numeric_field() {
    let toml = r#"
[delivery]
timeout_secs = "ten"
"#;
    assert!(LogshipConfig::parse(toml).is_err());
}

#[test]
fn unknown_section_is_ignored() {
    let toml = r#"
[unknown_section]
key = "value"

[general]
log_level = "debug"
"#;
    let config = LogshipConfig::parse(toml).expect("unknown section should be ignored");
    assert_eq!(config.general.log_level, "debug");
}

#[test]
fn invalid_label_rule_fails_validation() {
    let toml = r#"
[filter]
labels = "tier"
"#;
    let config = LogshipConfig::parse(toml).expect("should parse");
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("filter.labels"));
}

#[tokio::test]
async fn from_file_nonexistent_returns_file_not_found() {
    let result = LogshipConfig::from_file("/tmp/logship_test_nonexistent_12345.toml").await;
    assert!(matches!(
        result,
        Err(LogshipError::Config(ConfigError::FileNotFound { .. }))
    ));
}

#[tokio::test]
#[serial_test::serial]
async fn load_example_config_from_disk() {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let example_path = format!("{}/../../logship.toml.example", manifest_dir);

    let config = LogshipConfig::load(&example_path)
        .await
        .expect("example config should load");
    assert_eq!(config.general.log_level, "info");
}
