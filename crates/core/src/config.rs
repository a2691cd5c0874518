//! 설정 관리 -- logship.toml 파싱 및 런타임 설정
//!
//! [`LogshipConfig`]는 모든 모듈의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. 환경변수 (`LOGSHIP_DELIVERY_ENDPOINT=...` 형식, 최고 우선)
//! 2. 레거시 환경변수 (`DISABLE_JSON_PARSE`, `ENV`, `SIGNOZ_LOG_ENDPOINT` 등)
//! 3. 설정 파일 (`logship.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), logship_core::error::LogshipError> {
//! use logship_core::config::LogshipConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = LogshipConfig::load("logship.toml").await?;
//!
//! // 파일 없이 기본값 + 환경변수
//! let config = LogshipConfig::from_env()?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, LogshipError};

/// 기본 전송 엔드포인트
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8082";

/// logship 통합 설정
///
/// `logship.toml` 파일의 최상위 구조를 나타냅니다.
/// 각 모듈은 자기 섹션만 읽어 사용합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogshipConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 정규화 어댑터 설정
    #[serde(default)]
    pub adapter: AdapterSection,
    /// 라우트 필터 설정
    #[serde(default)]
    pub filter: FilterSection,
    /// 전송 설정
    #[serde(default)]
    pub delivery: DeliveryConfig,
    /// 메트릭 노출 설정
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl LogshipConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, LogshipError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 기본값에 환경변수 오버라이드만 적용합니다.
    pub fn from_env() -> Result<Self, LogshipError> {
        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, LogshipError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LogshipError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                LogshipError::Io(e)
            }
        })?;
        Self::parse(&content)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, LogshipError> {
        toml::from_str(toml_str).map_err(|e| {
            LogshipError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 레거시 변수를 먼저 적용하고, 그 위에 `LOGSHIP_{SECTION}_{FIELD}` 변수를 적용합니다.
    pub fn apply_env_overrides(&mut self) {
        // Legacy adapter variables
        if std::env::var_os("DISABLE_JSON_PARSE").is_some() {
            self.adapter.auto_parse_json = false;
        }
        if std::env::var_os("DISABLE_LOG_LEVEL_STRING_MATCH").is_some() {
            self.adapter.auto_log_level_string_match = false;
        }
        override_string(&mut self.adapter.environment, "ENV");
        if let Ok(endpoint) = std::env::var("SIGNOZ_LOG_ENDPOINT") {
            if !endpoint.is_empty() {
                self.delivery.endpoint = endpoint;
            }
        }

        // General
        override_string(&mut self.general.log_level, "LOGSHIP_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "LOGSHIP_GENERAL_LOG_FORMAT");

        // Adapter
        override_bool(
            &mut self.adapter.auto_parse_json,
            "LOGSHIP_ADAPTER_AUTO_PARSE_JSON",
        );
        override_bool(
            &mut self.adapter.auto_log_level_string_match,
            "LOGSHIP_ADAPTER_AUTO_LOG_LEVEL_STRING_MATCH",
        );
        override_string(
            &mut self.adapter.environment,
            "LOGSHIP_ADAPTER_ENVIRONMENT",
        );
        override_usize(
            &mut self.adapter.channel_capacity,
            "LOGSHIP_ADAPTER_CHANNEL_CAPACITY",
        );

        // Filter
        override_string(&mut self.filter.id, "LOGSHIP_FILTER_ID");
        override_string(&mut self.filter.name, "LOGSHIP_FILTER_NAME");
        override_string(&mut self.filter.sources, "LOGSHIP_FILTER_SOURCES");
        override_string(&mut self.filter.labels, "LOGSHIP_FILTER_LABELS");

        // Delivery
        override_string(&mut self.delivery.endpoint, "LOGSHIP_DELIVERY_ENDPOINT");
        override_u64(
            &mut self.delivery.timeout_secs,
            "LOGSHIP_DELIVERY_TIMEOUT_SECS",
        );
        override_u64(
            &mut self.delivery.flush_interval_ms,
            "LOGSHIP_DELIVERY_FLUSH_INTERVAL_MS",
        );

        // Metrics
        override_bool(&mut self.metrics.enabled, "LOGSHIP_METRICS_ENABLED");
        override_string(&mut self.metrics.listen_addr, "LOGSHIP_METRICS_LISTEN_ADDR");
        override_u16(&mut self.metrics.port, "LOGSHIP_METRICS_PORT");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), LogshipError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        if self.adapter.channel_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "adapter.channel_capacity".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }

        // 라벨 규칙 형식 검증 (key:pattern)
        parse_label_rules(&self.filter.labels)?;

        self.delivery.validate()?;
        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
        }
    }
}

/// 정규화 어댑터 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterSection {
    /// 본문을 JSON 객체로 해석할지 여부
    pub auto_parse_json: bool,
    /// JSON이 아닐 때 레벨 키워드 부분 문자열 매칭 여부
    pub auto_log_level_string_match: bool,
    /// `deployment.environment` 태그 (빈 문자열이면 설정 안 함)
    pub environment: String,
    /// 입력 채널 용량
    pub channel_capacity: usize,
}

impl Default for AdapterSection {
    fn default() -> Self {
        Self {
            auto_parse_json: true,
            auto_log_level_string_match: true,
            environment: String::new(),
            channel_capacity: 1024,
        }
    }
}

/// 라우트 필터 설정
///
/// 호스트 라우트 옵션(`filter.id`, `filter.name`, `filter.sources`, `filter.labels`)과
/// 같은 의미입니다. 빈 문자열은 규칙 미설정을 뜻합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSection {
    /// 컨테이너 ID 일치
    pub id: String,
    /// 컨테이너 이름 glob (`*_db`, `web_*`)
    pub name: String,
    /// 허용 스트림 목록 (쉼표 구분)
    pub sources: String,
    /// 라벨 규칙 목록 (쉼표 구분 `key:pattern`)
    pub labels: String,
}

/// 전송 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliveryConfig {
    /// 수집 엔드포인트 URL
    pub endpoint: String,
    /// 전송 1회 타임아웃 (초)
    pub timeout_secs: u64,
    /// 버퍼 플러시 간격 (밀리초)
    pub flush_interval_ms: u64,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            timeout_secs: 10,
            flush_interval_ms: 5_000,
        }
    }
}

impl DeliveryConfig {
    /// 전송 설정을 검증합니다.
    pub fn validate(&self) -> Result<(), ConfigError> {
        const MAX_FLUSH_INTERVAL_MS: u64 = 3_600_000; // 1 hour

        if self.endpoint.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "delivery.endpoint".to_owned(),
                reason: "must not be empty".to_owned(),
            });
        }

        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                field: "delivery.endpoint".to_owned(),
                reason: format!("'{}' must start with http:// or https://", self.endpoint),
            });
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "delivery.timeout_secs".to_owned(),
                reason: "must be greater than 0".to_owned(),
            });
        }

        if self.flush_interval_ms == 0 || self.flush_interval_ms > MAX_FLUSH_INTERVAL_MS {
            return Err(ConfigError::InvalidValue {
                field: "delivery.flush_interval_ms".to_owned(),
                reason: format!("must be 1-{}", MAX_FLUSH_INTERVAL_MS),
            });
        }

        Ok(())
    }
}

/// 메트릭 노출 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Prometheus 엔드포인트 활성화 여부
    pub enabled: bool,
    /// 바인드 주소
    pub listen_addr: String,
    /// 포트
    pub port: u16,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            listen_addr: "127.0.0.1".to_owned(),
            port: 9464,
        }
    }
}

/// 쉼표로 구분된 목록을 파싱합니다. 공백은 제거하고 빈 항목은 버립니다.
pub fn parse_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

/// 쉼표로 구분된 `key:pattern` 목록을 파싱합니다.
///
/// 패턴에는 `:`가 포함될 수 있으며 첫 번째 `:`만 구분자로 사용합니다.
pub fn parse_label_rules(value: &str) -> Result<Vec<(String, String)>, ConfigError> {
    parse_csv(value)
        .into_iter()
        .map(|pair| match pair.split_once(':') {
            Some((key, pattern)) if !key.trim().is_empty() => {
                Ok((key.trim().to_owned(), pattern.trim().to_owned()))
            }
            _ => Err(ConfigError::InvalidValue {
                field: "filter.labels".to_owned(),
                reason: format!("'{}' must be in key:pattern form", pair),
            }),
        })
        .collect()
}

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

fn override_u16(target: &mut u16, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u16>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u16 from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}
