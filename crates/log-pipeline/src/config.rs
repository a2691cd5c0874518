//! 로그 파이프라인 설정
//!
//! [`PipelineConfig`]는 core의 [`LogshipConfig`]를
//! 기반으로 파이프라인 전용 설정을 제공합니다. 생성 시 한 번 읽고 이후에는 변경하지 않습니다.
//!
//! # 사용 예시
//! ```ignore
//! use logship_core::config::LogshipConfig;
//! use logship_log_pipeline::config::PipelineConfig;
//!
//! let core_config = LogshipConfig::default();
//! let config = PipelineConfig::from_core(&core_config)?;
//! ```

use std::time::Duration;

use logship_core::config::{DEFAULT_ENDPOINT, LogshipConfig};

use crate::error::LogPipelineError;
use crate::filter::FilterRules;

/// 정규화 어댑터 설정
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterConfig {
    /// 본문을 JSON 객체로 해석할지 여부
    pub auto_parse_json: bool,
    /// JSON이 아닐 때 레벨 키워드 매칭 여부
    pub auto_log_level_string_match: bool,
    /// `deployment.environment` 태그 (빈 문자열이면 설정 안 함)
    pub environment: String,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            auto_parse_json: true,
            auto_log_level_string_match: true,
            environment: String::new(),
        }
    }
}

/// 로그 파이프라인 설정
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// 정규화 설정
    pub adapter: AdapterConfig,
    /// 필터 규칙
    pub filter: FilterRules,
    /// 수집 엔드포인트 URL
    pub endpoint: String,
    /// 전송 타임아웃 (초)
    pub timeout_secs: u64,
    /// 플러시 간격 (밀리초)
    pub flush_interval_ms: u64,
    /// 입력 채널 용량
    pub channel_capacity: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            adapter: AdapterConfig::default(),
            filter: FilterRules::default(),
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            timeout_secs: 10,
            flush_interval_ms: 5_000,
            channel_capacity: 1024,
        }
    }
}

impl PipelineConfig {
    /// core의 `LogshipConfig`에서 파이프라인 설정을 생성합니다.
    ///
    /// 필터 라벨 규칙이 잘못된 경우 에러를 반환합니다.
    pub fn from_core(core: &LogshipConfig) -> Result<Self, LogPipelineError> {
        Ok(Self {
            adapter: AdapterConfig {
                auto_parse_json: core.adapter.auto_parse_json,
                auto_log_level_string_match: core.adapter.auto_log_level_string_match,
                environment: core.adapter.environment.clone(),
            },
            filter: FilterRules::from_section(&core.filter)?,
            endpoint: core.delivery.endpoint.clone(),
            timeout_secs: core.delivery.timeout_secs,
            flush_interval_ms: core.delivery.flush_interval_ms,
            channel_capacity: core.adapter.channel_capacity,
        })
    }

    /// 플러시 간격
    pub fn flush_interval(&self) -> Duration {
        Duration::from_millis(self.flush_interval_ms)
    }

    /// 전송 타임아웃
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), LogPipelineError> {
        const MAX_FLUSH_INTERVAL_MS: u64 = 3_600_000; // 1 hour

        if self.endpoint.is_empty() {
            return Err(LogPipelineError::Config {
                field: "endpoint".to_owned(),
                reason: "must not be empty".to_owned(),
            });
        }

        if self.timeout_secs == 0 {
            return Err(LogPipelineError::Config {
                field: "timeout_secs".to_owned(),
                reason: "must be greater than 0".to_owned(),
            });
        }

        if self.flush_interval_ms == 0 || self.flush_interval_ms > MAX_FLUSH_INTERVAL_MS {
            return Err(LogPipelineError::Config {
                field: "flush_interval_ms".to_owned(),
                reason: format!("must be 1-{}", MAX_FLUSH_INTERVAL_MS),
            });
        }

        if self.channel_capacity == 0 {
            return Err(LogPipelineError::Config {
                field: "channel_capacity".to_owned(),
                reason: "must be greater than 0".to_owned(),
            });
        }

        Ok(())
    }
}

/// 파이프라인 설정 빌더
#[derive(Default)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// JSON 자동 파싱 여부를 설정합니다.
    pub fn auto_parse_json(mut self, enabled: bool) -> Self {
        self.config.adapter.auto_parse_json = enabled;
        self
    }

    /// 레벨 키워드 매칭 여부를 설정합니다.
    pub fn auto_log_level_string_match(mut self, enabled: bool) -> Self {
        self.config.adapter.auto_log_level_string_match = enabled;
        self
    }

    /// 환경 태그를 설정합니다.
    pub fn environment(mut self, environment: impl Into<String>) -> Self {
        self.config.adapter.environment = environment.into();
        self
    }

    /// 필터 규칙을 설정합니다.
    pub fn filter(mut self, filter: FilterRules) -> Self {
        self.config.filter = filter;
        self
    }

    /// 수집 엔드포인트를 설정합니다.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = endpoint.into();
        self
    }

    /// 전송 타임아웃(초)을 설정합니다.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs;
        self
    }

    /// 플러시 간격(밀리초)을 설정합니다.
    pub fn flush_interval_ms(mut self, ms: u64) -> Self {
        self.config.flush_interval_ms = ms;
        self
    }

    /// 입력 채널 용량을 설정합니다.
    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.config.channel_capacity = capacity;
        self
    }

    /// 설정을 검증하고 `PipelineConfig`를 생성합니다.
    pub fn build(self) -> Result<PipelineConfig, LogPipelineError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
