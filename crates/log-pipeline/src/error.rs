//! 로그 파이프라인 에러 타입
//!
//! [`LogPipelineError`]는 로그 파이프라인 내부에서 발생하는 에러를 표현합니다.
//! `From<LogPipelineError> for LogshipError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.
//!
//! 잘못된 로그 본문은 에러가 아닙니다. 정규화기는 항상 레코드를 생성합니다.

use logship_core::error::{ConfigError, DeliveryError, LogshipError, PipelineError};

/// 로그 파이프라인 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum LogPipelineError {
    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// 채널 통신 에러
    #[error("channel error: {0}")]
    Channel(String),

    /// 배치 전송 에러
    #[error("delivery error: {0}")]
    Delivery(#[from] DeliveryError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ConfigError> for LogPipelineError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::InvalidValue { field, reason } => Self::Config { field, reason },
            other => Self::Config {
                field: "config".to_owned(),
                reason: other.to_string(),
            },
        }
    }
}

impl From<LogPipelineError> for LogshipError {
    fn from(err: LogPipelineError) -> Self {
        match err {
            LogPipelineError::Config { field, reason } => {
                LogshipError::Config(ConfigError::InvalidValue { field, reason })
            }
            LogPipelineError::Delivery(e) => LogshipError::Delivery(e),
            LogPipelineError::Io(e) => LogshipError::Io(e),
            LogPipelineError::Channel(msg) => {
                LogshipError::Pipeline(PipelineError::ChannelSend(msg))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = LogPipelineError::Config {
            field: "flush_interval_ms".to_owned(),
            reason: "must be greater than 0".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("flush_interval_ms"));
        assert!(msg.contains("greater than 0"));
    }

    #[test]
    fn converts_to_logship_error() {
        let err = LogPipelineError::Channel("receiver closed".to_owned());
        let top: LogshipError = err.into();
        assert!(matches!(
            top,
            LogshipError::Pipeline(PipelineError::ChannelSend(_))
        ));
    }

    #[test]
    fn config_error_keeps_field_through_conversion() {
        let err: LogPipelineError = ConfigError::InvalidValue {
            field: "filter.labels".to_owned(),
            reason: "'tier' must be in key:pattern form".to_owned(),
        }
        .into();
        let top: LogshipError = err.into();
        assert!(top.to_string().contains("filter.labels"));
    }

    #[test]
    fn delivery_error_is_preserved() {
        let err: LogPipelineError = DeliveryError::Status {
            status: 500,
            body: String::new(),
        }
        .into();
        let top: LogshipError = err.into();
        assert!(matches!(
            top,
            LogshipError::Delivery(DeliveryError::Status { status: 500, .. })
        ));
    }
}
