//! 에러 타입 -- 도메인별 에러 정의

/// logship 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum LogshipError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 파이프라인 처리 에러
    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// 배치 전송 에러
    #[error("delivery error: {0}")]
    Delivery(#[from] DeliveryError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 파이프라인 처리 에러
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// 채널 전송 실패
    #[error("channel send failed: {0}")]
    ChannelSend(String),

    /// 파이프라인 초기화 실패
    #[error("pipeline init failed: {0}")]
    InitFailed(String),

    /// 이미 실행 중
    #[error("pipeline is already running")]
    AlreadyRunning,

    /// 실행 중이 아님
    #[error("pipeline is not running")]
    NotRunning,
}

/// 배치 전송 에러
///
/// 전송 실패는 호출자가 로그로 남기고 배치를 폐기합니다. 재시도는 없습니다.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// 배치를 JSON으로 직렬화하지 못함
    #[error("failed to serialize batch: {0}")]
    Serialize(String),

    /// 연결 실패, 타임아웃 등 전송 계층 에러
    #[error("transport error: {0}")]
    Transport(String),

    /// 200 이외의 응답 코드
    #[error("unexpected response status {status}: {body}")]
    Status { status: u16, body: String },

    /// HTTP 클라이언트 생성 실패
    #[error("failed to build http client: {0}")]
    Client(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_display() {
        let err = DeliveryError::Status {
            status: 503,
            body: "collector overloaded".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("503"));
        assert!(msg.contains("collector overloaded"));
    }

    #[test]
    fn delivery_error_converts_to_top_level() {
        let err: LogshipError = DeliveryError::Transport("connection refused".to_owned()).into();
        assert!(matches!(err, LogshipError::Delivery(_)));
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::InvalidValue {
            field: "delivery.endpoint".to_owned(),
            reason: "must not be empty".to_owned(),
        };
        assert!(err.to_string().contains("delivery.endpoint"));
    }
}
