//! 입력 수집 모듈 -- 호스트 로그 라우터의 출력을 파이프라인 입력 채널로 전달합니다.
//!
//! # 수집 소스
//! - [`LineCollector`]: 비동기 리더의 NDJSON `RawLogEntry` 스트림 (stdin, 파이프 등)
//!
//! 각 수집기는 자체 tokio 태스크에서 실행되며
//! `tokio::mpsc::Sender<RawLogEntry>` 채널을 통해 파이프라인으로 전달합니다.

pub mod ndjson;

pub use ndjson::LineCollector;

/// 수집기 상태
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectorStatus {
    /// 실행 대기 중
    Idle,
    /// 실행 중
    Running,
    /// 에러로 중단됨
    Error(String),
    /// 정상 종료됨
    Stopped,
}

impl std::fmt::Display for CollectorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Error(msg) => write!(f, "error: {msg}"),
            Self::Stopped => write!(f, "stopped"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collector_status_display() {
        assert_eq!(CollectorStatus::Idle.to_string(), "idle");
        assert_eq!(
            CollectorStatus::Error("broken pipe".to_owned()).to_string(),
            "error: broken pipe"
        );
    }
}
