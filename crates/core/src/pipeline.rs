//! 파이프라인 trait -- 모듈 확장 포인트 정의

use std::fmt;
use std::future::Future;

use serde::Serialize;

use crate::error::{DeliveryError, LogshipError};
use crate::types::LogRecord;

/// 모듈 헬스 상태
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum HealthStatus {
    /// 정상
    Healthy,
    /// 동작 중이지만 문제가 있음
    Degraded(String),
    /// 동작하지 않음
    Unhealthy(String),
}

impl HealthStatus {
    /// 정상 상태인지 확인합니다.
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }

    /// 비정상 상태인지 확인합니다.
    pub fn is_unhealthy(&self) -> bool {
        matches!(self, Self::Unhealthy(_))
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Healthy => write!(f, "healthy"),
            Self::Degraded(reason) => write!(f, "degraded: {reason}"),
            Self::Unhealthy(reason) => write!(f, "unhealthy: {reason}"),
        }
    }
}

/// 생명주기를 가진 파이프라인 모듈
///
/// daemon은 이 trait으로 모듈을 시작/정지하고 상태를 조회합니다.
pub trait Pipeline: Send {
    /// 백그라운드 태스크를 스폰하고 처리를 시작합니다.
    fn start(&mut self) -> impl Future<Output = Result<(), LogshipError>> + Send;

    /// 태스크를 정지하고 남은 데이터를 정리합니다.
    fn stop(&mut self) -> impl Future<Output = Result<(), LogshipError>> + Send;

    /// 현재 헬스 상태를 반환합니다.
    fn health_check(&self) -> impl Future<Output = HealthStatus> + Send;
}

/// 배치 전송 대상
///
/// 배치 한 개에 대해 한 번의 전송을 시도합니다. 재시도나 재적재는
/// 구현체의 몫이며, 기본 HTTP 구현은 at-most-once로 동작합니다.
pub trait LogSink: Send + Sync + 'static {
    /// 싱크 이름 (로그/메트릭 레이블용)
    fn name(&self) -> &str;

    /// 배치를 레코드 순서대로 전송합니다.
    fn deliver(
        &self,
        batch: Vec<LogRecord>,
    ) -> impl Future<Output = Result<(), DeliveryError>> + Send;
}
