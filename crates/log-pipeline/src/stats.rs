//! 파이프라인 카운터
//!
//! 수집 태스크와 플러시 태스크가 함께 갱신하는 원자적 카운터입니다.
//! Prometheus 메트릭과 별개로 테스트와 헬스 체크에서 직접 읽습니다.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// 파이프라인 처리 통계
#[derive(Debug, Default)]
pub struct PipelineStats {
    received: AtomicU64,
    filtered: AtomicU64,
    buffered: AtomicU64,
    delivered_batches: AtomicU64,
    delivered_records: AtomicU64,
    failed_batches: AtomicU64,
    dropped_records: AtomicU64,
    last_delivery_failed: AtomicBool,
}

impl PipelineStats {
    /// 새 통계를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_received(&self) {
        self.received.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_filtered(&self) {
        self.filtered.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_buffered(&self) {
        self.buffered.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_delivered(&self, records: usize) {
        self.delivered_batches.fetch_add(1, Ordering::Relaxed);
        self.delivered_records
            .fetch_add(records as u64, Ordering::Relaxed);
        self.last_delivery_failed.store(false, Ordering::Relaxed);
    }

    pub(crate) fn record_failed(&self, records: usize) {
        self.failed_batches.fetch_add(1, Ordering::Relaxed);
        self.dropped_records
            .fetch_add(records as u64, Ordering::Relaxed);
        self.last_delivery_failed.store(true, Ordering::Relaxed);
    }

    /// 수신한 엔트리 수
    pub fn received(&self) -> u64 {
        self.received.load(Ordering::Relaxed)
    }

    /// 필터에서 제외된 엔트리 수
    pub fn filtered(&self) -> u64 {
        self.filtered.load(Ordering::Relaxed)
    }

    /// 버퍼에 적재된 레코드 수
    pub fn buffered(&self) -> u64 {
        self.buffered.load(Ordering::Relaxed)
    }

    /// 전송 성공한 배치 수
    pub fn delivered_batches(&self) -> u64 {
        self.delivered_batches.load(Ordering::Relaxed)
    }

    /// 전송 성공한 레코드 수
    pub fn delivered_records(&self) -> u64 {
        self.delivered_records.load(Ordering::Relaxed)
    }

    /// 전송 실패한 배치 수
    pub fn failed_batches(&self) -> u64 {
        self.failed_batches.load(Ordering::Relaxed)
    }

    /// 전송 실패로 폐기된 레코드 수
    pub fn dropped_records(&self) -> u64 {
        self.dropped_records.load(Ordering::Relaxed)
    }

    /// 가장 최근 전송이 실패했는지 여부
    pub fn last_delivery_failed(&self) -> bool {
        self.last_delivery_failed.load(Ordering::Relaxed)
    }
}
