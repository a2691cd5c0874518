//! 메트릭 상수 및 설명 등록
//!
//! 모든 Prometheus 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 파이프라인은 이 상수를 사용하여 `metrics::counter!()`, `metrics::gauge!()`,
//! `metrics::histogram!()` 매크로를 호출합니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `logship_`
//! - 접미어: `_total` (counter), `_seconds` (histogram/latency), 없음 (gauge)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(logship_core::metrics::ENTRIES_RECEIVED_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 싱크 레이블 키
pub const LABEL_SINK: &str = "sink";

/// 심각도 레이블 키 (trace, debug, info, warn, error, fatal)
pub const LABEL_SEVERITY: &str = "severity";

// ─── 파이프라인 메트릭 ──────────────────────────────────────────────

/// 수신한 원시 엔트리 수 (counter)
pub const ENTRIES_RECEIVED_TOTAL: &str = "logship_entries_received_total";

/// 필터에서 제외된 엔트리 수 (counter)
pub const ENTRIES_FILTERED_TOTAL: &str = "logship_entries_filtered_total";

/// 버퍼에 적재된 레코드 수 (counter, label: severity)
pub const RECORDS_BUFFERED_TOTAL: &str = "logship_records_buffered_total";

/// 전송에 성공한 배치 수 (counter, label: sink)
pub const BATCHES_DELIVERED_TOTAL: &str = "logship_batches_delivered_total";

/// 전송에 실패한 배치 수 (counter, label: sink)
pub const DELIVERY_FAILURES_TOTAL: &str = "logship_delivery_failures_total";

/// 전송 실패로 폐기된 레코드 수 (counter)
pub const RECORDS_DROPPED_TOTAL: &str = "logship_records_dropped_total";

/// 현재 버퍼에 대기 중인 레코드 수 (gauge)
pub const BUFFER_SIZE: &str = "logship_buffer_size";

/// 배치 1회 전송 소요 시간 (histogram, 초)
pub const DELIVERY_DURATION_SECONDS: &str = "logship_delivery_duration_seconds";

// ─── 히스토그램 버킷 ────────────────────────────────────────────────

/// 전송 지연 버킷 (초)
///
/// 5ms ~ 10s 범위 (기본 전송 타임아웃 10초)
pub const DELIVERY_DURATION_BUCKETS: [f64; 9] = [0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 5.0, 10.0];

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// 이 함수는 전역 레코더 설치 후 한 번만 호출해야 합니다.
/// 일반적으로 `logship-daemon`의 시작 시점에서 호출합니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_gauge, describe_histogram};

    describe_counter!(
        ENTRIES_RECEIVED_TOTAL,
        "Total number of raw log entries received from the router"
    );
    describe_counter!(
        ENTRIES_FILTERED_TOTAL,
        "Total number of entries rejected by route filter rules"
    );
    describe_counter!(
        RECORDS_BUFFERED_TOTAL,
        "Total number of normalized records appended to the batch buffer"
    );
    describe_counter!(
        BATCHES_DELIVERED_TOTAL,
        "Total number of batches accepted by the collector"
    );
    describe_counter!(
        DELIVERY_FAILURES_TOTAL,
        "Total number of batch deliveries that failed"
    );
    describe_counter!(
        RECORDS_DROPPED_TOTAL,
        "Total number of records discarded after a failed delivery"
    );
    describe_gauge!(
        BUFFER_SIZE,
        "Current number of records waiting in the batch buffer"
    );
    describe_histogram!(
        DELIVERY_DURATION_SECONDS,
        "Time to deliver a single batch in seconds"
    );
}
