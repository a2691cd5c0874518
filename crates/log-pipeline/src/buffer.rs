//! 배치 버퍼 -- 수집 태스크와 플러시 태스크가 공유하는 인메모리 버퍼
//!
//! [`BatchBuffer`]는 정규화된 레코드를 도착 순서대로 모읍니다.
//! 플러시 태스크는 [`BatchBuffer::take`]로 버퍼를 빈 것과 교체하고
//! 이전 내용을 소유권째 가져갑니다. 임계 구역은 교체 자체만 포함하며
//! 네트워크 전송은 락 밖에서 수행됩니다.
//!
//! 버퍼 크기에는 상한이 없습니다. 플러시 간격 동안 쌓인 레코드는 모두 다음 배치에 포함됩니다.

use std::sync::{Arc, Mutex, MutexGuard};

use logship_core::metrics as m;
use logship_core::types::LogRecord;

/// 공유 배치 버퍼
///
/// 복제 시 같은 버퍼를 가리킵니다.
#[derive(Debug, Clone, Default)]
pub struct BatchBuffer {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl BatchBuffer {
    /// 빈 버퍼를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 레코드를 추가하고 추가 후 버퍼 길이를 반환합니다.
    pub fn push(&self, record: LogRecord) -> usize {
        let len = {
            let mut records = self.lock();
            records.push(record);
            records.len()
        };
        metrics::gauge!(m::BUFFER_SIZE).set(len as f64);
        len
    }

    /// 버퍼를 빈 것으로 교체하고 이전 내용을 반환합니다.
    pub fn take(&self) -> Vec<LogRecord> {
        let batch = std::mem::take(&mut *self.lock());
        metrics::gauge!(m::BUFFER_SIZE).set(0.0);
        batch
    }

    /// 현재 버퍼 길이를 반환합니다.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// 버퍼가 비어있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // 락을 쥔 쪽이 panic 해도 Vec 자체는 항상 유효한 상태
    fn lock(&self) -> MutexGuard<'_, Vec<LogRecord>> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
