//! 수집 태스크 -- 필터 → 정규화 → 버퍼 적재
//!
//! [`Ingestor`]는 입력 채널의 유일한 소비자로, 엔트리를 도착 순서대로 처리합니다.
//! 네트워크 I/O를 기다리지 않으며 버퍼 락은 적재 순간에만 잡습니다.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use logship_core::metrics as m;
use logship_core::types::RawLogEntry;

use crate::buffer::BatchBuffer;
use crate::config::AdapterConfig;
use crate::filter::FilterRules;
use crate::normalizer::normalize;
use crate::stats::PipelineStats;

/// 엔트리 수집기
#[derive(Debug, Clone)]
pub struct Ingestor {
    adapter: AdapterConfig,
    filter: FilterRules,
    buffer: BatchBuffer,
    stats: Arc<PipelineStats>,
}

impl Ingestor {
    /// 새 수집기를 생성합니다.
    pub fn new(
        adapter: AdapterConfig,
        filter: FilterRules,
        buffer: BatchBuffer,
        stats: Arc<PipelineStats>,
    ) -> Self {
        Self {
            adapter,
            filter,
            buffer,
            stats,
        }
    }

    /// 엔트리 하나를 처리합니다. 버퍼에 적재되면 `true`를 반환합니다.
    pub fn process(&self, entry: &RawLogEntry) -> bool {
        self.stats.record_received();
        metrics::counter!(m::ENTRIES_RECEIVED_TOTAL).increment(1);

        if !self.filter.should_process(entry) {
            trace!(
                container = entry.container.name.as_str(),
                source = entry.source.as_str(),
                "entry filtered out"
            );
            self.stats.record_filtered();
            metrics::counter!(m::ENTRIES_FILTERED_TOTAL).increment(1);
            return false;
        }

        let record = normalize(entry, &self.adapter);
        metrics::counter!(m::RECORDS_BUFFERED_TOTAL, m::LABEL_SEVERITY => record.severity_text.clone())
            .increment(1);
        self.buffer.push(record);
        self.stats.record_buffered();
        true
    }

    /// 채널에 이미 들어와 있는 엔트리를 기다리지 않고 모두 처리합니다.
    ///
    /// 처리한 엔트리 수를 반환합니다.
    pub fn drain(&self, rx: &mut mpsc::Receiver<RawLogEntry>) -> usize {
        let mut drained = 0;
        while let Ok(entry) = rx.try_recv() {
            self.process(&entry);
            drained += 1;
        }
        drained
    }

    /// 입력 채널이 닫히거나 취소될 때까지 엔트리를 처리합니다.
    ///
    /// 재시작할 수 있도록 수신 채널을 돌려줍니다.
    pub async fn run(
        self,
        mut rx: mpsc::Receiver<RawLogEntry>,
        cancel: CancellationToken,
    ) -> mpsc::Receiver<RawLogEntry> {
        debug!("ingestion task started");

        loop {
            tokio::select! {
                // 취소가 먼저 관측되도록
                biased;
                _ = cancel.cancelled() => {
                    debug!("ingestion task received shutdown signal");
                    break;
                }
                entry = rx.recv() => {
                    match entry {
                        Some(entry) => {
                            self.process(&entry);
                        }
                        None => {
                            info!(
                                received = self.stats.received(),
                                "input channel closed, ingestion finished"
                            );
                            break;
                        }
                    }
                }
            }
        }

        rx
    }
}
