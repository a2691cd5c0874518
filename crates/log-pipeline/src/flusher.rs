//! 플러시 태스크 -- 주기적으로 버퍼를 비우고 싱크로 전송합니다.
//!
//! 플러시 주기는 트래픽과 무관한 고정 간격입니다. 버퍼가 비어 있으면 전송하지 않습니다.
//! 전송 실패는 로그로 남기고 배치를 폐기합니다. 재시도/재적재는 없습니다.
//!
//! 플러시는 타이머로 직렬화되므로 두 번의 전송이 동시에 진행되지 않습니다.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use logship_core::metrics as m;
use logship_core::pipeline::LogSink;

use crate::buffer::BatchBuffer;
use crate::stats::PipelineStats;

/// 플러시 1회 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    /// 버퍼가 비어 있어 전송하지 않음
    Empty,
    /// 전송 성공 (레코드 수)
    Delivered(usize),
    /// 전송 실패, 배치 폐기 (레코드 수)
    Failed(usize),
}

/// 배치 플러셔
pub struct Flusher<S: LogSink> {
    buffer: BatchBuffer,
    sink: Arc<S>,
    interval: Duration,
    stats: Arc<PipelineStats>,
}

impl<S: LogSink> Clone for Flusher<S> {
    fn clone(&self) -> Self {
        Self {
            buffer: self.buffer.clone(),
            sink: Arc::clone(&self.sink),
            interval: self.interval,
            stats: Arc::clone(&self.stats),
        }
    }
}

impl<S: LogSink> Flusher<S> {
    /// 새 플러셔를 생성합니다.
    pub fn new(
        buffer: BatchBuffer,
        sink: Arc<S>,
        interval: Duration,
        stats: Arc<PipelineStats>,
    ) -> Self {
        Self {
            buffer,
            sink,
            interval,
            stats,
        }
    }

    /// 버퍼를 교체하고 비어 있지 않으면 한 번 전송합니다.
    pub async fn flush_once(&self) -> FlushOutcome {
        let batch = self.buffer.take();
        if batch.is_empty() {
            return FlushOutcome::Empty;
        }

        let count = batch.len();
        let sink = self.sink.name().to_owned();
        debug!(records = count, sink = sink.as_str(), "flushing batch");

        let started = Instant::now();
        let result = self.sink.deliver(batch).await;
        metrics::histogram!(m::DELIVERY_DURATION_SECONDS)
            .record(started.elapsed().as_secs_f64());

        match result {
            Ok(()) => {
                self.stats.record_delivered(count);
                metrics::counter!(m::BATCHES_DELIVERED_TOTAL, m::LABEL_SINK => sink).increment(1);
                FlushOutcome::Delivered(count)
            }
            Err(e) => {
                error!(error = %e, records = count, "failed to deliver batch, dropping it");
                self.stats.record_failed(count);
                metrics::counter!(m::DELIVERY_FAILURES_TOTAL, m::LABEL_SINK => sink).increment(1);
                metrics::counter!(m::RECORDS_DROPPED_TOTAL).increment(count as u64);
                FlushOutcome::Failed(count)
            }
        }
    }

    /// 취소될 때까지 주기적으로 플러시합니다.
    ///
    /// 첫 플러시는 시작 후 한 주기가 지난 시점입니다.
    /// 진행 중인 전송은 취소하지 않으며, 전송 시간은 싱크의 타임아웃으로 제한됩니다.
    pub async fn run(self, cancel: CancellationToken) {
        let start = tokio::time::Instant::now() + self.interval;
        let mut ticker = tokio::time::interval_at(start, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(interval_ms = self.interval.as_millis() as u64, "flush task started");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("flush task received shutdown signal");
                    break;
                }
                _ = ticker.tick() => {
                    self.flush_once().await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logship_core::error::DeliveryError;
    use logship_core::types::LogRecord;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        batches: Mutex<Vec<Vec<LogRecord>>>,
        fail: bool,
    }

    impl LogSink for RecordingSink {
        fn name(&self) -> &str {
            "recording"
        }

        async fn deliver(&self, batch: Vec<LogRecord>) -> Result<(), DeliveryError> {
            self.batches.lock().unwrap().push(batch);
            if self.fail {
                Err(DeliveryError::Transport("connection refused".to_owned()))
            } else {
                Ok(())
            }
        }
    }

    fn record(message: &str) -> LogRecord {
        LogRecord {
            timestamp: 0,
            severity_text: "info".to_owned(),
            severity_number: 9,
            attributes: BTreeMap::new(),
            resources: BTreeMap::new(),
            message: message.to_owned(),
        }
    }

    fn flusher(fail: bool) -> (Flusher<RecordingSink>, BatchBuffer, Arc<RecordingSink>) {
        let buffer = BatchBuffer::new();
        let sink = Arc::new(RecordingSink {
            fail,
            ..Default::default()
        });
        let flusher = Flusher::new(
            buffer.clone(),
            Arc::clone(&sink),
            Duration::from_secs(5),
            Arc::new(PipelineStats::new()),
        );
        (flusher, buffer, sink)
    }

    #[tokio::test]
    async fn empty_buffer_sends_nothing() {
        let (flusher, _buffer, sink) = flusher(false);
        assert_eq!(flusher.flush_once().await, FlushOutcome::Empty);
        assert!(sink.batches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn flush_delivers_whole_buffer() {
        let (flusher, buffer, sink) = flusher(false);
        buffer.push(record("a"));
        buffer.push(record("b"));

        assert_eq!(flusher.flush_once().await, FlushOutcome::Delivered(2));
        assert!(buffer.is_empty());
        assert_eq!(sink.batches.lock().unwrap()[0].len(), 2);
        assert_eq!(flusher.stats.delivered_records(), 2);
    }

    #[tokio::test]
    async fn failed_delivery_drops_batch() {
        let (flusher, buffer, sink) = flusher(true);
        buffer.push(record("lost"));

        assert_eq!(flusher.flush_once().await, FlushOutcome::Failed(1));
        // 재적재하지 않음
        assert!(buffer.is_empty());
        assert_eq!(flusher.flush_once().await, FlushOutcome::Empty);
        assert_eq!(sink.batches.lock().unwrap().len(), 1);
        assert!(flusher.stats.last_delivery_failed());
        assert_eq!(flusher.stats.dropped_records(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn run_flushes_on_each_tick() {
        let (flusher, buffer, sink) = flusher(false);
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(flusher.run(cancel.clone()));

        buffer.push(record("first"));
        tokio::time::sleep(Duration::from_millis(5_100)).await;
        assert_eq!(sink.batches.lock().unwrap().len(), 1);

        // 빈 주기에는 전송 없음
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(sink.batches.lock().unwrap().len(), 1);

        buffer.push(record("second"));
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(sink.batches.lock().unwrap().len(), 2);

        cancel.cancel();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn run_does_not_flush_before_first_interval() {
        let (flusher, buffer, sink) = flusher(false);
        let cancel = CancellationToken::new();
        buffer.push(record("early"));
        let handle = tokio::spawn(flusher.run(cancel.clone()));

        tokio::time::sleep(Duration::from_millis(4_900)).await;
        assert!(sink.batches.lock().unwrap().is_empty());

        cancel.cancel();
        handle.await.unwrap();
        // 취소 후에도 버퍼 내용은 남아 있음
        assert_eq!(buffer.len(), 1);
    }
}
