//! NDJSON 라인 수집기
//!
//! 비동기 리더에서 한 줄에 하나씩 JSON 인코딩된 [`RawLogEntry`]를 읽어
//! 파이프라인 입력 채널로 전달합니다.
//!
//! ```text
//! {"time":"2024-01-15T12:00:00Z","data":"GET / 200","source":"stdout","container":{"name":"/web","image":"nginx"}}
//! ```
//!
//! 디코딩에 실패한 줄(UTF-8이 아닌 바이트 포함)은 경고를 남기고 건너뜁니다. 빈 줄은 무시합니다.
//! 라인 단위 오류로는 수집이 중단되지 않으며, 리더 자체의 I/O 에러만 수집을 끝냅니다.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use logship_core::types::RawLogEntry;

use super::CollectorStatus;
use crate::error::LogPipelineError;

/// NDJSON 라인 수집기
pub struct LineCollector<R> {
    reader: R,
    tx: mpsc::Sender<RawLogEntry>,
    status: CollectorStatus,
    forwarded: u64,
    skipped: u64,
}

impl<R: AsyncBufRead + Unpin> LineCollector<R> {
    /// 새 수집기를 생성합니다.
    pub fn new(reader: R, tx: mpsc::Sender<RawLogEntry>) -> Self {
        Self {
            reader,
            tx,
            status: CollectorStatus::Idle,
            forwarded: 0,
            skipped: 0,
        }
    }

    /// EOF 또는 취소까지 라인을 읽어 전달합니다.
    ///
    /// 파이프라인 쪽 채널이 닫히면 [`LogPipelineError::Channel`]을 반환합니다.
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<(), LogPipelineError> {
        self.status = CollectorStatus::Running;
        info!("starting ndjson line collector");

        let mut line: Vec<u8> = Vec::new();
        let mut line_no: u64 = 0;

        loop {
            line.clear();
            let read = tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("line collector received shutdown signal");
                    break;
                }
                read = self.reader.read_until(b'\n', &mut line) => read,
            };

            let read = match read {
                Ok(read) => read,
                Err(e) => {
                    self.status = CollectorStatus::Error(e.to_string());
                    return Err(e.into());
                }
            };
            if read == 0 {
                info!(
                    forwarded = self.forwarded,
                    skipped = self.skipped,
                    "input reached end of stream"
                );
                break;
            }
            line_no += 1;

            let trimmed = line.trim_ascii();
            if trimmed.is_empty() {
                continue;
            }

            let entry = match serde_json::from_slice::<RawLogEntry>(trimmed) {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(line = line_no, error = %e, "skipping malformed input line");
                    self.skipped += 1;
                    continue;
                }
            };

            if let Err(e) = self.tx.send(entry).await {
                self.status = CollectorStatus::Error(e.to_string());
                return Err(LogPipelineError::Channel(e.to_string()));
            }
            self.forwarded += 1;
        }

        self.status = CollectorStatus::Stopped;
        Ok(())
    }

    /// 전달한 엔트리 수
    pub fn forwarded_count(&self) -> u64 {
        self.forwarded
    }

    /// 건너뛴 라인 수
    pub fn skipped_count(&self) -> u64 {
        self.skipped
    }

    /// 현재 상태를 반환합니다.
    pub fn status(&self) -> &CollectorStatus {
        &self.status
    }
}
