//! 파이프라인 오케스트레이션 -- 수집/정규화/버퍼/전송의 전체 흐름을 관리합니다.
//!
//! [`LogPipeline`]은 core의 [`Pipeline`](logship_core::pipeline::Pipeline) trait을 구현하여
//! `logship-daemon`에서 시작/정지/헬스 체크로 관리됩니다.
//!
//! # 내부 아키텍처
//! ```text
//! router -> mpsc -> Ingestor(filter -> normalize) -> BatchBuffer -> Flusher(tick) -> LogSink
//! ```

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use logship_core::error::{LogshipError, PipelineError};
use logship_core::pipeline::{HealthStatus, LogSink, Pipeline};
use logship_core::types::RawLogEntry;

use crate::buffer::BatchBuffer;
use crate::config::PipelineConfig;
use crate::error::LogPipelineError;
use crate::flusher::{FlushOutcome, Flusher};
use crate::ingest::Ingestor;
use crate::sink::HttpSink;
use crate::stats::PipelineStats;

/// 파이프라인 실행 상태
#[derive(Debug, Clone, PartialEq, Eq)]
enum PipelineState {
    /// 초기화됨, 아직 시작하지 않음
    Initialized,
    /// 실행 중
    Running,
    /// 정지됨
    Stopped,
}

/// 로그 파이프라인
///
/// 전송 방식은 [`LogSink`] 구현으로 교체할 수 있습니다.
///
/// # 사용 예시
/// ```ignore
/// use logship_log_pipeline::{HttpSink, LogPipelineBuilder};
///
/// let (mut pipeline, entry_tx) = LogPipelineBuilder::<HttpSink>::new()
///     .config(config)
///     .http_sink()?
///     .build()?;
///
/// pipeline.start().await?;
/// ```
pub struct LogPipeline<S: LogSink> {
    /// 파이프라인 설정
    config: PipelineConfig,
    /// 현재 상태
    state: PipelineState,
    /// 공유 배치 버퍼
    buffer: BatchBuffer,
    /// 전송 대상
    sink: Arc<S>,
    /// 처리 통계
    stats: Arc<PipelineStats>,
    /// 입력 채널 (실행 중에는 수집 태스크가 소유)
    entry_rx: Option<mpsc::Receiver<RawLogEntry>>,
    /// 백그라운드 태스크 취소 토큰
    cancel: CancellationToken,
    /// 수집 태스크 핸들 (종료 시 입력 채널 반환)
    ingest_task: Option<JoinHandle<mpsc::Receiver<RawLogEntry>>>,
    /// 플러시 태스크 핸들
    flush_task: Option<JoinHandle<()>>,
}

impl<S: LogSink> LogPipeline<S> {
    /// 현재 상태를 반환합니다.
    pub fn state_name(&self) -> &str {
        match self.state {
            PipelineState::Initialized => "initialized",
            PipelineState::Running => "running",
            PipelineState::Stopped => "stopped",
        }
    }

    /// 파이프라인 설정을 반환합니다.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// 처리 통계를 반환합니다.
    pub fn stats(&self) -> &PipelineStats {
        &self.stats
    }

    /// 수신한 엔트리 수를 반환합니다.
    pub fn received_count(&self) -> u64 {
        self.stats.received()
    }

    /// 필터에서 제외된 엔트리 수를 반환합니다.
    pub fn filtered_count(&self) -> u64 {
        self.stats.filtered()
    }

    /// 버퍼에 적재된 레코드 수를 반환합니다.
    pub fn buffered_count(&self) -> u64 {
        self.stats.buffered()
    }

    /// 전송에 성공한 레코드 수를 반환합니다.
    pub fn delivered_count(&self) -> u64 {
        self.stats.delivered_records()
    }

    /// 전송에 실패한 배치 수를 반환합니다.
    pub fn failed_count(&self) -> u64 {
        self.stats.failed_batches()
    }

    /// 현재 버퍼에 대기 중인 레코드 수를 반환합니다.
    pub fn pending_count(&self) -> usize {
        self.buffer.len()
    }

    /// 싱크에 대한 참조를 반환합니다.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// 수집 태스크가 끝났는지 확인합니다 (입력 채널 닫힘 등).
    pub fn is_ingestion_finished(&self) -> bool {
        self.ingest_task
            .as_ref()
            .is_some_and(|handle| handle.is_finished())
    }

    /// 즉시 한 번 플러시합니다.
    pub async fn flush_now(&self) -> FlushOutcome {
        self.flusher().flush_once().await
    }

    fn flusher(&self) -> Flusher<S> {
        Flusher::new(
            self.buffer.clone(),
            Arc::clone(&self.sink),
            self.config.flush_interval(),
            Arc::clone(&self.stats),
        )
    }

    fn ingestor(&self) -> Ingestor {
        Ingestor::new(
            self.config.adapter.clone(),
            self.config.filter.clone(),
            self.buffer.clone(),
            Arc::clone(&self.stats),
        )
    }
}

impl<S: LogSink> Pipeline for LogPipeline<S> {
    async fn start(&mut self) -> Result<(), LogshipError> {
        if self.state == PipelineState::Running {
            return Err(PipelineError::AlreadyRunning.into());
        }

        let rx = self.entry_rx.take().ok_or_else(|| {
            LogshipError::from(PipelineError::InitFailed(
                "input channel is not available".to_owned(),
            ))
        })?;

        tracing::info!(
            sink = self.sink.name(),
            flush_interval_ms = self.config.flush_interval_ms,
            filter_rules = !self.config.filter.is_empty(),
            "starting log pipeline"
        );

        self.cancel = CancellationToken::new();

        let ingestor = self.ingestor();
        self.ingest_task = Some(tokio::spawn(ingestor.run(rx, self.cancel.clone())));

        let flusher = self.flusher();
        self.flush_task = Some(tokio::spawn(flusher.run(self.cancel.clone())));

        self.state = PipelineState::Running;
        tracing::info!("log pipeline started");
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), LogshipError> {
        if self.state != PipelineState::Running {
            return Err(PipelineError::NotRunning.into());
        }

        tracing::info!("stopping log pipeline");

        // 1. 백그라운드 태스크 중단
        self.cancel.cancel();

        if let Some(handle) = self.ingest_task.take() {
            match handle.await {
                Ok(mut rx) => {
                    // 2. 채널에 남은 엔트리 적재
                    let drained = self.ingestor().drain(&mut rx);
                    if drained > 0 {
                        tracing::debug!(entries = drained, "drained queued entries");
                    }
                    self.entry_rx = Some(rx);
                }
                Err(e) => tracing::warn!(error = %e, "ingestion task ended abnormally"),
            }
        }
        if let Some(handle) = self.flush_task.take() {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "flush task ended abnormally");
            }
        }

        // 3. 버퍼에 남은 레코드 전송 (best-effort)
        match self.flush_now().await {
            FlushOutcome::Empty => {}
            FlushOutcome::Delivered(count) => {
                tracing::info!(records = count, "delivered remaining buffered records");
            }
            FlushOutcome::Failed(count) => {
                tracing::warn!(records = count, "final flush failed, records dropped");
            }
        }

        self.state = PipelineState::Stopped;
        tracing::info!(
            received = self.stats.received(),
            delivered = self.stats.delivered_records(),
            dropped = self.stats.dropped_records(),
            "log pipeline stopped"
        );
        Ok(())
    }

    async fn health_check(&self) -> HealthStatus {
        match self.state {
            PipelineState::Running => {
                if self.stats.last_delivery_failed() {
                    HealthStatus::Degraded(format!(
                        "last delivery to {} sink failed",
                        self.sink.name()
                    ))
                } else {
                    HealthStatus::Healthy
                }
            }
            PipelineState::Initialized => HealthStatus::Unhealthy("not started".to_owned()),
            PipelineState::Stopped => HealthStatus::Unhealthy("stopped".to_owned()),
        }
    }
}

/// 로그 파이프라인 빌더
///
/// 파이프라인을 구성하고 필요한 채널을 생성합니다.
pub struct LogPipelineBuilder<S: LogSink> {
    config: PipelineConfig,
    sink: Option<S>,
    entry_rx: Option<mpsc::Receiver<RawLogEntry>>,
}

impl<S: LogSink> LogPipelineBuilder<S> {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
            sink: None,
            entry_rx: None,
        }
    }

    /// 파이프라인 설정을 지정합니다.
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// 전송 싱크를 지정합니다.
    pub fn sink(mut self, sink: S) -> Self {
        self.sink = Some(sink);
        self
    }

    /// 외부 입력 채널을 설정합니다.
    ///
    /// 설정하지 않으면 빌더가 `channel_capacity` 크기의 새 채널을 생성합니다.
    pub fn entry_receiver(mut self, rx: mpsc::Receiver<RawLogEntry>) -> Self {
        self.entry_rx = Some(rx);
        self
    }

    /// 파이프라인을 빌드합니다.
    ///
    /// # Returns
    /// - `LogPipeline`: 파이프라인 인스턴스
    /// - `Option<mpsc::Sender<RawLogEntry>>`: 입력 송신 채널
    ///   (외부 entry_receiver를 설정한 경우 None)
    pub fn build(
        self,
    ) -> Result<(LogPipeline<S>, Option<mpsc::Sender<RawLogEntry>>), LogPipelineError> {
        self.config.validate()?;

        let sink = self.sink.ok_or_else(|| LogPipelineError::Config {
            field: "sink".to_owned(),
            reason: "a delivery sink is required".to_owned(),
        })?;

        let (entry_rx, entry_tx) = match self.entry_rx {
            Some(rx) => (rx, None),
            None => {
                let (tx, rx) = mpsc::channel(self.config.channel_capacity);
                (rx, Some(tx))
            }
        };

        let pipeline = LogPipeline {
            config: self.config,
            state: PipelineState::Initialized,
            buffer: BatchBuffer::new(),
            sink: Arc::new(sink),
            stats: Arc::new(PipelineStats::new()),
            entry_rx: Some(entry_rx),
            cancel: CancellationToken::new(),
            ingest_task: None,
            flush_task: None,
        };

        Ok((pipeline, entry_tx))
    }
}

impl LogPipelineBuilder<HttpSink> {
    /// 설정의 엔드포인트와 타임아웃으로 HTTP 싱크를 생성합니다.
    pub fn http_sink(self) -> Result<Self, LogPipelineError> {
        let sink = HttpSink::new(self.config.endpoint.clone(), self.config.timeout())?;
        Ok(self.sink(sink))
    }
}

impl<S: LogSink> Default for LogPipelineBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}
