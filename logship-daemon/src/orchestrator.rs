//! Daemon orchestration -- assembly, input wiring, and lifecycle management.
//!
//! The [`Orchestrator`] loads configuration, installs the metrics
//! recorder, builds the log pipeline with its HTTP sink, and runs the
//! main loop that feeds stdin into the pipeline.
//!
//! # Shutdown Triggers
//!
//! - `SIGTERM` / `SIGINT`
//! - End of input (stdin closed)
//!
//! Either way the pipeline is stopped, which delivers whatever is still
//! buffered in one final batch.

use std::future::Future;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use tokio::io::{AsyncBufRead, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use logship_core::config::LogshipConfig;
use logship_core::pipeline::Pipeline;
use logship_core::types::RawLogEntry;
use logship_log_pipeline::{HttpSink, LineCollector, LogPipeline, LogPipelineBuilder, PipelineConfig};

use crate::health::{DaemonHealth, log_health};
use crate::metrics_server;

/// Interval between health snapshots in the main loop.
const HEALTH_CHECK_INTERVAL: Duration = Duration::from_secs(30);

/// The main daemon orchestrator.
pub struct Orchestrator {
    /// Loaded and validated configuration.
    config: LogshipConfig,
    /// Log pipeline delivering over HTTP.
    pipeline: LogPipeline<HttpSink>,
    /// Input sender handed to the line collector on `run`.
    entry_tx: Option<mpsc::Sender<RawLogEntry>>,
    /// Daemon start time (for uptime reporting).
    start_time: Instant,
}

impl Orchestrator {
    /// Load configuration and build the orchestrator.
    ///
    /// With a path, `logship.toml` is loaded and environment overrides are applied.
    /// Without one, defaults plus environment overrides are used.
    pub async fn build(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => LogshipConfig::load(path).await,
            None => LogshipConfig::from_env(),
        }
        .map_err(|e| anyhow::anyhow!("failed to load config: {}", e))?;
        Self::build_from_config(config).await
    }

    /// Build from an already-loaded configuration.
    pub async fn build_from_config(config: LogshipConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("config validation failed: {}", e))?;

        if config.metrics.enabled {
            metrics_server::install_metrics_recorder(&config.metrics)?;
        }

        let pipeline_config = PipelineConfig::from_core(&config)
            .map_err(|e| anyhow::anyhow!("invalid pipeline config: {}", e))?;

        let (pipeline, entry_tx) = LogPipelineBuilder::<HttpSink>::new()
            .config(pipeline_config)
            .http_sink()
            .map_err(|e| anyhow::anyhow!("failed to create HTTP sink: {}", e))?
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build log pipeline: {}", e))?;

        tracing::info!(
            endpoint = config.delivery.endpoint.as_str(),
            flush_interval_ms = config.delivery.flush_interval_ms,
            environment = config.adapter.environment.as_str(),
            "orchestrator initialized"
        );

        Ok(Self {
            config,
            pipeline,
            entry_tx,
            start_time: Instant::now(),
        })
    }

    /// Read stdin until it closes or a shutdown signal arrives.
    pub async fn run(&mut self) -> Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        self.run_with_input(stdin, wait_for_shutdown_signal()).await
    }

    /// Run the pipeline fed from `reader` until EOF or `shutdown` resolves.
    ///
    /// `shutdown` resolves to the name of the signal that triggered it.
    pub async fn run_with_input<R, F>(&mut self, reader: R, shutdown: F) -> Result<()>
    where
        R: AsyncBufRead + Unpin + Send + 'static,
        F: Future<Output = Result<&'static str>>,
    {
        let entry_tx = self
            .entry_tx
            .take()
            .ok_or_else(|| anyhow::anyhow!("orchestrator has already run"))?;

        self.pipeline
            .start()
            .await
            .map_err(|e| anyhow::anyhow!("failed to start log pipeline: {}", e))?;

        let cancel = CancellationToken::new();
        let collector_cancel = cancel.clone();
        let mut collector_task = tokio::spawn(async move {
            let mut collector = LineCollector::new(reader, entry_tx);
            collector.run(collector_cancel).await
        });

        let mut health_ticker = tokio::time::interval_at(
            tokio::time::Instant::now() + HEALTH_CHECK_INTERVAL,
            HEALTH_CHECK_INTERVAL,
        );
        tokio::pin!(shutdown);

        tracing::info!("entering main loop");
        let mut collector_done = false;
        loop {
            tokio::select! {
                signal = &mut shutdown => {
                    match signal {
                        Ok(signal) => tracing::info!(signal = signal, "shutdown signal received"),
                        Err(e) => tracing::error!(error = %e, "signal handling failed, shutting down"),
                    }
                    break;
                }
                result = &mut collector_task => {
                    collector_done = true;
                    match result {
                        Ok(Ok(())) => tracing::info!("input closed, shutting down"),
                        Ok(Err(e)) => tracing::error!(error = %e, "input collector failed"),
                        Err(e) => tracing::error!(error = %e, "input collector task panicked"),
                    }
                    break;
                }
                _ = health_ticker.tick() => {
                    log_health(&self.health().await);
                }
            }
        }

        if !collector_done {
            cancel.cancel();
            if let Err(e) = collector_task.await {
                tracing::warn!(error = %e, "input collector ended abnormally");
            }
        }

        self.shutdown().await
    }

    /// Stop the pipeline, delivering any buffered records.
    async fn shutdown(&mut self) -> Result<()> {
        tracing::info!("stopping log pipeline");
        self.pipeline
            .stop()
            .await
            .map_err(|e| anyhow::anyhow!("failed to stop log pipeline: {}", e))
    }

    /// Get the current health snapshot.
    pub async fn health(&self) -> DaemonHealth {
        let status = self.pipeline.health_check().await;
        DaemonHealth::from_pipeline(status, self.start_time.elapsed().as_secs(), &self.pipeline)
    }

    /// Get a reference to the loaded configuration.
    pub fn config(&self) -> &LogshipConfig {
        &self.config
    }

    /// Get a reference to the log pipeline.
    pub fn pipeline(&self) -> &LogPipeline<HttpSink> {
        &self.pipeline
    }
}

/// Wait for a shutdown signal (SIGTERM or SIGINT).
///
/// Returns the name of the signal that triggered the shutdown.
///
/// # Errors
///
/// Returns an error if signal handlers cannot be installed.
async fn wait_for_shutdown_signal() -> Result<&'static str> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("failed to install SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("failed to install SIGINT handler: {}", e))?;

    Ok(tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    })
}
