#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`severity`]: 레벨 이름 → 심각도 번호 분류기
//! - [`normalizer`]: `RawLogEntry` → `LogRecord` 정규화
//! - [`filter`]: 컨테이너 ID/이름/스트림/라벨 라우트 필터
//! - [`buffer`]: 수집/플러시 태스크가 공유하는 배치 버퍼
//! - [`sink`]: reqwest 기반 HTTP 전송 싱크
//! - [`ingest`]: 수집 태스크 (필터 → 정규화 → 버퍼)
//! - [`flusher`]: 주기적 플러시 태스크
//! - [`collector`]: NDJSON 입력 수집기
//! - [`pipeline`]: 전체 파이프라인 오케스트레이션 (Pipeline trait 구현)
//! - [`config`]: 파이프라인 설정 (core 설정 확장)
//! - [`error`]: 도메인 에러 타입
//!
//! # 아키텍처
//!
//! ```text
//! LineCollector -> mpsc -> Ingestor -> BatchBuffer -> Flusher -> LogSink (HTTP POST)
//!                             |                         |
//!                    Filter + Normalizer          5s tick, swap
//! ```

pub mod buffer;
pub mod config;
pub mod error;
pub mod filter;
pub mod flusher;
pub mod ingest;
pub mod normalizer;
pub mod pipeline;
pub mod severity;
pub mod sink;
pub mod stats;

pub mod collector;

// --- 주요 타입 re-export ---

// 파이프라인
pub use pipeline::{LogPipeline, LogPipelineBuilder};

// 설정
pub use config::{AdapterConfig, PipelineConfig, PipelineConfigBuilder};

// 에러
pub use error::LogPipelineError;

// 정규화/필터
pub use filter::FilterRules;
pub use normalizer::normalize;
pub use severity::{Severity, classify};

// 버퍼/전송
pub use buffer::BatchBuffer;
pub use flusher::{FlushOutcome, Flusher};
pub use ingest::Ingestor;
pub use sink::HttpSink;
pub use stats::PipelineStats;

// 수집기
pub use collector::LineCollector;
