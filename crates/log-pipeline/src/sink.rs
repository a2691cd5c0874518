//! HTTP 전송 싱크
//!
//! [`HttpSink`]는 배치를 JSON 배열로 직렬화하여 수집 엔드포인트에 한 번 POST 합니다.
//! 응답 코드가 정확히 200이 아니면 실패입니다. 재시도하지 않습니다 (at-most-once).

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use logship_core::error::DeliveryError;
use logship_core::pipeline::LogSink;
use logship_core::types::LogRecord;

/// 에러 메시지에 포함할 응답 본문 최대 길이
const MAX_ERROR_BODY_LEN: usize = 512;

/// reqwest 기반 HTTP 싱크
#[derive(Debug, Clone)]
pub struct HttpSink {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSink {
    /// 엔드포인트와 요청 타임아웃으로 싱크를 생성합니다.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, DeliveryError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DeliveryError::Client(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// 수집 엔드포인트 URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl LogSink for HttpSink {
    fn name(&self) -> &str {
        "http"
    }

    async fn deliver(&self, batch: Vec<LogRecord>) -> Result<(), DeliveryError> {
        let body =
            serde_json::to_vec(&batch).map_err(|e| DeliveryError::Serialize(e.to_string()))?;

        debug!(
            endpoint = self.endpoint.as_str(),
            records = batch.len(),
            bytes = body.len(),
            "sending batch"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY_LEN {
                let cut = (0..=MAX_ERROR_BODY_LEN)
                    .rev()
                    .find(|i| body.is_char_boundary(*i))
                    .unwrap_or(0);
                body.truncate(cut);
            }
            return Err(DeliveryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}
