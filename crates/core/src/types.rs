//! 도메인 타입 -- 시스템 전역에서 사용되는 공통 타입
//!
//! 호스트 로그 라우터가 넘겨주는 입력([`RawLogEntry`])과
//! 수집 엔드포인트로 전송되는 정규화 레코드([`LogRecord`])를 정의합니다.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `service.name` 리소스 키 (항상 존재)
pub const RESOURCE_SERVICE_NAME: &str = "service.name";

/// `deployment.environment` 리소스 키
pub const RESOURCE_DEPLOYMENT_ENVIRONMENT: &str = "deployment.environment";

/// `namespace` 리소스 키
pub const RESOURCE_NAMESPACE: &str = "namespace";

/// docker compose가 서비스 이름을 기록하는 컨테이너 라벨
pub const COMPOSE_SERVICE_LABEL: &str = "com.docker.compose.service";

/// 컨테이너 정보
///
/// 로그를 출력한 컨테이너의 메타데이터입니다. 호스트가 소유하며 파이프라인은 읽기만 합니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerInfo {
    /// 컨테이너 ID
    pub id: String,
    /// 컨테이너 이름 (docker는 앞에 `/`를 붙여서 보고함)
    pub name: String,
    /// 이미지명
    pub image: String,
    /// 컨테이너 라벨
    pub labels: HashMap<String, String>,
}

impl ContainerInfo {
    /// 라벨 값을 조회합니다.
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }
}

impl fmt::Display for ContainerInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) image={}",
            self.name,
            self.id.get(..12).unwrap_or(self.id.as_str()),
            self.image,
        )
    }
}

/// 원시 로그 엔트리
///
/// 호스트 로그 라우터가 컨테이너 출력 한 줄마다 생성하는 입력 레코드입니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawLogEntry {
    /// 수신 시각
    #[serde(rename = "time", default = "Utc::now")]
    pub received_at: DateTime<Utc>,
    /// 로그 본문 (JSON일 수도, 자유 텍스트일 수도 있음)
    #[serde(default)]
    pub data: String,
    /// 출력 스트림 (`stdout` / `stderr`)
    #[serde(default)]
    pub source: String,
    /// 컨테이너 메타데이터
    #[serde(default)]
    pub container: ContainerInfo,
}

impl RawLogEntry {
    /// 현재 시각으로 새 엔트리를 생성합니다.
    pub fn new(data: impl Into<String>, source: impl Into<String>, container: ContainerInfo) -> Self {
        Self {
            received_at: Utc::now(),
            data: data.into(),
            source: source.into(),
            container,
        }
    }

    /// 수신 시각을 지정합니다.
    pub fn with_received_at(mut self, received_at: DateTime<Utc>) -> Self {
        self.received_at = received_at;
        self
    }
}

/// 정규화된 로그 레코드
///
/// 수집 엔드포인트의 와이어 형식 그대로 직렬화됩니다.
/// 생성 이후에는 변경되지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// epoch 기준 초
    pub timestamp: i64,
    /// 심각도 이름 (소문자)
    pub severity_text: String,
    /// 심각도 번호
    pub severity_number: i32,
    /// 표준 키 이외의 JSON 필드
    pub attributes: BTreeMap<String, String>,
    /// 식별 메타데이터 (`service.name`은 항상 존재)
    pub resources: BTreeMap<String, String>,
    /// 로그 메시지
    pub message: String,
}

impl LogRecord {
    /// 서비스 이름을 반환합니다.
    pub fn service_name(&self) -> &str {
        self.resources
            .get(RESOURCE_SERVICE_NAME)
            .map(String::as_str)
            .unwrap_or_default()
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.severity_text,
            self.service_name(),
            self.message,
        )
    }
}
