//! 심각도 분류기
//!
//! 레벨 이름을 표준 심각도 번호로 매핑합니다.
//!
//! | 레벨 | 번호 |
//! |------|------|
//! | TRACE | 1 |
//! | DEBUG | 5 |
//! | INFO | 9 |
//! | WARN, WARNING | 13 |
//! | ERROR | 17 |
//! | FATAL | 21 |
//!
//! 분류는 항상 성공합니다. 알 수 없는 레벨은 번호 0과 소문자 입력을 그대로 사용합니다.

use std::fmt;

/// 레벨 키워드와 번호 테이블
pub const LEVELS: [(&str, i32); 7] = [
    ("TRACE", 1),
    ("DEBUG", 5),
    ("INFO", 9),
    ("WARN", 13),
    ("WARNING", 13),
    ("ERROR", 17),
    ("FATAL", 21),
];

/// 본문 탐색 순서 (심각한 것 우선)
///
/// `WARNING`은 `WARN`을 포함하므로 먼저 검사해야 `warning`으로 분류됩니다.
const SCAN_ORDER: [&str; 7] = ["FATAL", "ERROR", "WARNING", "WARN", "INFO", "DEBUG", "TRACE"];

/// 알 수 없는 레벨의 번호
pub const UNKNOWN_SEVERITY_NUMBER: i32 = 0;

/// 분류된 심각도
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Severity {
    /// 소문자 레벨 이름
    pub text: String,
    /// 심각도 번호
    pub number: i32,
}

impl Severity {
    /// 기본 심각도 (`info` / 9)
    pub fn info() -> Self {
        classify("info")
    }
}

impl Default for Severity {
    fn default() -> Self {
        Self::info()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.text, self.number)
    }
}

/// 레벨 이름의 심각도 번호를 조회합니다 (대소문자 무시).
pub fn level_number(token: &str) -> Option<i32> {
    let upper = token.to_uppercase();
    LEVELS
        .iter()
        .find(|(name, _)| *name == upper)
        .map(|(_, number)| *number)
}

/// 레벨 토큰을 분류합니다.
pub fn classify(token: &str) -> Severity {
    Severity {
        text: token.to_lowercase(),
        number: level_number(token).unwrap_or(UNKNOWN_SEVERITY_NUMBER),
    }
}

/// 자유 텍스트에서 레벨 키워드를 찾습니다.
///
/// 대소문자를 구분하며, 여러 키워드가 있으면 가장 심각한 것을 반환합니다.
pub fn scan(text: &str) -> Option<Severity> {
    SCAN_ORDER
        .iter()
        .find(|keyword| text.contains(*keyword))
        .map(|keyword| classify(keyword))
}
