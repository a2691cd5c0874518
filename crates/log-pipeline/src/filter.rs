//! 라우트 필터
//!
//! [`FilterRules`]는 컨테이너 ID, 이름 glob, 출력 스트림, 라벨 규칙으로
//! 엔트리를 걸러냅니다. 설정된 규칙은 모두 통과해야 하며(AND),
//! 설정되지 않은 규칙은 항상 통과합니다.
//!
//! # 라우트 옵션
//! | 키 | 형식 |
//! |----|------|
//! | `filter.id` | 컨테이너 ID |
//! | `filter.name` | 이름 glob (`*_db`, `web_*`) |
//! | `filter.sources` | 쉼표 구분 스트림 목록 (`stdout,stderr`) |
//! | `filter.labels` | 쉼표 구분 `key:pattern` 목록 |

use std::collections::HashMap;

use logship_core::config::{FilterSection, parse_csv, parse_label_rules};
use logship_core::types::RawLogEntry;

use crate::error::LogPipelineError;

/// 라벨 규칙 (라벨 키 + glob 패턴)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelRule {
    /// 라벨 키
    pub key: String,
    /// 값 glob 패턴
    pub pattern: String,
}

/// 필터 규칙 집합
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterRules {
    /// 컨테이너 ID 일치
    pub id: Option<String>,
    /// 컨테이너 이름 glob
    pub name: Option<String>,
    /// 허용 스트림 목록 (비어 있으면 미설정)
    pub sources: Vec<String>,
    /// 라벨 규칙 목록 (비어 있으면 미설정)
    pub labels: Vec<LabelRule>,
}

impl FilterRules {
    /// 호스트 라우트 옵션에서 규칙을 생성합니다.
    pub fn from_route_options(options: &HashMap<String, String>) -> Result<Self, LogPipelineError> {
        let get = |key: &str| options.get(key).map(String::as_str).unwrap_or_default();
        Self::parse(
            get("filter.id"),
            get("filter.name"),
            get("filter.sources"),
            get("filter.labels"),
        )
    }

    /// core 설정의 `[filter]` 섹션에서 규칙을 생성합니다.
    pub fn from_section(section: &FilterSection) -> Result<Self, LogPipelineError> {
        Self::parse(&section.id, &section.name, &section.sources, &section.labels)
    }

    fn parse(id: &str, name: &str, sources: &str, labels: &str) -> Result<Self, LogPipelineError> {
        let labels = parse_label_rules(labels)?
            .into_iter()
            .map(|(key, pattern)| LabelRule { key, pattern })
            .collect();

        Ok(Self {
            id: non_empty(id),
            name: non_empty(name),
            sources: parse_csv(sources),
            labels,
        })
    }

    /// 설정된 규칙이 하나도 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.name.is_none() && self.sources.is_empty() && self.labels.is_empty()
    }

    /// 엔트리를 처리해야 하는지 판단합니다.
    pub fn should_process(&self, entry: &RawLogEntry) -> bool {
        let container = &entry.container;

        if let Some(id) = &self.id {
            if container.id != *id {
                return false;
            }
        }

        if let Some(pattern) = &self.name {
            let name = container.name.strip_prefix('/').unwrap_or(&container.name);
            if !glob_match(pattern, name) {
                return false;
            }
        }

        if !self.sources.is_empty() && !self.sources.iter().any(|s| *s == entry.source) {
            return false;
        }

        self.labels.iter().all(|rule| {
            container
                .label(&rule.key)
                .is_some_and(|value| glob_match(&rule.pattern, value))
        })
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_owned())
}

/// 단일 와일드카드 glob 매칭
///
/// - `*` : 모든 문자열
/// - `*suffix` : 접미사 일치
/// - `prefix*` : 접두사 일치
/// - 그 외 : 정확히 일치
///
/// 앞 또는 뒤의 `*` 하나만 해석합니다.
pub fn glob_match(pattern: &str, text: &str) -> bool {
    if let Some(suffix) = pattern.strip_prefix('*') {
        return text.ends_with(suffix);
    }
    if let Some(prefix) = pattern.strip_suffix('*') {
        return text.starts_with(prefix);
    }
    pattern == text
}

#[cfg(test)]
mod tests {
    use super::*;
    use logship_core::types::ContainerInfo;

    fn entry(id: &str, name: &str, source: &str, labels: &[(&str, &str)]) -> RawLogEntry {
        let container = ContainerInfo {
            id: id.to_owned(),
            name: name.to_owned(),
            image: "busybox".to_owned(),
            labels: labels
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
        };
        RawLogEntry::new("hello", source, container)
    }

    fn options(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn glob_match_wildcard_all() {
        assert!(glob_match("*", "anything"));
        assert!(glob_match("*", ""));
    }

    #[test]
    fn glob_match_exact() {
        assert!(glob_match("web", "web"));
        assert!(!glob_match("web", "web1"));
    }

    #[test]
    fn glob_match_suffix_wildcard() {
        assert!(glob_match("*_db", "postgres_db"));
        assert!(!glob_match("*_db", "postgres_app"));
    }

    #[test]
    fn glob_match_prefix_wildcard() {
        assert!(glob_match("test_*", "test_container"));
        assert!(!glob_match("test_*", "other_container"));
    }

    #[test]
    fn no_rules_processes_everything() {
        let rules = FilterRules::default();
        assert!(rules.is_empty());
        assert!(rules.should_process(&entry("abc", "/web", "stdout", &[])));
    }

    #[test]
    fn name_rule_strips_leading_slash() {
        let rules = FilterRules::from_route_options(&options(&[("filter.name", "*_db")])).unwrap();
        assert!(rules.should_process(&entry("1", "postgres_db", "stdout", &[])));
        assert!(rules.should_process(&entry("1", "/postgres_db", "stdout", &[])));
        assert!(!rules.should_process(&entry("1", "/postgres_app", "stdout", &[])));
    }

    #[test]
    fn id_rule_requires_exact_match() {
        let rules = FilterRules::from_route_options(&options(&[("filter.id", "abc123")])).unwrap();
        assert!(rules.should_process(&entry("abc123", "/web", "stdout", &[])));
        assert!(!rules.should_process(&entry("abc1234", "/web", "stdout", &[])));
    }

    #[test]
    fn sources_rule_is_allow_list() {
        let rules =
            FilterRules::from_route_options(&options(&[("filter.sources", "stdout, stderr")]))
                .unwrap();
        assert_eq!(rules.sources, vec!["stdout", "stderr"]);
        assert!(rules.should_process(&entry("1", "/web", "stderr", &[])));
        assert!(!rules.should_process(&entry("1", "/web", "tty", &[])));
    }

    #[test]
    fn labels_rule_requires_present_matching_label() {
        let rules = FilterRules::from_route_options(&options(&[(
            "filter.labels",
            "app:web*,tier:*end",
        )]))
        .unwrap();

        assert!(rules.should_process(&entry(
            "1",
            "/x",
            "stdout",
            &[("app", "web-frontend"), ("tier", "backend")]
        )));
        // tier 라벨 없음
        assert!(!rules.should_process(&entry("1", "/x", "stdout", &[("app", "web-frontend")])));
        // app 값 불일치
        assert!(!rules.should_process(&entry(
            "1",
            "/x",
            "stdout",
            &[("app", "api"), ("tier", "backend")]
        )));
    }

    #[test]
    fn combined_rules_all_must_pass() {
        let rules = FilterRules::from_route_options(&options(&[
            ("filter.id", "abc"),
            ("filter.sources", "stdout"),
            ("filter.labels", "team:core"),
        ]))
        .unwrap();

        assert!(rules.should_process(&entry("abc", "/a", "stdout", &[("team", "core")])));
        assert!(!rules.should_process(&entry("xyz", "/a", "stdout", &[("team", "core")])));
        assert!(!rules.should_process(&entry("abc", "/a", "stderr", &[("team", "core")])));
        assert!(!rules.should_process(&entry("abc", "/a", "stdout", &[("team", "edge")])));
    }

    #[test]
    fn malformed_label_option_is_config_error() {
        let err = FilterRules::from_route_options(&options(&[("filter.labels", "app")]))
            .unwrap_err();
        assert!(matches!(err, LogPipelineError::Config { .. }));
    }

    #[test]
    fn empty_options_are_unconfigured() {
        let rules = FilterRules::from_route_options(&options(&[
            ("filter.id", ""),
            ("filter.name", " "),
            ("filter.sources", ""),
        ]))
        .unwrap();
        assert!(rules.is_empty());
    }

    #[test]
    fn from_section_matches_route_options() {
        let section = FilterSection {
            id: String::new(),
            name: "web_*".to_owned(),
            sources: "stdout".to_owned(),
            labels: String::new(),
        };
        let rules = FilterRules::from_section(&section).unwrap();
        assert_eq!(rules.name.as_deref(), Some("web_*"));
        assert!(rules.should_process(&entry("1", "/web_1", "stdout", &[])));
    }
}
