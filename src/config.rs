//! CLI 설정 (인자 + 환경 변수)

use crate::error::{MetaError, Result};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const ENV_PATH: &str = "MYDUMPER_META_PATH";
pub const ENV_TIMEOUT_SECS: &str = "MYDUMPER_META_TIMEOUT_SECS";
pub const ENV_OUTPUT: &str = "MYDUMPER_META_OUTPUT";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// 결과 출력 형식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    /// `file:pos` 와 GTID를 한 줄씩
    Text,
}

impl FromStr for OutputFormat {
    type Err = MetaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "text" => Ok(OutputFormat::Text),
            other => Err(MetaError::Config(format!("Unknown output format: {}", other))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CliConfig {
    /// mydumper `metadata` 파일 경로
    pub path: PathBuf,
    pub timeout: Duration,
    pub output: OutputFormat,
}

impl CliConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CliConfig {
            path: path.into(),
            timeout: DEFAULT_TIMEOUT,
            output: OutputFormat::default(),
        }
    }

    /// 프로세스 인자와 환경 변수에서 설정 로드
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(std::env::args().skip(1), |key| std::env::var(key).ok())
    }

    /// 첫 번째 위치 인자가 경로, 없으면 `MYDUMPER_META_PATH`
    pub fn from_lookup<I, F>(mut args: I, lookup: F) -> Result<Self>
    where
        I: Iterator<Item = String>,
        F: Fn(&str) -> Option<String>,
    {
        let path = args
            .next()
            .or_else(|| lookup(ENV_PATH))
            .ok_or_else(|| {
                MetaError::Config(format!("metadata 파일 경로가 필요합니다 (인자 또는 {})", ENV_PATH))
            })?;

        let timeout = lookup(ENV_TIMEOUT_SECS)
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);

        let output = match lookup(ENV_OUTPUT) {
            Some(v) => v.parse()?,
            None => OutputFormat::default(),
        };

        Ok(CliConfig {
            path: PathBuf::from(path),
            timeout,
            output,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| env.get(key).cloned()
    }

    #[test]
    fn test_path_from_args_wins() {
        let config = CliConfig::from_lookup(
            vec!["/dump/metadata".to_string()].into_iter(),
            lookup_from(&[(ENV_PATH, "/other/metadata")]),
        )
        .unwrap();
        assert_eq!(config.path, PathBuf::from("/dump/metadata"));
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.output, OutputFormat::Json);
    }

    #[test]
    fn test_env_values() {
        let config = CliConfig::from_lookup(
            std::iter::empty(),
            lookup_from(&[
                (ENV_PATH, "/dump/metadata"),
                (ENV_TIMEOUT_SECS, "5"),
                (ENV_OUTPUT, "TEXT"),
            ]),
        )
        .unwrap();
        assert_eq!(config.path, PathBuf::from("/dump/metadata"));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.output, OutputFormat::Text);
    }

    #[test]
    fn test_bad_timeout_falls_back() {
        let config = CliConfig::from_lookup(
            std::iter::empty(),
            lookup_from(&[(ENV_PATH, "m"), (ENV_TIMEOUT_SECS, "soon")]),
        )
        .unwrap();
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_missing_path_and_bad_output() {
        assert!(matches!(
            CliConfig::from_lookup(std::iter::empty(), lookup_from(&[])),
            Err(MetaError::Config(_))
        ));
        assert!(matches!(
            CliConfig::from_lookup(std::iter::empty(), lookup_from(&[(ENV_PATH, "m"), (ENV_OUTPUT, "xml")])),
            Err(MetaError::Config(_))
        ));
    }

    #[test]
    fn test_new_uses_defaults() {
        let config = CliConfig::new("metadata");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.output, OutputFormat::Json);
    }
}
