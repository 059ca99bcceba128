//! mydumper 메타데이터 파싱 에러 타입

use std::io;
use std::num::ParseIntError;
use thiserror::Error;

/// 메타 파일 파싱 실패 원인
#[derive(Error, Debug)]
pub enum ParseMetaErrorKind {
    #[error("I/O 에러: {0}")]
    Io(#[from] io::Error),

    /// `Pos` 값이 u32 범위의 10진수가 아님
    #[error("Pos 값 '{value}' 파싱 실패: u32 범위의 부호 없는 10진수가 아님")]
    InvalidPos {
        value: String,
        /// 숫자 외 문자(부호 포함)로 거부된 경우 `None`
        #[source]
        cause: Option<ParseIntError>,
    },

    /// `Log` 없이 `Pos`가 먼저 나타남
    #[error("invalid format")]
    InvalidFormat,
}

#[derive(Error, Debug)]
pub enum MetaError {
    #[error("mydumper 메타 파일 파싱 에러 ({file}): {kind}")]
    ParseMydumperMeta {
        file: String,
        #[source]
        kind: ParseMetaErrorKind,
    },

    #[error("GTID 처리 에러: {0}")]
    Gtid(String),

    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("설정 에러: {0}")]
    Config(String),

    #[error("작업 실행 에러: {0}")]
    Task(String),

    #[error("Timeout 에러")]
    Timeout,
}

impl MetaError {
    pub(crate) fn parse_meta(file: impl Into<String>, kind: impl Into<ParseMetaErrorKind>) -> Self {
        MetaError::ParseMydumperMeta {
            file: file.into(),
            kind: kind.into(),
        }
    }

    /// 파싱 에러인 경우 그 원인 반환
    pub fn kind(&self) -> Option<&ParseMetaErrorKind> {
        match self {
            MetaError::ParseMydumperMeta { kind, .. } => Some(kind),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, MetaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_meta_message_names_source() {
        let err = MetaError::parse_meta("/tmp/dump/metadata", ParseMetaErrorKind::InvalidFormat);
        let msg = err.to_string();
        assert!(msg.contains("/tmp/dump/metadata"));
        assert!(msg.contains("invalid format"));
        assert!(matches!(err.kind(), Some(ParseMetaErrorKind::InvalidFormat)));
    }

    #[test]
    fn test_kind_is_none_for_other_errors() {
        assert!(MetaError::Timeout.kind().is_none());
    }
}
