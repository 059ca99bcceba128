//! mydumper 메타데이터 파서
//!
//! mydumper가 덤프와 함께 남기는 `metadata` 파일에서
//! 복제/임포트 재시작 지점을 읽습니다.
//! 주요 기능:
//! - Binlog 위치 (`Log` + `Pos`) 추출
//! - GTID 문자열 추출 및 선택적 GTID 집합 파싱
//! - `SHOW SLAVE STATUS` 이후 구간 무시

pub mod config;
pub mod error;
pub mod gtid;
pub mod metadata;
pub mod offset;

pub use config::{CliConfig, OutputFormat};
pub use error::{MetaError, ParseMetaErrorKind, Result};
pub use gtid::GtidSet;
pub use metadata::{parse_metadata, parse_metadata_async, parse_metadata_from_reader, DumpMetadata};
pub use offset::BinlogPosition;
