//! mydumper `metadata` 파일 파싱
//!
//! mydumper는 덤프 시점의 복제 좌표를 다음과 같은 텍스트로 남깁니다:
//!
//! ```text
//! Started dump at: 2020-01-01 00:00:00
//! SHOW MASTER STATUS:
//!     Log: mysql-bin.000002
//!     Pos: 100
//!     GTID: 3E11FA47-71CA-11E1-9E33-C80AA9429562:1-5
//!
//! SHOW SLAVE STATUS:
//!     Master_Log_File: mysql-bin.000099
//! Finished dump at: 2020-01-01 00:00:05
//! ```
//!
//! `SHOW MASTER STATUS` 구간의 Log / Pos / GTID만 읽고,
//! `SHOW SLAVE STATUS` 이후는 읽지 않습니다.

use crate::error::{MetaError, ParseMetaErrorKind, Result};
use crate::gtid::GtidSet;
use crate::offset::BinlogPosition;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::num::ParseIntError;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const SLAVE_STATUS_MARKER: &str = "SHOW SLAVE STATUS";
const DUMP_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 메타 파일에서 읽은 덤프 시점 정보
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DumpMetadata {
    /// `Log` + `Pos` 로 만든 binlog 위치
    pub position: Option<BinlogPosition>,
    /// `GTID` 값 (검증하지 않은 원문)
    pub gtid: Option<String>,
    /// `Started dump at` 시각
    pub started_at: Option<NaiveDateTime>,
    /// `Finished dump at` 시각
    pub finished_at: Option<NaiveDateTime>,
}

impl DumpMetadata {
    /// 위치와 GTID 둘 다 없는 경우
    pub fn is_empty(&self) -> bool {
        self.position.is_none() && self.gtid.is_none()
    }

    /// GTID 문자열을 `GtidSet`으로 파싱
    pub fn gtid_set(&self) -> Result<Option<GtidSet>> {
        self.gtid.as_deref().map(GtidSet::parse).transpose()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "file": self.position.as_ref().map(|p| p.name.as_str()),
            "pos": self.position.as_ref().map(|p| p.pos),
            "gtid": self.gtid,
            "started_at": self.started_at.map(|t| t.format(DUMP_TIME_FORMAT).to_string()),
            "finished_at": self.finished_at.map(|t| t.format(DUMP_TIME_FORMAT).to_string()),
        })
    }
}

/// 한 줄의 분류 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MetaLine<'a> {
    Blank,
    SlaveStatus,
    Field { key: &'a str, value: &'a str },
    /// ':'가 없는 줄 (무시)
    Unstructured,
}

fn classify_line(line: &str) -> MetaLine<'_> {
    let line = line.trim();
    if line.is_empty() {
        return MetaLine::Blank;
    }
    if line.contains(SLAVE_STATUS_MARKER) {
        return MetaLine::SlaveStatus;
    }
    match line.split_once(':') {
        Some((key, value)) => MetaLine::Field {
            key: key.trim(),
            value: value.trim(),
        },
        None => MetaLine::Unstructured,
    }
}

/// 파싱 호출 하나에서만 쓰이는 누적 상태
#[derive(Debug, Default)]
struct MetaAccumulator {
    pending_log: Option<String>,
    meta: DumpMetadata,
}

impl MetaAccumulator {
    fn apply(&mut self, key: &str, value: &str, source: &str) -> Result<()> {
        match key {
            "Log" => {
                debug!("Log: {}", value);
                self.pending_log = Some(value.to_string());
            }
            "Pos" => {
                debug!("Pos: {}", value);
                let pos = parse_pos(value).map_err(|cause| {
                    MetaError::parse_meta(
                        source,
                        ParseMetaErrorKind::InvalidPos {
                            value: value.to_string(),
                            cause,
                        },
                    )
                })?;
                match self.pending_log.as_deref() {
                    Some(name) if !name.is_empty() => {
                        self.meta.position = Some(BinlogPosition::new(name, pos));
                    }
                    _ => return Err(MetaError::parse_meta(source, ParseMetaErrorKind::InvalidFormat)),
                }
            }
            "GTID" => {
                debug!("GTID: {}", value);
                // 빈 값은 GTID 없음
                self.meta.gtid = (!value.is_empty()).then(|| value.to_string());
            }
            "Started dump at" => self.meta.started_at = parse_dump_time(key, value),
            "Finished dump at" => self.meta.finished_at = parse_dump_time(key, value),
            _ => {}
        }
        Ok(())
    }
}

/// 부호 없는 10진수만 허용 (`+4`, `-1` 거부)
fn parse_pos(value: &str) -> std::result::Result<u32, Option<ParseIntError>> {
    if !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(None);
    }
    value.parse::<u32>().map_err(Some)
}

fn parse_dump_time(key: &str, value: &str) -> Option<NaiveDateTime> {
    match NaiveDateTime::parse_from_str(value, DUMP_TIME_FORMAT) {
        Ok(t) => Some(t),
        Err(e) => {
            debug!("Ignoring unparsable '{}' value {:?}: {}", key, value, e);
            None
        }
    }
}

/// 메타 파일을 열어 파싱
///
/// 파일 열기 실패도 `MetaError::ParseMydumperMeta`로 반환합니다.
pub fn parse_metadata<P: AsRef<Path>>(path: P) -> Result<DumpMetadata> {
    let path = path.as_ref();
    let source = path.display().to_string();
    let file = File::open(path).map_err(|e| MetaError::parse_meta(source.as_str(), e))?;
    parse_metadata_from_reader(BufReader::new(file), &source)
}

/// 임의의 줄 스트림에서 메타데이터 파싱
///
/// `source`는 에러 메시지에 들어갈 입력 이름입니다.
/// `\n`, `\r\n`, `\r` 모두 줄 끝으로 인정합니다.
/// UTF-8이 아닌 바이트는 U+FFFD로 바꿔 읽습니다.
pub fn parse_metadata_from_reader<R: BufRead>(mut reader: R, source: &str) -> Result<DumpMetadata> {
    let mut acc = MetaAccumulator::default();
    let mut buf = Vec::new();

    'scan: loop {
        buf.clear();
        let n = reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| MetaError::parse_meta(source, e))?;
        if n == 0 {
            break;
        }

        let text = String::from_utf8_lossy(&buf);
        for line in text.split('\r') {
            match classify_line(line) {
                MetaLine::Blank | MetaLine::Unstructured => continue,
                MetaLine::SlaveStatus => {
                    debug!("Reached '{}' in {}, stop scanning", SLAVE_STATUS_MARKER, source);
                    break 'scan;
                }
                MetaLine::Field { key, value } => acc.apply(key, value, source)?,
            }
        }
    }

    let meta = acc.meta;
    info!(
        "Parsed mydumper metadata {}: position={}, gtid={}",
        source,
        meta.position
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "none".to_string()),
        meta.gtid.as_deref().unwrap_or("none")
    );
    Ok(meta)
}

/// 블로킹 파싱을 tokio 블로킹 풀에서 실행
///
/// 호출 측에서 `tokio::time::timeout` 등으로 감쌀 수 있습니다.
pub async fn parse_metadata_async(path: PathBuf) -> Result<DumpMetadata> {
    tokio::task::spawn_blocking(move || parse_metadata(path))
        .await
        .map_err(|e| MetaError::Task(e.to_string()))?
}
