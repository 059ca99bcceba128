//! 덤프 시점의 binlog 위치
//!
//! Binlog 파일명 + 위치로 복제/임포트 재시작 지점을 나타냅니다.
//! 예: "mysql-bin.000003" 파일의 4097 바이트 위치

use serde::{Deserialize, Serialize};
use std::fmt;

/// Binlog 파일 위치 정보
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct BinlogPosition {
    /// 바이너리 로그 파일명 (e.g., "mysql-bin.000001")
    pub name: String,
    /// 바이트 위치
    pub pos: u32,
}

impl BinlogPosition {
    pub fn new(name: impl Into<String>, pos: u32) -> Self {
        BinlogPosition {
            name: name.into(),
            pos,
        }
    }

    /// 파일명에서 시퀀스 번호 추출
    pub fn file_sequence(&self) -> Option<u64> {
        let (_, suffix) = self.name.rsplit_once('.')?;
        suffix.parse().ok()
    }
}

impl fmt::Display for BinlogPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.pos)
    }
}
