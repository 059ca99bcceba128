//! GTID (Global Transaction ID) 집합
//!
//! 형식: `uuid:interval[:interval...]`, 여러 서버는 ','로 구분
//! 예: "3E11FA47-71CA-11E1-9E33-C80AA9429562:1-5:11,550e8400-e29b-41d4-a716-446655440000:1-100"

use crate::error::{MetaError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// GTID 범위 (양 끝 포함)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GtidRange {
    pub start: u64,
    pub end: u64,
}

impl GtidRange {
    pub fn new(start: u64, end: u64) -> Result<Self> {
        if start == 0 {
            return Err(MetaError::Gtid("Sequence number must start at 1".to_string()));
        }
        if start > end {
            return Err(MetaError::Gtid(format!("Invalid range: {} > {}", start, end)));
        }
        Ok(GtidRange { start, end })
    }

    /// "n" 또는 "a-b" 형식 파싱
    fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let parse_seq = |v: &str| {
            v.trim()
                .parse::<u64>()
                .map_err(|_| MetaError::Gtid(format!("Invalid interval: {}", s)))
        };
        match s.split_once('-') {
            Some((start, end)) => GtidRange::new(parse_seq(start)?, parse_seq(end)?),
            None => {
                let seq = parse_seq(s)?;
                GtidRange::new(seq, seq)
            }
        }
    }

    pub fn contains(&self, value: u64) -> bool {
        value >= self.start && value <= self.end
    }

    /// 겹치거나 연접한 범위 병합
    pub fn merge(&self, other: &GtidRange) -> Option<GtidRange> {
        if self.end.saturating_add(1) >= other.start && other.end.saturating_add(1) >= self.start {
            Some(GtidRange {
                start: self.start.min(other.start),
                end: self.end.max(other.end),
            })
        } else {
            None
        }
    }
}

impl fmt::Display for GtidRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// 서버 UUID 하나의 GTID 범위들 (정렬, 병합된 상태 유지)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UuidGtidSet {
    pub uuid: Uuid,
    pub ranges: Vec<GtidRange>,
}

impl UuidGtidSet {
    pub fn new(uuid: Uuid) -> Self {
        UuidGtidSet {
            uuid,
            ranges: Vec::new(),
        }
    }

    pub fn insert_range(&mut self, range: GtidRange) {
        self.ranges.push(range);
        self.ranges.sort();

        let mut merged: Vec<GtidRange> = Vec::with_capacity(self.ranges.len());
        for range in self.ranges.drain(..) {
            match merged.last_mut() {
                Some(last) => match last.merge(&range) {
                    Some(joined) => *last = joined,
                    None => merged.push(range),
                },
                None => merged.push(range),
            }
        }
        self.ranges = merged;
    }

    pub fn contains(&self, sequence: u64) -> bool {
        self.ranges.iter().any(|r| r.contains(sequence))
    }
}

impl fmt::Display for UuidGtidSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.uuid)?;
        for range in &self.ranges {
            write!(f, ":{}", range)?;
        }
        Ok(())
    }
}

/// 전체 GTID 집합 (여러 UUID)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GtidSet {
    pub sets: BTreeMap<Uuid, UuidGtidSet>,
}

impl GtidSet {
    pub fn new() -> Self {
        GtidSet {
            sets: BTreeMap::new(),
        }
    }

    pub fn parse(gtid_str: &str) -> Result<Self> {
        let mut gtid_set = GtidSet::new();

        for part in gtid_str.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }

            let mut fields = part.split(':');
            let sid = fields.next().unwrap_or_default().trim();
            let uuid = Uuid::parse_str(sid)
                .map_err(|e| MetaError::Gtid(format!("Invalid source id '{}': {}", sid, e)))?;

            let uuid_set = gtid_set
                .sets
                .entry(uuid)
                .or_insert_with(|| UuidGtidSet::new(uuid));

            let mut interval_count = 0;
            for interval in fields {
                uuid_set.insert_range(GtidRange::parse(interval)?);
                interval_count += 1;
            }
            if interval_count == 0 {
                return Err(MetaError::Gtid(format!("Missing interval: {}", part)));
            }
        }

        Ok(gtid_set)
    }

    /// 단일 GTID 추가 (format: "uuid:sequence")
    pub fn add_gtid(&mut self, gtid: &str) -> Result<()> {
        let (uuid, sequence) = split_gtid(gtid)
            .ok_or_else(|| MetaError::Gtid(format!("Invalid GTID format: {}", gtid)))?;

        self.sets
            .entry(uuid)
            .or_insert_with(|| UuidGtidSet::new(uuid))
            .insert_range(GtidRange::new(sequence, sequence)?);
        Ok(())
    }

    pub fn contains(&self, gtid: &str) -> bool {
        match split_gtid(gtid) {
            Some((uuid, sequence)) => self
                .sets
                .get(&uuid)
                .is_some_and(|set| set.contains(sequence)),
            None => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sets.values().all(|set| set.ranges.is_empty())
    }
}

impl fmt::Display for GtidSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for set in self.sets.values().filter(|set| !set.ranges.is_empty()) {
            if !first {
                f.write_str(",")?;
            }
            write!(f, "{}", set)?;
            first = false;
        }
        Ok(())
    }
}

fn split_gtid(gtid: &str) -> Option<(Uuid, u64)> {
    let (uuid, sequence) = gtid.trim().split_once(':')?;
    let uuid = Uuid::parse_str(uuid).ok()?;
    let sequence = sequence.parse().ok()?;
    Some((uuid, sequence))
}
