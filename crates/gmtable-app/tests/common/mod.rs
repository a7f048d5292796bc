//! Shared test helpers for feed integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::Cursor;

use async_trait::async_trait;
use gmtable_app::error::AppError;
use gmtable_app::feed::{LineSource, RecordSource};
use gmtable_core::record::Record;

/// Encode `records` as a newline-delimited JSON feed.
pub fn jsonl(records: &[Record]) -> String {
    records
        .iter()
        .map(|r| r.to_json().unwrap())
        .collect::<Vec<_>>()
        .join("\n")
}

/// A line source over an in-memory feed.
pub fn line_source(text: String) -> LineSource<Cursor<Vec<u8>>> {
    LineSource::new(Cursor::new(text.into_bytes()))
}

/// A record source that yields a fixed list, then optionally fails.
pub struct ScriptedSource {
    records: VecDeque<Record>,
    fail_at_end: bool,
}

impl ScriptedSource {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records: records.into(),
            fail_at_end: false,
        }
    }

    pub fn failing_after(records: Vec<Record>) -> Self {
        Self {
            records: records.into(),
            fail_at_end: true,
        }
    }
}

#[async_trait]
impl RecordSource for ScriptedSource {
    async fn next_record(&mut self) -> Result<Option<Record>, AppError> {
        match self.records.pop_front() {
            Some(record) => Ok(Some(record)),
            None if self.fail_at_end => Err(AppError::Io(std::io::Error::other("feed closed"))),
            None => Ok(None),
        }
    }
}
