//! Record feed: a background worker that reads records and a pump that
//! pushes them into the hub.
//!
//! ```text
//!   RecordSource ──► worker task ──► [bounded channel] ──► pump ──► Publisher
//! ```
//!
//! The worker owns all I/O; the pump only calls the hub's publish callback.

use async_trait::async_trait;
use gmtable_core::record::Record;
use gmtable_hub::Publisher;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::FeedSource;
use crate::error::AppError;

/// A source of records, read one at a time.
#[async_trait]
pub trait RecordSource: Send {
    /// Returns the next record, or `None` once the source is exhausted.
    async fn next_record(&mut self) -> Result<Option<Record>, AppError>;

    /// Number of malformed entries skipped so far.
    fn skipped(&self) -> usize {
        0
    }
}

#[async_trait]
impl<S: RecordSource + ?Sized> RecordSource for Box<S> {
    async fn next_record(&mut self) -> Result<Option<Record>, AppError> {
        (**self).next_record().await
    }

    fn skipped(&self) -> usize {
        (**self).skipped()
    }
}

/// Newline-delimited JSON records.
///
/// Blank lines are ignored. Lines that do not decode as a record are logged
/// and skipped.
pub struct LineSource<B> {
    lines: Lines<B>,
    line_number: usize,
    skipped: usize,
}

impl<B: AsyncBufRead + Unpin + Send> LineSource<B> {
    /// Reads records from `reader`.
    pub fn new(reader: B) -> Self {
        Self {
            lines: reader.lines(),
            line_number: 0,
            skipped: 0,
        }
    }
}

#[async_trait]
impl<B: AsyncBufRead + Unpin + Send> RecordSource for LineSource<B> {
    async fn next_record(&mut self) -> Result<Option<Record>, AppError> {
        while let Some(line) = self.lines.next_line().await? {
            self.line_number += 1;
            if line.trim().is_empty() {
                continue;
            }
            match Record::from_json(&line) {
                Ok(record) => return Ok(Some(record)),
                Err(e) => {
                    self.skipped += 1;
                    warn!(line = self.line_number, error = %e, "skipping malformed record");
                }
            }
        }
        Ok(None)
    }

    fn skipped(&self) -> usize {
        self.skipped
    }
}

/// Opens the configured feed.
///
/// # Errors
///
/// Returns `AppError::Io` if the feed file cannot be opened.
pub async fn open(feed: &FeedSource) -> Result<Box<dyn RecordSource>, AppError> {
    let source: Box<dyn RecordSource> = match feed {
        FeedSource::Stdin => Box::new(LineSource::new(BufReader::new(tokio::io::stdin()))),
        FeedSource::File(path) => {
            let file = tokio::fs::File::open(path).await?;
            Box::new(LineSource::new(BufReader::new(file)))
        }
    };
    Ok(source)
}

/// Totals reported once a feed is exhausted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedStats {
    /// Records read and published.
    pub published: usize,
    /// Malformed entries skipped by the source.
    pub skipped: usize,
    /// Total subscription deliveries across all published records.
    pub deliveries: usize,
}

/// What the worker read before it stopped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerReport {
    /// Records handed to the channel.
    pub read: usize,
    /// Malformed entries skipped.
    pub skipped: usize,
}

/// Spawns the worker that drains `source` into a bounded channel.
///
/// The worker stops when the source is exhausted, fails, or the receiver
/// is dropped.
pub fn spawn_worker<S>(
    mut source: S,
    capacity: usize,
) -> (
    mpsc::Receiver<Record>,
    JoinHandle<Result<WorkerReport, AppError>>,
)
where
    S: RecordSource + 'static,
{
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let handle = tokio::spawn(async move {
        let mut read = 0;
        while let Some(record) = source.next_record().await? {
            if tx.send(record).await.is_err() {
                debug!("feed receiver dropped, stopping worker");
                break;
            }
            read += 1;
        }
        Ok::<_, AppError>(WorkerReport {
            read,
            skipped: source.skipped(),
        })
    });
    (rx, handle)
}

/// Publishes every record received on `rx` until the channel closes.
///
/// Returns `(published, deliveries)`.
pub async fn pump(mut rx: mpsc::Receiver<Record>, publisher: &Publisher<Record>) -> (usize, usize) {
    let mut published = 0;
    let mut deliveries = 0;
    while let Some(record) = rx.recv().await {
        deliveries += publisher.publish(&record);
        published += 1;
    }
    (published, deliveries)
}

/// Runs `source` to exhaustion through a worker and pumps its records into
/// the hub behind `publisher`.
///
/// # Errors
///
/// Returns the worker's error if reading the source failed, or
/// `AppError::Worker` if the worker task panicked.
pub async fn run<S>(
    source: S,
    capacity: usize,
    publisher: &Publisher<Record>,
) -> Result<FeedStats, AppError>
where
    S: RecordSource + 'static,
{
    let (rx, worker) = spawn_worker(source, capacity);
    let (published, deliveries) = pump(rx, publisher).await;
    let report = worker.await??;
    debug!(read = report.read, published, "feed worker finished");
    Ok(FeedStats {
        published,
        skipped: report.skipped,
        deliveries,
    })
}
