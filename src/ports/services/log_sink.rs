use crate::domain::models::{FlushOutcome, LogRecord, SinkConfig};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Port for the batch upload service of one sink instance
#[async_trait]
pub trait LogSink: Send + Sync + 'static {
    /// Configuration this sink was built with
    fn config(&self) -> &SinkConfig;

    /// Upload one flush cycle's records as a single object keyed by the
    /// current time
    async fn flush(&self, records: Vec<LogRecord>) -> FlushOutcome {
        self.flush_at(records, Utc::now()).await
    }

    /// Same as `flush` with an explicit key timestamp
    async fn flush_at(&self, records: Vec<LogRecord>, now: DateTime<Utc>) -> FlushOutcome;
}
