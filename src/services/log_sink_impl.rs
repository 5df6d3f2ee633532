use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, warn, Level};

use crate::{
    domain::models::{FlushOutcome, LogRecord, SinkConfig},
    ports::{services::LogSink, storage::ObjectStore},
    services::{Compressor, ObjectKeyGenerator, RecordEncoder},
};

/// One configured sink instance: encodes a flush cycle's records, joins
/// them into one NDJSON payload, optionally gzips it, and uploads it as a
/// single object.
///
/// Nothing here is mutated after construction, so one instance can serve
/// concurrent flushes.
#[derive(Clone)]
pub struct LogSinkImpl {
    config: Arc<SinkConfig>,
    store: Arc<dyn ObjectStore>,
    encoder: RecordEncoder,
    keys: ObjectKeyGenerator,
    compressor: Compressor,
    operator_id: usize,
}

impl LogSinkImpl {
    pub fn new(config: SinkConfig, store: Arc<dyn ObjectStore>) -> Self {
        let keys = ObjectKeyGenerator::from_config(&config);
        let compressor = Compressor::new(config.compression);
        Self {
            config: Arc::new(config),
            store,
            encoder: RecordEncoder::new(),
            keys,
            compressor,
            operator_id: 0,
        }
    }

    /// Tag log lines with the host's route id
    pub fn with_operator_id(mut self, operator_id: usize) -> Self {
        self.operator_id = operator_id;
        self
    }

    pub fn operator_id(&self) -> usize {
        self.operator_id
    }

    /// Whether this sink's configured verbosity admits `level`
    fn logs(&self, level: Level) -> bool {
        self.config.log_level.enables(level)
    }

    /// Encode every record, skipping the ones that fail, into one
    /// newline-terminated payload.
    fn build_payload(&self, records: &[LogRecord]) -> (Vec<u8>, usize) {
        let mut payload = String::new();
        let mut encoded = 0;

        for record in records {
            let (line, err) = self.encoder.encode_or_placeholder(record);
            if let Some(err) = err {
                if self.logs(Level::WARN) {
                    warn!(
                        operator_id = self.operator_id,
                        error = %err,
                        placeholder = %line,
                        "error creating message for S3"
                    );
                }
                continue;
            }
            payload.push_str(&line);
            payload.push('\n');
            encoded += 1;
        }

        (payload.into_bytes(), encoded)
    }
}

#[async_trait]
impl LogSink for LogSinkImpl {
    fn config(&self) -> &SinkConfig {
        &self.config
    }

    async fn flush_at(&self, records: Vec<LogRecord>, now: DateTime<Utc>) -> FlushOutcome {
        let (payload, encoded) = self.build_payload(&records);

        let key = match self.keys.generate(now) {
            Ok(key) => key,
            Err(err) => {
                if self.logs(Level::WARN) {
                    warn!(operator_id = self.operator_id, error = %err, "invalid object key");
                }
                return FlushOutcome::Retry;
            }
        };

        let body = match self.compressor.apply(payload) {
            Ok(body) => body,
            Err(err) => {
                if self.logs(Level::WARN) {
                    warn!(operator_id = self.operator_id, error = %err, "error compressing batch");
                }
                return FlushOutcome::Retry;
            }
        };

        let bytes = body.len();
        let content_type = self.config.compression.content_type();
        if let Err(err) = self.store.put_object(&key, body, Some(content_type)).await {
            if self.logs(Level::WARN) {
                warn!(
                    operator_id = self.operator_id,
                    key = %key,
                    error = %err,
                    "error sending message for S3"
                );
            }
            return FlushOutcome::Retry;
        }

        if self.logs(Level::DEBUG) {
            debug!(
                operator_id = self.operator_id,
                bucket = %self.config.bucket,
                key = %key,
                records = encoded,
                skipped = records.len() - encoded,
                bytes,
                "uploaded batch"
            );
        }
        FlushOutcome::Success
    }
}
