use std::io::{self, Write};

use chrono::{DateTime, Utc};
use flate2::{Compression, GzBuilder};

use crate::domain::models::CompressionMode;

/// Member name written into every gzip header
pub const ARCHIVE_NAME: &str = "s3-log-sink";

/// Gzip-wraps batch payloads when the sink is configured for it.
#[derive(Debug, Clone, Copy)]
pub struct Compressor {
    mode: CompressionMode,
}

impl Compressor {
    pub fn new(mode: CompressionMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> CompressionMode {
        self.mode
    }

    /// Transform a payload per the configured mode; plain passes through.
    pub fn apply(&self, payload: Vec<u8>) -> io::Result<Vec<u8>> {
        match self.mode {
            CompressionMode::Plain => Ok(payload),
            CompressionMode::Gzip => compress(&payload),
        }
    }
}

/// Gzip `payload`, stamping the current time as the modification time
pub fn compress(payload: &[u8]) -> io::Result<Vec<u8>> {
    compress_at(payload, Utc::now())
}

/// Gzip `payload` with an explicit modification time
pub fn compress_at(payload: &[u8], mtime: DateTime<Utc>) -> io::Result<Vec<u8>> {
    // gzip stores mtime as 32-bit unix seconds; 0 means "not set"
    let mtime = u32::try_from(mtime.timestamp()).unwrap_or(0);

    let mut encoder = GzBuilder::new()
        .filename(ARCHIVE_NAME)
        .mtime(mtime)
        .write(Vec::with_capacity(payload.len() / 2), Compression::default());
    encoder.write_all(payload)?;
    encoder.finish()
}
