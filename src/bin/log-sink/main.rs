use anyhow::{bail, Context, Result};
use clap::Parser;
use s3_log_sink::{
    FlushOutcome, LogRecord, RawSinkSettings, SinkConfig, SinkHandle, SinkRegistry,
};
use std::{path::PathBuf, time::Duration};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{fmt, prelude::*, reload, Registry};

type LevelHandle = reload::Handle<LevelFilter, Registry>;

#[derive(Parser, Debug)]
#[command(name = "log-sink")]
#[command(about = "Batch newline-delimited JSON log records into S3 objects", long_about = None)]
struct Cli {
    /// Input file of JSON records, one per line; stdin when omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Records per uploaded object
    #[arg(long, env = "LOG_SINK_BATCH_SIZE", default_value = "1000")]
    batch_size: usize,

    /// Extra flush attempts after a retryable failure
    #[arg(long, env = "LOG_SINK_MAX_RETRIES", default_value = "3")]
    max_retries: u32,

    /// Pause between flush attempts, in milliseconds
    #[arg(long, env = "LOG_SINK_RETRY_DELAY_MS", default_value = "1000")]
    retry_delay_ms: u64,

    /// Shared credentials file (profile "default")
    #[arg(long, env = "S3_CREDENTIAL_FILE", default_value = "")]
    credential: String,

    #[arg(long, env = "S3_ACCESS_KEY_ID", default_value = "")]
    access_key_id: String,

    #[arg(long, env = "S3_SECRET_ACCESS_KEY", default_value = "", hide_env_values = true)]
    secret_access_key: String,

    #[arg(long, env = "S3_BUCKET", default_value = "")]
    bucket: String,

    /// Key prefix for uploaded objects
    #[arg(long, env = "S3_PREFIX", default_value = "")]
    prefix: String,

    #[arg(long, env = "S3_REGION", default_value = "")]
    region: String,

    /// "gzip" to compress objects, anything else uploads plain text
    #[arg(long, env = "S3_COMPRESS", default_value = "")]
    compress: String,

    /// Endpoint of an S3-compatible service
    #[arg(long, env = "S3_ENDPOINT", default_value = "")]
    endpoint: String,

    #[arg(long, env = "S3_AUTO_CREATE_BUCKET", default_value = "")]
    auto_create_bucket: String,

    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// IANA time zone for object keys; local time when empty
    #[arg(long, env = "TIME_ZONE", default_value = "")]
    time_zone: String,
}

impl Cli {
    fn to_settings(&self) -> RawSinkSettings {
        RawSinkSettings {
            credential: self.credential.clone(),
            access_key_id: self.access_key_id.clone(),
            secret_access_key: self.secret_access_key.clone(),
            bucket: self.bucket.clone(),
            s3_prefix: self.prefix.clone(),
            region: self.region.clone(),
            compress: self.compress.clone(),
            endpoint: self.endpoint.clone(),
            auto_create_bucket: self.auto_create_bucket.clone(),
            log_level: self.log_level.clone(),
            time_zone: self.time_zone.clone(),
        }
    }

}

/// Install the global subscriber; the filter starts open so construction
/// errors surface before the sink's own level is known
fn init_logging() -> LevelHandle {
    let (filter, handle) = reload::Layer::new(LevelFilter::TRACE);
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();
    handle
}

/// Narrow the binary's own output to the level the sink validated
fn apply_sink_level(handle: &LevelHandle, config: &SinkConfig) -> Result<()> {
    handle
        .modify(|filter| *filter = config.log_level.as_level_filter())
        .context("failed to apply log level")
}

/// Parse one input line; blank lines yield nothing
fn parse_line(line: &str) -> Result<Option<LogRecord>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let object: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(line).context("record is not a JSON object")?;
    Ok(Some(LogRecord::from(object)))
}

struct Uploader<'a> {
    registry: &'a SinkRegistry,
    handle: SinkHandle,
    max_retries: u32,
    retry_delay: Duration,
}

impl Uploader<'_> {
    /// Flush one batch, re-invoking on retryable failures
    async fn flush(&self, records: Vec<LogRecord>) -> Result<()> {
        let mut attempt = 0;
        loop {
            match self.registry.flush(self.handle, records.clone()).await {
                FlushOutcome::Success => return Ok(()),
                FlushOutcome::Retry if attempt < self.max_retries => {
                    attempt += 1;
                    warn!(attempt, max = self.max_retries, "flush failed, retrying");
                    tokio::time::sleep(self.retry_delay).await;
                }
                FlushOutcome::Retry => bail!("flush still failing after {} retries", attempt),
                FlushOutcome::Fatal => bail!("flush failed fatally"),
            }
        }
    }
}

async fn run<R: AsyncBufRead + Unpin>(input: R, uploader: &Uploader<'_>, batch_size: usize) -> Result<()> {
    let mut lines = input.lines();
    let mut batch = Vec::with_capacity(batch_size);
    let mut line_no = 0usize;
    let mut batches = 0usize;

    while let Some(line) = lines.next_line().await.context("failed to read input")? {
        line_no += 1;
        match parse_line(&line) {
            Ok(Some(record)) => batch.push(record),
            Ok(None) => continue,
            Err(err) => {
                warn!(line = line_no, error = %err, "skipping input line");
                continue;
            }
        }

        if batch.len() >= batch_size {
            uploader.flush(std::mem::take(&mut batch)).await?;
            batches += 1;
        }
    }

    if !batch.is_empty() {
        uploader.flush(batch).await?;
        batches += 1;
    }

    info!(lines = line_no, batches, "input drained");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let level = init_logging();

    if cli.batch_size == 0 {
        bail!("--batch-size must be at least 1");
    }

    let registry = SinkRegistry::new();
    let handle = registry
        .register(cli.to_settings())
        .await
        .context("Failed to initialize sink")?;
    if let Some(config) = registry.config(handle).await {
        apply_sink_level(&level, &config)?;
    }

    let uploader = Uploader {
        registry: &registry,
        handle,
        max_retries: cli.max_retries,
        retry_delay: Duration::from_millis(cli.retry_delay_ms),
    };

    let result = match &cli.input {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("failed to open {}", path.display()))?;
            run(BufReader::new(file), &uploader, cli.batch_size).await
        }
        None => run(BufReader::new(tokio::io::stdin()), &uploader, cli.batch_size).await,
    };

    registry.unregister(handle).await;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use s3_log_sink::{RecordValue, SinkBuilder};

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "log-sink",
            "--bucket",
            "logs",
            "--prefix",
            "app",
            "--region",
            "us-west-2",
            "--compress",
            "gzip",
            "--batch-size",
            "50",
            "--max-retries",
            "5",
        ]);

        assert_eq!(cli.batch_size, 50);
        assert_eq!(cli.max_retries, 5);
        assert!(cli.input.is_none());

        let settings = cli.to_settings();
        assert_eq!(settings.bucket, "logs");
        assert_eq!(settings.s3_prefix, "app");
        assert_eq!(settings.region, "us-west-2");
        assert_eq!(settings.compress, "gzip");
        assert_eq!(settings.log_level, "info");
    }

    #[tokio::test]
    async fn test_sink_level_narrows_filter() {
        let (_filter, handle) = reload::Layer::<LevelFilter, Registry>::new(LevelFilter::TRACE);

        let cli = Cli::parse_from([
            "log-sink",
            "--access-key-id",
            "AKIA",
            "--secret-access-key",
            "secret",
            "--bucket",
            "logs",
            "--prefix",
            "app",
            "--region",
            "us-east-1",
            "--log-level",
            "Warning",
        ]);
        let config = SinkBuilder::build_sink_config(&cli.to_settings())
            .await
            .unwrap();

        apply_sink_level(&handle, &config).unwrap();
        assert_eq!(handle.clone_current(), Some(LevelFilter::WARN));
    }

    #[test]
    fn test_parse_line() {
        let record = parse_line(r#"{"log":"hello","n":1}"#).unwrap().unwrap();
        assert_eq!(record.get("log"), Some(&RecordValue::Text("hello".to_string())));
        assert_eq!(record.get("n"), Some(&RecordValue::Int(1)));

        assert!(parse_line("   ").unwrap().is_none());
        assert!(parse_line("[1,2]").is_err());
        assert!(parse_line("not json").is_err());
    }
}
