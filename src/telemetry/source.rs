//! Line-oriented telemetry sources
//!
//! Works over any async buffered reader: a serial device piped to stdin
//! during a run, or a backup file replayed afterwards.

use super::recorder::BackupRecorder;
use super::{TelemetryBatch, TelemetryRecord};
use std::future::Future;
use std::io;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing::{debug, info, warn};

/// Reads telemetry lines and collects them into a batch
pub struct TelemetryReader<R> {
    lines: Lines<R>,
    rejected: usize,
}

impl<R: AsyncBufRead + Unpin> TelemetryReader<R> {
    pub fn new(reader: R) -> Self {
        TelemetryReader {
            lines: reader.lines(),
            rejected: 0,
        }
    }

    /// Lines that failed to parse so far
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    /// Next non-blank raw line, or `None` at end of stream
    pub async fn next_line(&mut self) -> io::Result<Option<String>> {
        while let Some(line) = self.lines.next_line().await? {
            let line = line.trim();
            if !line.is_empty() {
                return Ok(Some(line.to_string()));
            }
        }
        Ok(None)
    }

    /// Read until end of stream. Every raw line goes to `recorder` before
    /// parsing; lines that do not parse are logged and dropped.
    pub async fn read_batch(
        &mut self,
        recorder: Option<&mut BackupRecorder>,
    ) -> io::Result<TelemetryBatch> {
        self.read_batch_until(recorder, std::future::pending()).await
    }

    /// Like `read_batch`, but also ends cleanly when `stop` completes. The
    /// lines read so far are kept.
    pub async fn read_batch_until<F>(
        &mut self,
        mut recorder: Option<&mut BackupRecorder>,
        stop: F,
    ) -> io::Result<TelemetryBatch>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(stop);
        let mut batch = TelemetryBatch::new();

        loop {
            let line = tokio::select! {
                line = self.next_line() => line?,
                _ = &mut stop => {
                    info!("Telemetry stream stopped");
                    None
                }
            };
            let Some(line) = line else { break };

            if let Some(recorder) = recorder.as_deref_mut() {
                recorder.record(&line).map_err(io::Error::other)?;
            }

            match TelemetryRecord::parse(&line) {
                Ok(record) => {
                    debug!(?record, "Parsed telemetry record");
                    batch.push(record);
                }
                Err(error) => {
                    warn!(%error, line = %line, "Ignoring telemetry line");
                    self.rejected += 1;
                }
            }
        }

        info!(
            poses = batch.poses.len(),
            detections = batch.detections.len(),
            rejected = self.rejected,
            "Telemetry stream ended"
        );
        Ok(batch)
    }
}

/// Rebuild a batch from a backup file
pub async fn replay_backup<P: AsRef<Path>>(path: P) -> io::Result<TelemetryBatch> {
    let file = File::open(path.as_ref()).await?;
    let mut reader = TelemetryReader::new(BufReader::new(file));
    reader.read_batch(None).await
}
