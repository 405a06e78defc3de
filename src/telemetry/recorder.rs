//! Raw telemetry backup
//!
//! Every line received is appended to a backup file before it is parsed,
//! so a session can be replayed even if parsing or persistence changes.

use crate::lifecycle::{LifecycleNode, LifecycleNodeBase, State};
use std::any::Any;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Appends raw telemetry lines to a backup file
#[derive(Debug)]
pub struct BackupRecorder {
    base: LifecycleNodeBase,
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    lines: usize,
}

impl BackupRecorder {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        BackupRecorder {
            base: LifecycleNodeBase::new("backup_recorder"),
            path: path.as_ref().to_path_buf(),
            writer: None,
            lines: 0,
        }
    }

    pub fn state(&self) -> State {
        self.base.get_state()
    }

    /// Number of lines recorded since configuration
    pub fn lines_recorded(&self) -> usize {
        self.lines
    }

    /// Append one raw line
    pub fn record(&mut self, line: &str) -> Result<(), String> {
        if !self.base.is_active() {
            return Err(format!("{} is not active", self.base.name));
        }

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| format!("{} has no open backup file", self.base.name))?;

        writeln!(writer, "{}", line.trim_end())
            .map_err(|e| format!("Failed to write {}: {}", self.path.display(), e))?;
        self.lines += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), String> {
        if let Some(writer) = self.writer.as_mut() {
            writer
                .flush()
                .map_err(|e| format!("Failed to flush {}: {}", self.path.display(), e))?;
        }
        Ok(())
    }
}

impl LifecycleNode for BackupRecorder {
    fn on_configure(&mut self) -> Result<(), String> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| format!("Failed to open {}: {}", self.path.display(), e))?;

        self.writer = Some(BufWriter::new(file));
        self.lines = 0;
        self.base.transition(State::Unconfigured, State::Inactive)?;
        debug!(path = %self.path.display(), "Backup file opened");
        Ok(())
    }

    fn on_activate(&mut self) -> Result<(), String> {
        self.base.transition(State::Inactive, State::Active)
    }

    fn on_deactivate(&mut self) -> Result<(), String> {
        self.flush()?;
        self.base.transition(State::Active, State::Inactive)
    }

    fn on_cleanup(&mut self) -> Result<(), String> {
        self.flush()?;
        self.writer = None;
        self.base.transition(State::Inactive, State::Unconfigured)?;
        info!(path = %self.path.display(), lines = self.lines, "Backup saved");
        Ok(())
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_only_while_active() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backup.txt");
        let mut recorder = BackupRecorder::new(&path);

        assert!(recorder.record("PATH,1,1,0").is_err());

        recorder.on_configure().unwrap();
        assert!(recorder.record("PATH,1,1,0").is_err());

        recorder.on_activate().unwrap();
        recorder.record("PATH,1,1,0\r").unwrap();
        recorder.record("OBS,1,1,90,200").unwrap();
        recorder.on_deactivate().unwrap();
        recorder.on_cleanup().unwrap();

        assert_eq!(recorder.lines_recorded(), 2);
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "PATH,1,1,0\nOBS,1,1,90,200\n");
    }

    #[test]
    fn test_appends_across_sessions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backup.txt");

        for line in ["PATH,1,1,0", "PATH,2,2,0"] {
            let mut recorder = BackupRecorder::new(&path);
            recorder.on_configure().unwrap();
            recorder.on_activate().unwrap();
            recorder.record(line).unwrap();
            recorder.on_deactivate().unwrap();
            recorder.on_cleanup().unwrap();
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }
}
