//! Decoupled logging pipeline for the dashboard.
//!
//! # Architecture
//!
//! ```text
//! log::info!() / log::warn!() ...
//!     |
//! [LogCollector] (log::Log impl, never blocks the caller)
//!     | (crossbeam unbounded channel)
//! [writer thread]
//!     |             \
//!     v              v
//! logs/dashboard_<ts>.log   UI channel (bounded, lossy when full)
//! ```
//!
//! Disk writes never depend on the UI: a full UI channel drops the line for
//! the log panel only.

use chrono::Local;
use crossbeam_channel::{unbounded, Sender};
use log::{Level, Log, Metadata, Record};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Internal log line or special marker
enum LogMessage {
    Line(LogLine),
    /// Flush marker with channel sender to signal completion
    Flush(std::sync::mpsc::Sender<()>),
}

/// Get the global logs path relative to the current working directory: ./logs
pub fn get_global_logs_path() -> Result<PathBuf, String> {
    let cwd = std::env::current_dir()
        .map_err(|e| format!("Failed to get current working directory: {}", e))?;
    Ok(cwd.join("logs"))
}

/// Ensure the logs directory exists
pub fn ensure_logs_dir_exists(log_dir: &Path) -> Result<(), String> {
    std::fs::create_dir_all(log_dir)
        .map_err(|e| format!("Failed to create logs directory: {}", e))
}

/// A log line with metadata
#[derive(Clone, Debug)]
pub struct LogLine {
    pub message: String,
    pub level: Level,
    /// HH:MM:SS.mmm
    pub timestamp: String,
}

impl LogLine {
    pub fn new(level: Level, message: String) -> Self {
        LogLine {
            message,
            level,
            timestamp: Local::now().format("%H:%M:%S%.3f").to_string(),
        }
    }

    /// `[HH:MM:SS.mmm] [LEVEL] message`
    pub fn formatted(&self) -> String {
        format!("[{}] [{}] {}", self.timestamp, self.level, self.message)
    }
}

/// Unified logger that handles disk and UI dispatch
#[derive(Clone)]
pub struct LogCollector {
    tx: Sender<LogMessage>,
    log_path: PathBuf,
}

impl LogCollector {
    /// Create the log file for this run and start the writer thread.
    pub fn new(
        log_dir: PathBuf,
        ui_tx: tokio::sync::mpsc::Sender<LogLine>,
    ) -> Result<Self, String> {
        ensure_logs_dir_exists(&log_dir)?;

        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let log_path = log_dir.join(format!("dashboard_{}.log", timestamp));
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .map_err(|e| format!("Failed to open log file {}: {}", log_path.display(), e))?;

        // crossbeam channels work from any runtime or plain thread
        let (tx, rx) = unbounded::<LogMessage>();

        // OS thread, not a tokio task: logging must keep working while the
        // runtime is shutting down
        std::thread::spawn(move || {
            while let Ok(msg) = rx.recv() {
                match msg {
                    LogMessage::Line(line) => {
                        let _ = writeln!(file, "{}", line.formatted());
                        let _ = ui_tx.try_send(line);
                    }
                    LogMessage::Flush(done) => {
                        let _ = file.flush();
                        let _ = file.sync_data();
                        let _ = done.send(());
                    }
                }
            }
            let _ = file.flush();
            eprintln!("[Log] Writer thread shutting down");
        });

        Ok(LogCollector { tx, log_path })
    }

    /// Path of this run's log file
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Send a log line (non-blocking)
    pub fn log_line(&self, line: LogLine) {
        let _ = self.tx.send(LogMessage::Line(line));
    }

    /// Send a simple info-level string
    pub fn log_str(&self, message: impl Into<String>) {
        self.log_line(LogLine::new(Level::Info, message.into()));
    }

    /// Wait until every line sent before this call is on disk.
    pub async fn wait_for_empty(&self) -> Result<(), String> {
        let (done_tx, done_rx) = std::sync::mpsc::channel::<()>();
        self.tx
            .send(LogMessage::Flush(done_tx))
            .map_err(|e| format!("Failed to send flush marker: {}", e))?;

        tokio::task::spawn_blocking(move || done_rx.recv())
            .await
            .map_err(|e| format!("Flush task failed: {}", e))?
            .map_err(|e| format!("Flush signal interrupted: {}", e))
    }
}

/// Wires all log::info!(), log::warn!(), log::error!() calls into LogCollector
impl Log for LogCollector {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.log_line(LogLine::new(record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[tokio::test]
    async fn test_log_collector_writes_and_forwards() {
        let temp_dir = tempfile::tempdir().unwrap();
        let (ui_tx, mut ui_rx) = tokio::sync::mpsc::channel(100);
        let collector = LogCollector::new(temp_dir.path().to_path_buf(), ui_tx).unwrap();

        collector.log_str("[STATS] Poller started");
        collector.wait_for_empty().await.unwrap();

        let content = fs::read_to_string(collector.log_path()).unwrap();
        assert!(content.contains("[INFO] [STATS] Poller started"));

        let line = ui_rx.recv().await.unwrap();
        assert_eq!(line.message, "[STATS] Poller started");
    }

    #[tokio::test]
    async fn test_full_ui_channel_does_not_lose_disk_lines() {
        let temp_dir = tempfile::tempdir().unwrap();
        let (ui_tx, _ui_rx) = tokio::sync::mpsc::channel(1);
        let collector = LogCollector::new(temp_dir.path().to_path_buf(), ui_tx).unwrap();

        for i in 0..100 {
            collector.log_str(format!("line {}", i));
        }
        collector.wait_for_empty().await.unwrap();

        let content = fs::read_to_string(collector.log_path()).unwrap();
        assert_eq!(content.lines().count(), 100);
        assert!(content.contains("line 99"));
    }
}
