use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::models::SignalKind;

const HEADER: [&str; 5] = [
    "timestamp",
    "price",
    "value_area_upper",
    "value_area_lower",
    "signal",
];

/// One row of the signal log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalRecord {
    pub timestamp: String,
    pub price: f64,
    pub value_area_upper: f64,
    pub value_area_lower: f64,
    pub signal: SignalKind,
}

/// Append-only CSV file of actionable signals.
#[derive(Debug, Clone)]
pub struct SignalLog {
    path: PathBuf,
}

impl SignalLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the file with its header row if it does not exist yet.
    /// An existing file is left untouched.
    pub fn ensure_created(&self) -> Result<()> {
        if self.path.exists() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let mut writer = csv::Writer::from_path(&self.path)
            .with_context(|| format!("Failed to create signal log: {}", self.path.display()))?;
        writer.write_record(HEADER)?;
        writer.flush()?;
        log::info!("Created signal log {}", self.path.display());
        Ok(())
    }

    pub fn append(&self, record: &SignalRecord) -> Result<()> {
        self.ensure_created()?;
        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open signal log: {}", self.path.display()))?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer
            .serialize(record)
            .with_context(|| format!("Failed to append to signal log: {}", self.path.display()))?;
        writer.flush()?;

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_signal_log {
            log::info!(
                "Logged {} at {} to {}",
                record.signal,
                record.price,
                self.path.display()
            );
        }
        Ok(())
    }
}
