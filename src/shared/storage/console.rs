use crate::features::bmx::models::Metric;
use crate::shared::error::StorageError;
use crate::shared::traits::MetricSink;
use std::io::{self, Write};
use std::sync::Mutex;

/// Writes each metric as a `path[unit] : value` line.
pub struct ConsoleSink<W: Write = io::Stdout> {
    writer: Mutex<W>,
}

impl ConsoleSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<W: Write> MetricSink for ConsoleSink<W> {
    fn report(&self, metric: &Metric) -> Result<(), StorageError> {
        let mut writer = self.writer.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        writeln!(writer, "{}", metric)?;
        Ok(())
    }

    fn flush(&self) -> Result<(), StorageError> {
        let mut writer = self.writer.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        writer.flush()?;
        Ok(())
    }
}
