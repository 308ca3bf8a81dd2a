use crate::features::bmx::models::Metric;
use crate::shared::error::StorageError;
use crate::shared::storage::console::ConsoleSink;
use crate::shared::traits::MetricSink;
use std::io::{self, Write};

/// Routes metrics to the console in debug mode and to the external sink otherwise.
pub enum Reporter<E, W: Write = io::Stdout> {
    Console(ConsoleSink<W>),
    Forward(E),
}

impl<E> Reporter<E, io::Stdout> {
    pub fn console() -> Self {
        Reporter::Console(ConsoleSink::stdout())
    }
}

impl<E, W: Write> Reporter<E, W> {
    pub fn is_debug(&self) -> bool {
        matches!(self, Reporter::Console(_))
    }
}

impl<E: MetricSink, W: Write> MetricSink for Reporter<E, W> {
    fn report(&self, metric: &Metric) -> Result<(), StorageError> {
        match self {
            Reporter::Console(console) => console.report(metric),
            Reporter::Forward(sink) => sink.report(metric),
        }
    }

    fn flush(&self) -> Result<(), StorageError> {
        match self {
            Reporter::Console(console) => console.flush(),
            Reporter::Forward(sink) => sink.flush(),
        }
    }
}
