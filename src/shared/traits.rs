use crate::features::bmx::models::Metric;
use crate::shared::error::{CollectionError, StorageError};
use log::error;

/// Anything that can hand the poll cycle a batch of raw status lines.
pub trait StatusSource {
    fn fetch(&self) -> Result<Vec<String>, CollectionError>;
    fn describe(&self) -> String;

    /// Like `fetch`, but a failure is logged and reported as "no data".
    fn fetch_lines(&self) -> Vec<String> {
        match self.fetch() {
            Ok(lines) => lines,
            Err(e) => {
                error!("Failed to fetch status from {}: {}", self.describe(), e);
                error!("Error details: {:?}", e);
                Vec::new()
            }
        }
    }
}

/// Destination for classified metrics.
///
/// `report` is called once per metric; `flush` once at the end of every
/// cycle that produced metrics. Sinks that deliver eagerly can keep the
/// default no-op `flush`.
pub trait MetricSink {
    fn report(&self, metric: &Metric) -> Result<(), StorageError>;

    fn flush(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

impl<S: MetricSink + ?Sized> MetricSink for Box<S> {
    fn report(&self, metric: &Metric) -> Result<(), StorageError> {
        (**self).report(metric)
    }

    fn flush(&self) -> Result<(), StorageError> {
        (**self).flush()
    }
}

pub trait Validatable {
    fn validate(&self) -> Result<(), String>;
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}
