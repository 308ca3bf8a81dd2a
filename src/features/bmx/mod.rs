pub mod classifier;
pub mod collector;
pub mod cycle;
pub mod models;
pub mod parser;
pub mod transform;

pub use classifier::{classify, DEFAULT_UNIT, STAT_TABLE};
pub use collector::{status_url, StatsFetcher};
pub use cycle::{CycleControl, CycleOutcome, CycleState, PollCycle};
pub use models::{Category, Classification, Metric, MetricValue, StatEntries, METRIC_ROOT};
pub use parser::{parse, parse_line};
pub use transform::{build_metric, metric_path, transform};
