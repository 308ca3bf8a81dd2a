pub mod features;
pub mod shared;

// Re-export the poll pipeline
pub use features::bmx::{
    build_metric,
    classify,
    parse,
    transform,
    Category,
    Classification,
    CycleControl,
    CycleOutcome,
    CycleState,
    Metric,
    MetricValue,
    PollCycle,
    StatsFetcher,
};

// Re-export shared functionality
pub use shared::config::{ReporterSettings, RunConfig, Settings};
pub use shared::storage::{ConsoleSink, NewRelicSink, Reporter};
pub use shared::traits::{
    MetricSink,
    StatusSource,
    Validatable,
};
pub use shared::error::{
    AgentError,
    CollectionError,
    ConfigError,
    ProcessingError,
    StorageError,
};
