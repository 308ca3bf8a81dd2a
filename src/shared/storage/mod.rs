mod console;
mod newrelic_storage;
mod reporter;

pub use console::ConsoleSink;
pub use newrelic_storage::{NewRelicSink, AGENT_GUID, AGENT_VERSION};
pub use reporter::Reporter;
