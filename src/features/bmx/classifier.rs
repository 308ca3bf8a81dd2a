use crate::features::bmx::models::{Category, Classification};

/// Unit assigned to any stat missing from [`STAT_TABLE`].
pub const DEFAULT_UNIT: &str = "ms";

const FALLBACK: Classification = Classification::new(DEFAULT_UNIT, Category::Default);

/// Known mod_bmx vhost stats. Lookups are case-sensitive.
pub const STAT_TABLE: [(&str, Classification); 13] = [
    ("Total Accesses", Classification::new("accesses", Category::Default)),
    ("Total kBytes", Classification::new("kb", Category::Default)),
    ("CPULoad", Classification::new("%", Category::Percent)),
    ("Uptime", Classification::new("sec", Category::Default)),
    ("ReqPerSec", Classification::new("requests", Category::Default)),
    ("InBytesGET", Classification::new("bytes", Category::Default)),
    ("BytesPerReq", Classification::new("bytes/req", Category::Default)),
    ("BusyWorkers", Classification::new("workers", Category::Workers)),
    ("IdleWorkers", Classification::new("workers", Category::Workers)),
    ("ConnsTotal", Classification::new("connections", Category::Connections)),
    ("ConnsAsyncWriting", Classification::new("connections", Category::Connections)),
    ("ConnsAsyncKeepAlive", Classification::new("connections", Category::Connections)),
    ("ConnsAsyncClosing", Classification::new("connections", Category::Connections)),
];

pub fn classify(key: &str) -> Classification {
    STAT_TABLE
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, classification)| *classification)
        .unwrap_or(FALLBACK)
}
