use crate::features::bmx::models::StatEntries;

/// Separator between a stat name and its value on a status line.
pub const DELIMITER: &str = ": ";

/// Split a single status line into `(key, value)`.
///
/// Line endings are dropped; everything after the first delimiter is the
/// value, verbatim. Returns `None` for blank lines and lines without the
/// delimiter.
pub fn parse_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim_end_matches(&['\r', '\n'][..]);
    if line.is_empty() {
        return None;
    }
    line.split_once(DELIMITER)
}

/// Collect status lines into a stat map. Repeated keys keep the last value.
pub fn parse<I, S>(lines: I) -> StatEntries
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut stats = StatEntries::new();
    for line in lines {
        if let Some((key, value)) = parse_line(line.as_ref()) {
            stats.insert(key.to_string(), value.to_string());
        }
    }
    stats
}
