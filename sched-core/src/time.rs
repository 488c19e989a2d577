//! Local ISO-8601 timestamps, matching what the browser clients expect.

use chrono::{DateTime, Local};
use std::time::SystemTime;

/// Format a filesystem timestamp as local ISO-8601 without an offset.
pub fn iso_timestamp(time: SystemTime) -> String {
    let local: DateTime<Local> = time.into();
    local.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

/// Current local time as ISO-8601.
pub fn now_iso() -> String {
    iso_timestamp(SystemTime::now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_as_iso8601() {
        let stamp = now_iso();
        // e.g. 2024-05-01T09:30:00.123456
        assert_eq!(stamp.as_bytes()[4], b'-');
        assert_eq!(stamp.as_bytes()[10], b'T');
        assert!(stamp.len() >= 19, "unexpected timestamp: {}", stamp);
    }
}
