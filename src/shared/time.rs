//! Display formatting for timestamps sent over the wire

use chrono::{DateTime, Utc};

/// `YYYY/MM/DD HH:MM:SS`, always UTC
pub const DISPLAY_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

pub fn display_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(DISPLAY_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_display_format_is_zero_padded() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 7, 5, 4, 9).unwrap();
        assert_eq!(display_timestamp(&ts), "2024/03/07 05:04:09");
    }
}
