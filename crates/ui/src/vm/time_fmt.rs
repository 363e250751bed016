use chrono::{DateTime, Datelike, Local, Timelike, Utc};

/// Countdown label, `m:ss`.
#[must_use]
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Short attempt timestamp in local time, `M/D H:MM`.
#[must_use]
pub fn format_attempt_date(timestamp: DateTime<Utc>) -> String {
    let local = timestamp.with_timezone(&Local);
    format!(
        "{}/{} {}:{:02}",
        local.month(),
        local.day(),
        local.hour(),
        local.minute()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_pads_seconds() {
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(59), "0:59");
        assert_eq!(format_clock(60), "1:00");
        assert_eq!(format_clock(600), "10:00");
        assert_eq!(format_clock(125), "2:05");
    }
}
