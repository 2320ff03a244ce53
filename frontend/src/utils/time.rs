use chrono::Utc;

/// Wall clock in epoch milliseconds.
pub trait Clock {
    fn now_millis(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Renders whole seconds as `M:SS`.
pub fn format_clock(total_seconds: u32) -> String {
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_clock_pads_seconds() {
        assert_eq!(format_clock(120), "2:00");
        assert_eq!(format_clock(119), "1:59");
        assert_eq!(format_clock(5), "0:05");
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(900), "15:00");
    }

    #[test]
    fn system_clock_is_after_2020() {
        assert!(SystemClock.now_millis() > 1_577_836_800_000);
    }
}
