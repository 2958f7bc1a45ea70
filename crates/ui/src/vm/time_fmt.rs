use chrono::Duration;
use quiz_core::model::TimingEntry;

/// Seconds rounded to one decimal place, always showing the decimal.
///
/// Uses the same rounding as the recorded timing log.
#[must_use]
pub fn format_seconds(value: Duration) -> String {
    TimingEntry::from_elapsed(String::new(), value).seconds_label()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_one_decimal() {
        assert_eq!(format_seconds(Duration::zero()), "0.0");
        assert_eq!(format_seconds(Duration::milliseconds(3_249)), "3.2");
        assert_eq!(format_seconds(Duration::seconds(12)), "12.0");
        assert_eq!(format_seconds(Duration::milliseconds(-400)), "0.0");
    }
}
