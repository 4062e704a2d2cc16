use chrono::{DateTime, Utc};

/// Returns current timestamp in milliseconds (Unix epoch)
pub fn current_timestamp_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Stored millisecond timestamps back to UTC; out-of-range values fall back to the epoch.
pub fn millis_to_datetime(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millis_round_trip() {
        let now = current_timestamp_millis();
        assert_eq!(millis_to_datetime(now).timestamp_millis(), now);
        assert_eq!(millis_to_datetime(0).to_rfc3339(), "1970-01-01T00:00:00+00:00");
    }
}
