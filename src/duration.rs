//! Video duration codec. Durations are stored as integer seconds and
//! displayed as "minutes:SS".

/// Parses "M:SS" / "MM:SS" into total seconds. Malformed input yields 0.
pub fn duration_to_seconds(duration: &str) -> i64 {
    if duration.is_empty() {
        return 0;
    }
    let parts: Vec<&str> = duration.split(':').collect();
    if parts.len() != 2 {
        return 0;
    }
    let minutes = parts[0].parse::<i64>().unwrap_or(0);
    let seconds = parts[1].parse::<i64>().unwrap_or(0);
    minutes * 60 + seconds
}

/// Formats seconds as "minutes:SS", seconds zero-padded to two digits.
pub fn seconds_to_duration(seconds: i64) -> String {
    if seconds <= 0 {
        return "0:00".to_string();
    }
    let mins = seconds / 60;
    let secs = seconds % 60;
    format!("{}:{:02}", mins, secs)
}

/// Parses "M:SS" into fractional minutes for threshold comparisons.
/// Colonless input is treated as a bare minute count.
pub fn duration_to_minutes(duration: &str) -> f64 {
    if duration.is_empty() {
        return 0.0;
    }
    let parts: Vec<&str> = duration.split(':').collect();
    if parts.len() == 2 {
        let minutes = parts[0].parse::<i64>().unwrap_or(0);
        let seconds = parts[1].parse::<i64>().unwrap_or(0);
        return minutes as f64 + seconds as f64 / 60.0;
    }
    parts[0].parse::<i64>().unwrap_or(0) as f64
}
