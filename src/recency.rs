//! Coarse relative-age labels for topic timestamps.

use chrono::{DateTime, Utc};

/// Formats how long ago `timestamp` was relative to `now`.
///
/// The minute, hour and day counts are each floored from the raw
/// difference, and the branches are checked in this exact order; a
/// difference of exactly 24 hours is still "24 hours ago" because the
/// hour branch is tested before the day branches.
pub fn relative_age(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now.signed_duration_since(timestamp);
    let diff_mins = diff.num_minutes();
    let diff_hours = diff.num_hours();
    let diff_days = diff.num_days();

    if diff_mins < 60 {
        format!("{} min{} ago", diff_mins, if diff_mins != 1 { "s" } else { "" })
    } else if diff_hours < 24 {
        format!("{} hour{} ago", diff_hours, if diff_hours != 1 { "s" } else { "" })
    } else if diff_days == 0 {
        "Today".to_string()
    } else if diff_days == 1 {
        "Yesterday".to_string()
    } else if diff_days < 7 {
        format!("{} days ago", diff_days)
    } else {
        timestamp.format("%b %-d, %Y").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn minutes_branch() {
        assert_eq!(relative_age(now() - Duration::minutes(1), now()), "1 min ago");
        assert_eq!(relative_age(now() - Duration::minutes(5), now()), "5 mins ago");
        assert_eq!(relative_age(now(), now()), "0 mins ago");
    }

    #[test]
    fn hours_branch() {
        assert_eq!(relative_age(now() - Duration::hours(1), now()), "1 hour ago");
        assert_eq!(relative_age(now() - Duration::hours(23), now()), "23 hours ago");
    }

    #[test]
    fn day_branches() {
        assert_eq!(relative_age(now() - Duration::hours(25), now()), "Yesterday");
        assert_eq!(relative_age(now() - Duration::days(2), now()), "2 days ago");
        assert_eq!(relative_age(now() - Duration::days(6), now()), "6 days ago");
    }

    #[test]
    fn exactly_one_day_hits_the_hour_branch_first() {
        // 1440 minutes: diff_hours == 24 fails the hour test, diff_days == 1
        assert_eq!(relative_age(now() - Duration::minutes(1440), now()), "Yesterday");
        assert_eq!(relative_age(now() - Duration::minutes(1439), now()), "23 hours ago");
    }

    #[test]
    fn beyond_a_week_is_an_absolute_date() {
        assert_eq!(relative_age(now() - Duration::days(8), now()), "Jun 7, 2024");
    }
}
