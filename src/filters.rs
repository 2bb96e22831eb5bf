//! Topic filtering and ordering over the assembled view model.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use crate::duration::duration_to_minutes;
use crate::routes::{TopicView, VideoView};

/// Topics with no priority (0 / unset) sort after every ranked topic.
const UNRANKED_PRIORITY: i64 = 999_999;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterState {
    /// Topic id to pin the view to, or "all".
    pub topic: String,
    /// Maximum video length in whole minutes.
    pub max_duration: Option<i64>,
    /// Only topics updated within the last 24 hours.
    pub today: bool,
    /// Accepted from the UI but not wired to a predicate yet.
    pub favorite: bool,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            topic: "all".to_string(),
            max_duration: None,
            today: false,
            favorite: false,
        }
    }
}

fn fits_duration(video: &VideoView, max_minutes: i64) -> bool {
    duration_to_minutes(&video.duration).round() as i64 <= max_minutes
}

fn effective_priority(priority: i32) -> i64 {
    if priority == 0 {
        UNRANKED_PRIORITY
    } else {
        priority as i64
    }
}

/// Applies the topic-level predicates, re-filters each surviving topic's
/// video list under the duration threshold, and orders the result by
/// priority ascending (unranked last), ties broken by most recent update.
pub fn apply_filters(
    topics: Vec<TopicView>,
    filters: &FilterState,
    now: DateTime<Utc>,
) -> Vec<TopicView> {
    let mut surviving: Vec<TopicView> = topics
        .into_iter()
        .filter(|topic| {
            if filters.topic != "all" && topic.id != filters.topic {
                return false;
            }

            if let Some(max_minutes) = filters.max_duration {
                if !topic.videos.iter().any(|v| fits_duration(v, max_minutes)) {
                    return false;
                }
            }

            if filters.today {
                match topic.updated_at {
                    Some(ts) => {
                        if now.signed_duration_since(ts) > Duration::hours(24) {
                            return false;
                        }
                    }
                    None => return false,
                }
            }

            true
        })
        .map(|mut topic| {
            if let Some(max_minutes) = filters.max_duration {
                topic.videos.retain(|v| fits_duration(v, max_minutes));
            }
            topic
        })
        .collect();

    surviving.sort_by(|a, b| {
        effective_priority(a.priority)
            .cmp(&effective_priority(b.priority))
            .then_with(|| {
                let a_ts = a.updated_at.unwrap_or(DateTime::<Utc>::MIN_UTC);
                let b_ts = b.updated_at.unwrap_or(DateTime::<Utc>::MIN_UTC);
                b_ts.cmp(&a_ts)
            })
    });

    surviving
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn video(duration: &str) -> VideoView {
        VideoView {
            id: "v1".to_string(),
            title: "a video".to_string(),
            url: "https://youtu.be/dQw4w9WgXcQ".to_string(),
            thumbnail: None,
            duration: duration.to_string(),
            channel: "NewsCo".to_string(),
            stance: "Balanced".to_string(),
            covers: vec![],
        }
    }

    fn topic(id: &str, priority: i32, updated_at: Option<DateTime<Utc>>) -> TopicView {
        TopicView {
            id: id.to_string(),
            title: format!("topic {id}"),
            slug: format!("topic-{id}"),
            region: None,
            why_matters: None,
            priority,
            is_active: true,
            last_update: updated_at,
            created_at: updated_at,
            updated_at,
            updated_label: None,
            videos: vec![],
        }
    }

    #[test]
    fn orders_by_priority_ascending() {
        let topics = vec![
            topic("a", 3, None),
            topic("b", 1, None),
            topic("c", 2, None),
        ];
        let out = apply_filters(topics, &FilterState::default(), now());
        let ids: Vec<&str> = out.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["b", "c", "a"]);
    }

    #[test]
    fn unranked_topics_sort_last() {
        let topics = vec![topic("zero", 0, None), topic("five", 5, None)];
        let out = apply_filters(topics, &FilterState::default(), now());
        let ids: Vec<&str> = out.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["five", "zero"]);
    }

    #[test]
    fn priority_ties_break_on_most_recent_update() {
        let older = now() - Duration::days(2);
        let newer = now() - Duration::hours(1);
        let topics = vec![
            topic("old", 1, Some(older)),
            topic("new", 1, Some(newer)),
        ];
        let out = apply_filters(topics, &FilterState::default(), now());
        let ids: Vec<&str> = out.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["new", "old"]);
    }

    #[test]
    fn duration_filter_keeps_topic_but_trims_its_videos() {
        let mut t = topic("a", 1, None);
        t.videos = vec![video("10:00"), video("20:00")];
        let filters = FilterState {
            max_duration: Some(15),
            ..FilterState::default()
        };
        let out = apply_filters(vec![t], &filters, now());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].videos.len(), 1);
        assert_eq!(out[0].videos[0].duration, "10:00");
    }

    #[test]
    fn duration_filter_drops_topics_with_no_short_video() {
        let mut t = topic("a", 1, None);
        t.videos = vec![video("20:00")];
        let filters = FilterState {
            max_duration: Some(15),
            ..FilterState::default()
        };
        assert!(apply_filters(vec![t], &filters, now()).is_empty());
    }

    #[test]
    fn duration_threshold_uses_rounded_minutes() {
        let mut t = topic("a", 1, None);
        t.videos = vec![video("12:30")];
        let keep = FilterState {
            max_duration: Some(15),
            ..FilterState::default()
        };
        let drop = FilterState {
            max_duration: Some(10),
            ..FilterState::default()
        };
        assert_eq!(apply_filters(vec![t.clone()], &keep, now()).len(), 1);
        // 12:30 rounds to 13 minutes, over a 10 minute cap
        assert!(apply_filters(vec![t], &drop, now()).is_empty());
    }

    #[test]
    fn today_filter_boundary() {
        let filters = FilterState {
            today: true,
            ..FilterState::default()
        };
        let inside = topic("in", 1, Some(now() - Duration::hours(23) - Duration::minutes(59)));
        let outside = topic("out", 1, Some(now() - Duration::hours(24) - Duration::minutes(1)));
        let missing = topic("none", 1, None);
        let out = apply_filters(vec![inside, outside, missing], &filters, now());
        let ids: Vec<&str> = out.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["in"]);
    }

    #[test]
    fn topic_selection_is_exact_unless_all() {
        let topics = vec![topic("a", 1, None), topic("b", 2, None)];
        let filters = FilterState {
            topic: "b".to_string(),
            ..FilterState::default()
        };
        let out = apply_filters(topics.clone(), &filters, now());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "b");
        assert_eq!(apply_filters(topics, &FilterState::default(), now()).len(), 2);
    }
}
