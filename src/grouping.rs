//! Re-groupings of the filtered view model for the creator and stance views.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::routes::{TopicView, VideoView};

/// Stance buckets are emitted in this order; anything else follows in
/// first-seen order.
pub const STANCE_ORDER: [&str; 3] = ["Balanced", "Hawkish", "International"];

/// Bucket key for videos with no stance set.
const OTHER_STANCE: &str = "Other";

/// A video stamped with the topic it came from, for the creator view.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreatorVideo {
    #[serde(flatten)]
    pub video: VideoView,
    pub topic_id: String,
    pub topic_title: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct CreatorGroup {
    pub creator: String,
    pub videos: Vec<CreatorVideo>,
}

#[derive(Debug, Serialize, Clone)]
pub struct StanceGroup {
    pub stance: String,
    pub videos: Vec<VideoView>,
}

/// Flattens every topic's videos into per-creator buckets, alphabetically
/// ordered by creator display name.
pub fn group_by_creator(topics: &[TopicView]) -> Vec<CreatorGroup> {
    let mut buckets: BTreeMap<String, Vec<CreatorVideo>> = BTreeMap::new();
    for topic in topics {
        for video in &topic.videos {
            buckets
                .entry(video.channel.clone())
                .or_default()
                .push(CreatorVideo {
                    video: video.clone(),
                    topic_id: topic.id.clone(),
                    topic_title: topic.title.clone(),
                });
        }
    }
    buckets
        .into_iter()
        .map(|(creator, videos)| CreatorGroup { creator, videos })
        .collect()
}

/// Narrows creator buckets to an explicit selection; an empty selection
/// passes everything through.
pub fn restrict_creators(groups: Vec<CreatorGroup>, selected: &[String]) -> Vec<CreatorGroup> {
    if selected.is_empty() {
        return groups;
    }
    groups
        .into_iter()
        .filter(|group| selected.iter().any(|name| name == &group.creator))
        .collect()
}

/// Buckets a topic's videos by stance: the fixed primary stances first (of
/// those present), then any remaining stances in first-seen order. Videos
/// keep their input order within each bucket.
pub fn group_by_stance(videos: &[VideoView]) -> Vec<StanceGroup> {
    let mut seen_order: Vec<String> = Vec::new();
    let mut buckets: HashMap<String, Vec<VideoView>> = HashMap::new();

    for video in videos {
        let stance = if video.stance.is_empty() {
            OTHER_STANCE.to_string()
        } else {
            video.stance.clone()
        };
        if !buckets.contains_key(&stance) {
            seen_order.push(stance.clone());
        }
        buckets.entry(stance).or_default().push(video.clone());
    }

    let mut groups = Vec::with_capacity(buckets.len());
    for stance in STANCE_ORDER {
        if let Some(videos) = buckets.remove(stance) {
            groups.push(StanceGroup {
                stance: stance.to_string(),
                videos,
            });
        }
    }
    for stance in seen_order {
        if let Some(videos) = buckets.remove(&stance) {
            groups.push(StanceGroup { stance, videos });
        }
    }
    groups
}
