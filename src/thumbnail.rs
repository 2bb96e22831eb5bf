//! YouTube video id extraction and thumbnail URL derivation.
//!
//! One extraction rule for every call site: the 11-character id class
//! terminates at `&`, `?` and `/` on its own, and one thumbnail size
//! (`hqdefault`) everywhere.

use once_cell::sync::Lazy;
use regex::Regex;

static VIDEO_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:youtube\.com/watch\?v=|youtu\.be/)([A-Za-z0-9_-]{11})")
        .expect("video id pattern is valid")
});

/// Extracts the 11-character YouTube video id from a watch or short URL.
pub fn youtube_video_id(url: &str) -> Option<String> {
    if url.is_empty() {
        return None;
    }
    VIDEO_ID_RE
        .captures(url)
        .map(|caps| caps[1].to_string())
}

/// Derives the canonical thumbnail URL for a video link, if the link
/// carries an extractable video id.
pub fn youtube_thumbnail(url: &str) -> Option<String> {
    youtube_video_id(url).map(|id| format!("https://img.youtube.com/vi/{}/hqdefault.jpg", id))
}
