use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::duration::duration_to_seconds;
use crate::errors::AppError;
use crate::routes::topics::{load_topics, TopicView};
use crate::thumbnail::{youtube_thumbnail, youtube_video_id};
use crate::InnerState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoInput {
    pub title: String,
    pub url: String,
    /// "MM:SS" as entered in the admin form.
    pub duration: Option<String>,
    /// Creator display name, resolved to a channel id on insert.
    pub channel: String,
    pub stance: Option<String>,
    pub covers: Option<Vec<String>>,
}

#[tracing::instrument(name = "Add video to topic", skip(inner))]
pub async fn add_video(
    State(inner): State<InnerState>,
    Path(topic_id): Path<String>,
    Json(video): Json<VideoInput>,
) -> Result<Json<Vec<TopicView>>, AppError> {
    let InnerState { db } = inner;

    let channel: Option<(String,)> = sqlx::query_as(r#"SELECT id FROM channels WHERE name = $1"#)
        .bind(&video.channel)
        .fetch_optional(&db)
        .await?;

    let Some((channel_id,)) = channel else {
        return Err(AppError::Validation(format!(
            "Channel \"{}\" not found. Please add it in Manage Creators first.",
            video.channel
        )));
    };

    let Some(youtube_id) = youtube_video_id(&video.url) else {
        return Err(AppError::Validation(
            "Invalid YouTube URL - could not extract video ID".to_string(),
        ));
    };
    let thumbnail = youtube_thumbnail(&video.url);

    let uuid = Uuid::new_v4().to_string();
    let duration_secs = duration_to_seconds(video.duration.as_deref().unwrap_or_default()) as i32;

    sqlx::query(
        r#"INSERT INTO videos (id, topic_id, channel_id, youtube_video_id, video_title,
                               video_url, thumbnail_url, duration, stance, covers, published_at)
           VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, NOW())"#,
    )
    .bind(&uuid)
    .bind(&topic_id)
    .bind(&channel_id)
    .bind(&youtube_id)
    .bind(&video.title)
    .bind(&video.url)
    .bind(&thumbnail)
    .bind(duration_secs)
    .bind(video.stance.as_deref().unwrap_or("Balanced"))
    .bind(video.covers.unwrap_or_default())
    .execute(&db)
    .await?;

    tracing::info!(video_id = %uuid, topic_id = %topic_id, "Added video");

    Ok(Json(load_topics(&db).await))
}

#[tracing::instrument(name = "Delete video", skip(inner))]
pub async fn delete_video(
    State(inner): State<InnerState>,
    Path((topic_id, video_id)): Path<(String, String)>,
) -> Result<Json<Vec<TopicView>>, AppError> {
    let InnerState { db } = inner;

    let result = sqlx::query(r#"DELETE FROM videos WHERE id = $1"#)
        .bind(&video_id)
        .execute(&db)
        .await?;

    tracing::info!(
        video_id = %video_id,
        topic_id = %topic_id,
        rows = result.rows_affected(),
        "Deleted video"
    );

    Ok(Json(load_topics(&db).await))
}
