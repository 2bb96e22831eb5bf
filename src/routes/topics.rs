use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::duration::seconds_to_duration;
use crate::errors::AppError;
use crate::filters::{apply_filters, FilterState};
use crate::grouping::{group_by_creator, group_by_stance, restrict_creators, CreatorGroup, StanceGroup};
use crate::recency::relative_age;
use crate::utils::slugify;
use crate::InnerState;

/// A topic as stored, before assembly into the view model.
#[derive(Debug, FromRow)]
struct TopicRow {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub region: Option<String>,
    pub why_matters: Option<String>,
    pub priority: i32,
    pub is_active: bool,
    pub last_update: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

/// A video row joined with its channel's display name.
#[derive(Debug, FromRow)]
struct VideoRow {
    pub id: String,
    pub topic_id: String,
    pub video_title: String,
    pub video_url: String,
    pub thumbnail_url: Option<String>,
    pub duration: i32,
    pub stance: Option<String>,
    pub covers: Option<Vec<String>>,
    pub channel_name: Option<String>,
}

/// UI-ready video shape: resolved channel name, decoded duration.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VideoView {
    pub id: String,
    pub title: String,
    pub url: String,
    pub thumbnail: Option<String>,
    pub duration: String,
    pub channel: String,
    pub stance: String,
    pub covers: Vec<String>,
}

/// UI-ready topic shape with its materialized video list.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TopicView {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub region: Option<String>,
    pub why_matters: Option<String>,
    pub priority: i32,
    pub is_active: bool,
    pub last_update: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_label: Option<String>,
    pub videos: Vec<VideoView>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicInput {
    pub title: String,
    pub why_matters: Option<String>,
    pub priority: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicPatch {
    pub title: Option<String>,
    pub why_matters: Option<String>,
    pub priority: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct PruneParams {
    pub above: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreatorViewParams {
    pub topic: String,
    pub max_duration: Option<i64>,
    pub today: bool,
    pub favorite: bool,
    /// Comma-separated creator names to narrow the buckets to.
    pub creators: Option<String>,
}

impl Default for CreatorViewParams {
    fn default() -> Self {
        Self {
            topic: "all".to_string(),
            max_duration: None,
            today: false,
            favorite: false,
            creators: None,
        }
    }
}

const SELECT_TOPICS: &str = r#"
    SELECT id, title, slug, region, why_matters, priority, is_active, last_update, created_at
    FROM topics
    ORDER BY priority ASC, last_update DESC
"#;

const SELECT_VIDEOS_WITH_CHANNEL: &str = r#"
    SELECT v.id, v.topic_id, v.video_title, v.video_url, v.thumbnail_url,
           v.duration, v.stance, v.covers, c.name AS channel_name
    FROM videos v
    LEFT JOIN channels c ON c.id = v.channel_id
"#;

/// Assembles the full topic view model: all topics ordered by priority and
/// recency, each carrying its videos with resolved channel names.
///
/// A failed videos fetch degrades to empty video lists; a failed topics
/// fetch yields an empty list. Both are logged, neither aborts the load.
pub async fn load_topics(db: &PgPool) -> Vec<TopicView> {
    let (topics_res, videos_res) = futures::join!(
        sqlx::query_as::<_, TopicRow>(SELECT_TOPICS).fetch_all(db),
        sqlx::query_as::<_, VideoRow>(SELECT_VIDEOS_WITH_CHANNEL).fetch_all(db),
    );

    let topic_rows = match topics_res {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch topics, returning empty topic list");
            return Vec::new();
        }
    };

    let video_rows = match videos_res {
        Ok(rows) => rows,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch videos, topics will carry empty video lists");
            Vec::new()
        }
    };

    let mut videos_by_topic: HashMap<String, Vec<VideoView>> = HashMap::new();
    for row in video_rows {
        videos_by_topic
            .entry(row.topic_id)
            .or_default()
            .push(VideoView {
                id: row.id,
                title: row.video_title,
                url: row.video_url,
                thumbnail: row.thumbnail_url,
                duration: seconds_to_duration(row.duration as i64),
                channel: row.channel_name.unwrap_or_else(|| "Unknown".to_string()),
                stance: row.stance.unwrap_or_default(),
                covers: row.covers.unwrap_or_default(),
            });
    }

    let now = Utc::now();
    topic_rows
        .into_iter()
        .map(|row| {
            let updated_at = row.last_update.or(row.created_at);
            TopicView {
                videos: videos_by_topic.remove(&row.id).unwrap_or_default(),
                updated_label: updated_at.map(|ts| relative_age(ts, now)),
                updated_at,
                id: row.id,
                title: row.title,
                slug: row.slug,
                region: row.region,
                why_matters: row.why_matters,
                priority: row.priority,
                is_active: row.is_active,
                last_update: row.last_update,
                created_at: row.created_at,
            }
        })
        .collect()
}

#[tracing::instrument(name = "List topics", skip(inner))]
pub async fn all_topics(
    State(inner): State<InnerState>,
    Query(filters): Query<FilterState>,
) -> Json<Vec<TopicView>> {
    let InnerState { db } = inner;
    let topics = load_topics(&db).await;
    Json(apply_filters(topics, &filters, Utc::now()))
}

#[tracing::instrument(name = "Group topics by creator", skip(inner))]
pub async fn topics_by_creator(
    State(inner): State<InnerState>,
    Query(params): Query<CreatorViewParams>,
) -> Json<Vec<CreatorGroup>> {
    let InnerState { db } = inner;

    let filters = FilterState {
        topic: params.topic,
        max_duration: params.max_duration,
        today: params.today,
        favorite: params.favorite,
    };
    let selected: Vec<String> = params
        .creators
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect();

    let topics = apply_filters(load_topics(&db).await, &filters, Utc::now());
    Json(restrict_creators(group_by_creator(&topics), &selected))
}

#[tracing::instrument(name = "Group topic videos by stance", skip(inner))]
pub async fn topic_stances(
    State(inner): State<InnerState>,
    Path(topic_id): Path<String>,
) -> Result<Json<Vec<StanceGroup>>, AppError> {
    let InnerState { db } = inner;

    let topics = load_topics(&db).await;
    let topic = topics
        .iter()
        .find(|t| t.id == topic_id)
        .ok_or_else(|| AppError::NotFound(format!("Topic {} not found", topic_id)))?;

    Ok(Json(group_by_stance(&topic.videos)))
}

#[tracing::instrument(name = "Create topic", skip(inner))]
pub async fn create_topic(
    State(inner): State<InnerState>,
    Json(input): Json<TopicInput>,
) -> Result<Json<Vec<TopicView>>, AppError> {
    let InnerState { db } = inner;

    if input.title.trim().is_empty() {
        return Err(AppError::Validation("Topic title must not be empty".to_string()));
    }

    let new_priority = match input.priority {
        Some(p) if p != 0 => p,
        _ => 1,
    };
    let slug = slugify(&input.title);
    let uuid = Uuid::new_v4().to_string();

    // Renumber and insert in one transaction so concurrent creates cannot
    // interleave between the bump and the insert.
    let mut tx = db.begin().await?;

    sqlx::query(r#"UPDATE topics SET priority = priority + 1 WHERE priority >= $1"#)
        .bind(new_priority)
        .execute(&mut *tx)
        .await?;

    sqlx::query(
        r#"INSERT INTO topics (id, title, slug, region, why_matters, priority, is_active, created_at)
           VALUES ($1, $2, $3, $4, $5, $6, true, NOW())"#,
    )
    .bind(&uuid)
    .bind(&input.title)
    .bind(&slug)
    .bind("General")
    .bind(&input.why_matters)
    .bind(new_priority)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(topic_id = %uuid, priority = new_priority, "Created topic");

    Ok(Json(load_topics(&db).await))
}

#[tracing::instrument(name = "Update topic", skip(inner))]
pub async fn update_topic(
    State(inner): State<InnerState>,
    Path(topic_id): Path<String>,
    Json(input): Json<TopicPatch>,
) -> Result<Json<Vec<TopicView>>, AppError> {
    let InnerState { db } = inner;

    // Slug follows the title, and only the title.
    let slug = input.title.as_deref().map(slugify);

    let result = sqlx::query(
        r#"UPDATE topics
           SET title = COALESCE($2, title),
               why_matters = COALESCE($3, why_matters),
               priority = $4,
               slug = COALESCE($5, slug),
               last_update = NOW()
           WHERE id = $1"#,
    )
    .bind(&topic_id)
    .bind(&input.title)
    .bind(&input.why_matters)
    .bind(input.priority.unwrap_or(0))
    .bind(&slug)
    .execute(&db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Topic {} not found", topic_id)));
    }

    tracing::info!(topic_id = %topic_id, "Updated topic");

    Ok(Json(load_topics(&db).await))
}

#[tracing::instrument(name = "Delete topic", skip(inner))]
pub async fn delete_topic(
    State(inner): State<InnerState>,
    Path(topic_id): Path<String>,
) -> Result<Json<Vec<TopicView>>, AppError> {
    let InnerState { db } = inner;

    // Videos go with the topic via the FK cascade.
    let result = sqlx::query(r#"DELETE FROM topics WHERE id = $1"#)
        .bind(&topic_id)
        .execute(&db)
        .await?;

    tracing::info!(topic_id = %topic_id, rows = result.rows_affected(), "Deleted topic");

    Ok(Json(load_topics(&db).await))
}

#[tracing::instrument(name = "Prune low-prominence topics", skip(inner))]
pub async fn prune_topics(
    State(inner): State<InnerState>,
    Query(params): Query<PruneParams>,
) -> Result<Json<Vec<TopicView>>, AppError> {
    let InnerState { db } = inner;

    let threshold = params.above.unwrap_or(30);
    let result = sqlx::query(r#"DELETE FROM topics WHERE priority > $1"#)
        .bind(threshold)
        .execute(&db)
        .await?;

    tracing::info!(threshold, rows = result.rows_affected(), "Pruned topics");

    Ok(Json(load_topics(&db).await))
}

#[cfg(test)]
mod db_tests {
    use super::*;
    use crate::routes::channel::add_creator;
    use crate::routes::videos::{add_video, VideoInput};

    async fn test_state() -> InnerState {
        dotenvy::dotenv().ok();
        let db = crate::db::init_db().await.expect("DATABASE_URL must point at a test database");
        InnerState { db }
    }

    #[tokio::test]
    #[ignore = "requires a DATABASE_URL pointing at a disposable database"]
    async fn create_topic_and_add_video_end_to_end() {
        let state = test_state().await;

        add_creator(
            State(state.clone()),
            Json(crate::routes::channel::CreatorInput {
                name: "NewsCo".to_string(),
            }),
        )
        .await
        .expect("add creator");

        let topics = create_topic(
            State(state.clone()),
            Json(TopicInput {
                title: "Border Talks".to_string(),
                why_matters: Some("Ongoing negotiations".to_string()),
                priority: Some(1),
            }),
        )
        .await
        .expect("create topic")
        .0;
        let topic = topics
            .iter()
            .find(|t| t.title == "Border Talks")
            .expect("created topic present");
        assert_eq!(topic.slug, "border-talks");
        let topic_id = topic.id.clone();

        let topics = add_video(
            State(state.clone()),
            Path(topic_id.clone()),
            Json(VideoInput {
                title: "Update".to_string(),
                url: "https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string(),
                duration: Some("12:30".to_string()),
                channel: "NewsCo".to_string(),
                stance: Some("Balanced".to_string()),
                covers: None,
            }),
        )
        .await
        .expect("add video")
        .0;

        let topic = topics.iter().find(|t| t.id == topic_id).unwrap();
        assert_eq!(topic.videos.len(), 1);
        assert_eq!(topic.videos[0].duration, "12:30");
        assert_eq!(topic.videos[0].channel, "NewsCo");

        let keep = FilterState {
            max_duration: Some(15),
            ..FilterState::default()
        };
        let drop = FilterState {
            max_duration: Some(10),
            ..FilterState::default()
        };
        let kept = apply_filters(topics.clone(), &keep, Utc::now());
        assert!(kept.iter().any(|t| t.id == topic_id));
        let dropped = apply_filters(topics, &drop, Utc::now());
        assert!(!dropped.iter().any(|t| t.id == topic_id));

        delete_topic(State(state), Path(topic_id))
            .await
            .expect("delete topic");
    }
}
