use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::InnerState;

#[derive(Debug, Deserialize)]
pub struct CreatorInput {
    pub name: String,
}

/// All creator display names, alphabetically ordered.
pub async fn load_creators(db: &PgPool) -> Result<Vec<String>, AppError> {
    let rows: Vec<(String,)> = sqlx::query_as(r#"SELECT name FROM channels ORDER BY name ASC"#)
        .fetch_all(db)
        .await?;
    Ok(rows.into_iter().map(|(name,)| name).collect())
}

#[tracing::instrument(name = "List creators", skip(inner))]
pub async fn all_creators(
    State(inner): State<InnerState>,
) -> Result<Json<Vec<String>>, AppError> {
    let InnerState { db } = inner;
    Ok(Json(load_creators(&db).await?))
}

#[tracing::instrument(name = "Add creator", skip(inner))]
pub async fn add_creator(
    State(inner): State<InnerState>,
    Json(input): Json<CreatorInput>,
) -> Result<Json<Vec<String>>, AppError> {
    let InnerState { db } = inner;

    if input.name.trim().is_empty() {
        return Err(AppError::Validation("Creator name must not be empty".to_string()));
    }

    let existing: Option<(String,)> = sqlx::query_as(r#"SELECT id FROM channels WHERE name = $1"#)
        .bind(&input.name)
        .fetch_optional(&db)
        .await?;

    if existing.is_none() {
        sqlx::query(r#"INSERT INTO channels (id, name) VALUES ($1, $2)"#)
            .bind(Uuid::new_v4().to_string())
            .bind(&input.name)
            .execute(&db)
            .await?;
        tracing::info!(name = %input.name, "Added creator");
    } else {
        tracing::debug!(name = %input.name, "Creator already exists, skipping insert");
    }

    Ok(Json(load_creators(&db).await?))
}

#[tracing::instrument(name = "Delete creator", skip(inner))]
pub async fn delete_creator(
    State(inner): State<InnerState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<String>>, AppError> {
    let InnerState { db } = inner;

    let result = sqlx::query(r#"DELETE FROM channels WHERE name = $1"#)
        .bind(&name)
        .execute(&db)
        .await?;

    tracing::info!(name = %name, rows = result.rows_affected(), "Deleted creator");

    Ok(Json(load_creators(&db).await?))
}

#[cfg(test)]
mod db_tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires a DATABASE_URL pointing at a disposable database"]
    async fn add_creator_is_idempotent() {
        dotenvy::dotenv().ok();
        let db = crate::db::init_db().await.expect("DATABASE_URL must point at a test database");
        let state = InnerState { db: db.clone() };

        for _ in 0..2 {
            add_creator(
                State(state.clone()),
                Json(CreatorInput {
                    name: "Idempotence Test Channel".to_string(),
                }),
            )
            .await
            .expect("add creator");
        }

        let (count,): (i64,) =
            sqlx::query_as(r#"SELECT COUNT(*) FROM channels WHERE name = $1"#)
                .bind("Idempotence Test Channel")
                .fetch_one(&db)
                .await
                .expect("count");
        assert_eq!(count, 1);

        delete_creator(State(state), Path("Idempotence Test Channel".to_string()))
            .await
            .expect("cleanup");
    }
}
