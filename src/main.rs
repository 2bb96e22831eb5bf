mod db;
mod duration;
mod errors;
mod filters;
mod grouping;
mod recency;
mod routes;
mod thumbnail;
mod utils;

use crate::db::init_db;
use crate::routes::{
    add_creator, add_video, all_creators, all_topics, create_topic, delete_creator, delete_topic,
    delete_video, health_check, prune_topics, topic_stances, topics_by_creator, update_topic,
};

use axum::routing::{delete, get};
use axum::Router;
use axum_prometheus::PrometheusMetricLayer;
use sqlx::PgPool;
use std::error::Error;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Clone)]
pub struct InnerState {
    pub db: PgPool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api_signalwatch=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db = init_db().await?;

    let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();

    let app_state = InnerState { db };

    let app = Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(|| async move { metric_handle.render() }))

        .route("/topics", get(all_topics).post(create_topic))
        .route("/topics/prune", delete(prune_topics))
        .route("/topics/by-creator", get(topics_by_creator))
        .route("/topics/:topic_id", axum::routing::patch(update_topic).delete(delete_topic))
        .route("/topics/:topic_id/stances", get(topic_stances))
        .route("/topics/:topic_id/videos", axum::routing::post(add_video))
        .route("/topics/:topic_id/videos/:video_id", delete(delete_video))

        .route("/creators", get(all_creators).post(add_creator))
        .route("/creators/:name", delete(delete_creator))

        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(prometheus_layer)
        .with_state(app_state);

    let port = std::env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .expect("Could not initialize TcpListener");

    tracing::debug!(
        "listening on {}",
        listener
            .local_addr()
            .expect("Could not convert listener address to local address")
    );

    axum::serve(listener, app)
        .await
        .expect("Could not successfully serve");

    Ok(())
}
