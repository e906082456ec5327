use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use rentcar_core::blog::BlogPost;

use crate::{error::AppError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/blog", get(list_posts))
        .route("/v1/blog/{id}", get(get_post))
}

async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<BlogPost>>, AppError> {
    Ok(Json(state.blog.list_posts().await?))
}

async fn get_post(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<BlogPost>, AppError> {
    state
        .blog
        .get_post(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFoundError(format!("Post {} not found", id)))
}
