use axum::{extract::State, routing::get, Extension, Json, Router};
use rentcar_core::profile::{Profile, ProfileUpdate};
use rentcar_core::Actor;

use crate::{error::AppError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/profile", get(my_profile).put(update_profile))
}

async fn my_profile(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Profile>, AppError> {
    Ok(Json(state.profiles.ensure_profile(actor.id).await?))
}

async fn update_profile(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<Profile>, AppError> {
    update.validate(state.today())?;
    let profile = state.profiles.update_details(actor.id, &update).await?;
    tracing::info!("Profile {} updated", actor.id);
    Ok(Json(profile))
}
