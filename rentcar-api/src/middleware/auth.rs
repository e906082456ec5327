use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
    Extension,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use rentcar_core::{authorize, Action, Actor};
use rentcar_store::app_config::AuthConfig;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// JWT Claims
// ============================================================================

/// Claims issued by the identity provider. Role is not part of the token;
/// it is read from the actor's profile on every request.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: Uuid,
    pub email: Option<String>,
    pub exp: usize,
}

pub fn decode_claims(token: &str, auth: &AuthConfig) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    match &auth.audience {
        Some(audience) => validation.set_audience(&[audience]),
        None => validation.validate_aud = false,
    }

    decode::<Claims>(token, &DecodingKey::from_secret(auth.jwt_secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::debug!("Rejected token: {}", e);
            AppError::AuthenticationError("Invalid or expired token".to_string())
        })
}

// ============================================================================
// Actor Resolution
// ============================================================================

/// Resolves the bearer token to an `Actor` and injects it into request extensions.
pub async fn actor_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let bearer = req
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or_else(|| AppError::AuthenticationError("Missing bearer token".to_string()))?;

    let claims = decode_claims(bearer.token(), &state.auth)?;
    let profile = state.profiles.ensure_profile(claims.sub).await?;
    let actor = Actor::new(claims.sub, profile.role);

    req.extensions_mut().insert(actor);
    Ok(next.run(req).await)
}

// ============================================================================
// Admin Area Gate
// ============================================================================

/// Must run after `actor_middleware`. Individual handlers still check their own action.
pub async fn admin_area_middleware(
    Extension(actor): Extension<Actor>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    authorize(actor.role, Action::ViewAdminArea, false)?;
    Ok(next.run(req).await)
}
