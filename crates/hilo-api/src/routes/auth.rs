//! # Auth Routes
//!
//! - `GET  /api/v1/auth/whoami`: the [`Principal`] the guard attached.
//! - `POST /api/v1/auth/refresh`: renew an expired token.
//!
//! The refresh route is allowlisted by default: a caller holding an expired
//! token could not pass the guard to reach it. Possession of a token whose
//! signature still verifies is what the route checks instead.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::auth::Principal;
use crate::error::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/auth/whoami", get(whoami))
        .route("/api/v1/auth/refresh", post(refresh))
}

/// Body of `POST /api/v1/auth/refresh`, and its response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBody {
    pub token: String,
}

impl TokenBody {
    /// Unpack the JSON extractor result; serde and emptiness failures are 400s.
    fn from_request_body(body: Result<Json<Self>, JsonRejection>) -> Result<Self, AppError> {
        let Json(body) = body.map_err(|err| AppError::BadRequest(err.body_text()))?;
        if body.token.trim().is_empty() {
            return Err(AppError::BadRequest("token must not be empty".into()));
        }
        Ok(body)
    }
}

async fn whoami(principal: Principal) -> Json<Principal> {
    Json(principal)
}

/// A still-valid token comes back unchanged; an expired one comes back
/// re-signed with `exp = now + TOKEN_RENEWAL_SECS`.
async fn refresh(
    State(state): State<AppState>,
    body: Result<Json<TokenBody>, JsonRejection>,
) -> Result<Json<TokenBody>, AppError> {
    let request = TokenBody::from_request_body(body)?;
    let token = state
        .codec
        .refresh(request.token.trim(), state.config.token_renewal)?;
    Ok(Json(TokenBody {
        token: token.into_string(),
    }))
}
