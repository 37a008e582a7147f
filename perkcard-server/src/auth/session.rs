//! Session JWTs and the per-request [`AuthContext`]

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// JWT claims for a signed-in user
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User ID
    pub sub: String,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Businesses this user works for as staff
    #[serde(default)]
    pub businesses: Vec<i64>,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

/// Authenticated identity handed to every redemption operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: String,
    pub display_name: Option<String>,
    pub business_ids: Vec<i64>,
}

impl AuthContext {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: None,
            business_ids: Vec::new(),
        }
    }

    pub fn with_business(mut self, business_id: i64) -> Self {
        self.business_ids.push(business_id);
        self
    }

    pub fn is_staff_of(&self, business_id: i64) -> bool {
        self.business_ids.contains(&business_id)
    }
}

impl From<SessionClaims> for AuthContext {
    fn from(claims: SessionClaims) -> Self {
        Self {
            user_id: claims.sub,
            display_name: claims.name,
            business_ids: claims.businesses,
        }
    }
}

const JWT_EXPIRY_HOURS: i64 = 24;

/// Create a session token
pub fn create_token(
    auth: &AuthContext,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = SessionClaims {
        sub: auth.user_id.clone(),
        name: auth.display_name.clone(),
        businesses: auth.business_ids.clone(),
        exp: (now + chrono::Duration::hours(JWT_EXPIRY_HOURS)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Decode and verify a session token
pub fn decode_token(
    token: &str,
    secret: &str,
) -> Result<AuthContext, jsonwebtoken::errors::Error> {
    let data = jsonwebtoken::decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims.into())
}

/// Attach an [`AuthContext`] when the request carries a valid bearer token.
///
/// Never rejects: handlers receive `Option<Extension<AuthContext>>` and the
/// redemption core answers `not_authenticated` itself.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    if let Some(token) = token {
        match decode_token(token, &state.jwt_secret) {
            Ok(auth) => {
                request.extensions_mut().insert(auth);
            }
            Err(e) => tracing::debug!("JWT validation failed: {e}"),
        }
    }

    next.run(request).await
}
