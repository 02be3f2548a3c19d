use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use axum_extra::extract::TypedHeader;
use headers::{Authorization, authorization::Basic};

use super::api::AppState;

/// User name and password a client must present with HTTP basic auth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }

    fn matches(&self, basic: &Basic) -> bool {
        basic.username() == self.user && basic.password() == self.password
    }
}

/// Proof that the request passed the basic auth check.
///
/// Always succeeds when the service runs without credentials.
///
/// # Errors
/// - `401 Unauthorized` if the header is missing, malformed or does not match.
#[derive(Debug)]
pub struct ServiceAuth;

impl FromRequestParts<AppState> for ServiceAuth {
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.credentials.as_ref() else {
            return Ok(ServiceAuth);
        };

        let TypedHeader(Authorization(basic)) =
            TypedHeader::<Authorization<Basic>>::from_request_parts(parts, state)
                .await
                .map_err(|_| (StatusCode::UNAUTHORIZED, "Missing or invalid Authorization header"))?;

        if !expected.matches(&basic) {
            tracing::warn!(user = basic.username(), "Rejected grading request with bad credentials");
            return Err((StatusCode::UNAUTHORIZED, "Invalid credentials"));
        }
        Ok(ServiceAuth)
    }
}
