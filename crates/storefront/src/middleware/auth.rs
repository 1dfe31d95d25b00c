//! Authentication extractors.
//!
//! The signed-in user lives in the session under the `user` key (see
//! [`SessionContainer`](crate::containers::SessionContainer)). These
//! extractors read it for handlers that only need the identity.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use bazaar_core::User;
use tower_sessions::Session;

use crate::models::session_keys;

/// Extractor that requires a signed-in user.
///
/// Guests are redirected to the login page with a `next` parameter pointing
/// back at the requested path.
///
/// # Example
///
/// ```rust,ignore
/// async fn profile(RequireUser(user): RequireUser) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct RequireUser(pub User);

/// Error returned when a page requires a signed-in user.
pub enum AuthRejection {
    /// Redirect to the login page.
    RedirectToLogin(String),
    /// The session layer is missing.
    MissingSession,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin(next) => {
                Redirect::to(&format!("/login?next={}", urlencoding::encode(&next))).into_response()
            }
            Self::MissingSession => {
                tracing::error!("Session not found in request extensions - session layer missing");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AuthRejection::MissingSession)?;

        let user: User = session
            .get::<Option<User>>(session_keys::USER)
            .await
            .ok()
            .flatten()
            .flatten()
            .ok_or_else(|| AuthRejection::RedirectToLogin(parts.uri.path().to_string()))?;

        Ok(Self(user))
    }
}

/// Extractor that optionally gets the signed-in user.
///
/// Unlike `RequireUser`, this never rejects.
pub struct OptionalUser(pub Option<User>);

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<Option<User>>(session_keys::USER)
                .await
                .ok()
                .flatten()
                .flatten(),
            None => None,
        };

        Ok(Self(user))
    }
}

/// Only allow local redirect targets (`/path`, not `//host` or absolute URLs).
///
/// Control characters are rejected since browsers drop them from a `Location`.
#[must_use]
pub fn safe_redirect_target(next: Option<&str>) -> &str {
    match next {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.contains('\\')
                && !path.chars().any(char::is_control) =>
        {
            path
        }
        _ => "/",
    }
}
