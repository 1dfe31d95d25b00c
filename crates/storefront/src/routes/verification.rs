//! Email verification route handlers.
//!
//! After registration (or a login attempt on an unverified account) the
//! address waits in the session until the visitor enters the code. The
//! resend countdown is cosmetic: resending is always accepted and restarts
//! it.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use serde::Deserialize;
use tracing::instrument;

use bazaar_core::verification::CODE_LENGTH;

use crate::containers::{SessionContainer, VerificationContainer};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::PageContext;
use crate::services::AuthError;
use crate::state::AppState;

/// Verification code form data.
#[derive(Debug, Deserialize)]
pub struct VerifyForm {
    pub code: String,
}

/// Verification page query parameters.
#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    pub resent: Option<String>,
}

/// Verification page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/verify_email.html")]
pub struct VerifyEmailTemplate {
    pub page: PageContext,
    pub email: String,
    /// Seconds until the resend button unlocks.
    pub remaining: i64,
    pub code_length: usize,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Display the verification page.
#[instrument(skip(page, pending))]
pub async fn show(
    page: PageContext,
    pending: VerificationContainer,
    Query(query): Query<VerifyQuery>,
) -> Response {
    let Some(verification) = pending.pending() else {
        return Redirect::to("/register").into_response();
    };

    VerifyEmailTemplate {
        email: verification.email.to_string(),
        remaining: verification.countdown.remaining(Utc::now()),
        code_length: CODE_LENGTH,
        error: None,
        success: query
            .resent
            .is_some()
            .then(|| format!("We sent a new code to {}.", verification.email)),
        page,
    }
    .into_response()
}

/// Check the submitted code.
///
/// The configured literal code verifies the account and signs the visitor
/// in; anything else re-renders the page with an inline message.
///
/// # Errors
///
/// Returns an error only for server-side auth failures.
#[instrument(skip(state, page, session, pending, form))]
pub async fn verify(
    State(state): State<AppState>,
    page: PageContext,
    mut session: SessionContainer,
    mut pending: VerificationContainer,
    Form(form): Form<VerifyForm>,
) -> Result<Response> {
    let Some(verification) = pending.pending().cloned() else {
        return Ok(Redirect::to("/register").into_response());
    };

    match state.auth().verify_email(&verification.email, &form.code).await {
        Ok(user) => {
            pending.finish().await;
            session.login(user).await;
            Ok(Redirect::to("/profile").into_response())
        }
        Err(e) if e.is_internal() => Err(AppError::Auth(e)),
        Err(e) => {
            if matches!(e, AuthError::UserNotFound) {
                tracing::warn!("Pending verification for an unknown account");
            }
            Ok(VerifyEmailTemplate {
                page,
                email: verification.email.to_string(),
                remaining: verification.countdown.remaining(Utc::now()),
                code_length: CODE_LENGTH,
                error: Some(e.to_string()),
                success: None,
            }
            .into_response())
        }
    }
}

/// Resend the code and restart the countdown.
#[instrument(skip(state, pending))]
pub async fn resend(State(state): State<AppState>, mut pending: VerificationContainer) -> Redirect {
    let Some(email) = pending.pending().map(|p| p.email.clone()) else {
        return Redirect::to("/register");
    };

    pending.restart_countdown(Utc::now()).await;
    state.auth().resend_verification(&email).await;
    Redirect::to("/verify-email?resent=1")
}
