//! Authentication route handlers.
//!
//! Handles login, registration, logout and the two-step password reset.
//! Validation failures re-render the form with an inline message; only
//! server faults become an `AppError`.

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

use crate::containers::{SessionContainer, VerificationContainer};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{PageContext, safe_redirect_target};
use crate::services::{AuthError, Registration, fixtures};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub next: Option<String>,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

/// Forgot password form data.
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordForm {
    pub email: String,
}

/// Reset password form data.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordForm {
    pub email: String,
    pub code: String,
    pub password: String,
    pub password_confirm: String,
}

/// Login page query parameters.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
    pub notice: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub page: PageContext,
    pub email: String,
    pub next: String,
    pub error: Option<String>,
    pub success: Option<String>,
    pub demo_email: &'static str,
    pub demo_password: &'static str,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub page: PageContext,
    pub name: String,
    pub email: String,
    pub error: Option<String>,
}

/// Forgot password page template (request and reset steps).
#[derive(Template, WebTemplate)]
#[template(path = "auth/forgot_password.html")]
pub struct ForgotPasswordTemplate {
    pub page: PageContext,
    /// Show the code + new password step.
    pub reset_step: bool,
    pub email: String,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Turn an auth failure into an inline message, or an `AppError` for server
/// faults.
fn inline_error(error: AuthError) -> Result<String> {
    if error.is_internal() {
        Err(AppError::Auth(error))
    } else {
        Ok(error.to_string())
    }
}

/// Map a notice code from a redirect to its message.
fn notice_message(code: &str) -> Option<&'static str> {
    match code {
        "reset" => Some("Your password has been updated. Please sign in."),
        "signed_out" => Some("You have been signed out."),
        _ => None,
    }
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(page: PageContext, Query(query): Query<LoginQuery>) -> Response {
    if page.user.is_some() {
        return Redirect::to(safe_redirect_target(query.next.as_deref())).into_response();
    }

    LoginTemplate {
        page,
        email: String::new(),
        next: query.next.unwrap_or_default(),
        error: None,
        success: query
            .notice
            .as_deref()
            .and_then(notice_message)
            .map(String::from),
        demo_email: fixtures::DEMO_EMAIL,
        demo_password: fixtures::DEMO_PASSWORD,
    }
    .into_response()
}

/// Handle login form submission.
///
/// Unverified accounts are sent to the verification page instead.
///
/// # Errors
///
/// Returns an error only for server-side auth failures.
#[instrument(skip(state, page, session, pending, form), fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    page: PageContext,
    mut session: SessionContainer,
    mut pending: VerificationContainer,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    match state.auth().login(&form.email, &form.password).await {
        Ok(user) => {
            session.login(user).await;
            let target = match form.next.as_deref() {
                Some(next) if !next.is_empty() => safe_redirect_target(Some(next)),
                _ => "/profile",
            };
            Ok(Redirect::to(target).into_response())
        }
        Err(AuthError::Unverified(email)) => {
            tracing::info!("Login for unverified account, sending to verification");
            pending.start(email, Utc::now()).await;
            Ok(Redirect::to("/verify-email").into_response())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Login failed");
            Ok(LoginTemplate {
                page,
                email: form.email,
                next: form.next.unwrap_or_default(),
                error: Some(inline_error(e)?),
                success: None,
                demo_email: fixtures::DEMO_EMAIL,
                demo_password: fixtures::DEMO_PASSWORD,
            }
            .into_response())
        }
    }
}

/// Handle logout.
#[instrument(skip(session))]
pub async fn logout(mut session: SessionContainer) -> Redirect {
    session.logout().await;
    Redirect::to("/login?notice=signed_out")
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(page: PageContext) -> Response {
    if page.user.is_some() {
        return Redirect::to("/profile").into_response();
    }
    RegisterTemplate {
        page,
        name: String::new(),
        email: String::new(),
        error: None,
    }
    .into_response()
}

/// Handle registration form submission.
///
/// Creates an unverified account and sends the visitor to enter the code.
///
/// # Errors
///
/// Returns an error only for server-side auth failures.
#[instrument(skip(state, page, pending, form), fields(email = %form.email))]
pub async fn register(
    State(state): State<AppState>,
    page: PageContext,
    mut pending: VerificationContainer,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    let registration = Registration {
        name: &form.name,
        email: &form.email,
        password: &form.password,
        password_confirm: &form.password_confirm,
    };

    match state.auth().register(registration).await {
        Ok(user) => {
            pending.start(user.email, Utc::now()).await;
            Ok(Redirect::to("/verify-email").into_response())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Registration failed");
            Ok(RegisterTemplate {
                page,
                error: Some(inline_error(e)?),
                name: form.name,
                email: form.email,
            }
            .into_response())
        }
    }
}

// =============================================================================
// Password Reset Routes
// =============================================================================

/// Display the forgot password page.
pub async fn forgot_password_page(page: PageContext) -> impl IntoResponse {
    ForgotPasswordTemplate {
        page,
        reset_step: false,
        email: String::new(),
        error: None,
        success: None,
    }
}

/// Handle forgot password form submission.
///
/// Always reports success so the page does not reveal which emails have
/// accounts.
#[instrument(skip(state, page, form))]
pub async fn forgot_password(
    State(state): State<AppState>,
    page: PageContext,
    Form(form): Form<ForgotPasswordForm>,
) -> impl IntoResponse {
    state.auth().request_password_reset(&form.email).await;

    ForgotPasswordTemplate {
        page,
        reset_step: true,
        success: Some(format!(
            "If an account exists for {}, we sent it a reset code.",
            form.email.trim()
        )),
        email: form.email.trim().to_string(),
        error: None,
    }
}

/// Handle the code + new password step.
///
/// # Errors
///
/// Returns an error only for server-side auth failures.
#[instrument(skip(state, page, form))]
pub async fn reset_password(
    State(state): State<AppState>,
    page: PageContext,
    Form(form): Form<ResetPasswordForm>,
) -> Result<Response> {
    match state
        .auth()
        .reset_password(&form.email, &form.code, &form.password, &form.password_confirm)
        .await
    {
        Ok(()) => Ok(Redirect::to("/login?notice=reset").into_response()),
        Err(e) => {
            tracing::warn!(error = %e, "Password reset failed");
            Ok(ForgotPasswordTemplate {
                page,
                reset_step: true,
                email: form.email,
                error: Some(inline_error(e)?),
                success: None,
            }
            .into_response())
        }
    }
}
