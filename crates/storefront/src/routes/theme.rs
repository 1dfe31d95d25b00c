//! Light/dark theme toggle.

use axum::{Form, response::Redirect};
use serde::Deserialize;
use tracing::instrument;

use crate::containers::ThemeContainer;
use crate::middleware::safe_redirect_target;

/// Theme toggle form data.
#[derive(Debug, Deserialize)]
pub struct ThemeForm {
    pub next: Option<String>,
}

/// Flip the theme and return to the page the toggle was clicked on.
#[instrument(skip(theme))]
pub async fn toggle(mut theme: ThemeContainer, Form(form): Form<ThemeForm>) -> Redirect {
    let theme = theme.toggle().await;
    tracing::debug!(theme = theme.as_str(), "Theme toggled");
    Redirect::to(safe_redirect_target(form.next.as_deref()))
}
