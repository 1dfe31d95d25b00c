//! Contact form route handlers.
//!
//! The form posts back to itself; validation problems and the success
//! message are rendered inline.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::IntoResponse};
use serde::Deserialize;
use tracing::instrument;

use bazaar_core::Email;

use crate::error::add_breadcrumb;
use crate::filters;
use crate::middleware::PageContext;
use crate::state::AppState;

/// Longest message accepted.
const MAX_MESSAGE_LEN: usize = 5000;

/// Contact form data.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactForm {
    /// First validation problem, if any.
    #[must_use]
    pub fn validate(&self) -> Option<String> {
        if self.name.trim().is_empty() {
            return Some("Please enter your name.".to_string());
        }
        if let Err(e) = Email::parse(&self.email) {
            return Some(format!("Please enter a valid email address ({e})."));
        }
        let message = self.message.trim();
        if message.is_empty() {
            return Some("Please enter a message.".to_string());
        }
        if message.chars().count() > MAX_MESSAGE_LEN {
            return Some(format!(
                "Messages are limited to {MAX_MESSAGE_LEN} characters."
            ));
        }
        None
    }
}

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/contact.html")]
pub struct ContactTemplate {
    pub page: PageContext,
    pub form: ContactForm,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Display the contact form, prefilled for logged-in users.
#[instrument(skip(page))]
pub async fn show(page: PageContext) -> impl IntoResponse {
    let form = page
        .user
        .as_ref()
        .map(|user| ContactForm {
            name: user.name.clone(),
            email: user.email.to_string(),
            message: String::new(),
        })
        .unwrap_or_default();

    ContactTemplate {
        page,
        form,
        error: None,
        success: None,
    }
}

/// Handle a contact form submission.
#[instrument(skip(state, page, form), fields(email = %form.email))]
pub async fn submit(
    State(state): State<AppState>,
    page: PageContext,
    Form(form): Form<ContactForm>,
) -> impl IntoResponse {
    if let Some(error) = form.validate() {
        return ContactTemplate {
            page,
            form,
            error: Some(error),
            success: None,
        };
    }

    state
        .backend()
        .send_contact_message(form.email.trim(), form.message.trim())
        .await;
    add_breadcrumb("contact", "Contact message sent", None);

    let name = form.name.trim().to_string();
    ContactTemplate {
        page,
        form: ContactForm::default(),
        error: None,
        success: Some(format!(
            "Thanks, {name}! We'll get back to you within one business day."
        )),
    }
}
