//! Profile route handlers.
//!
//! The profile page shows the session user, an update form and the saved
//! addresses from the mock backend.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use bazaar_core::{Address, AddressType, Email, NewAddress, User, UserPatch};

use super::FilterOption;
use crate::containers::SessionContainer;
use crate::error::Result;
use crate::filters;
use crate::middleware::{PageContext, RequireUser};
use crate::services::{AuthError, BackendError};
use crate::state::AppState;

/// Address display data for templates.
#[derive(Clone)]
pub struct AddressView {
    pub type_label: &'static str,
    pub name: String,
    pub address1: String,
    pub address2: Option<String>,
    pub locality: String,
    pub country: String,
    pub phone: String,
    pub is_default: bool,
}

impl From<&Address> for AddressView {
    fn from(address: &Address) -> Self {
        Self {
            type_label: address.address_type.label(),
            name: address.full_name(),
            address1: address.address1.clone(),
            address2: address.address2.clone(),
            locality: address.locality(),
            country: address.country.clone(),
            phone: address.phone.clone(),
            is_default: address.is_default,
        }
    }
}

/// User display data for templates.
#[derive(Clone)]
pub struct UserView {
    pub name: String,
    pub email: String,
    pub avatar: String,
    pub initials: String,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.to_string(),
            avatar: user.avatar.clone().unwrap_or_default(),
            initials: user.initials(),
        }
    }
}

/// Profile update form data.
#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub avatar: String,
}

/// New address form data.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AddressForm {
    pub address_type: String,
    pub first_name: String,
    pub last_name: String,
    pub address1: String,
    pub address2: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
    pub phone: String,
    /// Checkbox: present when ticked.
    pub is_default: Option<String>,
}

impl AddressForm {
    fn to_new_address(&self) -> NewAddress {
        let address2 = self.address2.trim();
        NewAddress {
            address_type: self.address_type.parse().unwrap_or_default(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            address1: self.address1.trim().to_string(),
            address2: (!address2.is_empty()).then(|| address2.to_string()),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            zip: self.zip.trim().to_string(),
            country: self.country.trim().to_string(),
            phone: self.phone.trim().to_string(),
            is_default: self.is_default.is_some(),
        }
    }
}

/// Profile page query parameters.
#[derive(Debug, Deserialize)]
pub struct ProfileQuery {
    pub notice: Option<String>,
}

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/profile.html")]
pub struct ProfileTemplate {
    pub page: PageContext,
    pub user: UserView,
    pub addresses: Vec<AddressView>,
    pub address_types: Vec<FilterOption>,
    pub address_form: AddressForm,
    pub success: Option<String>,
    pub error: Option<String>,
    pub address_error: Option<String>,
}

fn notice_message(code: &str) -> Option<&'static str> {
    match code {
        "profile_updated" => Some("Your profile has been updated."),
        "address_added" => Some("Address saved."),
        _ => None,
    }
}

/// Render the profile page with freshly fetched addresses.
async fn render_profile(
    state: &AppState,
    page: PageContext,
    user: &User,
    address_form: AddressForm,
    messages: (Option<String>, Option<String>, Option<String>),
) -> Result<ProfileTemplate> {
    let addresses = state.backend().fetch_user_addresses(user.id).await?;
    let (success, error, address_error) = messages;

    Ok(ProfileTemplate {
        page,
        user: UserView::from(user),
        addresses: addresses.iter().map(AddressView::from).collect(),
        address_types: AddressType::ALL
            .into_iter()
            .map(|t| FilterOption::new(t.as_str(), t.label(), address_form.address_type == t.as_str()))
            .collect(),
        address_form,
        success,
        error,
        address_error,
    })
}

/// Display the profile page.
///
/// # Errors
///
/// Returns an error if the addresses cannot be fetched.
#[instrument(skip(state, page, user))]
pub async fn show(
    State(state): State<AppState>,
    page: PageContext,
    RequireUser(user): RequireUser,
    Query(query): Query<ProfileQuery>,
) -> Result<impl IntoResponse> {
    let success = query
        .notice
        .as_deref()
        .and_then(notice_message)
        .map(String::from);
    render_profile(
        &state,
        page,
        &user,
        AddressForm {
            address_type: AddressType::Home.as_str().to_string(),
            country: "US".to_string(),
            ..AddressForm::default()
        },
        (success, None, None),
    )
    .await
}

/// Build the patch for a profile form, comparing against the current user.
///
/// # Errors
///
/// Returns the inline message for an invalid email or blank name.
fn profile_patch(user: &User, form: &ProfileForm) -> std::result::Result<UserPatch, String> {
    let name = form.name.trim();
    if name.is_empty() {
        return Err("Please enter your name".to_string());
    }
    let email = Email::parse(&form.email).map_err(|e| e.to_string())?;
    let avatar = form.avatar.trim();
    let current_avatar = user.avatar.as_deref().unwrap_or_default();

    Ok(UserPatch {
        name: (name != user.name).then(|| name.to_string()),
        email: (email != user.email).then_some(email),
        avatar: (avatar != current_avatar).then(|| avatar.to_string()),
    })
}

/// Update the session user.
///
/// # Errors
///
/// Returns an error if the addresses cannot be fetched while re-rendering.
#[instrument(skip(state, page, session, form))]
pub async fn update(
    State(state): State<AppState>,
    page: PageContext,
    mut session: SessionContainer,
    Form(form): Form<ProfileForm>,
) -> Result<Response> {
    let Some(user) = session.user().cloned() else {
        return Ok(Redirect::to("/login?next=%2Fprofile").into_response());
    };

    let patch = match profile_patch(&user, &form) {
        Ok(patch) => patch,
        Err(message) => {
            let form = AddressForm::default();
            return Ok(render_profile(&state, page, &user, form, (None, Some(message), None))
                .await?
                .into_response());
        }
    };

    if !patch.is_empty() {
        match state.auth().update_profile(&user.email, &patch) {
            Ok(()) => {}
            Err(AuthError::UserAlreadyExists) => {
                let message = AuthError::UserAlreadyExists.to_string();
                let form = AddressForm::default();
                return Ok(render_profile(&state, page, &user, form, (None, Some(message), None))
                    .await?
                    .into_response());
            }
            Err(e) => return Err(e.into()),
        }
        session.update_user(patch).await;
        tracing::info!(user_id = %user.id, "Profile updated");
    }
    Ok(Redirect::to("/profile?notice=profile_updated").into_response())
}

/// Save a new address.
///
/// # Errors
///
/// Returns an error if the backend store fails.
#[instrument(skip(state, page, user, form))]
pub async fn add_address(
    State(state): State<AppState>,
    page: PageContext,
    RequireUser(user): RequireUser,
    Form(form): Form<AddressForm>,
) -> Result<Response> {
    match state
        .backend()
        .add_user_address(user.id, form.to_new_address())
        .await
    {
        Ok(_) => Ok(Redirect::to("/profile?notice=address_added").into_response()),
        Err(BackendError::MissingFields(fields)) => {
            let message = format!("Please fill in: {}", fields.join(", "));
            Ok(render_profile(&state, page, &user, form, (None, None, Some(message)))
                .await?
                .into_response())
        }
        Err(e) => Err(e.into()),
    }
}
