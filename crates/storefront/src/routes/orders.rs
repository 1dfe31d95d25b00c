//! Order history route handlers.
//!
//! Orders come from the mock backend; cancellations recorded in the session
//! are overlaid on every fetch and never sent back.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tracing::instrument;

use bazaar_core::{Order, OrderId, OrderStatus};

use super::FilterOption;
use crate::containers::OrdersContainer;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{PageContext, RequireUser};
use crate::state::AppState;

/// Order line display data.
#[derive(Clone)]
pub struct OrderLineView {
    pub title: String,
    pub image: String,
    pub quantity: u32,
    pub price: String,
}

/// Order display data for templates.
#[derive(Clone)]
pub struct OrderView {
    pub id: i32,
    pub order_number: String,
    pub placed_on: String,
    pub status_label: &'static str,
    pub status_class: &'static str,
    pub lines: Vec<OrderLineView>,
    pub item_count: u32,
    pub total: String,
    pub ship_to: String,
    pub tracking_number: Option<String>,
    pub can_cancel: bool,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        let address = &order.shipping_address;
        Self {
            id: order.id.as_i32(),
            order_number: order.order_number.clone(),
            placed_on: order.placed_on.format("%b %-d, %Y").to_string(),
            status_label: order.status.label(),
            status_class: order.status.as_str(),
            lines: order
                .items
                .iter()
                .map(|line| OrderLineView {
                    title: line.title.clone(),
                    image: line.image.clone(),
                    quantity: line.quantity,
                    price: line.price.times(line.quantity).to_string(),
                })
                .collect(),
            item_count: order.item_count(),
            total: order.total.to_string(),
            ship_to: format!(
                "{}, {}, {} {}",
                address.name, address.city, address.state, address.zip
            ),
            tracking_number: order.tracking_number.clone(),
            can_cancel: order.status.can_cancel(),
        }
    }
}

/// Orders page query parameters.
#[derive(Debug, Deserialize)]
pub struct OrdersQuery {
    pub status: Option<String>,
    pub notice: Option<String>,
    pub error: Option<String>,
}

/// Orders page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/orders.html")]
pub struct OrdersTemplate {
    pub page: PageContext,
    pub tabs: Vec<FilterOption>,
    pub orders: Vec<OrderView>,
    pub total_orders: usize,
    pub success: Option<String>,
    pub error: Option<String>,
}

/// Status filter tabs with counts.
fn status_tabs(orders: &[Order], selected: Option<OrderStatus>) -> Vec<FilterOption> {
    let mut tabs = vec![FilterOption::new(
        "",
        format!("All ({})", orders.len()),
        selected.is_none(),
    )];
    tabs.extend(OrderStatus::ALL.into_iter().map(|status| {
        let count = orders.iter().filter(|order| order.status == status).count();
        FilterOption::new(
            status.as_str(),
            format!("{} ({count})", status.label()),
            selected == Some(status),
        )
    }));
    tabs
}

/// Display the order history.
///
/// # Errors
///
/// Returns an error if the orders cannot be fetched.
#[instrument(skip(state, page, user, cancelled))]
pub async fn index(
    State(state): State<AppState>,
    page: PageContext,
    RequireUser(user): RequireUser,
    cancelled: OrdersContainer,
    Query(query): Query<OrdersQuery>,
) -> Result<impl IntoResponse> {
    let mut orders = state.backend().fetch_user_orders(user.id).await?;
    cancelled.apply(&mut orders);

    let selected = query
        .status
        .as_deref()
        .and_then(|value| value.parse::<OrderStatus>().ok());

    Ok(OrdersTemplate {
        tabs: status_tabs(&orders, selected),
        total_orders: orders.len(),
        orders: orders
            .iter()
            .filter(|order| selected.is_none_or(|status| order.status == status))
            .map(OrderView::from)
            .collect(),
        success: (query.notice.as_deref() == Some("cancelled"))
            .then(|| "Your order has been cancelled.".to_string()),
        error: (query.error.as_deref() == Some("not_cancellable"))
            .then(|| "Only pending orders can be cancelled.".to_string()),
        page,
    })
}

/// Cancel a pending order locally.
///
/// # Errors
///
/// Returns 404 if the order is not in the user's history.
#[instrument(skip(state, user, cancelled))]
pub async fn cancel(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    mut cancelled: OrdersContainer,
    Path(id): Path<i32>,
) -> Result<Redirect> {
    let order_id = OrderId::new(id);
    let orders = state.backend().fetch_user_orders(user.id).await?;
    let order = orders
        .iter()
        .find(|order| order.id == order_id)
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;

    match cancelled.cancel(order).await {
        Ok(()) => {
            add_breadcrumb(
                "orders",
                "Order cancelled",
                Some(&[("order_number", order.order_number.as_str())]),
            );
            Ok(Redirect::to("/orders?notice=cancelled"))
        }
        Err(e) => {
            tracing::info!(%order_id, error = %e, "Cancellation refused");
            Ok(Redirect::to("/orders?error=not_cancellable"))
        }
    }
}
