//! Order history and local cancellation.

#![allow(clippy::unwrap_used)]

use bazaar_integration_tests::{TestServer, body, redirects_to};
use reqwest::StatusCode;

async fn signed_in() -> TestServer {
    let server = TestServer::spawn().await.unwrap();
    let response = server.login_demo().await.unwrap();
    assert!(redirects_to(&response, "/profile"));
    server
}

#[tokio::test]
async fn test_orders_require_login() {
    let server = TestServer::spawn().await.unwrap();
    let response = server.get("/orders").await.unwrap();
    assert!(redirects_to(&response, "/login?next=%2Forders"));
}

#[tokio::test]
async fn test_order_history_tabs() {
    let server = signed_in().await;

    let text = body(server.get("/orders").await.unwrap(), StatusCode::OK).await;
    assert!(text.contains("All (4)"));
    assert!(text.contains("Pending (1)"));
    assert!(text.contains("Delivered (1)"));
    assert!(text.contains("BZ-1004"));
    assert!(text.contains("BZ-1001"));

    let text = body(
        server.get("/orders?status=shipped").await.unwrap(),
        StatusCode::OK,
    )
    .await;
    assert!(text.contains("BZ-1002"));
    assert!(!text.contains("BZ-1004"));

    let text = body(
        server.get("/orders?status=cancelled").await.unwrap(),
        StatusCode::OK,
    )
    .await;
    assert!(text.contains("No orders with this status."));
}

#[tokio::test]
async fn test_cancel_pending_order() {
    let server = signed_in().await;

    let response = server.post("/orders/4/cancel", &[]).await.unwrap();
    assert!(redirects_to(&response, "/orders?notice=cancelled"));

    let text = body(
        server.get("/orders?notice=cancelled").await.unwrap(),
        StatusCode::OK,
    )
    .await;
    assert!(text.contains("Your order has been cancelled."));
    assert!(text.contains("Cancelled (1)"));
    assert!(text.contains("Pending (0)"));

    // A second cancel of the same order is refused.
    let response = server.post("/orders/4/cancel", &[]).await.unwrap();
    assert!(redirects_to(&response, "/orders?error=not_cancellable"));
}

#[tokio::test]
async fn test_only_pending_orders_can_be_cancelled() {
    let server = signed_in().await;

    let response = server.post("/orders/3/cancel", &[]).await.unwrap();
    assert!(redirects_to(&response, "/orders?error=not_cancellable"));

    let text = body(
        server.get("/orders?error=not_cancellable").await.unwrap(),
        StatusCode::OK,
    )
    .await;
    assert!(text.contains("Only pending orders can be cancelled."));
    assert!(text.contains("Processing (1)"));

    let response = server.post("/orders/999/cancel", &[]).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cancellation_stays_in_the_session() {
    let server = signed_in().await;
    let response = server.post("/orders/4/cancel", &[]).await.unwrap();
    assert!(redirects_to(&response, "/orders?notice=cancelled"));

    // Another browser signed in to the same account still sees it pending.
    let other = server.new_visitor().unwrap();
    let response = other.login_demo().await.unwrap();
    assert!(redirects_to(&response, "/profile"));
    let text = body(other.get("/orders").await.unwrap(), StatusCode::OK).await;
    assert!(text.contains("Pending (1)"));
    assert!(text.contains("Cancelled (0)"));
}

#[tokio::test]
async fn test_signed_in_checkout_adds_to_history() {
    let server = signed_in().await;

    let response = server
        .post("/cart/add", &[("product_id", "8"), ("quantity", "1")])
        .await
        .unwrap();
    assert!(redirects_to(&response, "/cart"));

    // The checkout form is prefilled from the default address.
    let text = body(server.get("/checkout").await.unwrap(), StatusCode::OK).await;
    assert!(text.contains("123 Market Street"));

    let text = body(
        server
            .post(
                "/checkout",
                &[
                    ("email", "demo@example.com"),
                    ("first_name", "Jane"),
                    ("last_name", "Doe"),
                    ("address1", "123 Market Street"),
                    ("city", "San Francisco"),
                    ("state", "CA"),
                    ("zip", "94103"),
                    ("country", "US"),
                    ("shipping_method", "standard"),
                ],
            )
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await;
    assert!(text.contains("Thank you for your order!"));
    assert!(text.contains("View your orders"));

    let text = body(server.get("/orders").await.unwrap(), StatusCode::OK).await;
    assert!(text.contains("All (5)"));
    assert!(text.contains("Pending (2)"));
    assert!(text.contains("$20.98"));
}
