//! Cart, wishlist, coupons and checkout.

#![allow(clippy::unwrap_used)]

use bazaar_integration_tests::{TestServer, body, redirects_to};
use reqwest::StatusCode;

// Catalog ids used below.
const HEADPHONES: &str = "1"; // $129.99
const SMART_WATCH: &str = "2"; // $199.00
const CHARGER: &str = "3"; // out of stock
const MUG: &str = "8"; // $14.99

async fn add(server: &TestServer, product_id: &str, quantity: &str) {
    let response = server
        .post("/cart/add", &[("product_id", product_id), ("quantity", quantity)])
        .await
        .unwrap();
    assert!(redirects_to(&response, "/cart"));
}

#[tokio::test]
async fn test_cart_add_update_remove_clear() {
    let server = TestServer::spawn().await.unwrap();

    add(&server, MUG, "2").await;
    let text = body(server.get("/cart").await.unwrap(), StatusCode::OK).await;
    assert!(text.contains("Ceramic Coffee Mug"));
    assert!(text.contains("$29.98"));
    assert!(text.contains("$5.99"), "standard shipping below the threshold");
    assert!(text.contains("$35.97"));
    assert!(text.contains(r#"<span class="badge">2</span>"#));

    // Adding again merges into the same line.
    add(&server, MUG, "1").await;
    let text = body(server.get("/cart").await.unwrap(), StatusCode::OK).await;
    assert!(text.contains(r#"name="quantity" value="3""#));

    let response = server
        .post("/cart/update", &[("product_id", MUG), ("quantity", "5")])
        .await
        .unwrap();
    assert!(redirects_to(&response, "/cart"));
    let text = body(server.get("/cart").await.unwrap(), StatusCode::OK).await;
    assert!(text.contains("$74.95"));
    assert!(text.contains("Free"), "free standard shipping over the threshold");

    add(&server, HEADPHONES, "1").await;
    let response = server
        .post("/cart/remove", &[("product_id", MUG)])
        .await
        .unwrap();
    assert!(redirects_to(&response, "/cart"));
    let text = body(server.get("/cart").await.unwrap(), StatusCode::OK).await;
    assert!(!text.contains("Ceramic Coffee Mug"));
    assert!(text.contains("Wireless Headphones"));

    let response = server.post("/cart/clear", &[]).await.unwrap();
    assert!(redirects_to(&response, "/cart"));
    let text = body(server.get("/cart").await.unwrap(), StatusCode::OK).await;
    assert!(text.contains("Your cart is empty"));
}

#[tokio::test]
async fn test_cart_rejects_unknown_and_sold_out_products() {
    let server = TestServer::spawn().await.unwrap();

    let response = server
        .post("/cart/add", &[("product_id", "9999")])
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = server
        .post("/cart/add", &[("product_id", CHARGER)])
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_wishlist_toggle_and_move_to_cart() {
    let server = TestServer::spawn().await.unwrap();

    let response = server
        .post("/wishlist/toggle", &[("product_id", SMART_WATCH)])
        .await
        .unwrap();
    assert!(redirects_to(&response, "/wishlist"));
    server
        .post("/wishlist/toggle", &[("product_id", CHARGER)])
        .await
        .unwrap();

    let text = body(server.get("/wishlist").await.unwrap(), StatusCode::OK).await;
    assert!(text.contains("Smart Watch"));
    assert!(text.contains("Portable Charger"));
    assert!(text.contains("2 saved items"));

    // Sold-out products stay on the wishlist.
    let response = server
        .post("/wishlist/move-to-cart", &[("product_id", CHARGER)])
        .await
        .unwrap();
    assert!(redirects_to(&response, "/wishlist"));

    let response = server
        .post("/wishlist/move-to-cart", &[("product_id", SMART_WATCH)])
        .await
        .unwrap();
    assert!(redirects_to(&response, "/cart"));

    let text = body(server.get("/cart").await.unwrap(), StatusCode::OK).await;
    assert!(text.contains("Smart Watch"));
    let text = body(server.get("/wishlist").await.unwrap(), StatusCode::OK).await;
    assert!(!text.contains("Smart Watch"));
    assert!(text.contains("1 saved item<"));

    let response = server
        .post("/wishlist/remove", &[("product_id", CHARGER)])
        .await
        .unwrap();
    assert!(redirects_to(&response, "/wishlist"));
    let text = body(server.get("/wishlist").await.unwrap(), StatusCode::OK).await;
    assert!(text.contains("Nothing saved yet"));

    let response = server
        .post("/wishlist/toggle", &[("product_id", "9999")])
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_coupon_listing_filters() {
    let server = TestServer::spawn().await.unwrap();

    let text = body(server.get("/coupons").await.unwrap(), StatusCode::OK).await;
    assert!(text.contains("WELCOME10"));
    assert!(!text.contains("SUMMER30"), "expired coupons are hidden by default");

    let text = body(
        server.get("/coupons?show_expired=1").await.unwrap(),
        StatusCode::OK,
    )
    .await;
    assert!(text.contains("SUMMER30"));

    let text = body(
        server.get("/coupons?category=electronics").await.unwrap(),
        StatusCode::OK,
    )
    .await;
    assert!(text.contains("TECH15"));
    assert!(!text.contains("WELCOME10"));

    let text = body(server.get("/coupons?q=Ship").await.unwrap(), StatusCode::OK).await;
    assert!(text.contains("FREESHIP"));
    assert!(!text.contains("TECH15"));
}

#[tokio::test]
async fn test_apply_and_remove_coupon() {
    let server = TestServer::spawn().await.unwrap();
    add(&server, HEADPHONES, "1").await;

    let response = server
        .post("/coupons/apply", &[("code", "save20"), ("next", "/cart")])
        .await
        .unwrap();
    assert!(redirects_to(&response, "/cart"));

    let text = body(server.get("/cart").await.unwrap(), StatusCode::OK).await;
    assert!(text.contains("SAVE20"));
    assert!(text.contains("-$20.00"));
    assert!(text.contains("$109.99"));

    let response = server
        .post("/coupons/remove", &[("next", "/cart")])
        .await
        .unwrap();
    assert!(redirects_to(&response, "/cart"));
    let text = body(server.get("/cart").await.unwrap(), StatusCode::OK).await;
    assert!(!text.contains("-$20.00"));
}

#[tokio::test]
async fn test_rejected_coupons_explain_why() {
    let server = TestServer::spawn().await.unwrap();
    add(&server, HEADPHONES, "1").await;

    for (code, reason, message) in [
        ("SUMMER30", "expired", "That coupon has expired."),
        ("NOPE", "unknown", "That coupon code doesn&#39;t exist."),
        ("FLASH50", "exhausted", "That coupon has reached its usage limit."),
        ("VIP20", "inactive", "That coupon is not currently active."),
    ] {
        let response = server
            .post("/coupons/apply", &[("code", code), ("next", "/cart")])
            .await
            .unwrap();
        let target = format!("/cart?coupon_error={reason}");
        assert!(redirects_to(&response, &target), "{code} should be {reason}");

        let text = body(server.get(&target).await.unwrap(), StatusCode::OK).await;
        assert!(text.contains(message), "{code}: {message}");
    }
}

#[tokio::test]
async fn test_guest_checkout() {
    let server = TestServer::spawn().await.unwrap();

    // Nothing to check out yet.
    let response = server.get("/checkout").await.unwrap();
    assert!(redirects_to(&response, "/cart"));

    add(&server, MUG, "2").await;
    let text = body(server.get("/checkout").await.unwrap(), StatusCode::OK).await;
    assert!(text.contains("Place order"));

    let mut form = vec![
        ("email", "guest@example.com"),
        ("first_name", "Sam"),
        ("last_name", "Lee"),
        ("address1", "1 Market St"),
        ("city", "San Francisco"),
        ("state", "CA"),
        ("zip", "941"),
        ("country", "US"),
        ("shipping_method", "express"),
    ];

    let text = body(
        server.post("/checkout", form.get(..2).unwrap()).await.unwrap(),
        StatusCode::OK,
    )
    .await;
    assert!(text.contains("Please fill in: last name, address, city, state, ZIP code, country"));

    let text = body(server.post("/checkout", &form).await.unwrap(), StatusCode::OK).await;
    assert!(text.contains("ZIP code must be exactly 5 digits"));

    if let Some(zip) = form.iter_mut().find(|(key, _)| *key == "zip") {
        zip.1 = "94107";
    }
    let text = body(server.post("/checkout", &form).await.unwrap(), StatusCode::OK).await;
    assert!(text.contains("Thank you for your order!"));
    assert!(text.contains("guest@example.com"));
    assert!(text.contains("Express to Pacific"));
    assert!(text.contains("Create an account"));

    let text = body(server.get("/cart").await.unwrap(), StatusCode::OK).await;
    assert!(text.contains("Your cart is empty"));
}
