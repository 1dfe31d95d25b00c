//! Public pages, operational endpoints and response headers.

#![allow(clippy::unwrap_used)]

use bazaar_integration_tests::{TestServer, body, redirects_to};
use reqwest::StatusCode;

#[tokio::test]
async fn test_health_endpoints() {
    let server = TestServer::spawn().await.unwrap();

    let text = body(server.get("/health").await.unwrap(), StatusCode::OK).await;
    assert_eq!(text, "ok");

    let response = server.get("/health/ready").await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_public_pages_render() {
    let server = TestServer::spawn().await.unwrap();

    for (path, needle) in [
        ("/", "Featured"),
        ("/products", "All products"),
        ("/products?category=electronics&sort=price-asc", "Electronics"),
        ("/product/1", "Wireless Headphones"),
        ("/about", "About Bazaar"),
        ("/contact", "Contact us"),
        ("/inventory", "Inventory"),
        ("/shipping", "Shipping estimates"),
        ("/coupons", "WELCOME10"),
        ("/search?q=headphones", "Wireless Headphones"),
        ("/login", "Sign in"),
        ("/register", "Create an account"),
        ("/forgot-password", "Reset your password"),
        ("/cart", "Your cart is empty"),
        ("/wishlist", "Nothing saved yet"),
    ] {
        let text = body(server.get(path).await.unwrap(), StatusCode::OK).await;
        assert!(text.contains(needle), "{path} should mention {needle:?}");
    }
}

#[tokio::test]
async fn test_unknown_paths_render_404_page() {
    let server = TestServer::spawn().await.unwrap();

    let text = body(
        server.get("/definitely/not/here").await.unwrap(),
        StatusCode::NOT_FOUND,
    )
    .await;
    assert!(text.contains("/definitely/not/here"));

    let response = server.get("/product/9999").await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = server.get("/product/not-a-number").await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_security_headers_and_request_id() {
    let server = TestServer::spawn().await.unwrap();

    let response = server
        .client
        .get(server.url("/"))
        .header("x-request-id", "trace-me")
        .send()
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers.get("x-request-id").unwrap(), "trace-me");
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    let csp = headers
        .get("content-security-policy")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(csp.contains("'nonce-"));
    assert!(csp.contains("frame-ancestors 'none'"));
}

#[tokio::test]
async fn test_static_files_are_served() {
    let server = TestServer::spawn().await.unwrap();

    let response = server.get("/static/css/main.css").await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = server.get("/static/images/placeholder.svg").await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_theme_toggle_persists_in_session() {
    let server = TestServer::spawn().await.unwrap();

    let text = body(server.get("/about").await.unwrap(), StatusCode::OK).await;
    assert!(text.contains(r#"<html lang="en" class="light">"#));

    let response = server.post("/theme", &[("next", "/about")]).await.unwrap();
    assert!(redirects_to(&response, "/about"));

    let text = body(server.get("/about").await.unwrap(), StatusCode::OK).await;
    assert!(text.contains(r#"<html lang="en" class="dark">"#));

    // Off-site targets fall back to the home page.
    let response = server
        .post("/theme", &[("next", "//evil.example")])
        .await
        .unwrap();
    assert!(redirects_to(&response, "/"));
}

#[tokio::test]
async fn test_contact_form_validation_and_success() {
    let server = TestServer::spawn().await.unwrap();

    let text = body(
        server
            .post(
                "/contact",
                &[("name", "Ada"), ("email", "nope"), ("message", "Hi")],
            )
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await;
    assert!(text.contains("Please enter a valid email address"));

    let text = body(
        server
            .post(
                "/contact",
                &[
                    ("name", "Ada"),
                    ("email", "ada@example.com"),
                    ("message", "Do you ship to Alaska?"),
                ],
            )
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await;
    assert!(text.contains("Thanks, Ada!"));
}

#[tokio::test]
async fn test_shipping_estimates() {
    let server = TestServer::spawn().await.unwrap();

    let text = body(server.get("/shipping?zip=94107").await.unwrap(), StatusCode::OK).await;
    assert!(text.contains("Pacific"));
    assert!(text.contains("5-8 business days"));
    assert!(text.contains("Express"));

    let text = body(server.get("/shipping?zip=12").await.unwrap(), StatusCode::OK).await;
    assert!(text.contains("ZIP code must be exactly 5 digits"));
}

#[tokio::test]
async fn test_search_remembers_recent_queries() {
    let server = TestServer::spawn().await.unwrap();

    server.get("/search?q=mug").await.unwrap();
    server.get("/search?q=speaker").await.unwrap();

    let text = body(server.get("/search").await.unwrap(), StatusCode::OK).await;
    assert!(text.contains(r#"value="speaker""#));
    assert!(text.contains(">mug</a>"));

    let response = server.post("/search/clear", &[]).await.unwrap();
    assert!(redirects_to(&response, "/search"));
    let text = body(server.get("/search").await.unwrap(), StatusCode::OK).await;
    assert!(!text.contains(">mug</a>"));
}

#[tokio::test]
async fn test_inventory_status_filter() {
    let server = TestServer::spawn().await.unwrap();

    let text = body(
        server.get("/inventory?status=out_of_stock").await.unwrap(),
        StatusCode::OK,
    )
    .await;
    assert!(text.contains("Portable Charger"));
    assert!(!text.contains("Ceramic Coffee Mug"));
}
