//! Integration tests for the inventory/catalog HTTP client.
//!
//! A `mockito` server stands in for the remote API.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use rocket_shoes_cart::api::{ApiClient, ApiError};
use rocket_shoes_cart::{CatalogService, InventoryService};
use rocket_shoes_core::ProductId;
use rocket_shoes_integration_tests::{api_config, mock_product, mock_stock, product_json};
use rust_decimal::Decimal;
use secrecy::SecretString;

// =============================================================================
// Stock
// =============================================================================

#[tokio::test]
async fn test_stock_is_parsed() {
    let mut server = mockito::Server::new_async().await;
    let mock = mock_stock(&mut server, 1, 3).await;

    let api = ApiClient::new(&api_config(&server));
    let stock = api.stock(ProductId::new(1)).await.unwrap();

    assert_eq!(stock.product_id, ProductId::new(1));
    assert_eq!(stock.amount, 3);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_stock_is_never_cached() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/stock/1")
        .with_status(200)
        .with_body(r#"{"amount": 2}"#)
        .expect(2)
        .create_async()
        .await;

    let mut config = api_config(&server);
    config.catalog_cache_ttl = Some(Duration::from_secs(300));
    let api = ApiClient::new(&config);

    api.stock(ProductId::new(1)).await.unwrap();
    api.stock(ProductId::new(1)).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_stock_not_found() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/stock/99")
        .with_status(404)
        .with_body("{}")
        .create_async()
        .await;

    let api = ApiClient::new(&api_config(&server));
    let err = api.stock(ProductId::new(99)).await.unwrap_err();

    assert!(matches!(err, ApiError::NotFound(ref path) if path == "stock/99"));
}

#[tokio::test]
async fn test_rate_limited_reads_retry_after() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/stock/1")
        .with_status(429)
        .with_header("Retry-After", "7")
        .create_async()
        .await;

    let api = ApiClient::new(&api_config(&server));
    let err = api.stock(ProductId::new(1)).await.unwrap_err();

    assert!(matches!(err, ApiError::RateLimited(7)));
}

#[tokio::test]
async fn test_server_error_keeps_status() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/stock/1")
        .with_status(502)
        .with_body("bad gateway")
        .create_async()
        .await;

    let api = ApiClient::new(&api_config(&server));
    let err = api.stock(ProductId::new(1)).await.unwrap_err();

    assert!(matches!(err, ApiError::Status { status: 502, ref body } if body == "bad gateway"));
}

#[tokio::test]
async fn test_malformed_stock_payload() {
    let mut server = mockito::Server::new_async().await;
    for (id, body) in [(1, r#"{"amount": -1}"#), (2, r#"{"qty": 1}"#), (3, "five")] {
        server
            .mock("GET", format!("/stock/{id}").as_str())
            .with_status(200)
            .with_body(body)
            .create_async()
            .await;
    }

    let api = ApiClient::new(&api_config(&server));
    for id in 1..=3 {
        let err = api.stock(ProductId::new(id)).await.unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)), "id {id}: {err}");
    }
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/stock/1")
        .match_header("authorization", "Bearer api-token-123")
        .with_status(200)
        .with_body(r#"{"amount": 1}"#)
        .create_async()
        .await;

    let mut config = api_config(&server);
    config.token = Some(SecretString::from("api-token-123"));
    let api = ApiClient::new(&config);

    api.stock(ProductId::new(1)).await.unwrap();
    mock.assert_async().await;
}

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
async fn test_product_is_parsed() {
    let mut server = mockito::Server::new_async().await;
    mock_product(&mut server, 2, "Tênis VR Caminhada Confortável", 139.9).await;

    let api = ApiClient::new(&api_config(&server));
    let product = api.product(ProductId::new(2)).await.unwrap();

    assert_eq!(product.id, ProductId::new(2));
    assert_eq!(product.title, "Tênis VR Caminhada Confortável");
    assert_eq!(product.price, Decimal::new(1399, 1));
    assert!(product.image.ends_with("tenis2.jpg"));
}

#[tokio::test]
async fn test_product_cache_avoids_second_request() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/products/2")
        .with_status(200)
        .with_body(product_json(2, "Shoe", 10.0).to_string())
        .expect(1)
        .create_async()
        .await;

    let mut config = api_config(&server);
    config.catalog_cache_ttl = Some(Duration::from_secs(300));
    let api = ApiClient::new(&config);

    let first = api.product(ProductId::new(2)).await.unwrap();
    let second = api.product(ProductId::new(2)).await.unwrap();

    assert_eq!(first, second);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_product_without_cache_hits_server_each_time() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/products/2")
        .with_status(200)
        .with_body(product_json(2, "Shoe", 10.0).to_string())
        .expect(2)
        .create_async()
        .await;

    let api = ApiClient::new(&api_config(&server));
    api.product(ProductId::new(2)).await.unwrap();
    api.product(ProductId::new(2)).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_product_id_mismatch_is_rejected() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/products/2")
        .with_status(200)
        .with_body(r#"{"id": 3, "title": "Other", "price": 1, "image": ""}"#)
        .create_async()
        .await;

    let api = ApiClient::new(&api_config(&server));
    let err = api.product(ProductId::new(2)).await.unwrap_err();

    assert!(matches!(err, ApiError::ProductMismatch { requested, received }
        if requested == ProductId::new(2) && received == ProductId::new(3)));
}
