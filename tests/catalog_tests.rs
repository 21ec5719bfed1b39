//! Catalog client integration tests against a mock HTTP server

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use voice_tasks::application::ports::{CatalogClient, CatalogError, DEFAULT_PAGE_LIMIT};
use voice_tasks::infrastructure::DummyJsonCatalog;

async fn mock_products(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("limit", DEFAULT_PAGE_LIMIT.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn fetch_page_decodes_products() {
    let server = MockServer::start().await;
    mock_products(
        &server,
        json!({
            "products": [
                {
                    "id": 1,
                    "title": "Mug",
                    "description": "A sturdy mug",
                    "price": 9.99,
                    "rating": 4.5,
                    "images": ["https://cdn.example/mug.jpg"],
                    "thumbnail": "https://cdn.example/mug_thumb.jpg"
                },
                {
                    "id": 2,
                    "title": "Lamp",
                    "description": "A desk lamp",
                    "images": [],
                }
            ],
            "total": 2,
            "skip": 0,
            "limit": 30
        }),
    )
    .await;

    let catalog = DummyJsonCatalog::with_base_url(server.uri());
    let page = catalog.fetch_page(DEFAULT_PAGE_LIMIT).await.unwrap();

    assert_eq!(page.products.len(), 2);
    assert_eq!(page.products[0].title, "Mug");
    assert_eq!(
        page.products[0].primary_image(),
        Some("https://cdn.example/mug.jpg")
    );
    // Missing optionals decode as absent, not as failures
    assert!(page.products[1].price.is_none());
    assert_eq!(page.products[1].primary_image(), None);
}

#[tokio::test]
async fn empty_page_yields_no_random_item() {
    let server = MockServer::start().await;
    mock_products(&server, json!({ "products": [] })).await;

    let catalog = DummyJsonCatalog::with_base_url(server.uri());
    assert_eq!(catalog.fetch_random_item().await.unwrap(), None);
}

#[tokio::test]
async fn random_item_comes_from_the_page() {
    let server = MockServer::start().await;
    mock_products(
        &server,
        json!({
            "products": [
                { "id": 7, "title": "Only", "description": "the only item" }
            ]
        }),
    )
    .await;

    let catalog = DummyJsonCatalog::with_base_url(server.uri());
    let item = catalog.fetch_random_item().await.unwrap().unwrap();
    assert_eq!(item.id, 7);
    assert_eq!(item.title, "Only");
}

#[tokio::test]
async fn unknown_fields_are_ignored() {
    let server = MockServer::start().await;
    mock_products(
        &server,
        json!({
            "products": [
                {
                    "id": 1,
                    "title": "Mug",
                    "description": "A sturdy mug",
                    "brand": "Example Co",
                    "stock": 42,
                    "tags": ["kitchen"]
                }
            ],
            "extra_envelope_field": true
        }),
    )
    .await;

    let catalog = DummyJsonCatalog::with_base_url(server.uri());
    let page = catalog.fetch_page(DEFAULT_PAGE_LIMIT).await.unwrap();
    assert_eq!(page.products.len(), 1);
}

#[tokio::test]
async fn server_error_is_a_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let catalog = DummyJsonCatalog::with_base_url(server.uri());
    let err = catalog.fetch_page(DEFAULT_PAGE_LIMIT).await.unwrap_err();
    assert!(matches!(err, CatalogError::Transport(_)), "got {:?}", err);
}

#[tokio::test]
async fn invalid_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let catalog = DummyJsonCatalog::with_base_url(server.uri());
    let err = catalog.fetch_page(DEFAULT_PAGE_LIMIT).await.unwrap_err();
    assert!(matches!(err, CatalogError::Decode(_)), "got {:?}", err);
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    // Nothing listens on this port
    let catalog = DummyJsonCatalog::with_base_url("http://127.0.0.1:1");
    let err = catalog.fetch_page(DEFAULT_PAGE_LIMIT).await.unwrap_err();
    assert!(matches!(err, CatalogError::Transport(_)), "got {:?}", err);
}
