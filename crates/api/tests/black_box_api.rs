use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::json;

use tair_api::app::{build_app, services::CatalogService};
use tair_infra::InMemoryCatalogStore;
use tair_products::{Product, ProductId};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(store: &InMemoryCatalogStore) -> Self {
        // Same router as prod, bound to an ephemeral port.
        let app = build_app(CatalogService::new(Arc::new(store.clone())));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn product(id: u64, name: &str, price: f64) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        price,
    }
}

#[tokio::test]
async fn list_returns_all_rows() {
    let store = InMemoryCatalogStore::with_products([product(1, "A", 1.00), product(2, "B", 2.50)]);
    let srv = TestServer::spawn(&store).await;

    let res = reqwest::get(format!("{}/products", srv.base_url)).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(
        body,
        json!([
            {"id": 1, "name": "A", "price": 1.0},
            {"id": 2, "name": "B", "price": 2.5}
        ])
    );
}

#[tokio::test]
async fn list_on_store_failure_is_500_and_empty() {
    let store = InMemoryCatalogStore::new();
    store.fail_connect(true);
    let srv = TestServer::spawn(&store).await;

    let res = reqwest::get(format!("{}/products", srv.base_url)).await.unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn create_returns_201_with_assigned_id() {
    let store = InMemoryCatalogStore::with_products([product(41, "Existing", 1.0)]);
    let srv = TestServer::spawn(&store).await;

    let res = reqwest::Client::new()
        .post(format!("{}/products", srv.base_url))
        .json(&json!({"name": "Widget", "price": "9.99"}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["id"], 42);
    assert_eq!(body["name"], "Widget");
    assert_eq!(body["price"], 9.99);
    assert_eq!(body["message"], "Product added successfully");
}

#[tokio::test]
async fn create_missing_field_is_400_and_inserts_nothing() {
    let store = InMemoryCatalogStore::new();
    let srv = TestServer::spawn(&store).await;

    let res = reqwest::Client::new()
        .post(format!("{}/products", srv.base_url))
        .json(&json!({"name": "Widget"}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({"error": "Missing name or price"}));
    assert!(store.products().is_empty());
    assert_eq!(store.connections_opened(), 0);
}

#[tokio::test]
async fn create_invalid_price_is_400_and_inserts_nothing() {
    let store = InMemoryCatalogStore::new();
    let srv = TestServer::spawn(&store).await;

    let res = reqwest::Client::new()
        .post(format!("{}/products", srv.base_url))
        .json(&json!({"name": "Widget", "price": "abc"}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({"error": "Invalid price format"}));
    assert!(store.products().is_empty());
    assert_eq!(store.connections_opened(), 0);
}

#[tokio::test]
async fn create_store_failure_is_500_with_message() {
    let store = InMemoryCatalogStore::new();
    store.fail_commit(true);
    let srv = TestServer::spawn(&store).await;

    let res = reqwest::Client::new()
        .post(format!("{}/products", srv.base_url))
        .json(&json!({"name": "Widget", "price": 1}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = res.json().await.unwrap();
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("lock wait timeout exceeded"), "got {message}");
    assert!(store.products().is_empty());
    assert_eq!(store.connections_opened(), store.connections_closed());
}

#[tokio::test]
async fn created_product_is_listed_exactly_once() {
    let store = InMemoryCatalogStore::new();
    let srv = TestServer::spawn(&store).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/products", srv.base_url))
        .json(&json!({"name": "Gadget", "price": 12.34}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();

    let res = client.get(format!("{}/products", srv.base_url)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let listed: Vec<serde_json::Value> = res.json().await.unwrap();

    let matches: Vec<_> = listed.iter().filter(|p| p["id"] == created["id"]).collect();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0]["name"], "Gadget");
    let price = matches[0]["price"].as_f64().unwrap();
    assert!((price - 12.34).abs() < 1e-9);
}

#[tokio::test]
async fn health_is_ok_even_when_store_is_down() {
    let store = InMemoryCatalogStore::new();
    store.fail_connect(true);
    let srv = TestServer::spawn(&store).await;

    let res = reqwest::get(format!("{}/health", srv.base_url)).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({"status": "API is running"}));
}

#[tokio::test]
async fn every_opened_connection_is_closed() {
    let store = InMemoryCatalogStore::new();
    let srv = TestServer::spawn(&store).await;
    let client = reqwest::Client::new();

    client
        .post(format!("{}/products", srv.base_url))
        .json(&json!({"name": "A", "price": 1}))
        .send()
        .await
        .unwrap();
    store.fail_query(true);
    client.get(format!("{}/products", srv.base_url)).send().await.unwrap();
    client
        .post(format!("{}/products", srv.base_url))
        .json(&json!({"name": "B", "price": 2}))
        .send()
        .await
        .unwrap();

    assert_eq!(store.connections_opened(), 3);
    assert_eq!(store.connections_closed(), 3);
}
