//! API integration tests
//!
//! These run against a live server backed by a migrated database.

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:5000/api/v1";

async fn create_subscriber(client: &Client, name: &str) -> Value {
    let response = client
        .post(format!("{}/subscribers", BASE_URL))
        .json(&json!({
            "name": name,
            "first_name": "Test",
            "address": "1 rue des Lilas"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    response.json().await.expect("Failed to parse response")
}

async fn create_document(client: &Client, title: &str) -> Value {
    let response = client
        .post(format!("{}/documents", BASE_URL))
        .json(&json!({
            "title": title,
            "author": "Integration Author",
            "category": "Book",
            "year": 1999
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    response.json().await.expect("Failed to parse response")
}

async fn get_stats(client: &Client) -> Value {
    client
        .get(format!("{}/stats", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_subscriber_crud() {
    let client = Client::new();

    let created = create_subscriber(&client, "Crud").await;
    let id = created["id"].as_str().expect("No id in response").to_string();
    assert!(created["registration_date"].is_string());

    let response = client
        .put(format!("{}/subscribers/{}", BASE_URL, id))
        .json(&json!({ "address": "2 avenue des Tilleuls" }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["address"], "2 avenue des Tilleuls");
    assert_eq!(body["name"], "Crud");

    let response = client
        .delete(format!("{}/subscribers/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 428);

    let response = client
        .delete(format!("{}/subscribers/{}?confirm=true", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204);

    let response = client
        .get(format!("{}/subscribers/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_create_document_missing_title() {
    let client = Client::new();

    let response = client
        .post(format!("{}/documents", BASE_URL))
        .json(&json!({
            "title": "",
            "author": "Someone",
            "category": "Book",
            "year": 2004
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_loan_makes_document_unavailable() {
    let client = Client::new();

    let subscriber = create_subscriber(&client, "Borrower").await;
    let document = create_document(&client, "Integration Loan Title").await;
    let document_id = document["id"].as_str().expect("No id in response");

    let availability: Value = client
        .get(format!("{}/documents/{}/availability", BASE_URL, document_id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(availability["available"], true);

    let before = get_stats(&client).await;

    let response = client
        .post(format!("{}/loans", BASE_URL))
        .json(&json!({
            "subscriber_id": subscriber["id"],
            "document": document_id
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let loan: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(loan["document_id"], document_id);
    assert!(loan["return_date"].is_null());

    let availability: Value = client
        .get(format!("{}/documents/{}/availability", BASE_URL, document_id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(availability["available"], false);

    let after = get_stats(&client).await;
    assert_eq!(
        after["loans_today"].as_u64().unwrap_or(0),
        before["loans_today"].as_u64().unwrap_or(0) + 1
    );

    // A second loan of the same document is refused
    let response = client
        .post(format!("{}/loans", BASE_URL))
        .json(&json!({
            "subscriber_id": subscriber["id"],
            "document": document_id
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_return_then_purge_returned_today() {
    let client = Client::new();

    let subscriber = create_subscriber(&client, "Returner").await;
    let document = create_document(&client, "Integration Return Title").await;

    let loan: Value = client
        .post(format!("{}/loans", BASE_URL))
        .json(&json!({
            "subscriber_id": subscriber["id"],
            "document": document["id"]
        }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let loan_id = loan["id"].as_str().expect("No id in response");

    let response = client
        .post(format!("{}/loans/{}/return", BASE_URL, loan_id))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let stats = get_stats(&client).await;
    assert!(stats["returns_today"].as_u64().unwrap_or(0) >= 1);

    let response = client
        .delete(format!("{}/loans/returned-today", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 428);

    let response = client
        .delete(format!("{}/loans/returned-today?confirm=true", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["deleted_count"].as_u64().unwrap_or(0) >= 1);
    assert_eq!(body["stats"]["returns_today"], 0);
}

#[tokio::test]
#[ignore]
async fn test_stats_shape() {
    let client = Client::new();

    let stats = get_stats(&client).await;
    for key in [
        "subscriber_count",
        "document_count",
        "loan_count",
        "loans_today",
        "returns_today",
    ] {
        assert!(stats[key].is_u64(), "{} should be a count", key);
    }
    assert!(stats["category_histogram"].is_array());
    assert!(stats["year_histogram"].is_array());
}

#[tokio::test]
#[ignore]
async fn test_search_matches_wildcards_literally() {
    let client = Client::new();

    let literal = create_document(&client, "Search 50% Off").await;
    let other = create_document(&client, "Search 500 Days").await;

    let found: Vec<Value> = client
        .get(format!("{}/documents", BASE_URL))
        .query(&[("q", "50%")])
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    assert!(found.iter().any(|d| d["id"] == literal["id"]));
    assert!(!found.iter().any(|d| d["id"] == other["id"]));
}
