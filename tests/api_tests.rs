//! API integration tests.
//!
//! These run against a live server with a fresh database:
//! `cargo test -- --ignored`. The default administrator account created at
//! first start is used for authentication.

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Helper to get an authenticated admin token
async fn get_auth_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "admin123"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

/// Create an item with the given stock counts and return its id
async fn create_item(client: &Client, token: &str, name: &str, total: i64, in_stock: i64) -> i64 {
    let response = client
        .post(format!("{}/items", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "name": name,
            "category": "integration-tests",
            "total": total,
            "in_stock": in_stock,
            "description": "created by integration tests"
        }))
        .send()
        .await
        .expect("Failed to send create item request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse item response");
    body["id"].as_i64().expect("No item ID")
}

/// Submit a borrow request and return its id
async fn submit_request(client: &Client, token: &str, item_id: i64, quantity: i64) -> i64 {
    let response = client
        .post(format!("{}/requests", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "item_id": item_id,
            "quantity": quantity,
            "purpose": "integration test"
        }))
        .send()
        .await
        .expect("Failed to send submit request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse request response");
    body["id"].as_i64().expect("No request ID")
}

/// Fetch an item as JSON
async fn get_item(client: &Client, token: &str, item_id: i64) -> Value {
    let response = client
        .get(format!("{}/items/{}", BASE_URL, item_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to fetch item");

    assert!(response.status().is_success());
    response.json().await.expect("Failed to parse item")
}

/// Fetch a request as JSON
async fn get_request(client: &Client, token: &str, request_id: i64) -> Value {
    let response = client
        .get(format!("{}/requests/{}", BASE_URL, request_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to fetch request");

    assert!(response.status().is_success());
    response.json().await.expect("Failed to parse request")
}

fn unique(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}-{}", prefix, nanos)
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
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = client
        .get(format!("{}/items", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_create_item_with_derived_status() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let item_id = create_item(&client, &token, &unique("stapler"), 20, 15).await;
    let item = get_item(&client, &token, item_id).await;

    assert_eq!(item["total"], 20);
    assert_eq!(item["in_stock"], 15);
    assert_eq!(item["on_loan"], 5);
    assert_eq!(item["status"], "partial_in_stock");
}

#[tokio::test]
#[ignore]
async fn test_create_item_rejects_overdrawn_stock() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .post(format!("{}/items", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "name": unique("bad-item"),
            "total": 5,
            "in_stock": 6
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_reject_leaves_stock_untouched() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let item_id = create_item(&client, &token, &unique("monitor"), 10, 10).await;
    let request_id = submit_request(&client, &token, item_id, 4).await;

    // Submitting alone must not move stock
    let item = get_item(&client, &token, item_id).await;
    assert_eq!(item["in_stock"], 10);

    let response = client
        .post(format!("{}/requests/{}/reject", BASE_URL, request_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "comment": "not this week" }))
        .send()
        .await
        .expect("Failed to send reject");

    assert!(response.status().is_success());

    let request = get_request(&client, &token, request_id).await;
    assert_eq!(request["status"], "rejected");
    assert_eq!(request["approver"], "admin");

    let item = get_item(&client, &token, item_id).await;
    assert_eq!(item["in_stock"], 10);
    assert_eq!(item["total"], 10);
}

#[tokio::test]
#[ignore]
async fn test_approve_reserves_stock() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let item_id = create_item(&client, &token, &unique("laptop"), 10, 10).await;
    let request_id = submit_request(&client, &token, item_id, 5).await;

    let response = client
        .post(format!("{}/requests/{}/approve", BASE_URL, request_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "comment": "approved" }))
        .send()
        .await
        .expect("Failed to send approve");

    assert!(response.status().is_success());

    let request = get_request(&client, &token, request_id).await;
    assert_eq!(request["status"], "approved");
    assert_eq!(request["quantity_outstanding"], 5);
    assert_eq!(request["returned_quantity"], 0);

    let item = get_item(&client, &token, item_id).await;
    assert_eq!(item["in_stock"], 5);
    assert_eq!(item["on_loan"], 5);
    assert_eq!(item["status"], "partial_in_stock");
}

#[tokio::test]
#[ignore]
async fn test_partial_then_full_return() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let item_id = create_item(&client, &token, &unique("microscope"), 10, 10).await;
    let request_id = submit_request(&client, &token, item_id, 5).await;

    client
        .post(format!("{}/requests/{}/approve", BASE_URL, request_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to approve");

    // Partial return of 2
    let response = client
        .post(format!("{}/requests/{}/return", BASE_URL, request_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "quantity": 2 }))
        .send()
        .await
        .expect("Failed to return");

    assert!(response.status().is_success());

    let request = get_request(&client, &token, request_id).await;
    assert_eq!(request["status"], "partially_returned");
    assert_eq!(request["quantity_outstanding"], 3);
    assert_eq!(request["quantity_requested"], 5);
    assert_eq!(request["returned_quantity"], 2);

    let item = get_item(&client, &token, item_id).await;
    assert_eq!(item["in_stock"], 7);

    // Return the remaining 3
    let response = client
        .post(format!("{}/requests/{}/return", BASE_URL, request_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "quantity": 3 }))
        .send()
        .await
        .expect("Failed to return");

    assert!(response.status().is_success());

    let request = get_request(&client, &token, request_id).await;
    assert_eq!(request["status"], "returned");
    assert_eq!(request["quantity_outstanding"], 0);
    assert_eq!(request["returned_quantity"], 5);

    let item = get_item(&client, &token, item_id).await;
    assert_eq!(item["in_stock"], 10);
    assert_eq!(item["on_loan"], 0);
    assert_eq!(item["status"], "in_stock");
}

#[tokio::test]
#[ignore]
async fn test_return_without_quantity_returns_everything() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let item_id = create_item(&client, &token, &unique("projector"), 6, 6).await;
    let request_id = submit_request(&client, &token, item_id, 4).await;

    client
        .post(format!("{}/requests/{}/approve", BASE_URL, request_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to approve");

    let response = client
        .post(format!("{}/requests/{}/return", BASE_URL, request_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to return");

    assert!(response.status().is_success());

    let request = get_request(&client, &token, request_id).await;
    assert_eq!(request["status"], "returned");

    let item = get_item(&client, &token, item_id).await;
    assert_eq!(item["in_stock"], 6);
}

#[tokio::test]
#[ignore]
async fn test_sequential_overapproval_fails_second() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    // Two pending requests for 8 units each against 10 in stock: both pass
    // the advisory check at submission
    let item_id = create_item(&client, &token, &unique("drill"), 10, 10).await;
    let first = submit_request(&client, &token, item_id, 8).await;
    let second = submit_request(&client, &token, item_id, 8).await;

    let response = client
        .post(format!("{}/requests/{}/approve", BASE_URL, first))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to approve first");
    assert!(response.status().is_success());

    // The authoritative check at approval must fail the second
    let response = client
        .post(format!("{}/requests/{}/approve", BASE_URL, second))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to send second approve");
    assert_eq!(response.status(), 422);

    let request = get_request(&client, &token, second).await;
    assert_eq!(request["status"], "pending");

    let item = get_item(&client, &token, item_id).await;
    assert_eq!(item["in_stock"], 2);
}

#[tokio::test]
#[ignore]
async fn test_oversized_return_mutates_nothing() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let item_id = create_item(&client, &token, &unique("wrench"), 10, 10).await;
    let request_id = submit_request(&client, &token, item_id, 5).await;

    client
        .post(format!("{}/requests/{}/approve", BASE_URL, request_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to approve");

    let response = client
        .post(format!("{}/requests/{}/return", BASE_URL, request_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "quantity": 6 }))
        .send()
        .await
        .expect("Failed to send return");

    assert_eq!(response.status(), 400);

    let request = get_request(&client, &token, request_id).await;
    assert_eq!(request["status"], "approved");
    assert_eq!(request["quantity_outstanding"], 5);

    let item = get_item(&client, &token, item_id).await;
    assert_eq!(item["in_stock"], 5);
}

#[tokio::test]
#[ignore]
async fn test_double_decision_refused() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let item_id = create_item(&client, &token, &unique("binder"), 10, 10).await;
    let request_id = submit_request(&client, &token, item_id, 2).await;

    client
        .post(format!("{}/requests/{}/approve", BASE_URL, request_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to approve");

    // Second approval and rejection both hit a non-pending request
    for action in ["approve", "reject"] {
        let response = client
            .post(format!("{}/requests/{}/{}", BASE_URL, request_id, action))
            .header("Authorization", format!("Bearer {}", token))
            .json(&json!({}))
            .send()
            .await
            .expect("Failed to send decision");
        assert_eq!(response.status(), 409);
    }

    let item = get_item(&client, &token, item_id).await;
    assert_eq!(item["in_stock"], 8);
}

#[tokio::test]
#[ignore]
async fn test_submit_fails_on_insufficient_stock() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let item_id = create_item(&client, &token, &unique("cable"), 3, 3).await;

    let response = client
        .post(format!("{}/requests", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "item_id": item_id,
            "quantity": 4,
            "purpose": "too many"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 422);
}

#[tokio::test]
#[ignore]
async fn test_delete_item_with_outstanding_request_refused() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let item_id = create_item(&client, &token, &unique("scope"), 5, 5).await;
    let request_id = submit_request(&client, &token, item_id, 2).await;

    client
        .post(format!("{}/requests/{}/approve", BASE_URL, request_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to approve");

    let response = client
        .delete(format!("{}/items/{}", BASE_URL, item_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send delete");

    assert_eq!(response.status(), 409);

    // After full return the item can go
    client
        .post(format!("{}/requests/{}/return", BASE_URL, request_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to return");

    let response = client
        .delete(format!("{}/items/{}", BASE_URL, item_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send delete");

    assert_eq!(response.status(), 204);
}

#[tokio::test]
#[ignore]
async fn test_batch_process_skips_failures() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let item_id = create_item(&client, &token, &unique("headset"), 10, 10).await;
    let first = submit_request(&client, &token, item_id, 3).await;
    let second = submit_request(&client, &token, item_id, 3).await;

    // Approve the first individually so it fails inside the batch
    client
        .post(format!("{}/requests/{}/approve", BASE_URL, first))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to approve");

    let response = client
        .post(format!("{}/requests/batch-process", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "ids": [first, second],
            "action": "approve",
            "comment": "batch"
        }))
        .send()
        .await
        .expect("Failed to send batch");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse batch response");
    assert_eq!(body["processed_count"], 1);

    let item = get_item(&client, &token, item_id).await;
    assert_eq!(item["in_stock"], 4);
}

#[tokio::test]
#[ignore]
async fn test_category_auto_created_on_item_create() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let category = unique("auto-cat");

    let response = client
        .post(format!("{}/items", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "name": unique("gadget"),
            "category": category,
            "total": 1,
            "in_stock": 1
        }))
        .send()
        .await
        .expect("Failed to create item");

    assert_eq!(response.status(), 201);

    let response = client
        .get(format!("{}/categories", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to list categories");

    let body: Value = response.json().await.expect("Failed to parse categories");
    let found = body
        .as_array()
        .expect("Expected array")
        .iter()
        .any(|c| c["name"] == category.as_str() && c["item_count"] == 1);
    assert!(found, "Auto-created category missing from listing");
}

#[tokio::test]
#[ignore]
async fn test_duplicate_category_refused() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let name = unique("dup-cat");

    for expected in [201, 409] {
        let response = client
            .post(format!("{}/categories", BASE_URL))
            .header("Authorization", format!("Bearer {}", token))
            .json(&json!({ "name": name }))
            .send()
            .await
            .expect("Failed to create category");
        assert_eq!(response.status(), expected);
    }
}

#[tokio::test]
#[ignore]
async fn test_get_stats() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .get(format!("{}/stats", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["total_items"].is_number());
    assert!(body["request_stats"]["pending"].is_number());
    assert_eq!(body["weekly_trend"].as_array().expect("trend").len(), 7);
}

#[tokio::test]
#[ignore]
async fn test_stock_invariant_holds_through_lifecycle() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let item_id = create_item(&client, &token, &unique("ledger-check"), 12, 12).await;

    let a = submit_request(&client, &token, item_id, 5).await;
    let b = submit_request(&client, &token, item_id, 4).await;

    for id in [a, b] {
        client
            .post(format!("{}/requests/{}/approve", BASE_URL, id))
            .header("Authorization", format!("Bearer {}", token))
            .json(&json!({}))
            .send()
            .await
            .expect("Failed to approve");
    }

    client
        .post(format!("{}/requests/{}/return", BASE_URL, a))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "quantity": 2 }))
        .send()
        .await
        .expect("Failed to return");

    // in_stock + sum of outstanding quantities must equal total
    let item = get_item(&client, &token, item_id).await;
    let req_a = get_request(&client, &token, a).await;
    let req_b = get_request(&client, &token, b).await;

    let outstanding = req_a["quantity_outstanding"].as_i64().unwrap()
        + req_b["quantity_outstanding"].as_i64().unwrap();

    assert_eq!(
        item["in_stock"].as_i64().unwrap() + outstanding,
        item["total"].as_i64().unwrap()
    );
}
