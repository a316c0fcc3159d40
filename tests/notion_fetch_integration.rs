mod common;

use common::{incomplete_config_page, query_results, task_page, user_config_page};
use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use daybrief::notion::{fetch_tasks, load_user_configs, NotionClient};

fn reference() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
}

async fn client_for(server: &MockServer) -> NotionClient {
    NotionClient::new("secret_user", 5, Some(&server.uri())).unwrap()
}

#[tokio::test]
async fn test_config_loader_skips_incomplete_and_sentinel_rows() {
    let server = MockServer::start().await;

    let pages = vec![
        user_config_page("user-1", 8),
        incomplete_config_page("user-2"),
        // No USER_ID at all resolves to the sentinel and is skipped
        json!({"properties": {}}),
    ];
    Mock::given(method("POST"))
        .and(path("/databases/db-users/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(query_results(pages)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let users = load_user_configs(&client, "db-users").await.unwrap();
    assert_eq!(users.len(), 1);
    let user = &users["user-1"];
    assert_eq!(user.user_name, "Ada");
    assert_eq!(user.utc_offset_hours, 8);
    assert_eq!(user.event_database_id, None);
}

#[tokio::test]
async fn test_config_loader_store_failure_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/databases/db-users/query"))
        .respond_with(ResponseTemplate::new(500).set_body_string("store down"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let result = load_user_configs(&client, "db-users").await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_task_fetch_buckets_over_the_wire() {
    let server = MockServer::start().await;

    let pages = vec![
        task_page("due today", Some("2024-01-14"), Some("2024-01-15"), false),
        task_page("in progress", Some("2024-01-10"), None, false),
        task_page("future", Some("2024-01-25"), None, false),
        task_page("far future", Some("2024-06-01"), None, false),
        task_page("done", Some("2024-01-15"), Some("2024-01-15"), true),
        // Malformed date is skipped, not fatal
        task_page("garbage", Some("not-a-date"), None, false),
    ];
    Mock::given(method("POST"))
        .and(path("/databases/db-tasks/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(query_results(pages)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let buckets = fetch_tasks(&client, "db-tasks", reference(), 0, false).await;

    assert_eq!(buckets.today_due.len(), 1);
    assert_eq!(buckets.today_due[0].name, "due today");
    assert_eq!(buckets.in_progress.len(), 1);
    assert_eq!(buckets.in_progress[0].name, "in progress");
    assert_eq!(buckets.future.len(), 1);
    assert_eq!(buckets.future[0].name, "future");
    assert!(buckets.completed.is_empty());
}

#[tokio::test]
async fn test_task_fetch_total_failure_yields_empty_buckets() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/databases/db-tasks/query"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let buckets = fetch_tasks(&client, "db-tasks", reference(), 0, false).await;
    assert!(buckets.is_empty());
}

#[tokio::test]
async fn test_task_fetch_completed_bucket_when_requested() {
    let server = MockServer::start().await;

    let pages = vec![task_page(
        "done",
        Some("2024-01-15"),
        Some("2024-01-15"),
        true,
    )];
    Mock::given(method("POST"))
        .and(path("/databases/db-tasks/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(query_results(pages)))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let buckets = fetch_tasks(&client, "db-tasks", reference(), 0, true).await;
    assert_eq!(buckets.completed.len(), 1);
    assert!(buckets.today_due.is_empty());
}
