mod common;

use common::{event_user_config_page, mock_settings, query_results, task_page, user_config_page};
use chrono::{TimeZone, Utc};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use daybrief::advice::FALLBACK_ADVICE;
use daybrief::digest;

async fn start_servers() -> (MockServer, MockServer, MockServer, MockServer) {
    let notion = MockServer::start().await;
    let weather = MockServer::start().await;
    let mailgun = MockServer::start().await;
    let llm = MockServer::start().await;
    (notion, weather, mailgun, llm)
}

fn run_instant() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 6, 0, 0).unwrap()
}

#[tokio::test]
async fn test_end_to_end_digest_for_one_user() {
    let (notion, weather, mailgun, llm) = start_servers().await;

    Mock::given(method("POST"))
        .and(path("/databases/db-users/query"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(query_results(vec![user_config_page("user-1", 0)])),
        )
        .expect(1)
        .mount(&notion)
        .await;

    Mock::given(method("POST"))
        .and(path("/databases/db-tasks/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(query_results(vec![
            task_page("Write report", Some("2024-01-14"), Some("2024-01-15"), false),
        ])))
        .expect(1)
        .mount(&notion)
        .await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "main": {"temp": 22.0, "feels_like": 21.0, "humidity": 50.0},
            "weather": [{"description": "sunny"}],
            "wind": {"speed": 3.0}
        })))
        .expect(1)
        .mount(&weather)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {
                "role": "assistant",
                "content": "```html\n<p>Go outside</p>\n```"
            }}]
        })))
        .expect(1)
        .mount(&llm)
        .await;

    Mock::given(method("POST"))
        .and(path("/mg.example.com/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "msg-1"})))
        .expect(1)
        .mount(&mailgun)
        .await;

    let settings = mock_settings(&notion.uri(), &weather.uri(), &mailgun.uri(), &llm.uri());
    let summary = digest::run_at(&settings, run_instant()).await.unwrap();
    assert_eq!(summary.users_total, 1);
    assert_eq!(summary.emails_accepted, 1);
    assert_eq!(summary.users_failed, 0);

    // The prompt handed to the backend carries the task in the due-today
    // section, and the weather stub values
    let llm_requests = llm.received_requests().await.unwrap();
    let prompt_body = String::from_utf8(llm_requests[0].body.clone()).unwrap();
    assert!(prompt_body.contains("Tasks due today"));
    assert!(prompt_body.contains("Write report"));
    assert!(prompt_body.contains("22"));
    assert!(prompt_body.contains("sunny"));

    // The mailed body contains the sanitized fragment (form-encoded) and
    // the subject carries the local calendar date
    let mail_requests = mailgun.received_requests().await.unwrap();
    let mail_body = String::from_utf8(mail_requests[0].body.clone()).unwrap();
    assert!(mail_body.contains("Go+outside"));
    assert!(!mail_body.contains("%60%60%60"), "code fences must be stripped");
    assert!(mail_body.contains("2024-01-15"));
    assert!(mail_body.contains("ada%40example.com"));
}

#[tokio::test]
async fn test_event_aware_user_feeds_events_into_the_prompt() {
    let (notion, weather, mailgun, llm) = start_servers().await;

    Mock::given(method("POST"))
        .and(path("/databases/db-users/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(query_results(vec![
            event_user_config_page("user-1", 0, "db-events"),
        ])))
        .mount(&notion)
        .await;

    Mock::given(method("POST"))
        .and(path("/databases/db-tasks/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(query_results(vec![])))
        .expect(1)
        .mount(&notion)
        .await;

    Mock::given(method("POST"))
        .and(path("/databases/db-events/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(query_results(vec![
            task_page("standup", Some("2024-01-15"), None, false),
            task_page("retro", Some("2024-01-16"), None, false),
        ])))
        .expect(1)
        .mount(&notion)
        .await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"main": {"temp": 5.0}})))
        .mount(&weather)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "<p>ok</p>"}}]
        })))
        .expect(1)
        .mount(&llm)
        .await;

    Mock::given(method("POST"))
        .and(path("/mg.example.com/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "msg-3"})))
        .mount(&mailgun)
        .await;

    let settings = mock_settings(&notion.uri(), &weather.uri(), &mailgun.uri(), &llm.uri());
    let summary = digest::run_at(&settings, run_instant()).await.unwrap();
    assert_eq!(summary.emails_accepted, 1);

    let llm_requests = llm.received_requests().await.unwrap();
    let prompt_body = String::from_utf8(llm_requests[0].body.clone()).unwrap();
    assert!(prompt_body.contains("Events today"));
    assert!(prompt_body.contains("standup"));
    assert!(prompt_body.contains("Events tomorrow"));
    assert!(prompt_body.contains("retro"));
}

#[tokio::test]
async fn test_weather_and_generation_failures_degrade_to_fallback() {
    let (notion, weather, mailgun, llm) = start_servers().await;

    Mock::given(method("POST"))
        .and(path("/databases/db-users/query"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(query_results(vec![user_config_page("user-1", 0)])),
        )
        .mount(&notion)
        .await;

    Mock::given(method("POST"))
        .and(path("/databases/db-tasks/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(query_results(vec![])))
        .mount(&notion)
        .await;

    // Weather and generation are both down; the pipeline still sends
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(500).set_body_string("weather down"))
        .mount(&weather)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("llm down"))
        .mount(&llm)
        .await;

    Mock::given(method("POST"))
        .and(path("/mg.example.com/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "msg-2"})))
        .expect(1)
        .mount(&mailgun)
        .await;

    let settings = mock_settings(&notion.uri(), &weather.uri(), &mailgun.uri(), &llm.uri());
    let summary = digest::run_at(&settings, run_instant()).await.unwrap();
    assert_eq!(summary.emails_accepted, 1);

    let mail_requests = mailgun.received_requests().await.unwrap();
    let mail_body = String::from_utf8(mail_requests[0].body.clone()).unwrap();
    let encoded_fallback = FALLBACK_ADVICE.replace(' ', "+");
    assert!(mail_body.contains(&encoded_fallback));
}

#[tokio::test]
async fn test_send_rejection_is_reported_not_fatal() {
    let (notion, weather, mailgun, llm) = start_servers().await;

    Mock::given(method("POST"))
        .and(path("/databases/db-users/query"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(query_results(vec![user_config_page("user-1", 0)])),
        )
        .mount(&notion)
        .await;

    Mock::given(method("POST"))
        .and(path("/databases/db-tasks/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(query_results(vec![])))
        .mount(&notion)
        .await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"main": {"temp": 5.0}})))
        .mount(&weather)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "<p>ok</p>"}}]
        })))
        .mount(&llm)
        .await;

    Mock::given(method("POST"))
        .and(path("/mg.example.com/messages"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .mount(&mailgun)
        .await;

    let settings = mock_settings(&notion.uri(), &weather.uri(), &mailgun.uri(), &llm.uri());
    let summary = digest::run_at(&settings, run_instant()).await.unwrap();
    assert_eq!(summary.users_total, 1);
    assert_eq!(summary.emails_accepted, 0);
    assert_eq!(summary.users_failed, 1);
}

#[tokio::test]
async fn test_zero_valid_users_is_fatal() {
    let (notion, weather, mailgun, llm) = start_servers().await;

    Mock::given(method("POST"))
        .and(path("/databases/db-users/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(query_results(vec![])))
        .mount(&notion)
        .await;

    let settings = mock_settings(&notion.uri(), &weather.uri(), &mailgun.uri(), &llm.uri());
    let result = digest::run_at(&settings, run_instant()).await;
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("no valid user configurations"));
}
