use daybrief::Settings;
use serde_json::{json, Value};

/// Settings where every external collaborator points at mock servers
#[allow(dead_code)]
pub fn mock_settings(
    notion_base: &str,
    weather_base: &str,
    mailgun_base: &str,
    llm_base: &str,
) -> Settings {
    let mut settings = Settings::default();
    settings.notion.token = "secret_service".to_string();
    settings.notion.users_database_id = "db-users".to_string();
    settings.notion.api_base = Some(notion_base.to_string());
    settings.weather.api_key = "weather-key".to_string();
    settings.weather.api_base = Some(weather_base.to_string());
    settings.mailgun.api_key = "mailgun-key".to_string();
    settings.mailgun.domain = "mg.example.com".to_string();
    settings.mailgun.api_base = Some(mailgun_base.to_string());
    settings.advice.openai_api_key = "openai-key".to_string();
    settings.advice.api_base = Some(llm_base.to_string());
    settings
}

fn rich(content: &str) -> Value {
    json!({"rich_text": [{"text": {"content": content}}]})
}

/// One complete user-configuration page for the store database
#[allow(dead_code)]
pub fn user_config_page(user_id: &str, offset_hours: i32) -> Value {
    json!({
        "properties": {
            "USER_ID": {"title": [{"text": {"content": user_id}}]},
            "USER_NAME": rich("Ada"),
            "USER_CAREER": rich("engineer"),
            "PRESENT_LOCATION": rich("London"),
            "SCHEDULE_PROMPT": rich("deep work before noon"),
            "TIME_ZONE": rich(&offset_hours.to_string()),
            "GPT_VERSION": rich("gpt-4o-mini"),
            "USER_NOTION_TOKEN": rich("secret_user"),
            "USER_DATABASE_ID": rich("db-tasks"),
            "EMAIL_RECEIVER": rich("ada@example.com"),
            "EMAIL_TITLE": rich("Morning Digest")
        }
    })
}

/// A complete user-configuration page that also carries an event database
#[allow(dead_code)]
pub fn event_user_config_page(user_id: &str, offset_hours: i32, event_db: &str) -> Value {
    let mut page = user_config_page(user_id, offset_hours);
    page["properties"]["USER_EVENT_DATABASE_ID"] = rich(event_db);
    page
}

/// A user-configuration page missing a required field
#[allow(dead_code)]
pub fn incomplete_config_page(user_id: &str) -> Value {
    json!({
        "properties": {
            "USER_ID": {"title": [{"text": {"content": user_id}}]},
            "USER_NAME": rich("Ghost")
        }
    })
}

/// One task page with the given date range and completion flag
#[allow(dead_code)]
pub fn task_page(name: &str, start: Option<&str>, end: Option<&str>, completed: bool) -> Value {
    let mut date = serde_json::Map::new();
    if let Some(start) = start {
        date.insert("start".to_string(), json!(start));
    }
    if let Some(end) = end {
        date.insert("end".to_string(), json!(end));
    }
    json!({
        "last_edited_time": "2024-01-15T06:00:00.000Z",
        "properties": {
            "Name": {"title": [{"text": {"content": name}}]},
            "Description": rich("details"),
            "Urgency": {"select": {"name": "High"}},
            "Complete": {"checkbox": completed},
            "Date": {"date": Value::Object(date)}
        }
    })
}

/// Notion query-response envelope
#[allow(dead_code)]
pub fn query_results(pages: Vec<Value>) -> Value {
    json!({"results": pages})
}
