//! Config Loader: user configurations from the configuration store
//!
//! One store row per user. The user id comes from the `USER_ID` title
//! property, falling back to rich text, falling back to a sentinel that
//! marks the row as malformed. Sentinel and incomplete rows are skipped
//! with a logged warning; a total store failure is fatal for the run,
//! since an empty run would silently hide an outage.

use crate::config::{UserConfig, MISSING_USER_ID};
use crate::error::Result;
use crate::notion::{props, NotionClient};
use anyhow::Context;
use serde_json::Value;
use std::collections::HashMap;

/// Field names read from each configuration row, beyond `USER_ID`
const CONFIG_FIELDS: [&str; 11] = [
    "USER_NAME",
    "USER_CAREER",
    "PRESENT_LOCATION",
    "SCHEDULE_PROMPT",
    "TIME_ZONE",
    "GPT_VERSION",
    "USER_NOTION_TOKEN",
    "USER_DATABASE_ID",
    "USER_EVENT_DATABASE_ID",
    "EMAIL_RECEIVER",
    "EMAIL_TITLE",
];

/// Load all valid user configurations from the store
///
/// # Arguments
///
/// * `client` - Store client authenticated with the service token
/// * `database_id` - Users database id
///
/// # Returns
///
/// Mapping of user id to configuration, containing only complete rows
///
/// # Errors
///
/// Returns error when the store query itself fails; malformed rows are
/// skipped, not raised.
pub async fn load_user_configs(
    client: &NotionClient,
    database_id: &str,
) -> Result<HashMap<String, UserConfig>> {
    tracing::info!("Fetching user configurations");
    let pages = client
        .query_database(database_id, None)
        .await
        .context("user configuration store query failed")?;

    let mut configs = HashMap::new();
    for page in &pages {
        let user_id = resolve_user_id(page);
        if user_id == MISSING_USER_ID {
            tracing::warn!("Skipping config row with unresolvable USER_ID");
            continue;
        }

        let fields = extract_fields(page);
        match UserConfig::from_fields(&user_id, &fields) {
            Ok(config) => {
                configs.insert(user_id, config);
            }
            Err(missing) => {
                tracing::warn!(
                    "Skipping user {}: missing required fields: {}",
                    user_id,
                    missing.join(", ")
                );
            }
        }
    }

    tracing::info!("Loaded {} valid user configuration(s)", configs.len());
    Ok(configs)
}

/// Resolve a row's user id: title field, then rich text, then sentinel
fn resolve_user_id(page: &Value) -> String {
    let from_title = props::title_text(page, "USER_ID");
    if !from_title.is_empty() {
        return from_title;
    }
    let from_rich_text = props::rich_text(page, "USER_ID");
    if !from_rich_text.is_empty() {
        return from_rich_text;
    }
    MISSING_USER_ID.to_string()
}

/// Pull every known config field's rich text out of a row
fn extract_fields(page: &Value) -> HashMap<String, String> {
    CONFIG_FIELDS
        .iter()
        .map(|field| (field.to_string(), props::rich_text(page, field)))
        .collect()
}
