use crate::config::OrgSettings;
use crate::display;
use crate::github::GithubClient;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

pub const PORTFOLIO_PROPERTY: &str = "Portfolio";
pub const NOT_FOUND: &str = "not-found";

#[derive(Debug, Deserialize)]
pub struct PropertyRecord {
    pub property_name: String,
    #[serde(default)]
    pub value: Option<PropertyValue>,
}

/// Custom property values are strings, or string lists for multi-select
/// properties.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Single(String),
    Multiple(Vec<String>),
}

impl PropertyValue {
    fn render(&self) -> String {
        match self {
            PropertyValue::Single(value) => value.clone(),
            PropertyValue::Multiple(values) => values.join(";"),
        }
    }
}

/// Value of the first property named `key`, or [`NOT_FOUND`]. Never fails:
/// fetch and decode errors are reported on stderr and become the sentinel.
#[instrument(skip(client, org), fields(org = %org.name))]
pub async fn lookup_property(
    client: &GithubClient,
    org: &OrgSettings,
    repo: &str,
    key: &str,
) -> String {
    let items: Vec<Value> = match client.fetch_one(&org.properties_endpoint(repo)).await {
        Ok(items) => items,
        Err(e) => {
            warn!(error = %e, "property lookup failed");
            display::warn(&format!("Could not read {key} property for {repo}: {e}"));
            return NOT_FOUND.to_string();
        }
    };

    let records = decode_records(items);
    find_property(&records, key).unwrap_or_else(|| NOT_FOUND.to_string())
}

/// Records with an unexpected shape are dropped one by one.
fn decode_records(items: Vec<Value>) -> Vec<PropertyRecord> {
    let total = items.len();
    let records: Vec<PropertyRecord> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();
    if records.len() < total {
        debug!(dropped = total - records.len(), "malformed property records");
    }
    records
}

fn find_property(records: &[PropertyRecord], key: &str) -> Option<String> {
    records
        .iter()
        .find(|record| record.property_name == key)
        .and_then(|record| record.value.as_ref())
        .map(PropertyValue::render)
}
