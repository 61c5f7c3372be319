use crate::config::OrgSettings;
use crate::error::Result;
use crate::github::GithubClient;
use serde_json::Value;
use tracing::{debug, instrument};

/// Names of every repository in the organization, in listing order.
#[instrument(skip_all, fields(org = %org.name))]
pub async fn list_repo_names(client: &GithubClient, org: &OrgSettings) -> Result<Vec<String>> {
    let items = client.fetch_all(&org.repos_endpoint()).await?;
    let names = repo_names(&items);
    debug!(count = names.len(), "repositories listed");
    Ok(names)
}

fn repo_names(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| item.get("name").and_then(Value::as_str))
        .map(str::to_string)
        .collect()
}
