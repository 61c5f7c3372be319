use crate::config::OrgSettings;
use crate::error::Result;
use crate::github::GithubClient;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Critical,
    High,
}

impl Severity {
    /// Exact, case-sensitive match on the advisory severity.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "critical" => Some(Severity::Critical),
            "high" => Some(Severity::High),
            _ => None,
        }
    }
}

/// An open alert whose advisory is critical or high.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VulnerabilityAlert {
    pub severity: Severity,
    pub html_url: String,
}

#[derive(Debug, Deserialize)]
struct RawAlert {
    state: String,
    security_advisory: RawAdvisory,
    #[serde(default)]
    html_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawAdvisory {
    severity: String,
}

/// Open critical/high alerts for one repository, in fetch order.
#[instrument(skip(client, org), fields(org = %org.name))]
pub async fn fetch_vulnerabilities(
    client: &GithubClient,
    org: &OrgSettings,
    repo: &str,
) -> Result<Vec<VulnerabilityAlert>> {
    let items = client.fetch_all(&org.alerts_endpoint(repo)).await?;
    let total = items.len();
    let retained = filter_reportable(items);
    debug!(total, retained = retained.len(), "alerts filtered");
    Ok(retained)
}

/// Items without an advisory, with another state or severity, or with
/// an unexpected shape are dropped.
pub fn filter_reportable(items: Vec<Value>) -> Vec<VulnerabilityAlert> {
    items.into_iter().filter_map(reportable).collect()
}

fn reportable(item: Value) -> Option<VulnerabilityAlert> {
    let raw: RawAlert = serde_json::from_value(item).ok()?;
    if raw.state != "open" {
        return None;
    }
    let severity = Severity::parse(&raw.security_advisory.severity)?;
    Some(VulnerabilityAlert {
        severity,
        html_url: raw.html_url.unwrap_or_default(),
    })
}
