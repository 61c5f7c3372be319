use crate::canonical::base_url;
use crate::config::OrgSettings;
use crate::display;
use crate::error::Result;
use crate::github::alerts::{fetch_vulnerabilities, Severity, VulnerabilityAlert};
use crate::github::properties::{lookup_property, PORTFOLIO_PROPERTY};
use crate::github::repos::list_repo_names;
use crate::github::GithubClient;
use std::io::Write;
use tracing::{info, instrument};

pub const HEADER: &str = "Portfolio,Repository,Critical,High,URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub portfolio: String,
    pub repository: String,
    pub critical: usize,
    pub high: usize,
    pub url: String,
}

impl ReportRow {
    /// Builds the row for one repository, or `None` when nothing qualifies.
    /// The URL comes from the first alert in fetch order.
    pub fn from_alerts(
        portfolio: &str,
        repository: &str,
        alerts: &[VulnerabilityAlert],
    ) -> Option<Self> {
        let first = alerts.first()?;

        let mut row = Self {
            portfolio: portfolio.to_string(),
            repository: repository.to_string(),
            critical: 0,
            high: 0,
            url: base_url(&first.html_url),
        };
        for alert in alerts {
            match alert.severity {
                Severity::Critical => row.critical += 1,
                Severity::High => row.high += 1,
            }
        }
        Some(row)
    }

    /// Fields are joined as-is; a comma inside a value is not escaped.
    pub fn to_line(&self) -> String {
        format!(
            "{},{},{},{},{}",
            self.portfolio, self.repository, self.critical, self.high, self.url
        )
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    pub repositories: usize,
    pub reported: usize,
    pub skipped: usize,
}

/// Runs the whole pipeline for `org`, streaming the header and one line
/// per vulnerable repository into `out` as each repository completes.
///
/// Fails only when the repository listing fails or `out` cannot be written.
/// An alert fetch failure skips that repository with a warning.
#[instrument(skip_all, fields(org = %org.name))]
pub async fn write_report<W: Write>(
    client: &GithubClient,
    org: &OrgSettings,
    out: &mut W,
) -> Result<ReportSummary> {
    let repos = list_repo_names(client, org).await?;

    writeln!(out, "{HEADER}")?;
    out.flush()?;

    let mut summary = ReportSummary {
        repositories: repos.len(),
        ..ReportSummary::default()
    };

    for repo in &repos {
        let alerts = match fetch_vulnerabilities(client, org, repo).await {
            Ok(alerts) => alerts,
            Err(e) => {
                display::warn(&format!("Skipping {repo}: {e}"));
                summary.skipped += 1;
                continue;
            }
        };
        if alerts.is_empty() {
            continue;
        }

        let portfolio = lookup_property(client, org, repo, PORTFOLIO_PROPERTY).await;
        if let Some(row) = ReportRow::from_alerts(&portfolio, repo, &alerts) {
            writeln!(out, "{}", row.to_line())?;
            out.flush()?;
            summary.reported += 1;
        }
    }

    info!(
        repositories = summary.repositories,
        reported = summary.reported,
        skipped = summary.skipped,
        "report complete"
    );
    Ok(summary)
}
