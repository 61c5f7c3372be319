use crate::config::{alias_for, load_config};
use crate::display;
use crate::error::Result;
use crate::github::GithubClient;
use crate::report::write_report;
use std::io::{self, BufWriter};

pub async fn run(secondary: bool, verbose: bool) -> Result<()> {
    let config = load_config()?;
    let alias = alias_for(secondary);
    let org = config.org(alias, std::env::var("GITHUB_TOKEN").ok())?;
    let client = GithubClient::new(&org.token, &org.repos_endpoint())?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let summary = write_report(&client, &org, &mut out).await?;

    if verbose {
        display::note(&format!(
            "{} of {} repositories in {} with open high/critical alerts ({} skipped)",
            summary.reported, summary.repositories, org.name, summary.skipped
        ));
    }

    Ok(())
}
