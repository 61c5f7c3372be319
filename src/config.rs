use crate::error::{AuditError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

pub const PRIMARY_ALIAS: &str = "primary";
pub const SECONDARY_ALIAS: &str = "secondary";

const DEFAULT_REPOS_URL: &str = "https://api.github.com/orgs/{org}/repos?type=all&per_page=100";
const DEFAULT_ALERTS_URL: &str =
    "https://api.github.com/repos/{org}/{repo}/dependabot/alerts?per_page=100";
const DEFAULT_PROPERTIES_URL: &str = "https://api.github.com/repos/{org}/{repo}/properties/values";

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub orgs: BTreeMap<String, OrgConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct OrgConfig {
    pub name: String,
    pub token: Option<String>,
    pub repos_url: Option<String>,
    pub alerts_url: Option<String>,
    pub properties_url: Option<String>,
}

/// Fully resolved settings for one organization, passed into every
/// pipeline stage.
#[derive(Debug, Clone)]
pub struct OrgSettings {
    pub name: String,
    pub token: String,
    pub repos_url: String,
    pub alerts_url: String,
    pub properties_url: String,
}

impl OrgSettings {
    pub fn repos_endpoint(&self) -> String {
        render_template(&self.repos_url, &self.name, None)
    }

    pub fn alerts_endpoint(&self, repo: &str) -> String {
        render_template(&self.alerts_url, &self.name, Some(repo))
    }

    pub fn properties_endpoint(&self, repo: &str) -> String {
        render_template(&self.properties_url, &self.name, Some(repo))
    }
}

impl Config {
    /// Looks up `alias` and resolves it into settings, failing before any
    /// network call when something required is missing.
    pub fn org(&self, alias: &str, env_token: Option<String>) -> Result<OrgSettings> {
        let org = self
            .orgs
            .get(alias)
            .ok_or_else(|| AuditError::OrgNotFound(alias.to_string()))?;

        let name = org.name.trim().to_string();
        if name.is_empty() {
            return Err(AuditError::Config(format!(
                "orgs.{alias}.name must not be empty"
            )));
        }

        let token = org
            .token
            .clone()
            .or(env_token)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AuditError::NotAuthenticated(alias.to_string()))?;

        let repos_url = template_or_default(&org.repos_url, DEFAULT_REPOS_URL);
        let alerts_url = template_or_default(&org.alerts_url, DEFAULT_ALERTS_URL);
        let properties_url = template_or_default(&org.properties_url, DEFAULT_PROPERTIES_URL);

        require_placeholders(alias, "repos_url", &repos_url, &["{org}"])?;
        require_placeholders(alias, "alerts_url", &alerts_url, &["{org}", "{repo}"])?;
        require_placeholders(
            alias,
            "properties_url",
            &properties_url,
            &["{org}", "{repo}"],
        )?;

        Ok(OrgSettings {
            name,
            token,
            repos_url,
            alerts_url,
            properties_url,
        })
    }
}

fn template_or_default(template: &Option<String>, default: &str) -> String {
    template
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(default)
        .to_string()
}

fn require_placeholders(alias: &str, key: &str, template: &str, required: &[&str]) -> Result<()> {
    for placeholder in required {
        if !template.contains(placeholder) {
            return Err(AuditError::Config(format!(
                "orgs.{alias}.{key} is missing the {placeholder} placeholder"
            )));
        }
    }
    Ok(())
}

pub fn render_template(template: &str, org: &str, repo: Option<&str>) -> String {
    let rendered = template.replace("{org}", org);
    match repo {
        Some(repo) => rendered.replace("{repo}", repo),
        None => rendered,
    }
}

pub fn alias_for(secondary: bool) -> &'static str {
    if secondary {
        SECONDARY_ALIAS
    } else {
        PRIMARY_ALIAS
    }
}

pub fn config_path() -> Result<PathBuf> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        let path = PathBuf::from(xdg)
            .join("dependabot-report")
            .join("config.toml");
        return Ok(path);
    }

    let home =
        dirs::home_dir().ok_or_else(|| AuditError::Config("Cannot find home directory".into()))?;
    Ok(home
        .join(".config")
        .join("dependabot-report")
        .join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let path = config_path()?;
    if !path.exists() {
        return Err(AuditError::Config(format!(
            "config file not found at {}",
            path.display()
        )));
    }
    let contents = fs::read_to_string(&path)?;
    let config: Config = toml::from_str(&contents)?;
    Ok(config)
}
