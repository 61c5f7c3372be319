use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("No token for organization '{0}'. Set `token` in its config table or export GITHUB_TOKEN.")]
    NotAuthenticated(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Organization alias not configured: {0}")]
    OrgNotFound(String),

    #[error("GitHub API error: {0}")]
    GitHub(String),

    #[error("Fetch failed for {url}: {cause}")]
    FetchFailed { url: String, cause: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),
}

impl AuditError {
    pub fn fetch_failed(url: &str, err: &octocrab::Error) -> Self {
        AuditError::FetchFailed {
            url: url.to_string(),
            cause: describe(err),
        }
    }
}

/// octocrab renders API errors as just "GitHub"; pull the status and the
/// server message out instead.
fn describe(err: &octocrab::Error) -> String {
    match err {
        octocrab::Error::GitHub { source, .. } => {
            format!("HTTP {}: {}", source.status_code, source.message)
        }
        other => other.to_string(),
    }
}

impl From<octocrab::Error> for AuditError {
    fn from(err: octocrab::Error) -> Self {
        AuditError::GitHub(describe(&err))
    }
}

pub type Result<T> = std::result::Result<T, AuditError>;
