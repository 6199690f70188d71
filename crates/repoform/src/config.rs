//! Site configuration.
//!
//! Everything a page object needs to know about the deployment under test
//! that is not part of the page markup. Loadable from YAML:
//!
//! ```yaml
//! base_url: https://github.com
//! create_path: /new
//! create_title: Create a New Repository
//! match_policy: exact
//! strict_templates: false
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::result::{RepoformError, RepoformResult};
use crate::template::MatchPolicy;

/// Title of the repository creation page
pub const CREATE_REPOSITORY_TITLE: &str = "Create a New Repository";

/// Default forge address
pub const DEFAULT_BASE_URL: &str = "https://github.com";

/// Configuration for the site under test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Scheme and host of the forge
    pub base_url: String,
    /// Path of the repository creation form
    pub create_path: String,
    /// Title the creation page must show
    pub create_title: String,
    /// How template names are matched against picker options
    pub match_policy: MatchPolicy,
    /// Fail before submitting when a requested template cannot be selected
    pub strict_templates: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            create_path: "/new".to_string(),
            create_title: CREATE_REPOSITORY_TITLE.to_string(),
            match_policy: MatchPolicy::Exact,
            strict_templates: false,
        }
    }
}

impl SiteConfig {
    /// Create new config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the forge address
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the expected creation page title
    #[must_use]
    pub fn with_create_title(mut self, title: impl Into<String>) -> Self {
        self.create_title = title.into();
        self
    }

    /// Set the template match policy
    #[must_use]
    pub const fn with_match_policy(mut self, policy: MatchPolicy) -> Self {
        self.match_policy = policy;
        self
    }

    /// Enable or disable strict template selection
    #[must_use]
    pub const fn with_strict_templates(mut self, strict: bool) -> Self {
        self.strict_templates = strict;
        self
    }

    /// Full URL of the creation form
    #[must_use]
    pub fn create_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.create_path.trim_start_matches('/')
        )
    }

    /// Parse from YAML
    pub fn from_yaml_str(yaml: &str) -> RepoformResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> RepoformResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> RepoformResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Check the base URL scheme and that a title is set
    pub fn validate(&self) -> RepoformResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(RepoformError::Config {
                message: format!("base_url must be http(s), got {:?}", self.base_url),
            });
        }
        if self.create_title.trim().is_empty() {
            return Err(RepoformError::Config {
                message: "create_title must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
