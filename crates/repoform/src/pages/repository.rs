//! The repository view shown after a successful submission.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::driver::Session;
use crate::locator::Selector;
use crate::page_object::{LocatorTable, PageObject};
use crate::result::RepoformResult;

/// Repository name as the forge stores it.
///
/// The forge trims the submitted name and turns every run of spaces into a
/// single hyphen, so `"  my  new repo "` is stored as `"my-new-repo"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepositoryName(String);

impl RepositoryName {
    /// Normalize a name the way the forge does on submission.
    ///
    /// Only ASCII control characters and spaces are trimmed from the ends;
    /// other Unicode whitespace is part of the name.
    #[must_use]
    pub fn normalize(raw: &str) -> Self {
        let joined = raw
            .trim_matches(|c: char| c <= ' ')
            .split(' ')
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("-");
        Self(joined)
    }

    /// Borrow as `&str`
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RepositoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RepositoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn repository_locators() -> LocatorTable {
    LocatorTable::new().with_locator(
        "name_heading",
        Selector::xpath("//strong[@itemprop='name']/a"),
    )
}

/// Page object for a single repository
#[derive(Debug)]
pub struct RepositoryPage<'s, S> {
    session: &'s mut S,
    locators: LocatorTable,
    repository_name: RepositoryName,
}

impl<'s, S: Session> RepositoryPage<'s, S> {
    /// Attach to the session, seeded with the repository's stored name
    pub fn new(session: &'s mut S, repository_name: RepositoryName) -> Self {
        Self {
            session,
            locators: repository_locators(),
            repository_name,
        }
    }

    /// Name this page expects to show
    #[must_use]
    pub const fn repository_name(&self) -> &RepositoryName {
        &self.repository_name
    }

    /// Replace the expected name
    pub fn set_repository_name(&mut self, name: RepositoryName) {
        self.repository_name = name;
    }

    /// Whether the live page title mentions the repository
    pub async fn is_displayed(&self) -> RepoformResult<bool> {
        let title = self.session.title().await?;
        let shown = title.contains(self.repository_name.as_str());
        debug!(%title, repository = %self.repository_name, shown, "repository page check");
        Ok(shown)
    }

    /// Text of the repository name heading, if the heading is present
    pub async fn heading_name(&self) -> RepoformResult<Option<String>> {
        let locator = self.locators.get("name_heading")?;
        if !self.session.exists(locator).await? {
            return Ok(None);
        }
        let heading = self.session.find(locator).await?;
        Ok(Some(self.session.text(&heading).await?.trim().to_string()))
    }

    /// Give the session back
    pub fn into_session(self) -> &'s mut S {
        self.session
    }
}

impl<S> PageObject for RepositoryPage<'_, S> {
    fn locators(&self) -> &LocatorTable {
        &self.locators
    }
}
