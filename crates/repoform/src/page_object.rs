//! Page Object Model support.
//!
//! A page object pairs a borrowed [`Session`] with a [`LocatorTable`]: a
//! data-driven map from logical element names to locators. Nothing is bound
//! at construction except the title check; every element is resolved on
//! demand.

use tracing::{debug, warn};

use crate::driver::Session;
use crate::locator::{Locator, Selector};
use crate::result::{RepoformError, RepoformResult};

/// Trait for page objects representing one screen of the application
pub trait PageObject {
    /// Locators of the elements on this page
    fn locators(&self) -> &LocatorTable;

    /// Get the page name for logging/debugging
    fn page_name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Ordered table of named locators
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocatorTable {
    entries: Vec<Locator>,
}

impl LocatorTable {
    /// Create an empty table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a locator, replacing any earlier entry with the same name
    #[must_use]
    pub fn with_locator(mut self, name: impl Into<String>, selector: Selector) -> Self {
        self.insert(Locator::new(name, selector));
        self
    }

    /// Add a locator, replacing any earlier entry with the same name
    pub fn insert(&mut self, locator: Locator) {
        match self.entries.iter_mut().find(|l| l.name() == locator.name()) {
            Some(slot) => *slot = locator,
            None => self.entries.push(locator),
        }
    }

    /// Get a locator by name
    pub fn get(&self, name: &str) -> RepoformResult<&Locator> {
        self.entries
            .iter()
            .find(|l| l.name() == name)
            .ok_or_else(|| RepoformError::UnknownLocator {
                name: name.to_string(),
            })
    }

    /// Get all locator names, in declaration order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(Locator::name).collect()
    }

    /// Number of locators
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Fail with [`RepoformError::UnexpectedPage`] unless the session shows `expected`
pub async fn verify_title<S: Session + ?Sized>(session: &S, expected: &str) -> RepoformResult<()> {
    let actual = session.title().await?;
    if actual == expected {
        debug!(title = %actual, "page title verified");
        Ok(())
    } else {
        warn!(%expected, %actual, "landed on unexpected page");
        Err(RepoformError::UnexpectedPage {
            expected: expected.to_string(),
            actual,
        })
    }
}

/// Probe `names` in order and return the ones that are absent.
///
/// Absence is not an error; a failing backend is.
pub async fn missing_elements<S: Session + ?Sized>(
    session: &S,
    table: &LocatorTable,
    names: &[&str],
) -> RepoformResult<Vec<String>> {
    let mut missing = Vec::new();
    for name in names {
        let locator = table.get(name)?;
        if !session.exists(locator).await? {
            debug!(element = %locator, "element absent");
            missing.push((*name).to_string());
        }
    }
    Ok(missing)
}
