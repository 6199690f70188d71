//! Session - Abstract Browser Automation Trait
//!
//! Page objects never talk to a browser directly. They go through the
//! [`Session`] capability, which resolves [`Locator`]s into backend element
//! handles and performs the handful of interactions a form needs.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │  Session (Abstract Trait)                                     │
//! ├───────────────────────────────────────────────────────────────┤
//! │   ┌──────────────────────┐       ┌──────────────────────┐     │
//! │   │  CdpSession          │       │  MockSession         │     │
//! │   │  (feature "browser") │       │  (Unit Tests)        │     │
//! │   │  chromiumoxide page  │       │  scripted DOM        │     │
//! │   └──────────────────────┘       └──────────────────────┘     │
//! └───────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;

use crate::locator::Locator;
use crate::result::{RepoformError, RepoformResult};

/// Abstract session trait for browser automation
///
/// All calls against one session are awaited one after another; a session
/// is never asked to do two things at once.
///
/// # Implementations
///
/// - `CdpSession` - chromiumoxide page over the Chrome DevTools Protocol
/// - `MockSession` - for unit testing
#[async_trait]
pub trait Session: Send + Sync {
    /// Backend handle for a resolved element
    type Element: Send + Sync;

    /// Navigate to URL
    async fn goto(&self, url: &str) -> RepoformResult<()>;

    /// Title of the currently loaded page
    async fn title(&self) -> RepoformResult<String>;

    /// Resolve a locator to a single element.
    ///
    /// Fails with [`RepoformError::ElementNotFound`] when nothing matches.
    async fn find(&self, locator: &Locator) -> RepoformResult<Self::Element>;

    /// Resolve a locator to every matching element, in document order
    async fn find_all(&self, locator: &Locator) -> RepoformResult<Vec<Self::Element>>;

    /// Check whether the locator matches anything.
    ///
    /// Absence is `Ok(false)`; only backend failures are errors.
    async fn exists(&self, locator: &Locator) -> RepoformResult<bool> {
        match self.find_all(locator).await {
            Ok(found) => Ok(!found.is_empty()),
            Err(RepoformError::ElementNotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Click element
    async fn click(&self, element: &Self::Element) -> RepoformResult<()>;

    /// Type text into element
    async fn send_keys(&self, element: &Self::Element, text: &str) -> RepoformResult<()>;

    /// Checked/selected state of a checkbox, radio or option
    async fn is_selected(&self, element: &Self::Element) -> RepoformResult<bool>;

    /// Visible text of element
    async fn text(&self, element: &Self::Element) -> RepoformResult<String>;
}
