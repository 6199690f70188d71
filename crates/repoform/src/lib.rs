//! Repoform: page objects for a git forge's repository creation screen
//!
//! Typed façades over the "Create a New Repository" form and the pages it
//! leads to, for end-to-end UI tests written in Rust.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    REPOFORM Architecture                        │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌──────────────┐    ┌──────────────┐    ┌──────────────┐      │
//! │   │ Page Object  │    │ Locator      │    │ Session      │      │
//! │   │ (workflow)   │───►│ Table        │───►│ (CDP / mock) │      │
//! │   └──────────────┘    └──────────────┘    └──────────────┘      │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A page object borrows the session mutably for as long as it lives; the
//! next page object in a workflow takes that borrow over.

#![warn(missing_docs)]

mod config;
mod driver;
mod locator;
mod page_object;
mod result;
mod template;

/// Page objects for the forge screens
pub mod pages;

/// Mock session for unit testing page objects
pub mod mock;

/// Chrome DevTools Protocol session (requires the `browser` feature)
#[cfg(feature = "browser")]
pub mod cdp;

pub use config::{SiteConfig, CREATE_REPOSITORY_TITLE, DEFAULT_BASE_URL};
pub use driver::Session;
pub use locator::{Locator, Selector};
pub use page_object::{missing_elements, verify_title, LocatorTable, PageObject};
pub use pages::create_repository::{
    CreateRepositoryPage, CreateRepositoryReport, CreateRepositoryRequest, DynamicControlsReport,
    REQUIRED_FORM_ELEMENTS,
};
pub use pages::repository::{RepositoryName, RepositoryPage};
pub use pages::start::StartPage;
pub use result::{RepoformError, RepoformResult};
pub use template::{MatchPolicy, OptionMatch, TemplateKind, TemplateSelection};

#[cfg(feature = "browser")]
pub use cdp::CdpSession;

/// Prelude for convenient imports
pub mod prelude {
    pub use super::mock::{ClickEffect, MockElement, MockSession};
    pub use super::{
        CreateRepositoryPage, CreateRepositoryRequest, Locator, MatchPolicy, RepoformError,
        RepoformResult, RepositoryName, RepositoryPage, Selector, Session, SiteConfig, StartPage,
        TemplateSelection,
    };
}
