//! Landing page shown to signed-out visitors.

use crate::driver::Session;
use crate::locator::Selector;
use crate::page_object::{LocatorTable, PageObject};
use crate::result::RepoformResult;

fn start_locators() -> LocatorTable {
    LocatorTable::new().with_locator("sign_in", Selector::xpath("//a[contains(@href, '/login')]"))
}

/// Page object for the signed-out landing page
#[derive(Debug)]
pub struct StartPage<'s, S> {
    session: &'s mut S,
    locators: LocatorTable,
}

impl<'s, S: Session> StartPage<'s, S> {
    /// Attach to the session
    pub fn new(session: &'s mut S) -> Self {
        Self {
            session,
            locators: start_locators(),
        }
    }

    /// Whether the sign-in link is offered
    pub async fn is_signed_out(&self) -> RepoformResult<bool> {
        self.session.exists(self.locators.get("sign_in")?).await
    }

    /// Give the session back
    pub fn into_session(self) -> &'s mut S {
        self.session
    }
}

impl<S> PageObject for StartPage<'_, S> {
    fn locators(&self) -> &LocatorTable {
        &self.locators
    }
}
