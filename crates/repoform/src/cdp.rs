//! Chrome DevTools Protocol session.
//!
//! [`CdpSession`] drives an already-open chromiumoxide page. Launching and
//! closing the browser stay with the caller.

use async_trait::async_trait;
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use tracing::trace;

use crate::driver::Session;
use crate::locator::{Locator, Selector};
use crate::result::{RepoformError, RepoformResult};

fn cdp_error(e: impl std::fmt::Display) -> RepoformError {
    RepoformError::session(e.to_string())
}

/// JavaScript expression counting the elements a selector matches
fn count_query(selector: &Selector) -> String {
    match selector {
        Selector::XPath(s) => format!(
            "document.evaluate({s:?}, document, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null).snapshotLength"
        ),
        other => {
            let css = other.to_css().unwrap_or_default();
            format!("document.querySelectorAll({css:?}).length")
        }
    }
}

/// Element function returning rendered text, or `''` when the element is not rendered.
///
/// `innerText` alone falls back to `textContent` for `display: none` nodes.
const VISIBLE_TEXT_FN: &str = "function() { \
const shown = typeof this.checkVisibility === 'function' \
? this.checkVisibility() : this.getClientRects().length > 0; \
return shown ? this.innerText : ''; }";

/// Session over a chromiumoxide page
#[derive(Debug, Clone)]
pub struct CdpSession {
    page: Page,
}

impl CdpSession {
    /// Wrap an open page
    #[must_use]
    pub const fn new(page: Page) -> Self {
        Self { page }
    }

    /// Underlying page
    #[must_use]
    pub const fn page(&self) -> &Page {
        &self.page
    }

    async fn count(&self, selector: &Selector) -> RepoformResult<usize> {
        let result = self
            .page
            .evaluate(count_query(selector))
            .await
            .map_err(cdp_error)?;
        result.into_value::<usize>().map_err(cdp_error)
    }
}

#[async_trait]
impl Session for CdpSession {
    type Element = Element;

    async fn goto(&self, url: &str) -> RepoformResult<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| RepoformError::NavigationError {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn title(&self) -> RepoformResult<String> {
        let title = self.page.get_title().await.map_err(cdp_error)?;
        Ok(title.unwrap_or_default())
    }

    async fn find(&self, locator: &Locator) -> RepoformResult<Element> {
        self.find_all(locator)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| RepoformError::ElementNotFound {
                locator: locator.to_string(),
            })
    }

    async fn find_all(&self, locator: &Locator) -> RepoformResult<Vec<Element>> {
        let selector = locator.selector();
        // Absent matches are an empty list, not a protocol error.
        if self.count(selector).await? == 0 {
            return Ok(Vec::new());
        }
        let found = match selector.to_css() {
            Some(css) => self.page.find_elements(css).await,
            None => self.page.find_xpaths(selector.value()).await,
        };
        let found = found.map_err(cdp_error)?;
        trace!(element = %locator, count = found.len(), "resolved");
        Ok(found)
    }

    async fn exists(&self, locator: &Locator) -> RepoformResult<bool> {
        Ok(self.count(locator.selector()).await? > 0)
    }

    async fn click(&self, element: &Element) -> RepoformResult<()> {
        element.click().await.map_err(cdp_error)?;
        Ok(())
    }

    async fn send_keys(&self, element: &Element, text: &str) -> RepoformResult<()> {
        element.focus().await.map_err(cdp_error)?;
        element.type_str(text).await.map_err(cdp_error)?;
        Ok(())
    }

    async fn is_selected(&self, element: &Element) -> RepoformResult<bool> {
        let checked = element.property("checked").await.map_err(cdp_error)?;
        Ok(checked.and_then(|v| v.as_bool()).unwrap_or(false))
    }

    async fn text(&self, element: &Element) -> RepoformResult<String> {
        let returned = element
            .call_js_fn(VISIBLE_TEXT_FN, false)
            .await
            .map_err(cdp_error)?;
        Ok(returned
            .result
            .value
            .as_ref()
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_query_css() {
        let q = count_query(&Selector::id("repository_name"));
        assert_eq!(
            q,
            "document.querySelectorAll(\"[id=\\\"repository_name\\\"]\").length"
        );
    }

    #[test]
    fn test_visible_text_blanks_unrendered_elements() {
        assert!(VISIBLE_TEXT_FN.starts_with("function()"));
        assert!(VISIBLE_TEXT_FN.contains("this.checkVisibility()"));
        assert!(VISIBLE_TEXT_FN.contains("return shown ? this.innerText : '';"));
        assert!(!VISIBLE_TEXT_FN.contains("textContent"));
    }

    #[test]
    fn test_count_query_xpath() {
        let q = count_query(&Selector::xpath("//button"));
        assert!(q.starts_with("document.evaluate(\"//button\""));
        assert!(q.ends_with(".snapshotLength"));
    }
}
