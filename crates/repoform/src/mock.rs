//! Mock session for unit testing page objects without a browser.
//!
//! [`MockSession`] holds a scripted DOM: a title and a flat list of
//! [`MockElement`]s matched by [`Selector`] equality. Clicking an element
//! applies its [`ClickEffect`]s, which is enough to model checkboxes,
//! dropdown panels that appear on click, and navigation that changes the
//! title. Every call is recorded so tests can assert on the exact
//! interaction sequence.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::driver::Session;
use crate::locator::{Locator, Selector};
use crate::result::{RepoformError, RepoformResult};

/// What happens when a mock element is clicked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickEffect {
    /// Flip the element's own checked state
    ToggleSelected,
    /// Attach every element matching the selector (e.g. a dropdown panel)
    Attach(Selector),
    /// Detach every element matching the selector
    Detach(Selector),
    /// Replace the page title (navigation)
    SetTitle(String),
}

/// A scripted element in the mock DOM
#[derive(Debug, Clone)]
pub struct MockElement {
    selector: Selector,
    text: String,
    selected: bool,
    attached: bool,
    visible: bool,
    on_click: Vec<ClickEffect>,
}

impl MockElement {
    /// Create an attached, visible element with no text
    #[must_use]
    pub fn new(selector: Selector) -> Self {
        Self {
            selector,
            text: String::new(),
            selected: false,
            attached: true,
            visible: true,
            on_click: Vec::new(),
        }
    }

    /// Set the element text
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set the checked state
    #[must_use]
    pub const fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Start outside the DOM until some click attaches it
    #[must_use]
    pub const fn detached(mut self) -> Self {
        self.attached = false;
        self
    }

    /// Keep the element in the DOM but report empty visible text
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Add a click effect
    #[must_use]
    pub fn on_click(mut self, effect: ClickEffect) -> Self {
        self.on_click.push(effect);
        self
    }
}

/// Handle to an element of a [`MockSession`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockElementId(usize);

#[derive(Debug, Default)]
struct MockState {
    title: String,
    url: String,
    elements: Vec<MockElement>,
    failing: Vec<Selector>,
    history: Vec<String>,
}

impl MockState {
    fn check_failing(&self, selector: &Selector) -> RepoformResult<()> {
        if self.failing.contains(selector) {
            return Err(RepoformError::session(format!(
                "injected failure resolving {selector}"
            )));
        }
        Ok(())
    }

    fn matching(&self, selector: &Selector) -> Vec<MockElementId> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.attached && &e.selector == selector)
            .map(|(i, _)| MockElementId(i))
            .collect()
    }

    fn element(&self, id: MockElementId) -> RepoformResult<&MockElement> {
        self.elements
            .get(id.0)
            .filter(|e| e.attached)
            .ok_or_else(|| RepoformError::session("stale element reference"))
    }
}

/// Mock session for unit testing
#[derive(Debug, Default)]
pub struct MockSession {
    state: Mutex<MockState>,
}

impl MockSession {
    /// Create a mock session showing a page with the given title
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(MockState {
                title: title.into(),
                ..MockState::default()
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add an element to the DOM
    pub fn add_element(&self, element: MockElement) {
        self.state().elements.push(element);
    }

    /// Builder form of [`Self::add_element`]
    #[must_use]
    pub fn with_element(self, element: MockElement) -> Self {
        self.add_element(element);
        self
    }

    /// Make every resolution of `selector` fail with a backend error
    pub fn fail_on(&self, selector: Selector) {
        self.state().failing.push(selector);
    }

    /// Detach every element matching `selector`
    pub fn remove(&self, selector: &Selector) {
        for e in &mut self.state().elements {
            if &e.selector == selector {
                e.attached = false;
            }
        }
    }

    /// Current page title
    #[must_use]
    pub fn current_title(&self) -> String {
        self.state().title.clone()
    }

    /// Last URL passed to `goto`
    #[must_use]
    pub fn current_url(&self) -> String {
        self.state().url.clone()
    }

    /// Get call history
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.state().history.clone()
    }

    /// Check if method was called
    #[must_use]
    pub fn was_called(&self, method: &str) -> bool {
        self.state().history.iter().any(|c| c.starts_with(method))
    }

    /// Number of clicks delivered to elements matching `selector`
    #[must_use]
    pub fn click_count(&self, selector: &Selector) -> usize {
        let entry = format!("click:{selector}");
        let with_text = format!("{entry}[");
        self.state()
            .history
            .iter()
            .filter(|c| **c == entry || c.starts_with(&with_text))
            .count()
    }

    /// Number of clicks on the element whose text is `text`
    #[must_use]
    pub fn clicks_on_text(&self, text: &str) -> usize {
        let suffix = format!("[{text}]");
        self.state()
            .history
            .iter()
            .filter(|c| c.starts_with("click:") && c.ends_with(&suffix))
            .count()
    }

    /// Texts typed into elements matching `selector`, in order
    #[must_use]
    pub fn typed_into(&self, selector: &Selector) -> Vec<String> {
        let prefix = format!("send_keys:{selector}:");
        self.state()
            .history
            .iter()
            .filter_map(|c| c.strip_prefix(&prefix).map(str::to_string))
            .collect()
    }

    /// Whether any element matching `selector` is attached
    #[must_use]
    pub fn is_attached(&self, selector: &Selector) -> bool {
        !self.state().matching(selector).is_empty()
    }

    /// Checked state of the first element matching `selector`
    #[must_use]
    pub fn is_checked(&self, selector: &Selector) -> Option<bool> {
        let state = self.state();
        state
            .matching(selector)
            .first()
            .and_then(|id| state.elements.get(id.0))
            .map(|e| e.selected)
    }
}

#[async_trait]
impl Session for MockSession {
    type Element = MockElementId;

    async fn goto(&self, url: &str) -> RepoformResult<()> {
        let mut state = self.state();
        state.history.push(format!("goto:{url}"));
        state.url = url.to_string();
        Ok(())
    }

    async fn title(&self) -> RepoformResult<String> {
        let mut state = self.state();
        state.history.push("title".to_string());
        Ok(state.title.clone())
    }

    async fn find(&self, locator: &Locator) -> RepoformResult<MockElementId> {
        let mut state = self.state();
        state.history.push(format!("find:{}", locator.selector()));
        state.check_failing(locator.selector())?;
        state
            .matching(locator.selector())
            .first()
            .copied()
            .ok_or_else(|| RepoformError::ElementNotFound {
                locator: locator.to_string(),
            })
    }

    async fn find_all(&self, locator: &Locator) -> RepoformResult<Vec<MockElementId>> {
        let mut state = self.state();
        state.history.push(format!("find_all:{}", locator.selector()));
        state.check_failing(locator.selector())?;
        Ok(state.matching(locator.selector()))
    }

    async fn exists(&self, locator: &Locator) -> RepoformResult<bool> {
        let mut state = self.state();
        state.history.push(format!("exists:{}", locator.selector()));
        state.check_failing(locator.selector())?;
        Ok(!state.matching(locator.selector()).is_empty())
    }

    async fn click(&self, element: &MockElementId) -> RepoformResult<()> {
        let mut state = self.state();
        let (selector, text, effects) = {
            let e = state.element(*element)?;
            (e.selector.clone(), e.text.clone(), e.on_click.clone())
        };
        let entry = if text.is_empty() {
            format!("click:{selector}")
        } else {
            format!("click:{selector}[{text}]")
        };
        state.history.push(entry);

        for effect in effects {
            match effect {
                ClickEffect::ToggleSelected => {
                    if let Some(e) = state.elements.get_mut(element.0) {
                        e.selected = !e.selected;
                    }
                }
                ClickEffect::Attach(target) => {
                    for e in &mut state.elements {
                        if e.selector == target {
                            e.attached = true;
                        }
                    }
                }
                ClickEffect::Detach(target) => {
                    for e in &mut state.elements {
                        if e.selector == target {
                            e.attached = false;
                        }
                    }
                }
                ClickEffect::SetTitle(title) => state.title = title,
            }
        }
        Ok(())
    }

    async fn send_keys(&self, element: &MockElementId, text: &str) -> RepoformResult<()> {
        let mut state = self.state();
        let selector = state.element(*element)?.selector.clone();
        state.history.push(format!("send_keys:{selector}:{text}"));
        Ok(())
    }

    async fn is_selected(&self, element: &MockElementId) -> RepoformResult<bool> {
        let mut state = self.state();
        let (selector, selected) = {
            let e = state.element(*element)?;
            (e.selector.clone(), e.selected)
        };
        state.history.push(format!("is_selected:{selector}"));
        Ok(selected)
    }

    async fn text(&self, element: &MockElementId) -> RepoformResult<String> {
        let mut state = self.state();
        let (selector, text) = {
            let e = state.element(*element)?;
            let text = if e.visible { e.text.clone() } else { String::new() };
            (e.selector.clone(), text)
        };
        state.history.push(format!("text:{selector}"));
        Ok(text)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn loc(selector: Selector) -> Locator {
        Locator::new("test", selector)
    }

    mod dom_tests {
        use super::*;

        #[tokio::test]
        async fn test_find_missing_is_not_found() {
            let session = MockSession::new("Page");
            let err = session.find(&loc(Selector::id("nope"))).await.unwrap_err();
            assert!(err.is_element_not_found());
        }

        #[tokio::test]
        async fn test_detached_elements_are_invisible_to_queries() {
            let session = MockSession::new("Page")
                .with_element(MockElement::new(Selector::id("panel")).detached());
            assert!(!session.exists(&loc(Selector::id("panel"))).await.unwrap());
            assert!(session
                .find_all(&loc(Selector::id("panel")))
                .await
                .unwrap()
                .is_empty());
        }

        #[tokio::test]
        async fn test_hidden_element_has_empty_text() {
            let session = MockSession::new("Page")
                .with_element(MockElement::new(Selector::id("opt")).with_text("Rust").hidden());
            let el = session.find(&loc(Selector::id("opt"))).await.unwrap();
            assert_eq!(session.text(&el).await.unwrap(), "");
        }

        #[tokio::test]
        async fn test_injected_failure() {
            let session =
                MockSession::new("Page").with_element(MockElement::new(Selector::id("a")));
            session.fail_on(Selector::id("a"));
            let err = session.exists(&loc(Selector::id("a"))).await.unwrap_err();
            assert!(matches!(err, RepoformError::Session { .. }));
        }
    }

    mod click_effect_tests {
        use super::*;

        #[tokio::test]
        async fn test_toggle_selected() {
            let session = MockSession::new("Page").with_element(
                MockElement::new(Selector::id("box")).on_click(ClickEffect::ToggleSelected),
            );
            let el = session.find(&loc(Selector::id("box"))).await.unwrap();
            assert!(!session.is_selected(&el).await.unwrap());
            session.click(&el).await.unwrap();
            assert!(session.is_selected(&el).await.unwrap());
            assert_eq!(session.click_count(&Selector::id("box")), 1);
        }

        #[tokio::test]
        async fn test_attach_and_detach() {
            let session = MockSession::new("Page")
                .with_element(
                    MockElement::new(Selector::id("open"))
                        .on_click(ClickEffect::Attach(Selector::id("menu"))),
                )
                .with_element(MockElement::new(Selector::id("menu")).detached())
                .with_element(
                    MockElement::new(Selector::id("close"))
                        .on_click(ClickEffect::Detach(Selector::id("menu"))),
                );

            let open = session.find(&loc(Selector::id("open"))).await.unwrap();
            session.click(&open).await.unwrap();
            assert!(session.is_attached(&Selector::id("menu")));

            let close = session.find(&loc(Selector::id("close"))).await.unwrap();
            session.click(&close).await.unwrap();
            assert!(!session.is_attached(&Selector::id("menu")));
        }

        #[tokio::test]
        async fn test_set_title() {
            let session = MockSession::new("Before").with_element(
                MockElement::new(Selector::id("go"))
                    .on_click(ClickEffect::SetTitle("After".to_string())),
            );
            let go = session.find(&loc(Selector::id("go"))).await.unwrap();
            session.click(&go).await.unwrap();
            assert_eq!(session.title().await.unwrap(), "After");
        }

        #[tokio::test]
        async fn test_clicking_detached_handle_is_stale() {
            let session =
                MockSession::new("Page").with_element(MockElement::new(Selector::id("a")));
            let el = session.find(&loc(Selector::id("a"))).await.unwrap();
            session.remove(&Selector::id("a"));
            assert!(session.click(&el).await.is_err());
        }
    }

    mod history_tests {
        use super::*;

        #[tokio::test]
        async fn test_records_calls() {
            let session = MockSession::new("Page").with_element(
                MockElement::new(Selector::xpath("//li")).with_text("MIT License"),
            );
            session.goto("https://example.com/new").await.unwrap();
            let el = session.find(&loc(Selector::xpath("//li"))).await.unwrap();
            session.send_keys(&el, "hello").await.unwrap();
            session.click(&el).await.unwrap();

            assert!(session.was_called("goto"));
            assert_eq!(session.current_url(), "https://example.com/new");
            assert_eq!(session.typed_into(&Selector::xpath("//li")), vec!["hello"]);
            assert_eq!(session.clicks_on_text("MIT License"), 1);
            assert_eq!(session.click_count(&Selector::xpath("//li")), 1);
        }
    }
}
