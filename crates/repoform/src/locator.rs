//! Locator abstraction for element selection.
//!
//! A [`Locator`] is a logical name paired with a [`Selector`]. Locators are
//! plain data: they are declared once per page and resolved against the live
//! session every time they are used, so a page object never holds on to a
//! stale element.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Selector strategy for locating elements
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "by", content = "value")]
pub enum Selector {
    /// Element `id` attribute
    Id(String),
    /// Element `name` attribute
    Name(String),
    /// CSS selector (e.g., "button.primary")
    Css(String),
    /// XPath expression
    #[serde(rename = "xpath")]
    XPath(String),
}

impl Selector {
    /// Create an id selector
    #[must_use]
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    /// Create a name selector
    #[must_use]
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create an XPath selector
    #[must_use]
    pub fn xpath(expr: impl Into<String>) -> Self {
        Self::XPath(expr.into())
    }

    /// Express the selector as CSS, if the strategy allows it.
    ///
    /// Attribute selectors are used for ids and names so that values with
    /// characters that are special in CSS (`.`, `:`) need no escaping.
    #[must_use]
    pub fn to_css(&self) -> Option<String> {
        match self {
            Self::Id(id) => Some(format!("[id={id:?}]")),
            Self::Name(name) => Some(format!("[name={name:?}]")),
            Self::Css(css) => Some(css.clone()),
            Self::XPath(_) => None,
        }
    }

    /// Strategy keyword used in diagnostics
    #[must_use]
    pub const fn strategy(&self) -> &'static str {
        match self {
            Self::Id(_) => "id",
            Self::Name(_) => "name",
            Self::Css(_) => "css",
            Self::XPath(_) => "xpath",
        }
    }

    /// Raw selector value
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Id(v) | Self::Name(v) | Self::Css(v) | Self::XPath(v) => v,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.strategy(), self.value())
    }
}

/// A named, immutable element locator
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    name: String,
    selector: Selector,
}

impl Locator {
    /// Create a locator
    #[must_use]
    pub fn new(name: impl Into<String>, selector: Selector) -> Self {
        Self {
            name: name.into(),
            selector,
        }
    }

    /// Logical name of the element
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the selector
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.selector)
    }
}
