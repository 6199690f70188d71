//! Template picker matching.
//!
//! The gitignore and license pickers list their options as plain text. A
//! requested template is matched against the visible text of every option
//! and resolves to exactly one option, nothing, or several candidates. Only
//! a unique match is ever clicked.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::result::RepoformError;

/// Which template picker an option list belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateKind {
    /// `.gitignore` template picker
    Gitignore,
    /// License picker
    License,
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Gitignore => "gitignore",
            Self::License => "license",
        })
    }
}

/// How a requested template name is compared with option texts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Option text, trimmed, must equal the requested name
    #[default]
    Exact,
    /// Option text must contain the requested name. An exact match wins
    /// over other substring matches; otherwise several matches are ambiguous.
    Contains,
}

/// Result of matching a request against the visible options
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionMatch {
    /// Exactly one option matched, at this on-screen index
    Unique(usize),
    /// No option matched
    NoMatch,
    /// Several options matched, at these on-screen indices
    Many(Vec<usize>),
}

impl MatchPolicy {
    /// Match `requested` against option texts in on-screen order.
    ///
    /// Options with empty visible text never match.
    #[must_use]
    pub fn match_options(self, requested: &str, options: &[String]) -> OptionMatch {
        let requested = requested.trim();
        let exact: Vec<usize> = indices(options, |text| text == requested);

        let hits = match self {
            Self::Exact => exact,
            Self::Contains => {
                if exact.len() == 1 {
                    exact
                } else {
                    indices(options, |text| text.contains(requested))
                }
            }
        };

        match hits.as_slice() {
            [] => OptionMatch::NoMatch,
            [only] => OptionMatch::Unique(*only),
            _ => OptionMatch::Many(hits),
        }
    }
}

fn indices(options: &[String], pred: impl Fn(&str) -> bool) -> Vec<usize> {
    options
        .iter()
        .enumerate()
        .filter(|(_, text)| {
            let text = text.trim();
            !text.is_empty() && pred(text)
        })
        .map(|(i, _)| i)
        .collect()
}

fn text_at(options: &[String], index: usize) -> String {
    options
        .get(index)
        .map(|t| t.trim().to_string())
        .unwrap_or_default()
}

/// Outcome of one template request during repository creation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TemplateSelection {
    /// The caller did not ask for a template
    #[default]
    NotRequested,
    /// One option matched and was clicked
    Selected {
        /// Requested name
        requested: String,
        /// Visible text of the clicked option
        option: String,
    },
    /// Nothing matched; no option was clicked
    NotFound {
        /// Requested name
        requested: String,
        /// Visible texts that were on offer
        available: Vec<String>,
    },
    /// Several options matched; none was clicked
    Ambiguous {
        /// Requested name
        requested: String,
        /// Visible texts of the matching options
        candidates: Vec<String>,
    },
}

impl TemplateSelection {
    /// Build the outcome for a match over `options`
    #[must_use]
    pub fn from_match(requested: &str, options: &[String], found: &OptionMatch) -> Self {
        let requested = requested.to_string();
        match found {
            OptionMatch::Unique(i) => Self::Selected {
                requested,
                option: text_at(options, *i),
            },
            OptionMatch::NoMatch => Self::NotFound {
                requested,
                available: options
                    .iter()
                    .map(|t| t.trim())
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .collect(),
            },
            OptionMatch::Many(hits) => Self::Ambiguous {
                requested,
                candidates: hits.iter().map(|i| text_at(options, *i)).collect(),
            },
        }
    }

    /// Whether an option was clicked
    #[must_use]
    pub const fn is_selected(&self) -> bool {
        matches!(self, Self::Selected { .. })
    }

    /// Whether the request was made but could not be honoured
    #[must_use]
    pub const fn is_unresolved(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Ambiguous { .. })
    }

    /// Error equivalent of an unresolved outcome
    #[must_use]
    pub fn to_error(&self, kind: TemplateKind) -> Option<RepoformError> {
        match self {
            Self::NotFound { requested, .. } => Some(RepoformError::TemplateNotFound {
                kind,
                requested: requested.clone(),
            }),
            Self::Ambiguous {
                requested,
                candidates,
            } => Some(RepoformError::AmbiguousTemplate {
                kind,
                requested: requested.clone(),
                candidates: candidates.clone(),
            }),
            Self::NotRequested | Self::Selected { .. } => None,
        }
    }
}
