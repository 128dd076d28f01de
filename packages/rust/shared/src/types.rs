//! Core domain types for docsteps tutorials.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DocStepsError;

// ---------------------------------------------------------------------------
// TutorialId
// ---------------------------------------------------------------------------

/// Opaque tutorial identifier, taken from the content source's grouping key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TutorialId(String);

impl TutorialId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TutorialId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TutorialId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for TutorialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Topic
// ---------------------------------------------------------------------------

/// Closed set of topic labels a tutorial can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topic {
    #[serde(rename = "Getting Started")]
    GettingStarted,
    Concepts,
    Development,
    Operations,
    Integrations,
}

impl Topic {
    /// Every topic, in display order.
    pub const ALL: [Topic; 5] = [
        Topic::GettingStarted,
        Topic::Concepts,
        Topic::Development,
        Topic::Operations,
        Topic::Integrations,
    ];

    /// The label as authors write it in `meta.json`.
    pub fn as_str(self) -> &'static str {
        match self {
            Topic::GettingStarted => "Getting Started",
            Topic::Concepts => "Concepts",
            Topic::Development => "Development",
            Topic::Operations => "Operations",
            Topic::Integrations => "Integrations",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Topic {
    type Err = DocStepsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Topic::ALL
            .into_iter()
            .find(|topic| topic.as_str() == s)
            .ok_or_else(|| {
                let allowed = Topic::ALL.map(Topic::as_str).join(", ");
                DocStepsError::validation(
                    "label",
                    format!("`{s}` is not a known topic (expected one of: {allowed})"),
                )
            })
    }
}

// ---------------------------------------------------------------------------
// Meta
// ---------------------------------------------------------------------------

/// Tutorial-level metadata from `meta.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    /// Injected from the content source path, never from the document body.
    pub id: TutorialId,
    pub title: String,
    pub label: Topic,
    pub description: String,
}

// ---------------------------------------------------------------------------
// Step
// ---------------------------------------------------------------------------

/// One page of a tutorial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Author-declared ordering key.
    pub position: u32,
    /// Normalized route the host router navigates to.
    pub path: String,
    /// Content-source key the step was read from (e.g. `intro/setup.md`).
    pub source: String,
    /// Remaining front matter, passed through untouched.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub front_matter: serde_json::Map<String, serde_json::Value>,
}

impl Step {
    /// The `title` front-matter key, if the author set one.
    pub fn title(&self) -> Option<&str> {
        self.front_matter.get("title").and_then(|v| v.as_str())
    }
}

// ---------------------------------------------------------------------------
// NavigationState
// ---------------------------------------------------------------------------

/// Active step and pagination neighbours for one (tutorial, location) pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NavigationState {
    pub active_step: Option<Step>,
    pub prev: Option<Step>,
    pub next: Option<Step>,
    /// Set when several steps matched the location and the lowest position won.
    #[serde(default)]
    pub ambiguous: bool,
}

impl NavigationState {
    /// The "not on a recognized step" state.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_on_step(&self) -> bool {
        self.active_step.is_some()
    }
}
