//! Tutorial catalog backing the tutorial list page.
//!
//! Search and topic filtering are plain predicates here; the widgets that
//! feed them belong to the presentation layer.

use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;
use tracing::instrument;

use docsteps_content::ContentSource;
use docsteps_shared::{DocStepsError, Meta, Result, Topic, TutorialId};

use crate::cache::TutorialCache;
use crate::tutorial::Tutorial;

/// Label of the catch-all topic filter option.
pub const ALL_TOPICS: &str = "All topics";

/// Topic dropdown selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TopicFilter {
    #[default]
    All,
    Only(Topic),
}

impl TopicFilter {
    pub fn matches(self, topic: Topic) -> bool {
        match self {
            TopicFilter::All => true,
            TopicFilter::Only(wanted) => wanted == topic,
        }
    }

    /// Dropdown options, catch-all first.
    pub fn options() -> Vec<&'static str> {
        std::iter::once(ALL_TOPICS)
            .chain(Topic::ALL.into_iter().map(Topic::as_str))
            .collect()
    }
}

impl FromStr for TopicFilter {
    type Err = DocStepsError;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case(ALL_TOPICS) || s.eq_ignore_ascii_case("all") {
            Ok(TopicFilter::All)
        } else {
            s.parse().map(TopicFilter::Only)
        }
    }
}

/// One tutorial as shown in the list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TutorialCard {
    pub meta: Meta,
    /// Route of the first step; `None` when the tutorial has no steps.
    pub first_step: Option<String>,
    pub step_count: usize,
}

/// All tutorials of a content snapshot, ordered by id.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tutorials: Vec<Arc<Tutorial>>,
}

impl Catalog {
    pub fn from_tutorials(mut tutorials: Vec<Arc<Tutorial>>) -> Self {
        tutorials.sort_by(|a, b| a.id().cmp(b.id()));
        Self { tutorials }
    }

    /// Build every listed tutorial through the cache.
    #[instrument(skip_all)]
    pub fn load<S>(source: &S, cache: &mut TutorialCache) -> Result<Self>
    where
        S: ContentSource + ?Sized,
    {
        let tutorials = source
            .list_tutorial_ids()?
            .iter()
            .map(|id| cache.get_or_load(source, id))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_tutorials(tutorials))
    }

    pub fn get(&self, id: &TutorialId) -> Option<&Arc<Tutorial>> {
        self.tutorials.iter().find(|t| t.id() == id)
    }

    pub fn tutorials(&self) -> &[Arc<Tutorial>] {
        &self.tutorials
    }

    pub fn cards(&self) -> Vec<TutorialCard> {
        self.tutorials.iter().map(|t| card(t)).collect()
    }

    /// Cards whose title contains `search` (case-insensitive) and whose
    /// label passes `topic`.
    pub fn filter(&self, search: &str, topic: TopicFilter) -> Vec<TutorialCard> {
        self.tutorials
            .iter()
            .filter(|t| matches_search(&t.meta().title, search))
            .filter(|t| topic.matches(t.meta().label))
            .map(|t| card(t))
            .collect()
    }
}

pub fn matches_search(title: &str, search: &str) -> bool {
    title.to_lowercase().contains(&search.trim().to_lowercase())
}

fn card(tutorial: &Tutorial) -> TutorialCard {
    TutorialCard {
        meta: tutorial.meta().clone(),
        first_step: tutorial.first_step().map(|step| step.path.clone()),
        step_count: tutorial.steps().len(),
    }
}
