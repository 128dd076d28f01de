//! The validated tutorial aggregate.

use std::collections::BTreeMap;

use serde::Serialize;

use docsteps_shared::{Meta, Step, TutorialId};

/// Metadata plus steps sorted by ascending, distinct position.
///
/// Only [`crate::aggregator`] constructs this type, so every instance has
/// passed meta validation and the position uniqueness check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tutorial {
    meta: Meta,
    steps: Vec<Step>,
}

impl Tutorial {
    pub(crate) fn new(meta: Meta, steps: Vec<Step>) -> Self {
        debug_assert!(steps.windows(2).all(|w| w[0].position < w[1].position));
        Self { meta, steps }
    }

    pub fn id(&self) -> &TutorialId {
        &self.meta.id
    }

    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Lowest-position step, the tutorial's entry point.
    pub fn first_step(&self) -> Option<&Step> {
        self.steps.first()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Routes claimed by more than one step, with the sources claiming them.
    ///
    /// Such routes make the active step ambiguous during navigation.
    pub fn duplicate_paths(&self) -> Vec<(&str, Vec<&str>)> {
        let mut by_path: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for step in &self.steps {
            by_path
                .entry(step.path.as_str())
                .or_default()
                .push(step.source.as_str());
        }
        by_path
            .into_iter()
            .filter(|(_, sources)| sources.len() > 1)
            .collect()
    }
}
