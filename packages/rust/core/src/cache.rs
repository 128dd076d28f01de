//! Memoized tutorials, keyed by id.
//!
//! The cache is an explicit value owned by its caller. It is invalidated
//! per id, wholesale, or when the content source reports a new revision.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use docsteps_content::ContentSource;
use docsteps_shared::{Result, RouteConfig, TutorialId};

use crate::aggregator::load_tutorial;
use crate::tutorial::Tutorial;

#[derive(Debug, Default)]
pub struct TutorialCache {
    routes: RouteConfig,
    entries: HashMap<TutorialId, Arc<Tutorial>>,
    revision: Option<String>,
}

impl TutorialCache {
    pub fn new(routes: RouteConfig) -> Self {
        Self {
            routes,
            entries: HashMap::new(),
            revision: None,
        }
    }

    pub fn routes(&self) -> &RouteConfig {
        &self.routes
    }

    /// Return the cached tutorial or build it. Failures are not cached.
    pub fn get_or_load<S>(&mut self, source: &S, id: &TutorialId) -> Result<Arc<Tutorial>>
    where
        S: ContentSource + ?Sized,
    {
        if let Some(tutorial) = self.entries.get(id) {
            return Ok(Arc::clone(tutorial));
        }

        if self.revision.is_none() {
            self.revision = Some(source.revision()?);
        }

        let tutorial = Arc::new(load_tutorial(source, id, &self.routes)?);
        debug!(tutorial = %id, "cached tutorial");
        self.entries.insert(id.clone(), Arc::clone(&tutorial));
        Ok(tutorial)
    }

    pub fn get(&self, id: &TutorialId) -> Option<Arc<Tutorial>> {
        self.entries.get(id).cloned()
    }

    /// Drop one tutorial. Returns whether it was cached.
    pub fn invalidate(&mut self, id: &TutorialId) -> bool {
        self.entries.remove(id).is_some()
    }

    /// Drop every tutorial and forget the last seen revision.
    pub fn invalidate_all(&mut self) {
        self.entries.clear();
        self.revision = None;
    }

    /// Invalidate everything if the source changed since the last load.
    /// Returns `true` when entries were dropped.
    pub fn sync_revision<S>(&mut self, source: &S) -> Result<bool>
    where
        S: ContentSource + ?Sized,
    {
        let current = source.revision()?;
        match &self.revision {
            Some(seen) if *seen == current => Ok(false),
            Some(_) => {
                info!(dropped = self.entries.len(), "content changed, invalidating tutorial cache");
                self.invalidate_all();
                self.revision = Some(current);
                Ok(true)
            }
            None => {
                self.revision = Some(current);
                Ok(false)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
