//! Navigation tracker.
//!
//! [`compute_navigation`] is the pure core: given a tutorial and the current
//! location it finds the active step and its pagination neighbours.
//! [`NavigationTracker`] wraps it for event-driven hosts and publishes each
//! result as one atomic snapshot over a `tokio::sync::watch` channel.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use docsteps_content::ContentSource;
use docsteps_shared::{DocStepsError, NavigationState, Result, TutorialId};

use crate::cache::TutorialCache;
use crate::location::{LocationKind, classify, path_only};
use crate::tutorial::Tutorial;

/// Find the active step for `current_location` and its prev/next steps.
///
/// A location matches a step when it equals the step path, optionally with
/// one trailing `/`. If several steps match, the lowest position wins and
/// the state is flagged `ambiguous`.
pub fn compute_navigation(tutorial: &Tutorial, current_location: &str) -> NavigationState {
    let location = path_only(current_location);
    let steps = tutorial.steps();

    let matches: Vec<usize> = steps
        .iter()
        .enumerate()
        .filter(|(_, step)| location_matches(location, &step.path))
        .map(|(index, _)| index)
        .collect();

    // Steps are sorted by position, so the first match has the lowest one.
    let Some(&index) = matches.first() else {
        return NavigationState::none();
    };

    let ambiguous = matches.len() > 1;
    if ambiguous {
        let sources: Vec<&str> = matches.iter().map(|&i| steps[i].source.as_str()).collect();
        warn!(
            tutorial = %tutorial.id(),
            location,
            ?sources,
            chosen = %steps[index].source,
            "ambiguous active step: several steps share this path"
        );
    }

    NavigationState {
        active_step: Some(steps[index].clone()),
        prev: index.checked_sub(1).map(|i| steps[i].clone()),
        next: steps.get(index + 1).cloned(),
        ambiguous,
    }
}

/// Like [`compute_navigation`], treating a missing tutorial as "no step".
pub fn compute_navigation_opt(tutorial: Option<&Tutorial>, current_location: &str) -> NavigationState {
    tutorial
        .map(|t| compute_navigation(t, current_location))
        .unwrap_or_default()
}

fn location_matches(location: &str, step_path: &str) -> bool {
    location == step_path || location.strip_suffix('/') == Some(step_path)
}

// ---------------------------------------------------------------------------
// NavigationTracker
// ---------------------------------------------------------------------------

/// Holds the current (tutorial, location) pair and publishes its
/// [`NavigationState`]. The tracker is the only writer; readers subscribe.
#[derive(Debug)]
pub struct NavigationTracker {
    tutorial: Option<Arc<Tutorial>>,
    location: String,
    tx: watch::Sender<Arc<NavigationState>>,
}

impl Default for NavigationTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationTracker {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Arc::new(NavigationState::none()));
        Self {
            tutorial: None,
            location: String::new(),
            tx,
        }
    }

    /// A receiver that always sees the latest snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Arc<NavigationState>> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> Arc<NavigationState> {
        Arc::clone(&self.tx.borrow())
    }

    pub fn tutorial(&self) -> Option<&Arc<Tutorial>> {
        self.tutorial.as_ref()
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// The location changed; recompute against the current tutorial.
    pub fn set_location(&mut self, location: impl Into<String>) -> Arc<NavigationState> {
        self.location = location.into();
        self.publish()
    }

    /// The tutorial changed; recompute against the current location.
    pub fn set_tutorial(&mut self, tutorial: Option<Arc<Tutorial>>) -> Arc<NavigationState> {
        self.tutorial = tutorial;
        self.publish()
    }

    /// Follow a router event.
    ///
    /// When the location belongs to a different tutorial than the current
    /// one, that tutorial is resolved through `cache` before anything is
    /// recomputed. A tutorial that does not exist degrades to the empty
    /// state. Content errors are returned after the empty state is published.
    pub fn follow_location<S>(
        &mut self,
        location: impl Into<String>,
        cache: &mut TutorialCache,
        source: &S,
    ) -> Result<Arc<NavigationState>>
    where
        S: ContentSource + ?Sized,
    {
        let location = location.into();

        let wanted = match classify(&location, cache.routes()) {
            LocationKind::Tutorial(id) => Some(id),
            _ => None,
        };

        let outcome = match wanted {
            Some(id) if self.current_id() != Some(&id) => {
                load_or_absent(cache, source, &id).map(|tutorial| self.tutorial = tutorial)
            }
            Some(_) => Ok(()),
            None => {
                self.tutorial = None;
                Ok(())
            }
        };

        self.location = location;
        if let Err(e) = outcome {
            self.tutorial = None;
            self.publish();
            return Err(e);
        }
        Ok(self.publish())
    }

    /// Re-resolve the current tutorial unless `cache` holds this exact value
    /// for the source's current revision.
    ///
    /// A tutorial handed in through [`set_tutorial`](Self::set_tutorial), or
    /// one the cache has never seen, is always re-resolved.
    pub fn reload<S>(&mut self, cache: &mut TutorialCache, source: &S) -> Result<Arc<NavigationState>>
    where
        S: ContentSource + ?Sized,
    {
        cache.sync_revision(source)?;

        let Some(current) = self.tutorial.clone() else {
            return Ok(self.current());
        };
        if cache
            .get(current.id())
            .is_some_and(|cached| Arc::ptr_eq(&cached, &current))
        {
            return Ok(self.current());
        }

        match load_or_absent(cache, source, current.id()) {
            Ok(tutorial) => self.tutorial = tutorial,
            Err(e) => {
                self.tutorial = None;
                self.publish();
                return Err(e);
            }
        }
        Ok(self.publish())
    }

    /// Target path of the "previous" pagination control.
    pub fn go_to_prev(&self) -> Option<String> {
        self.tx.borrow().prev.as_ref().map(|step| step.path.clone())
    }

    /// Target path of the "next" pagination control.
    pub fn go_to_next(&self) -> Option<String> {
        self.tx.borrow().next.as_ref().map(|step| step.path.clone())
    }

    fn current_id(&self) -> Option<&TutorialId> {
        self.tutorial.as_ref().map(|t| t.id())
    }

    fn publish(&self) -> Arc<NavigationState> {
        let state = Arc::new(compute_navigation_opt(self.tutorial.as_deref(), &self.location));
        debug!(
            location = %self.location,
            active = state.active_step.as_ref().map(|s| s.path.as_str()),
            "navigation state updated"
        );
        self.tx.send_replace(Arc::clone(&state));
        state
    }
}

fn load_or_absent<S>(
    cache: &mut TutorialCache,
    source: &S,
    id: &TutorialId,
) -> Result<Option<Arc<Tutorial>>>
where
    S: ContentSource + ?Sized,
{
    match cache.get_or_load(source, id) {
        Ok(tutorial) => Ok(Some(tutorial)),
        Err(DocStepsError::TutorialNotFound { .. }) => {
            debug!(tutorial = %id, "location names an unknown tutorial");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
