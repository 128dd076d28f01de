//! Router location helpers.

use docsteps_shared::{RouteConfig, TutorialId};

/// What kind of page a location points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationKind {
    /// The tutorial list itself (`/tutorials`).
    TutorialHome,
    /// A page inside one tutorial (`/tutorials/<id>/...`).
    Tutorial(TutorialId),
    /// Regular documentation (`/docs/...`).
    Docs,
    Unknown,
}

/// Strip any query string or fragment from a location.
pub fn path_only(location: &str) -> &str {
    let end = location.find(['?', '#']).unwrap_or(location.len());
    &location[..end]
}

pub fn classify(location: &str, routes: &RouteConfig) -> LocationKind {
    let segments = segments(path_only(location));

    if !routes.docs_prefix.is_empty() && strip_segments(&segments, &routes.docs_prefix).is_some() {
        return LocationKind::Docs;
    }

    match strip_segments(&segments, &routes.prefix) {
        Some([]) => LocationKind::TutorialHome,
        Some([id, ..]) => LocationKind::Tutorial(TutorialId::from(*id)),
        None => LocationKind::Unknown,
    }
}

/// The tutorial a location belongs to, if any.
pub fn tutorial_id_from_location(location: &str, routes: &RouteConfig) -> Option<TutorialId> {
    match classify(location, routes) {
        LocationKind::Tutorial(id) => Some(id),
        _ => None,
    }
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// The remaining segments when `path` starts with all segments of `prefix`.
fn strip_segments<'a, 'b>(path: &'b [&'a str], prefix: &str) -> Option<&'b [&'a str]> {
    let prefix = segments(prefix);
    if path.len() >= prefix.len() && path[..prefix.len()] == prefix[..] {
        Some(&path[prefix.len()..])
    } else {
        None
    }
}
