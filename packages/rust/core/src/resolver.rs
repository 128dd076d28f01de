//! Step resolver.
//!
//! Turns the step documents of one tutorial into [`Step`]s with a normalized
//! route, sorted by their declared position.

use std::collections::BTreeMap;

use tracing::{debug, instrument};

use docsteps_content::{ContentSource, RawDocument};
use docsteps_shared::{DocStepsError, Result, RouteConfig, Step, TutorialId};

/// Front-matter key holding the ordering key.
const POSITION_KEY: &str = "position";

/// Resolve the sorted steps of a tutorial.
///
/// A tutorial without documents resolves to an empty list. Two documents
/// declaring the same position fail with [`DocStepsError::DuplicatePosition`].
#[instrument(skip_all, fields(tutorial = %id))]
pub fn resolve_steps<S>(source: &S, id: &TutorialId, routes: &RouteConfig) -> Result<Vec<Step>>
where
    S: ContentSource + ?Sized,
{
    let documents = source.list_documents(id)?;

    let mut steps = documents
        .into_iter()
        .map(|doc| parse_step(id, doc, routes))
        .collect::<Result<Vec<_>>>()?;

    steps.sort_by_key(|step| step.position);
    ensure_unique_positions(id, &steps)?;

    debug!(steps = steps.len(), "resolved tutorial steps");
    Ok(steps)
}

/// Fail if two steps share a position, naming every conflicting path.
pub fn ensure_unique_positions(id: &TutorialId, steps: &[Step]) -> Result<()> {
    let mut by_position: BTreeMap<u32, Vec<&str>> = BTreeMap::new();
    for step in steps {
        by_position
            .entry(step.position)
            .or_default()
            .push(step.path.as_str());
    }

    match by_position.into_iter().find(|(_, paths)| paths.len() > 1) {
        Some((position, paths)) => Err(DocStepsError::DuplicatePosition {
            tutorial_id: id.clone(),
            position,
            paths: paths.into_iter().map(String::from).collect(),
        }),
        None => Ok(()),
    }
}

/// Route of a step document.
///
/// `index.md` maps to the tutorial root, `setup.md` to `<root>/setup`,
/// `advanced/tuning.mdx` to `<root>/advanced/tuning`.
pub fn step_path(id: &TutorialId, relative_key: &str, routes: &RouteConfig) -> String {
    let root = routes.tutorial_root(id.as_str());

    let without_ext = match relative_key.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !stem.ends_with('/') && !ext.contains('/') => {
            stem
        }
        _ => relative_key,
    };

    let mut segments: Vec<&str> = without_ext.split('/').filter(|s| !s.is_empty()).collect();
    if segments.last().is_some_and(|last| *last == routes.index_stem) {
        segments.pop();
    }

    if segments.is_empty() {
        root
    } else {
        format!("{root}/{}", segments.join("/"))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_step(id: &TutorialId, doc: RawDocument, routes: &RouteConfig) -> Result<Step> {
    let path = step_path(id, doc.relative_key(), routes);
    let RawDocument {
        key,
        mut front_matter,
    } = doc;

    let position = match front_matter.remove(POSITION_KEY) {
        Some(value) => parse_position(&key, &value)?,
        None => {
            return Err(DocStepsError::validation(
                POSITION_KEY,
                format!("{key}: missing required front matter key"),
            ));
        }
    };

    Ok(Step {
        position,
        path,
        source: key,
        front_matter,
    })
}

fn parse_position(key: &str, value: &serde_json::Value) -> Result<u32> {
    value
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| {
            DocStepsError::validation(
                POSITION_KEY,
                format!("{key}: expected a non-negative integer, got {value}"),
            )
        })
}
