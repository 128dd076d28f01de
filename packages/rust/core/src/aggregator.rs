//! Tutorial aggregator.
//!
//! The single checkpoint that turns raw metadata plus resolved steps into a
//! [`Tutorial`]. Nothing else in the workspace can construct one.

use tracing::{debug, info, instrument};

use docsteps_content::ContentSource;
use docsteps_shared::{DocStepsError, Meta, Result, RouteConfig, Topic, TutorialId};

use crate::resolver::{ensure_unique_positions, resolve_steps};
use crate::tutorial::Tutorial;

/// A `meta.json` object before validation, with the id injected by the loader.
#[derive(Debug, Clone)]
pub struct RawMeta {
    pub id: TutorialId,
    pub body: serde_json::Value,
}

/// Validate a raw meta object against the [`Meta`] shape.
///
/// Any `id` key in the body is ignored; the id always comes from the
/// content source grouping key.
pub fn validate_meta(raw: &RawMeta) -> Result<Meta> {
    let obj = raw.body.as_object().ok_or_else(|| {
        DocStepsError::validation("meta", format!("{}: expected a JSON object", raw.id))
    })?;

    if obj.get("id").and_then(|v| v.as_str()).is_some_and(|id| id != raw.id.as_str()) {
        debug!(tutorial = %raw.id, "ignoring `id` declared in meta document");
    }

    let title = required_string(obj, "title")?;
    let label: Topic = required_string(obj, "label")?.parse()?;
    let description = required_string(obj, "description")?;

    Ok(Meta {
        id: raw.id.clone(),
        title,
        label,
        description,
    })
}

/// Build a validated tutorial from its raw metadata.
#[instrument(skip_all, fields(tutorial = %raw.id))]
pub fn build_tutorial<S>(source: &S, raw: RawMeta, routes: &RouteConfig) -> Result<Tutorial>
where
    S: ContentSource + ?Sized,
{
    let meta = validate_meta(&raw)?;
    let steps = resolve_steps(source, &meta.id, routes)?;
    ensure_unique_positions(&meta.id, &steps)?;

    debug!(title = %meta.title, steps = steps.len(), "tutorial built");
    Ok(Tutorial::new(meta, steps))
}

/// Fetch the meta document of `id` and build its tutorial.
pub fn load_tutorial<S>(source: &S, id: &TutorialId, routes: &RouteConfig) -> Result<Tutorial>
where
    S: ContentSource + ?Sized,
{
    let body = source
        .get_meta_document(id)?
        .ok_or_else(|| DocStepsError::TutorialNotFound {
            tutorial_id: id.clone(),
        })?;

    build_tutorial(
        source,
        RawMeta {
            id: id.clone(),
            body,
        },
        routes,
    )
}

/// Build every tutorial the source lists, ordered by id.
///
/// Stops at the first invalid tutorial.
#[instrument(skip_all)]
pub fn load_all<S>(source: &S, routes: &RouteConfig) -> Result<Vec<Tutorial>>
where
    S: ContentSource + ?Sized,
{
    let tutorials = source
        .list_tutorial_ids()?
        .iter()
        .map(|id| load_tutorial(source, id, routes))
        .collect::<Result<Vec<_>>>()?;

    info!(count = tutorials.len(), "loaded tutorials");
    Ok(tutorials)
}

fn required_string(
    obj: &serde_json::Map<String, serde_json::Value>,
    field: &str,
) -> Result<String> {
    match obj.get(field) {
        Some(serde_json::Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(DocStepsError::validation(
            field,
            format!("expected a string, got {other}"),
        )),
        None => Err(DocStepsError::validation(field, "required field is missing")),
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use serde_json::json;

    use docsteps_content::{FsContentSource, MemoryContentSource};
    use docsteps_shared::ContentConfig;

    use super::*;

    fn meta_body() -> serde_json::Value {
        json!({
            "title": "Introduction",
            "label": "Getting Started",
            "description": "Your first tutorial"
        })
    }

    fn intro() -> MemoryContentSource {
        MemoryContentSource::new()
            .with_meta("intro", meta_body())
            .with_document("intro", "index.md", json!({"position": 0}))
            .with_document("intro", "setup.md", json!({"position": 1}))
            .with_document("intro", "finish.md", json!({"position": 2}))
    }

    #[test]
    fn builds_a_tutorial() {
        let tutorial = load_tutorial(&intro(), &"intro".into(), &RouteConfig::default()).unwrap();
        assert_eq!(tutorial.id().as_str(), "intro");
        assert_eq!(tutorial.meta().label, Topic::GettingStarted);
        assert_eq!(tutorial.steps().len(), 3);
        assert_eq!(tutorial.first_step().unwrap().path, "/tutorials/intro");
    }

    #[test]
    fn missing_label_is_reported() {
        let raw = RawMeta {
            id: "intro".into(),
            body: json!({"title": "Intro", "description": "d"}),
        };
        let err = validate_meta(&raw).unwrap_err();
        assert_eq!(err.field(), Some("label"));
    }

    #[test]
    fn unknown_label_is_reported() {
        let raw = RawMeta {
            id: "intro".into(),
            body: json!({"title": "Intro", "label": "Cooking", "description": "d"}),
        };
        let err = validate_meta(&raw).unwrap_err();
        assert_eq!(err.field(), Some("label"));
        assert!(err.to_string().contains("Cooking"));
    }

    #[test]
    fn mistyped_fields_are_reported() {
        let raw = RawMeta {
            id: "intro".into(),
            body: json!({"title": 42, "label": "Concepts", "description": "d"}),
        };
        assert_eq!(validate_meta(&raw).unwrap_err().field(), Some("title"));

        let raw = RawMeta {
            id: "intro".into(),
            body: json!(["not", "an", "object"]),
        };
        assert_eq!(validate_meta(&raw).unwrap_err().field(), Some("meta"));
    }

    #[test]
    fn body_id_cannot_spoof_the_tutorial_id() {
        let mut body = meta_body();
        body["id"] = json!("someone-else");
        let meta = validate_meta(&RawMeta {
            id: "intro".into(),
            body,
        })
        .unwrap();
        assert_eq!(meta.id.as_str(), "intro");
    }

    #[test]
    fn unknown_tutorial_is_not_found() {
        let err = load_tutorial(&intro(), &"ghost".into(), &RouteConfig::default()).unwrap_err();
        assert!(matches!(err, DocStepsError::TutorialNotFound { .. }));
    }

    #[test]
    fn tutorial_without_steps_builds() {
        let source = MemoryContentSource::new().with_meta("empty", meta_body());
        let tutorial = load_tutorial(&source, &"empty".into(), &RouteConfig::default()).unwrap();
        assert!(tutorial.is_empty());
        assert!(tutorial.first_step().is_none());
    }

    #[test]
    fn duplicate_positions_block_the_build() {
        let source = intro().with_document("intro", "extra.md", json!({"position": 2}));
        let err = load_tutorial(&source, &"intro".into(), &RouteConfig::default()).unwrap_err();
        assert!(matches!(err, DocStepsError::DuplicatePosition { position: 2, .. }));
    }

    #[test]
    fn load_all_orders_by_id() {
        let source = intro()
            .with_meta("advanced", meta_body())
            .with_document("advanced", "index.md", json!({"position": 0}));

        let tutorials = load_all(&source, &RouteConfig::default()).unwrap();
        let ids: Vec<&str> = tutorials.iter().map(|t| t.id().as_str()).collect();
        assert_eq!(ids, vec!["advanced", "intro"]);
    }

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "docsteps-aggregator-test-{}",
            uuid::Uuid::now_v7()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn builds_from_a_content_directory() {
        let tmp = temp_dir();
        write(
            &tmp,
            "intro/meta.json",
            r#"{"id": "spoofed", "title": "Intro", "label": "Concepts", "description": "d"}"#,
        );
        write(&tmp, "intro/index.md", "---\nposition: 0\n---\n# Intro\n");
        write(&tmp, "intro/setup.md", "---\nposition: 1\ntitle: Setup\n---\n");
        write(&tmp, "intro/finish.mdx", "---\nposition: 2\n---\n");

        let source = FsContentSource::new(&tmp, &ContentConfig::default());
        let tutorials = load_all(&source, &RouteConfig::default()).unwrap();

        assert_eq!(tutorials.len(), 1);
        let tutorial = &tutorials[0];
        assert_eq!(tutorial.id().as_str(), "intro");
        let paths: Vec<&str> = tutorial.steps().iter().map(|s| s.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["/tutorials/intro", "/tutorials/intro/setup", "/tutorials/intro/finish"]
        );

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn fixture_tutorials_validate() {
        let source = FsContentSource::new("../../../fixtures/tutorials", &ContentConfig::default());
        let tutorials = load_all(&source, &RouteConfig::default()).expect("fixtures are valid");

        let ids: Vec<&str> = tutorials.iter().map(|t| t.id().as_str()).collect();
        assert_eq!(ids, vec!["intro", "monitoring"]);

        let monitoring = &tutorials[1];
        assert_eq!(monitoring.meta().label, Topic::Operations);
        assert_eq!(
            monitoring.first_step().map(|s| s.path.as_str()),
            Some("/tutorials/monitoring/metrics")
        );
        assert_eq!(tutorials[0].steps()[1].front_matter["sidebar_label"], "Install");
    }
}
