//! In-memory content source for bundled manifests and tests.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use sha2::{Digest, Sha256};

use docsteps_shared::{DocStepsError, Result, TutorialId};

use crate::frontmatter::split_front_matter;
use crate::{ContentSource, RawDocument};

#[derive(Debug, Clone, Default, Serialize)]
struct MemoryTutorial {
    meta: Option<serde_json::Value>,
    documents: Vec<RawDocument>,
}

/// Content held entirely in memory, keyed by tutorial id.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MemoryContentSource {
    tutorials: BTreeMap<TutorialId, MemoryTutorial>,
}

impl MemoryContentSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the raw `meta.json` object of a tutorial.
    pub fn with_meta(mut self, id: &str, meta: serde_json::Value) -> Self {
        self.tutorials.entry(id.into()).or_default().meta = Some(meta);
        self
    }

    /// Add a step document from already-parsed front matter.
    ///
    /// Non-object front matter is stored as an empty map.
    pub fn with_document(mut self, id: &str, file: &str, front_matter: serde_json::Value) -> Self {
        let front_matter = match front_matter {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        self.push_document(id, file, front_matter);
        self
    }

    /// Add a step document from Markdown text with a YAML front matter block.
    pub fn with_markdown(mut self, id: &str, file: &str, markdown: &str) -> Result<Self> {
        let (front_matter, _body) = split_front_matter(markdown).map_err(|e| match e {
            DocStepsError::Parse { message } => DocStepsError::parse(format!("{id}/{file}: {message}")),
            other => other,
        })?;
        self.push_document(id, file, front_matter);
        Ok(self)
    }

    /// Drop a tutorial and all of its documents.
    pub fn remove_tutorial(&mut self, id: &TutorialId) {
        self.tutorials.remove(id);
    }

    fn push_document(
        &mut self,
        id: &str,
        file: &str,
        front_matter: serde_json::Map<String, serde_json::Value>,
    ) {
        let key = format!("{id}/{}", file.trim_start_matches('/'));
        let documents = &mut self.tutorials.entry(id.into()).or_default().documents;
        documents.retain(|doc| doc.key != key);
        documents.push(RawDocument { key, front_matter });
    }
}

impl ContentSource for MemoryContentSource {
    fn list_tutorial_ids(&self) -> Result<BTreeSet<TutorialId>> {
        Ok(self
            .tutorials
            .iter()
            .filter(|(_, tutorial)| tutorial.meta.is_some())
            .map(|(id, _)| id.clone())
            .collect())
    }

    fn list_documents(&self, id: &TutorialId) -> Result<Vec<RawDocument>> {
        Ok(self
            .tutorials
            .get(id)
            .map(|tutorial| tutorial.documents.clone())
            .unwrap_or_default())
    }

    fn get_meta_document(&self, id: &TutorialId) -> Result<Option<serde_json::Value>> {
        Ok(self.tutorials.get(id).and_then(|tutorial| tutorial.meta.clone()))
    }

    fn revision(&self) -> Result<String> {
        let bytes = serde_json::to_vec(&self.tutorials)
            .map_err(|e| DocStepsError::parse(format!("cannot fingerprint content: {e}")))?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        Ok(format!("{:x}", hasher.finalize()))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn tutorials_without_meta_are_not_listed() {
        let source = MemoryContentSource::new()
            .with_meta("intro", json!({"title": "Intro"}))
            .with_document("orphan", "index.md", json!({"position": 0}));

        let ids = source.list_tutorial_ids().unwrap();
        assert_eq!(ids.len(), 1);
        assert!(ids.contains(&TutorialId::from("intro")));
        assert_eq!(source.list_documents(&"orphan".into()).unwrap().len(), 1);
    }

    #[test]
    fn markdown_documents_are_parsed() {
        let source = MemoryContentSource::new()
            .with_markdown("intro", "setup.md", "---\nposition: 1\n---\nBody")
            .unwrap();

        let docs = source.list_documents(&"intro".into()).unwrap();
        assert_eq!(docs[0].key, "intro/setup.md");
        assert_eq!(docs[0].front_matter["position"], 1);
    }

    #[test]
    fn re_adding_a_document_replaces_it() {
        let source = MemoryContentSource::new()
            .with_document("intro", "setup.md", json!({"position": 1}))
            .with_document("intro", "setup.md", json!({"position": 4}));

        let docs = source.list_documents(&"intro".into()).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].front_matter["position"], 4);
    }

    #[test]
    fn revision_changes_with_content() {
        let mut source = MemoryContentSource::new()
            .with_meta("intro", json!({"title": "Intro"}))
            .with_meta("other", json!({"title": "Other"}));
        let before = source.revision().unwrap();

        source.remove_tutorial(&"other".into());
        assert_ne!(before, source.revision().unwrap());
    }
}
