//! Filesystem content source.
//!
//! Layout:
//! ```text
//! <root>/
//! ├── intro/
//! │   ├── meta.json
//! │   ├── index.md
//! │   ├── setup.md
//! │   └── advanced/
//! │       └── tuning.mdx
//! └── README.md        (ignored: not inside a tutorial)
//! ```

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{debug, instrument, trace};

use docsteps_shared::{ContentConfig, DocStepsError, Result, TutorialId};

use crate::frontmatter::split_front_matter;
use crate::{ContentSource, RawDocument, is_valid_tutorial_id};

/// Reads tutorials from a content directory on each call.
#[derive(Debug, Clone)]
pub struct FsContentSource {
    root: PathBuf,
    meta_file: String,
    extensions: Vec<String>,
}

impl FsContentSource {
    pub fn new(root: impl Into<PathBuf>, config: &ContentConfig) -> Self {
        Self {
            root: root.into(),
            meta_file: config.meta_file.clone(),
            extensions: config
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn tutorial_dir(&self, id: &TutorialId) -> Option<PathBuf> {
        is_valid_tutorial_id(id.as_str()).then(|| self.root.join(id.as_str()))
    }

    fn is_step_document(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }
}

impl ContentSource for FsContentSource {
    #[instrument(skip_all, fields(root = %self.root.display()))]
    fn list_tutorial_ids(&self) -> Result<BTreeSet<TutorialId>> {
        let mut ids = BTreeSet::new();

        for entry in read_dir_sorted(&self.root)? {
            if !entry.is_dir() || !entry.join(&self.meta_file).is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().and_then(|n| n.to_str()) {
                ids.insert(TutorialId::from(name));
            }
        }

        debug!(count = ids.len(), "listed tutorials");
        Ok(ids)
    }

    #[instrument(skip_all, fields(tutorial = %id))]
    fn list_documents(&self, id: &TutorialId) -> Result<Vec<RawDocument>> {
        let Some(dir) = self.tutorial_dir(id) else {
            return Ok(Vec::new());
        };
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        collect_files(&dir, &mut files)?;

        let mut documents = Vec::new();
        for path in files.into_iter().filter(|p| self.is_step_document(p)) {
            let key = source_key(&self.root, &path);
            let content =
                std::fs::read_to_string(&path).map_err(|e| DocStepsError::io(&path, e))?;
            let (front_matter, _body) = split_front_matter(&content).map_err(|e| match e {
                DocStepsError::Parse { message } => {
                    DocStepsError::parse(format!("{key}: {message}"))
                }
                other => other,
            })?;
            trace!(%key, keys = front_matter.len(), "read step document");
            documents.push(RawDocument { key, front_matter });
        }

        debug!(count = documents.len(), "listed step documents");
        Ok(documents)
    }

    fn get_meta_document(&self, id: &TutorialId) -> Result<Option<serde_json::Value>> {
        let Some(dir) = self.tutorial_dir(id) else {
            return Ok(None);
        };
        let path = dir.join(&self.meta_file);
        if !path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path).map_err(|e| DocStepsError::io(&path, e))?;
        let value = serde_json::from_str(&content).map_err(|e| {
            DocStepsError::parse(format!("invalid JSON in {}: {e}", path.display()))
        })?;
        Ok(Some(value))
    }

    fn revision(&self) -> Result<String> {
        let mut files = Vec::new();
        if self.root.is_dir() {
            collect_files(&self.root, &mut files)?;
        }

        let mut hasher = Sha256::new();
        for path in &files {
            let bytes = std::fs::read(path).map_err(|e| DocStepsError::io(path, e))?;
            hasher.update(source_key(&self.root, path).as_bytes());
            hasher.update([0u8]);
            hasher.update(&bytes);
            hasher.update([0u8]);
        }
        Ok(format!("{:x}", hasher.finalize()))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Directory entries sorted by path, so listings are deterministic.
fn read_dir_sorted(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(DocStepsError::config(format!(
            "content root {} is not a directory",
            dir.display()
        )));
    }

    let mut entries = std::fs::read_dir(dir)
        .map_err(|e| DocStepsError::io(dir, e))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|e| DocStepsError::io(dir, e))?;
    entries.sort();
    Ok(entries)
}

/// Recursively collect regular files below `dir`, sorted.
///
/// Symlinked directories are not descended into, so a link back to an
/// ancestor cannot repeat documents.
fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for path in read_dir_sorted(dir)? {
        let file_type = std::fs::symlink_metadata(&path)
            .map_err(|e| DocStepsError::io(&path, e))?
            .file_type();
        if file_type.is_symlink() && path.is_dir() {
            trace!(path = %path.display(), "skipping symlinked directory");
            continue;
        }
        if path.is_dir() {
            collect_files(&path, out)?;
        } else if path.is_file() {
            out.push(path);
        }
    }
    Ok(())
}

/// `/` separated key of `path` relative to the content root.
fn source_key(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "docsteps-fs-source-test-{}",
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

    fn seed(root: &Path) {
        write(
            root,
            "intro/meta.json",
            r#"{"title": "Intro", "label": "Getting Started", "description": "First steps"}"#,
        );
        write(root, "intro/index.md", "---\nposition: 0\n---\n# Welcome\n");
        write(root, "intro/setup.md", "---\nposition: 1\ntitle: Setup\n---\nInstall things.\n");
        write(root, "intro/advanced/tuning.mdx", "---\nposition: 2\n---\n");
        write(root, "intro/diagram.png", "not a step");
        write(root, "drafts/notes.md", "---\nposition: 0\n---\n");
        write(root, "README.md", "root level, ignored");
    }

    fn source(root: &Path) -> FsContentSource {
        FsContentSource::new(root, &ContentConfig::default())
    }

    #[test]
    fn lists_only_directories_with_meta() {
        let tmp = temp_dir();
        seed(&tmp);

        let ids = source(&tmp).list_tutorial_ids().unwrap();
        assert_eq!(ids.into_iter().collect::<Vec<_>>(), vec![TutorialId::from("intro")]);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn lists_step_documents_with_front_matter() {
        let tmp = temp_dir();
        seed(&tmp);

        let docs = source(&tmp).list_documents(&"intro".into()).unwrap();
        let keys: Vec<&str> = docs.iter().map(|d| d.key.as_str()).collect();
        assert_eq!(
            keys,
            vec!["intro/advanced/tuning.mdx", "intro/index.md", "intro/setup.md"]
        );
        assert_eq!(docs[2].front_matter["title"], "Setup");

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn unknown_tutorial_has_no_documents() {
        let tmp = temp_dir();
        seed(&tmp);

        let src = source(&tmp);
        assert!(src.list_documents(&"missing".into()).unwrap().is_empty());
        assert!(src.list_documents(&"..".into()).unwrap().is_empty());
        assert!(src.get_meta_document(&"missing".into()).unwrap().is_none());
        assert!(src.get_meta_document(&"../intro".into()).unwrap().is_none());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn reads_meta_document() {
        let tmp = temp_dir();
        seed(&tmp);

        let meta = source(&tmp)
            .get_meta_document(&"intro".into())
            .unwrap()
            .expect("meta present");
        assert_eq!(meta["title"], "Intro");

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn invalid_meta_json_is_a_parse_error() {
        let tmp = temp_dir();
        write(&tmp, "broken/meta.json", "{ not json");

        let err = source(&tmp).get_meta_document(&"broken".into()).unwrap_err();
        assert!(matches!(err, DocStepsError::Parse { .. }));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn malformed_front_matter_names_the_document() {
        let tmp = temp_dir();
        write(&tmp, "intro/meta.json", "{}");
        write(&tmp, "intro/bad.md", "---\nposition: [\n---\n");

        let err = source(&tmp).list_documents(&"intro".into()).unwrap_err();
        assert!(err.to_string().contains("intro/bad.md"));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn revision_tracks_content_changes() {
        let tmp = temp_dir();
        seed(&tmp);

        let src = source(&tmp);
        let before = src.revision().unwrap();
        assert_eq!(before, src.revision().unwrap());

        write(&tmp, "intro/setup.md", "---\nposition: 5\n---\n");
        assert_ne!(before, src.revision().unwrap());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directories_are_not_followed() {
        let tmp = temp_dir();
        write(
            &tmp,
            "intro/meta.json",
            r#"{"title": "Intro", "label": "Concepts", "description": "d"}"#,
        );
        write(&tmp, "intro/index.md", "---\nposition: 0\n---\n");
        std::os::unix::fs::symlink(tmp.join("intro"), tmp.join("intro/loop")).unwrap();

        let src = source(&tmp);
        let docs = src.list_documents(&"intro".into()).unwrap();
        let keys: Vec<&str> = docs.iter().map(|d| d.key.as_str()).collect();
        assert_eq!(keys, vec!["intro/index.md"]);

        let before = src.revision().unwrap();
        std::fs::remove_file(tmp.join("intro/loop")).unwrap();
        assert_eq!(before, src.revision().unwrap());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn missing_root_is_a_config_error() {
        let tmp = temp_dir().join("does-not-exist");
        let err = source(&tmp).list_tutorial_ids().unwrap_err();
        assert!(matches!(err, DocStepsError::Config { .. }));
    }
}
