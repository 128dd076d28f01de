//! Content sources for tutorial metadata and step documents.
//!
//! The resolver never scans directories itself. It talks to a
//! [`ContentSource`], which lists tutorials, hands out each tutorial's step
//! documents with their parsed front matter, and returns the raw `meta.json`
//! object. Two implementations ship here:
//! - [`FsContentSource`]: one directory per tutorial under a content root
//! - [`MemoryContentSource`]: bundled or test content held in memory

mod frontmatter;
mod fs;
mod memory;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use docsteps_shared::{Result, TutorialId};

pub use frontmatter::split_front_matter;
pub use fs::FsContentSource;
pub use memory::MemoryContentSource;

/// One step document as the content source sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    /// Source key, `<tutorial>/<relative file path>` with `/` separators.
    pub key: String,
    /// Parsed front matter (empty when the document has none).
    pub front_matter: serde_json::Map<String, serde_json::Value>,
}

impl RawDocument {
    /// The key relative to its tutorial directory (`setup.md` for `intro/setup.md`).
    pub fn relative_key(&self) -> &str {
        self.key
            .split_once('/')
            .map(|(_, rest)| rest)
            .unwrap_or(&self.key)
    }
}

/// Read access to a snapshot of tutorial content.
pub trait ContentSource {
    /// All tutorials that carry a metadata document.
    fn list_tutorial_ids(&self) -> Result<BTreeSet<TutorialId>>;

    /// Step documents of one tutorial. Unknown tutorials yield an empty list.
    fn list_documents(&self, id: &TutorialId) -> Result<Vec<RawDocument>>;

    /// The raw metadata object of one tutorial, if it exists.
    fn get_meta_document(&self, id: &TutorialId) -> Result<Option<serde_json::Value>>;

    /// Fingerprint of the current content; changes whenever any document changes.
    fn revision(&self) -> Result<String>;
}

/// Whether an id can safely name a single directory under the content root.
pub(crate) fn is_valid_tutorial_id(id: &str) -> bool {
    !id.is_empty()
        && id != "."
        && id != ".."
        && !id.contains(['/', '\\'])
}
