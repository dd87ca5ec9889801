//! Chunk name to CSS URL mapping

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chunk::ChunkDescriptor;

/// Mapping from chunk name to the public URL of its CSS file.
///
/// Entries keep chunk order so the serialized JSON follows the order the
/// host reported chunks in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CssChunkHash(IndexMap<String, String>);

impl CssChunkHash {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, chunk: &str) -> Option<&str> {
        self.0.get(chunk).map(String::as_str)
    }

    pub fn insert(&mut self, chunk: impl Into<String>, url: impl Into<String>) {
        self.0.insert(chunk.into(), url.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CssChunkHash {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// The first file that is a stylesheet and not its sourcemap
fn find_css_file(files: &[String]) -> Option<&str> {
    files
        .iter()
        .map(String::as_str)
        .find(|file| file.contains(".css") && !file.contains(".css.map"))
}

/// Build the chunk name to CSS URL map for one build.
///
/// Chunks without a CSS file, or without a file list at all, are left out.
pub fn build_css_chunk_hash(chunks: &[ChunkDescriptor], public_path: &str) -> CssChunkHash {
    let mut hash = CssChunkHash::new();

    for chunk in chunks {
        let Some(files) = chunk.files.as_deref() else {
            debug!(chunk = %chunk.name, "chunk has no file list, skipping");
            continue;
        };

        match find_css_file(files) {
            Some(css) => hash.insert(chunk.name.as_str(), format!("{public_path}{css}")),
            None => debug!(chunk = %chunk.name, "chunk has no CSS file, skipping"),
        }
    }

    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_entry_per_css_chunk() {
        let chunks = vec![
            ChunkDescriptor::new("app", ["app.css"]),
            ChunkDescriptor::new("admin", ["admin.js", "admin.css"]),
        ];

        let hash = build_css_chunk_hash(&chunks, "/pub/");
        assert_eq!(hash.len(), 2);
        assert_eq!(hash.get("app"), Some("/pub/app.css"));
        assert_eq!(hash.get("admin"), Some("/pub/admin.css"));
    }

    #[test]
    fn test_sourcemap_only_chunk_skipped() {
        let chunks = vec![ChunkDescriptor::new("app", ["app.css.map"])];
        assert!(build_css_chunk_hash(&chunks, "/").is_empty());
    }

    #[test]
    fn test_missing_file_list_skipped() {
        let chunks = vec![
            ChunkDescriptor::without_files("vendor"),
            ChunkDescriptor::new("app", ["app.css"]),
        ];

        let hash = build_css_chunk_hash(&chunks, "");
        assert_eq!(hash.len(), 1);
        assert_eq!(hash.get("vendor"), None);
        assert_eq!(hash.get("app"), Some("app.css"));
    }

    #[test]
    fn test_first_css_file_wins() {
        let chunks = vec![ChunkDescriptor::new(
            "app",
            ["app.1.css.map", "app.1.css", "app.2.css"],
        )];
        let hash = build_css_chunk_hash(&chunks, "/static/");
        assert_eq!(hash.get("app"), Some("/static/app.1.css"));
    }

    #[test]
    fn test_js_only_chunk_skipped() {
        let chunks = vec![ChunkDescriptor::new("runtime", ["runtime.js", "runtime.js.map"])];
        assert!(build_css_chunk_hash(&chunks, "/").is_empty());
    }

    #[test]
    fn test_serializes_in_chunk_order() {
        let chunks = vec![
            ChunkDescriptor::new("zeta", ["zeta.css"]),
            ChunkDescriptor::new("alpha", ["alpha.css"]),
        ];
        let hash = build_css_chunk_hash(&chunks, "/");
        assert_eq!(
            serde_json::to_string(&hash).unwrap(),
            r#"{"zeta":"/zeta.css","alpha":"/alpha.css"}"#
        );
    }

    #[test]
    fn test_duplicate_chunk_name_keeps_later_file() {
        let chunks = vec![
            ChunkDescriptor::new("app", ["a.css"]),
            ChunkDescriptor::new("app", ["b.css"]),
        ];
        let hash = build_css_chunk_hash(&chunks, "/");
        assert_eq!(hash.len(), 1);
        assert_eq!(hash.get("app"), Some("/b.css"));
    }
}
