//! Chunk descriptors handed to the plugin by the host bundler

use indexmap::IndexMap;
use rolldown_common::Output;
use serde::{Deserialize, Serialize};

/// A named group of output files produced for one entry or split point.
///
/// `files` is `None` when the host supplied no file list for the chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkDescriptor {
    pub name: String,
    #[serde(default)]
    pub files: Option<Vec<String>>,
}

impl ChunkDescriptor {
    pub fn new<I, S>(name: impl Into<String>, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            files: Some(files.into_iter().map(Into::into).collect()),
        }
    }

    /// A chunk the host reported without any file list
    pub fn without_files(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            files: None,
        }
    }
}

/// Derive chunk descriptors from a rolldown bundle.
///
/// Each output chunk contributes its filename and sourcemap filename. Assets
/// are attached to every chunk named in `asset.names`, matching either the
/// chunk name itself or the chunk name with a `.css` suffix. Assets naming a
/// chunk that produced no JS (CSS-only entries) get a descriptor of their own.
pub fn chunks_from_bundle(bundle: &[Output]) -> Vec<ChunkDescriptor> {
    let mut files_by_chunk: IndexMap<String, Vec<String>> = IndexMap::new();

    for output in bundle {
        if let Output::Chunk(chunk) = output {
            let files = files_by_chunk.entry(chunk.name.to_string()).or_default();
            files.push(chunk.filename.to_string());
            if let Some(map) = &chunk.sourcemap_filename {
                files.push(map.clone());
            }
        }
    }

    for output in bundle {
        if let Output::Asset(asset) = output {
            for name in &asset.names {
                let chunk_name = name.strip_suffix(".css").unwrap_or(name);
                files_by_chunk
                    .entry(chunk_name.to_string())
                    .or_default()
                    .push(asset.filename.to_string());
            }
        }
    }

    files_by_chunk
        .into_iter()
        .map(|(name, files)| ChunkDescriptor {
            name,
            files: Some(files),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rolldown_common::{Modules, OutputAsset, OutputChunk};
    use std::sync::Arc;

    fn asset(names: &[&str], filename: &str) -> Output {
        Output::Asset(Arc::new(OutputAsset {
            names: names.iter().map(|n| n.to_string()).collect(),
            original_file_names: vec![],
            filename: filename.into(),
            source: String::new().into(),
        }))
    }

    fn js_chunk(name: &str, filename: &str, sourcemap: Option<&str>) -> Output {
        Output::Chunk(Arc::new(OutputChunk {
            name: name.into(),
            is_entry: true,
            is_dynamic_entry: false,
            facade_module_id: None,
            module_ids: vec![],
            exports: vec![],
            filename: filename.into(),
            modules: Modules {
                keys: vec![],
                values: vec![],
            },
            imports: vec![],
            dynamic_imports: vec![],
            code: String::new(),
            map: None,
            sourcemap_filename: sourcemap.map(str::to_string),
            preliminary_filename: filename.to_string(),
        }))
    }

    #[test]
    fn test_descriptor_constructors() {
        let chunk = ChunkDescriptor::new("app", ["app.css", "app.js"]);
        assert_eq!(chunk.files.as_deref().map(<[String]>::len), Some(2));
        assert!(ChunkDescriptor::without_files("app").files.is_none());
    }

    #[test]
    fn test_deserialize_without_files() {
        let chunk: ChunkDescriptor = serde_json::from_str(r#"{"name":"vendor"}"#).unwrap();
        assert_eq!(chunk, ChunkDescriptor::without_files("vendor"));
    }

    #[test]
    fn test_assets_grouped_by_name() {
        let bundle = vec![
            asset(&["app"], "app.a1b2.css"),
            asset(&["app.css"], "app.a1b2.css.map"),
            asset(&["admin"], "admin.99.css"),
            asset(&[], "index.html"),
        ];

        let chunks = chunks_from_bundle(&bundle);
        assert_eq!(
            chunks,
            vec![
                ChunkDescriptor::new("app", ["app.a1b2.css", "app.a1b2.css.map"]),
                ChunkDescriptor::new("admin", ["admin.99.css"]),
            ]
        );
    }

    #[test]
    fn test_css_merged_into_js_chunk() {
        // CSS assets come after the chunk that imported them
        let bundle = vec![
            asset(&["app.css"], "app-x.css"),
            js_chunk("app", "app-x.js", Some("app-x.js.map")),
            js_chunk("runtime", "runtime-y.js", None),
        ];

        let chunks = chunks_from_bundle(&bundle);
        assert_eq!(
            chunks,
            vec![
                ChunkDescriptor::new("app", ["app-x.js", "app-x.js.map", "app-x.css"]),
                ChunkDescriptor::new("runtime", ["runtime-y.js"]),
            ]
        );

        let hash = crate::hash::build_css_chunk_hash(&chunks, "/");
        assert_eq!(hash.len(), 1);
        assert_eq!(hash.get("app"), Some("/app-x.css"));
    }

    #[test]
    fn test_empty_bundle() {
        assert!(chunks_from_bundle(&[]).is_empty());
    }
}
