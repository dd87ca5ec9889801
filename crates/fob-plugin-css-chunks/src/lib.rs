//! Rolldown plugin that maps chunk names to their CSS files on the page
//!
//! After a build's chunks are known, the plugin derives a map from chunk
//! name to the public URL of that chunk's CSS file and injects it into the
//! generated HTML as an inline script:
//!
//! ```html
//! <script type="text/javascript">window.__CSS_CHUNKS__ = {"app":"/static/app.a1b2.css"}</script>
//! ```
//!
//! Client code in code-split applications reads `window.__CSS_CHUNKS__` to
//! load a chunk's stylesheet on demand.
//!
//! ## Architecture
//!
//! ```text
//! rolldown bundle → chunks_from_bundle() → Compilation (per .html asset)
//!                                              ↓
//!        before HTML generation: build_css_chunk_hash() → ComputedBuild
//!        alter asset tags:       build_script_tag()     → head or body
//!                                              ↓
//!                              TagGroups::inject_into(html)
//! ```
//!
//! [`CssChunksHtmlPlugin`] is the host-facing half and binds to either
//! hook API the [`host`] pipeline exposes. [`CssChunksPlugin`] wires it
//! into rolldown's `generate_bundle` hook.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use fob_plugin_css_chunks::{CssChunksOptions, CssChunksPlugin, InjectPoint};
//! use std::sync::Arc;
//!
//! let options = CssChunksOptions::new()
//!     .with_inject(InjectPoint::Body)
//!     .with_public_path("/static/");
//! let plugin = Arc::new(CssChunksPlugin::with_options(options));
//! ```

use std::borrow::Cow;
use std::sync::Arc;

use anyhow::Context;
use rolldown_common::{Output, OutputAsset, StrOrBytes};
use rolldown_plugin::{HookGenerateBundleArgs, HookNoopReturn, HookUsage, Plugin, PluginContext};
use tracing::{debug, warn};

mod chunk;
mod config;
mod error;
mod hash;
pub mod host;
mod html_plugin;
#[cfg(feature = "logging")]
pub mod logging;
mod state;
mod tag;

pub use chunk::{ChunkDescriptor, chunks_from_bundle};
pub use config::{CssChunksOptions, InjectPoint};
pub use error::{CssChunksError, Result};
pub use hash::{CssChunkHash, build_css_chunk_hash};
pub use html_plugin::{CssChunksHtmlPlugin, PLUGIN_NAME};
pub use state::{ComputedBuild, InjectedBuild, PendingBuild};
pub use tag::{CSS_CHUNKS_GLOBAL, HtmlTag, build_script_tag};

use host::{Compilation, HostApi, TagGroups};

/// Rolldown plugin that injects the CSS chunk map into emitted HTML pages
///
/// Runs in `generate_bundle`: every `.html` asset in the bundle goes through
/// one host compilation and has its source replaced with the injected page.
#[derive(Debug, Clone, Default)]
pub struct CssChunksPlugin {
    options: CssChunksOptions,
}

impl CssChunksPlugin {
    /// Create a plugin with default options (inject into head, public path `/`)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: CssChunksOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CssChunksOptions {
        &self.options
    }

    /// Inject the chunk map into every HTML asset of `bundle`.
    ///
    /// Returns the number of pages processed. Assets whose bytes are not
    /// UTF-8 are left alone.
    pub fn inject_into_bundle(&self, bundle: &mut [Output]) -> Result<usize> {
        let chunks = chunks_from_bundle(bundle);
        let html_plugin = CssChunksHtmlPlugin::for_host(HostApi::Static, self.options.clone());
        let mut pages = 0;

        for output in bundle.iter_mut() {
            let Output::Asset(asset) = output else {
                continue;
            };
            if !asset.filename.ends_with(".html") {
                continue;
            }

            let html = match &asset.source {
                StrOrBytes::Str(source) => source.as_str(),
                StrOrBytes::Bytes(bytes) => match std::str::from_utf8(bytes) {
                    Ok(source) => source,
                    Err(_) => {
                        warn!(page = %asset.filename, "HTML asset is not valid UTF-8, skipping");
                        continue;
                    }
                },
            };

            let mut compilation = Compilation::new(
                HostApi::Static,
                chunks.clone(),
                self.options.public_path.clone(),
            )
            .with_output_name(asset.filename.to_string());
            html_plugin.apply(&mut compilation)?;
            let page = compilation.run(TagGroups::default())?.inject_into(html);

            let replacement = OutputAsset {
                names: asset.names.clone(),
                original_file_names: asset.original_file_names.clone(),
                filename: asset.filename.clone(),
                source: page.into(),
            };
            debug!(page = %replacement.filename, "injected CSS chunk map");
            *output = Output::Asset(Arc::new(replacement));
            pages += 1;
        }

        Ok(pages)
    }
}

impl Plugin for CssChunksPlugin {
    fn name(&self) -> Cow<'static, str> {
        PLUGIN_NAME.into()
    }

    fn register_hook_usage(&self) -> HookUsage {
        HookUsage::GenerateBundle
    }

    fn generate_bundle(
        &self,
        _ctx: &PluginContext,
        args: &mut HookGenerateBundleArgs<'_>,
    ) -> impl std::future::Future<Output = HookNoopReturn> + Send {
        let plugin = self.clone();

        async move {
            let pages = plugin
                .inject_into_bundle(args.bundle)
                .context("failed to inject CSS chunk map")?;
            if pages == 0 {
                debug!("bundle contains no HTML pages, CSS chunk map not injected");
            }
            Ok(())
        }
    }
}
