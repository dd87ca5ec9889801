//! The plugin as seen by the host HTML pipeline.
//!
//! `apply` subscribes two steps to a compilation:
//!
//! ```text
//! before HTML generation → compute chunk map → park ComputedBuild in extensions
//! alter asset tags       → take ComputedBuild → script tag → head or body
//! ```

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::CssChunksOptions;
use crate::error::Result;
use crate::host::{
    BeforeGenerationData, Compilation, Extensions, HookRegistrar, HostApi, select_registrar,
};
use crate::state::{ComputedBuild, InjectedBuild, PendingBuild};
use crate::tag::HtmlTag;

/// Name the plugin registers its hooks under
pub const PLUGIN_NAME: &str = "fob-css-chunks";

/// HTML pipeline plugin exposing `window.__CSS_CHUNKS__`
pub struct CssChunksHtmlPlugin {
    options: CssChunksOptions,
    registrar: Box<dyn HookRegistrar>,
}

impl CssChunksHtmlPlugin {
    /// Bind against a known host API
    pub fn for_host(api: HostApi, options: CssChunksOptions) -> Self {
        let registrar = select_registrar(api, PLUGIN_NAME, options.inject);
        Self { options, registrar }
    }

    /// Bind against whichever API the compilation exposes
    pub fn detect(compilation: &Compilation, options: CssChunksOptions) -> Self {
        Self::for_host(HostApi::detect(compilation), options)
    }

    pub fn options(&self) -> &CssChunksOptions {
        &self.options
    }

    pub fn api(&self) -> HostApi {
        self.registrar.api()
    }

    /// Subscribe to one compilation's hooks.
    ///
    /// With injection disabled only the before-generation step is
    /// registered; the computed chunk map stays in the compilation's
    /// extensions as a [`ComputedBuild`].
    pub fn apply(&self, compilation: &mut Compilation) -> Result<()> {
        self.registrar
            .register_before_generation(compilation, Arc::new(compute_chunk_map))?;

        if self.options.inject.is_enabled() {
            self.registrar
                .register_alter_tags(compilation, Arc::new(take_script_tag))?;
        }

        Ok(())
    }
}

impl fmt::Debug for CssChunksHtmlPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CssChunksHtmlPlugin")
            .field("options", &self.options)
            .field("api", &self.api())
            .finish()
    }
}

fn compute_chunk_map(data: &BeforeGenerationData, ext: &mut Extensions) -> Result<()> {
    let computed = PendingBuild::new(&data.chunks, &data.public_path).compute();
    debug!(
        page = %data.output_name,
        entries = computed.hash().len(),
        "computed CSS chunk map"
    );
    ext.insert(computed);
    Ok(())
}

fn take_script_tag(ext: &mut Extensions) -> Result<Option<HtmlTag>> {
    match ext.remove::<ComputedBuild>() {
        Some(build) => {
            let (tag, injected) = build.inject()?;
            ext.insert(injected);
            Ok(Some(tag))
        }
        None if ext.contains::<InjectedBuild>() => {
            debug!("CSS chunk map already injected for this compilation");
            Ok(None)
        }
        None => {
            warn!("asset tags altered before the CSS chunk map was computed, skipping injection");
            Ok(None)
        }
    }
}
