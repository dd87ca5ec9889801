//! Binding plugin steps to whichever host API a compilation exposes

use std::sync::Arc;

use super::compilation::{
    AlterAssetTagsData, AlterTagGroupsData, BeforeGenerationData, Compilation, CompilationEvent,
    CompilationEvents, HostApi, HtmlPipelineHooks,
};
use super::extensions::Extensions;
use crate::config::InjectPoint;
use crate::error::{CssChunksError, Result};
use crate::tag::HtmlTag;

/// Step run before HTML generation; may park per-build state in the extensions
pub type BeforeGenerationStep =
    Arc<dyn Fn(&BeforeGenerationData, &mut Extensions) -> Result<()> + Send + Sync>;

/// Step run while tags are altered; returns the tag to inject, if any
pub type AlterTagsStep = Arc<dyn Fn(&mut Extensions) -> Result<Option<HtmlTag>> + Send + Sync>;

/// The narrow interface every host API variant implements
pub trait HookRegistrar: Send + Sync {
    /// Host API this registrar binds against
    fn api(&self) -> HostApi;

    fn register_before_generation(
        &self,
        compilation: &mut Compilation,
        callback: BeforeGenerationStep,
    ) -> Result<()>;

    fn register_alter_tags(
        &self,
        compilation: &mut Compilation,
        callback: AlterTagsStep,
    ) -> Result<()>;
}

/// Pick the registrar for a host API. Called once when the plugin is set up.
pub fn select_registrar(
    api: HostApi,
    plugin_name: &'static str,
    inject: InjectPoint,
) -> Box<dyn HookRegistrar> {
    match api {
        HostApi::Static => Box::new(StaticHooksRegistrar {
            plugin_name,
            inject,
        }),
        HostApi::CompilationEvents => Box::new(CompilationEventsRegistrar {
            plugin_name,
            inject,
        }),
    }
}

/// Newer hosts: hooks via [`HtmlPipelineHooks::get`], tags in
/// `head_tags` / `body_tags`
#[derive(Debug, Clone, Copy)]
pub struct StaticHooksRegistrar {
    plugin_name: &'static str,
    inject: InjectPoint,
}

impl StaticHooksRegistrar {
    fn hooks<'a>(&self, compilation: &'a mut Compilation) -> Result<&'a mut HtmlPipelineHooks> {
        let found = compilation.api();
        HtmlPipelineHooks::get(compilation)
            .ok_or_else(|| CssChunksError::host_api_mismatch(HostApi::Static, found))
    }
}

impl HookRegistrar for StaticHooksRegistrar {
    fn api(&self) -> HostApi {
        HostApi::Static
    }

    fn register_before_generation(
        &self,
        compilation: &mut Compilation,
        callback: BeforeGenerationStep,
    ) -> Result<()> {
        self.hooks(compilation)?.tap_before_html_generation(
            self.plugin_name,
            Box::new(move |data: BeforeGenerationData, ext: &mut Extensions| {
                callback(&data, ext)?;
                Ok(data)
            }),
        );
        Ok(())
    }

    fn register_alter_tags(
        &self,
        compilation: &mut Compilation,
        callback: AlterTagsStep,
    ) -> Result<()> {
        let inject = self.inject;
        self.hooks(compilation)?.tap_alter_asset_tag_groups(
            self.plugin_name,
            Box::new(move |mut data: AlterTagGroupsData, ext: &mut Extensions| {
                if let Some(tag) = callback(ext)? {
                    match inject {
                        InjectPoint::Head => data.head_tags.push(tag),
                        InjectPoint::Body => data.body_tags.push(tag),
                        InjectPoint::Disabled => {}
                    }
                }
                Ok(data)
            }),
        );
        Ok(())
    }
}

/// Older hosts: named events on the compilation, tags in `head` / `body`
#[derive(Debug, Clone, Copy)]
pub struct CompilationEventsRegistrar {
    plugin_name: &'static str,
    inject: InjectPoint,
}

impl CompilationEventsRegistrar {
    fn events<'a>(&self, compilation: &'a mut Compilation) -> Result<&'a mut CompilationEvents> {
        let found = compilation.api();
        compilation
            .events_mut()
            .ok_or_else(|| CssChunksError::host_api_mismatch(HostApi::CompilationEvents, found))
    }
}

impl HookRegistrar for CompilationEventsRegistrar {
    fn api(&self) -> HostApi {
        HostApi::CompilationEvents
    }

    fn register_before_generation(
        &self,
        compilation: &mut Compilation,
        callback: BeforeGenerationStep,
    ) -> Result<()> {
        self.events(compilation)?.plugin(
            self.plugin_name,
            CompilationEvent::BeforeHtmlGeneration(Box::new(
                move |data: BeforeGenerationData, ext: &mut Extensions| {
                    callback(&data, ext)?;
                    Ok(data)
                },
            )),
        );
        Ok(())
    }

    fn register_alter_tags(
        &self,
        compilation: &mut Compilation,
        callback: AlterTagsStep,
    ) -> Result<()> {
        let inject = self.inject;
        self.events(compilation)?.plugin(
            self.plugin_name,
            CompilationEvent::AlterAssetTags(Box::new(
                move |mut data: AlterAssetTagsData, ext: &mut Extensions| {
                    if let Some(tag) = callback(ext)? {
                        match inject {
                            InjectPoint::Head => data.head.push(tag),
                            InjectPoint::Body => data.body.push(tag),
                            InjectPoint::Disabled => {}
                        }
                    }
                    Ok(data)
                },
            )),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::TagGroups;

    fn marker_step() -> AlterTagsStep {
        Arc::new(|_: &mut Extensions| Ok(Some(HtmlTag::void("meta"))))
    }

    fn run(api: HostApi, inject: InjectPoint) -> TagGroups {
        let registrar = select_registrar(api, "test", inject);
        let mut compilation = Compilation::new(api, vec![], "/");
        registrar
            .register_alter_tags(&mut compilation, marker_step())
            .unwrap();
        compilation.run(TagGroups::default()).unwrap()
    }

    #[test]
    fn test_select_registrar() {
        assert_eq!(
            select_registrar(HostApi::Static, "test", InjectPoint::Head).api(),
            HostApi::Static
        );
        assert_eq!(
            select_registrar(HostApi::CompilationEvents, "test", InjectPoint::Head).api(),
            HostApi::CompilationEvents
        );
    }

    #[test]
    fn test_target_list_per_inject_point() {
        for api in [HostApi::Static, HostApi::CompilationEvents] {
            let head = run(api, InjectPoint::Head);
            assert_eq!((head.head.len(), head.body.len()), (1, 0), "{api}");

            let body = run(api, InjectPoint::Body);
            assert_eq!((body.head.len(), body.body.len()), (0, 1), "{api}");

            let disabled = run(api, InjectPoint::Disabled);
            assert_eq!((disabled.head.len(), disabled.body.len()), (0, 0), "{api}");
        }
    }

    #[test]
    fn test_before_generation_sees_host_data() {
        for api in [HostApi::Static, HostApi::CompilationEvents] {
            let registrar = select_registrar(api, "test", InjectPoint::Head);
            let mut compilation = Compilation::new(api, vec![], "/assets/");
            registrar
                .register_before_generation(
                    &mut compilation,
                    Arc::new(|data: &BeforeGenerationData, ext: &mut Extensions| {
                        ext.insert(data.public_path.clone());
                        Ok(())
                    }),
                )
                .unwrap();

            compilation.run(TagGroups::default()).unwrap();
            assert_eq!(
                compilation.extensions().get::<String>().map(String::as_str),
                Some("/assets/")
            );
        }
    }

    #[test]
    fn test_api_mismatch() {
        let registrar = select_registrar(HostApi::Static, "test", InjectPoint::Head);
        let mut legacy = Compilation::new(HostApi::CompilationEvents, vec![], "/");
        let err = registrar
            .register_alter_tags(&mut legacy, marker_step())
            .unwrap_err();
        assert!(matches!(
            err,
            CssChunksError::HostApiMismatch {
                expected: HostApi::Static,
                found: HostApi::CompilationEvents
            }
        ));

        let registrar = select_registrar(HostApi::CompilationEvents, "test", InjectPoint::Head);
        let mut modern = Compilation::new(HostApi::Static, vec![], "/");
        let result = registrar.register_alter_tags(&mut modern, marker_step());
        assert!(result.is_err());
    }
}
