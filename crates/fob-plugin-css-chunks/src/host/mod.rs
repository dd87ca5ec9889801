//! Host HTML pipeline the plugin binds against.
//!
//! - [`compilation`]: compilation, hook data and both hook API shapes
//! - [`registrar`]: strategy that binds plugin steps to one API shape
//! - [`extensions`]: per-compilation typed state

pub mod compilation;
pub mod extensions;
pub mod registrar;

pub use compilation::{
    ALTER_ASSET_TAGS_EVENT, AlterAssetTagsData, AlterTagGroupsData,
    BEFORE_HTML_GENERATION_EVENT, BeforeGenerationData, Compilation, CompilationEvent,
    CompilationEvents, Hook, HostApi, HtmlPipelineHooks, TagGroups,
};
pub use extensions::Extensions;
pub use registrar::{
    AlterTagsStep, BeforeGenerationStep, CompilationEventsRegistrar, HookRegistrar,
    StaticHooksRegistrar, select_registrar,
};
