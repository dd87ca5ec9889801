//! The host HTML pipeline surface, in both supported API shapes.
//!
//! Newer hosts expose their hooks through a static accessor,
//! [`HtmlPipelineHooks::get`], and hand alter-tags hooks `head_tags` /
//! `body_tags` groups. Older hosts only expose named events on the
//! compilation ([`CompilationEvents::plugin`]) and hand alter-tags hooks
//! `head` / `body` lists.

use std::fmt;

use tracing::debug;

use super::extensions::Extensions;
use crate::chunk::ChunkDescriptor;
use crate::error::Result;
use crate::tag::HtmlTag;

/// Event name of the before-generation hook on older hosts
pub const BEFORE_HTML_GENERATION_EVENT: &str = "html-plugin-before-html-generation";
/// Event name of the alter-tags hook on older hosts
pub const ALTER_ASSET_TAGS_EVENT: &str = "html-plugin-alter-asset-tags";

/// Which hook API a host exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostApi {
    /// Hooks reached through the static [`HtmlPipelineHooks::get`] accessor
    Static,
    /// Named events registered directly on the compilation
    CompilationEvents,
}

impl HostApi {
    /// Detect the API shape a compilation exposes
    pub fn detect(compilation: &Compilation) -> Self {
        compilation.api()
    }
}

impl fmt::Display for HostApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostApi::Static => f.write_str("static"),
            HostApi::CompilationEvents => f.write_str("compilation-events"),
        }
    }
}

/// Data handed to before-generation hooks
#[derive(Debug, Clone)]
pub struct BeforeGenerationData {
    pub chunks: Vec<ChunkDescriptor>,
    pub public_path: String,
    /// Output filename of the HTML page being generated
    pub output_name: String,
}

/// Data handed to alter-tags hooks on static-hook hosts
#[derive(Debug, Clone, Default)]
pub struct AlterTagGroupsData {
    pub head_tags: Vec<HtmlTag>,
    pub body_tags: Vec<HtmlTag>,
    pub output_name: String,
}

/// Data handed to alter-tags hooks on compilation-event hosts
#[derive(Debug, Clone, Default)]
pub struct AlterAssetTagsData {
    pub head: Vec<HtmlTag>,
    pub body: Vec<HtmlTag>,
}

/// A hook receives its data by value and hands it back, or fails the build
pub type Hook<T> = Box<dyn Fn(T, &mut Extensions) -> Result<T> + Send + Sync>;

struct Tapped<T> {
    name: String,
    hook: Hook<T>,
}

fn call_all<T>(taps: &[Tapped<T>], mut data: T, extensions: &mut Extensions) -> Result<T> {
    for tap in taps {
        debug!(plugin = %tap.name, "running HTML pipeline hook");
        data = (tap.hook)(data, extensions)?;
    }
    Ok(data)
}

/// Hooks of a static-hook host, one set per compilation
#[derive(Default)]
pub struct HtmlPipelineHooks {
    before_html_generation: Vec<Tapped<BeforeGenerationData>>,
    alter_asset_tag_groups: Vec<Tapped<AlterTagGroupsData>>,
}

impl HtmlPipelineHooks {
    /// Static accessor for the hooks of a compilation.
    ///
    /// Returns `None` when the compilation belongs to a host that only
    /// exposes named compilation events.
    pub fn get(compilation: &mut Compilation) -> Option<&mut HtmlPipelineHooks> {
        compilation.static_hooks.as_mut()
    }

    pub fn tap_before_html_generation(
        &mut self,
        name: impl Into<String>,
        hook: Hook<BeforeGenerationData>,
    ) {
        self.before_html_generation.push(Tapped {
            name: name.into(),
            hook,
        });
    }

    pub fn tap_alter_asset_tag_groups(
        &mut self,
        name: impl Into<String>,
        hook: Hook<AlterTagGroupsData>,
    ) {
        self.alter_asset_tag_groups.push(Tapped {
            name: name.into(),
            hook,
        });
    }
}

/// A named event on a compilation-event host, with its callback
pub enum CompilationEvent {
    BeforeHtmlGeneration(Hook<BeforeGenerationData>),
    AlterAssetTags(Hook<AlterAssetTagsData>),
}

impl CompilationEvent {
    pub fn name(&self) -> &'static str {
        match self {
            CompilationEvent::BeforeHtmlGeneration(_) => BEFORE_HTML_GENERATION_EVENT,
            CompilationEvent::AlterAssetTags(_) => ALTER_ASSET_TAGS_EVENT,
        }
    }
}

/// Named events of a compilation-event host
#[derive(Default)]
pub struct CompilationEvents {
    before_html_generation: Vec<Tapped<BeforeGenerationData>>,
    alter_asset_tags: Vec<Tapped<AlterAssetTagsData>>,
}

impl CompilationEvents {
    pub fn plugin(&mut self, name: impl Into<String>, event: CompilationEvent) {
        let name = name.into();
        debug!(plugin = %name, event = event.name(), "registering compilation event");
        match event {
            CompilationEvent::BeforeHtmlGeneration(hook) => {
                self.before_html_generation.push(Tapped { name, hook })
            }
            CompilationEvent::AlterAssetTags(hook) => {
                self.alter_asset_tags.push(Tapped { name, hook })
            }
        }
    }
}

/// Head and body tags produced for one HTML page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagGroups {
    pub head: Vec<HtmlTag>,
    pub body: Vec<HtmlTag>,
}

impl TagGroups {
    /// Splice the tags into a document: head tags before the first
    /// `</head>`, body tags before the last `</body>`. A document without
    /// `</head>` gets head tags prepended; without `</body>`, body tags
    /// appended.
    pub fn inject_into(&self, html: &str) -> String {
        let head = render_tags(&self.head);
        let body = render_tags(&self.body);

        let lower = html.to_ascii_lowercase();
        let head_at = lower.find("</head>");
        let body_at = lower.rfind("</body>");

        let mut out = String::with_capacity(html.len() + head.len() + body.len());
        let mut cursor = 0;

        match head_at {
            Some(at) => {
                out.push_str(&html[cursor..at]);
                out.push_str(&head);
                cursor = at;
            }
            None => out.push_str(&head),
        }

        match body_at.filter(|at| *at >= cursor) {
            Some(at) => {
                out.push_str(&html[cursor..at]);
                out.push_str(&body);
                out.push_str(&html[at..]);
            }
            None => {
                out.push_str(&html[cursor..]);
                out.push_str(&body);
            }
        }

        out
    }
}

fn render_tags(tags: &[HtmlTag]) -> String {
    tags.iter().map(HtmlTag::to_html).collect()
}

/// One pass of the host HTML pipeline.
///
/// A compilation is never reused across builds; state plugins park in
/// [`Compilation::extensions`] lives exactly as long as the build.
pub struct Compilation {
    static_hooks: Option<HtmlPipelineHooks>,
    events: CompilationEvents,
    extensions: Extensions,
    chunks: Vec<ChunkDescriptor>,
    public_path: String,
    output_name: String,
}

impl Compilation {
    pub fn new(api: HostApi, chunks: Vec<ChunkDescriptor>, public_path: impl Into<String>) -> Self {
        Self {
            static_hooks: match api {
                HostApi::Static => Some(HtmlPipelineHooks::default()),
                HostApi::CompilationEvents => None,
            },
            events: CompilationEvents::default(),
            extensions: Extensions::new(),
            chunks,
            public_path: public_path.into(),
            output_name: "index.html".to_string(),
        }
    }

    pub fn with_output_name(mut self, output_name: impl Into<String>) -> Self {
        self.output_name = output_name.into();
        self
    }

    pub fn api(&self) -> HostApi {
        if self.static_hooks.is_some() {
            HostApi::Static
        } else {
            HostApi::CompilationEvents
        }
    }

    /// Named compilation events, or `None` on a static-hook host, which
    /// never fires the HTML pipeline events through them.
    pub fn events_mut(&mut self) -> Option<&mut CompilationEvents> {
        match self.api() {
            HostApi::CompilationEvents => Some(&mut self.events),
            HostApi::Static => None,
        }
    }

    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }

    pub fn chunks(&self) -> &[ChunkDescriptor] {
        &self.chunks
    }

    pub fn public_path(&self) -> &str {
        &self.public_path
    }

    /// Fire before-generation hooks, then alter-tags hooks, starting from
    /// the host's own tags. Hook errors abort the pass unchanged.
    pub fn run(&mut self, initial: TagGroups) -> Result<TagGroups> {
        let before = BeforeGenerationData {
            chunks: self.chunks.clone(),
            public_path: self.public_path.clone(),
            output_name: self.output_name.clone(),
        };

        match &self.static_hooks {
            Some(hooks) => {
                call_all(&hooks.before_html_generation, before, &mut self.extensions)?;

                let groups = AlterTagGroupsData {
                    head_tags: initial.head,
                    body_tags: initial.body,
                    output_name: self.output_name.clone(),
                };
                let groups =
                    call_all(&hooks.alter_asset_tag_groups, groups, &mut self.extensions)?;

                Ok(TagGroups {
                    head: groups.head_tags,
                    body: groups.body_tags,
                })
            }
            None => {
                call_all(
                    &self.events.before_html_generation,
                    before,
                    &mut self.extensions,
                )?;

                let tags = AlterAssetTagsData {
                    head: initial.head,
                    body: initial.body,
                };
                let tags = call_all(&self.events.alter_asset_tags, tags, &mut self.extensions)?;

                Ok(TagGroups {
                    head: tags.head,
                    body: tags.body,
                })
            }
        }
    }
}

impl fmt::Debug for Compilation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compilation")
            .field("api", &self.api())
            .field("chunks", &self.chunks)
            .field("public_path", &self.public_path)
            .field("output_name", &self.output_name)
            .finish_non_exhaustive()
    }
}
