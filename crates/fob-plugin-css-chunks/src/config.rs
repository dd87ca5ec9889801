//! Configuration types for the CSS chunk map plugin
//!
//! Options can be built in code with the `with_*` builders or loaded from
//! defaults, an optional JSON file and `FOB_CSS_CHUNKS_*` environment
//! variables via [`CssChunksOptions::load`].

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use figment::{
    Figment,
    providers::{Env, Format as _, Json, Serialized},
};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{CssChunksError, Result};

/// Where the generated `<script>` tag is placed in the HTML document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum InjectPoint {
    /// Append to the document head
    #[default]
    Head,
    /// Append to the document body
    Body,
    /// Do not inject a tag; the chunk map is still computed
    Disabled,
}

impl InjectPoint {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, InjectPoint::Disabled)
    }
}

impl FromStr for InjectPoint {
    type Err = CssChunksError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "head" => Ok(InjectPoint::Head),
            "body" | "true" => Ok(InjectPoint::Body),
            "" | "false" | "null" => Ok(InjectPoint::Disabled),
            _ => Err(CssChunksError::invalid_inject(s)),
        }
    }
}

impl fmt::Display for InjectPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InjectPoint::Head => f.write_str("head"),
            InjectPoint::Body => f.write_str("body"),
            InjectPoint::Disabled => f.write_str("false"),
        }
    }
}

impl Serialize for InjectPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            InjectPoint::Head => serializer.serialize_str("head"),
            InjectPoint::Body => serializer.serialize_str("body"),
            InjectPoint::Disabled => serializer.serialize_bool(false),
        }
    }
}

struct InjectPointVisitor;

impl<'de> Visitor<'de> for InjectPointVisitor {
    type Value = InjectPoint;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"head\", \"body\", or a falsy value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<InjectPoint, E> {
        Ok(if v {
            InjectPoint::Body
        } else {
            InjectPoint::Disabled
        })
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<InjectPoint, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<InjectPoint, E> {
        Ok(InjectPoint::Disabled)
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<InjectPoint, E> {
        Ok(InjectPoint::Disabled)
    }

    fn visit_some<D: Deserializer<'de>>(
        self,
        deserializer: D,
    ) -> std::result::Result<InjectPoint, D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Deserialize<'de> for InjectPoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(InjectPointVisitor)
    }
}

/// Options for [`CssChunksHtmlPlugin`](crate::CssChunksHtmlPlugin) and
/// [`CssChunksPlugin`](crate::CssChunksPlugin)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CssChunksOptions {
    /// Injection point for the `<script>` tag
    #[serde(default)]
    pub inject: InjectPoint,

    /// URL prefix prepended to CSS filenames when the host does not
    /// supply one (rolldown bundles carry no public path)
    #[serde(default = "default_public_path")]
    pub public_path: String,
}

fn default_public_path() -> String {
    "/".to_string()
}

impl Default for CssChunksOptions {
    fn default() -> Self {
        Self {
            inject: InjectPoint::default(),
            public_path: default_public_path(),
        }
    }
}

impl CssChunksOptions {
    /// Create options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the injection point
    pub fn with_inject(mut self, inject: InjectPoint) -> Self {
        self.inject = inject;
        self
    }

    /// Set the public path prefix
    pub fn with_public_path(mut self, public_path: impl Into<String>) -> Self {
        self.public_path = public_path.into();
        self
    }

    /// Load options from multiple sources.
    /// Priority: environment variables > config file > defaults
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        if let Some(path) = config_file {
            figment = figment.merge(Json::file(path));
        }

        // FOB_CSS_CHUNKS_INJECT, FOB_CSS_CHUNKS_PUBLIC_PATH
        figment = figment.merge(Env::prefixed("FOB_CSS_CHUNKS_"));

        figment.extract().map_err(CssChunksError::config)
    }
}
