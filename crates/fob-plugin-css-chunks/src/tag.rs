//! HTML tag descriptors and the inline chunk map script

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{CssChunksError, Result};
use crate::hash::CssChunkHash;

/// Global the chunk map is assigned to on the page
pub const CSS_CHUNKS_GLOBAL: &str = "__CSS_CHUNKS__";

/// Description of one HTML element for the host to serialize
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HtmlTag {
    pub tag_name: String,
    /// `false` for void elements such as `<meta>` or `<link>`
    pub close_tag: bool,
    pub attributes: IndexMap<String, String>,
    pub inner_html: Option<String>,
}

impl HtmlTag {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            close_tag: true,
            attributes: IndexMap::new(),
            inner_html: None,
        }
    }

    pub fn void(tag_name: impl Into<String>) -> Self {
        Self {
            close_tag: false,
            ..Self::new(tag_name)
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_inner_html(mut self, html: impl Into<String>) -> Self {
        self.inner_html = Some(html.into());
        self
    }

    /// Render the element. Attribute values are escaped; inner HTML is
    /// written as-is.
    pub fn to_html(&self) -> String {
        let mut html = format!("<{}", self.tag_name);
        for (name, value) in &self.attributes {
            html.push(' ');
            html.push_str(name);
            html.push_str("=\"");
            html.push_str(&escape_attribute(value));
            html.push('"');
        }
        html.push('>');

        if self.close_tag {
            if let Some(inner) = &self.inner_html {
                html.push_str(inner);
            }
            html.push_str("</");
            html.push_str(&self.tag_name);
            html.push('>');
        }

        html
    }
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Build the inline script that assigns the chunk map to
/// `window.__CSS_CHUNKS__`.
pub fn build_script_tag(hash: &CssChunkHash) -> Result<HtmlTag> {
    let json = serde_json::to_string(hash).map_err(CssChunksError::serialize)?;

    Ok(HtmlTag::new("script")
        .with_attribute("type", "text/javascript")
        .with_inner_html(format!("window.{CSS_CHUNKS_GLOBAL} = {json}")))
}
