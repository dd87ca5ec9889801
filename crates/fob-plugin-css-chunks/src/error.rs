//! Error types for the CSS chunk map plugin

use miette::Diagnostic;
use thiserror::Error;

use crate::host::HostApi;

pub type Result<T> = std::result::Result<T, CssChunksError>;

/// Errors that can occur while configuring or running the plugin
#[derive(Error, Debug, Diagnostic)]
pub enum CssChunksError {
    /// `inject` was set to something other than head, body or a falsy value
    #[error("invalid inject value `{value}`")]
    #[diagnostic(
        code(fob::css_chunks::invalid_inject),
        help(
            "Use \"head\", \"body\", or false to disable the script tag. Other strings and \
             numbers are rejected instead of falling back to body"
        )
    )]
    InvalidInject { value: String },

    /// The chunk map could not be serialized to JSON
    #[error("failed to serialize CSS chunk map: {source}")]
    #[diagnostic(code(fob::css_chunks::serialize))]
    Serialize {
        #[source]
        source: serde_json::Error,
    },

    /// The plugin was bound for one host API but the compilation exposes another
    #[error("compilation does not expose {expected} hooks (found {found})")]
    #[diagnostic(
        code(fob::css_chunks::host_api_mismatch),
        help("Create the plugin with `CssChunksHtmlPlugin::detect` to bind against the host's API")
    )]
    HostApiMismatch { expected: HostApi, found: HostApi },

    /// Options could not be extracted from the configured providers
    #[error("failed to load css-chunks configuration: {source}")]
    #[diagnostic(
        code(fob::css_chunks::config),
        help("Check the config file syntax and FOB_CSS_CHUNKS_* environment variables")
    )]
    Config {
        #[source]
        source: Box<figment::Error>,
    },

    /// A hook registered by another plugin failed
    #[error("hook `{hook}` failed: {message}")]
    #[diagnostic(code(fob::css_chunks::hook_failed))]
    Hook { hook: &'static str, message: String },
}

impl CssChunksError {
    pub fn invalid_inject(value: impl Into<String>) -> Self {
        Self::InvalidInject {
            value: value.into(),
        }
    }

    pub fn serialize(source: serde_json::Error) -> Self {
        Self::Serialize { source }
    }

    pub fn host_api_mismatch(expected: HostApi, found: HostApi) -> Self {
        Self::HostApiMismatch { expected, found }
    }

    pub fn config(source: figment::Error) -> Self {
        Self::Config {
            source: Box::new(source),
        }
    }

    pub fn hook(hook: &'static str, message: impl Into<String>) -> Self {
        Self::Hook {
            hook,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_inject_message() {
        let err = CssChunksError::invalid_inject("footer");
        assert_eq!(err.to_string(), "invalid inject value `footer`");

        let help = err.help().map(|h| h.to_string()).unwrap_or_default();
        assert!(help.contains("rejected instead of falling back to body"));
    }

    #[test]
    fn test_host_api_mismatch_message() {
        let err = CssChunksError::host_api_mismatch(HostApi::Static, HostApi::CompilationEvents);
        assert_eq!(
            err.to_string(),
            "compilation does not expose static hooks (found compilation-events)"
        );
    }

    #[test]
    fn test_diagnostic_code() {
        let err = CssChunksError::hook("alter-asset-tags", "boom");
        let code = err.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("fob::css_chunks::hook_failed"));
    }
}
