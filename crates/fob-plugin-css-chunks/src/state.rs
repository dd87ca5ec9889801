//! Per-build state threaded between the two HTML pipeline hooks.
//!
//! ```text
//! PendingBuild ──compute()──▶ ComputedBuild ──inject()──▶ (HtmlTag, InjectedBuild)
//! ```
//!
//! `ComputedBuild` is stored in the compilation's extensions by the
//! before-generation hook and consumed by the alter-tags hook, so a build's
//! chunk map is turned into a tag at most once.

use crate::chunk::ChunkDescriptor;
use crate::error::Result;
use crate::hash::{CssChunkHash, build_css_chunk_hash};
use crate::tag::{HtmlTag, build_script_tag};

/// Inputs for a build whose chunk map has not been computed yet
#[derive(Debug, Clone, Copy)]
pub struct PendingBuild<'a> {
    chunks: &'a [ChunkDescriptor],
    public_path: &'a str,
}

impl<'a> PendingBuild<'a> {
    pub fn new(chunks: &'a [ChunkDescriptor], public_path: &'a str) -> Self {
        Self {
            chunks,
            public_path,
        }
    }

    pub fn compute(self) -> ComputedBuild {
        ComputedBuild {
            hash: build_css_chunk_hash(self.chunks, self.public_path),
        }
    }
}

/// A build whose chunk map is ready but not yet injected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputedBuild {
    hash: CssChunkHash,
}

impl ComputedBuild {
    pub fn hash(&self) -> &CssChunkHash {
        &self.hash
    }

    /// Turn the chunk map into its script tag, consuming the state
    pub fn inject(self) -> Result<(HtmlTag, InjectedBuild)> {
        let tag = build_script_tag(&self.hash)?;
        Ok((tag, InjectedBuild { hash: self.hash }))
    }
}

/// A build whose script tag has been handed to the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectedBuild {
    hash: CssChunkHash,
}

impl InjectedBuild {
    pub fn hash(&self) -> &CssChunkHash {
        &self.hash
    }
}
