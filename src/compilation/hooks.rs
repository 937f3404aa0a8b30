//! Extension points a plugin can tap
//!
//! Only the two hooks the inliner needs are modelled: the compiler's
//! `compilation` hook, fired once per new compilation, and the HTML
//! generator's asynchronous tag-alteration hook.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use super::Compilation;
use super::options::HtmlPluginData;
use crate::inline_source::types::InlineError;

/// Future returned by a tag-alteration handler
pub type HookFuture<'a> =
    Pin<Box<dyn Future<Output = Result<HtmlPluginData, InlineError>> + Send + 'a>>;

/// Handler for the asynchronous tag-alteration hook
pub trait AlterAssetTags: Send + Sync {
    fn alter_asset_tags<'a>(
        &'a self,
        compilation: &'a mut Compilation,
        data: HtmlPluginData,
    ) -> HookFuture<'a>;
}

/// Callback fired for each new compilation
pub type CompilationTap = Arc<dyn Fn(&mut Compilation) + Send + Sync>;

/// Handlers registered by name, run in registration order
///
/// Registering a second handler under a name that is already tapped is a
/// no-op.
pub struct NamedTaps<T> {
    taps: Vec<(String, T)>,
}

impl<T> Default for NamedTaps<T> {
    fn default() -> Self {
        Self { taps: Vec::new() }
    }
}

impl<T: Clone> NamedTaps<T> {
    /// Register `handler` under `name`; returns `false` if `name` was already tapped
    pub fn tap(&mut self, name: &str, handler: T) -> bool {
        if self.is_tapped(name) {
            return false;
        }
        self.taps.push((name.to_string(), handler));
        true
    }

    #[must_use]
    pub fn is_tapped(&self, name: &str) -> bool {
        self.taps.iter().any(|(tapped, _)| tapped == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.taps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }

    /// Snapshot of the handlers, so they can run while the hook owner is borrowed mutably
    #[must_use]
    pub fn handlers(&self) -> Vec<T> {
        self.taps.iter().map(|(_, handler)| handler.clone()).collect()
    }
}

impl<T> fmt::Debug for NamedTaps<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.taps.iter().map(|(name, _)| name))
            .finish()
    }
}

/// Asynchronous tag-alteration hook of the HTML generator
pub type AlterAssetTagsHook = NamedTaps<Arc<dyn AlterAssetTags>>;

/// Hooks of a single compilation
#[derive(Debug, Default)]
pub struct CompilationHooks {
    /// Present only when an HTML generator is part of the build
    pub alter_asset_tags: Option<AlterAssetTagsHook>,
}

/// Hooks of the compiler
#[derive(Debug, Default)]
pub struct CompilerHooks {
    pub compilation: NamedTaps<CompilationTap>,
}
