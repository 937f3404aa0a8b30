//! Host build boundary
//!
//! A minimal model of the build tool the plugin attaches to: a compiler that
//! creates compilations, each holding its output assets, its output options
//! and the hooks a plugin can tap.

pub mod hooks;
pub mod options;

use std::sync::Arc;

pub use hooks::{
    AlterAssetTags, AlterAssetTagsHook, CompilationHooks, CompilationTap, CompilerHooks,
    HookFuture, NamedTaps,
};
pub use options::{DocumentOptions, HtmlPluginData, HtmlPluginRef, OutputOptions};

use crate::inline_source::types::{AssetMap, Result};

/// A plugin that registers itself on a compiler
pub trait Plugin {
    fn apply(self: Arc<Self>, compiler: &mut Compiler);
}

/// One build pass: the assets produced so far and the hooks to process them
#[derive(Debug)]
pub struct Compilation {
    pub assets: AssetMap,
    pub output: OutputOptions,
    hooks: CompilationHooks,
}

impl Compilation {
    /// Compilation with an HTML generator, exposing the tag-alteration hook
    pub fn new(output: OutputOptions, assets: AssetMap) -> Self {
        Self {
            assets,
            output,
            hooks: CompilationHooks {
                alter_asset_tags: Some(AlterAssetTagsHook::default()),
            },
        }
    }

    /// Compilation without an HTML generator (a child compiler, for instance)
    pub fn without_html_hooks(output: OutputOptions, assets: AssetMap) -> Self {
        Self {
            assets,
            output,
            hooks: CompilationHooks::default(),
        }
    }

    #[must_use]
    pub fn hooks(&self) -> &CompilationHooks {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut CompilationHooks {
        &mut self.hooks
    }

    /// Run every tag-alteration handler over one document's payload, in order.
    ///
    /// Without the extension point the payload is returned as is.
    pub async fn alter_asset_tags(&mut self, data: HtmlPluginData) -> Result<HtmlPluginData> {
        let handlers = match &self.hooks.alter_asset_tags {
            Some(hook) => hook.handlers(),
            None => return Ok(data),
        };

        let mut data = data;
        for handler in handlers {
            data = handler.alter_asset_tags(self, data).await?;
        }
        Ok(data)
    }
}

/// Creates compilations and fires the `compilation` hook for each
#[derive(Debug, Default)]
pub struct Compiler {
    pub output: OutputOptions,
    hooks: CompilerHooks,
}

impl Compiler {
    pub fn new(output: OutputOptions) -> Self {
        Self {
            output,
            hooks: CompilerHooks::default(),
        }
    }

    /// Register a plugin
    pub fn apply<P: Plugin>(&mut self, plugin: P) -> &mut Self {
        Arc::new(plugin).apply(self);
        self
    }

    /// Tap the `compilation` hook; returns `false` if `name` was already tapped
    pub fn tap_compilation(&mut self, name: &str, tap: CompilationTap) -> bool {
        self.hooks.compilation.tap(name, tap)
    }

    #[must_use]
    pub fn hooks(&self) -> &CompilerHooks {
        &self.hooks
    }

    /// Start a compilation that includes an HTML generator
    pub fn new_compilation(&self, assets: AssetMap) -> Compilation {
        self.fire_compilation(Compilation::new(self.output.clone(), assets))
    }

    /// Start a compilation that has no HTML generator
    pub fn new_compilation_without_html_hooks(&self, assets: AssetMap) -> Compilation {
        self.fire_compilation(Compilation::without_html_hooks(
            self.output.clone(),
            assets,
        ))
    }

    fn fire_compilation(&self, mut compilation: Compilation) -> Compilation {
        for tap in self.hooks.compilation.handlers() {
            tap(&mut compilation);
        }
        compilation
    }
}
