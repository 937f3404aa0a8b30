//! Hook wiring for the inliner

use std::sync::Arc;

use super::processors::{PathContext, rewrite_tags};
use super::types::{InlinePattern, Result};
use crate::compilation::{
    AlterAssetTags, Compilation, Compiler, HookFuture, HtmlPluginData, Plugin,
};
use crate::utils::constants::PLUGIN_NAME;

/// Inlines matching script and stylesheet assets into generated HTML.
///
/// Register it with [`Compiler::apply`]. Each document opts in through its
/// `inlineSource` option; documents without it are passed through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineSourcePlugin;

impl InlineSourcePlugin {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Rewrite one document's tags and drop the inlined assets from the compilation.
    ///
    /// On error the compilation's assets are left as they were.
    pub fn process_document(
        &self,
        compilation: &mut Compilation,
        data: HtmlPluginData,
    ) -> Result<HtmlPluginData> {
        let pattern = match data.options().inline_source.as_deref() {
            Some(pattern) => InlinePattern::new(pattern)?,
            None => return Ok(data),
        };

        let ctx = PathContext {
            output_path: &compilation.output.path,
            public_path: compilation.output.public_path(),
            filename: &data.plugin.options.filename,
        };
        let rewritten = rewrite_tags(&data.head, &data.body, &pattern, &compilation.assets, &ctx)?;

        for name in &rewritten.consumed {
            compilation.assets.remove(name);
        }

        if rewritten.has_inlined() {
            log::debug!(
                "Inlined {} asset(s) into {} using /{}/",
                rewritten.inlined(),
                data.output_name,
                pattern.as_str()
            );
        }

        Ok(HtmlPluginData {
            head: rewritten.head,
            body: rewritten.body,
            ..data
        })
    }
}

impl Plugin for InlineSourcePlugin {
    fn apply(self: Arc<Self>, compiler: &mut Compiler) {
        compiler.tap_compilation(
            PLUGIN_NAME,
            Arc::new(move |compilation: &mut Compilation| {
                let Some(hook) = compilation.hooks_mut().alter_asset_tags.as_mut() else {
                    log::debug!("Compilation has no tag-alteration hook, {PLUGIN_NAME} stays idle");
                    return;
                };
                let handler: Arc<dyn AlterAssetTags> = self.clone();
                hook.tap(PLUGIN_NAME, handler);
            }),
        );
    }
}

impl AlterAssetTags for InlineSourcePlugin {
    fn alter_asset_tags<'a>(
        &'a self,
        compilation: &'a mut Compilation,
        data: HtmlPluginData,
    ) -> HookFuture<'a> {
        Box::pin(async move { self.process_document(compilation, data) })
    }
}
