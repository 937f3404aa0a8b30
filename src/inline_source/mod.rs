//! Asset inlining
//!
//! This module rewrites `<script src>` and `<link href>` tags of generated HTML
//! into `<script>` and `<style>` tags carrying the referenced asset, and keeps
//! source-map locators inside that content resolvable.

// Sub-modules
pub mod plugin;
pub mod processors;
pub mod source_maps;
pub mod types;

// Re-exports for public API
pub use plugin::InlineSourcePlugin;
pub use processors::{PathContext, asset_name_for, escape_script_content, process_tag, rewrite_tags};
pub use source_maps::{extract_source_map_url, resolve_source_maps};
pub use types::{
    Asset, AssetMap, AssetSource, AttributeValue, HtmlTag, InlineError, InlinePattern,
    RewrittenTags, TagKind, TagName,
};
