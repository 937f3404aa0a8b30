pub mod compilation;
pub mod inline_source;
pub mod utils;

pub use compilation::{
    Compilation, Compiler, DocumentOptions, HtmlPluginData, OutputOptions, Plugin,
};
pub use inline_source::{
    Asset, AssetMap, HtmlTag, InlineError, InlinePattern, InlineSourcePlugin, RewrittenTags,
    TagKind, TagName, rewrite_tags,
};
