//! Hook registration and host payload handling

use std::sync::Arc;

use html_inline_source::compilation::{AlterAssetTags, HookFuture};
use html_inline_source::utils::PLUGIN_NAME;
use html_inline_source::{
    Compilation, Compiler, DocumentOptions, HtmlPluginData, HtmlTag, InlineError,
    InlineSourcePlugin, OutputOptions, Plugin,
};

mod common;
use common::{compiler_with_plugin, init_logging, text_assets};

/// Handler appending a marker tag to the body, standing in for another plugin
struct MarkerPlugin;

impl AlterAssetTags for MarkerPlugin {
    fn alter_asset_tags<'a>(
        &'a self,
        _compilation: &'a mut Compilation,
        mut data: HtmlPluginData,
    ) -> HookFuture<'a> {
        Box::pin(async move {
            data.body.push(HtmlTag::new("noscript", true));
            Ok(data)
        })
    }
}

#[test]
fn test_registration_taps_each_compilation_once() {
    init_logging();
    let mut compiler = Compiler::new(OutputOptions::new("/dist"));
    compiler.apply(InlineSourcePlugin::new());
    compiler.apply(InlineSourcePlugin::new());

    assert_eq!(compiler.hooks().compilation.len(), 1);

    let compilation = compiler.new_compilation(text_assets(&[]));
    let hook = compilation
        .hooks()
        .alter_asset_tags
        .as_ref()
        .expect("compilation should expose the tag hook");
    assert_eq!(hook.len(), 1);
    assert!(hook.is_tapped(PLUGIN_NAME));
}

#[test]
fn test_plugin_apply_is_idempotent_on_existing_compilation() {
    let plugin = Arc::new(InlineSourcePlugin::new());
    let mut compiler = Compiler::new(OutputOptions::new("/dist"));
    plugin.clone().apply(&mut compiler);

    let mut compilation = compiler.new_compilation(text_assets(&[]));
    for tap in compiler.hooks().compilation.handlers() {
        tap(&mut compilation);
    }

    assert_eq!(compilation.hooks().alter_asset_tags.as_ref().map(|h| h.len()), Some(1));
}

#[tokio::test]
async fn test_compilation_without_tag_hook_is_skipped() {
    let compiler = compiler_with_plugin("/dist", None);
    let mut compilation =
        compiler.new_compilation_without_html_hooks(text_assets(&[("bundle.js", "x")]));

    assert!(compilation.hooks().alter_asset_tags.is_none());

    let data = HtmlPluginData::new(DocumentOptions::default().with_inline_source(r"\.js$"))
        .with_head(vec![HtmlTag::script_reference("bundle.js")]);
    let expected = data.clone();

    let result = compilation.alter_asset_tags(data).await.unwrap();
    assert_eq!(result, expected);
    assert!(compilation.assets.contains_key("bundle.js"));
}

#[tokio::test]
async fn test_other_handlers_still_run() {
    let compiler = compiler_with_plugin("/dist", None);
    let mut compilation = compiler.new_compilation(text_assets(&[("bundle.js", "x")]));
    compilation
        .hooks_mut()
        .alter_asset_tags
        .as_mut()
        .unwrap()
        .tap("marker", Arc::new(MarkerPlugin));

    let data = HtmlPluginData::new(DocumentOptions::default())
        .with_body(vec![HtmlTag::script_reference("bundle.js")]);

    let result = compilation.alter_asset_tags(data).await.unwrap();

    assert_eq!(result.body.len(), 2);
    assert_eq!(result.body[1].to_string(), "<noscript></noscript>");
}

#[tokio::test]
async fn test_asset_consumed_by_one_document_is_gone_for_the_next() {
    let compiler = compiler_with_plugin("/dist", None);
    let mut compilation = compiler.new_compilation(text_assets(&[("shared.js", "shared()")]));

    let options = DocumentOptions::default().with_inline_source(r"shared\.js$");
    let first = HtmlPluginData::new(options.clone())
        .with_body(vec![HtmlTag::script_reference("shared.js")]);
    let second = HtmlPluginData::new(options.with_filename("other.html"))
        .with_body(vec![HtmlTag::script_reference("shared.js")]);

    compilation.alter_asset_tags(first).await.unwrap();
    let err = compilation.alter_asset_tags(second).await.unwrap_err();

    assert!(matches!(err, InlineError::UnresolvedAsset { .. }));
}

#[tokio::test]
async fn test_processes_host_json_payload() {
    let compiler = compiler_with_plugin("/dist", Some("/"));
    let mut compilation = compiler.new_compilation(text_assets(&[
        ("main.js", "main()\n//# sourceMappingURL=main.js.map\n"),
        ("main.css", "h1{}"),
    ]));

    let json = r#"{
        "head": [
            {"tagName": "meta", "attributes": {"charset": "utf-8"}},
            {"tagName": "link", "attributes": {"href": "/main.css", "rel": "stylesheet"}}
        ],
        "body": [
            {"tagName": "script", "closeTag": true, "attributes": {"src": "/main.js"}}
        ],
        "plugin": {"options": {"inlineSource": "main\\.(js|css)$", "filename": "index.html"}},
        "outputName": "index.html"
    }"#;

    let data = HtmlPluginData::from_json(json).unwrap();
    let result = compilation.alter_asset_tags(data).await.unwrap();

    assert_eq!(result.head[0].to_string(), r#"<meta charset="utf-8">"#);
    assert_eq!(result.head[1].to_string(), r#"<style type="text/css">h1{}</style>"#);
    assert_eq!(
        result.body[0].to_string(),
        "<script type=\"text/javascript\">main()\n//# sourceMappingURL=/main.js.map\n</script>"
    );
    assert!(compilation.assets.is_empty());

    let serialized: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();
    assert_eq!(serialized["head"][1]["tagName"], "style");
    assert_eq!(serialized["head"][1]["innerHTML"], "h1{}");
}
