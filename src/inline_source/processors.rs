//! Tag selection and rewrite
//!
//! This module turns `<script src>` and `<link href>` tags whose reference
//! matches the inline pattern into `<script>`/`<style>` tags carrying the
//! asset content. It never touches the asset set itself; the caller removes
//! the assets listed in [`RewrittenTags::consumed`].

use std::path::Path;

use super::source_maps::resolve_source_maps;
use super::types::{
    Asset, AssetMap, HtmlTag, InlineError, InlinePattern, Result, RewrittenTags, TagKind, TagName,
};
use crate::utils::constants::{ESCAPED_LT, SCRIPT_MIME_TYPE, STYLE_MIME_TYPE};
use crate::utils::{dirname, normalize_asset_key, posix_relative, to_slash};

/// Publish-time values needed to map a tag reference to an asset
#[derive(Debug, Clone, Copy)]
pub struct PathContext<'a> {
    /// Output directory of the compilation
    pub output_path: &'a Path,
    /// Public URL prefix; empty when not configured
    pub public_path: &'a str,
    /// Filename of the HTML document being processed
    pub filename: &'a str,
}

/// Name under which a referenced asset is stored in the output set.
///
/// A relative reference from a document in a subdirectory is first prefixed
/// with that directory. The public URL prefix is then stripped off.
///
/// # Examples
/// ```
/// # use std::path::Path;
/// # use html_inline_source::inline_source::{PathContext, asset_name_for};
/// let ctx = PathContext {
///     output_path: Path::new("/dist"),
///     public_path: "/static/",
///     filename: "index.html",
/// };
/// assert_eq!(asset_name_for("/static/js/app.js", &ctx), "js/app.js");
/// ```
#[must_use]
pub fn asset_name_for(reference: &str, ctx: &PathContext<'_>) -> String {
    let filename = to_slash(ctx.filename);
    let anchored = reference.starts_with('/') || reference.contains("://");

    let url = match dirname(&filename) {
        Some(dir) if !anchored => format!("{dir}/{reference}"),
        _ => reference.to_string(),
    };

    posix_relative(ctx.public_path, &url)
}

/// Find an asset by name, comparing against each key in canonical form.
fn find_asset<'a>(assets: &'a AssetMap, asset_name: &str) -> Option<(&'a String, &'a Asset)> {
    assets
        .iter()
        .find(|(key, _)| normalize_asset_key(key) == asset_name)
}

/// Escape every `</script>` so inlined code cannot close its own tag early.
///
/// # Examples
/// ```
/// # use html_inline_source::inline_source::escape_script_content;
/// assert_eq!(
///     escape_script_content(r#"console.log("</script>")"#),
///     r#"console.log("\x3C/script>")"#
/// );
/// ```
#[must_use]
pub fn escape_script_content(content: &str) -> String {
    content.replace("</script>", &format!("{ESCAPED_LT}/script>"))
}

/// Rewrite a single tag.
///
/// Tags that are not a matching script or stylesheet reference are returned
/// unchanged. For a matching one the asset key is appended to `consumed`
/// unless it is already listed.
pub fn process_tag(
    tag: &HtmlTag,
    pattern: &InlinePattern,
    assets: &AssetMap,
    ctx: &PathContext<'_>,
    consumed: &mut Vec<String>,
) -> Result<HtmlTag> {
    let kind = tag.kind();
    let (reference, mut inlined) = match kind {
        TagKind::ScriptReference => match tag.attribute("src") {
            Some(src) if pattern.is_match(src) => (
                src,
                HtmlTag::new(TagName::Script, true).with_attribute("type", SCRIPT_MIME_TYPE),
            ),
            _ => return Ok(tag.clone()),
        },
        TagKind::StylesheetReference => match tag.attribute("href") {
            Some(href) if pattern.is_match(href) => (
                href,
                HtmlTag::new(TagName::Style, true).with_attribute("type", STYLE_MIME_TYPE),
            ),
            _ => return Ok(tag.clone()),
        },
        _ => return Ok(tag.clone()),
    };

    let asset_name = asset_name_for(reference, ctx);
    let Some((key, asset)) = find_asset(assets, &asset_name) else {
        log::warn!("Inlined {kind} {reference} does not name an asset (looked up as {asset_name})");
        return Err(InlineError::UnresolvedAsset {
            reference: reference.to_string(),
            asset_name,
        });
    };

    let text = asset.source();
    let resolved = resolve_source_maps(&text, &asset_name, ctx.output_path, ctx.public_path);

    inlined.inner_html = Some(match inlined.tag_name {
        TagName::Script => escape_script_content(&resolved),
        _ => resolved.into_owned(),
    });

    if !consumed.contains(key) {
        consumed.push(key.clone());
    }

    log::debug!(
        "Inlined {kind} {reference} as <{}> ({} bytes)",
        inlined.tag_name,
        asset.size()
    );

    Ok(inlined)
}

/// Rewrite the head and body tags of one document.
///
/// Both sequences keep their length and order. Fails on the first reference
/// that does not resolve to an asset; nothing is consumed in that case.
pub fn rewrite_tags(
    head: &[HtmlTag],
    body: &[HtmlTag],
    pattern: &InlinePattern,
    assets: &AssetMap,
    ctx: &PathContext<'_>,
) -> Result<RewrittenTags> {
    let mut consumed = Vec::new();

    let head = head
        .iter()
        .map(|tag| process_tag(tag, pattern, assets, ctx, &mut consumed))
        .collect::<Result<Vec<_>>>()?;

    let body = body
        .iter()
        .map(|tag| process_tag(tag, pattern, assets, ctx, &mut consumed))
        .collect::<Result<Vec<_>>>()?;

    Ok(RewrittenTags {
        head,
        body,
        consumed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> PathContext<'static> {
        PathContext {
            output_path: Path::new("/dist"),
            public_path: "",
            filename: "index.html",
        }
    }

    fn assets(entries: &[(&str, &str)]) -> AssetMap {
        entries
            .iter()
            .map(|(name, content)| ((*name).to_string(), Asset::text(*content)))
            .collect()
    }

    #[test]
    fn test_asset_name_for_subdirectory_document() {
        let ctx = PathContext {
            filename: "docs/index.html",
            ..ctx()
        };
        assert_eq!(asset_name_for("app.js", &ctx), "docs/app.js");
        assert_eq!(asset_name_for("../app.js", &ctx), "app.js");
        assert_eq!(asset_name_for("/app.js", &ctx), "app.js");
    }

    #[test]
    fn test_asset_name_for_windows_filename() {
        let ctx = PathContext {
            filename: r"docs\index.html",
            ..ctx()
        };
        assert_eq!(asset_name_for("app.js", &ctx), "docs/app.js");
    }

    #[test]
    fn test_asset_name_for_cdn_public_path() {
        let ctx = PathContext {
            public_path: "https://cdn.example.com/assets/",
            ..ctx()
        };
        assert_eq!(
            asset_name_for("https://cdn.example.com/assets/app.js", &ctx),
            "app.js"
        );
    }

    #[test]
    fn test_escape_only_touches_exact_closing_sequence() {
        assert_eq!(escape_script_content("a</script>b</script>"), r"a\x3C/script>b\x3C/script>");
        assert_eq!(escape_script_content("</SCRIPT>"), "</SCRIPT>");
        assert_eq!(escape_script_content("< /script>"), "< /script>");
    }

    #[test]
    fn test_lookup_matches_dot_prefixed_key() {
        let pattern = InlinePattern::new(r"\.js$").unwrap();
        let assets = assets(&[("./app.js", "run()")]);
        let mut consumed = Vec::new();

        let tag = process_tag(
            &HtmlTag::script_reference("app.js"),
            &pattern,
            &assets,
            &ctx(),
            &mut consumed,
        )
        .unwrap();

        assert_eq!(tag.inner_html.as_deref(), Some("run()"));
        assert_eq!(consumed, vec!["./app.js".to_string()]);
    }

    #[test]
    fn test_non_matching_tags_pass_through() {
        let pattern = InlinePattern::new(r"\.css$").unwrap();
        let assets = assets(&[("app.js", "run()")]);
        let mut consumed = Vec::new();

        let tags = [
            HtmlTag::script_reference("app.js"),
            HtmlTag::new("meta", false).with_attribute("charset", "utf-8"),
            HtmlTag::new(TagName::Script, true).with_inner_html("inline()"),
        ];
        for tag in &tags {
            let out = process_tag(tag, &pattern, &assets, &ctx(), &mut consumed).unwrap();
            assert_eq!(&out, tag);
        }
        assert!(consumed.is_empty());
    }

    #[test]
    fn test_duplicate_reference_consumed_once() {
        let pattern = InlinePattern::new(r"app\.js$").unwrap();
        let assets = assets(&[("app.js", "run()")]);

        let head = [HtmlTag::script_reference("app.js")];
        let body = [HtmlTag::script_reference("app.js")];
        let out = rewrite_tags(&head, &body, &pattern, &assets, &ctx()).unwrap();

        assert_eq!(out.head[0].inner_html.as_deref(), Some("run()"));
        assert_eq!(out.body[0].inner_html.as_deref(), Some("run()"));
        assert_eq!(out.inlined(), 1);
    }

    #[test]
    fn test_binary_asset_is_stringified() {
        let pattern = InlinePattern::new(r"\.css$").unwrap();
        let mut assets = AssetMap::new();
        assets.insert("a.css".to_string(), Asset::bytes(b"p{color:red}".to_vec()));
        let mut consumed = Vec::new();

        let tag = process_tag(
            &HtmlTag::stylesheet_reference("a.css"),
            &pattern,
            &assets,
            &ctx(),
            &mut consumed,
        )
        .unwrap();

        assert_eq!(tag.inner_html.as_deref(), Some("p{color:red}"));
        assert_eq!(tag.attribute("type"), Some(STYLE_MIME_TYPE));
        assert_eq!(tag.attributes.len(), 1);
    }

    #[test]
    fn test_unresolved_reference_fails_the_document() {
        let pattern = InlinePattern::new(r"\.js$").unwrap();
        let assets = assets(&[("other.js", "x")]);

        let head = [HtmlTag::script_reference("missing.js")];
        let err = rewrite_tags(&head, &[], &pattern, &assets, &ctx()).unwrap_err();

        match err {
            InlineError::UnresolvedAsset {
                reference,
                asset_name,
            } => {
                assert_eq!(reference, "missing.js");
                assert_eq!(asset_name, "missing.js");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
