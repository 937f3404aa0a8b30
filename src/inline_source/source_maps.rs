//! Source-map locator reconciliation
//!
//! An inlined asset no longer has an output path of its own, so a relative
//! `sourceMappingURL` inside it would resolve against the HTML document
//! instead. The locator is rewritten to a URL under the public path.

use std::borrow::Cow;
use std::path::Path;
use std::sync::LazyLock;

use regex::{Match, Regex};

use crate::utils::constants::DATA_URL_PREFIX;
use crate::utils::{join_url_path, normalize_path, to_slash};

/// Trailing `//# sourceMappingURL=…` or `/*# sourceMappingURL=… */` comment.
///
/// Group 1 holds the URL of the block form, group 2 the URL of the line form.
/// The legacy `@` marker and the block form split over two lines are accepted.
static SOURCE_MAP_LOCATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?:/\*(?:\s*\r?\n(?://)?)?[#@] sourceMappingURL=([^\s'"]*)\s*\*/|//[#@] sourceMappingURL=([^\s'"]*))\s*\z"#,
    )
    .expect("BUG: hardcoded source map locator regex is invalid")
});

/// Locate the URL token of the trailing source-map comment.
fn locator_token(source: &str) -> Option<Match<'_>> {
    let captures = SOURCE_MAP_LOCATOR.captures(source)?;
    captures
        .get(1)
        .or_else(|| captures.get(2))
        .filter(|token| !token.is_empty())
}

/// Extract the source-map URL from the trailing locator comment, if any.
///
/// # Examples
/// ```
/// # use html_inline_source::inline_source::source_maps::extract_source_map_url;
/// assert_eq!(
///     extract_source_map_url("a();\n//# sourceMappingURL=app.js.map\n"),
///     Some("app.js.map")
/// );
/// assert_eq!(extract_source_map_url("body{}"), None);
/// ```
#[must_use]
pub fn extract_source_map_url(source: &str) -> Option<&str> {
    locator_token(source).map(|token| token.as_str())
}

/// Rewrite a relative source-map URL so it resolves from the site root.
///
/// The URL is resolved against the directory of the asset's own output file,
/// made relative to the output directory and prefixed with the public path.
#[must_use]
pub fn corrected_map_url(
    map_url: &str,
    asset_name: &str,
    output_path: &Path,
    public_path: &str,
) -> String {
    let output_root = normalize_path(output_path);
    let asset_path = output_root.join(asset_name);
    let asset_dir = asset_path.parent().unwrap_or(&output_root);
    let map_path = normalize_path(&asset_dir.join(map_url));

    let relative = pathdiff::diff_paths(&map_path, &output_root).unwrap_or(map_path);

    // Platform separators must be gone before the URL join normalizes segments.
    join_url_path(public_path, &to_slash(&relative.to_string_lossy()))
}

/// Reconcile the trailing source-map locator of an asset about to be inlined.
///
/// Content without a locator, or whose locator is a `data:` URL or already
/// starts with `/`, is returned unchanged. Otherwise only the trailing token
/// is replaced; the whitespace and closing `*/` after it are kept.
#[must_use]
pub fn resolve_source_maps<'a>(
    source: &'a str,
    asset_name: &str,
    output_path: &Path,
    public_path: &str,
) -> Cow<'a, str> {
    let Some(token) = locator_token(source) else {
        return Cow::Borrowed(source);
    };

    let map_url = token.as_str();
    if map_url.starts_with(DATA_URL_PREFIX) || map_url.starts_with('/') {
        return Cow::Borrowed(source);
    }

    let corrected = corrected_map_url(map_url, asset_name, output_path, public_path);
    log::debug!("Rewrote source map URL of {asset_name}: {map_url} -> {corrected}");

    let mut rewritten = String::with_capacity(source.len() + corrected.len());
    rewritten.push_str(&source[..token.start()]);
    rewritten.push_str(&corrected);
    rewritten.push_str(&source[token.end()..]);
    Cow::Owned(rewritten)
}
