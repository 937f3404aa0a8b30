//! Shared constants for the inline source plugin
//!
//! Names and literal values used by the hook wiring and the tag rewrite,
//! kept in one place so the rewrite code never spells them inline.

/// Name the plugin taps host hooks under
///
/// Tapping twice under the same name on one compilation is a no-op.
pub const PLUGIN_NAME: &str = "html-inline-source";

/// `type` attribute of an inlined script tag
pub const SCRIPT_MIME_TYPE: &str = "text/javascript";

/// `type` attribute of an inlined style tag
pub const STYLE_MIME_TYPE: &str = "text/css";

/// Escaped form of the `<` that opens a `</script>` sequence inside inlined code
///
/// JavaScript string and regex literals read `\x3C` as `<`, while the HTML
/// tokenizer no longer sees a closing script tag.
pub const ESCAPED_LT: &str = r"\x3C";

/// Prefix of an embedded (base64 or percent-encoded) source map locator
pub const DATA_URL_PREFIX: &str = "data:";
