//! Type definitions for asset inlining

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

/// Name of an HTML tag
///
/// The rewrite only cares about `script`, `link` and `style`; every other
/// element passes through as [`TagName::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TagName {
    Script,
    Link,
    Style,
    Other(String),
}

impl TagName {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            TagName::Script => "script",
            TagName::Link => "link",
            TagName::Style => "style",
            TagName::Other(name) => name,
        }
    }
}

impl From<String> for TagName {
    fn from(name: String) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "script" => TagName::Script,
            "link" => TagName::Link,
            "style" => TagName::Style,
            _ => TagName::Other(name),
        }
    }
}

impl From<&str> for TagName {
    fn from(name: &str) -> Self {
        TagName::from(name.to_string())
    }
}

impl From<TagName> for String {
    fn from(name: TagName) -> Self {
        name.as_str().to_string()
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of a tag attribute
///
/// Boolean attributes (`defer`, `async`) are rendered bare when `true` and
/// omitted when `false`. Numeric values from the host are kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Text(String),
    Flag(bool),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAttributeValue {
    Text(String),
    Flag(bool),
    Number(serde_json::Number),
}

impl<'de> Deserialize<'de> for AttributeValue {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawAttributeValue::deserialize(deserializer)? {
            RawAttributeValue::Text(text) => AttributeValue::Text(text),
            RawAttributeValue::Flag(flag) => AttributeValue::Flag(flag),
            RawAttributeValue::Number(number) => AttributeValue::Text(number.to_string()),
        })
    }
}

impl AttributeValue {
    /// String value of the attribute, `None` for boolean attributes
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(value) => Some(value),
            AttributeValue::Flag(_) => None,
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Flag(value)
    }
}

/// Classification of a tag for the inline rewrite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// `<script src="…">`
    ScriptReference,
    /// `<link href="…">`
    StylesheetReference,
    /// `<script>` carrying its code inline
    InlineScript,
    /// `<style>`
    InlineStyle,
    Other,
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagKind::ScriptReference => write!(f, "script reference"),
            TagKind::StylesheetReference => write!(f, "stylesheet reference"),
            TagKind::InlineScript => write!(f, "inline script"),
            TagKind::InlineStyle => write!(f, "inline style"),
            TagKind::Other => write!(f, "other"),
        }
    }
}

/// An HTML tag as handed over by the host's tag-alteration hook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HtmlTag {
    pub tag_name: TagName,
    #[serde(default)]
    pub attributes: IndexMap<String, AttributeValue>,
    #[serde(default)]
    pub close_tag: bool,
    #[serde(default, rename = "innerHTML", skip_serializing_if = "Option::is_none")]
    pub inner_html: Option<String>,
}

impl HtmlTag {
    /// Tag with no attributes and no content
    pub fn new(tag_name: impl Into<TagName>, close_tag: bool) -> Self {
        Self {
            tag_name: tag_name.into(),
            attributes: IndexMap::new(),
            close_tag,
            inner_html: None,
        }
    }

    /// `<script src="…"></script>`
    pub fn script_reference(src: impl Into<String>) -> Self {
        Self::new(TagName::Script, true).with_attribute("src", AttributeValue::Text(src.into()))
    }

    /// `<link href="…" rel="stylesheet">`
    pub fn stylesheet_reference(href: impl Into<String>) -> Self {
        Self::new(TagName::Link, false)
            .with_attribute("href", AttributeValue::Text(href.into()))
            .with_attribute("rel", "stylesheet")
    }

    #[must_use]
    pub fn with_attribute(mut self, name: &str, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(name.to_string(), value.into());
        self
    }

    #[must_use]
    pub fn with_inner_html(mut self, inner_html: impl Into<String>) -> Self {
        self.inner_html = Some(inner_html.into());
        self
    }

    /// String value of an attribute; boolean attributes yield `None`
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).and_then(AttributeValue::as_text)
    }

    #[must_use]
    pub fn kind(&self) -> TagKind {
        match self.tag_name {
            TagName::Script if self.attributes.contains_key("src") => TagKind::ScriptReference,
            TagName::Script => TagKind::InlineScript,
            TagName::Link if self.attributes.contains_key("href") => TagKind::StylesheetReference,
            TagName::Style => TagKind::InlineStyle,
            _ => TagKind::Other,
        }
    }
}

impl fmt::Display for HtmlTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag_name)?;
        for (name, value) in &self.attributes {
            match value {
                AttributeValue::Text(text) => write!(
                    f,
                    " {name}=\"{}\"",
                    html_escape::encode_double_quoted_attribute(text)
                )?,
                AttributeValue::Flag(true) => write!(f, " {name}")?,
                AttributeValue::Flag(false) => {}
            }
        }
        f.write_str(">")?;
        if let Some(inner_html) = &self.inner_html {
            f.write_str(inner_html)?;
        }
        if self.close_tag {
            write!(f, "</{}>", self.tag_name)?;
        }
        Ok(())
    }
}

/// Content of a build output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetSource {
    Text(String),
    Bytes(Vec<u8>),
}

/// A named in-memory build output pending emission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    source: AssetSource,
}

impl Asset {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            source: AssetSource::Text(content.into()),
        }
    }

    pub fn bytes(content: impl Into<Vec<u8>>) -> Self {
        Self {
            source: AssetSource::Bytes(content.into()),
        }
    }

    /// Textual content; byte content is decoded as lossy UTF-8
    #[must_use]
    pub fn source(&self) -> Cow<'_, str> {
        match &self.source {
            AssetSource::Text(text) => Cow::Borrowed(text),
            AssetSource::Bytes(bytes) => String::from_utf8_lossy(bytes),
        }
    }

    #[must_use]
    pub fn size(&self) -> usize {
        match &self.source {
            AssetSource::Text(text) => text.len(),
            AssetSource::Bytes(bytes) => bytes.len(),
        }
    }
}

/// Output asset set of one compilation, keyed by asset name
pub type AssetMap = BTreeMap<String, Asset>;

/// Regular expression selecting which referenced assets get inlined
#[derive(Debug, Clone)]
pub struct InlinePattern(Regex);

impl InlinePattern {
    /// Compile the `inlineSource` option of a document
    pub fn new(pattern: &str) -> Result<Self, InlineError> {
        Regex::new(pattern)
            .map(Self)
            .map_err(|source| InlineError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })
    }

    #[must_use]
    pub fn is_match(&self, reference: &str) -> bool {
        self.0.is_match(reference)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Errors that fail the processing of one HTML document
#[derive(Debug, thiserror::Error)]
pub enum InlineError {
    /// A tag matched the inline pattern but the asset set has no such asset
    #[error("No asset named '{asset_name}' for inlined reference '{reference}'")]
    UnresolvedAsset {
        reference: String,
        asset_name: String,
    },

    /// The `inlineSource` option is not a valid regular expression
    #[error("Invalid inlineSource pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

pub type Result<T, E = InlineError> = std::result::Result<T, E>;

/// Result of rewriting one document's tag lists
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewrittenTags {
    pub head: Vec<HtmlTag>,
    pub body: Vec<HtmlTag>,
    /// Asset keys inlined into the document, each listed once
    pub consumed: Vec<String>,
}

impl RewrittenTags {
    /// Number of distinct assets inlined
    #[must_use]
    pub fn inlined(&self) -> usize {
        self.consumed.len()
    }

    /// Check if any tag was rewritten
    #[must_use]
    pub fn has_inlined(&self) -> bool {
        !self.consumed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_kind_classification() {
        assert_eq!(HtmlTag::script_reference("a.js").kind(), TagKind::ScriptReference);
        assert_eq!(HtmlTag::stylesheet_reference("a.css").kind(), TagKind::StylesheetReference);
        assert_eq!(
            HtmlTag::new("script", true).with_inner_html("run()").kind(),
            TagKind::InlineScript
        );
        assert_eq!(HtmlTag::new("STYLE", true).kind(), TagKind::InlineStyle);
        assert_eq!(HtmlTag::new(TagName::Link, false).kind(), TagKind::Other);
        assert_eq!(HtmlTag::new("meta", false).kind(), TagKind::Other);
    }

    #[test]
    fn test_tag_kind_display() {
        assert_eq!(TagKind::ScriptReference.to_string(), "script reference");
        assert_eq!(TagKind::InlineStyle.to_string(), "inline style");
    }

    #[test]
    fn test_numeric_attribute_is_kept_as_text() {
        let tag: HtmlTag =
            serde_json::from_str(r#"{"tagName": "img", "attributes": {"width": 100, "alt": "x"}}"#)
                .unwrap();
        assert_eq!(tag.attribute("width"), Some("100"));
        assert_eq!(tag.to_string(), r#"<img width="100" alt="x">"#);
    }
}
