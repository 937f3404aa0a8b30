//! Configuration consumed from the host build

use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize};

use crate::inline_source::types::HtmlTag;

/// Output settings of a compilation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputOptions {
    /// Directory assets are emitted to
    pub path: PathBuf,
    /// URL prefix assets are served under
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_path: Option<String>,
}

impl OutputOptions {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            public_path: None,
        }
    }

    #[must_use]
    pub fn with_public_path(mut self, public_path: impl Into<String>) -> Self {
        self.public_path = Some(public_path.into());
        self
    }

    /// Public URL prefix, empty when not configured
    #[must_use]
    pub fn public_path(&self) -> &str {
        self.public_path.as_deref().unwrap_or("")
    }
}

/// Per-document options of the HTML generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentOptions {
    /// Pattern selecting the references to inline
    ///
    /// A non-empty string enables inlining. Any other value (`false`, `0`,
    /// `null`, `""`, a missing key) leaves the document untouched.
    #[serde(
        default,
        deserialize_with = "deserialize_inline_source",
        skip_serializing_if = "Option::is_none"
    )]
    pub inline_source: Option<String>,

    /// Output filename of the document, relative to the output directory
    #[serde(default = "default_filename")]
    pub filename: String,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            inline_source: None,
            filename: default_filename(),
        }
    }
}

impl DocumentOptions {
    #[must_use]
    pub fn with_inline_source(mut self, pattern: impl Into<String>) -> Self {
        self.inline_source = Some(pattern.into()).filter(|p: &String| !p.is_empty());
        self
    }

    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }
}

fn default_filename() -> String {
    "index.html".to_string()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawInlineSource {
    Pattern(String),
    Other(serde::de::IgnoredAny),
}

fn deserialize_inline_source<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawInlineSource>::deserialize(deserializer)? {
        Some(RawInlineSource::Pattern(pattern)) if !pattern.is_empty() => Some(pattern),
        Some(RawInlineSource::Pattern(_) | RawInlineSource::Other(_)) | None => None,
    })
}

/// Reference to the HTML generator instance handling a document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HtmlPluginRef {
    #[serde(default)]
    pub options: DocumentOptions,
}

/// Payload of the tag-alteration hook, one per HTML document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HtmlPluginData {
    #[serde(default)]
    pub head: Vec<HtmlTag>,
    #[serde(default)]
    pub body: Vec<HtmlTag>,
    #[serde(default)]
    pub plugin: HtmlPluginRef,
    #[serde(default)]
    pub output_name: String,
}

impl HtmlPluginData {
    pub fn new(options: DocumentOptions) -> Self {
        Self {
            output_name: options.filename.clone(),
            plugin: HtmlPluginRef { options },
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_head(mut self, head: Vec<HtmlTag>) -> Self {
        self.head = head;
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Vec<HtmlTag>) -> Self {
        self.body = body;
        self
    }

    /// Parse a payload handed over by the host as JSON
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    #[must_use]
    pub fn options(&self) -> &DocumentOptions {
        &self.plugin.options
    }
}
