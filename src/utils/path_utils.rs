//! Path helpers for asset names, public URLs and output files.
//!
//! Asset names and public URLs are always `/`-separated, whatever the host
//! platform, so they are handled as posix strings here. Output directory
//! paths are real filesystem paths and go through [`std::path`].

use std::path::{Component, Path, PathBuf};

/// Split a posix path into its lexically normalized segments.
///
/// Returns whether the path was rooted, plus the segments with `.` removed and
/// `..` applied. A `..` that would climb above a rooted path is dropped; on a
/// relative path it is kept so the result still points at the same place.
fn posix_segments(path: &str) -> (bool, Vec<&str>) {
    let rooted = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|last| *last != "..") {
                    segments.pop();
                } else if !rooted {
                    segments.push("..");
                }
            }
            s => segments.push(s),
        }
    }

    (rooted, segments)
}

/// Relative posix path leading from `from` to `to`.
///
/// Both paths are normalized first. A rooted and an unrooted path are treated
/// as sharing the same root, so `posix_relative("/", "bundle.js")` is
/// `bundle.js`. Returns an empty string when both name the same location.
///
/// # Examples
/// ```
/// # use html_inline_source::utils::posix_relative;
/// assert_eq!(posix_relative("/static/", "/static/js/app.js"), "js/app.js");
/// assert_eq!(posix_relative("", "./bundle.js"), "bundle.js");
/// assert_eq!(posix_relative("/a/b", "/a/c.js"), "../c.js");
/// ```
#[must_use]
pub fn posix_relative(from: &str, to: &str) -> String {
    let (_, from_segments) = posix_segments(from);
    let (_, to_segments) = posix_segments(to);

    let common = from_segments
        .iter()
        .zip(&to_segments)
        .take_while(|(a, b)| a == b)
        .count();

    std::iter::repeat_n("..", from_segments.len() - common)
        .chain(to_segments[common..].iter().copied())
        .collect::<Vec<_>>()
        .join("/")
}

/// Canonical relative form of an asset key (`./js/../app.js` becomes `app.js`).
#[must_use]
pub fn normalize_asset_key(key: &str) -> String {
    posix_relative("", &to_slash(key))
}

/// Directory part of a document filename, or `None` when the document sits
/// at the output root.
///
/// # Examples
/// ```
/// # use html_inline_source::utils::dirname;
/// assert_eq!(dirname("index.html"), None);
/// assert_eq!(dirname("pages/about/index.html"), Some("pages/about"));
/// ```
#[must_use]
pub fn dirname(filename: &str) -> Option<&str> {
    filename.rfind('/').map(|idx| &filename[..idx])
}

/// Split a full URL into its `scheme://host` origin and its path.
///
/// A plain path has an empty origin.
fn split_origin(url: &str) -> (&str, &str) {
    let Some(scheme_end) = url.find("://").map(|idx| idx + 3) else {
        return ("", url);
    };
    match url[scheme_end..].find('/') {
        Some(idx) => url.split_at(scheme_end + idx),
        None => (url, ""),
    }
}

/// Join a relative path onto a public URL prefix and normalize the result.
///
/// An empty prefix yields `relative` unchanged. The prefix may be a path
/// (`/static/`) or a full URL (`https://cdn.example.com/`); its scheme and
/// host are left untouched and only the path part is normalized. `..`
/// segments never climb above a rooted prefix.
///
/// # Examples
/// ```
/// # use html_inline_source::utils::join_url_path;
/// assert_eq!(join_url_path("/static/", "js/app.js.map"), "/static/js/app.js.map");
/// assert_eq!(join_url_path("/static/", "../maps/a.js.map"), "/maps/a.js.map");
/// ```
#[must_use]
pub fn join_url_path(prefix: &str, relative: &str) -> String {
    if prefix.is_empty() {
        return relative.to_string();
    }
    if relative.is_empty() {
        return prefix.to_string();
    }

    let (origin, path) = split_origin(prefix);
    let joined = format!("{}/{relative}", path.trim_end_matches('/'));
    let (rooted, segments) = posix_segments(&joined);
    let normalized = segments.join("/");

    if rooted || !origin.is_empty() {
        format!("{origin}/{normalized}")
    } else {
        normalized
    }
}

/// Convert every path separator to a forward slash.
///
/// Windows extended-length prefixes (`\\?\C:\…`, `\\?\UNC\server\…`) are
/// stripped first since they never belong in a URL.
#[must_use]
pub fn to_slash(path: &str) -> String {
    let cleaned = if let Some(stripped) = path.strip_prefix(r"\\?\UNC\") {
        format!("//{stripped}")
    } else if let Some(stripped) = path.strip_prefix(r"\\?\") {
        stripped.to_string()
    } else {
        path.to_string()
    };

    cleaned.replace('\\', "/")
}

/// Lexically normalize a filesystem path, resolving `.` and `..` without
/// touching the disk.
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(components.last(), Some(Component::Normal(_))) {
                    components.pop();
                } else if !matches!(
                    components.last(),
                    Some(Component::RootDir | Component::Prefix(_))
                ) {
                    components.push(component);
                }
            }
            c => components.push(c),
        }
    }

    components.iter().collect()
}
