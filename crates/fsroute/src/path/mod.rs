/// Path utilities for file keys and request paths
///
/// All functions are **pure**: given same input, always produce same output with no side effects.
use std::borrow::Cow;

use crate::route::pattern::is_group_segment;

/// Source file extensions recognized as route modules
pub const SUPPORTED_EXTENSIONS: &[&str] = &[".tsx", ".ts", ".jsx", ".js"];

/// Validates if a request path is in canonical form
///
/// # Rules
///
/// - Must start with `/`
/// - Must not contain `//` or `\`
/// - Must not end with `/` (except root `/`)
/// - Must not be empty
///
/// # Examples
///
/// ```
/// use fsroute::path::is_valid_path;
///
/// assert!(is_valid_path("/"));
/// assert!(is_valid_path("/users/123"));
///
/// assert!(!is_valid_path(""));
/// assert!(!is_valid_path("about"));
/// assert!(!is_valid_path("/about/"));
/// assert!(!is_valid_path("/about//page"));
/// ```
pub fn is_valid_path(path: &str) -> bool {
    if path.is_empty() || !path.starts_with('/') {
        return false;
    }

    if path.contains("//") || path.contains('\\') {
        return false;
    }

    path == "/" || !path.ends_with('/')
}

/// Normalize a request path to canonical form
///
/// Returns `Cow::Borrowed` when input is already valid (zero allocations).
///
/// # Examples
///
/// ```
/// use fsroute::path::normalize_path;
/// use std::borrow::Cow;
///
/// assert!(matches!(normalize_path("/about"), Cow::Borrowed("/about")));
/// assert_eq!(normalize_path("/about/"), "/about");
/// assert_eq!(normalize_path("\\users\\123"), "/users/123");
/// assert_eq!(normalize_path(""), "/");
/// ```
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    if is_valid_path(path) {
        return Cow::Borrowed(path);
    }

    let normalized = path
        .replace('\\', "/")
        .split('/')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    if normalized.is_empty() {
        Cow::Borrowed("/")
    } else {
        Cow::Owned(format!("/{}", normalized))
    }
}

/// Strips a supported extension and an optional `+api` marker before it
///
/// ```
/// use fsroute::path::remove_supported_extensions;
///
/// assert_eq!(remove_supported_extensions("a/b.tsx"), "a/b");
/// assert_eq!(remove_supported_extensions("users+api.ts"), "users");
/// assert_eq!(remove_supported_extensions("index.ios.js"), "index.ios");
/// assert_eq!(remove_supported_extensions("readme.md"), "readme.md");
/// ```
pub fn remove_supported_extensions(name: &str) -> &str {
    match strip_extension(name) {
        Some(stem) => stem.strip_suffix("+api").unwrap_or(stem),
        None => name,
    }
}

/// Strips a supported extension, keeping any `+api` marker
pub fn strip_extension(name: &str) -> Option<&str> {
    SUPPORTED_EXTENSIONS
        .iter()
        .find_map(|ext| name.strip_suffix(ext))
}

/// Strips leading `./` and `../` segments
///
/// ```
/// use fsroute::path::remove_file_system_dots;
///
/// assert_eq!(remove_file_system_dots("./a/b"), "a/b");
/// assert_eq!(remove_file_system_dots("../../a"), "a");
/// ```
pub fn remove_file_system_dots(path: &str) -> &str {
    let mut rest = path;
    loop {
        if let Some(stripped) = rest.strip_prefix("./") {
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix("../") {
            rest = stripped;
        } else {
            return rest;
        }
    }
}

/// Converts a registry key into a route name
///
/// ```
/// use fsroute::path::get_name_from_file_path;
///
/// assert_eq!(get_name_from_file_path("./(app)/index.tsx"), "(app)/index");
/// assert_eq!(get_name_from_file_path("./api/users+api.ts"), "api/users");
/// ```
pub fn get_name_from_file_path(path: &str) -> &str {
    remove_supported_extensions(remove_file_system_dots(path))
}

/// Page key used by the manifest: `/`-prefixed, without a trailing `_layout`
///
/// ```
/// use fsroute::path::get_context_key;
///
/// assert_eq!(get_context_key("./(app)/index.tsx"), "/(app)/index");
/// assert_eq!(get_context_key("./a/_layout.tsx"), "/a");
/// assert_eq!(get_context_key("./_layout.tsx"), "/");
/// ```
pub fn get_context_key(path: &str) -> String {
    let name = get_name_from_file_path(path);
    let name = name
        .strip_suffix("_layout")
        .map(|stem| stem.trim_end_matches('/'))
        .unwrap_or(name);
    format!("/{}", name)
}

/// Drops every group segment, keeping a leading slash when present
///
/// ```
/// use fsroute::path::strip_group_segments_from_path;
///
/// assert_eq!(strip_group_segments_from_path("/(app)/(a,b)/home"), "/home");
/// assert_eq!(strip_group_segments_from_path("(app)/index"), "index");
/// assert_eq!(strip_group_segments_from_path("(app)"), "");
/// ```
pub fn strip_group_segments_from_path(path: &str) -> String {
    let (prefix, rest) = match path.strip_prefix('/') {
        Some(rest) => ("/", rest),
        None => ("", path),
    };

    let kept = rest
        .split('/')
        .filter(|segment| !segment.is_empty() && !is_group_segment(segment))
        .collect::<Vec<_>>()
        .join("/");

    format!("{}{}", prefix, kept)
}

/// Removes a trailing `index` segment
///
/// ```
/// use fsroute::path::strip_index_suffix;
///
/// assert_eq!(strip_index_suffix("a/index"), "a");
/// assert_eq!(strip_index_suffix("index"), "");
/// assert_eq!(strip_index_suffix("reindex"), "reindex");
/// ```
pub fn strip_index_suffix(path: &str) -> &str {
    if path == "index" {
        return "";
    }
    path.strip_suffix("/index").unwrap_or(path)
}
