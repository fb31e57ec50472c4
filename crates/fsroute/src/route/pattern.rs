/// Segment matchers for file-based route names
///
/// Pure functional classification of single path segments.
/// All functions are **pure**: same input → same output, no side effects,
/// and they never panic on malformed input (unmatched input yields `None`).

/// Characters that may not appear inside a `[name]` dynamic segment
const DYNAMIC_NAME_FORBIDDEN: &[char] = &['[', ']', '(', ')', '.', '?', ':'];

/// Represents the different kinds of route segments
///
/// Functional sum type for pattern matching route segments.
///
/// # Examples
///
/// ```
/// use fsroute::route::pattern::{classify_segment, SegmentType};
///
/// assert_eq!(classify_segment("about"), SegmentType::Static("about".to_string()));
/// assert_eq!(classify_segment("[id]"), SegmentType::Dynamic("id".to_string()));
/// assert_eq!(classify_segment("[...slug]"), SegmentType::CatchAll("slug".to_string()));
/// assert_eq!(classify_segment("(app)"), SegmentType::Group("app".to_string()));
/// assert_eq!(
///     classify_segment("(a,b)"),
///     SegmentType::ArrayGroup(vec!["a".to_string(), "b".to_string()])
/// );
/// assert_eq!(classify_segment("+not-found"), SegmentType::NotFound);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentType {
    /// Static text segment
    Static(String),
    /// Group segment: (name)
    Group(String),
    /// Array group segment: (a,b)
    ArrayGroup(Vec<String>),
    /// Dynamic segment: [name]
    Dynamic(String),
    /// Catch-all segment: [...name]
    CatchAll(String),
    /// The `+not-found` fallback segment
    NotFound,
}

impl SegmentType {
    /// Whether the segment binds a request parameter
    pub fn is_dynamic(&self) -> bool {
        matches!(
            self,
            SegmentType::Dynamic(_) | SegmentType::CatchAll(_) | SegmentType::NotFound
        )
    }

    /// Whether the segment is a group (single or array)
    pub fn is_group(&self) -> bool {
        matches!(self, SegmentType::Group(_) | SegmentType::ArrayGroup(_))
    }
}

/// Classifies a segment into a segment type (pure function)
///
/// # Parsing Rules (evaluated in order)
///
/// 1. **Not found**: `+not-found`
/// 2. **Catch-all**: `[...name]`
/// 3. **Dynamic**: `[name]`
/// 4. **Array group**: `(a,b)`
/// 5. **Group**: `(name)`
/// 6. **Static**: any other text
pub fn classify_segment(segment: &str) -> SegmentType {
    if segment == "+not-found" {
        return SegmentType::NotFound;
    }
    if let Some(name) = match_deep_dynamic_route_name(segment) {
        return SegmentType::CatchAll(name.to_string());
    }
    if let Some(name) = match_dynamic_name(segment) {
        return SegmentType::Dynamic(name.to_string());
    }
    if let Some(inner) = match_array_group_name(segment) {
        return SegmentType::ArrayGroup(
            split_array_group(inner)
                .into_iter()
                .map(str::to_string)
                .collect(),
        );
    }
    match match_group_name(segment) {
        Some(name) => SegmentType::Group(name.to_string()),
        None => SegmentType::Static(segment.to_string()),
    }
}

/// Returns the name of a `[name]` segment
///
/// Deep segments (`[...name]`) and double brackets (`[[name]]`) do not match.
///
/// # Examples
///
/// ```
/// use fsroute::route::pattern::match_dynamic_name;
///
/// assert_eq!(match_dynamic_name("[id]"), Some("id"));
/// assert_eq!(match_dynamic_name("[...id]"), None);
/// assert_eq!(match_dynamic_name("[[id]]"), None);
/// assert_eq!(match_dynamic_name("id"), None);
/// ```
pub fn match_dynamic_name(segment: &str) -> Option<&str> {
    segment
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .filter(|inner| !inner.is_empty() && !inner.contains(DYNAMIC_NAME_FORBIDDEN))
}

/// Returns the name of a `[...name]` catch-all segment
///
/// # Examples
///
/// ```
/// use fsroute::route::pattern::match_deep_dynamic_route_name;
///
/// assert_eq!(match_deep_dynamic_route_name("[...slug]"), Some("slug"));
/// assert_eq!(match_deep_dynamic_route_name("[slug]"), None);
/// ```
pub fn match_deep_dynamic_route_name(segment: &str) -> Option<&str> {
    segment
        .strip_prefix("[...")
        .and_then(|s| s.strip_suffix(']'))
        .filter(|inner| !inner.is_empty() && !inner.contains('/'))
}

/// Returns the inner text of a single (non-array) group segment
///
/// Only the outermost parentheses are stripped, so `((x))` yields `(x)`.
///
/// # Examples
///
/// ```
/// use fsroute::route::pattern::match_group_name;
///
/// assert_eq!(match_group_name("(app)"), Some("app"));
/// assert_eq!(match_group_name("((x))"), Some("(x)"));
/// assert_eq!(match_group_name("(a,b)"), None);
/// assert_eq!(match_group_name("app"), None);
/// ```
pub fn match_group_name(segment: &str) -> Option<&str> {
    let inner = group_inner(segment)?;
    if has_top_level_comma(inner) {
        None
    } else {
        Some(inner)
    }
}

/// Returns the inner text of an array group segment
///
/// Requires at least two non-empty, top-level, comma-separated entries.
///
/// # Examples
///
/// ```
/// use fsroute::route::pattern::match_array_group_name;
///
/// assert_eq!(match_array_group_name("(a,b)"), Some("a,b"));
/// assert_eq!(match_array_group_name("((c),d,(e))"), Some("(c),d,(e)"));
/// assert_eq!(match_array_group_name("(a)"), None);
/// ```
pub fn match_array_group_name(segment: &str) -> Option<&str> {
    let inner = group_inner(segment)?;
    let parts = split_array_group(inner);
    if parts.len() > 1 && parts.iter().all(|part| !part.is_empty()) {
        Some(inner)
    } else {
        None
    }
}

/// Returns the name of the last single group segment in a path
///
/// ```
/// use fsroute::route::pattern::match_last_group_name;
///
/// assert_eq!(match_last_group_name("a/(b)/(c)"), Some("c"));
/// assert_eq!(match_last_group_name("a/b"), None);
/// ```
pub fn match_last_group_name(path: &str) -> Option<&str> {
    path.split('/').rev().find_map(match_group_name)
}

/// Whether a segment is any kind of group
pub fn is_group_segment(segment: &str) -> bool {
    group_inner(segment).is_some()
}

/// Splits array group contents on top-level commas, trimming each entry
///
/// ```
/// use fsroute::route::pattern::split_array_group;
///
/// assert_eq!(split_array_group("a, b"), vec!["a", "b"]);
/// assert_eq!(split_array_group("(c),d"), vec!["(c)", "d"]);
/// ```
pub fn split_array_group(inner: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (idx, ch) in inner.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(inner[start..idx].trim());
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(inner[start..].trim());
    parts
}

/// Strips one pair of wrapping parentheses when the contents are balanced
fn group_inner(segment: &str) -> Option<&str> {
    let inner = segment.strip_prefix('(')?.strip_suffix(')')?;
    if inner.is_empty() || inner.contains('/') || !is_balanced(inner) {
        return None;
    }
    Some(inner)
}

fn is_balanced(text: &str) -> bool {
    text.chars()
        .try_fold(0usize, |depth, ch| match ch {
            '(' => Some(depth + 1),
            ')' => depth.checked_sub(1),
            _ => Some(depth),
        })
        == Some(0)
}

fn has_top_level_comma(inner: &str) -> bool {
    split_array_group(inner).len() > 1
}
