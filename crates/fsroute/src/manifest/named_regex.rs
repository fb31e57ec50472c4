/// Named regular expression generation
///
/// Converts an absolute route path (`(app)/users/[id]`) into a pattern with
/// named capture groups that matches request paths with or without group
/// segments.
use indexmap::IndexMap;

use crate::path::strip_index_suffix;
use crate::route::pattern::{classify_segment, SegmentType};

/// Capture names longer than this are replaced by generated keys
const MAX_KEY_LENGTH: usize = 30;

/// Param name used in the pattern for a `+not-found` segment
const NOT_FOUND_PARAM: &str = "not-found";

/// Regex source plus the capture name → param name mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedRegex {
    pub pattern: String,
    pub route_keys: IndexMap<String, String>,
}

/// Fold accumulator for pattern generation
#[derive(Default)]
struct RegexState {
    pattern: String,
    route_keys: IndexMap<String, String>,
    next_key: usize,
}

impl RegexState {
    fn with_static(mut self, segment: &str) -> Self {
        self.pattern.push('/');
        self.pattern.push_str(&regex::escape(segment));
        self
    }

    /// Group segments are optional in request paths
    fn with_group(mut self, names: &[String]) -> Self {
        let alternatives = names
            .iter()
            .map(|name| regex::escape(name))
            .collect::<Vec<_>>();

        if alternatives.len() == 1 {
            self.pattern
                .push_str(&format!(r"(?:/\({}\))?", alternatives[0]));
        } else {
            self.pattern
                .push_str(&format!(r"(?:/\((?:{})\))?", alternatives.join("|")));
        }
        self
    }

    fn with_param(mut self, name: &str) -> Self {
        let key = self.safe_key(name);
        self.pattern.push_str(&format!("/(?<{}>[^/]+?)", key));
        self
    }

    fn with_catch_all(mut self, name: &str) -> Self {
        let key = self.safe_key(name);
        self.pattern.push_str(&format!("(?:/(?<{}>.+?))?", key));
        self
    }

    /// Capture name for a param, recorded in `route_keys`
    ///
    /// Non-word characters are dropped. Names that end up empty, too long,
    /// starting with a digit or already taken get the next letter key.
    fn safe_key(&mut self, name: &str) -> String {
        let cleaned: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect();

        let invalid = cleaned.is_empty()
            || cleaned.len() > MAX_KEY_LENGTH
            || cleaned.starts_with(|c: char| c.is_ascii_digit())
            || self.route_keys.contains_key(&cleaned);

        let key = if invalid { self.next_letter_key() } else { cleaned };
        self.route_keys.insert(key.clone(), name.to_string());
        key
    }

    fn next_letter_key(&mut self) -> String {
        loop {
            let key = letter_key(self.next_key);
            self.next_key += 1;
            if !self.route_keys.contains_key(&key) {
                return key;
            }
        }
    }

    fn finalize(self) -> NamedRegex {
        let body = if self.pattern.is_empty() {
            "/".to_string()
        } else {
            self.pattern
        };

        NamedRegex {
            pattern: format!("^{}(?:/)?$", body),
            route_keys: self.route_keys,
        }
    }
}

/// `a`, `b`, … `z`, `aa`, `ab`, …
fn letter_key(index: usize) -> String {
    let mut n = index;
    let mut reversed = String::new();
    loop {
        reversed.push((b'a' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    reversed.chars().rev().collect()
}

/// Build the named regex for an absolute route path
///
/// # Examples
///
/// ```
/// use fsroute::manifest::get_named_route_regex;
///
/// assert_eq!(get_named_route_regex("index").pattern, "^/(?:/)?$");
/// assert_eq!(get_named_route_regex("a").pattern, "^/a(?:/)?$");
/// assert_eq!(
///     get_named_route_regex("(app)/[id]").pattern,
///     r"^(?:/\(app\))?/(?<id>[^/]+?)(?:/)?$"
/// );
/// ```
pub fn get_named_route_regex(path: &str) -> NamedRegex {
    let path = strip_index_suffix(path.trim_matches('/'));

    path.split('/')
        .filter(|segment| !segment.is_empty())
        .fold(RegexState::default(), |state, segment| {
            match classify_segment(segment) {
                SegmentType::Static(text) => state.with_static(&text),
                SegmentType::Group(name) => state.with_group(&[name]),
                SegmentType::ArrayGroup(names) => state.with_group(&names),
                SegmentType::Dynamic(name) => state.with_param(&name),
                SegmentType::CatchAll(name) => state.with_catch_all(&name),
                SegmentType::NotFound => state.with_catch_all(NOT_FOUND_PARAM),
            }
        })
        .finalize()
}
