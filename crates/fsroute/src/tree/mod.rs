//! Route tree builder
//!
//! Converts the registry keys into a tree of [`RouteNode`]s in two steps:
//!
//! 1. Insert every key into a directory tree. Array groups are expanded and
//!    each route keeps one candidate per platform specificity.
//! 2. Flatten the directory tree. Routes in directories without a `_layout`
//!    are hoisted to the nearest layout and named relative to it. When several
//!    platform candidates exist the most specific one is used.
//!
//! Rewrites, root middleware and entry points are resolved around these steps.

mod directory;
mod entry_points;
mod middleware;
mod rewrites;

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::config::RouteOptions;
use crate::error::RouteError;
use crate::registry::RouteRegistry;
use crate::route::{get_file_meta, FileKind, RouteNode};
use directory::Directory;

/// Source key of the generated root layout
pub const GENERATED_LAYOUT_KEY: &str = "fsroute/generated/_layout.js";
/// Source key of the generated sitemap screen
pub const GENERATED_SITEMAP_KEY: &str = "fsroute/generated/_sitemap.js";
/// Source key of the generated not-found screen
pub const GENERATED_NOT_FOUND_KEY: &str = "fsroute/generated/+not-found.js";

// Top level document and intent files are never routes
static ROOT_SPECIAL_FILES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\./\+(html|native-intent)\.[tj]sx?$").unwrap());

static API_FILES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\+api\.[tj]sx?$").unwrap());

static MIDDLEWARE_FILES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\+middleware\.[tj]sx?$").unwrap());

/// Build the route tree for a registry
///
/// Returns `Ok(None)` when the registry holds no usable files.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use fsroute::{get_routes, InMemoryRegistry, RouteOptions};
///
/// let registry = Arc::new(InMemoryRegistry::from_keys(["./index.tsx", "./about.tsx"]));
/// let root = get_routes(registry, &RouteOptions::default()).unwrap().unwrap();
///
/// let names: Vec<_> = root.children.iter().map(|c| c.name.as_str()).collect();
/// assert_eq!(names, vec!["index", "about", "_sitemap", "+not-found"]);
/// ```
pub fn get_routes(
    registry: Arc<dyn RouteRegistry>,
    options: &RouteOptions,
) -> Result<Option<RouteNode>, RouteError> {
    let ignore = ignore_list(options)?;

    let mut root = Directory::default();
    let mut has_routes = false;
    let mut has_files = false;
    let mut files = Vec::new();
    let mut middleware = Vec::new();

    for key in registry.keys() {
        if ignore.iter().any(|pattern| pattern.is_match(&key)) {
            debug!(key = %key, "ignored");
            continue;
        }
        has_files = true;

        let Some(meta) = get_file_meta(&key, options)? else {
            debug!(key = %key, "skipped platform file");
            continue;
        };

        if meta.kind == FileKind::Middleware {
            middleware.push((key, meta));
            continue;
        }

        has_routes |= root.insert_file(&key, &meta, &registry, options)?;
        files.push((key, meta));
    }

    if !has_files {
        return Ok(None);
    }

    rewrites::apply_rewrites(&mut root, &files, &registry, options)?;
    root.append_generated(has_routes, options);

    let mut tree = root.into_root()?;
    tree.middleware = middleware::resolve_middleware(&middleware, &registry, options)?;

    if !options.ignore_entry_points {
        entry_points::append_entry_points(&mut tree, &[])?;
    }

    Ok(Some(tree))
}

/// Build the route tree without generated `_sitemap` and `+not-found` routes
pub fn get_exact_routes(
    registry: Arc<dyn RouteRegistry>,
    options: &RouteOptions,
) -> Result<Option<RouteNode>, RouteError> {
    let options = RouteOptions {
        skip_generated: true,
        ..options.clone()
    };
    get_routes(registry, &options)
}

/// Registry keys matching any of these patterns are skipped
fn ignore_list(options: &RouteOptions) -> Result<Vec<Regex>, RouteError> {
    let mut ignore = vec![(*ROOT_SPECIAL_FILES).clone()];

    for pattern in &options.ignore {
        let compiled = Regex::new(pattern).map_err(|source| RouteError::InvalidIgnorePattern {
            pattern: pattern.clone(),
            source,
        })?;
        ignore.push(compiled);
    }

    if !options.preserve_api_routes {
        ignore.push((*API_FILES).clone());
    }

    if !options.unstable_use_server_middleware {
        ignore.push((*MIDDLEWARE_FILES).clone());
    }

    Ok(ignore)
}
