//! Server manifest generation
//!
//! Flattens a route tree into specificity-ordered lists of named regexes a
//! request dispatcher can test in order, and compiles them into a matcher.

mod named_regex;
mod sort;

use std::collections::HashSet;

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RouteError;
use crate::path::{get_context_key, normalize_path, strip_index_suffix};
use crate::route::{RouteKind, RouteNode};
pub use named_regex::{get_named_route_regex, NamedRegex};
use sort::compare_routes;

/// One dispatchable route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteInfo {
    pub source_key: String,
    /// Page path including group segments, e.g. `/(app)/index`
    pub page: String,
    pub named_regex: String,
    /// Capture name → param name
    pub route_keys: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub generated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_source_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MiddlewareInfo {
    pub source_key: String,
}

/// Ordered matcher lists for a route tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerManifest {
    pub api_routes: Vec<RouteInfo>,
    pub html_routes: Vec<RouteInfo>,
    pub not_found_routes: Vec<RouteInfo>,
    pub rewrites: Vec<RouteInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middleware: Option<MiddlewareInfo>,
}

/// A leaf with its absolute path
struct FlatRoute<'a> {
    path: String,
    node: &'a RouteNode,
}

/// Generate the server manifest for a route tree
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use fsroute::{get_routes, get_server_manifest, InMemoryRegistry, RouteOptions};
///
/// let registry = Arc::new(InMemoryRegistry::from_keys(["index", "a"]));
/// let root = get_routes(registry, &RouteOptions::default().skip_generated()).unwrap().unwrap();
/// let manifest = get_server_manifest(&root);
///
/// let patterns: Vec<_> = manifest.html_routes.iter().map(|r| r.named_regex.as_str()).collect();
/// assert_eq!(patterns, vec!["^/a(?:/)?$", "^/(?:/)?$"]);
/// ```
pub fn get_server_manifest(root: &RouteNode) -> ServerManifest {
    let mut flat = Vec::new();
    flatten_routes(root, "", &mut flat);

    let (mut api, mut rewrites, mut not_found, mut html) =
        (Vec::new(), Vec::new(), Vec::new(), Vec::new());

    for route in flat {
        match route.node.kind {
            RouteKind::Api => api.push(route),
            RouteKind::Rewrite => rewrites.push(route),
            RouteKind::Route if route.node.is_not_found() => not_found.push(route),
            RouteKind::Route => html.push(route),
            RouteKind::Layout => {}
        }
    }

    let manifest = ServerManifest {
        api_routes: build_list(api, true),
        html_routes: build_list(html, false),
        not_found_routes: build_list(not_found, false),
        rewrites: build_list(rewrites, false),
        middleware: root.middleware.as_ref().map(|middleware| MiddlewareInfo {
            source_key: middleware.source_key.clone(),
        }),
    };

    debug!(
        api = manifest.api_routes.len(),
        html = manifest.html_routes.len(),
        not_found = manifest.not_found_routes.len(),
        rewrites = manifest.rewrites.len(),
        "generated server manifest"
    );

    manifest
}

fn flatten_routes<'a>(node: &'a RouteNode, parent: &str, out: &mut Vec<FlatRoute<'a>>) {
    let path = match (parent.is_empty(), node.name.is_empty()) {
        (true, _) => node.name.clone(),
        (false, true) => parent.to_string(),
        (false, false) => format!("{}/{}", parent, node.name),
    };

    match node.kind {
        RouteKind::Layout => {
            for child in &node.children {
                flatten_routes(child, &path, out);
            }
        }
        RouteKind::Route | RouteKind::Api | RouteKind::Rewrite => out.push(FlatRoute { path, node }),
    }
}

/// Sort by specificity, then keep the first route per page
fn build_list(mut routes: Vec<FlatRoute<'_>>, static_first: bool) -> Vec<RouteInfo> {
    routes.sort_by(|a, b| compare_routes(&a.path, &b.path, static_first));

    let mut seen = HashSet::new();
    routes
        .into_iter()
        .filter_map(|route| {
            let page = match route.node.kind {
                RouteKind::Api => get_context_key(&route.node.source_key),
                _ => format!("/{}", route.path),
            };
            let unique = format!("/{}", strip_index_suffix(page.trim_start_matches('/')));
            if !seen.insert(unique) {
                return None;
            }

            // Api pages keep array groups, so one pattern covers every variant
            let regex = match route.node.kind {
                RouteKind::Api => get_named_route_regex(&page),
                _ => get_named_route_regex(&route.path),
            };
            Some(RouteInfo {
                source_key: route.node.source_key.clone(),
                page,
                named_regex: regex.pattern,
                route_keys: regex.route_keys,
                generated: route.node.is_generated,
                destination_source_key: route.node.destination_source_key.clone(),
            })
        })
        .collect()
}

/// Which manifest list a match came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Api,
    Html,
    Rewrite,
    NotFound,
}

/// Result of dispatching a request path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    pub kind: MatchKind,
    pub route: &'a RouteInfo,
    /// Param name → percent-decoded captured text
    pub params: IndexMap<String, String>,
}

struct CompiledRoute {
    kind: MatchKind,
    info: RouteInfo,
    regex: Regex,
}

/// Manifest with every pattern compiled, ready for dispatch
pub struct CompiledManifest {
    routes: Vec<CompiledRoute>,
}

impl CompiledManifest {
    /// Compile every pattern, in dispatch order: rewrites, api, html, not-found
    pub fn new(manifest: &ServerManifest) -> Result<Self, RouteError> {
        let lists = [
            (MatchKind::Rewrite, &manifest.rewrites),
            (MatchKind::Api, &manifest.api_routes),
            (MatchKind::Html, &manifest.html_routes),
            (MatchKind::NotFound, &manifest.not_found_routes),
        ];

        let routes = lists
            .into_iter()
            .flat_map(|(kind, list)| list.iter().map(move |info| (kind, info)))
            .map(|(kind, info)| {
                let regex = Regex::new(&info.named_regex).map_err(|source| RouteError::InvalidMatcher {
                    key: info.source_key.clone(),
                    source,
                })?;
                Ok(CompiledRoute {
                    kind,
                    info: info.clone(),
                    regex,
                })
            })
            .collect::<Result<Vec<_>, RouteError>>()?;

        Ok(Self { routes })
    }

    /// Find the first route matching a request path
    ///
    /// ```
    /// use std::sync::Arc;
    /// use fsroute::manifest::{CompiledManifest, MatchKind};
    /// use fsroute::{get_routes, get_server_manifest, InMemoryRegistry, RouteOptions};
    ///
    /// let registry = Arc::new(InMemoryRegistry::from_keys(["./users/[id].tsx"]));
    /// let root = get_routes(registry, &RouteOptions::default()).unwrap().unwrap();
    /// let matcher = CompiledManifest::new(&get_server_manifest(&root)).unwrap();
    ///
    /// let found = matcher.match_path("/users/42/").unwrap();
    /// assert_eq!(found.kind, MatchKind::Html);
    /// assert_eq!(found.params["id"], "42");
    ///
    /// let missing = matcher.match_path("/nothing/here").unwrap();
    /// assert_eq!(missing.kind, MatchKind::NotFound);
    /// ```
    pub fn match_path(&self, path: &str) -> Option<RouteMatch<'_>> {
        let path = normalize_path(path);

        self.routes.iter().find_map(|route| {
            let captures = route.regex.captures(&path)?;
            let params = route
                .info
                .route_keys
                .iter()
                .filter_map(|(key, name)| {
                    captures
                        .name(key)
                        .map(|value| (name.clone(), decode_param(value.as_str())))
                })
                .collect();

            Some(RouteMatch {
                kind: route.kind,
                route: &route.info,
                params,
            })
        })
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Percent-decoded capture, or the raw text when it is not valid UTF-8
fn decode_param(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

fn is_false(value: &bool) -> bool {
    !*value
}
