/// Intermediate directory tree
///
/// Registry files are first inserted into a tree keyed by raw directory
/// segment, one slot per platform specificity. Flattening then hoists files
/// into the nearest layout and makes their names relative to it.
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, warn};

use super::{GENERATED_LAYOUT_KEY, GENERATED_NOT_FOUND_KEY, GENERATED_SITEMAP_KEY};
use crate::config::RouteOptions;
use crate::error::RouteError;
use crate::registry::RouteRegistry;
use crate::route::{extrapolate_groups, generate_dynamic, FileKind, FileMeta, RouteKind, RouteLoader, RouteNode};

/// Candidates for one route, indexed by platform specificity
pub(crate) type Slots = [Option<RouteNode>; 3];

#[derive(Debug, Default)]
pub(crate) struct Directory {
    pub layout: Option<Slots>,
    pub files: IndexMap<String, Slots>,
    pub subdirectories: IndexMap<String, Directory>,
}

impl Directory {
    /// Walk to a nested directory, creating missing ones
    pub fn descend(&mut self, parts: &[&str]) -> &mut Directory {
        parts.iter().fold(self, |directory, part| {
            directory
                .subdirectories
                .entry(part.to_string())
                .or_default()
        })
    }

    /// Insert every array-group expansion of a file
    ///
    /// Returns `true` when at least one screen route was added.
    pub fn insert_file(
        &mut self,
        key: &str,
        meta: &FileMeta,
        registry: &Arc<dyn RouteRegistry>,
        options: &RouteOptions,
    ) -> Result<bool, RouteError> {
        let mut inserted_route = false;

        for route in extrapolate_groups(&meta.route)? {
            let parts: Vec<&str> = route.split('/').collect();
            let directory = self.descend(&parts[..parts.len() - 1]);

            match meta.kind {
                FileKind::Layout => {
                    let slots = directory.layout.get_or_insert_with(Slots::default);
                    if let Some(existing) = &slots[meta.specificity] {
                        report_conflict("layouts", key, &existing.source_key, &route, options)?;
                        continue;
                    }
                    let name = route
                        .strip_suffix("_layout")
                        .map(|stem| stem.trim_end_matches('/'))
                        .unwrap_or(&route);
                    slots[meta.specificity] =
                        Some(file_node(RouteKind::Layout, name, key, registry, options));
                }
                FileKind::Api => {
                    let slots = directory
                        .files
                        .entry(format!("{}+api", route))
                        .or_default();
                    if let Some(existing) = &slots[0] {
                        report_conflict("API route file", key, &existing.source_key, &route, options)?;
                        continue;
                    }
                    slots[0] = Some(file_node(RouteKind::Api, &route, key, registry, options));
                }
                FileKind::Route | FileKind::NotFound => {
                    let slots = directory.files.entry(route.clone()).or_default();
                    if let Some(existing) = &slots[meta.specificity] {
                        report_conflict("route files", key, &existing.source_key, &route, options)?;
                        continue;
                    }
                    slots[meta.specificity] =
                        Some(file_node(RouteKind::Route, &route, key, registry, options));
                    inserted_route = true;
                }
                FileKind::Middleware => {}
            }

            debug!(key, route = %route, "inserted route file");
        }

        Ok(inserted_route)
    }

    /// Add the generated root layout, `_sitemap` and `+not-found` where missing
    pub fn append_generated(&mut self, has_routes: bool, options: &RouteOptions) {
        if self.layout.is_none() {
            self.layout = Some([
                Some(RouteNode::generated(RouteKind::Layout, "", GENERATED_LAYOUT_KEY)),
                None,
                None,
            ]);
        }

        if options.skip_generated {
            return;
        }

        if has_routes && options.sitemap && !self.files.contains_key("_sitemap") {
            self.files.insert(
                "_sitemap".to_string(),
                [
                    Some(RouteNode::generated(RouteKind::Route, "_sitemap", GENERATED_SITEMAP_KEY)),
                    None,
                    None,
                ],
            );
        }

        if options.not_found && !self.files.contains_key("+not-found") {
            self.files.insert(
                "+not-found".to_string(),
                [
                    Some(RouteNode::generated(RouteKind::Route, "+not-found", GENERATED_NOT_FOUND_KEY)),
                    None,
                    None,
                ],
            );
        }
    }

    /// Flatten into the root layout node
    pub fn into_root(mut self) -> Result<RouteNode, RouteError> {
        let root = match self.layout.take() {
            Some(slots) => most_specific(slots)?,
            None => None,
        };
        let mut root = root.unwrap_or_else(|| {
            RouteNode::generated(RouteKind::Layout, "", GENERATED_LAYOUT_KEY)
        });
        root.dynamic = None;

        let Directory {
            files,
            subdirectories,
            ..
        } = self;
        append_contents(files, subdirectories, &mut root, "")?;
        Ok(root)
    }
}

/// Build a node for a registry file, attaching a lazy loader unless stripped
pub(crate) fn file_node(
    kind: RouteKind,
    name: &str,
    key: &str,
    registry: &Arc<dyn RouteRegistry>,
    options: &RouteOptions,
) -> RouteNode {
    let node = RouteNode::new(kind, name, key);
    if options.internal_strip_load_route {
        node
    } else {
        node.with_loader(RouteLoader::new(registry.clone(), key))
    }
}

/// Fail in development; keep the first file in production
pub(crate) fn report_conflict(
    label: &'static str,
    key: &str,
    existing: &str,
    route: &str,
    options: &RouteOptions,
) -> Result<(), RouteError> {
    if options.mode.is_production() {
        warn!(file = key, existing, route, "duplicate {}, keeping the first", label);
        return Ok(());
    }

    Err(RouteError::DuplicateRoute {
        label,
        file: key.to_string(),
        existing: existing.to_string(),
        route: route.to_string(),
    })
}

/// Pick the most platform-specific candidate
///
/// A platform file requires an extension-less fallback sibling.
fn most_specific(slots: Slots) -> Result<Option<RouteNode>, RouteError> {
    let [fallback, native, exact] = slots;

    match (fallback, exact.or(native)) {
        (Some(_), Some(specific)) => Ok(Some(specific)),
        (fallback, None) => Ok(fallback),
        (None, Some(specific)) => Err(RouteError::MissingPlatformFallback {
            key: specific.source_key,
        }),
    }
}

fn flatten_into(
    directory: Directory,
    parent: &mut RouteNode,
    path_to_remove: &str,
) -> Result<(), RouteError> {
    let Directory {
        layout,
        files,
        subdirectories,
    } = directory;

    let layout = match layout {
        Some(slots) => most_specific(slots)?,
        None => None,
    };

    match layout {
        Some(mut layout) => {
            let absolute = std::mem::take(&mut layout.name);
            layout.name = relative_to(&absolute, path_to_remove);
            layout.dynamic = generate_dynamic(&layout.name);

            let nested_prefix = if absolute.is_empty() {
                String::new()
            } else {
                format!("{}/", absolute)
            };
            append_contents(files, subdirectories, &mut layout, &nested_prefix)?;
            parent.children.push(layout);
        }
        None => append_contents(files, subdirectories, parent, path_to_remove)?,
    }

    Ok(())
}

/// Files first, in insertion order, then subdirectories
fn append_contents(
    files: IndexMap<String, Slots>,
    subdirectories: IndexMap<String, Directory>,
    layout: &mut RouteNode,
    path_to_remove: &str,
) -> Result<(), RouteError> {
    for slots in files.into_values() {
        if let Some(mut node) = most_specific(slots)? {
            node.name = relative_to(&node.name, path_to_remove);
            node.dynamic = generate_dynamic(&node.name);
            layout.children.push(node);
        }
    }

    for directory in subdirectories.into_values() {
        flatten_into(directory, layout, path_to_remove)?;
    }

    Ok(())
}

fn relative_to(name: &str, prefix: &str) -> String {
    name.strip_prefix(prefix).unwrap_or(name).to_string()
}
