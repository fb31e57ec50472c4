/// Rewrite integration
///
/// Each `{ source, destination }` rewrite adds a node at `source` that serves
/// the destination file. A registry file already at `source` is converted in
/// place instead of being duplicated.
use std::sync::Arc;

use tracing::debug;

use super::directory::{Directory, Slots};
use crate::config::{Rewrite, RouteOptions};
use crate::error::RouteError;
use crate::path::strip_group_segments_from_path;
use crate::registry::RouteRegistry;
use crate::route::{extrapolate_groups, generate_dynamic, FileKind, FileMeta, RouteKind, RouteLoader, RouteNode};

/// Route name for a rewrite path: no surrounding slashes, `/` becomes `index`
fn rewrite_route(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        "index".to_string()
    } else {
        trimmed.to_string()
    }
}

pub(crate) fn apply_rewrites(
    root: &mut Directory,
    files: &[(String, FileMeta)],
    registry: &Arc<dyn RouteRegistry>,
    options: &RouteOptions,
) -> Result<(), RouteError> {
    for rewrite in &options.rewrites {
        apply_rewrite(root, rewrite, files, registry, options)?;
    }
    Ok(())
}

fn apply_rewrite(
    root: &mut Directory,
    rewrite: &Rewrite,
    files: &[(String, FileMeta)],
    registry: &Arc<dyn RouteRegistry>,
    options: &RouteOptions,
) -> Result<(), RouteError> {
    let source = rewrite_route(&rewrite.source);
    let destination = rewrite_route(&rewrite.destination);

    let (destination_key, destination_meta) =
        find_destination(files, &destination)?.ok_or_else(|| {
            RouteError::RewriteDestinationNotFound {
                source_path: rewrite.source.clone(),
                destination: rewrite.destination.clone(),
            }
        })?;

    let captured: Vec<String> = generate_dynamic(&source)
        .unwrap_or_default()
        .into_iter()
        .map(|segment| segment.name)
        .collect();

    if let Some(missing) = generate_dynamic(&destination_meta.route)
        .unwrap_or_default()
        .into_iter()
        .find(|segment| !captured.contains(&segment.name))
    {
        return Err(RouteError::IncompatibleRewrite {
            source_path: rewrite.source.clone(),
            destination: rewrite.destination.clone(),
            param: missing.name,
        });
    }

    for route in extrapolate_groups(&source)? {
        let parts: Vec<&str> = route.split('/').collect();
        let directory = root.descend(&parts[..parts.len() - 1]);

        match directory.files.get_mut(&route) {
            Some(slots) => {
                debug!(source = %route, destination = destination_key, "converting existing file to rewrite");
                for node in slots.iter_mut().flatten() {
                    alias(node, destination_key, registry, options);
                }
            }
            None => {
                let mut node = RouteNode::new(RouteKind::Rewrite, &route, format!("./{}", route));
                node.is_internal = true;
                alias(&mut node, destination_key, registry, options);
                debug!(source = %route, destination = destination_key, "added rewrite");
                let slots: Slots = [Some(node), None, None];
                directory.files.insert(route, slots);
            }
        }
    }

    Ok(())
}

/// Point a node at the destination file
fn alias(
    node: &mut RouteNode,
    destination_key: &str,
    registry: &Arc<dyn RouteRegistry>,
    options: &RouteOptions,
) {
    if options.preserve_redirect_and_rewrites {
        node.kind = RouteKind::Rewrite;
    } else {
        node.kind = RouteKind::Route;
        node.source_key = destination_key.to_string();
    }
    node.destination_source_key = Some(destination_key.to_string());
    node.loader = if options.internal_strip_load_route {
        None
    } else {
        Some(RouteLoader::new(registry.clone(), destination_key))
    };
}

/// Screen file whose route matches `destination` exactly, or after dropping groups
fn find_destination<'a>(
    files: &'a [(String, FileMeta)],
    destination: &str,
) -> Result<Option<(&'a str, &'a FileMeta)>, RouteError> {
    let screens = files
        .iter()
        .filter(|(_, meta)| matches!(meta.kind, FileKind::Route | FileKind::NotFound));

    for (key, meta) in screens.clone() {
        if extrapolate_groups(&meta.route)?.iter().any(|route| route == destination) {
            return Ok(Some((key.as_str(), meta)));
        }
    }

    let stripped = strip_group_segments_from_path(destination);
    Ok(screens
        .into_iter()
        .find(|(_, meta)| strip_group_segments_from_path(&meta.route) == stripped)
        .map(|(key, meta)| (key.as_str(), meta)))
}
