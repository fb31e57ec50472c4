/// Root middleware resolution
use std::sync::Arc;

use tracing::warn;

use crate::config::RouteOptions;
use crate::error::RouteError;
use crate::registry::RouteRegistry;
use crate::route::{FileMeta, MiddlewareRef, RouteLoader};

/// Pick the single root `+middleware` file
///
/// Nested middleware files are always an error. Several root files are an
/// error in development; production keeps the first one discovered.
pub(crate) fn resolve_middleware(
    candidates: &[(String, FileMeta)],
    registry: &Arc<dyn RouteRegistry>,
    options: &RouteOptions,
) -> Result<Option<MiddlewareRef>, RouteError> {
    let (root, nested): (Vec<_>, Vec<_>) = candidates
        .iter()
        .partition(|(_, meta)| meta.route == "+middleware");

    if !nested.is_empty() {
        return Err(RouteError::NestedMiddleware {
            keys: nested.into_iter().map(|(key, _)| key.clone()).collect(),
        });
    }

    let Some((first, _)) = root.first() else {
        return Ok(None);
    };

    if root.len() > 1 {
        let keys: Vec<String> = root.iter().map(|(key, _)| key.clone()).collect();
        if !options.mode.is_production() {
            return Err(RouteError::MultipleMiddleware { keys });
        }
        warn!(?keys, kept = %first, "multiple root middleware files, keeping the first");
    }

    Ok(Some(MiddlewareRef {
        source_key: first.clone(),
        loader: (!options.internal_strip_load_route)
            .then(|| RouteLoader::new(registry.clone(), first.as_str())),
    }))
}
