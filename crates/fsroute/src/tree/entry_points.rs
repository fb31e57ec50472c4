/// Entry points and initial route resolution
use indexmap::IndexSet;

use crate::error::RouteError;
use crate::route::pattern::match_last_group_name;
use crate::route::{RouteKind, RouteNode};

/// Fill `entry_points` on every screen and resolve layout initial routes
///
/// A screen's entry points are its ancestor layouts, the initial routes of
/// those layouts, then itself.
pub(crate) fn append_entry_points(node: &mut RouteNode, inherited: &[String]) -> Result<(), RouteError> {
    match node.kind {
        RouteKind::Route => {
            let entry_points: IndexSet<String> = inherited
                .iter()
                .cloned()
                .chain(std::iter::once(node.source_key.clone()))
                .collect();
            node.entry_points = Some(entry_points.into_iter().collect());
        }
        RouteKind::Layout => {
            let mut entry_points = inherited.to_vec();
            entry_points.push(node.source_key.clone());

            let (initial_route_name, anchor) = resolve_initial_route(node)?;
            let initial = anchor.as_ref().or(initial_route_name.as_ref());

            if let Some(child) = initial.and_then(|name| node.child(name)) {
                entry_points.push(child.source_key.clone());
            }

            node.initial_route_name = anchor.clone().or(initial_route_name);
            node.anchor = anchor;

            for child in &mut node.children {
                append_entry_points(child, &entry_points)?;
            }
        }
        RouteKind::Api | RouteKind::Rewrite => {}
    }

    Ok(())
}

/// Settings-derived `(initialRouteName, anchor)` for a layout, validated
/// against its children
///
/// Group-specific settings override global ones; a group layout without
/// settings defaults to the child named after the group.
fn resolve_initial_route(layout: &RouteNode) -> Result<(Option<String>, Option<String>), RouteError> {
    let group = match_last_group_name(&layout.name);

    let mut initial_route_name = group.and_then(|group| {
        layout
            .children
            .iter()
            .find(|child| child.name.strip_suffix("/index").unwrap_or(&child.name) == group)
            .map(|child| child.name.clone())
    });
    let mut anchor = None;

    if let Some(settings) = layout.load_route().and_then(|module| module.settings.clone()) {
        initial_route_name = settings.initial_route_name.clone().or(initial_route_name);
        anchor = settings.anchor.clone();

        if let Some(group_settings) = group.and_then(|group| settings.group(group)) {
            initial_route_name = group_settings
                .initial_route_name
                .clone()
                .or(initial_route_name);
            anchor = group_settings.anchor.clone().or(anchor);
        }
    }

    validate(layout, "initialRouteName", initial_route_name.as_deref(), group)?;
    validate(layout, "anchor", anchor.as_deref(), group)?;

    Ok((initial_route_name, anchor))
}

fn validate(
    layout: &RouteNode,
    setting: &'static str,
    value: Option<&str>,
    group: Option<&str>,
) -> Result<(), RouteError> {
    let Some(value) = value else {
        return Ok(());
    };

    if layout.child(value).is_some() {
        return Ok(());
    }

    let valid = layout
        .children
        .iter()
        .filter(|child| !child.is_generated)
        .map(|child| format!("'{}'", child.name))
        .collect::<Vec<_>>()
        .join(", ");

    Err(RouteError::InvalidInitialRoute {
        layout: layout.source_key.clone(),
        setting,
        value: value.to_string(),
        group: group.map(str::to_string),
        valid,
    })
}
