/// Integration tests for route tree construction
///
/// Each test feeds registry keys through `get_routes` and checks the
/// resulting tree shape, entry points and error reporting.

use std::sync::Arc;

use fsroute::config::{ExecutionMode, Platform, Rewrite};
use fsroute::registry::{InMemoryRegistry, ModuleDescriptor};
use fsroute::{
    get_exact_routes, get_routes, RouteError, RouteKind, RouteNode, RouteOptions,
    GENERATED_LAYOUT_KEY, GENERATED_NOT_FOUND_KEY, GENERATED_SITEMAP_KEY,
};
use pretty_assertions::assert_eq;

fn routes(keys: &[&str], options: RouteOptions) -> Result<Option<RouteNode>, RouteError> {
    let registry = Arc::new(InMemoryRegistry::from_keys(keys.iter().copied()));
    get_routes(registry, &options)
}

fn tree(keys: &[&str], options: RouteOptions) -> RouteNode {
    routes(keys, options).unwrap().unwrap()
}

fn names(node: &RouteNode) -> Vec<&str> {
    node.children.iter().map(|child| child.name.as_str()).collect()
}

// ============================================================================
// Tree Shape
// ============================================================================

#[test]
fn test_empty_registry_has_no_routes() {
    assert!(routes(&[], RouteOptions::default()).unwrap().is_none());
}

#[test]
fn test_generated_root_layout_and_screens() {
    let root = tree(&["./index.tsx"], RouteOptions::default());

    assert_eq!(root.kind, RouteKind::Layout);
    assert_eq!(root.source_key, GENERATED_LAYOUT_KEY);
    assert!(root.is_generated);
    assert_eq!(names(&root), vec!["index", "_sitemap", "+not-found"]);

    let sitemap = root.child("_sitemap").unwrap();
    assert_eq!(sitemap.source_key, GENERATED_SITEMAP_KEY);
    assert!(sitemap.is_internal);

    let not_found = root.child("+not-found").unwrap();
    assert_eq!(not_found.source_key, GENERATED_NOT_FOUND_KEY);
    assert!(not_found.is_not_found());
}

#[test]
fn test_exact_routes_skip_generated_screens() {
    let registry = Arc::new(InMemoryRegistry::from_keys(["./index.tsx"]));
    let root = get_exact_routes(registry, &RouteOptions::default()).unwrap().unwrap();

    assert_eq!(root.source_key, GENERATED_LAYOUT_KEY);
    assert_eq!(names(&root), vec!["index"]);
}

#[test]
fn test_user_files_replace_generated_screens() {
    let root = tree(
        &["./_layout.tsx", "./index.tsx", "./+not-found.tsx"],
        RouteOptions::default(),
    );

    assert_eq!(root.source_key, "./_layout.tsx");
    assert!(!root.is_generated);
    assert_eq!(names(&root), vec!["index", "+not-found", "_sitemap"]);
    assert_eq!(root.child("+not-found").unwrap().source_key, "./+not-found.tsx");
}

#[test]
fn test_array_groups_expand_to_cartesian_product() {
    let root = tree(&["./(a,b)/(c,d)/page.tsx"], RouteOptions::default().skip_generated());

    let mut leaves = names(&root);
    leaves.sort();
    assert_eq!(
        leaves,
        vec!["(a)/(c)/page", "(a)/(d)/page", "(b)/(c)/page", "(b)/(d)/page"]
    );
    assert!(root
        .children
        .iter()
        .all(|child| child.source_key == "./(a,b)/(c,d)/page.tsx"));
}

#[test]
fn test_nested_layout_children_are_relative() {
    let root = tree(
        &[
            "./_layout.tsx",
            "./(app)/_layout.tsx",
            "./(app)/index.tsx",
            "./(app)/users/[id].tsx",
        ],
        RouteOptions::default().skip_generated(),
    );

    let app = root.child("(app)").unwrap();
    assert_eq!(app.kind, RouteKind::Layout);
    assert_eq!(names(app), vec!["index", "users/[id]"]);

    let user = app.child("users/[id]").unwrap();
    let dynamic = user.dynamic.as_ref().unwrap();
    assert_eq!(dynamic[0].name, "id");
    assert!(!dynamic[0].is_catch_all);
}

#[test]
fn test_api_routes_require_flag() {
    let keys = ["./index.tsx", "./users+api.ts"];

    let root = tree(&keys, RouteOptions::default().skip_generated());
    assert_eq!(names(&root), vec!["index"]);

    let root = tree(&keys, RouteOptions::default().with_api_routes().skip_generated());
    let api = root.child("users").unwrap();
    assert_eq!(api.kind, RouteKind::Api);
    assert_eq!(api.source_key, "./users+api.ts");
}

// ============================================================================
// Conflicts
// ============================================================================

#[test]
fn test_duplicate_routes_fail_in_development() {
    let err = routes(&["./a.js", "./a.tsx"], RouteOptions::default()).unwrap_err();

    assert!(err.is_suppressible());
    assert_eq!(
        err.to_string(),
        "The route files \"./a.tsx\" and \"./a.js\" conflict on the route \"/a\". Please remove or rename one of these files."
    );
}

#[test]
fn test_duplicate_routes_keep_first_in_production() {
    let root = tree(
        &["./a.js", "./a.tsx"],
        RouteOptions::default().with_mode(ExecutionMode::Production),
    );

    assert_eq!(root.child("a").unwrap().source_key, "./a.js");
}

#[test]
fn test_duplicate_layouts_fail() {
    let err = routes(&["./_layout.js", "./_layout.tsx"], RouteOptions::default()).unwrap_err();
    assert!(matches!(err, RouteError::DuplicateRoute { label: "layouts", .. }));
}

// ============================================================================
// Platforms
// ============================================================================

#[test]
fn test_platform_specific_file_wins() {
    let keys = ["./index.tsx", "./index.native.tsx", "./index.ios.tsx"];

    let ios = tree(&keys, RouteOptions::default().with_platform(Platform::Ios));
    assert_eq!(ios.child("index").unwrap().source_key, "./index.ios.tsx");

    let android = tree(&keys, RouteOptions::default().with_platform(Platform::Android));
    assert_eq!(android.child("index").unwrap().source_key, "./index.native.tsx");

    let web = tree(&keys, RouteOptions::default().with_platform(Platform::Web));
    assert_eq!(web.child("index").unwrap().source_key, "./index.tsx");
}

#[test]
fn test_platform_file_requires_fallback() {
    let err = routes(
        &["./about.ios.tsx"],
        RouteOptions::default().with_platform(Platform::Ios),
    )
    .unwrap_err();

    assert!(matches!(err, RouteError::MissingPlatformFallback { key } if key == "./about.ios.tsx"));
}

// ============================================================================
// Rewrites
// ============================================================================

#[test]
fn test_rewrite_adds_internal_node() {
    let root = tree(
        &["./(app)/index.tsx"],
        RouteOptions::default()
            .skip_generated()
            .with_rewrite(Rewrite::new("/old", "/(app)/index")),
    );

    let old = root.child("old").unwrap();
    assert_eq!(old.kind, RouteKind::Rewrite);
    assert_eq!(old.source_key, "./old");
    assert_eq!(old.destination_source_key.as_deref(), Some("./(app)/index.tsx"));
    assert!(old.is_internal);
}

#[test]
fn test_rewrite_converts_existing_file() {
    let root = tree(
        &["./(app)/index.tsx", "./old.tsx"],
        RouteOptions::default()
            .skip_generated()
            .with_rewrite(Rewrite::new("/old", "/(app)/index")),
    );

    let olds: Vec<_> = root.children.iter().filter(|child| child.name == "old").collect();
    assert_eq!(olds.len(), 1);
    assert_eq!(olds[0].kind, RouteKind::Rewrite);
    assert_eq!(olds[0].source_key, "./old.tsx");
    assert_eq!(olds[0].destination_source_key.as_deref(), Some("./(app)/index.tsx"));
}

#[test]
fn test_rewrite_destination_must_exist() {
    let err = routes(
        &["./index.tsx"],
        RouteOptions::default().with_rewrite(Rewrite::new("/old", "/missing")),
    )
    .unwrap_err();

    assert!(matches!(err, RouteError::RewriteDestinationNotFound { .. }));
}

#[test]
fn test_rewrite_must_capture_destination_params() {
    let err = routes(
        &["./users/[id].tsx"],
        RouteOptions::default().with_rewrite(Rewrite::new("/profile", "/users/[id]")),
    )
    .unwrap_err();

    assert!(matches!(err, RouteError::IncompatibleRewrite { param, .. } if param == "id"));
}

// ============================================================================
// Middleware
// ============================================================================

#[test]
fn test_root_middleware() {
    let root = tree(
        &["./+middleware.ts", "./index.tsx"],
        RouteOptions::default().with_middleware(),
    );

    assert_eq!(root.middleware.as_ref().unwrap().source_key, "./+middleware.ts");
    assert!(root.child("+middleware").is_none());
}

#[test]
fn test_middleware_ignored_without_flag() {
    let root = tree(&["./+middleware.ts", "./index.tsx"], RouteOptions::default());
    assert!(root.middleware.is_none());
}

#[test]
fn test_nested_middleware_fails() {
    let err = routes(
        &["./admin/+middleware.ts", "./index.tsx"],
        RouteOptions::default().with_middleware(),
    )
    .unwrap_err();

    assert!(matches!(err, RouteError::NestedMiddleware { keys } if keys == vec!["./admin/+middleware.ts"]));
}

// ============================================================================
// Entry Points & Initial Routes
// ============================================================================

#[test]
fn test_entry_points_include_ancestor_layouts() {
    let root = tree(
        &["./_layout.tsx", "./(app)/_layout.tsx", "./(app)/home.tsx"],
        RouteOptions::default().skip_generated(),
    );

    let home = root.child("(app)").unwrap().child("home").unwrap();
    assert_eq!(
        home.entry_points.as_deref().unwrap(),
        ["./_layout.tsx", "./(app)/_layout.tsx", "./(app)/home.tsx"]
    );
}

#[test]
fn test_initial_route_joins_entry_points() {
    let registry = Arc::new(
        InMemoryRegistry::new()
            .with("./_layout.tsx", ModuleDescriptor::screen().with_initial_route("about"))
            .with("./index.tsx", ModuleDescriptor::screen())
            .with("./about.tsx", ModuleDescriptor::screen()),
    );
    let root = get_exact_routes(registry, &RouteOptions::default()).unwrap().unwrap();

    assert_eq!(root.initial_route_name.as_deref(), Some("about"));
    assert_eq!(
        root.child("index").unwrap().entry_points.as_deref().unwrap(),
        ["./_layout.tsx", "./about.tsx", "./index.tsx"]
    );
    assert_eq!(
        root.child("about").unwrap().entry_points.as_deref().unwrap(),
        ["./_layout.tsx", "./about.tsx"]
    );
}

#[test]
fn test_invalid_initial_route_lists_valid_children() {
    let registry = Arc::new(
        InMemoryRegistry::new()
            .with("./_layout.tsx", ModuleDescriptor::screen().with_initial_route("missing"))
            .with("./index.tsx", ModuleDescriptor::screen())
            .with("./about.tsx", ModuleDescriptor::screen()),
    );
    let err = get_routes(registry, &RouteOptions::default()).unwrap_err();

    assert_eq!(
        err.to_string(),
        "Layout ./_layout.tsx has invalid initialRouteName 'missing'. Valid options are: 'index', 'about'"
    );
}

#[test]
fn test_ignore_entry_points_skips_settings() {
    let registry = Arc::new(
        InMemoryRegistry::new()
            .with("./_layout.tsx", ModuleDescriptor::screen().with_initial_route("missing"))
            .with("./index.tsx", ModuleDescriptor::screen()),
    );
    let root = get_routes(registry, &RouteOptions::default().ignore_entry_points())
        .unwrap()
        .unwrap();

    assert!(root.initial_route_name.is_none());
    assert!(root.child("index").unwrap().entry_points.is_none());
}

#[test]
fn test_tree_serializes_without_loaders() {
    let root = tree(&["./index.tsx"], RouteOptions::default().skip_generated());
    let json = serde_json::to_value(&root).unwrap();

    assert_eq!(json["type"], "layout");
    assert_eq!(json["children"][0]["sourceKey"], "./index.tsx");
    assert!(json["children"][0].get("loader").is_none());
}
