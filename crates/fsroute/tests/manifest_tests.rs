/// Integration tests for server manifests and request matching

use std::sync::Arc;

use fsroute::config::Rewrite;
use fsroute::manifest::get_named_route_regex;
use fsroute::registry::{FixedParams, InMemoryRegistry, ModuleDescriptor};
use fsroute::{
    get_routes, get_server_manifest, load_static_params, CompiledManifest, MatchKind,
    RouteOptions, ServerManifest,
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

fn manifest(keys: &[&str], options: RouteOptions) -> ServerManifest {
    let registry = Arc::new(InMemoryRegistry::from_keys(keys.iter().copied()));
    let root = get_routes(registry, &options).unwrap().unwrap();
    get_server_manifest(&root)
}

fn matcher(keys: &[&str], options: RouteOptions) -> CompiledManifest {
    CompiledManifest::new(&manifest(keys, options)).unwrap()
}

// ============================================================================
// Named Regexes
// ============================================================================

#[rstest]
#[case("index", "^/(?:/)?$")]
#[case("a", "^/a(?:/)?$")]
#[case("users/[id]", "^/users/(?<id>[^/]+?)(?:/)?$")]
#[case("docs/[...slug]", "^/docs(?:/(?<slug>.+?))?(?:/)?$")]
#[case("(app)/settings", r"^(?:/\(app\))?/settings(?:/)?$")]
fn test_named_route_regex(#[case] path: &str, #[case] expected: &str) {
    assert_eq!(get_named_route_regex(path).pattern, expected);
}

// ============================================================================
// Ordering
// ============================================================================

#[test]
fn test_dynamic_before_catch_all() {
    let manifest = manifest(&["./[...b].tsx", "./[a].tsx"], RouteOptions::default().skip_generated());

    let pages: Vec<_> = manifest.html_routes.iter().map(|route| route.page.as_str()).collect();
    assert_eq!(pages, vec!["/[a]", "/[...b]"]);
}

#[test]
fn test_static_before_dynamic() {
    let manifest = manifest(
        &["./blog/[slug].tsx", "./blog/latest.tsx", "./index.tsx"],
        RouteOptions::default().skip_generated(),
    );

    let pages: Vec<_> = manifest.html_routes.iter().map(|route| route.page.as_str()).collect();
    assert_eq!(pages, vec!["/blog/latest", "/blog/[slug]", "/index"]);
}

// ============================================================================
// Matching
// ============================================================================

#[rstest]
#[case("/", "./index.tsx")]
#[case("/about/", "./about.tsx")]
#[case("/blog/latest", "./blog/latest.tsx")]
#[case("/blog/hello-world", "./blog/[slug].tsx")]
#[case("/docs", "./docs/[...path].tsx")]
#[case("/docs/a/b/c", "./docs/[...path].tsx")]
fn test_match_html_routes(#[case] path: &str, #[case] expected: &str) {
    let matcher = matcher(
        &[
            "./index.tsx",
            "./about.tsx",
            "./blog/[slug].tsx",
            "./blog/latest.tsx",
            "./docs/[...path].tsx",
        ],
        RouteOptions::default(),
    );

    let found = matcher.match_path(path).unwrap();
    assert_eq!(found.kind, MatchKind::Html);
    assert_eq!(found.route.source_key, expected);
}

#[test]
fn test_match_extracts_params() {
    let matcher = matcher(&["./docs/[...path].tsx", "./users/[id].tsx"], RouteOptions::default());

    let found = matcher.match_path("/docs/guide/intro").unwrap();
    assert_eq!(found.params.get("path").map(String::as_str), Some("guide/intro"));

    let found = matcher.match_path("/users/42").unwrap();
    assert_eq!(found.params.get("id").map(String::as_str), Some("42"));
}

#[test]
fn test_group_segments_are_optional() {
    let matcher = matcher(&["./(app)/settings.tsx"], RouteOptions::default());

    assert_eq!(matcher.match_path("/settings").unwrap().kind, MatchKind::Html);
    assert_eq!(matcher.match_path("/(app)/settings").unwrap().kind, MatchKind::Html);
}

#[test]
fn test_unmatched_path_falls_back_to_not_found() {
    let matcher = matcher(&["./index.tsx"], RouteOptions::default());

    let found = matcher.match_path("/nope").unwrap();
    assert_eq!(found.kind, MatchKind::NotFound);
    assert!(found.route.generated);
}

#[test]
fn test_no_match_without_not_found() {
    let matcher = matcher(&["./index.tsx"], RouteOptions::default().skip_generated());
    assert!(matcher.match_path("/nope").is_none());
}

#[test]
fn test_rewrite_points_at_destination() {
    let manifest = manifest(
        &["./(app)/index.tsx"],
        RouteOptions::default().with_rewrite(Rewrite::new("/old", "/(app)/index")),
    );

    assert_eq!(manifest.rewrites.len(), 1);
    assert_eq!(manifest.rewrites[0].page, "/old");
    assert_eq!(
        manifest.rewrites[0].destination_source_key.as_deref(),
        Some("./(app)/index.tsx")
    );

    let matcher = CompiledManifest::new(&manifest).unwrap();
    let found = matcher.match_path("/old").unwrap();
    assert_eq!(found.kind, MatchKind::Rewrite);
}

#[test]
fn test_rewrite_wins_over_dynamic_sibling() {
    let matcher = matcher(
        &["./index.tsx", "./[slug].tsx"],
        RouteOptions::default().with_rewrite(Rewrite::new("/old", "/index")),
    );

    let found = matcher.match_path("/old").unwrap();
    assert_eq!(found.kind, MatchKind::Rewrite);
    assert_eq!(found.route.destination_source_key.as_deref(), Some("./index.tsx"));

    let other = matcher.match_path("/other").unwrap();
    assert_eq!(other.kind, MatchKind::Html);
    assert_eq!(other.params.get("slug").map(String::as_str), Some("other"));
}

#[test]
fn test_middleware_is_listed() {
    let manifest = manifest(
        &["./+middleware.ts", "./index.tsx"],
        RouteOptions::default().with_middleware(),
    );

    assert_eq!(manifest.middleware.unwrap().source_key, "./+middleware.ts");
}

#[tokio::test]
async fn test_static_expansions_match_before_template() {
    let sets = vec![json!({ "id": "me" }).as_object().cloned().unwrap()];
    let registry = InMemoryRegistry::new().with(
        "./users/[id].tsx",
        ModuleDescriptor::screen().with_static_params(Arc::new(FixedParams(sets))),
    );
    let root = get_routes(Arc::new(registry), &RouteOptions::default().skip_generated())
        .unwrap()
        .unwrap();
    let root = load_static_params(root).await.unwrap();
    let matcher = CompiledManifest::new(&get_server_manifest(&root)).unwrap();

    assert_eq!(matcher.match_path("/users/me").unwrap().route.page, "/users/me");
    assert_eq!(matcher.match_path("/users/you").unwrap().route.page, "/users/[id]");
}

#[test]
fn test_manifest_round_trips_through_json() {
    let manifest = manifest(&["./index.tsx", "./users/[id].tsx"], RouteOptions::default());

    let json = serde_json::to_string(&manifest).unwrap();
    let parsed: ServerManifest = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, manifest);
}
