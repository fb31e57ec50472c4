/// Integration tests for static param expansion

use std::sync::{Arc, Mutex};

use fsroute::registry::{params_fn, FixedParams, InMemoryRegistry, ModuleDescriptor, StaticParams};
use fsroute::{get_exact_routes, load_static_params, RouteError, RouteNode, RouteOptions};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn params(value: Value) -> StaticParams {
    value.as_object().cloned().unwrap()
}

fn fixed(sets: Vec<Value>) -> ModuleDescriptor {
    let sets = sets.into_iter().map(params).collect();
    ModuleDescriptor::screen().with_static_params(Arc::new(FixedParams(sets)))
}

async fn expand(registry: InMemoryRegistry) -> Result<RouteNode, RouteError> {
    let root = get_exact_routes(Arc::new(registry), &RouteOptions::default())
        .unwrap()
        .unwrap();
    load_static_params(root).await
}

fn names(node: &RouteNode) -> Vec<&str> {
    node.children.iter().map(|child| child.name.as_str()).collect()
}

#[tokio::test]
async fn test_dynamic_route_expands_after_template() {
    let registry = InMemoryRegistry::new().with(
        "./[color].tsx",
        fixed(vec![json!({ "color": "red" }), json!({ "color": "blue" })]),
    );

    let root = expand(registry).await.unwrap();

    assert_eq!(names(&root), vec!["[color]", "red", "blue"]);
    let red = root.child("red").unwrap();
    assert_eq!(red.source_key, "./red.tsx");
    assert!(red.dynamic.is_none());
    assert!(root.child("[color]").unwrap().dynamic.is_some());
}

#[tokio::test]
async fn test_routes_without_generator_are_untouched() {
    let registry = InMemoryRegistry::from_keys(["./index.tsx", "./[slug].tsx"]);

    let root = expand(registry).await.unwrap();

    assert_eq!(names(&root), vec!["index", "[slug]"]);
}

#[tokio::test]
async fn test_nested_layout_passes_parent_params() {
    let calls: Arc<Mutex<Vec<StaticParams>>> = Arc::default();
    let recorded = calls.clone();

    let registry = InMemoryRegistry::new()
        .with(
            "./[a]/_layout.tsx",
            fixed(vec![json!({ "a": "x" }), json!({ "a": "y" })]),
        )
        .with(
            "./[a]/[b].tsx",
            ModuleDescriptor::screen().with_static_params(params_fn(move |ctx| {
                let recorded = recorded.clone();
                async move {
                    let parent = ctx.params.get("a").and_then(Value::as_str).unwrap_or("?").to_string();
                    recorded.lock().unwrap().push(ctx.params);
                    Ok::<_, anyhow::Error>(vec![params(json!({ "b": format!("{}-1", parent) }))])
                }
            })),
        );

    let root = expand(registry).await.unwrap();

    assert_eq!(names(&root), vec!["[a]", "x", "y"]);
    assert_eq!(names(root.child("[a]").unwrap()), vec!["[b]"]);
    assert_eq!(names(root.child("x").unwrap()), vec!["[b]", "x-1"]);
    assert_eq!(names(root.child("y").unwrap()), vec!["[b]", "y-1"]);

    let calls = calls.lock().unwrap();
    assert_eq!(*calls, vec![params(json!({ "a": "x" })), params(json!({ "a": "y" }))]);
}

#[tokio::test]
async fn test_catch_all_accepts_trailing_slash() {
    let registry = InMemoryRegistry::new().with("./[...post].tsx", fixed(vec![json!({ "post": "123/" })]));

    let root = expand(registry).await.unwrap();

    assert_eq!(names(&root), vec!["[...post]", "123"]);
}

#[tokio::test]
async fn test_catch_all_array_joins_segments() {
    let registry = InMemoryRegistry::new().with(
        "./docs/[...slug].tsx",
        fixed(vec![json!({ "slug": ["guide", 2, "intro"] })]),
    );

    let root = expand(registry).await.unwrap();

    assert_eq!(names(&root), vec!["docs/[...slug]", "docs/guide/2/intro"]);
}

#[tokio::test]
async fn test_catch_all_rejects_empty_segments() {
    let registry = InMemoryRegistry::new().with("./[...post].tsx", fixed(vec![json!({ "post": ["/"] })]));

    let err = expand(registry).await.unwrap_err();

    assert!(matches!(err, RouteError::EmptyStaticParam { param, .. } if param == "post"));
}

#[tokio::test]
async fn test_single_param_rejects_multiple_segments() {
    let registry = InMemoryRegistry::new().with("./[id].tsx", fixed(vec![json!({ "id": "a/b" })]));

    let err = expand(registry).await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "generateStaticParams() for route \"./[id].tsx\" expected param \"id\" to not contain \"/\" (multiple segments) while parsing \"a/b\"."
    );
}

#[tokio::test]
async fn test_missing_param_fails() {
    let registry = InMemoryRegistry::new().with("./[id].tsx", fixed(vec![json!({ "other": "1" })]));

    let err = expand(registry).await.unwrap_err();

    assert!(matches!(err, RouteError::MissingStaticParams { names, .. } if names == vec!["id"]));
}

#[tokio::test]
async fn test_generator_failure_is_reported() {
    let registry = InMemoryRegistry::new().with(
        "./[id].tsx",
        ModuleDescriptor::screen().with_static_params(params_fn(|_ctx| async {
            Err::<Vec<StaticParams>, _>(anyhow::anyhow!("database offline"))
        })),
    );

    let err = expand(registry).await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "generateStaticParams() failed for route \"./[id].tsx\": database offline"
    );
}

#[tokio::test]
async fn test_duplicate_expansions_keep_first() {
    let registry = InMemoryRegistry::new()
        .with("./red.tsx", ModuleDescriptor::screen())
        .with(
            "./[color].tsx",
            fixed(vec![json!({ "color": "red" }), json!({ "color": "blue" })]),
        );

    let root = expand(registry).await.unwrap();

    assert_eq!(names(&root), vec!["red", "[color]", "blue"]);
    assert_eq!(root.child("red").unwrap().source_key, "./red.tsx");
}
