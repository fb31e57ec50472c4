//! Static param expansion
//!
//! Every dynamic node whose module exposes a
//! [`StaticParamsGenerator`](crate::registry::StaticParamsGenerator) gains one
//! fully static sibling per generated param set. The dynamic template stays in
//! place, first among its expansions.
//!
//! Expansion is depth-first and sequential so a child's generator always sees
//! the params resolved for its ancestors.

use std::future::Future;
use std::pin::Pin;

use serde_json::Value;
use tracing::debug;

use crate::error::RouteError;
use crate::registry::{StaticParams, StaticParamsContext};
use crate::route::{DynamicSegment, RouteNode};

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Expand every dynamic node with a static param generator
///
/// Any generator or validation failure aborts the whole expansion.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use fsroute::registry::{FixedParams, InMemoryRegistry, ModuleDescriptor, StaticParams};
/// use fsroute::{get_exact_routes, load_static_params, RouteOptions};
/// use serde_json::json;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let params: Vec<StaticParams> = ["red", "blue"]
///     .iter()
///     .map(|color| json!({ "color": color }).as_object().cloned().unwrap())
///     .collect();
/// let registry = InMemoryRegistry::new().with(
///     "./[color].tsx",
///     ModuleDescriptor::screen().with_static_params(Arc::new(FixedParams(params))),
/// );
///
/// let root = get_exact_routes(Arc::new(registry), &RouteOptions::default()).unwrap().unwrap();
/// let root = load_static_params(root).await.unwrap();
///
/// let names: Vec<_> = root.children.iter().map(|c| c.name.as_str()).collect();
/// assert_eq!(names, vec!["[color]", "red", "blue"]);
/// # });
/// ```
pub async fn load_static_params(root: RouteNode) -> Result<RouteNode, RouteError> {
    let mut root = root;
    let children = std::mem::take(&mut root.children);
    root.children = expand_children(children, StaticParams::new()).await?;
    Ok(root)
}

/// Expand siblings in order, dropping later duplicates by name
fn expand_children(
    children: Vec<RouteNode>,
    params: StaticParams,
) -> BoxFuture<'static, Result<Vec<RouteNode>, RouteError>> {
    Box::pin(async move {
        let mut expanded: Vec<RouteNode> = Vec::with_capacity(children.len());

        for child in children {
            for node in expand_node(child, params.clone()).await? {
                if !expanded.iter().any(|existing| existing.name == node.name) {
                    expanded.push(node);
                }
            }
        }

        Ok(expanded)
    })
}

/// The node itself followed by its static clones
fn expand_node(
    mut node: RouteNode,
    params: StaticParams,
) -> BoxFuture<'static, Result<Vec<RouteNode>, RouteError>> {
    Box::pin(async move {
        let generator = match &node.dynamic {
            Some(_) => node.load_route().and_then(|module| module.static_params.clone()),
            None => None,
        };
        let dynamic = node.dynamic.clone().unwrap_or_default();

        let Some(generator) = generator else {
            let children = std::mem::take(&mut node.children);
            node.children = expand_children(children, params).await?;
            return Ok(vec![node]);
        };

        let generated = generator
            .generate(StaticParamsContext {
                params: params.clone(),
            })
            .await
            .map_err(|source| RouteError::StaticParamsGenerator {
                key: node.source_key.clone(),
                source,
            })?;

        debug!(key = %node.source_key, count = generated.len(), "expanding static params");

        let mut nodes = vec![node.clone()];

        for set in generated {
            let resolved = assert_static_params(&node.source_key, &dynamic, &set)?;

            let mut merged = params.clone();
            merged.extend(set);
            for (name, value) in &resolved {
                merged.insert(name.clone(), value.to_json());
            }

            let mut clone = node.clone();
            clone.name = substitute(&node.name, &resolved);
            clone.source_key = substitute(&node.source_key, &resolved);
            clone.dynamic = None;
            clone.children = expand_children(node.children.clone(), merged).await?;
            nodes.push(clone);
        }

        Ok(nodes)
    })
}

/// A validated value for one dynamic segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Single(String),
    CatchAll(Vec<String>),
}

impl ParamValue {
    /// Path text substituted into the route name
    pub fn as_path(&self) -> String {
        match self {
            ParamValue::Single(value) => value.clone(),
            ParamValue::CatchAll(parts) => parts.join("/"),
        }
    }

    fn to_json(&self) -> Value {
        match self {
            ParamValue::Single(value) => Value::String(value.clone()),
            ParamValue::CatchAll(parts) => {
                Value::Array(parts.iter().cloned().map(Value::String).collect())
            }
        }
    }
}

/// Validate one generated param set against a node's dynamic segments
///
/// ```
/// use fsroute::route::DynamicSegment;
/// use fsroute::static_params::{assert_static_params, ParamValue};
/// use serde_json::json;
///
/// let dynamic = vec![DynamicSegment::catch_all("post")];
/// let params = json!({ "post": "123/" }).as_object().cloned().unwrap();
/// let resolved = assert_static_params("./[...post].tsx", &dynamic, &params).unwrap();
/// assert_eq!(resolved, vec![("post".to_string(), ParamValue::CatchAll(vec!["123".to_string()]))]);
/// ```
pub fn assert_static_params(
    key: &str,
    dynamic: &[DynamicSegment],
    params: &StaticParams,
) -> Result<Vec<(String, ParamValue)>, RouteError> {
    let missing: Vec<String> = dynamic
        .iter()
        .filter(|segment| params.get(&segment.name).map_or(true, Value::is_null))
        .map(|segment| segment.name.clone())
        .collect();

    if !missing.is_empty() {
        return Err(RouteError::MissingStaticParams {
            key: key.to_string(),
            names: missing,
            received: format_received(dynamic, params),
        });
    }

    dynamic
        .iter()
        .map(|segment| {
            let value = params.get(&segment.name).unwrap_or(&Value::Null);
            let resolved = if segment.is_catch_all {
                parse_catch_all(key, &segment.name, value)?
            } else {
                parse_single(key, &segment.name, value)?
            };
            Ok((segment.name.clone(), resolved))
        })
        .collect()
}

/// Returned params, one `"key": value` line each, with absent dynamic keys as `undefined`
fn format_received(dynamic: &[DynamicSegment], params: &StaticParams) -> String {
    let present = params.iter().map(|(name, value)| {
        let rendered = match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        format!("  \"{}\": {}", name, rendered)
    });
    let absent = dynamic
        .iter()
        .filter(|segment| !params.contains_key(&segment.name))
        .map(|segment| format!("  \"{}\": undefined", segment.name));

    let lines: Vec<String> = present.chain(absent).collect();
    format!("{{\n{}\n}}", lines.join(",\n"))
}

fn parse_single(key: &str, param: &str, value: &Value) -> Result<ParamValue, RouteError> {
    let Value::String(raw) = value else {
        return Err(type_error(key, param, value));
    };

    let trimmed = raw.trim_matches('/');
    if trimmed.is_empty() {
        return Err(RouteError::EmptyStaticParam {
            key: key.to_string(),
            param: param.to_string(),
            value: raw.clone(),
        });
    }
    if trimmed.contains('/') {
        return Err(RouteError::StaticParamMultipleSegments {
            key: key.to_string(),
            param: param.to_string(),
            value: raw.clone(),
        });
    }

    Ok(ParamValue::Single(trimmed.to_string()))
}

fn parse_catch_all(key: &str, param: &str, value: &Value) -> Result<ParamValue, RouteError> {
    let joined = match value {
        Value::String(raw) => raw.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(text) => Ok(text.clone()),
                Value::Number(number) => Ok(number.to_string()),
                other => Err(type_error(key, param, other)),
            })
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("/"),
        other => return Err(type_error(key, param, other)),
    };

    let parts: Vec<String> = joined
        .split('/')
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect();

    if parts.is_empty() {
        return Err(RouteError::EmptyStaticParam {
            key: key.to_string(),
            param: param.to_string(),
            value: joined,
        });
    }

    Ok(ParamValue::CatchAll(parts))
}

fn type_error(key: &str, param: &str, value: &Value) -> RouteError {
    let found = match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) | Value::Object(_) => "object",
    };

    RouteError::InvalidStaticParamType {
        key: key.to_string(),
        param: param.to_string(),
        found,
        value: display_value(value),
    }
}

/// Plain text rendering of a param value for error messages
fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.clone(),
        Value::Array(items) => items.iter().map(display_value).collect::<Vec<_>>().join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Replace `[name]` and `[...name]` with resolved values
fn substitute(template: &str, resolved: &[(String, ParamValue)]) -> String {
    resolved.iter().fold(template.to_string(), |text, (name, value)| {
        let path = value.as_path();
        text.replace(&format!("[...{}]", name), &path)
            .replace(&format!("[{}]", name), &path)
    })
}
