//! Module registry abstraction
//!
//! The compiler never loads route modules itself. It asks a [`RouteRegistry`]
//! for the list of keys and, lazily, for each key's [`ModuleDescriptor`]: the
//! metadata a module exports (settings, static param generator, api methods).

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::path::strip_extension;

/// Concrete params produced by a generator, keyed by dynamic segment name
pub type StaticParams = Map<String, Value>;

/// Source of route modules, keyed by `./`-relative file path
pub trait RouteRegistry: Send + Sync {
    /// All module keys, in discovery order
    fn keys(&self) -> Vec<String>;

    /// Load the descriptor for a key
    fn get(&self, key: &str) -> Option<Arc<ModuleDescriptor>>;
}

/// Argument passed to a [`StaticParamsGenerator`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StaticParamsContext {
    /// Params resolved for every dynamic ancestor
    pub params: StaticParams,
}

/// Produces the concrete param sets a dynamic route is pre-rendered for
#[async_trait]
pub trait StaticParamsGenerator: Send + Sync {
    async fn generate(&self, ctx: StaticParamsContext) -> anyhow::Result<Vec<StaticParams>>;
}

/// Generator returning a fixed list of param sets
#[derive(Debug, Clone, Default)]
pub struct FixedParams(pub Vec<StaticParams>);

#[async_trait]
impl StaticParamsGenerator for FixedParams {
    async fn generate(&self, _ctx: StaticParamsContext) -> anyhow::Result<Vec<StaticParams>> {
        Ok(self.0.clone())
    }
}

/// Generator backed by an async closure
pub struct FnParams<F>(F);

#[async_trait]
impl<F, Fut> StaticParamsGenerator for FnParams<F>
where
    F: Fn(StaticParamsContext) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<Vec<StaticParams>>> + Send,
{
    async fn generate(&self, ctx: StaticParamsContext) -> anyhow::Result<Vec<StaticParams>> {
        (self.0)(ctx).await
    }
}

/// Wrap an async closure as a shared generator
///
/// ```
/// use fsroute::registry::{params_fn, StaticParams};
/// use serde_json::json;
///
/// let generator = params_fn(|_ctx| async {
///     let params: StaticParams = json!({ "color": "red" }).as_object().cloned().unwrap_or_default();
///     Ok::<_, anyhow::Error>(vec![params])
/// });
/// # let _ = generator;
/// ```
pub fn params_fn<F, Fut>(f: F) -> Arc<dyn StaticParamsGenerator>
where
    F: Fn(StaticParamsContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Vec<StaticParams>>> + Send + 'static,
{
    Arc::new(FnParams(f))
}

/// Navigation settings for one group variant of a layout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSettings {
    #[serde(default)]
    pub initial_route_name: Option<String>,
    #[serde(default)]
    pub anchor: Option<String>,
}

/// Navigation settings exported by a layout module
///
/// Group-specific entries are keyed by the bare group name (`app` for `(app)`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSettings {
    #[serde(default)]
    pub initial_route_name: Option<String>,
    #[serde(default)]
    pub anchor: Option<String>,
    #[serde(flatten)]
    pub groups: BTreeMap<String, GroupSettings>,
}

impl RouteSettings {
    pub fn group(&self, name: &str) -> Option<&GroupSettings> {
        self.groups.get(name)
    }
}

/// Metadata exported by a route module
#[derive(Clone, Default)]
pub struct ModuleDescriptor {
    /// Module has a default (screen) export
    pub has_default: bool,
    pub settings: Option<RouteSettings>,
    pub static_params: Option<Arc<dyn StaticParamsGenerator>>,
    /// Module exports a data loader
    pub has_loader: bool,
    /// HTTP methods exported by an api module
    pub api_methods: Vec<String>,
}

impl ModuleDescriptor {
    /// A module with a default export and nothing else
    pub fn screen() -> Self {
        Self {
            has_default: true,
            ..Self::default()
        }
    }

    pub fn api(methods: &[&str]) -> Self {
        Self {
            api_methods: methods.iter().map(|m| m.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn with_settings(mut self, settings: RouteSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn with_initial_route(mut self, name: impl Into<String>) -> Self {
        self.settings
            .get_or_insert_with(RouteSettings::default)
            .initial_route_name = Some(name.into());
        self
    }

    pub fn with_static_params(mut self, generator: Arc<dyn StaticParamsGenerator>) -> Self {
        self.static_params = Some(generator);
        self
    }

    pub fn with_loader(mut self) -> Self {
        self.has_loader = true;
        self
    }
}

impl fmt::Debug for ModuleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleDescriptor")
            .field("has_default", &self.has_default)
            .field("settings", &self.settings)
            .field("static_params", &self.static_params.is_some())
            .field("has_loader", &self.has_loader)
            .field("api_methods", &self.api_methods)
            .finish()
    }
}

/// Normalize a key to `./path.ext` form
///
/// ```
/// use fsroute::registry::normalize_registry_key;
///
/// assert_eq!(normalize_registry_key("a/b"), "./a/b.js");
/// assert_eq!(normalize_registry_key("./index.tsx"), "./index.tsx");
/// assert_eq!(normalize_registry_key("/users+api.ts"), "./users+api.ts");
/// ```
pub fn normalize_registry_key(key: &str) -> String {
    let relative = key.trim_start_matches("./").trim_start_matches('/');
    if strip_extension(relative).is_some() {
        format!("./{}", relative)
    } else {
        format!("./{}.js", relative)
    }
}

/// Registry held entirely in memory, preserving insertion order
#[derive(Debug, Clone, Default)]
pub struct InMemoryRegistry {
    modules: IndexMap<String, Arc<ModuleDescriptor>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry where every key is a plain screen module
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        keys.into_iter().fold(Self::new(), |registry, key| {
            registry.with(key.as_ref(), ModuleDescriptor::screen())
        })
    }

    pub fn with(mut self, key: &str, module: ModuleDescriptor) -> Self {
        self.insert(key, module);
        self
    }

    pub fn insert(&mut self, key: &str, module: ModuleDescriptor) {
        self.modules
            .insert(normalize_registry_key(key), Arc::new(module));
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl RouteRegistry for InMemoryRegistry {
    fn keys(&self) -> Vec<String> {
        self.modules.keys().cloned().collect()
    }

    fn get(&self, key: &str) -> Option<Arc<ModuleDescriptor>> {
        self.modules.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_in_memory_registry_normalizes_keys() {
        let registry = InMemoryRegistry::from_keys(["index", "./(app)/home.tsx", "/about"]);
        assert_eq!(
            registry.keys(),
            vec!["./index.js", "./(app)/home.tsx", "./about.js"]
        );
        assert!(registry.get("./index.js").is_some());
        assert!(registry.get("index").is_none());
    }

    #[test]
    fn test_route_settings_group_overrides() {
        let settings: RouteSettings = serde_json::from_value(json!({
            "initialRouteName": "index",
            "app": { "initialRouteName": "home" }
        }))
        .unwrap();

        assert_eq!(settings.initial_route_name.as_deref(), Some("index"));
        assert_eq!(
            settings.group("app").and_then(|g| g.initial_route_name.as_deref()),
            Some("home")
        );
        assert!(settings.group("other").is_none());
    }

    #[tokio::test]
    async fn test_fixed_and_fn_generators() {
        let params = json!({ "id": "1" }).as_object().cloned().unwrap();
        let fixed = FixedParams(vec![params.clone()]);
        assert_eq!(
            fixed.generate(StaticParamsContext::default()).await.unwrap(),
            vec![params]
        );

        let echo = params_fn(|ctx: StaticParamsContext| async move {
            Ok::<_, anyhow::Error>(vec![ctx.params])
        });
        let mut parent = StaticParams::new();
        parent.insert("lang".to_string(), json!("en"));
        let out = echo
            .generate(StaticParamsContext { params: parent.clone() })
            .await
            .unwrap();
        assert_eq!(out, vec![parent]);
    }
}
