/// Route module for file-based routing
///
/// Contains the route tree data model plus the pure parsing helpers the
/// builder uses to turn registry keys into nodes:
/// - `pattern`: single segment classification
/// - `parser`: file metadata, array group expansion, dynamic segments
use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::registry::{ModuleDescriptor, RouteRegistry};

pub mod parser;
pub mod pattern;

// Re-export commonly used types
pub use parser::{extrapolate_groups, generate_dynamic, get_file_meta, FileKind, FileMeta};
pub use pattern::{classify_segment, SegmentType};

/// Route node kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteKind {
    /// Owns children and establishes a navigation boundary
    Layout,
    /// Leaf screen
    Route,
    /// Leaf request handler (`name+api`)
    Api,
    /// Alias serving another node's file
    Rewrite,
}

/// One dynamic segment of a route name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicSegment {
    pub name: String,
    /// `[...name]` absorbs the remaining path
    pub is_catch_all: bool,
    /// Generated `+not-found` fallback
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_not_found: bool,
}

impl DynamicSegment {
    pub fn single(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_catch_all: false,
            is_not_found: false,
        }
    }

    pub fn catch_all(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_catch_all: true,
            is_not_found: false,
        }
    }

    pub fn not_found() -> Self {
        Self {
            name: "+not-found".to_string(),
            is_catch_all: true,
            is_not_found: true,
        }
    }
}

/// Lazy, memoized access to a node's module
///
/// Clones share the memo, so a file expanded into several nodes is loaded once.
#[derive(Clone)]
pub struct RouteLoader {
    registry: Arc<dyn RouteRegistry>,
    key: String,
    module: Arc<OnceCell<Option<Arc<ModuleDescriptor>>>>,
}

impl RouteLoader {
    pub fn new(registry: Arc<dyn RouteRegistry>, key: impl Into<String>) -> Self {
        Self {
            registry,
            key: key.into(),
            module: Arc::new(OnceCell::new()),
        }
    }

    /// Registry key this loader resolves
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the module, querying the registry at most once
    pub fn load(&self) -> Option<Arc<ModuleDescriptor>> {
        self.module
            .get_or_init(|| self.registry.get(&self.key))
            .clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.module.get().is_some()
    }
}

impl PartialEq for RouteLoader {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl fmt::Debug for RouteLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteLoader")
            .field("key", &self.key)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

/// Reference to the root middleware file
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MiddlewareRef {
    pub source_key: String,
    #[serde(skip)]
    pub loader: Option<RouteLoader>,
}

/// A node in the compiled route tree
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteNode {
    #[serde(rename = "type")]
    pub kind: RouteKind,
    /// Name relative to the closest ancestor layout
    pub name: String,
    /// Registry key of the backing file
    pub source_key: String,
    pub dynamic: Option<Vec<DynamicSegment>>,
    pub children: Vec<RouteNode>,
    #[serde(skip_serializing_if = "is_false")]
    pub is_generated: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub is_internal: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_points: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_route_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middleware: Option<MiddlewareRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_source_key: Option<String>,
    #[serde(skip)]
    pub loader: Option<RouteLoader>,
}

impl RouteNode {
    pub fn new(kind: RouteKind, name: impl Into<String>, source_key: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            source_key: source_key.into(),
            dynamic: None,
            children: Vec::new(),
            is_generated: false,
            is_internal: false,
            entry_points: None,
            initial_route_name: None,
            anchor: None,
            middleware: None,
            destination_source_key: None,
            loader: None,
        }
    }

    /// A synthetic node with no backing file
    pub fn generated(kind: RouteKind, name: impl Into<String>, source_key: impl Into<String>) -> Self {
        Self {
            is_generated: true,
            is_internal: true,
            ..Self::new(kind, name, source_key)
        }
    }

    pub fn with_loader(mut self, loader: RouteLoader) -> Self {
        self.loader = Some(loader);
        self
    }

    pub fn with_dynamic(mut self, dynamic: Option<Vec<DynamicSegment>>) -> Self {
        self.dynamic = dynamic;
        self
    }

    pub fn with_children(mut self, children: Vec<RouteNode>) -> Self {
        self.children = children;
        self
    }

    /// Load this node's module through its lazy loader
    pub fn load_route(&self) -> Option<Arc<ModuleDescriptor>> {
        self.loader.as_ref().and_then(RouteLoader::load)
    }

    pub fn is_layout(&self) -> bool {
        self.kind == RouteKind::Layout
    }

    /// Whether this node is the `+not-found` fallback
    pub fn is_not_found(&self) -> bool {
        self.dynamic
            .as_ref()
            .and_then(|segments| segments.last())
            .is_some_and(|segment| segment.is_not_found)
    }

    /// Find a direct child by name
    pub fn child(&self, name: &str) -> Option<&RouteNode> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Depth-first iterator over this node and all descendants
    pub fn iter(&self) -> impl Iterator<Item = &RouteNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::InMemoryRegistry;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingRegistry {
        inner: InMemoryRegistry,
        hits: AtomicUsize,
    }

    impl RouteRegistry for CountingRegistry {
        fn keys(&self) -> Vec<String> {
            self.inner.keys()
        }

        fn get(&self, key: &str) -> Option<Arc<ModuleDescriptor>> {
            self.hits.fetch_add(1, Ordering::SeqCst);
            self.inner.get(key)
        }
    }

    #[test]
    fn test_loader_is_memoized_across_clones() {
        let registry = Arc::new(CountingRegistry {
            inner: InMemoryRegistry::from_keys(["index"]),
            hits: AtomicUsize::new(0),
        });
        let loader = RouteLoader::new(registry.clone(), "./index.js");
        let copy = loader.clone();

        assert!(!loader.is_loaded());
        assert!(loader.load().is_some());
        assert!(copy.load().is_some());
        assert_eq!(registry.hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_iter_is_depth_first() {
        let tree = RouteNode::new(RouteKind::Layout, "", "./_layout.js").with_children(vec![
            RouteNode::new(RouteKind::Layout, "a", "./a/_layout.js")
                .with_children(vec![RouteNode::new(RouteKind::Route, "b", "./a/b.js")]),
            RouteNode::new(RouteKind::Route, "c", "./c.js"),
        ]);

        let names: Vec<_> = tree.iter().map(|node| node.name.as_str()).collect();
        assert_eq!(names, vec!["", "a", "b", "c"]);
    }

    #[test]
    fn test_serializes_kind_as_type() {
        let node = RouteNode::generated(RouteKind::Route, "_sitemap", "fsroute/_sitemap.js");
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["type"], "route");
        assert_eq!(value["isGenerated"], true);
        assert_eq!(value["sourceKey"], "fsroute/_sitemap.js");
        assert!(value.get("loader").is_none());
    }
}
