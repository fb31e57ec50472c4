//! # fsroute
//!
//! Compiles a registry of route module files into a route tree and server
//! path matchers. Supports:
//! - Static routes (`about.tsx`)
//! - Dynamic parameters (`users/[id].tsx`)
//! - Catch-all routes (`docs/[...slug].tsx`)
//! - Groups and array groups (`(app)/home.tsx`, `(a,b)/shared.tsx`)
//! - Nested layouts (`_layout.tsx`) and not-found screens (`+not-found.tsx`)
//! - API routes (`users+api.ts`) and root middleware (`+middleware.ts`)
//! - Platform variants (`index.ios.tsx`, `index.native.tsx`)
//!
//! ## Pipeline
//!
//! 1. [`get_routes`] turns registry keys into a [`RouteNode`] tree
//! 2. [`load_static_params`] expands dynamic routes into concrete ones
//! 3. [`get_server_manifest`] flattens the tree into ordered named regexes
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use fsroute::{get_routes, get_server_manifest, CompiledManifest, InMemoryRegistry, RouteOptions};
//!
//! let registry = Arc::new(InMemoryRegistry::from_keys([
//!     "./_layout.tsx",
//!     "./index.tsx",
//!     "./users/[id].tsx",
//! ]));
//!
//! let root = get_routes(registry, &RouteOptions::default()).unwrap().unwrap();
//! assert_eq!(root.source_key, "./_layout.tsx");
//!
//! let matcher = CompiledManifest::new(&get_server_manifest(&root)).unwrap();
//! let found = matcher.match_path("/users/123").unwrap();
//! assert_eq!(found.params.get("id"), Some(&"123".to_string()));
//! ```

pub mod config;
pub mod error;
pub mod manifest;
pub mod path;
pub mod registry;
pub mod route;
pub mod static_params;
pub mod tree;

pub use config::{ExecutionMode, Platform, Rewrite, RouteOptions};
pub use error::{ErrorKind, RouteError};
pub use manifest::{
    get_server_manifest, CompiledManifest, MatchKind, RouteInfo, RouteMatch, ServerManifest,
};
pub use registry::{
    InMemoryRegistry, ModuleDescriptor, RouteRegistry, RouteSettings, StaticParams,
    StaticParamsGenerator,
};
pub use route::{DynamicSegment, RouteKind, RouteNode};
pub use static_params::load_static_params;
pub use tree::{
    get_exact_routes, get_routes, GENERATED_LAYOUT_KEY, GENERATED_NOT_FOUND_KEY,
    GENERATED_SITEMAP_KEY,
};
