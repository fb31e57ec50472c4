mod registry;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use fsroute::{get_routes, RouteNode, RouteOptions};

use crate::config::Config;
pub use registry::FsRegistry;

/// A routes directory plus the options it compiles with
pub struct Project {
    pub app_dir: PathBuf,
    pub options: RouteOptions,
    pub registry: Arc<FsRegistry>,
}

impl Project {
    /// Load `fsroute.toml` and discover the routes directory it names
    ///
    /// A relative `app_dir` resolves against the config file's directory.
    pub fn load(config_path: &Path, overrides: impl FnOnce(&mut RouteOptions)) -> Result<Self> {
        let config = Config::load(config_path)?;

        let base = config_path.parent().unwrap_or_else(|| Path::new("."));
        let app_dir = base.join(&config.routing.app_dir);

        let mut options = config.routing.options;
        overrides(&mut options);

        let registry = FsRegistry::discover(&app_dir, &config.modules)
            .with_context(|| format!("Failed to load routes from {:?}", app_dir))?;

        Ok(Self {
            app_dir,
            options,
            registry: Arc::new(registry),
        })
    }

    /// Compile the route tree, failing when the directory holds no routes
    pub fn routes(&self) -> Result<RouteNode> {
        get_routes(self.registry.clone(), &self.options)
            .with_context(|| format!("Failed to compile routes in {:?}", self.app_dir))?
            .with_context(|| format!("No route files found in {:?}", self.app_dir))
    }
}
