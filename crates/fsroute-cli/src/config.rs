// File: src/config.rs
// Purpose: Configuration parsing from fsroute.toml

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use fsroute::registry::{
    FixedParams, ModuleDescriptor, RouteSettings, StaticParams, StaticParamsGenerator,
};
use fsroute::RouteOptions;
use serde::{Deserialize, Serialize};

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Module metadata keyed by registry key (`"./(app)/_layout.tsx"`)
    #[serde(default)]
    pub modules: BTreeMap<String, ModuleConfig>,
}

/// Routing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Directory containing route files (default: "app")
    #[serde(default = "default_app_dir")]
    pub app_dir: String,

    #[serde(flatten)]
    pub options: RouteOptions,
}

/// What a route module would export, declared in TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleConfig {
    #[serde(default = "default_true")]
    pub has_default: bool,

    #[serde(default)]
    pub has_loader: bool,

    #[serde(default)]
    pub settings: Option<RouteSettings>,

    /// Param sets returned by the module's static params generator
    #[serde(default)]
    pub static_params: Option<Vec<StaticParams>>,

    #[serde(default)]
    pub api_methods: Vec<String>,
}

fn default_app_dir() -> String {
    "app".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            app_dir: default_app_dir(),
            options: RouteOptions::default(),
        }
    }
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            has_default: true,
            has_loader: false,
            settings: None,
            static_params: None,
            api_methods: Vec::new(),
        }
    }
}

impl ModuleConfig {
    pub fn to_descriptor(&self) -> ModuleDescriptor {
        let static_params = self.static_params.clone().map(|sets| {
            let generator: Arc<dyn StaticParamsGenerator> = Arc::new(FixedParams(sets));
            generator
        });

        ModuleDescriptor {
            has_default: self.has_default,
            settings: self.settings.clone(),
            static_params,
            has_loader: self.has_loader,
            api_methods: self.api_methods.clone(),
        }
    }
}

impl Config {
    /// Load configuration from fsroute.toml
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // Missing or empty file means defaults
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fsroute::config::{ExecutionMode, Rewrite};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.routing.app_dir, "app");
        assert_eq!(config.routing.options, RouteOptions::default());
        assert!(config.modules.is_empty());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = Config::load("does/not/exist/fsroute.toml").unwrap();
        assert_eq!(config.routing.app_dir, "app");
    }

    #[test]
    fn test_parse_routing_and_modules() {
        let content = r#"
            [routing]
            app_dir = "src/app"
            mode = "production"
            preserve_api_routes = true

            [[routing.rewrites]]
            source = "/old"
            destination = "/(app)/index"

            [modules."./_layout.tsx".settings]
            initialRouteName = "home"

            [modules."./[color].tsx"]
            static_params = [{ color = "red" }, { color = "blue" }]

            [modules."./users+api.ts"]
            has_default = false
            api_methods = ["GET", "POST"]
        "#;

        let config: Config = toml::from_str(content).unwrap();

        assert_eq!(config.routing.app_dir, "src/app");
        assert_eq!(config.routing.options.mode, ExecutionMode::Production);
        assert!(config.routing.options.preserve_api_routes);
        assert!(config.routing.options.sitemap);
        assert_eq!(
            config.routing.options.rewrites,
            vec![Rewrite::new("/old", "/(app)/index")]
        );

        let layout = config.modules["./_layout.tsx"].to_descriptor();
        assert_eq!(
            layout.settings.unwrap().initial_route_name.as_deref(),
            Some("home")
        );

        let color = &config.modules["./[color].tsx"];
        assert_eq!(color.static_params.as_ref().map(Vec::len), Some(2));
        assert!(color.to_descriptor().static_params.is_some());

        let api = config.modules["./users+api.ts"].to_descriptor();
        assert!(!api.has_default);
        assert_eq!(api.api_methods, vec!["GET", "POST"]);
    }
}
