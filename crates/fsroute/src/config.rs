// File: src/config.rs
// Purpose: Options controlling route tree compilation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target platform used to resolve platform-specific files (`index.ios.tsx`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Android,
    Ios,
    Native,
    Web,
}

impl Platform {
    /// Parse a file extension segment (`ios`, `native`, ...)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "android" => Some(Platform::Android),
            "ios" => Some(Platform::Ios),
            "native" => Some(Platform::Native),
            "web" => Some(Platform::Web),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Android => "android",
            Platform::Ios => "ios",
            Platform::Native => "native",
            Platform::Web => "web",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::from_extension(&s.to_ascii_lowercase())
            .ok_or_else(|| format!("unknown platform '{}' (expected android, ios, native or web)", s))
    }
}

/// Whether conflicts abort compilation or resolve to the first file found
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    #[default]
    Development,
    Production,
}

impl ExecutionMode {
    pub fn is_production(&self) -> bool {
        matches!(self, ExecutionMode::Production)
    }
}

/// A `{ source, destination }` path rewrite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rewrite {
    pub source: String,
    pub destination: String,
}

impl Rewrite {
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }
}

/// Route tree compilation options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteOptions {
    /// Skip entry point and initial route resolution
    #[serde(default)]
    pub ignore_entry_points: bool,

    /// Do not add the generated `_sitemap` and `+not-found` routes
    #[serde(default)]
    pub skip_generated: bool,

    /// Keep `+api` files in the tree
    #[serde(default)]
    pub preserve_api_routes: bool,

    #[serde(default)]
    pub platform: Option<Platform>,

    /// Resolve `.ios`/`.android`/`.web`/`.native` files (default: true)
    #[serde(default = "default_true")]
    pub platform_extensions: bool,

    #[serde(default)]
    pub rewrites: Vec<Rewrite>,

    /// Keep rewrites as `rewrite` nodes instead of plain routes (default: true)
    #[serde(default = "default_true")]
    pub preserve_redirect_and_rewrites: bool,

    /// Discover a root `+middleware` file
    #[serde(default)]
    pub unstable_use_server_middleware: bool,

    /// Build nodes without lazy loaders
    #[serde(default)]
    pub internal_strip_load_route: bool,

    #[serde(default)]
    pub mode: ExecutionMode,

    /// Extra regexes; matching registry keys are skipped
    #[serde(default)]
    pub ignore: Vec<String>,

    #[serde(default = "default_true")]
    pub sitemap: bool,

    #[serde(default = "default_true")]
    pub not_found: bool,
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self {
            ignore_entry_points: false,
            skip_generated: false,
            preserve_api_routes: false,
            platform: None,
            platform_extensions: true,
            rewrites: Vec::new(),
            preserve_redirect_and_rewrites: true,
            unstable_use_server_middleware: false,
            internal_strip_load_route: false,
            mode: ExecutionMode::Development,
            ignore: Vec::new(),
            sitemap: true,
            not_found: true,
        }
    }
}

impl RouteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_rewrite(mut self, rewrite: Rewrite) -> Self {
        self.rewrites.push(rewrite);
        self
    }

    pub fn with_api_routes(mut self) -> Self {
        self.preserve_api_routes = true;
        self
    }

    pub fn with_middleware(mut self) -> Self {
        self.unstable_use_server_middleware = true;
        self
    }

    pub fn with_ignore(mut self, pattern: impl Into<String>) -> Self {
        self.ignore.push(pattern.into());
        self
    }

    pub fn skip_generated(mut self) -> Self {
        self.skip_generated = true;
        self
    }

    pub fn ignore_entry_points(mut self) -> Self {
        self.ignore_entry_points = true;
        self
    }

    pub fn strip_load_route(mut self) -> Self {
        self.internal_strip_load_route = true;
        self
    }
}

fn default_true() -> bool {
    true
}
