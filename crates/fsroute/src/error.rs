//! Error types for route compilation
//!
//! Every failure raised while building a route tree, expanding static params,
//! or compiling a manifest is a [`RouteError`]. Messages name the offending
//! source keys and, where there is a choice, the valid alternatives.

use thiserror::Error;

/// Broad classification of a [`RouteError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed route file name or placement
    Structural,
    /// Two files claim the same route, or a matcher cannot be compiled
    Conflict,
    /// Invalid settings, rewrites or middleware configuration
    Configuration,
    /// Static param generator output failed validation
    Validation,
}

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("Invalid route {key}. Routes cannot end with '(group)' syntax")]
    TrailingGroup { key: String },

    #[error("Invalid route {key}. Route nodes cannot start with the '+' character. \"Please rename to {renamed}\"")]
    ReservedPrefix { key: String, renamed: String },

    #[error("Invalid route {key}. Catch-all segments must be the last segment of a route")]
    MisplacedCatchAll { key: String },

    #[error("Array syntax cannot contain duplicate group name \"{groups}\" in \"{key}\".")]
    DuplicateArrayGroup { groups: String, key: String },

    #[error("Api routes cannot have platform extensions. Please remove '.{platform}' from '{key}'")]
    ApiPlatformExtension { platform: String, key: String },

    #[error("The file {key} does not have a fallback sibling file without a platform extension.")]
    MissingPlatformFallback { key: String },

    #[error("Middleware files must be placed at the root of the routes directory. Found nested middleware: {}", .keys.join(", "))]
    NestedMiddleware { keys: Vec<String> },

    #[error("The {label} \"{file}\" and \"{existing}\" conflict on the route \"/{route}\". Please remove or rename one of these files.")]
    DuplicateRoute {
        label: &'static str,
        file: String,
        existing: String,
        route: String,
    },

    #[error("Layout {layout} has invalid {setting} '{value}'{}. Valid options are: {valid}", group_suffix(.group))]
    InvalidInitialRoute {
        layout: String,
        setting: &'static str,
        value: String,
        group: Option<String>,
        valid: String,
    },

    #[error("Only one middleware file may exist at the root of the routes directory. Found: {}", .keys.join(", "))]
    MultipleMiddleware { keys: Vec<String> },

    #[error("Rewrite \"{source_path}\" points to \"{destination}\" which does not match any route")]
    RewriteDestinationNotFound {
        source_path: String,
        destination: String,
    },

    #[error("Rewrite \"{source_path}\" does not capture the dynamic segment \"{param}\" required by \"{destination}\"")]
    IncompatibleRewrite {
        source_path: String,
        destination: String,
        param: String,
    },

    #[error("Invalid ignore pattern \"{pattern}\": {source}")]
    InvalidIgnorePattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("[{key}]: generateStaticParams() must return an array of params that match the dynamic route{plural}. Expected non-nullish values for key{plural}: {}.\nReceived:\n{received}", quoted(.names), plural = plural_suffix(.names))]
    MissingStaticParams {
        key: String,
        names: Vec<String>,
        received: String,
    },

    #[error("generateStaticParams() for route \"{key}\" expected param \"{param}\" to be of type string, instead found \"{found}\" while parsing \"{value}\".")]
    InvalidStaticParamType {
        key: String,
        param: String,
        found: &'static str,
        value: String,
    },

    #[error("generateStaticParams() for route \"{key}\" expected param \"{param}\" to not contain \"/\" (multiple segments) while parsing \"{value}\".")]
    StaticParamMultipleSegments {
        key: String,
        param: String,
        value: String,
    },

    #[error("generateStaticParams() for route \"{key}\" expected param \"{param}\" not to be empty while parsing \"{value}\".")]
    EmptyStaticParam {
        key: String,
        param: String,
        value: String,
    },

    #[error("generateStaticParams() failed for route \"{key}\": {source}")]
    StaticParamsGenerator {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to compile matcher for \"{key}\": {source}")]
    InvalidMatcher {
        key: String,
        #[source]
        source: regex::Error,
    },
}

impl RouteError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            RouteError::TrailingGroup { .. }
            | RouteError::ReservedPrefix { .. }
            | RouteError::MisplacedCatchAll { .. }
            | RouteError::DuplicateArrayGroup { .. }
            | RouteError::ApiPlatformExtension { .. }
            | RouteError::MissingPlatformFallback { .. }
            | RouteError::NestedMiddleware { .. } => ErrorKind::Structural,
            RouteError::DuplicateRoute { .. } | RouteError::InvalidMatcher { .. } => {
                ErrorKind::Conflict
            }
            RouteError::InvalidInitialRoute { .. }
            | RouteError::MultipleMiddleware { .. }
            | RouteError::RewriteDestinationNotFound { .. }
            | RouteError::IncompatibleRewrite { .. }
            | RouteError::InvalidIgnorePattern { .. } => ErrorKind::Configuration,
            RouteError::MissingStaticParams { .. }
            | RouteError::InvalidStaticParamType { .. }
            | RouteError::StaticParamMultipleSegments { .. }
            | RouteError::EmptyStaticParam { .. }
            | RouteError::StaticParamsGenerator { .. } => ErrorKind::Validation,
        }
    }

    /// Whether production mode may resolve this error by keeping the first file
    pub fn is_suppressible(&self) -> bool {
        matches!(
            self,
            RouteError::DuplicateRoute { .. } | RouteError::MultipleMiddleware { .. }
        )
    }
}

fn group_suffix(group: &Option<String>) -> String {
    match group {
        Some(group) => format!(" for group '({})'", group),
        None => String::new(),
    }
}

fn plural_suffix(names: &[String]) -> &'static str {
    if names.len() > 1 {
        "s"
    } else {
        ""
    }
}

fn quoted(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format!("\"{}\"", name))
        .collect::<Vec<_>>()
        .join(", ")
}
