/// File metadata parsing and route name expansion
///
/// Pure functional parsers that transform registry keys into route names.
/// Errors are returned for malformed names; nothing here touches the registry.
use indexmap::IndexSet;

use super::pattern::{
    is_group_segment, match_array_group_name, match_deep_dynamic_route_name, match_dynamic_name,
    split_array_group,
};
use super::DynamicSegment;
use crate::config::{Platform, RouteOptions};
use crate::error::RouteError;
use crate::path::{remove_supported_extensions, strip_extension};

/// What a registry file contributes to the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Layout,
    Route,
    Api,
    Middleware,
    NotFound,
}

/// Parsed metadata for one registry key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMeta {
    /// Route name without extension, platform or `./` prefix
    pub route: String,
    /// 0 = no platform, 1 = `.native`, 2 = exact platform
    pub specificity: usize,
    pub kind: FileKind,
    pub platform: Option<Platform>,
}

/// Classify a registry key
///
/// Returns `Ok(None)` for platform files that do not apply to `options`.
///
/// # Examples
///
/// ```
/// use fsroute::config::{Platform, RouteOptions};
/// use fsroute::route::parser::{get_file_meta, FileKind};
///
/// let options = RouteOptions::default().with_platform(Platform::Ios);
///
/// let meta = get_file_meta("./(app)/_layout.tsx", &options).unwrap().unwrap();
/// assert_eq!(meta.kind, FileKind::Layout);
/// assert_eq!(meta.route, "(app)/_layout");
///
/// let meta = get_file_meta("./index.ios.tsx", &options).unwrap().unwrap();
/// assert_eq!((meta.route.as_str(), meta.specificity), ("index", 2));
///
/// assert!(get_file_meta("./index.android.tsx", &options).unwrap().is_none());
/// assert!(get_file_meta("./(b).tsx", &options).is_err());
/// ```
pub fn get_file_meta(key: &str, options: &RouteOptions) -> Result<Option<FileMeta>, RouteError> {
    let relative = key.strip_prefix("./").unwrap_or(key);
    let (directory, filename) = match relative.rsplit_once('/') {
        Some((directory, filename)) => (Some(directory), filename),
        None => (None, relative),
    };

    let mut route = remove_supported_extensions(relative).to_string();
    let mut stem_parts = remove_supported_extensions(filename).split('.');
    let name = stem_parts.next().unwrap_or_default();
    let platform_extension = stem_parts.next();

    let is_api = is_api_filename(filename);

    if name.starts_with('(') && name.ends_with(')') {
        return Err(RouteError::TrailingGroup {
            key: format!("./{}", relative),
        });
    }

    if !is_api && filename.starts_with('+') && name != "+not-found" && name != "+middleware" {
        let renamed = match directory {
            Some(directory) => format!("{}/{}", directory, &filename[1..]),
            None => filename[1..].to_string(),
        };
        return Err(RouteError::ReservedPrefix {
            key: format!("./{}", relative),
            renamed,
        });
    }

    if has_misplaced_catch_all(&route) {
        return Err(RouteError::MisplacedCatchAll {
            key: format!("./{}", relative),
        });
    }

    let kind = if is_api {
        FileKind::Api
    } else {
        match name {
            "_layout" => FileKind::Layout,
            "+middleware" => FileKind::Middleware,
            "+not-found" => FileKind::NotFound,
            _ => FileKind::Route,
        }
    };

    let mut specificity = 0;
    let platform = platform_extension.and_then(Platform::from_extension);

    if let (Some(platform), Some(extension)) = (platform, platform_extension) {
        if is_api {
            return Err(RouteError::ApiPlatformExtension {
                platform: extension.to_string(),
                key: format!("./{}", relative),
            });
        }

        match platform_specificity(platform, options) {
            Some(value) => specificity = value,
            None => return Ok(None),
        }

        if let Some(stripped) = route.strip_suffix(&format!(".{}", extension)) {
            route = stripped.to_string();
        }
    }

    Ok(Some(FileMeta {
        route,
        specificity,
        kind,
        platform,
    }))
}

/// Specificity of a file carrying `platform`, or `None` when it does not apply
fn platform_specificity(platform: Platform, options: &RouteOptions) -> Option<usize> {
    if !options.platform_extensions {
        return None;
    }
    let target = options.platform?;

    if platform == target {
        Some(2)
    } else if platform == Platform::Native && target != Platform::Web {
        Some(1)
    } else {
        None
    }
}

/// `name+api.ts` or `name+api.<platform>.ts`
fn is_api_filename(filename: &str) -> bool {
    match strip_extension(filename) {
        Some(stem) => {
            stem.ends_with("+api")
                || stem
                    .rsplit_once('.')
                    .is_some_and(|(head, _)| head.ends_with("+api"))
        }
        None => false,
    }
}

/// Expand every array group into its Cartesian product of single groups
///
/// Results keep discovery order and contain no duplicates.
///
/// ```
/// use fsroute::route::parser::extrapolate_groups;
///
/// let routes = extrapolate_groups("(a,b)/(c,d)/page").unwrap();
/// assert_eq!(routes, vec!["(a)/(c)/page", "(a)/(d)/page", "(b)/(c)/page", "(b)/(d)/page"]);
/// ```
pub fn extrapolate_groups(route: &str) -> Result<Vec<String>, RouteError> {
    let mut routes = IndexSet::new();
    extrapolate_into(route, &mut routes)?;
    Ok(routes.into_iter().collect())
}

fn extrapolate_into(route: &str, routes: &mut IndexSet<String>) -> Result<(), RouteError> {
    let segments: Vec<&str> = route.split('/').collect();
    let array_index = segments
        .iter()
        .position(|segment| match_array_group_name(segment).is_some());

    let Some(index) = array_index else {
        routes.insert(route.to_string());
        return Ok(());
    };

    let inner = match_array_group_name(segments[index]).unwrap_or_default();
    let groups = split_array_group(inner);

    let unique: IndexSet<&str> = groups.iter().copied().collect();
    if unique.len() != groups.len() {
        return Err(RouteError::DuplicateArrayGroup {
            groups: groups.join(","),
            key: route.to_string(),
        });
    }

    for group in groups {
        let expanded = segments
            .iter()
            .enumerate()
            .map(|(i, segment)| {
                if i == index {
                    format!("({})", group)
                } else {
                    segment.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("/");
        extrapolate_into(&expanded, routes)?;
    }

    Ok(())
}

/// A catch-all may only be followed by groups, `index` or `_layout`
fn has_misplaced_catch_all(route: &str) -> bool {
    route
        .split('/')
        .skip_while(|segment| match_deep_dynamic_route_name(segment).is_none())
        .skip(1)
        .any(|segment| !is_group_segment(segment) && segment != "index" && segment != "_layout")
}

/// Dynamic segments of a route name, or `None` when fully static
///
/// ```
/// use fsroute::route::parser::generate_dynamic;
/// use fsroute::route::DynamicSegment;
///
/// assert_eq!(generate_dynamic("about"), None);
/// assert_eq!(
///     generate_dynamic("[user]/posts/[...rest]"),
///     Some(vec![DynamicSegment::single("user"), DynamicSegment::catch_all("rest")])
/// );
/// assert_eq!(generate_dynamic("+not-found"), Some(vec![DynamicSegment::not_found()]));
/// ```
pub fn generate_dynamic(route: &str) -> Option<Vec<DynamicSegment>> {
    let dynamic: Vec<DynamicSegment> = route
        .split('/')
        .filter_map(|segment| {
            if segment == "+not-found" {
                Some(DynamicSegment::not_found())
            } else if let Some(name) = match_deep_dynamic_route_name(segment) {
                Some(DynamicSegment::catch_all(name))
            } else {
                match_dynamic_name(segment).map(DynamicSegment::single)
            }
        })
        .collect();

    if dynamic.is_empty() {
        None
    } else {
        Some(dynamic)
    }
}
