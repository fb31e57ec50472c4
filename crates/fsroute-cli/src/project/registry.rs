use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Result};
use fsroute::path::SUPPORTED_EXTENSIONS;
use fsroute::registry::{ModuleDescriptor, RouteRegistry};
use tracing::debug;
use walkdir::WalkDir;

use crate::config::ModuleConfig;

/// Registry backed by a routes directory on disk
///
/// Keys are discovered by walking the directory; module metadata comes from
/// the `[modules]` table of the config. Files without an entry are treated as
/// plain screens (or method-less api handlers).
#[derive(Debug, Default)]
pub struct FsRegistry {
    keys: Vec<String>,
    modules: BTreeMap<String, Arc<ModuleDescriptor>>,
}

impl FsRegistry {
    /// Walk `app_dir` and collect every route module file
    pub fn discover(app_dir: &Path, modules: &BTreeMap<String, ModuleConfig>) -> Result<Self> {
        if !app_dir.is_dir() {
            bail!("Routes directory not found: {:?}", app_dir);
        }

        let keys: Vec<String> = WalkDir::new(app_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let relative = entry.path().strip_prefix(app_dir).ok()?;
                registry_key(relative)
            })
            .collect();

        debug!(count = keys.len(), dir = ?app_dir, "discovered route files");

        let modules = modules
            .iter()
            .map(|(key, module)| (key.clone(), Arc::new(module.to_descriptor())))
            .collect();

        Ok(Self { keys, modules })
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// `./`-prefixed key with `/` separators, or `None` for non-module files
fn registry_key(relative: &Path) -> Option<String> {
    let parts: Vec<&str> = relative
        .components()
        .map(|component| component.as_os_str().to_str())
        .collect::<Option<_>>()?;
    let joined = parts.join("/");

    SUPPORTED_EXTENSIONS
        .iter()
        .any(|ext| joined.ends_with(ext))
        .then(|| format!("./{}", joined))
}

impl RouteRegistry for FsRegistry {
    fn keys(&self) -> Vec<String> {
        self.keys.clone()
    }

    fn get(&self, key: &str) -> Option<Arc<ModuleDescriptor>> {
        if !self.keys.iter().any(|known| known == key) {
            return None;
        }

        let module = self.modules.get(key).cloned().unwrap_or_else(|| {
            if key.contains("+api.") {
                Arc::new(ModuleDescriptor::api(&[]))
            } else {
                Arc::new(ModuleDescriptor::screen())
            }
        });
        Some(module)
    }
}
