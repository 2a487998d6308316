//! Locates the tsconfig.json governing a file
//!
//! The upward directory walk and the extends merge are both cheap but run on
//! every active-editor change, so results may be memoized in a shared
//! [`ConfigCache`]. The cache is an optimization only: a resolver without
//! one produces identical results.

use crate::tsconfig::{BuildConfiguration, TsConfig, TSCONFIG_FILE_NAME};
use airship_foundation::paths::{is_within, normalize_path};
use airship_foundation::{AirshipError, AirshipResult};
use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, trace};

/// Memoized lookups, shared between resolvers and threads
#[derive(Debug, Default)]
pub struct ConfigCache {
    /// directory → nearest tsconfig.json at or above it
    nearest: DashMap<PathBuf, PathBuf>,
    /// tsconfig.json → merged configuration
    resolved: DashMap<PathBuf, Arc<BuildConfiguration>>,
}

impl ConfigCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything that depends on `changed`
    ///
    /// Call this from a file watcher whenever a configuration file is
    /// created, modified or deleted.
    pub fn invalidate(&self, changed: &Path) {
        let changed = normalize_path(changed);
        let is_config_name = changed
            .file_name()
            .is_some_and(|name| name == TSCONFIG_FILE_NAME);
        let changed_dir = changed.parent().map(Path::to_path_buf);

        self.resolved
            .retain(|_, config| !config.source_files.iter().any(|f| f == &changed));
        self.nearest.retain(|dir, found| {
            if *found == changed {
                return false;
            }
            // A new tsconfig.json shadows the one found for directories below it
            !(is_config_name && changed_dir.as_deref().is_some_and(|d| is_within(d, dir)))
        });

        debug!(path = %changed.display(), "Invalidated tsconfig cache");
    }

    pub fn clear(&self) {
        self.nearest.clear();
        self.resolved.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.nearest.is_empty() && self.resolved.is_empty()
    }
}

/// Resolves the build configuration for arbitrary file paths
#[derive(Debug, Clone, Default)]
pub struct ConfigurationResolver {
    cache: Option<Arc<ConfigCache>>,
}

impl ConfigurationResolver {
    /// Resolver that reads from disk on every call
    pub fn new() -> Self {
        Self { cache: None }
    }

    /// Resolver memoizing through `cache`
    pub fn with_cache(cache: Arc<ConfigCache>) -> Self {
        Self { cache: Some(cache) }
    }

    /// Find the configuration governing `file_path` and merge its extends chain
    ///
    /// `file_path` does not have to exist.
    pub fn resolve(&self, file_path: &Path) -> AirshipResult<BuildConfiguration> {
        let config_path = self.find_config_file(file_path)?;

        if let Some(cache) = &self.cache {
            if let Some(cached) = cache.resolved.get(&config_path) {
                trace!(config = %config_path.display(), "tsconfig cache hit");
                return Ok(cached.value().as_ref().clone());
            }
        }

        let config = TsConfig::load_and_merge(&config_path)?;

        if let Some(cache) = &self.cache {
            cache
                .resolved
                .insert(config_path.clone(), Arc::new(config.clone()));
        }

        Ok(config)
    }

    /// Nearest tsconfig.json in the file's directory or any ancestor
    pub fn find_config_file(&self, file_path: &Path) -> AirshipResult<PathBuf> {
        let file_path = normalize_path(file_path);
        let not_found = || AirshipError::config_not_found(&file_path);

        let mut current = file_path.parent().ok_or_else(not_found)?;
        let mut ancestors_to_cache: Vec<PathBuf> = Vec::new();

        loop {
            if let Some(cache) = &self.cache {
                let cached = cache.nearest.get(current).map(|entry| entry.value().clone());
                if let Some(found) = cached {
                    for ancestor in ancestors_to_cache {
                        cache.nearest.insert(ancestor, found.clone());
                    }
                    return Ok(found);
                }
            }

            let candidate = current.join(TSCONFIG_FILE_NAME);
            if candidate.is_file() {
                debug!(
                    file = %file_path.display(),
                    config = %candidate.display(),
                    "Found tsconfig"
                );
                if let Some(cache) = &self.cache {
                    cache.nearest.insert(current.to_path_buf(), candidate.clone());
                    for ancestor in ancestors_to_cache {
                        cache.nearest.insert(ancestor, candidate.clone());
                    }
                }
                return Ok(candidate);
            }

            ancestors_to_cache.push(current.to_path_buf());
            current = match current.parent() {
                Some(parent) => parent,
                None => return Err(not_found()),
            };
        }
    }
}
