//! Hot-reload configuration manager
//!
//! The active configuration is an immutable `Arc<DomainConfig>` behind a
//! lock held only for the pointer swap. Queries snapshot the `Arc` once at
//! the start and use that snapshot throughout, so a reload mid-query never
//! tears the configuration they see.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::{ConfigError, DomainConfig};

/// Publishes domain configuration snapshots with swap-on-success reload
pub struct RouterConfigManager {
    current: RwLock<Arc<DomainConfig>>,
    /// Source path, when loaded from a file
    source: Option<PathBuf>,
}

impl RouterConfigManager {
    /// Manager over the built-in default domain
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(DomainConfig::default())),
            source: None,
        }
    }

    /// Manager over an already-validated configuration
    pub fn with_config(config: DomainConfig) -> Self {
        Self {
            current: RwLock::new(Arc::new(config)),
            source: None,
        }
    }

    /// Load and validate from a file; fails fast on any violation
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = DomainConfig::load(path)?;
        tracing::info!(
            domain = %config.domain,
            version = %config.version,
            endpoints = config.endpoints.len(),
            "domain configuration loaded"
        );
        Ok(Self {
            current: RwLock::new(Arc::new(config)),
            source: Some(path.to_path_buf()),
        })
    }

    /// Current configuration snapshot
    ///
    /// Callers dereference once per query and hold the `Arc` for the whole
    /// classification; later reloads do not affect them.
    pub fn snapshot(&self) -> Arc<DomainConfig> {
        Arc::clone(&self.current.read())
    }

    /// Reload from the original source path
    ///
    /// The swap happens only after load and validation both succeed; on
    /// any error the active configuration is left untouched.
    pub fn reload(&self) -> Result<(), ConfigError> {
        let path = self
            .source
            .as_ref()
            .ok_or_else(|| ConfigError::FileNotFound("no source path set".to_string()))?
            .clone();
        self.reload_from(path)
    }

    /// Reload from an explicit path, swap-on-success
    pub fn reload_from(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let config = DomainConfig::load(path)?;
        tracing::info!(
            version = %config.version,
            endpoints = config.endpoints.len(),
            "domain configuration reloaded"
        );
        *self.current.write() = Arc::new(config);
        Ok(())
    }
}

impl Default for RouterConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_snapshot_survives_reload() {
        let manager = RouterConfigManager::new();
        let before = manager.snapshot();

        let mut replacement = DomainConfig::default();
        replacement.version = "2.0.0".to_string();
        let mut file = tempfile::NamedTempFile::with_suffix(".json").unwrap();
        file.write_all(serde_json::to_string(&replacement).unwrap().as_bytes())
            .unwrap();

        manager.reload_from(file.path()).unwrap();

        // The old snapshot still reads consistently
        assert_eq!(before.version, "1.0.0");
        assert_eq!(manager.snapshot().version, "2.0.0");
    }

    #[test]
    fn test_failed_reload_keeps_active_config() {
        let manager = RouterConfigManager::new();

        let mut broken = DomainConfig::default();
        broken.endpoints[0].min_confidence = 5.0;
        let mut file = tempfile::NamedTempFile::with_suffix(".json").unwrap();
        file.write_all(serde_json::to_string(&broken).unwrap().as_bytes())
            .unwrap();

        assert!(manager.reload_from(file.path()).is_err());
        assert_eq!(manager.snapshot().version, "1.0.0");
    }

    #[test]
    fn test_reload_without_source() {
        let manager = RouterConfigManager::new();
        assert!(matches!(
            manager.reload(),
            Err(ConfigError::FileNotFound(_))
        ));
    }
}
