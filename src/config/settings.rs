//! Handler configuration

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::registry::directory::{CapabilityTag, StaticDirectory};
use crate::registry::surfaces::SurfaceId;
use crate::util::paths::config_path;

/// Example configuration file contents (bundled with the binary)
pub const EXAMPLE_CONFIG: &str = include_str!("config.toml.example");

/// Fault handler configuration.
///
/// Set once before the handler is armed; never mutated while a fault is
/// being handled.
#[derive(Debug, Clone)]
pub struct HandlerConfig {
    /// Persist a crash log file for every handled fault
    pub persist_to_storage: bool,
    /// Crash log directory; None or empty = platform default
    pub storage_target_folder: Option<PathBuf>,
    /// Hand faults to a recovery surface
    pub launch_recovery_surface: bool,
    /// Launch the recovery surface even while backgrounded
    pub allow_recovery_when_backgrounded: bool,
    /// Offer a relaunch target to the recovery surface
    pub allow_process_relaunch: bool,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            persist_to_storage: false,
            storage_target_folder: None,
            launch_recovery_surface: true,
            allow_recovery_when_backgrounded: true,
            allow_process_relaunch: true,
        }
    }
}

/// TOML representation of the `[handler]` section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlHandlerConfig {
    pub persist_to_storage: Option<bool>,
    pub storage_target_folder: Option<PathBuf>,
    pub launch_recovery_surface: Option<bool>,
    pub allow_recovery_when_backgrounded: Option<bool>,
    pub allow_process_relaunch: Option<bool>,
}

/// TOML representation of the `[directory]` section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlDirectoryConfig {
    /// Surfaces registered under the error capability, in priority order
    pub error_handlers: Option<Vec<SurfaceId>>,
    /// Surfaces registered under the restart capability
    pub restart_handlers: Option<Vec<SurfaceId>>,
    /// Default entry point used when no restart handler is registered
    pub default_entry_point: Option<SurfaceId>,
}

impl TomlDirectoryConfig {
    /// Build a static directory service from the configured entries
    pub fn to_directory(&self) -> StaticDirectory {
        let mut directory = StaticDirectory::new();
        for id in self.error_handlers.iter().flatten() {
            directory = directory.with_handler(CapabilityTag::Error, id.clone());
        }
        for id in self.restart_handlers.iter().flatten() {
            directory = directory.with_handler(CapabilityTag::Restart, id.clone());
        }
        if let Some(entry) = &self.default_entry_point {
            directory = directory.with_default_entry_point(entry.clone());
        }
        directory
    }
}

/// TOML representation of the config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Handler configuration
    pub handler: Option<TomlHandlerConfig>,
    /// Directory service entries
    pub directory: Option<TomlDirectoryConfig>,
}

impl HandlerConfig {
    /// Load configuration from the default config file, merging with defaults
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    /// Load configuration from a specific file, merging with defaults.
    /// A missing or unparseable file yields the defaults.
    pub fn load_from(path: &Path) -> Self {
        let mut config = HandlerConfig::default();

        // Create example config on first run
        if !path.exists() {
            Self::create_default_config(path);
        }

        if let Ok(contents) = fs::read_to_string(path) {
            if let Ok(toml_config) = toml::from_str::<TomlConfig>(&contents) {
                if let Some(handler) = toml_config.handler {
                    config.apply(handler);
                }
            }
        }

        config
    }

    /// Parse the `[directory]` section of a config file into a directory
    /// service. A missing file or section yields an empty directory.
    pub fn load_directory_from(path: &Path) -> StaticDirectory {
        fs::read_to_string(path)
            .ok()
            .and_then(|contents| toml::from_str::<TomlConfig>(&contents).ok())
            .and_then(|toml_config| toml_config.directory)
            .map(|directory| directory.to_directory())
            .unwrap_or_default()
    }

    /// Merge user-set keys on top of this config
    fn apply(&mut self, toml: TomlHandlerConfig) {
        if let Some(persist) = toml.persist_to_storage {
            self.persist_to_storage = persist;
        }
        if let Some(folder) = toml.storage_target_folder {
            self.storage_target_folder = Some(folder);
        }
        if let Some(launch) = toml.launch_recovery_surface {
            self.launch_recovery_surface = launch;
        }
        if let Some(backgrounded) = toml.allow_recovery_when_backgrounded {
            self.allow_recovery_when_backgrounded = backgrounded;
        }
        if let Some(relaunch) = toml.allow_process_relaunch {
            self.allow_process_relaunch = relaunch;
        }
    }

    /// Create the default config file from the bundled example
    fn create_default_config(path: &Path) {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                if let Err(e) = fs::create_dir_all(parent) {
                    eprintln!("Failed to create config directory: {}", e);
                    return;
                }
            }
        }

        if let Err(e) = fs::write(path, EXAMPLE_CONFIG) {
            eprintln!("Failed to write default config: {}", e);
        }
    }

    pub fn with_persist_to_storage(mut self, persist: bool) -> Self {
        self.persist_to_storage = persist;
        self
    }

    pub fn with_storage_target_folder(mut self, folder: PathBuf) -> Self {
        self.storage_target_folder = Some(folder);
        self
    }

    pub fn with_launch_recovery_surface(mut self, launch: bool) -> Self {
        self.launch_recovery_surface = launch;
        self
    }

    pub fn with_allow_recovery_when_backgrounded(mut self, allow: bool) -> Self {
        self.allow_recovery_when_backgrounded = allow;
        self
    }

    pub fn with_allow_process_relaunch(mut self, allow: bool) -> Self {
        self.allow_process_relaunch = allow;
        self
    }
}
