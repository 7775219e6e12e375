//! Configuration management for `bugbook`.
//!
//! Configuration is loaded from YAML files with support for:
//! - User config (~/.config/bugbook/config.yaml)
//! - Data-dir config (<data dir>/config.yaml)
//! - CLI / environment overrides (`--data-dir` / `BUGBOOK_DIR`, `--prefix`)
//!
//! Later layers win. Relative file names resolve against the data dir.

use std::fs;
use std::path::{Path, PathBuf};

use bugbook_lib::util::DEFAULT_BUG_PREFIX;
use bugbook_lib::{BugbookError, Priority, Result};
use serde::{Deserialize, Serialize};

/// File name looked up in both the user config dir and the data dir.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Effective configuration after all layers are merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    pub data_dir: PathBuf,
    pub id_prefix: String,
    pub bugs_file: PathBuf,
    pub users_file: PathBuf,
    pub sources_file: PathBuf,
    pub attachments_dir: PathBuf,
    pub default_priority: Priority,
}

/// One config file. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
    pub id_prefix: Option<String>,
    pub bugs_file: Option<PathBuf>,
    pub users_file: Option<PathBuf>,
    pub sources_file: Option<PathBuf>,
    pub attachments_dir: Option<PathBuf>,
    pub default_priority: Option<Priority>,
}

/// Values supplied on the command line (or their env fallbacks).
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub data_dir: Option<PathBuf>,
    pub prefix: Option<String>,
}

impl Config {
    /// Built-in defaults rooted at `data_dir`.
    #[must_use]
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            id_prefix: DEFAULT_BUG_PREFIX.to_string(),
            bugs_file: PathBuf::from("bugs.json"),
            users_file: PathBuf::from("users.json"),
            sources_file: PathBuf::from("project_sources.json"),
            attachments_dir: PathBuf::from("attachments"),
            default_priority: Priority::default(),
        }
    }

    /// Load the full configuration stack.
    ///
    /// # Errors
    ///
    /// Returns `Config` if no data dir can be determined or a config file
    /// is malformed.
    pub fn load(overrides: &CliOverrides) -> Result<Self> {
        let data_dir = match &overrides.data_dir {
            Some(dir) => dir.clone(),
            None => default_data_dir()?,
        };
        let user_config = dirs::config_dir().map(|dir| dir.join("bugbook").join(CONFIG_FILE_NAME));
        Self::load_from(&data_dir, user_config.as_deref(), overrides)
    }

    /// Load with an explicit data dir and user config location.
    ///
    /// # Errors
    ///
    /// Returns `Config` if a config file is malformed.
    pub fn load_from(
        data_dir: &Path,
        user_config: Option<&Path>,
        overrides: &CliOverrides,
    ) -> Result<Self> {
        let mut config = Self::with_data_dir(data_dir);

        if let Some(path) = user_config {
            if let Some(layer) = ConfigLayer::read(path)? {
                config.apply(layer);
            }
        }
        if let Some(layer) = ConfigLayer::read(&data_dir.join(CONFIG_FILE_NAME))? {
            config.apply(layer);
        }
        if let Some(prefix) = &overrides.prefix {
            config.id_prefix.clone_from(prefix);
        }

        if config.id_prefix.trim().is_empty() {
            return Err(BugbookError::Config("id_prefix cannot be empty".to_string()));
        }

        tracing::debug!("Using data dir {}", config.data_dir.display());
        Ok(config)
    }

    fn apply(&mut self, layer: ConfigLayer) {
        if let Some(prefix) = layer.id_prefix {
            self.id_prefix = prefix;
        }
        if let Some(path) = layer.bugs_file {
            self.bugs_file = path;
        }
        if let Some(path) = layer.users_file {
            self.users_file = path;
        }
        if let Some(path) = layer.sources_file {
            self.sources_file = path;
        }
        if let Some(path) = layer.attachments_dir {
            self.attachments_dir = path;
        }
        if let Some(priority) = layer.default_priority {
            self.default_priority = priority;
        }
    }

    #[must_use]
    pub fn bugs_path(&self) -> PathBuf {
        self.resolve(&self.bugs_file)
    }

    #[must_use]
    pub fn users_path(&self) -> PathBuf {
        self.resolve(&self.users_file)
    }

    #[must_use]
    pub fn sources_path(&self) -> PathBuf {
        self.resolve(&self.sources_file)
    }

    #[must_use]
    pub fn attachments_path(&self) -> PathBuf {
        self.resolve(&self.attachments_dir)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir.join(path)
        }
    }
}

impl ConfigLayer {
    /// Parse a config file; a missing file is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `Config` if the file cannot be read or parsed.
    pub fn read(path: &Path) -> Result<Option<Self>> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(BugbookError::Config(format!(
                    "cannot read {}: {e}",
                    path.display()
                )));
            }
        };
        if text.trim().is_empty() {
            return Ok(Some(Self::default()));
        }
        serde_yaml::from_str(&text)
            .map(Some)
            .map_err(|e| BugbookError::Config(format!("{}: {e}", path.display())))
    }
}

/// `$XDG_DATA_HOME/bugbook` (or the platform equivalent).
///
/// # Errors
///
/// Returns `Config` if the platform has no data directory.
pub fn default_data_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join("bugbook"))
        .ok_or_else(|| {
            BugbookError::Config(
                "cannot determine a data directory; pass --data-dir or set BUGBOOK_DIR".to_string(),
            )
        })
}
