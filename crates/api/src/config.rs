//! Startup configuration via `oxp.toml`
//!
//! The configuration collaborator supplies two facts at process start: where
//! the backing store lives, and the name of the profile secondary-index
//! column. On first start a commented default `oxp.toml` can be written next
//! to the data; to change settings, edit the file and restart.

use oxp_core::{Fault, SchemaSet, StoreError, StoreResult, DEFAULT_PROFILE_COLUMN};
use oxp_storage::DocumentStore;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "oxp.toml";

/// Service configuration loaded from `oxp.toml`
///
/// # Example
///
/// ```toml
/// # Directory holding the commit log and lock file
/// data-dir = "oxp-data"
///
/// # Name of the profile secondary-index column
/// profile-mnemonic-column = "profile-mnemonic"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Directory holding the commit log and lock file
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Name of the profile secondary-index column
    #[serde(default = "default_profile_column")]
    pub profile_mnemonic_column: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("oxp-data")
}

fn default_profile_column() -> String {
    DEFAULT_PROFILE_COLUMN.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            profile_mnemonic_column: default_profile_column(),
        }
    }
}

impl Config {
    /// Returns the default config file content with comments
    pub fn default_toml() -> &'static str {
        r#"# OSCAL exchange store configuration
#
# Directory holding the commit log and lock file.
data-dir = "oxp-data"

# Name of the profile secondary-index column. The validation workflow
# searches profiles by this attribute.
profile-mnemonic-column = "profile-mnemonic"
"#
    }

    /// Read and parse config from a file path
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or parsed; both classify as
    /// [`Fault`]s since a broken config means no store can be opened.
    pub fn from_file(path: &Path) -> StoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(Fault::Io)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            StoreError::Unavailable(Fault::Encoding(format!(
                "failed to parse config file '{}': {}",
                path.display(),
                e
            )))
        })?;
        Ok(config)
    }

    /// Write the default config file if it does not already exist
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> StoreResult<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(Fault::Io)?;
        }
        Ok(())
    }

    /// Schema set described by this configuration
    pub fn schema_set(&self) -> SchemaSet {
        SchemaSet::new(self.profile_mnemonic_column.as_str())
    }

    /// Open the disk-backed store this configuration describes
    pub fn open_store(&self) -> StoreResult<DocumentStore> {
        info!(data_dir = %self.data_dir.display(), "opening configured store");
        DocumentStore::open(&self.data_dir, self.schema_set())
    }
}
