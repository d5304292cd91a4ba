//! Configuration file discovery and loading

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::error::BentoError;
use crate::result::Result;

/// Recognized configuration filenames, in lookup order.
pub const CONFIG_FILENAMES: [&str; 4] = [
    ".bentorc.json",
    ".bentorc.jsonc",
    "bento.json",
    "bento.jsonc",
];

/// Discovers and loads configuration documents.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Walk parent directories upward from `start` until a recognized
    /// configuration filename is found.
    pub fn discover(start: &Path) -> Result<Option<PathBuf>> {
        let mut current = start
            .canonicalize()
            .map_err(|e| BentoError::io(start, e))?;

        loop {
            for filename in &CONFIG_FILENAMES {
                let candidate = current.join(filename);
                if candidate.is_file() {
                    debug!("found config: {}", candidate.display());
                    return Ok(Some(candidate));
                }
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return Ok(None),
            }
        }
    }

    /// Load a configuration document from a specific file.
    ///
    /// Supports JSON and JSONC (comments and trailing commas).
    pub fn load(path: &Path) -> Result<Value> {
        let content = fs::read_to_string(path).map_err(|e| BentoError::io(path, e))?;

        let document: Value = json5::from_str(&content).map_err(|e| {
            BentoError::config_shape(
                path.display().to_string(),
                format!("not a valid configuration document: {e}"),
            )
        })?;

        debug!("loaded config from {}", path.display());
        Ok(document)
    }

    /// Load from an explicit path, or discover upward from `start`.
    ///
    /// Returns the document together with the directory it was loaded from
    /// (external option files resolve relative to it). Absence of any config
    /// file up to the filesystem root is a fatal error.
    pub fn load_or_discover(custom: Option<&Path>, start: &Path) -> Result<(Value, PathBuf)> {
        let path = match custom {
            Some(path) => {
                if !path.is_file() {
                    return Err(BentoError::io(
                        path,
                        std::io::Error::new(
                            std::io::ErrorKind::NotFound,
                            "configuration file not found",
                        ),
                    ));
                }
                path.to_path_buf()
            }
            None => Self::discover(start)?.ok_or_else(|| BentoError::ConfigNotFound {
                start: start.to_path_buf(),
            })?,
        };

        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let document = Self::load(&path)?;
        Ok((document, dir))
    }
}
