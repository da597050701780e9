//! Upload endpoint configuration
//!
//! Deserialised from the `[upload]` table of the daemon config; every field
//! has a default so an empty table (or no file at all) yields a working
//! endpoint on `/upload` writing into `./uploads`.

use std::collections::HashSet;
use std::path::PathBuf;

use filedrop_core::NamingScheme;
use serde::Deserialize;
use thiserror::Error;

/// Invalid upload configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Route must start with '/': {0}")]
    InvalidRoute(String),

    #[error("Route registered more than once: {0}")]
    DuplicateRoute(String),

    #[error("Form field name must not be empty")]
    EmptyField,

    #[error("max_body_bytes must be greater than zero")]
    ZeroBodyLimit,
}

/// Configuration of the upload endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Directory accepted files are written to
    pub dir: PathBuf,
    /// Primary upload route
    pub path: String,
    /// Extra routes served by the same handler (e.g. "/uploadimage")
    pub aliases: Vec<String>,
    /// Multipart field carrying the file ("file" or "image")
    pub field: String,
    /// Answer CORS preflights and add CORS headers
    pub cors: bool,
    /// Optional request body cap in bytes; uploads are unbounded when unset
    pub max_body_bytes: Option<usize>,
    /// How stored files are named
    pub naming: NamingScheme,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./uploads"),
            path: "/upload".to_string(),
            aliases: Vec::new(),
            field: "file".to_string(),
            cors: true,
            max_body_bytes: None,
            naming: NamingScheme::default(),
        }
    }
}

impl UploadConfig {
    /// Primary route followed by aliases
    pub fn routes(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.path.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// Check the config can be turned into a router.
    ///
    /// Duplicate or relative routes would make axum panic at startup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.field.is_empty() {
            return Err(ConfigError::EmptyField);
        }
        if self.max_body_bytes == Some(0) {
            return Err(ConfigError::ZeroBodyLimit);
        }

        let mut seen = HashSet::new();
        for route in self.routes() {
            if !route.starts_with('/') {
                return Err(ConfigError::InvalidRoute(route.to_string()));
            }
            if route == "/health" || !seen.insert(route) {
                return Err(ConfigError::DuplicateRoute(route.to_string()));
            }
        }

        Ok(())
    }
}
