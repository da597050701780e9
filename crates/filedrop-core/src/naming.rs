//! Artifact naming strategies
//!
//! Every accepted upload is stored under a name derived from the moment it was
//! created. The plain [`TimestampNamer`] reproduces the classic behaviour where
//! two uploads landing in the same clock tick share a name and the later one
//! overwrites the earlier. [`UniqueNamer`] appends a random token so names
//! never collide, and is the default.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreError;

/// Timestamp layout used in artifact names (UTC, nanosecond resolution).
///
/// Contains no `:` or whitespace so the result is a portable file name.
const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S%.9fZ";

/// Produces the on-disk file name for a new artifact
pub trait ArtifactNamer: Send + Sync + fmt::Debug {
    /// Name for an artifact created at `created_at`
    fn name(&self, created_at: DateTime<Utc>) -> String;
}

/// Names artifacts by their creation timestamp alone
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampNamer;

impl ArtifactNamer for TimestampNamer {
    fn name(&self, created_at: DateTime<Utc>) -> String {
        created_at.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Names artifacts by timestamp plus a random v4 UUID
#[derive(Debug, Clone, Copy, Default)]
pub struct UniqueNamer;

impl ArtifactNamer for UniqueNamer {
    fn name(&self, created_at: DateTime<Utc>) -> String {
        format!(
            "{}-{}",
            created_at.format(TIMESTAMP_FORMAT),
            Uuid::new_v4().simple()
        )
    }
}

/// Naming scheme selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamingScheme {
    /// Timestamp only; same-tick uploads overwrite each other
    Timestamp,
    /// Timestamp plus random token
    #[default]
    Unique,
}

impl NamingScheme {
    /// Build the namer for this scheme
    pub fn namer(self) -> Arc<dyn ArtifactNamer> {
        match self {
            NamingScheme::Timestamp => Arc::new(TimestampNamer),
            NamingScheme::Unique => Arc::new(UniqueNamer),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NamingScheme::Timestamp => "timestamp",
            NamingScheme::Unique => "unique",
        }
    }
}

impl fmt::Display for NamingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NamingScheme {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "timestamp" => Ok(NamingScheme::Timestamp),
            "unique" => Ok(NamingScheme::Unique),
            other => Err(StoreError::UnknownNamingScheme(other.to_string())),
        }
    }
}
