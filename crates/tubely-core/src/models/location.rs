//! Storage location model: where an uploaded object lives in the object store.
//!
//! Persisted and exchanged as the composite string `"<bucket>,<key>"`. The string
//! is not URL-encoded, so neither component may contain the separator.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::LOCATION_SEPARATOR;

/// A bucket/key pair referencing one object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StorageLocation {
    bucket: String,
    key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationParseError {
    #[error("expected exactly two components separated by ',', got {0}")]
    WrongArity(usize),

    #[error("bucket and key must both be non-empty")]
    EmptyComponent,
}

impl StorageLocation {
    pub fn new(
        bucket: impl Into<String>,
        key: impl Into<String>,
    ) -> Result<Self, LocationParseError> {
        let bucket = bucket.into();
        let key = key.into();
        if bucket.is_empty() || key.is_empty() {
            return Err(LocationParseError::EmptyComponent);
        }
        if bucket.contains(LOCATION_SEPARATOR) || key.contains(LOCATION_SEPARATOR) {
            return Err(LocationParseError::WrongArity(
                bucket.matches(LOCATION_SEPARATOR).count()
                    + key.matches(LOCATION_SEPARATOR).count()
                    + 2,
            ));
        }
        Ok(Self { bucket, key })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Display for StorageLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}{}{}", self.bucket, LOCATION_SEPARATOR, self.key)
    }
}

impl FromStr for StorageLocation {
    type Err = LocationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(LOCATION_SEPARATOR).collect();
        match parts.as_slice() {
            [bucket, key] => StorageLocation::new(*bucket, *key),
            other => Err(LocationParseError::WrongArity(other.len())),
        }
    }
}

impl TryFrom<String> for StorageLocation {
    type Error = LocationParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StorageLocation> for String {
    fn from(location: StorageLocation) -> Self {
        location.to_string()
    }
}
