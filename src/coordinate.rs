//! Artifact coordinates in `group:name:version` notation

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A `group:name:version` artifact identifier.
///
/// All three segments are non-blank. The notation is the same one the host
/// build system uses, so `parse` and `Display` are lossless inverses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Coordinate {
    group: String,
    name: String,
    version: String,
}

impl Coordinate {
    /// Build a coordinate from its three segments.
    pub fn new(group: &str, name: &str, version: &str) -> Result<Self> {
        let rendered = format!("{}:{}:{}", group, name, version);
        for (label, segment) in [("group", group), ("name", name), ("version", version)] {
            if segment.trim().is_empty() {
                return Err(Error::Format {
                    input: rendered,
                    message: format!("{} must not be blank", label),
                });
            }
            if segment.contains(':') {
                return Err(Error::Format {
                    input: rendered,
                    message: format!("{} must not contain ':'", label),
                });
            }
        }
        Ok(Self {
            group: group.to_string(),
            name: name.to_string(),
            version: version.to_string(),
        })
    }

    /// Parse `group:name:version`.
    pub fn parse(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 3 {
            return Err(Error::Format {
                input: s.to_string(),
                message: format!("expected 3 ':'-separated segments, found {}", parts.len()),
            });
        }
        Self::new(parts[0], parts[1], parts[2])
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// `group:name`, the identity used when comparing artifacts across versions.
    pub fn module_id(&self) -> String {
        format!("{}:{}", self.group, self.name)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.name, self.version)
    }
}

impl FromStr for Coordinate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Coordinate {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Coordinate> for String {
    fn from(value: Coordinate) -> Self {
        value.to_string()
    }
}
