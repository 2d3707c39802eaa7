mod app_config;
mod config;
pub mod ordering;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env, ConfigError};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A geographic point of interest.
///
/// `coordinates` is the store's own textual rendering of the point and is
/// passed through to clients unmodified. `website` and `description` are
/// nullable: an absent value serializes as JSON `null`, never as an empty
/// string, and the key is always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spot {
    pub id: String,
    pub name: String,
    pub website: Option<String>,
    pub coordinates: String,
    pub description: Option<String>,
    pub rating: f64,
}

/// Spatial filter shape for a spot search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    /// Geodesic radius filter.
    Circle,
    /// Axis-aligned bounding-box filter, faster but geometrically inexact.
    Square,
}

impl QueryMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            QueryMode::Circle => "circle",
            QueryMode::Square => "square",
        }
    }
}

impl FromStr for QueryMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "circle" => Ok(QueryMode::Circle),
            "square" => Ok(QueryMode::Square),
            other => Err(CoreError::UnknownQueryMode(other.to_string())),
        }
    }
}

impl fmt::Display for QueryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unrecognized query mode: {0}")]
    UnknownQueryMode(String),
}
