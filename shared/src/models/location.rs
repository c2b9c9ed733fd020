//! Stock location models and lookup

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::LocationId;

/// Key used for stock that has no location
pub const NO_LOCATION_KEY: &str = "no_location";

/// Display name and path for stock that has no location
pub const NO_LOCATION_LABEL: &str = "No Location";

/// A storage place in the host's location tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockLocation {
    pub id: LocationId,
    pub name: String,
    /// Slash-separated path from the tree root, e.g. "Warehouse/Shelf A"
    pub pathstring: Option<String>,
}

impl StockLocation {
    /// Path string, falling back to the name
    pub fn display_path(&self) -> &str {
        match self.pathstring.as_deref() {
            Some(path) if !path.is_empty() => path,
            _ => &self.name,
        }
    }
}

/// Grouping key for the per-location breakdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LocationKey {
    Location(LocationId),
    NoLocation,
}

impl From<Option<LocationId>> for LocationKey {
    fn from(id: Option<LocationId>) -> Self {
        id.map_or(LocationKey::NoLocation, LocationKey::Location)
    }
}

impl LocationKey {
    pub fn location_id(&self) -> Option<LocationId> {
        match self {
            LocationKey::Location(id) => Some(*id),
            LocationKey::NoLocation => None,
        }
    }
}

impl fmt::Display for LocationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationKey::Location(id) => write!(f, "{}", id),
            LocationKey::NoLocation => f.write_str(NO_LOCATION_KEY),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationLookupError {
    #[error("Location {0} does not exist")]
    Deleted(LocationId),
}

/// Resolves location ids to host locations
pub trait LocationResolver {
    fn resolve(&self, id: LocationId) -> Result<StockLocation, LocationLookupError>;
}

impl LocationResolver for HashMap<LocationId, StockLocation> {
    fn resolve(&self, id: LocationId) -> Result<StockLocation, LocationLookupError> {
        self.get(&id).cloned().ok_or(LocationLookupError::Deleted(id))
    }
}

/// Placeholder label for a location that was deleted after stock referenced it
pub fn deleted_location_label(id: LocationId) -> String {
    format!("Location {} (deleted)", id)
}
