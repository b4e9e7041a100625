//! Static place table and coordinate resolution.
//!
//! Places are named points of interest (cities) that clients look up
//! by a human-readable name instead of raw coordinates. The table is
//! loaded once at start-up and never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{PuffsError, PuffsResult};

/// Built-in place table compiled into the binary.
const BUILTIN_PLACES_YAML: &str = include_str!("../data/places.yaml");

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Create coordinates, validating the ranges.
    pub fn new(latitude: f64, longitude: f64) -> PuffsResult<Self> {
        let value = format!("{},{}", latitude, longitude);
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(PuffsError::InvalidCoordinates {
                value,
                message: "latitude must be within [-90, 90]".to_string(),
            });
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(PuffsError::InvalidCoordinates {
                value,
                message: "longitude must be within [-180, 180]".to_string(),
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// Parses the `"lat,lon"` form used by the place table.
impl FromStr for Coordinates {
    type Err = PuffsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |message: &str| PuffsError::InvalidCoordinates {
            value: s.to_string(),
            message: message.to_string(),
        };

        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| invalid("expected 'lat,lon'"))?;
        let latitude: f64 = lat
            .trim()
            .parse()
            .map_err(|_| invalid("latitude is not a number"))?;
        let longitude: f64 = lon
            .trim()
            .parse()
            .map_err(|_| invalid("longitude is not a number"))?;

        Self::new(latitude, longitude)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// A resolved place: canonical name plus coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Place {
    pub name: String,
    pub coordinates: Coordinates,
    /// Coordinates exactly as written in the table, for display.
    pub lat_long: String,
}

/// One row of the place table as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceEntry {
    /// Canonical, unique name (e.g., "Callao (Peru)").
    pub name: String,

    /// Coordinates as `"lat,lon"`.
    pub lat_long: String,
}

impl PlaceEntry {
    pub fn new(name: impl Into<String>, lat_long: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lat_long: lat_long.into(),
        }
    }

    /// URL slug for this place: the lower-cased canonical name.
    pub fn slug(&self) -> String {
        self.name.to_lowercase()
    }
}

#[derive(Debug, Deserialize)]
struct PlaceTableFile {
    #[serde(default)]
    places: Vec<PlaceEntry>,
}

/// Immutable, case-insensitive table of known places.
///
/// Entries whose coordinates do not parse stay in the table as known
/// names; [`PlaceTable::resolve`] reports them as not found.
#[derive(Debug, Clone, Default)]
pub struct PlaceTable {
    entries: Vec<PlaceEntry>,
    /// Lower-cased name -> (entry index, parsed coordinates).
    index: HashMap<String, (usize, Option<Coordinates>)>,
}

impl PlaceTable {
    /// Build a table from entries. Names must be unique ignoring case.
    pub fn from_entries(entries: Vec<PlaceEntry>) -> PuffsResult<Self> {
        let mut index = HashMap::with_capacity(entries.len());

        for (i, entry) in entries.iter().enumerate() {
            if entry.name.trim().is_empty() {
                return Err(PuffsError::EmptyPlaceName);
            }

            let coordinates = match entry.lat_long.parse::<Coordinates>() {
                Ok(c) => Some(c),
                Err(e) => {
                    tracing::warn!(place = %entry.name, error = %e, "Place has unusable coordinates");
                    None
                }
            };

            if index.insert(entry.slug(), (i, coordinates)).is_some() {
                return Err(PuffsError::DuplicatePlace(entry.name.clone()));
            }
        }

        Ok(Self { entries, index })
    }

    /// Parse a YAML document of the form `places: [{name, lat_long}, ...]`.
    pub fn from_yaml_str(yaml: &str) -> PuffsResult<Self> {
        let file: PlaceTableFile = serde_yaml::from_str(yaml)?;
        Self::from_entries(file.places)
    }

    /// Load a YAML place table from disk.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> PuffsResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| PuffsError::PlaceTableRead {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// The table shipped with the binary.
    pub fn builtin() -> PuffsResult<Self> {
        Self::from_yaml_str(BUILTIN_PLACES_YAML)
    }

    /// Canonical name for an identifier (case-insensitive).
    pub fn canonical_name(&self, id: &str) -> Option<&str> {
        self.index
            .get(&id.to_lowercase())
            .map(|(i, _)| self.entries[*i].name.as_str())
    }

    /// Check if a place exists.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(&id.to_lowercase())
    }

    /// Resolve an identifier to coordinates. `None` means not found.
    pub fn resolve(&self, id: &str) -> Option<Coordinates> {
        self.index.get(&id.to_lowercase()).and_then(|(_, c)| *c)
    }

    /// Resolve an identifier to a full [`Place`].
    pub fn resolve_place(&self, id: &str) -> Option<Place> {
        let (i, coordinates) = self.index.get(&id.to_lowercase())?;
        let entry = &self.entries[*i];
        Some(Place {
            name: entry.name.clone(),
            coordinates: (*coordinates)?,
            lat_long: entry.lat_long.clone(),
        })
    }

    /// Names containing `query` (case-insensitive), in table order.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&PlaceEntry> {
        let needle = query.trim().to_lowercase();
        self.entries
            .iter()
            .filter(|e| e.name.to_lowercase().contains(&needle))
            .take(limit)
            .collect()
    }

    /// All entries in table order.
    pub fn entries(&self) -> &[PlaceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
