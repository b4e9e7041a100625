//! Common test fixtures for PuffsIndex tests.
//!
//! This module provides pre-defined test data that represents common
//! scenarios: a small place table and upstream payloads in the shapes
//! the WAQI feed and the geocoding function return.

use puffs_common::{PlaceEntry, PlaceTable};
use serde_json::{json, Value};

/// Small place tables for testing.
pub mod places {
    use super::*;

    /// Place table YAML with two good entries and one unusable entry.
    pub const SAMPLE_YAML: &str = r#"
places:
  - name: "Callao (Peru)"
    lat_long: "-12.0566,-77.1181"
  - name: "Delhi"
    lat_long: "28.6139,77.2090"
  - name: "Atlantis"
    lat_long: "lost at sea"
"#;

    /// Latitude/longitude of Callao in the sample table.
    pub const CALLAO: (f64, f64) = (-12.0566, -77.1181);

    /// Latitude/longitude of Delhi in the sample table.
    pub const DELHI: (f64, f64) = (28.6139, 77.2090);

    /// Known name whose coordinates do not parse.
    pub const UNRESOLVABLE: &str = "Atlantis";

    /// Name that is not in the table at all.
    pub const UNKNOWN: &str = "Gotham";

    /// The sample table, built in code.
    pub fn sample_table() -> PlaceTable {
        PlaceTable::from_entries(vec![
            PlaceEntry::new("Callao (Peru)", "-12.0566,-77.1181"),
            PlaceEntry::new("Delhi", "28.6139,77.2090"),
            PlaceEntry::new(UNRESOLVABLE, "lost at sea"),
        ])
        .expect("sample place table is valid")
    }
}

/// WAQI geo-feed payloads.
pub mod waqi {
    use super::*;

    /// Successful feed response with extra fields the client must ignore.
    pub fn ok_body(aqi: i32, idx: i64) -> Value {
        json!({
            "status": "ok",
            "data": {
                "aqi": aqi,
                "idx": idx,
                "attributions": [{"url": "https://waqi.info/", "name": "World Air Quality Index Project"}],
                "city": {"geo": [-12.05, -77.11], "name": "Callao"},
                "dominentpol": "pm25",
                "iaqi": {"pm25": {"v": aqi}},
                "time": {"s": "2024-01-15 12:00:00", "tz": "-05:00"}
            }
        })
    }

    /// Provider-level error (invalid key, unknown station).
    pub fn error_body() -> Value {
        json!({"status": "error", "data": "Invalid key"})
    }

    /// Station without a current reading: WAQI reports `"-"` for aqi.
    pub fn no_data_body() -> Value {
        json!({"status": "ok", "data": {"aqi": "-", "idx": 5}})
    }
}

/// Geocoding function payloads.
pub mod geocode {
    use super::*;

    /// A typical request body forwarded by the proxy.
    pub fn request_body() -> Value {
        json!({"query": "Callao, Peru"})
    }

    /// A typical downstream response.
    pub fn response_body() -> Value {
        json!({"results": [{"name": "Callao", "lat": -12.0566, "lon": -77.1181}]})
    }
}
