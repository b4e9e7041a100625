//! Page result envelope.
//!
//! A [`PageResult`] is produced once per orchestration run and carries
//! either a reading or field-scoped error messages, never a thrown failure.
//! [`PageView`] is the rendered form, with the cigarette equivalent
//! recomputed from the reading on every render.

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use crate::cigarettes::{convert, CigaretteEquivalent};
use crate::messages;
use crate::place::Place;
use crate::reading::{AqiReading, FetchOutcome};

/// How place pages are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RenderMode {
    /// Pipeline runs ahead of serving and the result is reused until it
    /// needs revalidation.
    Static,
    /// Initial response is empty; the consumer triggers the pipeline later.
    ClientDeferred,
}

impl RenderMode {
    /// Map the client-side rendering flag onto a mode.
    pub fn from_client_side_flag(client_side: bool) -> Self {
        if client_side {
            RenderMode::ClientDeferred
        } else {
            RenderMode::Static
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderMode::Static => write!(f, "static"),
            RenderMode::ClientDeferred => write!(f, "client-deferred"),
        }
    }
}

/// Page field an error message is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorField {
    Coordinates,
    Aqi,
}

/// Field name -> user-facing message.
pub type PageErrors = BTreeMap<ErrorField, String>;

/// Location pinned on a page. `Unknown` is the sentinel used by degraded pages.
#[derive(Debug, Clone, PartialEq)]
pub enum PinnedLocation {
    /// The place table's `lat_long` text, as written.
    Resolved(String),
    Unknown,
}

impl fmt::Display for PinnedLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinnedLocation::Resolved(text) => f.write_str(text),
            PinnedLocation::Unknown => write!(f, "Unknown"),
        }
    }
}

impl Serialize for PinnedLocation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Place block of a page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PagePlace {
    pub city: String,
    #[serde(rename = "lat_long")]
    pub location: PinnedLocation,
}

impl From<&Place> for PagePlace {
    fn from(place: &Place) -> Self {
        Self {
            city: place.name.clone(),
            location: PinnedLocation::Resolved(place.lat_long.clone()),
        }
    }
}

/// Outcome of one orchestration run for one place.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    /// Canonical place name the page is for.
    pub city_name: String,
    pub place: Option<PagePlace>,
    pub reading: Option<AqiReading>,
    pub errors: PageErrors,
    pub render_mode: RenderMode,
}

impl PageResult {
    /// Empty shell served in deferred mode before the consumer fetches data.
    pub fn deferred(city_name: impl Into<String>) -> Self {
        Self {
            city_name: city_name.into(),
            place: None,
            reading: None,
            errors: PageErrors::new(),
            render_mode: RenderMode::ClientDeferred,
        }
    }

    /// Assemble a page from the resolved place (if any) and the fetch outcome.
    pub fn from_outcome(
        city_name: impl Into<String>,
        place: Option<&Place>,
        outcome: FetchOutcome,
        render_mode: RenderMode,
    ) -> Self {
        let mut errors = PageErrors::new();
        if let Some((field, message)) = outcome.error() {
            errors.insert(field, message);
        }

        let reading = match outcome {
            FetchOutcome::Success(reading) => Some(reading),
            _ => None,
        };

        Self {
            city_name: city_name.into(),
            place: place.map(PagePlace::from),
            reading,
            errors,
            render_mode,
        }
    }

    /// Stand-in page served when the static pipeline failed unexpectedly.
    pub fn degraded(city_name: impl Into<String>) -> Self {
        let city_name = city_name.into();
        let mut errors = PageErrors::new();
        errors.insert(ErrorField::Aqi, messages::SERVICE_UNAVAILABLE.to_string());

        Self {
            place: Some(PagePlace {
                city: city_name.clone(),
                location: PinnedLocation::Unknown,
            }),
            city_name,
            reading: None,
            errors,
            render_mode: RenderMode::Static,
        }
    }

    /// True for pages produced by [`PageResult::degraded`].
    pub fn is_degraded(&self) -> bool {
        matches!(
            self.place,
            Some(PagePlace {
                location: PinnedLocation::Unknown,
                ..
            })
        )
    }

    pub fn error(&self, field: ErrorField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    /// Render this result. `revalidate` is reported for static pages.
    pub fn render(&self, revalidate: Option<Duration>) -> PageView {
        let cigarettes = self.reading.as_ref().map(|r| convert(r.aqi));
        PageView {
            canonical: format!("/city/{}", self.city_name.to_lowercase()),
            aqi_level: cigarettes.map(|c| AqiLevel {
                level: c.tier.label(),
                color: c.tier.color(),
            }),
            cigarettes,
            revalidate_secs: revalidate.map(|d| d.as_secs()),
            result: self.clone(),
        }
    }
}

/// Tier label and colour for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AqiLevel {
    pub level: &'static str,
    pub color: &'static str,
}

/// Rendered page: the result plus values derived at render time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    #[serde(flatten)]
    pub result: PageResult,
    pub canonical: String,
    pub cigarettes: Option<CigaretteEquivalent>,
    pub aqi_level: Option<AqiLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revalidate_secs: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cigarettes::Tier;
    use crate::place::{PlaceEntry, PlaceTable};

    fn lima() -> Place {
        Place {
            name: "Lima".to_string(),
            coordinates: crate::place::Coordinates::new(-12.0464, -77.0428).unwrap(),
            lat_long: "-12.0464,-77.0428".to_string(),
        }
    }

    #[test]
    fn test_location_keeps_table_text() {
        let table = PlaceTable::from_entries(vec![PlaceEntry::new("Delhi", "28.6139,77.2090")]).unwrap();
        let place = table.resolve_place("delhi").unwrap();
        let page = PageResult::from_outcome(
            "Delhi",
            Some(&place),
            FetchOutcome::rejected(),
            RenderMode::Static,
        );

        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["place"]["lat_long"], "28.6139,77.2090");
    }

    #[test]
    fn test_success_page_has_no_errors() {
        let place = lima();
        let page = PageResult::from_outcome(
            "Lima",
            Some(&place),
            FetchOutcome::Success(AqiReading::new(120, "9")),
            RenderMode::Static,
        );
        assert!(page.errors.is_empty());
        assert_eq!(page.reading.as_ref().unwrap().aqi, 120);
        assert!(!page.is_degraded());
    }

    #[test]
    fn test_provider_failure_sets_aqi_error() {
        let place = lima();
        let page = PageResult::from_outcome(
            "Lima",
            Some(&place),
            FetchOutcome::transport("timed out"),
            RenderMode::Static,
        );
        assert!(page.reading.is_none());
        assert_eq!(page.error(ErrorField::Aqi), Some("WAQI API error: timed out"));
        assert!(page.place.is_some());
    }

    #[test]
    fn test_coordinates_not_found_has_no_place() {
        let page = PageResult::from_outcome(
            "Atlantis",
            None,
            FetchOutcome::CoordinatesNotFound,
            RenderMode::ClientDeferred,
        );
        assert!(page.place.is_none());
        assert_eq!(
            page.error(ErrorField::Coordinates),
            Some("City coordinates not found")
        );
    }

    #[test]
    fn test_deferred_shell_is_empty() {
        let page = PageResult::deferred("Lima");
        assert!(page.place.is_none());
        assert!(page.reading.is_none());
        assert!(page.errors.is_empty());
        assert_eq!(page.render_mode, RenderMode::ClientDeferred);
    }

    #[test]
    fn test_degraded_page_shape() {
        let page = PageResult::degraded("Lima");
        assert!(page.is_degraded());
        assert!(page.reading.is_none());
        assert_eq!(page.error(ErrorField::Aqi), Some("Service temporarily unavailable"));

        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["place"]["lat_long"], "Unknown");
        assert_eq!(json["place"]["city"], "Lima");
    }

    #[test]
    fn test_render_derives_cigarettes() {
        let place = lima();
        let page = PageResult::from_outcome(
            "Lima",
            Some(&place),
            FetchOutcome::Success(AqiReading::new(155, "9")),
            RenderMode::Static,
        );
        let view = page.render(Some(Duration::from_secs(3600)));

        let cigarettes = view.cigarettes.unwrap();
        assert_eq!(cigarettes.value, 6.6);
        assert_eq!(cigarettes.tier, Tier::Unhealthy);
        assert_eq!(view.aqi_level.unwrap().color, "red");
        assert_eq!(view.canonical, "/city/lima");
        assert_eq!(view.revalidate_secs, Some(3600));
    }

    #[test]
    fn test_view_json_shape() {
        let place = lima();
        let page = PageResult::from_outcome(
            "Lima",
            Some(&place),
            FetchOutcome::Success(AqiReading::new(40, "77")),
            RenderMode::Static,
        );
        let json = serde_json::to_value(page.render(None)).unwrap();

        assert_eq!(json["cityName"], "Lima");
        assert_eq!(json["renderMode"], "Static");
        assert_eq!(json["place"]["lat_long"], "-12.0464,-77.0428");
        assert_eq!(json["reading"]["idx"], "77");
        assert_eq!(json["cigarettes"]["tier"], "Good");
        assert_eq!(json["errors"], serde_json::json!({}));
        assert!(json.get("revalidateSecs").is_none());
    }

    #[test]
    fn test_error_keys_serialize_lowercase() {
        let page = PageResult::from_outcome(
            "Lima",
            Some(&lima()),
            FetchOutcome::rejected(),
            RenderMode::Static,
        );
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["errors"]["aqi"], "Location not found or API error");
    }
}
