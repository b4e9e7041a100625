//! Common types and logic shared across PuffsIndex services.
//!
//! This crate holds the pieces that do not touch the network:
//! - the static place table and coordinate resolution
//! - AQI readings and fetch outcomes
//! - the page result envelope produced per render
//! - the cigarette-equivalent conversion
//! - the [`AqiProvider`] port implemented by outbound clients

pub mod cigarettes;
pub mod error;
pub mod page;
pub mod place;
pub mod provider;
pub mod reading;

pub use cigarettes::{convert, CigaretteEquivalent, Tier, AQI_PER_CIGARETTE};
pub use error::{PuffsError, PuffsResult};
pub use page::{AqiLevel, ErrorField, PageErrors, PagePlace, PageResult, PageView, PinnedLocation, RenderMode};
pub use place::{Coordinates, Place, PlaceEntry, PlaceTable};
pub use provider::AqiProvider;
pub use reading::{AqiReading, FetchOutcome};

/// User-facing messages surfaced in `PageResult.errors`.
pub mod messages {
    /// The place is known but its coordinates could not be resolved.
    pub const COORDINATES_NOT_FOUND: &str = "City coordinates not found";
    /// No provider credential is configured.
    pub const TOKEN_NOT_CONFIGURED: &str = "WAQI token not configured";
    /// The provider answered with a non-success status.
    pub const PROVIDER_REJECTED: &str = "Location not found or API error";
    /// The pipeline failed unexpectedly and a degraded page was served.
    pub const SERVICE_UNAVAILABLE: &str = "Service temporarily unavailable";
}
