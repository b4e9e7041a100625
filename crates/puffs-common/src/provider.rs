//! Port for AQI data providers.

use async_trait::async_trait;

use crate::place::Coordinates;
use crate::reading::FetchOutcome;

/// A source of live AQI readings.
///
/// Implementations make a single attempt per call and report every
/// expected failure as a [`FetchOutcome`] variant. Retry policy, if any,
/// belongs to the caller.
#[async_trait]
pub trait AqiProvider: Send + Sync {
    /// Fetch the current reading nearest to `coordinates`.
    async fn fetch_aqi(&self, coordinates: Coordinates) -> FetchOutcome;
}
