//! Shared test utilities for the PuffsIndex workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Place table and provider payload fixtures
//! - A stub [`AqiProvider`](puffs_common::AqiProvider) that counts calls
//! - Throwaway local HTTP servers standing in for upstream services
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../../crates/test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{fixtures, StubProvider};
//! ```

pub mod fixtures;
pub mod server;
pub mod stubs;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use server::*;
pub use stubs::*;

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Macro for approximate equality of a latitude/longitude pair.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_coords_approx_eq;
///
/// assert_coords_approx_eq!(coords, (-12.0566, -77.1181), 1e-9);
/// ```
#[macro_export]
macro_rules! assert_coords_approx_eq {
    ($coords:expr, $expected:expr, $epsilon:expr) => {{
        let c: $crate::reexports::Coordinates = $coords;
        let (lat, lon): (f64, f64) = $expected;
        $crate::assert_approx_eq!(c.latitude, lat, $epsilon);
        $crate::assert_approx_eq!(c.longitude, lon, $epsilon);
    }};
}

#[doc(hidden)]
pub mod reexports {
    pub use puffs_common::Coordinates;
}
