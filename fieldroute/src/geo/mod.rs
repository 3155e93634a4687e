//! Geographic coordinate types and great-circle distance.
//!
//! Provides the `Coordinate` value type shared across the engine, the
//! haversine distance used both as the traffic fallback and as the
//! chain-ordering heuristic, and the efficiency classification used by
//! UI consumers for color coding.

use std::fmt;
use std::num::ParseFloatError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mean Earth radius in kilometers, per the haversine convention.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A geographic coordinate in floating-point degrees.
///
/// Immutable value type; construct a new one rather than mutating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

impl Coordinate {
    /// Creates a coordinate from latitude and longitude in degrees.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

/// Error parsing a `lat,lon` string.
#[derive(Debug, Error)]
pub enum ParseCoordinateError {
    /// The string did not contain exactly one comma separator.
    #[error("expected \"lat,lon\", got {0:?}")]
    Format(String),

    /// One of the components was not a valid float.
    #[error("invalid number in coordinate: {0}")]
    Number(#[from] ParseFloatError),
}

impl FromStr for Coordinate {
    type Err = ParseCoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| ParseCoordinateError::Format(s.to_string()))?;
        Ok(Self {
            lat: lat.trim().parse()?,
            lon: lon.trim().parse()?,
        })
    }
}

/// Computes the great-circle distance between two coordinates in kilometers.
///
/// Uses the haversine formula with a mean Earth radius of 6371 km, rounded
/// to one decimal. Pure and total: invalid inputs (e.g. NaN) propagate NaN
/// rather than erroring.
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    // Rounding can push h past 1.0 for near-antipodal pairs; clamp
    // before the inverse sine or the result is NaN.
    let central_angle = 2.0 * h.sqrt().clamp(0.0, 1.0).asin();

    round_one_decimal(EARTH_RADIUS_KM * central_angle)
}

fn round_one_decimal(km: f64) -> f64 {
    (km * 10.0).round() / 10.0
}

/// Travel-efficiency classification of a leg, used for UI color coding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegEfficiency {
    /// Under 10 km.
    Optimal,
    /// 10 to 30 km inclusive.
    Acceptable,
    /// Over 30 km.
    Inefficient,
}

impl LegEfficiency {
    /// Classifies a distance in kilometers.
    ///
    /// Boundaries are inclusive on the acceptable side: 10.0 km and 30.0 km
    /// both classify as `Acceptable`.
    pub fn classify(distance_km: f64) -> Self {
        if distance_km < 10.0 {
            LegEfficiency::Optimal
        } else if distance_km <= 30.0 {
            LegEfficiency::Acceptable
        } else {
            LegEfficiency::Inefficient
        }
    }

    /// User-facing label for schedule views.
    pub fn label(&self) -> &'static str {
        match self {
            LegEfficiency::Optimal => "optimal",
            LegEfficiency::Acceptable => "acceptable",
            LegEfficiency::Inefficient => "inefficient",
        }
    }
}

impl fmt::Display for LegEfficiency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_degree_of_latitude() {
        // One degree of latitude is ~111.2 km regardless of longitude.
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(1.0, 0.0);

        let d = haversine_km(a, b);
        assert!((d - 111.2).abs() < 1e-9, "expected 111.2, got {}", d);
    }

    #[test]
    fn test_same_point_is_zero() {
        let a = Coordinate::new(48.1173, -1.6778);
        assert_eq!(haversine_km(a, a), 0.0);
    }

    #[test]
    fn test_known_city_pair() {
        // Rennes to Nantes, roughly 100 km as the crow flies.
        let rennes = Coordinate::new(48.1173, -1.6778);
        let nantes = Coordinate::new(47.2184, -1.5536);

        let d = haversine_km(rennes, nantes);
        assert!((d - 100.4).abs() < 1.0, "unexpected distance {}", d);
    }

    #[test]
    fn test_near_antipodal_pair_is_finite() {
        // This pair pushes the haversine term marginally past 1.0.
        let a = Coordinate::new(-66.18058623110981, 24.579556673226335);
        let b = Coordinate::new(66.18058623158834, -155.42044332677366);

        let d = haversine_km(a, b);
        assert!(d.is_finite(), "got {}", d);
        // Antipodal points sit half the circumference apart.
        assert!((d - EARTH_RADIUS_KM * std::f64::consts::PI).abs() < 1.0);
    }

    #[test]
    fn test_nan_propagates() {
        let a = Coordinate::new(f64::NAN, 0.0);
        let b = Coordinate::new(1.0, 1.0);
        assert!(haversine_km(a, b).is_nan());
    }

    #[test]
    fn test_classification_boundaries() {
        assert_eq!(LegEfficiency::classify(9.9), LegEfficiency::Optimal);
        assert_eq!(LegEfficiency::classify(10.0), LegEfficiency::Acceptable);
        assert_eq!(LegEfficiency::classify(30.0), LegEfficiency::Acceptable);
        assert_eq!(LegEfficiency::classify(30.1), LegEfficiency::Inefficient);
    }

    #[test]
    fn test_classification_labels() {
        assert_eq!(LegEfficiency::Optimal.label(), "optimal");
        assert_eq!(format!("{}", LegEfficiency::Inefficient), "inefficient");
    }

    #[test]
    fn test_parse_coordinate() {
        let c: Coordinate = "48.1173, -1.6778".parse().unwrap();
        assert_eq!(c.lat, 48.1173);
        assert_eq!(c.lon, -1.6778);
    }

    #[test]
    fn test_parse_coordinate_rejects_garbage() {
        assert!(matches!(
            "48.1173".parse::<Coordinate>(),
            Err(ParseCoordinateError::Format(_))
        ));
        assert!(matches!(
            "north,south".parse::<Coordinate>(),
            Err(ParseCoordinateError::Number(_))
        ));
    }

    #[test]
    fn test_display_roundtrip() {
        let c = Coordinate::new(47.2184, -1.5536);
        let parsed: Coordinate = c.to_string().parse().unwrap();
        assert_eq!(parsed, c);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_distance_is_symmetric(
                lat1 in -85.0..85.0_f64,
                lon1 in -180.0..180.0_f64,
                lat2 in -85.0..85.0_f64,
                lon2 in -180.0..180.0_f64
            ) {
                let a = Coordinate::new(lat1, lon1);
                let b = Coordinate::new(lat2, lon2);

                prop_assert_eq!(haversine_km(a, b), haversine_km(b, a));
            }

            #[test]
            fn test_self_distance_is_zero(
                lat in -85.0..85.0_f64,
                lon in -180.0..180.0_f64
            ) {
                let a = Coordinate::new(lat, lon);
                prop_assert_eq!(haversine_km(a, a), 0.0);
            }

            #[test]
            fn test_distance_is_non_negative_and_bounded(
                lat1 in -85.0..85.0_f64,
                lon1 in -180.0..180.0_f64,
                lat2 in -85.0..85.0_f64,
                lon2 in -180.0..180.0_f64
            ) {
                let d = haversine_km(
                    Coordinate::new(lat1, lon1),
                    Coordinate::new(lat2, lon2),
                );

                // Half the Earth's circumference is the theoretical maximum.
                prop_assert!(d >= 0.0);
                prop_assert!(d <= EARTH_RADIUS_KM * std::f64::consts::PI + 0.1);
            }

            #[test]
            fn test_classification_is_total(d in 0.0..20_000.0_f64) {
                // Every finite distance falls into exactly one bucket.
                let class = LegEfficiency::classify(d);
                if d < 10.0 {
                    prop_assert_eq!(class, LegEfficiency::Optimal);
                } else if d <= 30.0 {
                    prop_assert_eq!(class, LegEfficiency::Acceptable);
                } else {
                    prop_assert_eq!(class, LegEfficiency::Inefficient);
                }
            }
        }
    }
}
