use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Coordinates;

const EARTH_RADIUS_KM: f64 = 6371.0;
const KM_PER_MILE: f64 = 1.609344;

/// Great-circle distance in kilometers between two points given in degrees.
pub fn distance_km(from: Coordinates, to: Coordinates) -> f64 {
    let from_lat = from.lat.to_radians();
    let to_lat = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lng = (to.lng - from.lng).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + from_lat.cos() * to_lat.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

#[derive(Debug, Error)]
#[error("unknown unit system: {0} (expected km/metric or mi/imperial)")]
pub struct ParseUnitError(String);

impl std::str::FromStr for UnitSystem {
    type Err = ParseUnitError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "km" | "metric" => Ok(Self::Metric),
            "mi" | "miles" | "imperial" => Ok(Self::Imperial),
            _ => Err(ParseUnitError(value.to_string())),
        }
    }
}

/// Render a distance with one decimal place in the configured unit system.
/// Negative and non-finite inputs are clamped to 0.0.
pub fn format_distance(km: f64, units: UnitSystem) -> String {
    let km = if km.is_finite() && km > 0.0 { km } else { 0.0 };
    match units {
        UnitSystem::Metric => format!("{:.1} km", km),
        UnitSystem::Imperial => format!("{:.1} mi", km / KM_PER_MILE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_matches_known_city_pair() {
        // London to Paris is roughly 344 km.
        let london = Coordinates { lat: 51.5074, lng: -0.1278 };
        let paris = Coordinates { lat: 48.8566, lng: 2.3522 };

        let distance = distance_km(london, paris);
        assert!(
            (distance - 344.0).abs() < 10.0,
            "expected ~344 km, got {distance}"
        );
    }

    #[test]
    fn zero_distance_for_identical_points() {
        let point = Coordinates { lat: 11.0168, lng: 76.9558 };
        assert!(distance_km(point, point).abs() < 1e-9);
    }

    #[test]
    fn formats_with_one_decimal() {
        assert_eq!(format_distance(0.34, UnitSystem::Metric), "0.3 km");
        assert_eq!(format_distance(1.609344, UnitSystem::Imperial), "1.0 mi");
    }

    #[test]
    fn clamps_bad_input_to_zero() {
        assert_eq!(format_distance(-2.0, UnitSystem::Metric), "0.0 km");
        assert_eq!(format_distance(f64::NAN, UnitSystem::Metric), "0.0 km");
        assert_eq!(format_distance(f64::INFINITY, UnitSystem::Imperial), "0.0 mi");
    }

    #[test]
    fn parses_unit_system() {
        assert_eq!("km".parse::<UnitSystem>().unwrap(), UnitSystem::Metric);
        assert_eq!("Miles".parse::<UnitSystem>().unwrap(), UnitSystem::Imperial);
        assert!("furlongs".parse::<UnitSystem>().is_err());
    }
}
