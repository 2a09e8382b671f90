//! Great-circle distance (haversine)
//!
//! All inputs are degrees, all outputs kilometers on a spherical Earth.

use crate::constants::geo::EARTH_RADIUS_KM;
use crate::coord::Coordinates;

/// Calculate the distance between two points in kilometers (Haversine formula)
///
/// Symmetric, zero for coincident points, and finite and non-negative for
/// any finite input.
pub fn distance_km(p1: Coordinates, p2: Coordinates) -> f64 {
    let lat1 = p1.lat.to_radians();
    let lat2 = p2.lat.to_radians();
    let delta_lat = (p2.lat - p1.lat).to_radians();
    let delta_lng = (p2.lng - p1.lng).to_radians();

    // Rounding can push `a` just past 1.0 for antipodal points
    let a = ((delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2))
    .clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Same as [`distance_km`] for callers holding bare lat/lng pairs
pub fn distance_km_between(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    distance_km(Coordinates::new(lat1, lng1), Coordinates::new(lat2, lng2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const TOKYO_STATION: Coordinates = Coordinates { lat: 35.681236, lng: 139.767125 };
    const TOKYO_TOWER: Coordinates = Coordinates { lat: 35.6586, lng: 139.7454 };

    #[test]
    fn test_zero_for_coincident_points() {
        assert_eq!(distance_km(TOKYO_STATION, TOKYO_STATION), 0.0);
        assert_eq!(distance_km_between(-33.9, 18.4, -33.9, 18.4), 0.0);
    }

    #[test]
    fn test_symmetry() {
        let pairs = [
            (TOKYO_STATION, TOKYO_TOWER),
            (Coordinates::new(40.7128, -74.0060), Coordinates::new(51.5074, -0.1278)),
            (Coordinates::new(-89.9, 179.9), Coordinates::new(89.9, -179.9)),
            (Coordinates::new(0.0, 0.0), Coordinates::new(0.0, 180.0)),
        ];

        for (a, b) in pairs {
            assert_relative_eq!(distance_km(a, b), distance_km(b, a), max_relative = 1e-12);
        }
    }

    #[test]
    fn test_tokyo_station_to_tokyo_tower() {
        let d = distance_km(TOKYO_STATION, TOKYO_TOWER);
        assert!((3.0..3.4).contains(&d), "expected ~3.2 km, got {}", d);
    }

    #[test]
    fn test_one_degree_latitude() {
        // 1 degree of arc = 2 * PI * R / 360
        let d = distance_km_between(40.0, -74.0, 41.0, -74.0);
        assert_relative_eq!(d, 111.195, epsilon = 0.01);
    }

    #[test]
    fn test_antipodal_is_half_circumference() {
        let d = distance_km_between(0.0, 0.0, 0.0, 180.0);
        assert_relative_eq!(d, std::f64::consts::PI * EARTH_RADIUS_KM, max_relative = 1e-9);
        assert!(d.is_finite());
    }

    #[test]
    fn test_monotonic_with_separation() {
        let origin = Coordinates::new(0.0, 0.0);
        let mut last = 0.0;
        for step in 1..=18 {
            let d = distance_km(origin, Coordinates::new(0.0, step as f64 * 10.0));
            assert!(d > last, "distance should grow: {} <= {}", d, last);
            last = d;
        }
    }
}
