//! Geographic utilities.
//!
//! Only what the start-location pre-filter needs: great-circle distance
//! between two GPS points.

use crate::GpsPoint;

/// Mean Earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle (haversine) distance between two GPS points, in meters.
///
/// # Example
/// ```
/// use elevation_matcher::geo_utils::haversine_distance;
/// use elevation_matcher::GpsPoint;
///
/// let london = GpsPoint::new(51.5074, -0.1278);
/// let paris = GpsPoint::new(48.8566, 2.3522);
/// let distance = haversine_distance(&london, &paris);
/// assert!(distance > 330_000.0 && distance < 350_000.0);
/// ```
pub fn haversine_distance(p1: &GpsPoint, p2: &GpsPoint) -> f64 {
    let lat1 = p1.latitude.to_radians();
    let lat2 = p2.latitude.to_radians();
    let dlat = (p2.latitude - p1.latitude).to_radians();
    let dlng = (p2.longitude - p1.longitude).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_distance() {
        let p = GpsPoint::new(51.5074, -0.1278);
        assert_eq!(haversine_distance(&p, &p), 0.0);
    }

    #[test]
    fn test_known_distance() {
        // London to New York is roughly 5570 km
        let london = GpsPoint::new(51.5074, -0.1278);
        let new_york = GpsPoint::new(40.7128, -74.0060);
        let distance = haversine_distance(&london, &new_york);
        assert!(distance > 5_500_000.0 && distance < 5_650_000.0);
    }

    #[test]
    fn test_symmetry() {
        let a = GpsPoint::new(51.5074, -0.1278);
        let b = GpsPoint::new(48.8566, 2.3522);
        assert!((haversine_distance(&a, &b) - haversine_distance(&b, &a)).abs() < 1e-9);
    }
}
