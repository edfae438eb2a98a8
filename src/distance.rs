// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

/// Mean diameter of Earth, in kilometers.
const EARTH_DIAMETER: f64 = 12_742.0;

/// Calculates the great-circle distance between two lat-lon positions
/// on Earth using the [haversine formula](https://en.wikipedia.org/wiki/Haversine_formula).
/// Returns the result in kilometers.
pub fn earth_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1 = lat1.to_radians();
    let lon1 = lon1.to_radians();
    let lat2 = lat2.to_radians();
    let lon2 = lon2.to_radians();

    let sin_dlat_half = ((lat2 - lat1) * 0.5).sin();
    let sin_dlon_half = ((lon2 - lon1) * 0.5).sin();

    let h = sin_dlat_half * sin_dlat_half + lat1.cos() * lat2.cos() * sin_dlon_half * sin_dlon_half;

    EARTH_DIAMETER * h.sqrt().asin()
}

/// Calculates the initial [great-circle bearing](https://en.wikipedia.org/wiki/Great-circle_navigation)
/// from the first position towards the second, in radians,
/// normalized to `[0, 2π)` with 0 pointing due north.
pub fn initial_bearing(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1 = lat1.to_radians();
    let lon1 = lon1.to_radians();
    let lat2 = lat2.to_radians();
    let lon2 = lon2.to_radians();

    let y = lat2.cos() * (lon2 - lon1).sin();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * (lon2 - lon1).cos();

    let bearing = y.atan2(x);
    if bearing < 0.0 {
        bearing + 2.0 * std::f64::consts::PI
    } else {
        bearing
    }
}

#[cfg(test)]
mod tests {
    use super::{earth_distance, initial_bearing};
    use std::f64::consts::PI;

    #[test]
    fn earth_distance_is_symmetric() {
        let d1 = earth_distance(51.5007, -0.1246, 51.5138, -0.0984);
        let d2 = earth_distance(51.5138, -0.0984, 51.5007, -0.1246);
        assert_eq!(d1, d2);
    }

    #[test]
    fn earth_distance_zero_iff_same_position() {
        assert_eq!(earth_distance(51.5007, -0.1246, 51.5007, -0.1246), 0.0);
        assert!(earth_distance(51.5007, -0.1246, 51.5008, -0.1246) > 0.0);
    }

    #[test]
    fn earth_distance_london_landmarks() {
        // Big Ben to the Tower of London, roughly 2.1 km as the crow flies.
        let d = earth_distance(51.5007, -0.1246, 51.5081, -0.0759);
        assert!((d - 3.45).abs() < 0.1, "unexpected distance: {}", d);
    }

    #[test]
    fn initial_bearing_cardinal_directions() {
        let north = initial_bearing(51.0, -1.0, 52.0, -1.0);
        assert!(north.abs() < 1e-9, "due north should be 0, got {}", north);

        let east = initial_bearing(0.0, 0.0, 0.0, 1.0);
        assert!((east - PI / 2.0).abs() < 1e-9, "due east should be π/2, got {}", east);

        let south = initial_bearing(52.0, -1.0, 51.0, -1.0);
        assert!((south - PI).abs() < 1e-9, "due south should be π, got {}", south);

        let west = initial_bearing(0.0, 1.0, 0.0, 0.0);
        assert!(
            (west - 3.0 * PI / 2.0).abs() < 1e-9,
            "due west should be 3π/2, got {}",
            west
        );
    }

    #[test]
    fn initial_bearing_is_normalized() {
        // A north-westerly bearing must come out in [3π/2, 2π), not negative.
        let b = initial_bearing(51.0, 0.0, 52.0, -1.0);
        assert!(b > 3.0 * PI / 2.0 && b < 2.0 * PI, "got {}", b);
    }
}
