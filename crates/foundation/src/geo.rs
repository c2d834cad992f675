use serde::{Deserialize, Serialize};

/// WGS84 semi-major axis (meters).
pub const WGS84_A: f64 = 6_378_137.0;

/// A geographic position in degrees, longitude first (map-provider order).
///
/// Serialized as a `[lon, lat]` pair.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LngLat {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl LngLat {
    pub const fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }

    pub fn lon_in_range(&self) -> bool {
        (-180.0..=180.0).contains(&self.lon_deg)
    }

    pub fn lat_in_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat_deg)
    }

    /// Both components are finite and within their geographic range.
    pub fn is_valid(&self) -> bool {
        self.lon_in_range() && self.lat_in_range()
    }
}

impl From<[f64; 2]> for LngLat {
    fn from([lon_deg, lat_deg]: [f64; 2]) -> Self {
        Self { lon_deg, lat_deg }
    }
}

impl From<LngLat> for [f64; 2] {
    fn from(p: LngLat) -> Self {
        [p.lon_deg, p.lat_deg]
    }
}

/// Folds a bearing in degrees into `[0, 360)`.
pub fn normalize_bearing_deg(bearing_deg: f64) -> f64 {
    let b = bearing_deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if b >= 360.0 { 0.0 } else { b }
}

/// Haversine distance on a sphere of radius [`WGS84_A`] (meters).
pub fn great_circle_distance_m(a: LngLat, b: LngLat) -> f64 {
    let lat_a = a.lat_deg.to_radians();
    let lat_b = b.lat_deg.to_radians();
    let d_lat = lat_b - lat_a;
    let d_lon = (b.lon_deg - a.lon_deg).to_radians();

    let h = (d_lat * 0.5).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon * 0.5).sin().powi(2);
    2.0 * WGS84_A * h.sqrt().min(1.0).asin()
}

#[cfg(test)]
mod tests {
    use super::{LngLat, WGS84_A, great_circle_distance_m, normalize_bearing_deg};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn range_checks() {
        assert!(LngLat::new(180.0, -90.0).is_valid());
        assert!(!LngLat::new(180.5, 0.0).is_valid());
        assert!(!LngLat::new(0.0, 91.0).is_valid());
        assert!(!LngLat::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn bearing_normalization() {
        assert_eq!(normalize_bearing_deg(440.0), 80.0);
        assert_eq!(normalize_bearing_deg(360.0), 0.0);
        assert_eq!(normalize_bearing_deg(-20.0), 340.0);
        assert_eq!(normalize_bearing_deg(0.0), 0.0);
    }

    #[test]
    fn quarter_meridian_distance() {
        let d = great_circle_distance_m(LngLat::new(0.0, 0.0), LngLat::new(0.0, 90.0));
        assert_close(d, WGS84_A * std::f64::consts::FRAC_PI_2, 1e-3);
    }

    #[test]
    fn distance_to_self_is_zero() {
        let paris = LngLat::new(2.312772, 48.856091);
        assert_close(great_circle_distance_m(paris, paris), 0.0, 1e-9);
    }

    #[test]
    fn serializes_as_lon_lat_pair() {
        let p: LngLat = serde_json::from_str("[5.0, 43.0]").unwrap();
        assert_eq!(p, LngLat::new(5.0, 43.0));
        assert_eq!(serde_json::to_string(&p).unwrap(), "[5.0,43.0]");
    }
}
