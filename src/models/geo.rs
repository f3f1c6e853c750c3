// src/models/geo.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// A location in WGS84-like degree space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lat: f64,
    pub lon: f64,
}

impl Point {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Squared planar distance in degree space. Coverage tests compare this
    /// against the squared degree radius to avoid the sqrt.
    #[inline]
    pub fn distance_squared(&self, other: &Point) -> f64 {
        let dlat = self.lat - other.lat;
        let dlon = self.lon - other.lon;
        dlat * dlat + dlon * dlon
    }

    #[inline]
    pub fn distance(&self, other: &Point) -> f64 {
        self.distance_squared(other).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }

    /// Finite, with lat in [-90, 90] and lon in [-180, 180].
    pub fn is_valid_coordinate(&self) -> bool {
        self.is_finite() && (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }

    /// Arithmetic mean of a set of points. `None` for an empty slice.
    pub fn centroid(points: &[Point]) -> Option<Point> {
        if points.is_empty() {
            return None;
        }
        let n = points.len() as f64;
        let (sum_lat, sum_lon) = points
            .iter()
            .fold((0.0, 0.0), |(a, b), p| (a + p.lat, b + p.lon));
        Some(Point::new(sum_lat / n, sum_lon / n))
    }
}

/// Input documents carry points as `[lat, lon]` pairs.
impl From<[f64; 2]> for Point {
    fn from(pair: [f64; 2]) -> Self {
        Point::new(pair[0], pair[1])
    }
}

/// Lifecycle state of a facility as tagged by the upstream data.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FacilityStatus {
    Built,
    Planned,
    Other(String),
}

impl FacilityStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "built" | "existing" => FacilityStatus::Built,
            "planned" => FacilityStatus::Planned,
            other => FacilityStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FacilityStatus::Built => "built",
            FacilityStatus::Planned => "planned",
            FacilityStatus::Other(s) => s.as_str(),
        }
    }
}

impl fmt::Display for FacilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FacilityStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FacilityStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(FacilityStatus::parse(&raw))
    }
}

/// An existing or planned facility supplied by the upstream loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub lat: f64,
    pub lon: f64,
    #[serde(default = "default_status")]
    pub status: FacilityStatus,
}

/// An untagged facility is not known to be built, so it stays out of coverage.
fn default_status() -> FacilityStatus {
    FacilityStatus::Other(String::new())
}

impl Facility {
    pub fn new(lat: f64, lon: f64, status: FacilityStatus) -> Self {
        Self { lat, lon, status }
    }

    pub fn point(&self) -> Point {
        Point::new(self.lat, self.lon)
    }

    /// Built facilities always count; planned ones only when the scenario asks for them.
    pub fn is_active(&self, include_planned: bool) -> bool {
        match self.status {
            FacilityStatus::Built => true,
            FacilityStatus::Planned => include_planned,
            FacilityStatus::Other(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centroid_of_points() {
        let pts = vec![Point::new(0.0, 0.0), Point::new(2.0, 4.0)];
        let c = Point::centroid(&pts).unwrap();
        assert_eq!(c, Point::new(1.0, 2.0));
        assert!(Point::centroid(&[]).is_none());
    }

    #[test]
    fn test_coordinate_ranges() {
        assert!(Point::new(-90.0, 180.0).is_valid_coordinate());
        assert!(!Point::new(90.5, 0.0).is_valid_coordinate());
        assert!(!Point::new(0.0, -180.1).is_valid_coordinate());
        assert!(!Point::new(1e300, 0.0).is_valid_coordinate());
        assert!(!Point::new(f64::NAN, 0.0).is_valid_coordinate());
    }

    #[test]
    fn test_status_parsing_is_case_insensitive() {
        assert_eq!(FacilityStatus::parse("Built"), FacilityStatus::Built);
        assert_eq!(FacilityStatus::parse(" planned "), FacilityStatus::Planned);
        assert_eq!(
            FacilityStatus::parse("Under Construction"),
            FacilityStatus::Other("under construction".to_string())
        );
    }

    #[test]
    fn test_facility_activity_by_scenario() {
        let built = Facility::new(0.0, 0.0, FacilityStatus::Built);
        let planned = Facility::new(0.0, 0.0, FacilityStatus::Planned);
        let other = Facility::new(0.0, 0.0, FacilityStatus::Other("closed".into()));

        assert!(built.is_active(false));
        assert!(!planned.is_active(false));
        assert!(planned.is_active(true));
        assert!(!other.is_active(true));
    }

    #[test]
    fn test_facility_status_deserializes_from_string() {
        let f: Facility = serde_json::from_str(r#"{"lat": 31.5, "lon": 34.8, "status": "Built"}"#).unwrap();
        assert_eq!(f.status, FacilityStatus::Built);
        let f: Facility = serde_json::from_str(r#"{"lat": 31.5, "lon": 34.8}"#).unwrap();
        assert_eq!(f.status, FacilityStatus::Other(String::new()));
        assert!(!f.is_active(false));
        assert!(!f.is_active(true));
    }
}
