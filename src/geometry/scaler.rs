// src/geometry/scaler.rs

use serde::Serialize;

use crate::models::geo::Point;
use crate::utils::constants::{FALLBACK_LATITUDE, METERS_PER_DEGREE_LAT, METERS_PER_DEGREE_METRIC};

/// How a physical radius becomes a single isotropic degree radius.
/// One convention is used for a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegreeConvention {
    /// meters / 111_000, the latitude scale.
    LatitudeDegrees,
    /// meters / 100_000.
    Metric100k,
}

impl DegreeConvention {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "latitude" | "latitude_degrees" => Some(DegreeConvention::LatitudeDegrees),
            "metric100k" | "metric" => Some(DegreeConvention::Metric100k),
            _ => None,
        }
    }
}

/// Anisotropic degree extents of a physical radius at some latitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DegreeRadius {
    pub lat: f64,
    pub lon: f64,
}

/// Converts meters to local degree space around a reference latitude.
/// Accuracy is roughly ±10% over a regional extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateScaler {
    reference_latitude: f64,
    convention: DegreeConvention,
}

impl CoordinateScaler {
    pub fn new(reference_latitude: f64, convention: DegreeConvention) -> Self {
        Self {
            reference_latitude,
            convention,
        }
    }

    /// Uses the mean latitude of `points`, or the fallback latitude when empty.
    pub fn for_points(points: &[Point], convention: DegreeConvention) -> Self {
        let reference_latitude = Point::centroid(points)
            .map(|c| c.lat)
            .filter(|lat| lat.is_finite())
            .unwrap_or(FALLBACK_LATITUDE);
        Self::new(reference_latitude, convention)
    }

    pub fn reference_latitude(&self) -> f64 {
        self.reference_latitude
    }

    /// (lat degrees per meter, lon degrees per meter).
    pub fn degrees_per_meter(&self) -> (f64, f64) {
        let lat_deg = 1.0 / METERS_PER_DEGREE_LAT;
        let cos_lat = self.reference_latitude.to_radians().cos().abs().max(1e-9);
        let lon_deg = 1.0 / (METERS_PER_DEGREE_LAT * cos_lat);
        (lat_deg, lon_deg)
    }

    pub fn anisotropic(&self, meters: f64) -> DegreeRadius {
        let (lat_deg, lon_deg) = self.degrees_per_meter();
        DegreeRadius {
            lat: meters * lat_deg,
            lon: meters * lon_deg,
        }
    }

    /// Single degree radius used for every circular test in a run.
    pub fn isotropic(&self, meters: f64) -> f64 {
        match self.convention {
            DegreeConvention::LatitudeDegrees => meters / METERS_PER_DEGREE_LAT,
            DegreeConvention::Metric100k => meters / METERS_PER_DEGREE_METRIC,
        }
    }
}
