//! Location and scheduling value objects shared by events and tasks

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// GeoJSON point, serialized as `{"type": "Point", "coordinates": [lng, lat]}`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GeoJsonPoint", into = "GeoJsonPoint")]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, DomainError> {
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(DomainError::ValidationError(format!(
                "longitude out of range: {longitude}"
            )));
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(DomainError::ValidationError(format!(
                "latitude out of range: {latitude}"
            )));
        }
        Ok(Self { longitude, latitude })
    }
}

#[derive(Serialize, Deserialize)]
struct GeoJsonPoint {
    #[serde(rename = "type")]
    kind: String,
    coordinates: [f64; 2],
}

impl TryFrom<GeoJsonPoint> for GeoPoint {
    type Error = DomainError;

    fn try_from(raw: GeoJsonPoint) -> Result<Self, Self::Error> {
        if raw.kind != "Point" {
            return Err(DomainError::ValidationError(format!(
                "unsupported geometry type: {}",
                raw.kind
            )));
        }
        GeoPoint::new(raw.coordinates[0], raw.coordinates[1])
    }
}

impl From<GeoPoint> for GeoJsonPoint {
    fn from(point: GeoPoint) -> Self {
        Self {
            kind: "Point".to_string(),
            coordinates: [point.longitude, point.latitude],
        }
    }
}

/// Point plus an optional human-readable place name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub point: GeoPoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Start/end pair; `end` must not precede `start`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, DomainError> {
        if end < start {
            return Err(DomainError::ValidationError(
                "end time must not be before start time".to_string(),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}
