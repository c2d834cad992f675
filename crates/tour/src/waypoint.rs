use std::borrow::Cow;

use foundation::geo::{LngLat, normalize_bearing_deg};
use serde::Deserialize;

use crate::error::TourError;

/// Highest zoom level the map camera supports.
pub const MAX_ZOOM: f64 = 22.0;

/// Steepest pitch the map camera supports (degrees).
pub const MAX_PITCH: f64 = 85.0;

/// The framing part of a pose: everything except where the camera looks.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Framing {
    pub zoom: f64,
    pub pitch: f64,
    pub bearing: f64,
}

/// A complete camera pose, as handed to the map camera.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Pose {
    pub center: LngLat,
    pub zoom: f64,
    pub pitch: f64,
    pub bearing: f64,
}

/// A named stop on the tour.
///
/// Bearing is passed through untouched, including values outside `[0, 360)`:
/// the camera decides which way to rotate from the raw number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Waypoint {
    pub center: LngLat,
    pub zoom: f64,
    pub pitch: f64,
    pub bearing: f64,
    /// Caption shown on arrival; empty means no caption.
    #[serde(default)]
    pub name: Cow<'static, str>,
}

impl Waypoint {
    pub const fn new(name: &'static str, center: LngLat, zoom: f64, pitch: f64, bearing: f64) -> Self {
        Self {
            center,
            zoom,
            pitch,
            bearing,
            name: Cow::Borrowed(name),
        }
    }

    pub const fn framed(name: &'static str, center: LngLat, framing: Framing) -> Self {
        Self::new(name, center, framing.zoom, framing.pitch, framing.bearing)
    }

    pub fn pose(&self) -> Pose {
        Pose {
            center: self.center,
            zoom: self.zoom,
            pitch: self.pitch,
            bearing: self.bearing,
        }
    }

    /// Bearing folded into `[0, 360)`. For diagnostics; the pose keeps the raw value.
    pub fn normalized_bearing(&self) -> f64 {
        normalize_bearing_deg(self.bearing)
    }

    pub fn has_caption(&self) -> bool {
        !self.name.is_empty()
    }

    fn check(&self) -> Result<(), String> {
        if !self.center.lon_in_range() {
            return Err(format!(
                "longitude {} outside [-180, 180]",
                self.center.lon_deg
            ));
        }
        if !self.center.lat_in_range() {
            return Err(format!("latitude {} outside [-90, 90]", self.center.lat_deg));
        }
        if !(0.0..=MAX_ZOOM).contains(&self.zoom) {
            return Err(format!("zoom {} outside [0, {MAX_ZOOM}]", self.zoom));
        }
        if !(0.0..=MAX_PITCH).contains(&self.pitch) {
            return Err(format!("pitch {} outside [0, {MAX_PITCH}]", self.pitch));
        }
        if !self.bearing.is_finite() {
            return Err(format!("bearing {} is not finite", self.bearing));
        }
        Ok(())
    }
}

/// The tour's itinerary: fixed, ordered, non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct WaypointTable {
    waypoints: Vec<Waypoint>,
}

impl WaypointTable {
    /// Validates every waypoint up front so a bad table never starts a tour.
    pub fn new(waypoints: Vec<Waypoint>) -> Result<Self, TourError> {
        if waypoints.is_empty() {
            return Err(TourError::EmptyTable);
        }
        for (index, wp) in waypoints.iter().enumerate() {
            wp.check()
                .map_err(|reason| TourError::InvalidWaypoint { index, reason })?;
        }
        Ok(Self { waypoints })
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Waypoint> {
        self.waypoints.get(index)
    }

    pub fn first(&self) -> &Waypoint {
        &self.waypoints[0]
    }

    pub fn last(&self) -> &Waypoint {
        &self.waypoints[self.waypoints.len() - 1]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Waypoint> {
        self.waypoints.iter()
    }

    pub fn as_slice(&self) -> &[Waypoint] {
        &self.waypoints
    }
}

impl<'a> IntoIterator for &'a WaypointTable {
    type Item = &'a Waypoint;
    type IntoIter = std::slice::Iter<'a, Waypoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.waypoints.iter()
    }
}

/// A waypoint table plus how long the tour lingers at each stop.
#[derive(Debug, Clone, PartialEq)]
pub struct Itinerary {
    table: WaypointTable,
    dwell_s: Vec<f64>,
}

#[derive(Deserialize)]
struct StopRecord {
    #[serde(flatten)]
    waypoint: Waypoint,
    dwell_s: Option<f64>,
}

impl Itinerary {
    pub fn new(table: WaypointTable, dwell_s: Vec<f64>) -> Result<Self, TourError> {
        if dwell_s.len() != table.len() {
            return Err(TourError::DwellMismatch {
                waypoints: table.len(),
                dwells: dwell_s.len(),
            });
        }
        if let Some((index, &value)) = dwell_s
            .iter()
            .enumerate()
            .find(|(_, d)| !d.is_finite() || **d < 0.0)
        {
            return Err(TourError::InvalidDwell { index, value });
        }
        Ok(Self { table, dwell_s })
    }

    /// Every stop lingers for the same `dwell_s`.
    pub fn uniform(table: WaypointTable, dwell_s: f64) -> Result<Self, TourError> {
        let dwells = vec![dwell_s; table.len()];
        Self::new(table, dwells)
    }

    /// Parses a JSON array of stops.
    ///
    /// Each stop is a waypoint object (`center` as `[lon, lat]`) with an optional
    /// `dwell_s`; stops without one use `default_dwell_s`.
    pub fn from_json_str(json: &str, default_dwell_s: f64) -> Result<Self, TourError> {
        let records: Vec<StopRecord> = serde_json::from_str(json)?;
        let (waypoints, dwells): (Vec<_>, Vec<_>) = records
            .into_iter()
            .map(|r| (r.waypoint, r.dwell_s.unwrap_or(default_dwell_s)))
            .unzip();
        Self::new(WaypointTable::new(waypoints)?, dwells)
    }

    pub fn table(&self) -> &WaypointTable {
        &self.table
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn dwell_s(&self, index: usize) -> Option<f64> {
        self.dwell_s.get(index).copied()
    }

    pub fn stop(&self, index: usize) -> Option<(&Waypoint, f64)> {
        Some((self.table.get(index)?, self.dwell_s(index)?))
    }

    /// Total scripted dwell time, excluding camera flights.
    pub fn total_dwell_s(&self) -> f64 {
        self.dwell_s.iter().sum()
    }
}
