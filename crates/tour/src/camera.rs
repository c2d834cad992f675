//! The map-camera seam.
//!
//! The sequencer never animates the map itself. It asks a [`MapCamera`] to fly,
//! and the host reports arrival back through
//! [`TourSequencer::on_camera_arrived`](crate::sequencer::TourSequencer::on_camera_arrived)
//! with the same [`FlightId`].

use foundation::geo::{LngLat, great_circle_distance_m};
use foundation::time::{Time, TimeSpan};
use runtime::tween::{Ease, Tween};

use crate::waypoint::Pose;

/// Identifies one camera flight request.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FlightId(pub u64);

pub trait MapCamera {
    /// Starts an animated flight to `pose`. Easing and duration are up to the camera.
    fn fly_to(&mut self, flight: FlightId, pose: &Pose, now: Time);

    /// Abandons the current flight, if any. Its arrival must not be reported.
    fn stop(&mut self);

    /// Moves to `pose` without animation.
    fn jump_to(&mut self, pose: &Pose);
}

/// Shortest flight the simulated camera will make (seconds).
pub const MIN_FLIGHT_S: f64 = 1.0;
/// Longest flight the simulated camera will make (seconds).
pub const MAX_FLIGHT_S: f64 = 8.0;

#[derive(Debug, Clone, PartialEq)]
struct Flight {
    id: FlightId,
    from: Pose,
    to: Pose,
    span: TimeSpan,
}

/// Headless camera with deterministic flight times.
///
/// Flight duration grows with great-circle distance and zoom change.
/// Arrivals are collected with [`SimulatedCamera::poll_arrival`].
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedCamera {
    pose: Pose,
    clock: Time,
    flight: Option<Flight>,
    requested: Vec<(FlightId, Pose)>,
    jumps: Vec<Pose>,
    stops: usize,
}

impl SimulatedCamera {
    pub fn new(initial: Pose) -> Self {
        Self {
            pose: initial,
            clock: Time::ZERO,
            flight: None,
            requested: Vec::new(),
            jumps: Vec::new(),
            stops: 0,
        }
    }

    pub fn flight_duration_s(&self, from: &Pose, to: &Pose) -> f64 {
        let km = great_circle_distance_m(from.center, to.center) / 1000.0;
        let zoom_delta = (to.zoom - from.zoom).abs();
        (1.5 + km / 2500.0 + zoom_delta * 0.25).clamp(MIN_FLIGHT_S, MAX_FLIGHT_S)
    }

    /// Reports the in-flight request once its flight time has elapsed.
    pub fn poll_arrival(&mut self, now: Time) -> Option<FlightId> {
        self.clock = now;
        let flight = self.flight.as_ref()?;
        if !now.is_at_or_after(flight.span.end) {
            return None;
        }
        let flight = self.flight.take()?;
        self.pose = flight.to;
        Some(flight.id)
    }

    /// Where the camera is looking at `now`, mid-flight included.
    pub fn pose_at(&self, now: Time) -> Pose {
        let Some(flight) = &self.flight else {
            return self.pose;
        };
        let lerp = |a: f64, b: f64| Tween {
            from: a,
            to: b,
            span: flight.span,
            ease: Ease::Linear,
        }
        .sample(now);
        Pose {
            center: LngLat::new(
                lerp(flight.from.center.lon_deg, flight.to.center.lon_deg),
                lerp(flight.from.center.lat_deg, flight.to.center.lat_deg),
            ),
            zoom: lerp(flight.from.zoom, flight.to.zoom),
            pitch: lerp(flight.from.pitch, flight.to.pitch),
            bearing: lerp(flight.from.bearing, flight.to.bearing),
        }
    }

    pub fn is_flying(&self) -> bool {
        self.flight.is_some()
    }

    pub fn in_flight(&self) -> Option<FlightId> {
        self.flight.as_ref().map(|f| f.id)
    }

    pub fn arrival_time(&self) -> Option<Time> {
        self.flight.as_ref().map(|f| f.span.end)
    }

    /// Every flight ever requested, in order.
    pub fn requested(&self) -> &[(FlightId, Pose)] {
        &self.requested
    }

    pub fn jumps(&self) -> &[Pose] {
        &self.jumps
    }

    pub fn stops(&self) -> usize {
        self.stops
    }
}

impl MapCamera for SimulatedCamera {
    fn fly_to(&mut self, flight: FlightId, pose: &Pose, now: Time) {
        let from = self.pose_at(now);
        self.pose = from;
        self.clock = now;
        let duration = self.flight_duration_s(&from, pose);
        self.flight = Some(Flight {
            id: flight,
            from,
            to: *pose,
            span: TimeSpan::new(now, duration),
        });
        self.requested.push((flight, *pose));
    }

    fn stop(&mut self) {
        if self.flight.is_some() {
            self.pose = self.pose_at(self.clock);
            self.flight = None;
            self.stops += 1;
        }
    }

    fn jump_to(&mut self, pose: &Pose) {
        self.flight = None;
        self.pose = *pose;
        self.jumps.push(*pose);
    }
}
