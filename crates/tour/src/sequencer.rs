//! The tour state machine.
//!
//! ```text
//! Idle ──start──▶ Flying(0) ──arrived──▶ Dwelling(0) ──dwell──▶ Flying(1) … Dwelling(n-1) ──dwell──▶ Complete
//!   └────────────── skip (from any non-terminal state) ──────────────▶ Skipped
//! ```
//!
//! Visits are serialized: a flight is only requested once the previous stop's
//! dwell has elapsed, so at most one camera request is ever outstanding.

use foundation::time::Time;
use runtime::event_bus::{EventBus, Stamped};
use runtime::frame::Frame;
use runtime::timers::TimerQueue;
use tracing::{debug, info};

use crate::camera::{FlightId, MapCamera};
use crate::overlay::TextOverlayController;
use crate::skip::SkipAffordanceController;
use crate::surface::{CaptionSurface, TextSurface};
use crate::waypoint::{Itinerary, Pose};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TourState {
    Idle,
    Flying { index: usize },
    Dwelling { index: usize },
    Skipped,
    Complete,
}

impl TourState {
    pub fn is_terminal(self) -> bool {
        matches!(self, TourState::Skipped | TourState::Complete)
    }
}

/// Everything observable the sequencer did, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum TourEvent {
    Started { waypoints: usize },
    FlightRequested { index: usize, flight: FlightId },
    Arrived { index: usize, flight: FlightId },
    CaptionShown { index: usize, text: String },
    DwellElapsed { index: usize },
    SkipRevealed,
    Skipped { from: TourState },
    Completed,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum SequencerTimer {
    Dwell { index: usize },
}

pub struct TourSequencer<C: MapCamera, S: CaptionSurface = TextSurface> {
    itinerary: Itinerary,
    camera: C,
    overlay: TextOverlayController<S>,
    skip: SkipAffordanceController,
    state: TourState,
    timers: TimerQueue<SequencerTimer>,
    next_flight: u64,
    in_flight: Option<FlightId>,
    bus: EventBus<TourEvent>,
}

impl<C: MapCamera> TourSequencer<C, TextSurface> {
    pub fn new(itinerary: Itinerary, camera: C) -> Self {
        Self::with_surface(itinerary, camera, TextSurface::new())
    }
}

impl<C: MapCamera, S: CaptionSurface> TourSequencer<C, S> {
    pub fn with_surface(itinerary: Itinerary, camera: C, surface: S) -> Self {
        Self {
            itinerary,
            camera,
            overlay: TextOverlayController::with_surface(surface),
            skip: SkipAffordanceController::new(),
            state: TourState::Idle,
            timers: TimerQueue::new(),
            next_flight: 0,
            in_flight: None,
            bus: EventBus::new(),
        }
    }

    /// Begins the tour: flies to the first waypoint and arms the skip control.
    pub fn start(&mut self, now: Time) -> bool {
        if self.state != TourState::Idle {
            debug!(state = ?self.state, "tour already started");
            return false;
        }
        info!(waypoints = self.itinerary.len(), "tour started");
        self.bus.emit(
            now,
            TourEvent::Started {
                waypoints: self.itinerary.len(),
            },
        );
        self.skip.start(now);
        self.fly(0, now);
        true
    }

    /// The map camera finished the flight identified by `flight`.
    ///
    /// Arrivals that do not match the outstanding request (late, duplicate,
    /// or after a skip) are ignored.
    pub fn on_camera_arrived(&mut self, flight: FlightId, now: Time) -> bool {
        let TourState::Flying { index } = self.state else {
            debug!(?flight, state = ?self.state, "camera arrival outside a flight ignored");
            return false;
        };
        if self.in_flight != Some(flight) {
            debug!(?flight, expected = ?self.in_flight, "stale camera arrival ignored");
            return false;
        }
        self.in_flight = None;
        self.state = TourState::Dwelling { index };
        self.bus.emit(now, TourEvent::Arrived { index, flight });

        let Some((waypoint, dwell_s)) = self.itinerary.stop(index) else {
            return false;
        };
        if self.overlay.show_caption(&waypoint.name, dwell_s, now) {
            info!(index, caption = %waypoint.name, "caption shown");
            self.bus.emit(
                now,
                TourEvent::CaptionShown {
                    index,
                    text: waypoint.name.to_string(),
                },
            );
        }
        self.timers
            .schedule(now, dwell_s, SequencerTimer::Dwell { index });
        true
    }

    /// Advances every timer to the frame's time.
    pub fn tick(&mut self, frame: Frame) {
        self.tick_at(frame.time);
    }

    /// Fires everything due by `now`. Events and the next flight are stamped
    /// with the instant their timer was due.
    pub fn tick_at(&mut self, now: Time) {
        if let Some(at) = self.skip.tick(now) {
            self.bus.emit(at, TourEvent::SkipRevealed);
        }

        while let Some((_, due, timer)) = self.timers.pop_due(now) {
            match timer {
                SequencerTimer::Dwell { index } if self.state == (TourState::Dwelling { index }) => {
                    self.bus.emit(due, TourEvent::DwellElapsed { index });
                    if index + 1 < self.itinerary.len() {
                        self.fly(index + 1, due);
                    } else {
                        info!("tour complete");
                        self.state = TourState::Complete;
                        self.bus.emit(due, TourEvent::Completed);
                    }
                }
                stale => debug!(?stale, state = ?self.state, "stale dwell timer ignored"),
            }
        }

        self.overlay.tick(now);
    }

    /// Aborts the tour and jumps straight to the primary view.
    pub fn skip(&mut self, now: Time) -> bool {
        if self.state.is_terminal() {
            debug!(state = ?self.state, "skip after tour end ignored");
            return false;
        }
        let from = self.state;
        self.release_all();
        let primary = self.primary_pose();
        self.camera.jump_to(&primary);
        self.state = TourState::Skipped;
        info!(?from, "tour skipped");
        self.bus.emit(now, TourEvent::Skipped { from });
        true
    }

    /// Releases every pending timer and in-flight request without changing state.
    ///
    /// Call when the hosting view goes away mid-tour.
    pub fn teardown(&mut self) {
        self.release_all();
    }

    fn release_all(&mut self) {
        if self.in_flight.take().is_some() {
            self.camera.stop();
        }
        let released = self.timers.cancel_all();
        if released > 0 {
            debug!(released, "dwell timers cancelled");
        }
        self.overlay.cancel();
        self.skip.cancel();
    }

    fn fly(&mut self, index: usize, now: Time) {
        let Some(waypoint) = self.itinerary.table().get(index) else {
            return;
        };
        let flight = FlightId(self.next_flight);
        self.next_flight += 1;
        self.in_flight = Some(flight);
        self.state = TourState::Flying { index };
        debug!(index, ?flight, name = %waypoint.name, "flying to waypoint");
        self.camera.fly_to(flight, &waypoint.pose(), now);
        self.bus.emit(now, TourEvent::FlightRequested { index, flight });
    }

    /// The pose a skipped tour lands on: the itinerary's last waypoint.
    pub fn primary_pose(&self) -> Pose {
        self.itinerary.table().last().pose()
    }

    pub fn state(&self) -> TourState {
        self.state
    }

    /// Terminal, and no caption is still fading.
    pub fn is_finished(&self) -> bool {
        self.state.is_terminal() && !self.overlay.has_pending_timers()
    }

    pub fn in_flight(&self) -> Option<FlightId> {
        self.in_flight
    }

    pub fn itinerary(&self) -> &Itinerary {
        &self.itinerary
    }

    pub fn overlay(&self) -> &TextOverlayController<S> {
        &self.overlay
    }

    pub fn skip_affordance(&self) -> &SkipAffordanceController {
        &self.skip
    }

    pub fn camera(&self) -> &C {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut C {
        &mut self.camera
    }

    pub fn events(&self) -> &[Stamped<TourEvent>] {
        self.bus.events()
    }

    pub fn drain_events(&mut self) -> Vec<Stamped<TourEvent>> {
        self.bus.drain()
    }
}
