//! Cinematic camera tour: a scripted sequence of map-camera flights with
//! timed captions and a skip control.
//!
//! Everything here is single-threaded and driven by caller-supplied time, so a
//! tour can be replayed frame by frame.

pub mod camera;
pub mod config;
pub mod error;
pub mod overlay;
pub mod sequencer;
pub mod skip;
pub mod surface;
pub mod waypoint;
pub mod waypoints;

pub use camera::{FlightId, MapCamera, SimulatedCamera};
pub use config::TourConfig;
pub use error::TourError;
pub use overlay::{GlyphFrame, OverlayState, TextOverlayController};
pub use sequencer::{TourEvent, TourSequencer, TourState};
pub use skip::{SkipAffordanceController, SkipState};
pub use surface::{CaptionSurface, Glyph, TextSurface};
pub use waypoint::{Framing, Itinerary, Pose, Waypoint, WaypointTable};
