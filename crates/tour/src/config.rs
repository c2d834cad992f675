//! Start-up inputs for the tour, read from the environment.

use std::env;

use crate::error::TourError;

pub const ENV_API_KEY: &str = "MAPBOX_API_KEY";
pub const ENV_INTRO: &str = "TOUR_INTRO";
pub const ENV_DWELL: &str = "TOUR_DWELL_S";

/// Dwell used when neither the environment nor the itinerary sets one.
pub const DEFAULT_DWELL_S: f64 = 3.0;

#[derive(Debug, Clone, PartialEq)]
pub struct TourConfig {
    /// Whether the intro tour plays at all.
    pub intro: bool,
    /// Map provider access token, handed to the map camera.
    pub map_api_key: Option<String>,
    pub dwell_s: f64,
}

impl Default for TourConfig {
    fn default() -> Self {
        Self {
            intro: false,
            map_api_key: None,
            dwell_s: DEFAULT_DWELL_S,
        }
    }
}

impl TourConfig {
    pub fn from_env() -> Result<Self, TourError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key/value source; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, TourError> {
        let mut config = Self::default();

        config.map_api_key = lookup(ENV_API_KEY).filter(|k| !k.trim().is_empty());

        if let Some(raw) = lookup(ENV_INTRO) {
            config.intro = parse_flag(&raw).ok_or_else(|| TourError::Config {
                key: ENV_INTRO,
                reason: format!("expected a boolean, got {raw:?}"),
            })?;
        }

        if let Some(raw) = lookup(ENV_DWELL) {
            let dwell: f64 = raw.trim().parse().map_err(|err| TourError::Config {
                key: ENV_DWELL,
                reason: format!("{raw:?}: {err}"),
            })?;
            if !dwell.is_finite() || dwell < 0.0 {
                return Err(TourError::Config {
                    key: ENV_DWELL,
                    reason: format!("dwell must be a non-negative number, got {dwell}"),
                });
            }
            config.dwell_s = dwell;
        }

        Ok(config)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
