//! Time-based property animation.
//!
//! A [`Tween`] is a pure function of time: sampling never mutates it, so the
//! same frame always renders the same value.
use foundation::time::{Time, TimeSpan};

/// Easing curves applied to normalized progress.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Ease {
    Linear,
    /// Quartic ease-out: fast start, long settle.
    #[default]
    Power4Out,
}

impl Ease {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::Power4Out => 1.0 - (1.0 - t).powi(4),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tween {
    pub from: f64,
    pub to: f64,
    pub span: TimeSpan,
    pub ease: Ease,
}

impl Tween {
    pub fn new(from: f64, to: f64, start: Time, duration_s: f64, ease: Ease) -> Self {
        Self {
            from,
            to,
            span: TimeSpan::new(start, duration_s),
            ease,
        }
    }

    /// A tween that already sits at `value`.
    pub fn hold(value: f64, at: Time) -> Self {
        Self::new(value, value, at, 0.0, Ease::Linear)
    }

    pub fn sample(&self, now: Time) -> f64 {
        let k = self.ease.apply(self.span.progress(now));
        self.from + (self.to - self.from) * k
    }

    pub fn is_finished(&self, now: Time) -> bool {
        now.is_at_or_after(self.span.end)
    }
}
