use foundation::time::Time;
use runtime::timers::{TimerId, TimerQueue};
use runtime::tween::{Ease, Tween};
use tracing::debug;

/// Delay between tour start and the skip control appearing.
pub const REVEAL_DELAY_S: f64 = 3.0;
/// Fade-in duration of the skip control once revealed.
pub const REVEAL_FADE_S: f64 = 4.0;

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct SkipState {
    pub visible: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Phase {
    Idle,
    Pending(TimerId),
    Revealed,
    Cancelled,
}

/// Reveals the skip control once, a fixed delay after the tour starts.
#[derive(Debug)]
pub struct SkipAffordanceController {
    state: SkipState,
    phase: Phase,
    timers: TimerQueue<()>,
    opacity: Tween,
}

impl Default for SkipAffordanceController {
    fn default() -> Self {
        Self::new()
    }
}

impl SkipAffordanceController {
    pub fn new() -> Self {
        Self {
            state: SkipState::default(),
            phase: Phase::Idle,
            timers: TimerQueue::new(),
            opacity: Tween::hold(0.0, Time::ZERO),
        }
    }

    /// Arms the reveal. Only the first call of a run has any effect.
    pub fn start(&mut self, now: Time) -> bool {
        if self.phase != Phase::Idle {
            debug!(phase = ?self.phase, "skip control already started");
            return false;
        }
        let id = self.timers.schedule(now, REVEAL_DELAY_S, ());
        self.phase = Phase::Pending(id);
        true
    }

    /// On the tick that reveals the control, returns the scheduled reveal instant.
    ///
    /// The fade-in runs from that instant, not from `now`.
    pub fn tick(&mut self, now: Time) -> Option<Time> {
        let Phase::Pending(id) = self.phase else {
            return None;
        };
        match self.timers.pop_due(now) {
            Some((fired, due, ())) if fired == id => {
                self.phase = Phase::Revealed;
                self.state.visible = true;
                self.opacity = Tween::new(0.0, 1.0, due, REVEAL_FADE_S, Ease::Power4Out);
                Some(due)
            }
            Some((fired, _, ())) => {
                debug!(?fired, "stale skip reveal ignored");
                None
            }
            None => None,
        }
    }

    /// Clears a pending reveal. An already revealed control stays visible.
    pub fn cancel(&mut self) {
        if let Phase::Pending(id) = self.phase {
            self.timers.cancel(id);
            self.phase = Phase::Cancelled;
        }
    }

    /// Returns to the pre-start state so the controller can serve a fresh run.
    pub fn reset(&mut self) {
        self.timers.cancel_all();
        *self = Self::new();
    }

    pub fn state(&self) -> SkipState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.phase, Phase::Pending(_))
    }

    pub fn opacity(&self, now: Time) -> f64 {
        if self.state.visible {
            self.opacity.sample(now)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{REVEAL_DELAY_S, REVEAL_FADE_S, SkipAffordanceController};
    use foundation::time::Time;

    #[test]
    fn reveals_at_three_seconds_never_earlier() {
        let mut skip = SkipAffordanceController::new();
        assert!(skip.start(Time(0.0)));

        for step in 0..12 {
            let t = Time(step as f64 * 0.25);
            assert_eq!(skip.tick(t), None, "revealed early at {}", t.0);
            assert!(!skip.state().visible);
        }
        assert_eq!(skip.tick(Time(REVEAL_DELAY_S)), Some(Time(REVEAL_DELAY_S)));
        assert!(skip.state().visible);
        assert_eq!(skip.tick(Time(4.0)), None);
    }

    #[test]
    fn fades_in_after_reveal() {
        let mut skip = SkipAffordanceController::new();
        skip.start(Time(1.0));
        skip.tick(Time(4.0));

        assert_eq!(skip.opacity(Time(4.0)), 0.0);
        assert!(skip.opacity(Time(5.0)) > 0.5);
        assert_eq!(skip.opacity(Time(4.0 + REVEAL_FADE_S)), 1.0);
    }

    #[test]
    fn late_tick_fades_from_scheduled_reveal() {
        let mut skip = SkipAffordanceController::new();
        skip.start(Time(0.0));

        assert_eq!(skip.tick(Time(5.0)), Some(Time(REVEAL_DELAY_S)));
        assert!(skip.opacity(Time(5.0)) > 0.0);
        assert_eq!(skip.opacity(Time(REVEAL_DELAY_S + REVEAL_FADE_S)), 1.0);
    }

    #[test]
    fn second_start_is_ignored() {
        let mut skip = SkipAffordanceController::new();
        assert!(skip.start(Time(0.0)));
        assert!(!skip.start(Time(2.0)));
        assert!(skip.tick(Time(3.0)).is_some());
    }

    #[test]
    fn cancel_prevents_reveal() {
        let mut skip = SkipAffordanceController::new();
        skip.start(Time(0.0));
        skip.cancel();
        assert!(!skip.is_pending());
        assert_eq!(skip.tick(Time(10.0)), None);
        assert!(!skip.state().visible);
        assert!(!skip.start(Time(11.0)));
    }

    #[test]
    fn reset_allows_a_fresh_run() {
        let mut skip = SkipAffordanceController::new();
        skip.start(Time(0.0));
        skip.tick(Time(3.0));
        skip.reset();

        assert!(!skip.state().visible);
        assert!(skip.start(Time(20.0)));
        assert_eq!(skip.tick(Time(22.0)), None);
        assert_eq!(skip.tick(Time(23.0)), Some(Time(23.0)));
    }
}
