use foundation::time::Time;

/// One step of the tour clock.
///
/// The player and tests advance the tour by whole frames; each frame's time is
/// `index * dt_s`, recomputed rather than summed, so a tour played at 30 fps and
/// one at 20 fps agree on when a dwell timer falls due.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    pub index: u64,
    /// Seconds of tour time per frame.
    pub dt_s: f64,
    /// Tour time at this frame.
    pub time: Time,
}

impl Frame {
    pub fn new(index: u64, dt_s: f64) -> Self {
        Self {
            index,
            dt_s,
            time: Time(index as f64 * dt_s),
        }
    }

    /// The tour's opening frame at `fps` frames per second (at least one).
    pub fn at_rate(fps: u32) -> Self {
        Self::new(0, 1.0 / f64::from(fps.max(1)))
    }

    pub fn next(self) -> Self {
        Self::new(self.index + 1, self.dt_s)
    }
}
