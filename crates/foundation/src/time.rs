use core::cmp::Ordering;

/// Time primitives
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Time(pub f64); // seconds

impl Time {
    pub const ZERO: Time = Time(0.0);

    pub fn from_secs(secs: f64) -> Self {
        Time(secs)
    }

    pub fn secs(self) -> f64 {
        self.0
    }

    /// The instant `delay_s` seconds after `self`.
    pub fn after(self, delay_s: f64) -> Self {
        Time(self.0 + delay_s)
    }

    /// Seconds elapsed since `earlier`, never negative.
    pub fn since(self, earlier: Time) -> f64 {
        (self.0 - earlier.0).max(0.0)
    }

    pub fn is_at_or_after(self, other: Time) -> bool {
        self.total_cmp(&other) != Ordering::Less
    }

    /// Deterministic total ordering; `-0.0` and `0.0` compare equal.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        canonical(self.0).total_cmp(&canonical(other.0))
    }
}

fn canonical(v: f64) -> f64 {
    if v == 0.0 {
        0.0
    } else if v.is_nan() {
        f64::NAN
    } else {
        v
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TimeSpan {
    pub start: Time,
    pub end: Time,
}

impl TimeSpan {
    pub fn new(start: Time, duration_s: f64) -> Self {
        Self {
            start,
            end: start.after(duration_s.max(0.0)),
        }
    }

    pub fn instant(t: Time) -> Self {
        Self { start: t, end: t }
    }

    pub fn duration(&self) -> f64 {
        (self.end.0 - self.start.0).max(0.0)
    }

    /// Normalized position of `t` within the span, clamped to `[0, 1]`.
    ///
    /// Zero-length spans jump straight from 0 to 1 at `start`.
    pub fn progress(&self, t: Time) -> f64 {
        let d = self.duration();
        if d <= 0.0 {
            return if t.is_at_or_after(self.start) { 1.0 } else { 0.0 };
        }
        ((t.0 - self.start.0) / d).clamp(0.0, 1.0)
    }

    pub fn contains(&self, t: Time) -> bool {
        t.is_at_or_after(self.start) && !t.is_at_or_after(self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::{Time, TimeSpan};
    use core::cmp::Ordering;

    #[test]
    fn after_and_since_are_inverse() {
        let t = Time(1.5).after(2.0);
        assert_eq!(t, Time(3.5));
        assert_eq!(t.since(Time(1.5)), 2.0);
        assert_eq!(Time(1.0).since(Time(4.0)), 0.0);
    }

    #[test]
    fn total_cmp_treats_signed_zero_as_equal() {
        assert_eq!(Time(-0.0).total_cmp(&Time(0.0)), Ordering::Equal);
        assert!(Time(3.0).is_at_or_after(Time(3.0)));
        assert!(!Time(2.999).is_at_or_after(Time(3.0)));
    }

    #[test]
    fn span_progress_clamps() {
        let span = TimeSpan::new(Time(1.0), 2.0);
        assert_eq!(span.progress(Time(0.0)), 0.0);
        assert_eq!(span.progress(Time(2.0)), 0.5);
        assert_eq!(span.progress(Time(10.0)), 1.0);
        assert!(span.contains(Time(1.0)));
        assert!(!span.contains(Time(3.0)));
    }

    #[test]
    fn zero_length_span_is_a_step() {
        let span = TimeSpan::instant(Time(2.0));
        assert_eq!(span.duration(), 0.0);
        assert_eq!(span.progress(Time(1.0)), 0.0);
        assert_eq!(span.progress(Time(2.0)), 1.0);
    }
}
