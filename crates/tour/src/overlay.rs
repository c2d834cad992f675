//! Caption overlay: fades a waypoint caption in, holds it for the dwell, fades
//! it out.
//!
//! Timeline for `show_caption(text, dwell, t0)`:
//! - `t0`: overlay visible with `text`; render pending.
//! - first `tick` after `t0` (render sync): text attached to the surface,
//!   container fades in and glyphs rise one after another.
//! - `t0 + dwell`: container fades out from whatever opacity it has reached.
//! - `t0 + dwell + FADE_OUT_S`: overlay hidden.
//!
//! A newer caption supersedes an older one completely: the older caption's
//! timers are cancelled and, should one slip through, its generation no longer
//! matches and it is ignored.

use foundation::time::Time;
use runtime::timers::TimerQueue;
use runtime::tween::{Ease, Tween};
use tracing::{debug, warn};

use crate::surface::{CaptionSurface, Glyph, TextSurface};

pub const FADE_IN_S: f64 = 1.0;
pub const FADE_OUT_S: f64 = 1.0;
/// How long each glyph takes to rise into place.
pub const GLYPH_RISE_S: f64 = 1.0;
/// Delay between consecutive glyphs starting to rise.
pub const GLYPH_STAGGER_S: f64 = 0.01;
/// Vertical offset a glyph rises from.
pub const GLYPH_OFFSET_Y: f64 = 10.0;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlayState {
    pub visible: bool,
    pub current_text: String,
}

/// A glyph as it should be drawn at a given instant.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GlyphFrame {
    pub ch: char,
    pub offset_y: f64,
    pub opacity: f64,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum OverlayTimer {
    FadeOut { generation: u64 },
    Hide { generation: u64 },
}

#[derive(Debug, Clone)]
struct GlyphAnim {
    ch: char,
    offset_y: Tween,
    opacity: Tween,
}

impl GlyphAnim {
    fn rise(glyph: Glyph, render_at: Time) -> Self {
        let start = render_at.after(glyph.index as f64 * GLYPH_STAGGER_S);
        Self {
            ch: glyph.ch,
            offset_y: Tween::new(GLYPH_OFFSET_Y, 0.0, start, GLYPH_RISE_S, Ease::Power4Out),
            opacity: Tween::new(0.0, 1.0, start, GLYPH_RISE_S, Ease::Power4Out),
        }
    }
}

#[derive(Debug)]
pub struct TextOverlayController<S: CaptionSurface = TextSurface> {
    state: OverlayState,
    surface: S,
    timers: TimerQueue<OverlayTimer>,
    generation: u64,
    render_pending: bool,
    opacity: Tween,
    glyphs: Vec<GlyphAnim>,
}

impl Default for TextOverlayController<TextSurface> {
    fn default() -> Self {
        Self::new()
    }
}

impl TextOverlayController<TextSurface> {
    pub fn new() -> Self {
        Self::with_surface(TextSurface::new())
    }
}

impl<S: CaptionSurface> TextOverlayController<S> {
    pub fn with_surface(surface: S) -> Self {
        Self {
            state: OverlayState::default(),
            surface,
            timers: TimerQueue::new(),
            generation: 0,
            render_pending: false,
            opacity: Tween::hold(0.0, Time::ZERO),
            glyphs: Vec::new(),
        }
    }

    /// Shows `text` for `dwell_s` seconds measured from `now`.
    ///
    /// Empty text is a no-op. Returns whether a caption was shown.
    pub fn show_caption(&mut self, text: &str, dwell_s: f64, now: Time) -> bool {
        if text.is_empty() {
            debug!("empty caption, nothing to show");
            return false;
        }
        let dwell_s = if dwell_s.is_finite() && dwell_s >= 0.0 {
            dwell_s
        } else {
            warn!(dwell_s, "invalid caption dwell, using 0");
            0.0
        };

        let released = self.timers.cancel_all();
        if released > 0 {
            debug!(released, "superseded previous caption timers");
        }
        self.generation = self.generation.wrapping_add(1);
        self.state.visible = true;
        self.state.current_text.clear();
        self.state.current_text.push_str(text);
        self.render_pending = true;
        self.opacity = Tween::hold(0.0, now);
        self.glyphs.clear();
        self.timers.schedule(
            now,
            dwell_s,
            OverlayTimer::FadeOut {
                generation: self.generation,
            },
        );
        true
    }

    /// Advances the overlay to `now`: performs a pending render, then fires due timers.
    ///
    /// Fade-out and hide keep to their scheduled instants however coarse the ticks are.
    pub fn tick(&mut self, now: Time) {
        if self.render_pending {
            self.render(now);
        }

        while let Some((_, due, timer)) = self.timers.pop_due(now) {
            match timer {
                OverlayTimer::FadeOut { generation } if generation == self.generation => {
                    let from = self.opacity.sample(due);
                    self.opacity = Tween::new(from, 0.0, due, FADE_OUT_S, Ease::Power4Out);
                    self.timers
                        .schedule(due, FADE_OUT_S, OverlayTimer::Hide { generation });
                }
                OverlayTimer::Hide { generation } if generation == self.generation => {
                    self.state.visible = false;
                    self.glyphs.clear();
                    self.surface.detach();
                }
                stale => debug!(?stale, current = self.generation, "stale caption timer ignored"),
            }
        }
    }

    /// Drops the caption immediately and releases every pending timer.
    pub fn cancel(&mut self) {
        let released = self.timers.cancel_all();
        if released > 0 {
            debug!(released, "caption timers cancelled");
        }
        self.generation = self.generation.wrapping_add(1);
        self.render_pending = false;
        self.state.visible = false;
        self.opacity = Tween::hold(0.0, Time::ZERO);
        self.glyphs.clear();
        self.surface.detach();
    }

    fn render(&mut self, now: Time) {
        self.render_pending = false;
        self.surface.attach(&self.state.current_text);
        self.opacity = Tween::new(0.0, 1.0, now, FADE_IN_S, Ease::Power4Out);

        match self.surface.split_chars() {
            Some(glyphs) => {
                self.glyphs = glyphs.into_iter().map(|g| GlyphAnim::rise(g, now)).collect();
            }
            None => {
                debug!(text = %self.state.current_text, "caption container not attached, skipping glyph animation");
                self.glyphs.clear();
            }
        }
    }

    pub fn state(&self) -> &OverlayState {
        &self.state
    }

    pub fn is_visible(&self) -> bool {
        self.state.visible
    }

    pub fn is_render_pending(&self) -> bool {
        self.render_pending
    }

    /// Container opacity at `now`; zero whenever the overlay is hidden.
    pub fn opacity(&self, now: Time) -> f64 {
        if self.state.visible {
            self.opacity.sample(now)
        } else {
            0.0
        }
    }

    pub fn glyphs(&self, now: Time) -> Vec<GlyphFrame> {
        self.glyphs
            .iter()
            .map(|g| GlyphFrame {
                ch: g.ch,
                offset_y: g.offset_y.sample(now),
                opacity: g.opacity.sample(now),
            })
            .collect()
    }

    pub fn has_pending_timers(&self) -> bool {
        !self.timers.is_empty()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::{FADE_OUT_S, GLYPH_OFFSET_Y, GLYPH_STAGGER_S, TextOverlayController};
    use crate::surface::{CaptionSurface, Glyph};
    use foundation::time::Time;
    use pretty_assertions::assert_eq;

    /// A surface whose container never mounts.
    #[derive(Debug, Default)]
    struct DetachedSurface;

    impl CaptionSurface for DetachedSurface {
        fn attach(&mut self, _text: &str) {}
        fn detach(&mut self) {}
        fn split_chars(&self) -> Option<Vec<Glyph>> {
            None
        }
    }

    #[test]
    fn empty_caption_is_a_no_op() {
        let mut overlay = TextOverlayController::new();
        assert!(!overlay.show_caption("", 2.0, Time(0.0)));
        overlay.tick(Time(0.5));

        assert!(!overlay.is_visible());
        assert!(overlay.glyphs(Time(0.5)).is_empty());
        assert!(!overlay.has_pending_timers());
        assert_eq!(overlay.surface().attached(), None);
    }

    #[test]
    fn glyphs_wait_for_render_sync() {
        let mut overlay = TextOverlayController::new();
        overlay.show_caption("Nice", 3.0, Time(0.0));

        assert!(overlay.is_visible());
        assert!(overlay.is_render_pending());
        assert!(overlay.glyphs(Time(0.0)).is_empty());

        overlay.tick(Time(0.0));
        assert!(!overlay.is_render_pending());
        assert_eq!(overlay.surface().attached(), Some("Nice"));
        let glyphs = overlay.glyphs(Time(0.0));
        assert_eq!(glyphs.iter().map(|g| g.ch).collect::<String>(), "Nice");
        assert!(glyphs.iter().all(|g| g.offset_y == GLYPH_OFFSET_Y && g.opacity == 0.0));
    }

    #[test]
    fn glyphs_are_staggered_left_to_right() {
        let mut overlay = TextOverlayController::new();
        overlay.show_caption("Paris", 3.0, Time(0.0));
        overlay.tick(Time(0.0));

        let early = Time(2.0 * GLYPH_STAGGER_S);
        let glyphs = overlay.glyphs(early);
        for pair in glyphs.windows(2) {
            assert!(pair[0].opacity >= pair[1].opacity);
        }
        assert!(glyphs[0].opacity > 0.0);
        assert_eq!(glyphs[4].opacity, 0.0);

        let settled = overlay.glyphs(Time(2.0));
        assert!(settled.iter().all(|g| g.offset_y == 0.0 && g.opacity == 1.0));
    }

    #[test]
    fn fades_in_then_out_then_hides() {
        let mut overlay = TextOverlayController::new();
        overlay.show_caption("Bastia", 2.0, Time(0.0));

        overlay.tick(Time(0.0));
        assert_eq!(overlay.opacity(Time(0.0)), 0.0);
        overlay.tick(Time(1.0));
        assert_eq!(overlay.opacity(Time(1.0)), 1.0);

        // Dwell is measured from the call, not from the end of the fade-in.
        overlay.tick(Time(2.0));
        assert!(overlay.is_visible());
        assert_eq!(overlay.opacity(Time(2.0)), 1.0);
        assert!(overlay.opacity(Time(2.5)) < 1.0);

        overlay.tick(Time(2.0 + FADE_OUT_S));
        assert!(!overlay.is_visible());
        assert_eq!(overlay.opacity(Time(3.0)), 0.0);
        assert!(!overlay.has_pending_timers());
        assert_eq!(overlay.surface().attached(), None);
        // Text is left in place; only visibility changes.
        assert_eq!(overlay.state().current_text, "Bastia");
    }

    #[test]
    fn late_tick_keeps_fade_out_on_schedule() {
        let mut overlay = TextOverlayController::new();
        overlay.show_caption("Perpignan", 2.0, Time(0.0));
        overlay.tick(Time(0.0));

        // The fade-out began at 2.0 even though nothing ticked until 2.5.
        overlay.tick(Time(2.5));
        assert!(overlay.is_visible());
        assert!(overlay.opacity(Time(2.5)) < 1.0);

        overlay.tick(Time(2.0 + FADE_OUT_S));
        assert!(!overlay.is_visible());
    }

    #[test]
    fn one_coarse_tick_runs_fade_out_and_hide() {
        let mut overlay = TextOverlayController::new();
        overlay.show_caption("Perpignan", 2.0, Time(0.0));
        overlay.tick(Time(0.0));

        overlay.tick(Time(5.0));
        assert!(!overlay.is_visible());
        assert!(!overlay.has_pending_timers());
        assert_eq!(overlay.surface().attached(), None);
    }

    #[test]
    fn newer_caption_is_not_cleared_by_older_timers() {
        let mut overlay = TextOverlayController::new();
        overlay.show_caption("Marseille", 1.0, Time(0.0));
        overlay.tick(Time(0.0));
        overlay.tick(Time(1.0)); // first caption starts fading out, hide due at 2.0

        overlay.show_caption("Bastia", 3.0, Time(1.5));
        for t in [1.5, 2.0, 2.5, 3.0] {
            overlay.tick(Time(t));
            assert!(overlay.is_visible(), "hidden at {t}");
            assert_eq!(overlay.state().current_text, "Bastia");
        }

        overlay.tick(Time(4.5));
        overlay.tick(Time(5.5));
        assert!(!overlay.is_visible());
    }

    #[test]
    fn back_to_back_captions_keep_the_latest_text() {
        let mut overlay = TextOverlayController::new();
        overlay.show_caption("Olympia", 0.5, Time(0.0));
        overlay.show_caption("Marseille", 2.0, Time(0.0));

        overlay.tick(Time(0.0));
        overlay.tick(Time(1.0));
        assert!(overlay.is_visible());
        assert_eq!(overlay.state().current_text, "Marseille");
        assert_eq!(overlay.surface().attached(), Some("Marseille"));
    }

    #[test]
    fn missing_container_still_fades_without_glyphs() {
        let mut overlay = TextOverlayController::with_surface(DetachedSurface);
        overlay.show_caption("Nice", 1.0, Time(0.0));
        overlay.tick(Time(0.0));

        assert!(overlay.is_visible());
        assert!(overlay.glyphs(Time(0.5)).is_empty());
        assert!(overlay.opacity(Time(0.5)) > 0.0);
    }

    #[test]
    fn cancel_hides_and_releases_timers() {
        let mut overlay = TextOverlayController::new();
        overlay.show_caption("Nice", 5.0, Time(0.0));
        overlay.cancel();

        assert!(!overlay.is_visible());
        assert!(!overlay.has_pending_timers());
        overlay.tick(Time(10.0));
        assert!(!overlay.is_visible());
        assert_eq!(overlay.surface().attached(), None);
    }

    #[test]
    fn negative_dwell_fades_out_immediately() {
        let mut overlay = TextOverlayController::new();
        overlay.show_caption("Nice", -3.0, Time(1.0));
        overlay.tick(Time(1.0));
        assert!(overlay.is_visible());
        overlay.tick(Time(2.0));
        assert!(!overlay.is_visible());
    }
}
