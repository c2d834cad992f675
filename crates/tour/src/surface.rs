//! Where captions are rendered.
//!
//! A caption surface owns the caption container. Characters can only be split
//! out of it after the text has been attached; splitting an unattached
//! container yields nothing.

/// One animatable character of an attached caption.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Glyph {
    /// Position among the caption's glyphs, left to right.
    pub index: usize,
    pub ch: char,
}

pub trait CaptionSurface {
    /// Attaches (or replaces) the caption container's text.
    fn attach(&mut self, text: &str);

    fn detach(&mut self);

    /// Per-character elements of the attached container, in reading order.
    ///
    /// `None` when no container is attached.
    fn split_chars(&self) -> Option<Vec<Glyph>>;
}

/// In-memory caption container. Whitespace separates words and is not split
/// into glyphs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextSurface {
    attached: Option<String>,
}

impl TextSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attached(&self) -> Option<&str> {
        self.attached.as_deref()
    }
}

impl CaptionSurface for TextSurface {
    fn attach(&mut self, text: &str) {
        self.attached = Some(text.to_owned());
    }

    fn detach(&mut self) {
        self.attached = None;
    }

    fn split_chars(&self) -> Option<Vec<Glyph>> {
        let text = self.attached.as_deref()?;
        Some(
            text.chars()
                .filter(|c| !c.is_whitespace())
                .enumerate()
                .map(|(index, ch)| Glyph { index, ch })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{CaptionSurface, Glyph, TextSurface};
    use pretty_assertions::assert_eq;

    #[test]
    fn unattached_container_has_nothing_to_split() {
        assert_eq!(TextSurface::new().split_chars(), None);
    }

    #[test]
    fn splits_non_whitespace_in_order() {
        let mut s = TextSurface::new();
        s.attach("La Ré");
        let glyphs = s.split_chars().unwrap();
        assert_eq!(
            glyphs,
            vec![
                Glyph { index: 0, ch: 'L' },
                Glyph { index: 1, ch: 'a' },
                Glyph { index: 2, ch: 'R' },
                Glyph { index: 3, ch: 'é' },
            ]
        );
    }

    #[test]
    fn detach_clears_container() {
        let mut s = TextSurface::new();
        s.attach("Nice");
        s.detach();
        assert_eq!(s.attached(), None);
        assert_eq!(s.split_chars(), None);
    }
}
