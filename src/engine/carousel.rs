/// Keeps a continuous horizontal scroll offset and a discrete card index in
/// sync over `len` equally wide cards.
///
/// Only [`Carousel::on_scroll`] writes the index. Next/previous compute a
/// target offset, the host scrolls there, and the resulting scroll events
/// land back here.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Carousel {
    len: usize,
    index: usize,
    offset: f64,
    translation_shown: bool,
}

impl Carousel {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn translation_shown(&self) -> bool {
        self.translation_shown
    }

    pub fn flip(&mut self) {
        if !self.is_empty() {
            self.translation_shown = !self.translation_shown;
        }
    }

    /// Offset at which card `index` is centered in a one-card viewport.
    pub fn offset_for(index: usize, card_width: f64) -> f64 {
        index as f64 * card_width
    }

    pub fn next_index(&self) -> Option<usize> {
        (self.len > 0).then(|| (self.index + 1) % self.len)
    }

    pub fn prev_index(&self) -> Option<usize> {
        (self.len > 0).then(|| (self.index + self.len - 1) % self.len)
    }

    /// Handle a scroll event. Returns true when the visible card changed,
    /// in which case the card is shown word side up again.
    pub fn on_scroll(&mut self, offset: f64, scroll_width: f64) -> bool {
        if self.len == 0 || !offset.is_finite() {
            return false;
        }
        let card_width = scroll_width / self.len as f64;
        if card_width <= 0.0 || !card_width.is_finite() {
            return false;
        }
        self.offset = offset;
        let raw = (offset / card_width).round();
        let index = raw.clamp(0.0, (self.len - 1) as f64) as usize;
        if index == self.index {
            return false;
        }
        self.index = index;
        self.translation_shown = false;
        true
    }
}
