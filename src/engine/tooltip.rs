/// An axis-aligned rectangle in terminal cells. Signed so that positions
/// computed above or left of the page origin survive until they are clamped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Bounds {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub const fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.top + self.height
    }

    pub fn center_x(&self) -> i32 {
        self.left + self.width / 2
    }

    pub fn center_y(&self) -> i32 {
        self.top + self.height / 2
    }

    /// Zero-size bounds mean the target is not laid out yet.
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn translate(&self, dx: i32, dy: i32) -> Self {
        Self {
            left: self.left + dx,
            top: self.top + dy,
            ..*self
        }
    }
}

/// The visible window onto the page, with the page scroll position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Viewport {
    pub width: i32,
    pub height: i32,
    pub scroll_x: i32,
    pub scroll_y: i32,
}

impl Viewport {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            scroll_x: 0,
            scroll_y: 0,
        }
    }

    pub fn scrolled(self, scroll_x: i32, scroll_y: i32) -> Self {
        Self {
            scroll_x,
            scroll_y,
            ..self
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TooltipSize {
    pub width: i32,
    pub height: i32,
    pub margin: i32,
}

impl Default for TooltipSize {
    fn default() -> Self {
        Self {
            width: 46,
            height: 9,
            margin: 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArrowEdge {
    /// Tooltip sits below the target; the arrow points up from its top edge.
    Top,
    /// Tooltip sits above the target; the arrow points down from its bottom edge.
    Bottom,
}

/// Where to draw the tooltip, in page coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TooltipPlacement {
    pub tooltip: Bounds,
    /// The target converted to page coordinates.
    pub target: Bounds,
    pub arrow_edge: ArrowEdge,
    /// Column of the arrow relative to the tooltip's left edge. `None` means
    /// centered; it is only set when the horizontal clamp moved the tooltip.
    pub arrow_offset: Option<i32>,
}

impl TooltipPlacement {
    pub fn arrow_column(&self) -> i32 {
        self.arrow_offset.unwrap_or(self.tooltip.width / 2)
    }
}

/// Place a tooltip next to `target`, given in viewport coordinates.
///
/// Preferred spot is below the target, horizontally centered. Corrections run
/// in order: horizontal clamp (arrow follows the target center), flip above
/// when the bottom would overflow, then a final vertical clamp.
pub fn place_tooltip(target: Bounds, viewport: Viewport, size: TooltipSize) -> TooltipPlacement {
    let target = target.translate(viewport.scroll_x, viewport.scroll_y);
    let margin = size.margin;

    let mut top = target.bottom() + margin;
    let mut left = target.center_x() - size.width / 2;
    let mut arrow_edge = ArrowEdge::Top;
    let mut arrow_offset = None;

    let min_left = viewport.scroll_x + margin;
    let max_left = viewport.scroll_x + viewport.width - size.width - margin;
    if left < min_left {
        left = min_left;
        arrow_offset = Some(target.center_x() - left);
    } else if left > max_left {
        left = max_left;
        arrow_offset = Some(target.center_x() - left);
    }

    let max_top = viewport.scroll_y + viewport.height - size.height - margin;
    if top > max_top {
        top = target.top - size.height - margin;
        arrow_edge = ArrowEdge::Bottom;
    }

    let min_top = viewport.scroll_y + margin;
    top = top.min(max_top).max(min_top);

    TooltipPlacement {
        tooltip: Bounds::new(left, top, size.width, size.height),
        target,
        arrow_edge,
        arrow_offset,
    }
}

/// Stand-in target used when the real one never resolves: a small box in
/// the middle of the viewport, in viewport coordinates.
pub fn fallback_target(viewport: Viewport) -> Bounds {
    const WIDTH: i32 = 24;
    const HEIGHT: i32 = 3;
    Bounds::new(
        (viewport.width - WIDTH) / 2,
        (viewport.height - HEIGHT) / 2,
        WIDTH,
        HEIGHT,
    )
}
