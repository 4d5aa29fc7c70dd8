//! Dropdown geometry.
//!
//! Front ends call [`place_dropdown`] when a list is shown and again on every
//! window resize or scroll while it stays visible.

use serde::Serialize;

/// CSS max-height of a suggestion dropdown.
pub const DROPDOWN_MAX_HEIGHT: f64 = 400.0;
const GAP: f64 = 4.0;
const EDGE_MARGIN: f64 = 20.0;
const MIN_SPACE_ABOVE: f64 = 200.0;
const SCROLL_PAD: f64 = 5.0;

/// Client rectangle of an element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// Fixed-position coordinates for the dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub top: f64,
    pub left: f64,
    pub width: f64,
}

/// Positions the dropdown under `anchor`, flipping above it when it would
/// overflow the bottom edge and there is more room (and at least 200px)
/// above. Horizontally it stays 20px inside the viewport.
pub fn place_dropdown(anchor: Rect, viewport: Viewport) -> Placement {
    let width = anchor.width;
    let mut top = anchor.bottom() + GAP;

    if top + DROPDOWN_MAX_HEIGHT > viewport.height {
        let space_above = anchor.top;
        let space_below = viewport.height - anchor.bottom();
        if space_above > space_below && space_above > MIN_SPACE_ABOVE {
            top = anchor.top - DROPDOWN_MAX_HEIGHT.min(space_above) - GAP;
        }
    }

    let max_left = viewport.width - width - EDGE_MARGIN;
    let left = anchor.left.min(max_left).max(EDGE_MARGIN);

    Placement { top, left, width }
}

/// Scroll delta that brings `item` fully into `container`; 0 when visible.
pub fn scroll_adjustment(container: Rect, item: Rect) -> f64 {
    if item.bottom() > container.bottom() {
        item.bottom() - container.bottom() + SCROLL_PAD
    } else if item.top < container.top {
        -(container.top - item.top + SCROLL_PAD)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Viewport = Viewport {
        width: 1000.0,
        height: 800.0,
    };

    #[test]
    fn test_places_below_when_room() {
        let placement = place_dropdown(Rect::new(100.0, 50.0, 300.0, 40.0), VIEWPORT);
        assert_eq!(placement, Placement { top: 144.0, left: 50.0, width: 300.0 });
    }

    #[test]
    fn test_flips_above_near_bottom() {
        let placement = place_dropdown(Rect::new(700.0, 50.0, 300.0, 40.0), VIEWPORT);
        assert_eq!(placement.top, 700.0 - 400.0 - 4.0);
    }

    #[test]
    fn test_stays_below_when_little_room_above() {
        let small = Viewport { width: 1000.0, height: 300.0 };
        let placement = place_dropdown(Rect::new(150.0, 50.0, 300.0, 40.0), small);
        assert_eq!(placement.top, 194.0);
    }

    #[test]
    fn test_clamped_horizontally() {
        let right = place_dropdown(Rect::new(100.0, 900.0, 300.0, 40.0), VIEWPORT);
        assert_eq!(right.left, 680.0);

        let left = place_dropdown(Rect::new(100.0, 2.0, 300.0, 40.0), VIEWPORT);
        assert_eq!(left.left, 20.0);
    }

    #[test]
    fn test_scroll_adjustment() {
        let container = Rect::new(100.0, 0.0, 300.0, 200.0);
        assert_eq!(scroll_adjustment(container, Rect::new(150.0, 0.0, 300.0, 30.0)), 0.0);
        assert_eq!(scroll_adjustment(container, Rect::new(290.0, 0.0, 300.0, 30.0)), 25.0);
        assert_eq!(scroll_adjustment(container, Rect::new(90.0, 0.0, 300.0, 30.0)), -15.0);
    }
}
