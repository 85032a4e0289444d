//! Two-way window splits.
//!
//! Splits assign the leading `ratio` of an area to the first window and the
//! remainder to the second. The area is either a container's interior or the
//! whole screen; callers pass it explicitly.

use ratatui::prelude::{Direction, Rect};

use crate::window::Window;

pub const DEFAULT_RATIO: f32 = 0.5;

/// The region a split divides.
#[derive(Debug, Clone, Copy)]
pub enum SplitArea<'a> {
    Screen(Rect),
    Container(&'a Window),
}

impl SplitArea<'_> {
    fn rect(&self) -> Rect {
        match self {
            SplitArea::Screen(rect) => *rect,
            SplitArea::Container(win) => win.interior(),
        }
    }
}

fn clamp_ratio(ratio: f32) -> f32 {
    if ratio.is_nan() {
        return DEFAULT_RATIO;
    }
    ratio.clamp(0.01, 0.99)
}

fn portion(extent: u16, ratio: f32) -> u16 {
    (extent as f32 * ratio).round() as u16
}

/// Place `a` left of `b`.
pub fn split_v(a: &mut Window, b: &mut Window, ratio: f32, area: SplitArea<'_>) {
    split(a, b, ratio, area.rect(), Direction::Horizontal);
}

/// Place `a` above `b`.
pub fn split_h(a: &mut Window, b: &mut Window, ratio: f32, area: SplitArea<'_>) {
    split(a, b, ratio, area.rect(), Direction::Vertical);
}

fn split(a: &mut Window, b: &mut Window, ratio: f32, rect: Rect, direction: Direction) {
    let ratio = clamp_ratio(ratio);
    match direction {
        Direction::Horizontal => {
            let lead = portion(rect.width, ratio);
            a.set_pos(rect.x, rect.y);
            a.set_size(lead, rect.height);
            b.set_pos(rect.x.saturating_add(lead), rect.y);
            b.set_size(portion(rect.width, 1.0 - ratio), rect.height);
        }
        Direction::Vertical => {
            let lead = portion(rect.height, ratio);
            a.set_pos(rect.x, rect.y);
            a.set_size(rect.width, lead);
            b.set_pos(rect.x, rect.y.saturating_add(lead));
            b.set_size(rect.width, portion(rect.height, 1.0 - ratio));
        }
    }
}
