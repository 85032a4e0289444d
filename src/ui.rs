//! Drawing surface shared by every widget.
//!
//! Widgets paint through the `Canvas` trait using the device's primitive set:
//! filled and outlined rectangles, a text cursor, a foreground/background
//! pair, and text runs that advance the cursor. `Screen` is the persistent
//! implementation. It keeps a ratatui `Buffer` that survives between input
//! events, so a widget only repaints what it changed, exactly like a
//! framebuffer-backed display. Output drivers copy the buffer to the real
//! terminal before blocking on the next key.
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;

use crate::window::Metrics;

pub trait Canvas {
    /// Drawable size in canvas units.
    fn size(&self) -> (u16, u16);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn draw_rect(&mut self, rect: Rect, color: Color);

    fn set_cursor(&mut self, x: u16, y: u16);

    fn set_text_color(&mut self, fg: Color, bg: Color);

    /// Write a run of text at the cursor, advancing it one glyph per char.
    fn write_text(&mut self, text: &str);

    fn fill_screen(&mut self) {
        let (w, h) = self.size();
        self.fill_rect(Rect::new(0, 0, w, h), Color::Black);
    }
}

/// Framebuffer-like canvas backed by a ratatui `Buffer`.
///
/// Canvas units are converted to cells through the glyph size in `Metrics`,
/// so both the device geometry and the one-unit-per-cell terminal geometry
/// can be displayed.
#[derive(Debug, Clone)]
pub struct Screen {
    buffer: Buffer,
    metrics: Metrics,
    cursor: (u16, u16),
    fg: Color,
    bg: Color,
}

impl Screen {
    pub fn new(cols: u16, rows: u16, metrics: Metrics) -> Self {
        Self {
            buffer: Buffer::empty(Rect::new(0, 0, cols, rows)),
            metrics,
            cursor: (0, 0),
            fg: Color::White,
            bg: Color::Black,
        }
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn metrics(&self) -> Metrics {
        self.metrics
    }

    /// The whole screen in canvas units.
    pub fn bounds(&self) -> Rect {
        let (w, h) = self.size();
        Rect::new(0, 0, w, h)
    }

    pub fn cursor(&self) -> (u16, u16) {
        self.cursor
    }

    fn cell_x(&self, x: u16) -> u16 {
        x / self.metrics.cwidth.max(1)
    }

    fn cell_y(&self, y: u16) -> u16 {
        y / self.metrics.leading.max(1)
    }

    /// Convert a unit rectangle to the cells it touches, clipped to the buffer.
    fn cells(&self, rect: Rect) -> Option<Rect> {
        if rect.width == 0 || rect.height == 0 {
            return None;
        }
        let x0 = self.cell_x(rect.x);
        let y0 = self.cell_y(rect.y);
        let x1 = self.cell_x(rect.x.saturating_add(rect.width - 1));
        let y1 = self.cell_y(rect.y.saturating_add(rect.height - 1));
        let cells = Rect::new(x0, y0, x1 - x0 + 1, y1 - y0 + 1).intersection(self.buffer.area);
        if cells.width == 0 || cells.height == 0 {
            None
        } else {
            Some(cells)
        }
    }

    /// Text of one cell row, for inspection.
    pub fn row_text(&self, row: u16) -> String {
        let area = self.buffer.area;
        if row >= area.height {
            return String::new();
        }
        (0..area.width)
            .filter_map(|x| self.buffer.cell((x, row)).map(|c| c.symbol().to_string()))
            .collect()
    }

    /// Background color of the cell under a unit coordinate.
    pub fn bg_at(&self, x: u16, y: u16) -> Option<Color> {
        self.buffer
            .cell((self.cell_x(x), self.cell_y(y)))
            .map(|cell| cell.bg)
    }
}

impl Canvas for Screen {
    fn size(&self) -> (u16, u16) {
        let area = self.buffer.area;
        (
            area.width.saturating_mul(self.metrics.cwidth.max(1)),
            area.height.saturating_mul(self.metrics.leading.max(1)),
        )
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let Some(cells) = self.cells(rect) else {
            return;
        };
        for y in cells.top()..cells.bottom() {
            for x in cells.left()..cells.right() {
                if let Some(cell) = self.buffer.cell_mut((x, y)) {
                    cell.set_char(' ');
                    cell.set_bg(color);
                }
            }
        }
    }

    fn draw_rect(&mut self, rect: Rect, color: Color) {
        let Some(cells) = self.cells(rect) else {
            return;
        };
        let (left, top) = (cells.left(), cells.top());
        let right = cells.right().saturating_sub(1);
        let bottom = cells.bottom().saturating_sub(1);
        for y in top..=bottom {
            for x in left..=right {
                let edge_x = x == left || x == right;
                let edge_y = y == top || y == bottom;
                let glyph = match (edge_x, edge_y) {
                    (false, false) => continue,
                    (true, true) if top == bottom => '─',
                    (true, true) if left == right => '│',
                    (true, true) => match (x == left, y == top) {
                        (true, true) => '┌',
                        (false, true) => '┐',
                        (true, false) => '└',
                        (false, false) => '┘',
                    },
                    (false, true) => '─',
                    (true, false) => '│',
                };
                if let Some(cell) = self.buffer.cell_mut((x, y)) {
                    cell.set_char(glyph);
                    cell.set_fg(color);
                }
            }
        }
    }

    fn set_cursor(&mut self, x: u16, y: u16) {
        self.cursor = (x, y);
    }

    fn set_text_color(&mut self, fg: Color, bg: Color) {
        self.fg = fg;
        self.bg = bg;
    }

    fn write_text(&mut self, text: &str) {
        let step = self.metrics.cwidth.max(1);
        for ch in text.chars() {
            let (x, y) = self.cursor;
            let pos = (self.cell_x(x), self.cell_y(y));
            let (fg, bg) = (self.fg, self.bg);
            if let Some(cell) = self.buffer.cell_mut(pos) {
                cell.set_char(if ch.is_control() { ' ' } else { ch });
                cell.set_fg(fg);
                cell.set_bg(bg);
            }
            self.cursor.0 = x.saturating_add(step);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_text_advances_cursor_and_clips() {
        let mut screen = Screen::new(5, 2, Metrics::TERMINAL);
        screen.set_cursor(3, 1);
        screen.set_text_color(Color::White, Color::Red);
        screen.write_text("abcd");
        assert_eq!(screen.row_text(1), "   ab");
        assert_eq!(screen.cursor(), (7, 1));
        assert_eq!(screen.bg_at(3, 1), Some(Color::Red));
    }

    #[test]
    fn device_units_map_onto_cells() {
        let mut screen = Screen::new(10, 4, Metrics::DEVICE);
        assert_eq!(screen.size(), (60, 40));
        screen.set_cursor(12, 20);
        screen.write_text("hi");
        assert_eq!(screen.row_text(2), "  hi      ");
    }

    #[test]
    fn draw_rect_outlines_cells() {
        let mut screen = Screen::new(4, 3, Metrics::TERMINAL);
        screen.draw_rect(Rect::new(0, 0, 4, 3), Color::Gray);
        assert_eq!(screen.row_text(0), "┌──┐");
        assert_eq!(screen.row_text(1), "│  │");
        assert_eq!(screen.row_text(2), "└──┘");
    }

    #[test]
    fn fill_rect_outside_buffer_is_ignored() {
        let mut screen = Screen::new(4, 3, Metrics::TERMINAL);
        screen.fill_rect(Rect::new(10, 10, 4, 4), Color::Blue);
        screen.fill_rect(Rect::new(0, 0, 0, 4), Color::Blue);
        assert_eq!(screen.bg_at(0, 0), Some(Color::Reset));
    }
}
