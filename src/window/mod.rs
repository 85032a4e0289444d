use ratatui::prelude::Rect;

use crate::theme;
use crate::ui::Canvas;

/// Glyph and chrome geometry shared by every window on a screen.
///
/// All window coordinates are expressed in canvas units. On the device a unit
/// is one pixel; on a terminal a unit is one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metrics {
    /// Width of one character.
    pub cwidth: u16,
    /// Height of one text line.
    pub leading: u16,
    /// Border inset applied on every side of the interior.
    pub inset: u16,
    /// Padding above the title text inside the title band.
    pub title_pad: u16,
}

impl Metrics {
    /// The 320x240 device display with a 6x10 font.
    pub const DEVICE: Metrics = Metrics {
        cwidth: 6,
        leading: 10,
        inset: 2,
        title_pad: 3,
    };

    /// One unit per terminal cell.
    pub const TERMINAL: Metrics = Metrics {
        cwidth: 1,
        leading: 1,
        inset: 1,
        title_pad: 0,
    };

    /// Height of the title band below the top border.
    pub const fn chrome(&self) -> u16 {
        self.title_pad + self.leading
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::TERMINAL
    }
}

/// A rectangular screen region with an optional title bar.
///
/// The interior is always derived from the outer rectangle and the title, so
/// moving or resizing a window never leaves stale interior bounds behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    area: Rect,
    title: Option<String>,
    metrics: Metrics,
}

impl Window {
    pub fn new(metrics: Metrics, area: Rect, title: Option<&str>) -> Self {
        Self {
            area,
            title: title.map(str::to_string),
            metrics,
        }
    }

    pub fn untitled(metrics: Metrics, area: Rect) -> Self {
        Self::new(metrics, area, None)
    }

    pub fn x(&self) -> u16 {
        self.area.x
    }

    pub fn y(&self) -> u16 {
        self.area.y
    }

    pub fn w(&self) -> u16 {
        self.area.width
    }

    pub fn h(&self) -> u16 {
        self.area.height
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn metrics(&self) -> Metrics {
        self.metrics
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn clear_title(&mut self) {
        self.title = None;
    }

    pub fn set_pos(&mut self, x: u16, y: u16) {
        self.area.x = x;
        self.area.y = y;
    }

    pub fn set_size(&mut self, w: u16, h: u16) {
        self.area.width = w;
        self.area.height = h;
    }

    fn title_chrome(&self) -> u16 {
        if self.title.is_some() {
            self.metrics.chrome()
        } else {
            0
        }
    }

    pub fn in_x(&self) -> u16 {
        self.area.x.saturating_add(self.metrics.inset)
    }

    pub fn in_y(&self) -> u16 {
        self.area
            .y
            .saturating_add(self.metrics.inset)
            .saturating_add(self.title_chrome())
    }

    pub fn in_w(&self) -> u16 {
        self.area.width.saturating_sub(self.metrics.inset * 2)
    }

    pub fn in_h(&self) -> u16 {
        self.area
            .height
            .saturating_sub(self.metrics.inset * 2)
            .saturating_sub(self.title_chrome())
    }

    pub fn interior(&self) -> Rect {
        Rect::new(self.in_x(), self.in_y(), self.in_w(), self.in_h())
    }

    /// Index of the last character column that fits on an interior row.
    pub fn tmax_x(&self) -> u16 {
        (self.in_w() / self.metrics.cwidth.max(1)).saturating_sub(1)
    }

    /// Number of text rows that fit in the interior.
    pub fn tmax_y(&self) -> u16 {
        self.in_h() / self.metrics.leading.max(1)
    }

    /// Fill the background, outline the border and draw the title band.
    pub fn draw_border(&self, canvas: &mut dyn Canvas) {
        canvas.fill_rect(self.area, theme::bg());
        canvas.draw_rect(self.area, theme::border());
        let Some(title) = self.title.as_deref() else {
            return;
        };
        let m = self.metrics;
        let band = Rect::new(
            self.in_x(),
            self.area.y.saturating_add(m.inset),
            self.in_w(),
            m.chrome(),
        );
        canvas.fill_rect(band, theme::header_bg());
        canvas.set_text_color(theme::header_fg(), theme::header_bg());
        canvas.set_cursor(
            self.in_x(),
            self.area
                .y
                .saturating_add(m.inset)
                .saturating_add(m.title_pad.saturating_sub(m.inset)),
        );
        let fit = (self.in_w() / m.cwidth.max(1)) as usize;
        let text: String = title.chars().take(fit).collect();
        canvas.write_text(&text);
    }

    /// Draw one interior row of text, clipped to the window width.
    pub fn draw_line(&self, canvas: &mut dyn Canvas, row: u16, text: &str, selected: bool) {
        let ypos = self
            .in_y()
            .saturating_add(row.saturating_mul(self.metrics.leading));
        let bg = if selected { theme::cursor_bg() } else { theme::bg() };
        let mut line = String::with_capacity(text.len() + 1);
        line.push_str(text);
        line.push(' ');
        let clipped: String = line.chars().take(self.tmax_x() as usize + 1).collect();
        canvas.set_cursor(self.in_x(), ypos);
        canvas.set_text_color(theme::code_fg(), bg);
        canvas.write_text(&clipped);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untitled_interior_is_inset_on_all_sides() {
        let win = Window::untitled(Metrics::DEVICE, Rect::new(10, 20, 100, 50));
        assert_eq!(win.in_x(), 12);
        assert_eq!(win.in_y(), 22);
        assert_eq!(win.in_w(), 96);
        assert_eq!(win.in_h(), 46);
    }

    #[test]
    fn title_shifts_interior_by_chrome_height() {
        let mut win = Window::untitled(Metrics::DEVICE, Rect::new(0, 0, 100, 100));
        win.set_title("Files");
        // 2 px inset + 3 px pad + one 10 px text line
        assert_eq!(win.in_y(), 15);
        assert_eq!(win.in_h(), 100 - 4 - 13);
        win.clear_title();
        assert_eq!(win.in_y(), 2);
    }

    #[test]
    fn interior_tracks_position_and_size() {
        let mut win = Window::new(Metrics::TERMINAL, Rect::new(0, 0, 10, 10), Some("t"));
        win.set_pos(5, 6);
        win.set_size(20, 8);
        assert_eq!(win.interior(), Rect::new(6, 8, 18, 5));
        assert_eq!(win.tmax_x(), 17);
        assert_eq!(win.tmax_y(), 5);
    }

    #[test]
    fn tiny_windows_saturate() {
        let win = Window::new(Metrics::DEVICE, Rect::new(0, 0, 3, 3), Some("x"));
        assert_eq!(win.in_w(), 0);
        assert_eq!(win.in_h(), 0);
        assert_eq!(win.tmax_x(), 0);
        assert_eq!(win.tmax_y(), 0);
    }
}
