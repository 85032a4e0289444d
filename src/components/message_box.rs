use ratatui::layout::Rect;

use crate::ui::Canvas;
use crate::window::{Metrics, Window};

/// A framed popup centered on the screen.
#[derive(Debug, Clone)]
pub struct MessageBox {
    outer: Window,
    inner: Window,
}

impl MessageBox {
    /// Size the popup for `rows` lines of text inside `bounds`.
    pub fn centered(bounds: Rect, metrics: Metrics, rows: usize) -> Self {
        let pad_x = metrics.cwidth;
        let pad_y = (metrics.leading / 2).max(1);
        let text_h = (rows as u16)
            .saturating_mul(metrics.leading)
            .saturating_add(metrics.inset * 2);
        let max_w = bounds.width.saturating_sub(pad_x * 2);
        let max_h = bounds.height.saturating_sub(pad_y * 2);
        let w = (bounds.width / 8 * 5).min(max_w);
        let h = (bounds.height / 4).max(text_h).min(max_h);
        let x = bounds.x + (bounds.width - w) / 2;
        let y = bounds.y + (bounds.height - h) / 2;
        let inner = Window::untitled(metrics, Rect::new(x, y, w, h));
        let outer = Window::untitled(
            metrics,
            Rect::new(
                x - pad_x.min(x),
                y - pad_y.min(y),
                w + pad_x * 2,
                h + pad_y * 2,
            ),
        );
        Self { outer, inner }
    }

    pub fn inner(&self) -> &Window {
        &self.inner
    }

    pub fn outer(&self) -> &Window {
        &self.outer
    }

    pub fn show<S: AsRef<str>>(&self, canvas: &mut dyn Canvas, lines: &[S]) {
        self.outer.draw_border(canvas);
        self.inner.draw_border(canvas);
        for (row, line) in lines.iter().take(self.inner.tmax_y() as usize).enumerate() {
            self.inner.draw_line(canvas, row as u16, line.as_ref(), false);
        }
    }
}

/// Draw a popup with `lines` over whatever is on `canvas`.
pub fn show_message<S: AsRef<str>>(canvas: &mut dyn Canvas, metrics: Metrics, lines: &[S]) {
    let (w, h) = canvas.size();
    MessageBox::centered(Rect::new(0, 0, w, h), metrics, lines.len()).show(canvas, lines);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::Screen;

    #[test]
    fn popup_is_centered_on_device_screen() {
        let b = MessageBox::centered(Rect::new(0, 0, 320, 240), Metrics::DEVICE, 2);
        assert_eq!(b.inner().area(), Rect::new(60, 90, 200, 60));
        assert_eq!(b.outer().area(), Rect::new(54, 85, 212, 70));
    }

    #[test]
    fn popup_grows_to_fit_rows() {
        let b = MessageBox::centered(Rect::new(0, 0, 80, 24), Metrics::TERMINAL, 8);
        assert_eq!(b.inner().tmax_y(), 8);
        assert_eq!(b.inner().w(), 50);
    }

    #[test]
    fn show_message_writes_text() {
        let mut screen = Screen::new(40, 12, Metrics::TERMINAL);
        show_message(&mut screen, Metrics::TERMINAL, &["Deleted!"]);
        let found = (0..12).any(|row| screen.row_text(row).contains("Deleted!"));
        assert!(found);
    }
}
