use std::ops::Range;

use crate::keybindings::Message;
use crate::theme;
use crate::ui::Canvas;
use crate::window::Window;

/// Split one logical line into chunks of at most `width` characters.
///
/// An empty line still produces one (empty) chunk so blank lines keep their
/// row on screen.
pub fn split_line(line: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let chars: Vec<char> = line.chars().collect();
    if chars.is_empty() {
        return vec![String::new()];
    }
    chars
        .chunks(width)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

pub fn wrap_lines<S: AsRef<str>>(lines: &[S], width: usize) -> Vec<String> {
    lines
        .iter()
        .flat_map(|line| split_line(line.as_ref(), width))
        .collect()
}

/// A wrapped display row and the part of it that is highlighted, in chars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRow {
    pub text: String,
    pub highlight: Option<Range<usize>>,
}

/// Read-only, wrapped, vertically scrollable text.
#[derive(Debug, Clone)]
pub struct TextDisplay {
    win: Window,
    lines: Vec<String>,
    span: Option<Range<usize>>,
    rows: Vec<TextRow>,
    scroll: usize,
}

impl TextDisplay {
    pub fn new(win: Window, lines: Vec<String>) -> Self {
        let mut display = Self {
            win,
            lines,
            span: None,
            rows: Vec::new(),
            scroll: 0,
        };
        display.reflow();
        display
    }

    pub fn window(&self) -> &Window {
        &self.win
    }

    /// Mutable window access. Call `reflow` after resizing.
    pub fn window_mut(&mut self) -> &mut Window {
        &mut self.win
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn rows(&self) -> &[TextRow] {
        &self.rows
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    fn wrap_width(&self) -> usize {
        (self.win.tmax_x() as usize).max(1)
    }

    pub fn set_lines(&mut self, lines: Vec<String>) {
        self.lines = lines;
        self.span = None;
        self.scroll = 0;
        self.reflow();
    }

    /// Replace the text with `text` and mark `span` (char offsets into
    /// `text`) for `show_highlighted`. An empty span marks the single cell
    /// at its start. Scroll is kept, clamped to the new rows.
    pub fn set_highlighted(&mut self, text: &str, span: Option<Range<usize>>) {
        self.lines = text.split('\n').map(str::to_string).collect();
        self.span = span.map(|s| {
            if s.start >= s.end {
                s.start..s.start + 1
            } else {
                s
            }
        });
        self.reflow();
    }

    /// Rewrap the current lines to the window width.
    pub fn reflow(&mut self) {
        let width = self.wrap_width();
        let mut rows = Vec::new();
        let mut offset = 0;
        for line in &self.lines {
            let chunks = split_line(line, width);
            let last = chunks.len() - 1;
            for (i, chunk) in chunks.into_iter().enumerate() {
                let len = chunk.chars().count();
                // the last chunk also owns the newline cell after it
                let end = if i == last { offset + len + 1 } else { offset + len };
                let highlight = self.span.as_ref().and_then(|span| {
                    let start = span.start.max(offset);
                    let stop = span.end.min(end);
                    (start < stop).then(|| start - offset..stop - offset)
                });
                rows.push(TextRow {
                    text: chunk,
                    highlight,
                });
                offset += len;
            }
            offset += 1;
        }
        self.rows = rows;
        self.scroll = self.scroll.min(self.rows.len());
    }

    pub fn up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn down(&mut self) {
        if self.scroll < self.rows.len() {
            self.scroll += 1;
        }
    }

    pub fn handle(&mut self, msg: &Message) -> bool {
        match msg {
            Message::Up => self.up(),
            Message::Down => self.down(),
            _ => return false,
        }
        true
    }

    fn visible(&self) -> impl Iterator<Item = (u16, &TextRow)> {
        self.rows
            .iter()
            .skip(self.scroll)
            .take(self.win.tmax_y() as usize)
            .enumerate()
            .map(|(i, row)| (i as u16, row))
    }

    pub fn show(&self, canvas: &mut dyn Canvas) {
        self.win.draw_border(canvas);
        for (row, line) in self.visible() {
            self.win.draw_line(canvas, row, &line.text, false);
        }
    }

    pub fn show_highlighted(&self, canvas: &mut dyn Canvas) {
        self.win.draw_border(canvas);
        let m = self.win.metrics();
        let fit = self.win.tmax_x() as usize + 1;
        for (row, line) in self.visible() {
            self.win.draw_line(canvas, row, &line.text, false);
            let Some(span) = line.highlight.clone() else {
                continue;
            };
            if span.start >= fit {
                continue;
            }
            let padded = line.text.chars().chain(std::iter::repeat(' '));
            let marked: String = padded
                .skip(span.start)
                .take(span.end.min(fit) - span.start)
                .collect();
            let x = self
                .win
                .in_x()
                .saturating_add((span.start as u16).saturating_mul(m.cwidth));
            let y = self
                .win
                .in_y()
                .saturating_add(row.saturating_mul(m.leading));
            canvas.set_cursor(x, y);
            canvas.set_text_color(theme::code_fg(), theme::highlight_bg());
            canvas.write_text(&marked);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::Screen;
    use crate::window::Metrics;
    use ratatui::layout::Rect;

    fn display(width: u16, height: u16, lines: &[&str]) -> TextDisplay {
        let win = Window::untitled(Metrics::TERMINAL, Rect::new(0, 0, width, height));
        TextDisplay::new(win, lines.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn split_line_chunks_greedily() {
        assert_eq!(split_line("abcdefg", 3), vec!["abc", "def", "g"]);
        assert_eq!(split_line("", 3), vec![""]);
        assert_eq!(split_line("ab", 0), vec!["a", "b"]);
    }

    #[test]
    fn wrapping_wrapped_rows_is_stable() {
        let once = wrap_lines(&["hello world", "", "x"], 4);
        let twice = wrap_lines(&once, 4);
        assert_eq!(once, twice);
        assert_eq!(once.len(), 5);
    }

    #[test]
    fn scroll_is_clamped_to_row_count() {
        // interior 6 wide -> tmax_x 5 -> rows of 5 chars
        let mut d = display(8, 4, &["abcdefghij", "k"]);
        assert_eq!(d.rows().len(), 3);
        for _ in 0..10 {
            d.down();
        }
        assert_eq!(d.scroll(), 3);
        d.up();
        assert_eq!(d.scroll(), 2);
        d.set_lines(vec!["z".into()]);
        assert_eq!(d.scroll(), 0);
    }

    #[test]
    fn highlight_spans_are_split_across_rows() {
        let mut d = display(8, 6, &[]);
        // rows: "(abcd" "e f)" / "(g)"
        d.set_highlighted("(abcde f)\n(g)", Some(3..7));
        let rows = d.rows();
        assert_eq!(rows[0].text, "(abcd");
        assert_eq!(rows[0].highlight, Some(3..5));
        assert_eq!(rows[1].highlight, Some(0..2));
        assert_eq!(rows[2].highlight, None);
    }

    #[test]
    fn empty_span_marks_one_cell() {
        let mut d = display(8, 6, &[]);
        d.set_highlighted("(a)\n(b)", Some(4..4));
        assert_eq!(d.rows()[0].highlight, None);
        assert_eq!(d.rows()[1].highlight, Some(0..1));
        d.set_highlighted("(a)", Some(3..3));
        assert_eq!(d.rows()[0].highlight, Some(3..4));
    }

    #[test]
    fn show_highlighted_paints_span() {
        let mut d = display(10, 4, &[]);
        d.set_highlighted("(a b)", Some(3..4));
        let mut screen = Screen::new(10, 4, Metrics::TERMINAL);
        d.show_highlighted(&mut screen);
        assert!(screen.row_text(1).starts_with("│(a b) "));
        assert_eq!(screen.bg_at(4, 1), Some(theme::highlight_bg()));
        assert_eq!(screen.bg_at(3, 1), Some(theme::bg()));
    }
}
