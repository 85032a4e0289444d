use crate::keybindings::Message;
use crate::theme;
use crate::ui::Canvas;
use crate::window::Window;

fn byte_at(line: &str, col: usize) -> usize {
    line.char_indices()
        .nth(col)
        .map(|(i, _)| i)
        .unwrap_or(line.len())
}

fn char_len(line: &str) -> usize {
    line.chars().count()
}

/// Editable lines with a 2-D cursor and a viewport that follows it.
///
/// Columns are counted in chars. The buffer always holds at least one line
/// and the cursor always addresses a valid insertion point.
#[derive(Debug, Clone)]
pub struct TextEditBuffer {
    win: Window,
    lines: Vec<String>,
    x: usize,
    y: usize,
    scroll_x: usize,
    scroll_y: usize,
}

impl TextEditBuffer {
    pub fn new(win: Window, lines: Vec<String>) -> Self {
        let mut buffer = Self {
            win,
            lines: Vec::new(),
            x: 0,
            y: 0,
            scroll_x: 0,
            scroll_y: 0,
        };
        buffer.set_lines(lines);
        buffer
    }

    pub fn window(&self) -> &Window {
        &self.win
    }

    pub fn window_mut(&mut self) -> &mut Window {
        &mut self.win
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Cursor as `(x, y)`.
    pub fn cursor(&self) -> (usize, usize) {
        (self.x, self.y)
    }

    pub fn scroll(&self) -> (usize, usize) {
        (self.scroll_x, self.scroll_y)
    }

    pub fn set_lines(&mut self, lines: Vec<String>) {
        self.lines = if lines.is_empty() {
            vec![String::new()]
        } else {
            lines
        };
        self.x = 0;
        self.y = 0;
        self.scroll_x = 0;
        self.scroll_y = 0;
    }

    fn line_len(&self) -> usize {
        char_len(&self.lines[self.y])
    }

    /// Keep the cursor inside the viewport.
    pub fn move_window(&mut self) {
        let cols = (self.win.tmax_x() as usize).max(1);
        let rows = (self.win.tmax_y() as usize).max(1);
        self.scroll_x = self
            .scroll_x
            .clamp(self.x.saturating_sub(cols - 1), self.x);
        self.scroll_y = self
            .scroll_y
            .clamp(self.y.saturating_sub(rows - 1), self.y);
    }

    pub fn up(&mut self) {
        if self.y > 0 {
            self.y -= 1;
            self.x = self.x.min(self.line_len());
        }
        self.move_window();
    }

    pub fn down(&mut self) {
        if self.y + 1 < self.lines.len() {
            self.y += 1;
            self.x = self.x.min(self.line_len());
        }
        self.move_window();
    }

    pub fn left(&mut self) {
        if self.x > 0 {
            self.x -= 1;
        } else if self.y > 0 {
            self.y -= 1;
            self.x = self.line_len();
        }
        self.move_window();
    }

    pub fn right(&mut self) {
        if self.x < self.line_len() {
            self.x += 1;
        } else if self.y + 1 < self.lines.len() {
            self.y += 1;
            self.x = 0;
        }
        self.move_window();
    }

    /// Split the line at the cursor.
    pub fn enter(&mut self) {
        let line = &mut self.lines[self.y];
        let tail = line.split_off(byte_at(line, self.x));
        self.lines.insert(self.y + 1, tail);
        self.y += 1;
        self.x = 0;
        self.move_window();
    }

    /// Delete left of the cursor, joining lines at column 0.
    pub fn del(&mut self) {
        if self.x == 0 {
            if self.y == 0 {
                return;
            }
            let current = self.lines.remove(self.y);
            self.y -= 1;
            self.x = self.line_len();
            self.lines[self.y].push_str(&current);
        } else {
            let line = &mut self.lines[self.y];
            let at = byte_at(line, self.x - 1);
            line.remove(at);
            self.x -= 1;
        }
        self.move_window();
    }

    pub fn insert(&mut self, c: char) {
        let line = &mut self.lines[self.y];
        let at = byte_at(line, self.x);
        line.insert(at, c);
        self.x += 1;
        self.move_window();
    }

    pub fn handle(&mut self, msg: &Message) -> bool {
        match msg {
            Message::Up => self.up(),
            Message::Down => self.down(),
            Message::Left => self.left(),
            Message::Right => self.right(),
            Message::Enter => self.enter(),
            Message::Del => self.del(),
            other => match other.printable() {
                Some(c) => self.insert(c),
                None => return false,
            },
        }
        true
    }

    pub fn show(&self, canvas: &mut dyn Canvas) {
        self.win.draw_border(canvas);
        let fit = self.win.tmax_x() as usize + 1;
        for (row, line) in self
            .lines
            .iter()
            .skip(self.scroll_y)
            .take(self.win.tmax_y() as usize)
            .enumerate()
        {
            let visible: String = line.chars().skip(self.scroll_x).take(fit).collect();
            self.win.draw_line(canvas, row as u16, &visible, false);
        }
    }

    /// Invert the cell under the cursor.
    pub fn show_cursor(&self, canvas: &mut dyn Canvas) {
        let m = self.win.metrics();
        let col = (self.x - self.scroll_x.min(self.x)) as u16;
        let row = (self.y - self.scroll_y.min(self.y)) as u16;
        if col > self.win.tmax_x() || row >= self.win.tmax_y() {
            return;
        }
        let glyph = self.lines[self.y].chars().nth(self.x).unwrap_or(' ');
        canvas.set_cursor(
            self.win.in_x().saturating_add(col.saturating_mul(m.cwidth)),
            self.win.in_y().saturating_add(row.saturating_mul(m.leading)),
        );
        canvas.set_text_color(theme::code_fg(), theme::cursor_bg());
        canvas.write_text(&glyph.to_string());
    }
}
