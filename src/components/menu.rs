use crate::keybindings::Message;
use crate::ui::Canvas;
use crate::window::Window;

/// One selectable row: the label shown and the value it stands for.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem<T> {
    pub label: String,
    pub payload: Option<T>,
}

impl<T> MenuItem<T> {
    pub fn new(label: impl Into<String>, payload: T) -> Self {
        Self {
            label: label.into(),
            payload: Some(payload),
        }
    }

    /// A row with nothing behind it, such as a placeholder.
    pub fn label_only(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            payload: None,
        }
    }
}

/// Scrollable list bound to a window.
///
/// `scroll <= selected < scroll + tmax_y` holds after every motion, so the
/// selected row is always on screen.
#[derive(Debug, Clone)]
pub struct Menu<T> {
    win: Window,
    opts: Vec<MenuItem<T>>,
    selected: usize,
    scroll: usize,
}

impl<T> Menu<T> {
    pub fn new(win: Window, opts: Vec<MenuItem<T>>) -> Self {
        Self {
            win,
            opts,
            selected: 0,
            scroll: 0,
        }
    }

    pub fn window(&self) -> &Window {
        &self.win
    }

    pub fn window_mut(&mut self) -> &mut Window {
        &mut self.win
    }

    pub fn opts(&self) -> &[MenuItem<T>] {
        &self.opts
    }

    pub fn len(&self) -> usize {
        self.opts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.opts.is_empty()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    fn view_rows(&self) -> usize {
        (self.win.tmax_y() as usize).max(1)
    }

    pub fn down(&mut self) {
        if self.selected + 1 >= self.opts.len() {
            return;
        }
        self.selected += 1;
        let first_visible = (self.selected + 1).saturating_sub(self.view_rows());
        self.scroll = self.scroll.max(first_visible);
    }

    pub fn up(&mut self) {
        if self.selected == 0 {
            return;
        }
        self.selected -= 1;
        if self.selected < self.scroll {
            self.scroll = self.selected;
        }
    }

    pub fn nth(&self, n: usize) -> Option<&MenuItem<T>> {
        self.opts.get(n)
    }

    pub fn nth_label(&self, n: usize) -> Option<&str> {
        self.nth(n).map(|item| item.label.as_str())
    }

    pub fn nth_payload(&self, n: usize) -> Option<&T> {
        self.nth(n).and_then(|item| item.payload.as_ref())
    }

    pub fn nth_payload_mut(&mut self, n: usize) -> Option<&mut T> {
        self.opts.get_mut(n).and_then(|item| item.payload.as_mut())
    }

    pub fn selected_item(&self) -> Option<&MenuItem<T>> {
        self.nth(self.selected)
    }

    pub fn selected_label(&self) -> Option<&str> {
        self.nth_label(self.selected)
    }

    pub fn selected_payload(&self) -> Option<&T> {
        self.nth_payload(self.selected)
    }

    pub fn selected_payload_mut(&mut self) -> Option<&mut T> {
        self.nth_payload_mut(self.selected)
    }

    fn reset(&mut self) {
        self.selected = 0;
        self.scroll = 0;
    }

    pub fn set_opts(&mut self, opts: Vec<MenuItem<T>>) {
        self.opts = opts;
        self.reset();
    }

    /// Prepend an option. The new option becomes the selection.
    pub fn push_opt(&mut self, item: MenuItem<T>) {
        self.opts.insert(0, item);
        self.reset();
    }

    /// Remove the option at `n`. Out of range is a no-op.
    pub fn remove_nth(&mut self, n: usize) -> Option<MenuItem<T>> {
        if n >= self.opts.len() {
            return None;
        }
        let item = self.opts.remove(n);
        self.reset();
        Some(item)
    }

    pub fn remove_selected(&mut self) -> Option<MenuItem<T>> {
        self.remove_nth(self.selected)
    }

    pub fn handle(&mut self, msg: &Message) -> bool {
        match msg {
            Message::Up => self.up(),
            Message::Down => self.down(),
            _ => return false,
        }
        true
    }

    pub fn show(&self, canvas: &mut dyn Canvas, highlight_selected: bool) {
        self.win.draw_border(canvas);
        let rows = self.win.tmax_y() as usize;
        for (row, (idx, item)) in self
            .opts
            .iter()
            .enumerate()
            .skip(self.scroll)
            .take(rows)
            .enumerate()
        {
            let selected = highlight_selected && idx == self.selected;
            self.win.draw_line(canvas, row as u16, &item.label, selected);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme;
    use crate::ui::Screen;
    use crate::window::Metrics;
    use ratatui::layout::Rect;

    fn menu(n: usize, rows: u16) -> Menu<usize> {
        // untitled terminal window: interior height = h - 2
        let win = Window::untitled(Metrics::TERMINAL, Rect::new(0, 0, 12, rows + 2));
        let opts = (0..n).map(|i| MenuItem::new(format!("item{i}"), i)).collect();
        Menu::new(win, opts)
    }

    #[test]
    fn down_keeps_selection_visible() {
        let mut m = menu(10, 3);
        for _ in 0..5 {
            m.down();
        }
        assert_eq!(m.selected(), 5);
        assert_eq!(m.scroll(), 3);
        for _ in 0..20 {
            m.down();
        }
        assert_eq!(m.selected(), 9);
        assert_eq!(m.scroll(), 7);
    }

    #[test]
    fn up_pulls_scroll_back() {
        let mut m = menu(10, 3);
        for _ in 0..9 {
            m.down();
        }
        for _ in 0..8 {
            m.up();
        }
        assert_eq!(m.selected(), 1);
        assert_eq!(m.scroll(), 1);
        m.up();
        m.up();
        assert_eq!((m.selected(), m.scroll()), (0, 0));
    }

    #[test]
    fn empty_menu_motion_is_noop() {
        let mut m = menu(0, 3);
        m.down();
        m.up();
        assert_eq!((m.selected(), m.scroll()), (0, 0));
        assert!(m.selected_label().is_none());
        assert!(m.selected_payload().is_none());
    }

    #[test]
    fn accessors_are_bounds_checked() {
        let mut m = menu(2, 3);
        m.push_opt(MenuItem::label_only("none"));
        assert_eq!(m.nth_label(0), Some("none"));
        assert_eq!(m.nth_payload(0), None);
        assert_eq!(m.nth_payload(2), Some(&1));
        assert_eq!(m.nth(3), None);
    }

    #[test]
    fn remove_nth_out_of_range_is_noop() {
        let mut m = menu(3, 3);
        m.down();
        assert!(m.remove_nth(3).is_none());
        assert_eq!(m.len(), 3);
        assert_eq!(m.selected(), 1);
        let removed = m.remove_selected().map(|item| item.label);
        assert_eq!(removed.as_deref(), Some("item1"));
        assert_eq!(m.selected(), 0);
        assert_eq!(m.nth_label(1), Some("item2"));
    }

    #[test]
    fn push_resets_selection() {
        let mut m = menu(5, 3);
        m.down();
        m.down();
        m.push_opt(MenuItem::new("new", 99));
        assert_eq!(m.selected(), 0);
        assert_eq!(m.selected_payload(), Some(&99));
    }

    #[test]
    fn handle_ignores_other_messages() {
        let mut m = menu(3, 3);
        assert!(m.handle(&Message::Down));
        assert!(!m.handle(&Message::Enter));
        assert_eq!(m.selected(), 1);
    }

    #[test]
    fn show_draws_visible_rows_and_selection() {
        let mut m = menu(10, 3);
        m.down();
        let mut screen = Screen::new(12, 5, Metrics::TERMINAL);
        m.show(&mut screen, true);
        assert!(screen.row_text(1).starts_with("│item0"));
        assert!(screen.row_text(3).starts_with("│item2"));
        assert_eq!(screen.bg_at(1, 2), Some(theme::cursor_bg()));
        assert_eq!(screen.bg_at(1, 1), Some(theme::bg()));
    }
}
