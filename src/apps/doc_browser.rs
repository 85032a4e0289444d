use ratatui::layout::Rect;

use crate::components::{Menu, MenuItem, TextDisplay};
use crate::constants::DOC_SPLIT;
use crate::keybindings::Message;
use crate::layout::{SplitArea, split_v};
use crate::shell::{ShellContext, ShellError, ShellResult};
use crate::window::Window;

/// Symbol search on the left, documentation of the selection on the right.
pub struct DocBrowser {
    names: Menu<String>,
    doc: TextDisplay,
    search: String,
}

impl DocBrowser {
    pub fn new(ctx: &mut ShellContext) -> Self {
        let m = ctx.metrics();
        let mut left = Window::new(m, Rect::default(), Some("Search: "));
        let mut right = Window::new(m, Rect::default(), Some("Documentation"));
        split_v(&mut left, &mut right, DOC_SPLIT, SplitArea::Screen(ctx.bounds()));
        let mut browser = Self {
            names: Menu::new(left, Vec::new()),
            doc: TextDisplay::new(right, Vec::new()),
            search: String::new(),
        };
        browser.refilter(ctx);
        browser
    }

    pub fn title(&self) -> String {
        "FunctionBrowser".to_string()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn names(&self) -> &Menu<String> {
        &self.names
    }

    pub fn doc(&self) -> &TextDisplay {
        &self.doc
    }

    fn refilter(&mut self, ctx: &ShellContext) {
        let items = ctx
            .symbols()
            .apropos(&self.search)
            .into_iter()
            .map(|name| MenuItem::new(name.clone(), name))
            .collect();
        self.names.set_opts(items);
        self.names
            .window_mut()
            .set_title(format!("Search: {}", self.search));
        self.refresh_doc(ctx);
    }

    fn refresh_doc(&mut self, ctx: &ShellContext) {
        let lines = match self.names.selected_payload() {
            Some(name) => match ctx.symbols().documentation(name) {
                Some(doc) => doc.lines().map(str::to_string).collect(),
                None => vec![format!("No doc for {name}")],
            },
            None => Vec::new(),
        };
        self.doc.set_lines(lines);
    }

    pub fn send(&mut self, msg: &Message, ctx: &mut ShellContext) -> Result<(), ShellError> {
        match msg {
            Message::Up | Message::Down => {
                self.names.handle(msg);
                self.refresh_doc(ctx);
            }
            Message::Right => self.doc.down(),
            Message::Left => self.doc.up(),
            Message::Del => {
                self.search.pop();
                self.refilter(ctx);
            }
            Message::Enter => {
                if let Some(name) = self.names.selected_payload() {
                    ctx.push_result(ShellResult::symbol(name.clone()));
                    ctx.return_to_router();
                }
            }
            other => {
                if let Some(c) = other.printable() {
                    self.search.push(c);
                    self.refilter(ctx);
                }
            }
        }
        self.show(ctx);
        Ok(())
    }

    pub fn show(&mut self, ctx: &mut ShellContext) {
        self.names.show(ctx.canvas(), true);
        self.doc.show(ctx.canvas());
    }
}
