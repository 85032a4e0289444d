//! Shell context and entry point.
//!
//! `ShellContext` owns everything an application may touch: the persistent
//! screen, the input and output drivers, storage and the symbol table. It
//! also collects the requests an application makes of the router while it
//! handles a message; the router applies them once the handler returns.

use std::fmt;
use std::io;

use ratatui::layout::Rect;
use thiserror::Error;
use tracing::{debug, info};

use crate::components::show_message;
use crate::drivers::{InputDriver, OutputDriver};
use crate::expr::{self, Expr};
use crate::keybindings::Key;
use crate::namespace::SymbolTable;
use crate::router::AppStack;
use crate::storage::Storage;
use crate::theme;
use crate::ui::{Canvas, Screen};
use crate::window::Metrics;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("terminal i/o failed: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    Path,
    Symbol,
    Text,
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResultKind::Path => "path",
            ResultKind::Symbol => "symbol",
            ResultKind::Text => "text",
        };
        write!(f, "{}", s)
    }
}

/// A value handed between applications through the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellResult {
    pub value: String,
    pub kind: ResultKind,
}

impl ShellResult {
    pub fn new(value: impl Into<String>, kind: ResultKind) -> Self {
        Self {
            value: value.into(),
            kind,
        }
    }

    pub fn path(value: impl Into<String>) -> Self {
        Self::new(value, ResultKind::Path)
    }

    pub fn symbol(value: impl Into<String>) -> Self {
        Self::new(value, ResultKind::Symbol)
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::new(value, ResultKind::Text)
    }
}

impl fmt::Display for ShellResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.kind, self.value)
    }
}

/// What the current application asked of the router.
#[derive(Debug, Default)]
pub(crate) struct Requests {
    pub results: Vec<ShellResult>,
    pub to_router: bool,
    pub exit: bool,
}

pub struct ShellContext {
    screen: Screen,
    input: Box<dyn InputDriver>,
    output: Box<dyn OutputDriver>,
    storage: Box<dyn Storage>,
    symbols: Box<dyn SymbolTable>,
    requests: Requests,
}

impl ShellContext {
    pub fn new(
        screen: Screen,
        input: Box<dyn InputDriver>,
        output: Box<dyn OutputDriver>,
        storage: Box<dyn Storage>,
        symbols: Box<dyn SymbolTable>,
    ) -> Self {
        Self {
            screen,
            input,
            output,
            storage,
            symbols,
            requests: Requests::default(),
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn canvas(&mut self) -> &mut dyn Canvas {
        &mut self.screen
    }

    pub fn metrics(&self) -> Metrics {
        self.screen.metrics()
    }

    pub fn bounds(&self) -> Rect {
        self.screen.bounds()
    }

    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    pub fn storage_mut(&mut self) -> &mut dyn Storage {
        self.storage.as_mut()
    }

    pub fn symbols(&self) -> &dyn SymbolTable {
        self.symbols.as_ref()
    }

    pub fn symbols_mut(&mut self) -> &mut dyn SymbolTable {
        self.symbols.as_mut()
    }

    pub fn present(&mut self) -> Result<(), ShellError> {
        self.output.present(self.screen.buffer())?;
        Ok(())
    }

    /// Present the screen, then block for the next key.
    pub fn next_key(&mut self) -> Result<Key, ShellError> {
        self.present()?;
        Ok(self.input.read_key()?)
    }

    /// Show a popup and wait for a key.
    pub fn prompt<S: AsRef<str>>(&mut self, lines: &[S]) -> Result<Key, ShellError> {
        let metrics = self.metrics();
        show_message(&mut self.screen, metrics, lines);
        self.next_key()
    }

    /// Ask a yes/no question. Only `y` confirms.
    pub fn confirm<S: AsRef<str>>(&mut self, lines: &[S]) -> Result<bool, ShellError> {
        Ok(self.prompt(lines)? == Key::Char('y'))
    }

    /// Read a line of text on the bottom row. `None` when cancelled.
    pub fn read_line(&mut self, prompt: &str) -> Result<Option<String>, ShellError> {
        let mut line = String::new();
        loop {
            self.draw_input_line(prompt, &line);
            match self.next_key()? {
                Key::Enter => return Ok(Some(line)),
                Key::Delete => {
                    line.pop();
                }
                Key::Focus | Key::Quit => return Ok(None),
                Key::Char(c) if !c.is_control() => line.push(c),
                _ => {}
            }
        }
    }

    /// Read and parse one expression. Parse failures are reported and give
    /// `None`.
    pub fn read_expr(&mut self, prompt: &str) -> Result<Option<Expr>, ShellError> {
        let Some(line) = self.read_line(prompt)? else {
            return Ok(None);
        };
        match expr::parse(&line) {
            Ok(expr) => Ok(Some(expr)),
            Err(err) => {
                debug!(%err, "rejected expression");
                self.prompt(&[format!("Parse error: {err}")])?;
                Ok(None)
            }
        }
    }

    fn draw_input_line(&mut self, prompt: &str, line: &str) {
        let m = self.metrics();
        let (w, h) = self.screen.size();
        let y = h.saturating_sub(m.leading);
        self.screen
            .fill_rect(Rect::new(0, y, w, m.leading), theme::header_bg());
        self.screen.set_cursor(0, y);
        self.screen
            .set_text_color(theme::header_fg(), theme::header_bg());
        let fit = (w / m.cwidth.max(1)) as usize;
        let text = format!("{prompt}{line}");
        // keep the tail visible once the input is wider than the screen
        let skip = text.chars().count().saturating_sub(fit);
        let visible: String = text.chars().skip(skip).collect();
        self.screen.write_text(&visible);
    }

    /// Hand a value to the router's results list.
    pub fn push_result(&mut self, result: ShellResult) {
        debug!(value = %result.value, kind = %result.kind, "result requested");
        self.requests.results.push(result);
    }

    /// Give focus back to the application stack.
    pub fn return_to_router(&mut self) {
        self.requests.to_router = true;
    }

    pub fn request_exit(&mut self) {
        self.requests.exit = true;
    }

    pub(crate) fn take_requests(&mut self) -> Requests {
        std::mem::take(&mut self.requests)
    }
}

/// Run the shell until the exit launcher or a quit key, then return the
/// results list, newest first.
pub fn run_shell(
    ctx: &mut ShellContext,
    seed: Vec<ShellResult>,
) -> Result<Vec<ShellResult>, ShellError> {
    let mut stack = AppStack::new(ctx.metrics(), ctx.bounds(), seed);
    stack.show(ctx);
    info!("shell started");
    while !stack.exiting() {
        let key = ctx.next_key()?;
        stack.dispatch_key(key, ctx)?;
    }
    ctx.canvas().fill_screen();
    ctx.present()?;
    let results = stack.into_results();
    info!(results = results.len(), "shell exited");
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::{Headless, ScriptedInput};
    use crate::namespace::Namespace;
    use crate::storage::FsStorage;

    fn context(input: ScriptedInput) -> ShellContext {
        ShellContext::new(
            Screen::new(40, 12, Metrics::TERMINAL),
            Box::new(input),
            Box::new(Headless::new()),
            Box::new(FsStorage::new(".")),
            Box::new(Namespace::empty()),
        )
    }

    #[test]
    fn read_line_edits_and_commits() {
        let input = ScriptedInput::default()
            .typed("abx")
            .then(Key::Delete)
            .typed("c")
            .then(Key::Enter);
        let mut ctx = context(input);
        assert_eq!(ctx.read_line("name:").unwrap().as_deref(), Some("abc"));
    }

    #[test]
    fn read_line_cancels_on_focus() {
        let input = ScriptedInput::default().typed("ab").then(Key::Focus);
        let mut ctx = context(input);
        assert_eq!(ctx.read_line("name:").unwrap(), None);
    }

    #[test]
    fn read_expr_reports_parse_errors() {
        let input = ScriptedInput::default()
            .typed("(a")
            .then(Key::Enter)
            .then(Key::Enter);
        let mut ctx = context(input);
        assert_eq!(ctx.read_expr(":").unwrap(), None);
        let input = ScriptedInput::default().typed("(a 1)").then(Key::Enter);
        let mut ctx = context(input);
        assert_eq!(
            ctx.read_expr(":").unwrap(),
            Some(Expr::list([Expr::sym("a"), Expr::int(1)]))
        );
    }

    #[test]
    fn confirm_requires_y() {
        let mut ctx = context(ScriptedInput::default().typed("ny"));
        assert!(!ctx.confirm(&["sure?"]).unwrap());
        assert!(ctx.confirm(&["sure?"]).unwrap());
    }

    #[test]
    fn requests_are_drained_once() {
        let mut ctx = context(ScriptedInput::default());
        ctx.push_result(ShellResult::path("/a"));
        ctx.return_to_router();
        let req = ctx.take_requests();
        assert_eq!(req.results, vec![ShellResult::path("/a")]);
        assert!(req.to_router && !req.exit);
        let req = ctx.take_requests();
        assert!(req.results.is_empty() && !req.to_router);
    }
}
