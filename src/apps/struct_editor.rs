use tracing::{debug, info};

use crate::components::TextDisplay;
use crate::constants::{DEFAULT_EXPRESSION, EDITOR_PAGE_ROWS, EDITOR_SCROLL_ROWS};
use crate::editor::StructuralEditor;
use crate::expr::{self, Expr};
use crate::keybindings::Message;
use crate::shell::{ResultKind, ShellContext, ShellError, ShellResult};
use crate::window::Window;

/// Keyboard front end for `StructuralEditor`.
///
/// `n` names the target symbol, `s` binds the edited expression to it, `z`
/// undoes the last command and `q` hands focus back to the router. Any other
/// key is looked up in the command registry.
pub struct StructEditor {
    editor: StructuralEditor,
    display: TextDisplay,
    name: Option<String>,
}

impl StructEditor {
    pub fn new(arg: Option<&ShellResult>, ctx: &mut ShellContext) -> Self {
        let name = arg
            .filter(|a| a.kind == ResultKind::Symbol)
            .map(|a| a.value.clone());
        let original = name
            .as_deref()
            .and_then(|n| ctx.symbols().value(n))
            .or_else(|| expr::parse(DEFAULT_EXPRESSION).ok())
            .unwrap_or(Expr::Nil);
        let title = Self::title_for(name.as_deref());
        let win = Window::new(ctx.metrics(), ctx.bounds(), Some(&title));
        let mut app = Self {
            editor: StructuralEditor::new(original),
            display: TextDisplay::new(win, Vec::new()),
            name,
        };
        app.refresh();
        app
    }

    fn title_for(name: Option<&str>) -> String {
        format!("Edit: {}", name.unwrap_or(""))
    }

    pub fn title(&self) -> String {
        Self::title_for(self.name.as_deref())
    }

    pub fn editor(&self) -> &StructuralEditor {
        &self.editor
    }

    pub fn display(&self) -> &TextDisplay {
        &self.display
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Replay the log and redraw the preview text.
    fn refresh(&mut self) {
        let width = (self.display.window().tmax_x() as usize).max(1);
        let rendering = self.editor.render(width);
        self.display.set_highlighted(&rendering.text, rendering.focus);
    }

    fn set_name(&mut self, ctx: &mut ShellContext) -> Result<(), ShellError> {
        if let Some(name) = ctx.read_line("set name:")? {
            let name = name.trim();
            if !name.is_empty() {
                self.name = Some(name.to_string());
                let title = self.title();
                self.display.window_mut().set_title(title);
            }
        }
        Ok(())
    }

    fn bind(&mut self, ctx: &mut ShellContext) -> Result<(), ShellError> {
        let shown = self.name.clone().unwrap_or_default();
        if !ctx.confirm(&["Press y to bind to ".to_string(), shown])? {
            return Ok(());
        }
        if self.name.is_none() {
            self.set_name(ctx)?;
        }
        if let Some(name) = self.name.as_deref() {
            info!(name, commands = self.editor.log().len(), "binding edited expression");
            ctx.symbols_mut().bind(name, self.editor.edited());
        }
        Ok(())
    }

    fn key(&mut self, c: char, ctx: &mut ShellContext) -> Result<bool, ShellError> {
        match c {
            'q' => {
                ctx.return_to_router();
                return Ok(false);
            }
            'n' => self.set_name(ctx)?,
            's' => self.bind(ctx)?,
            'z' => {
                self.editor.undo_last();
            }
            c if self.editor.is_binary(c) => {
                if let Some(value) = ctx.read_expr(&format!("{c}:"))? {
                    self.editor.push_binary(c, value);
                }
            }
            c if self.editor.is_atomic(c) => {
                self.editor.push_atomic(c);
            }
            c => debug!(key = %c, "no editor command"),
        }
        Ok(true)
    }

    pub fn send(&mut self, msg: &Message, ctx: &mut ShellContext) -> Result<(), ShellError> {
        let scroll = |d: &mut TextDisplay, n: usize, down: bool| {
            for _ in 0..n {
                if down {
                    d.down()
                } else {
                    d.up()
                }
            }
        };
        match msg {
            Message::Up => scroll(&mut self.display, EDITOR_SCROLL_ROWS, false),
            Message::Down => scroll(&mut self.display, EDITOR_SCROLL_ROWS, true),
            Message::Left => scroll(&mut self.display, EDITOR_PAGE_ROWS, false),
            Message::Right => scroll(&mut self.display, EDITOR_PAGE_ROWS, true),
            other => {
                let Some(c) = other.printable() else {
                    return Ok(());
                };
                if !self.key(c, ctx)? {
                    return Ok(());
                }
                self.refresh();
            }
        }
        self.show(ctx);
        Ok(())
    }

    pub fn show(&mut self, ctx: &mut ShellContext) {
        self.display.show_highlighted(ctx.canvas());
    }
}
