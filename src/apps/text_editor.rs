use tracing::{info, warn};

use crate::apps::source_lines;
use crate::components::{TextEditBuffer, show_message};
use crate::constants::{PAGE_COLS, PAGE_ROWS};
use crate::expr;
use crate::keybindings::Message;
use crate::shell::{ResultKind, ShellContext, ShellError, ShellResult};
use crate::window::Window;

/// Where Save writes the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Path(String),
    Symbol(String),
}

pub struct TextEditor {
    buffer: TextEditBuffer,
    source: Option<ShellResult>,
    target: Option<Target>,
    /// Shown once over the next repaint.
    notice: Option<String>,
}

impl TextEditor {
    pub fn new(arg: Option<&ShellResult>, ctx: &mut ShellContext) -> Self {
        let target = arg.and_then(|a| match a.kind {
            ResultKind::Path => Some(Target::Path(a.value.clone())),
            ResultKind::Symbol => Some(Target::Symbol(a.value.clone())),
            ResultKind::Text => None,
        });
        let mut win = Window::new(ctx.metrics(), ctx.bounds(), None);
        win.set_title(Self::title_for(target.as_ref()));
        let mut editor = Self {
            buffer: TextEditBuffer::new(win, vec![" ".to_string()]),
            source: arg.cloned(),
            target,
            notice: None,
        };
        if editor.source.is_some() {
            editor.load(ctx);
        }
        editor
    }

    fn title_for(target: Option<&Target>) -> String {
        let name = match target {
            Some(Target::Path(p)) | Some(Target::Symbol(p)) => p.as_str(),
            None => "",
        };
        format!("Text Editor: {name}")
    }

    pub fn title(&self) -> String {
        Self::title_for(self.target.as_ref())
    }

    pub fn buffer(&self) -> &TextEditBuffer {
        &self.buffer
    }

    pub fn target(&self) -> Option<&Target> {
        self.target.as_ref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Fill the buffer from the argument. An unreadable source leaves an
    /// empty buffer and a notice, never the message itself.
    fn load(&mut self, ctx: &ShellContext) {
        let Some(source) = &self.source else {
            return;
        };
        let width = self.buffer.window().tmax_x() as usize;
        match source_lines(source, ctx, width) {
            Ok(lines) => self.buffer.set_lines(lines),
            Err(msg) => {
                self.buffer.set_lines(vec![String::new()]);
                self.notice = Some(msg);
            }
        }
    }

    fn save(&mut self, ctx: &mut ShellContext) -> Result<(), ShellError> {
        match self.target.clone() {
            Some(Target::Path(path)) => {
                if !ctx.confirm(&[format!("Press y to save to {path}")])? {
                    return Ok(());
                }
                // a lone empty line is an empty file
                let lines: &[String] = if self.buffer.text().is_empty() {
                    &[]
                } else {
                    self.buffer.lines()
                };
                if let Err(err) = ctx.storage_mut().write_lines(&path, lines) {
                    ctx.prompt(&[format!("{err}")])?;
                } else {
                    info!(%path, lines = lines.len(), "saved");
                }
            }
            Some(Target::Symbol(name)) => {
                if !ctx.confirm(&[format!("Press y to bind to {name}")])? {
                    return Ok(());
                }
                match expr::parse(&self.buffer.text()) {
                    Ok(value) => ctx.symbols_mut().bind(&name, value),
                    Err(err) => {
                        warn!(%name, %err, "buffer is not an expression");
                        ctx.prompt(&[format!("Parse error: {err}")])?;
                    }
                }
            }
            None => {}
        }
        Ok(())
    }

    pub fn send(&mut self, msg: &Message, ctx: &mut ShellContext) -> Result<(), ShellError> {
        let b = &mut self.buffer;
        match msg {
            Message::PageUp => (0..PAGE_ROWS).for_each(|_| b.up()),
            Message::PageDown => (0..PAGE_ROWS).for_each(|_| b.down()),
            Message::PageLeft => (0..PAGE_COLS).for_each(|_| b.left()),
            Message::PageRight => (0..PAGE_COLS).for_each(|_| b.right()),
            Message::Save | Message::Load | Message::New => {}
            other => {
                b.handle(other);
            }
        }
        match msg {
            Message::Save => self.save(ctx)?,
            Message::Load if self.source.is_some() => {
                if ctx.confirm(&["Press y to reload and drop changes"])? {
                    self.load(ctx);
                }
            }
            Message::New => {
                if ctx.confirm(&["Press y to clear the buffer"])? {
                    self.buffer.set_lines(vec![String::new()]);
                }
            }
            _ => {}
        }
        self.show(ctx);
        Ok(())
    }

    pub fn show(&mut self, ctx: &mut ShellContext) {
        self.buffer.show(ctx.canvas());
        self.buffer.show_cursor(ctx.canvas());
        if let Some(notice) = self.notice.take() {
            let metrics = ctx.metrics();
            show_message(ctx.canvas(), metrics, &[notice]);
        }
    }
}
