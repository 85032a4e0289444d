use crate::apps::source_lines;
use crate::components::TextDisplay;
use crate::constants::PAGE_ROWS;
use crate::keybindings::Message;
use crate::shell::{ShellContext, ShellError, ShellResult};
use crate::window::Window;

pub struct TextViewer {
    display: TextDisplay,
    source: String,
}

impl TextViewer {
    pub fn new(arg: Option<&ShellResult>, ctx: &mut ShellContext) -> Self {
        let source = arg.map(|a| a.value.clone()).unwrap_or_default();
        let win = Window::new(
            ctx.metrics(),
            ctx.bounds(),
            Some(&format!("TextViewer: {source}")),
        );
        let width = win.tmax_x() as usize;
        let lines = match arg {
            Some(arg) => source_lines(arg, ctx, width).unwrap_or_else(|msg| vec![msg]),
            None => vec!["no file selected".to_string()],
        };
        Self {
            display: TextDisplay::new(win, lines),
            source,
        }
    }

    pub fn title(&self) -> String {
        format!("TextViewer: {}", self.source)
    }

    pub fn display(&self) -> &TextDisplay {
        &self.display
    }

    pub fn send(&mut self, msg: &Message, ctx: &mut ShellContext) -> Result<(), ShellError> {
        match msg {
            Message::PageUp => (0..PAGE_ROWS).for_each(|_| self.display.up()),
            Message::PageDown => (0..PAGE_ROWS).for_each(|_| self.display.down()),
            other => {
                self.display.handle(other);
            }
        }
        self.show(ctx);
        Ok(())
    }

    pub fn show(&mut self, ctx: &mut ShellContext) {
        self.display.show(ctx.canvas());
    }
}
