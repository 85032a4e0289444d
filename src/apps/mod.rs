//! Built-in applications.
//!
//! Every application owns its widgets, translates `Message`s into widget
//! calls and repaints itself before returning. Values for other
//! applications travel through `ShellContext::push_result`.

pub mod dir_browser;
pub mod doc_browser;
pub mod struct_editor;
pub mod text_editor;
pub mod text_viewer;

use std::fmt;

use tracing::{info, warn};

use crate::expr;
use crate::keybindings::Message;
use crate::shell::{ResultKind, ShellContext, ShellError, ShellResult};

pub use dir_browser::{DirBrowser, Mode};
pub use doc_browser::DocBrowser;
pub use struct_editor::StructEditor;
pub use text_editor::TextEditor;
pub use text_viewer::TextViewer;

/// A running application instance.
pub enum App {
    Directory(DirBrowser),
    TextEditor(TextEditor),
    TextViewer(TextViewer),
    DocBrowser(DocBrowser),
    StructEditor(StructEditor),
}

impl App {
    pub fn title(&self) -> String {
        match self {
            App::Directory(app) => app.title(),
            App::TextEditor(app) => app.title(),
            App::TextViewer(app) => app.title(),
            App::DocBrowser(app) => app.title(),
            App::StructEditor(app) => app.title(),
        }
    }

    pub fn show(&mut self, ctx: &mut ShellContext) {
        match self {
            App::Directory(app) => app.show(ctx),
            App::TextEditor(app) => app.show(ctx),
            App::TextViewer(app) => app.show(ctx),
            App::DocBrowser(app) => app.show(ctx),
            App::StructEditor(app) => app.show(ctx),
        }
    }

    pub fn send(&mut self, msg: &Message, ctx: &mut ShellContext) -> Result<(), ShellError> {
        match self {
            App::Directory(app) => app.send(msg, ctx),
            App::TextEditor(app) => app.send(msg, ctx),
            App::TextViewer(app) => app.send(msg, ctx),
            App::DocBrowser(app) => app.send(msg, ctx),
            App::StructEditor(app) => app.send(msg, ctx),
        }
    }
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("App").field(&self.title()).finish()
    }
}

/// Entries of the application menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Launcher {
    Directory,
    TextEditor,
    DocBrowser,
    StructEditor,
    TextViewer,
    Exit,
}

impl Launcher {
    pub const ALL: [Launcher; 6] = [
        Launcher::Directory,
        Launcher::TextEditor,
        Launcher::DocBrowser,
        Launcher::StructEditor,
        Launcher::TextViewer,
        Launcher::Exit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Launcher::Directory => "Directory",
            Launcher::TextEditor => "Text Editor",
            Launcher::DocBrowser => "FunctionBrowser",
            Launcher::StructEditor => "Edit",
            Launcher::TextViewer => "Text Viewer",
            Launcher::Exit => "Exit",
        }
    }

    /// Start an instance. `Exit` asks the shell to stop and starts nothing.
    pub fn launch(&self, arg: Option<&ShellResult>, ctx: &mut ShellContext) -> Option<App> {
        info!(launcher = self.label(), arg = ?arg.map(|a| &a.value), "launch");
        let app = match self {
            Launcher::Directory => App::Directory(DirBrowser::new(arg, ctx)),
            Launcher::TextEditor => App::TextEditor(TextEditor::new(arg, ctx)),
            Launcher::DocBrowser => App::DocBrowser(DocBrowser::new(ctx)),
            Launcher::StructEditor => App::StructEditor(StructEditor::new(arg, ctx)),
            Launcher::TextViewer => App::TextViewer(TextViewer::new(arg, ctx)),
            Launcher::Exit => {
                ctx.request_exit();
                return None;
            }
        };
        Some(app)
    }
}

/// Lines an argument stands for. `Err` carries the message to show when the
/// source cannot be read.
pub(crate) fn source_lines(
    arg: &ShellResult,
    ctx: &ShellContext,
    width: usize,
) -> Result<Vec<String>, String> {
    match arg.kind {
        ResultKind::Path => ctx.storage().read_lines(&arg.value).map_err(|err| {
            warn!(%err, "cannot open file");
            format!("Cannot open {}", arg.value)
        }),
        ResultKind::Text => Ok(arg.value.lines().map(str::to_string).collect()),
        ResultKind::Symbol => match ctx.symbols().value(&arg.value) {
            Some(value) => Ok(expr::render(&value, width)
                .text
                .split('\n')
                .map(str::to_string)
                .collect()),
            None => Err(format!("No value for {}", arg.value)),
        },
    }
}
