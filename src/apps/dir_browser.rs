use tracing::{debug, info, warn};

use crate::components::{Menu, MenuItem};
use crate::keybindings::Message;
use crate::shell::{ResultKind, ShellContext, ShellError, ShellResult};
use crate::storage::{self, DirEntry, StorageError};
use crate::window::Window;

/// Browser state. Every mode other than `Navigate` collects a line of
/// input that is committed with Enter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    New,
    Save,
    Folder,
    Rename,
    Append,
}

impl Mode {
    fn for_key(c: char) -> Option<Self> {
        match c {
            'n' => Some(Mode::New),
            's' => Some(Mode::Save),
            'f' => Some(Mode::Folder),
            'r' => Some(Mode::Rename),
            'a' => Some(Mode::Append),
            _ => None,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Mode::Navigate => "navigate",
            Mode::New => "new",
            Mode::Save => "save",
            Mode::Folder => "folder",
            Mode::Rename => "rename",
            Mode::Append => "append",
        }
    }
}

pub struct DirBrowser {
    menu: Menu<DirEntry>,
    path: String,
    mode: Mode,
    input: String,
}

fn label(entry: &DirEntry) -> String {
    if entry.is_dir() {
        format!("{}/", entry.name)
    } else {
        entry.name.clone()
    }
}

impl DirBrowser {
    /// Open at the root, or at the directory an argument path names.
    pub fn new(arg: Option<&ShellResult>, ctx: &mut ShellContext) -> Self {
        let win = Window::new(ctx.metrics(), ctx.bounds(), Some("Directory Browser"));
        let mut browser = Self {
            menu: Menu::new(win, Vec::new()),
            path: "/".to_string(),
            mode: Mode::Navigate,
            input: String::new(),
        };
        if let Some(arg) = arg.filter(|a| a.kind == ResultKind::Path) {
            browser.path = if ctx.storage().list_dir(&arg.value).is_ok() {
                arg.value.clone()
            } else {
                storage::parent(&arg.value)
            };
        }
        browser.reload(ctx);
        browser
    }

    pub fn title(&self) -> String {
        "Directory Browser".to_string()
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn menu(&self) -> &Menu<DirEntry> {
        &self.menu
    }

    /// Labels as listed, directories with a trailing `/`.
    pub fn labels(&self) -> Vec<&str> {
        self.menu.opts().iter().map(|item| item.label.as_str()).collect()
    }

    fn reload(&mut self, ctx: &ShellContext) {
        let entries = match ctx.storage().list_dir(&self.path) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(path = %self.path, %err, "cannot list directory");
                Vec::new()
            }
        };
        let items = entries
            .into_iter()
            .map(|entry| MenuItem::new(label(&entry), entry))
            .collect();
        self.menu.set_opts(items);
        self.retitle();
    }

    fn retitle(&mut self) {
        let title = match self.mode {
            Mode::Navigate => self.path.clone(),
            mode => format!("{}: {}", mode.label(), self.input),
        };
        self.menu.window_mut().set_title(title);
    }

    fn selected_path(&self) -> Option<(String, bool)> {
        let entry = self.menu.selected_payload()?;
        Some((storage::join(&self.path, &entry.name), entry.is_dir()))
    }

    fn descend(&mut self, ctx: &ShellContext) {
        if let Some((path, true)) = self.selected_path() {
            debug!(%path, "descend");
            self.path = path;
            self.reload(ctx);
        }
    }

    fn ascend(&mut self, ctx: &ShellContext) {
        if self.path == "/" {
            return;
        }
        self.path = storage::parent(&self.path);
        self.reload(ctx);
    }

    fn delete_selected(&mut self, ctx: &mut ShellContext) -> Result<(), ShellError> {
        let Some((path, is_dir)) = self.selected_path() else {
            return Ok(());
        };
        let name = self.menu.selected_label().unwrap_or_default().to_string();
        if ctx.confirm(&[format!("Press y to delete {name}")])? {
            let removed = if is_dir {
                ctx.storage_mut().remove_dir(&path)
            } else {
                ctx.storage_mut().remove_file(&path)
            };
            let report = match removed {
                Ok(()) => {
                    info!(%path, "deleted");
                    "Deleted!"
                }
                Err(_) => "Didn't delete!",
            };
            ctx.prompt(&[report, "", "Press any key to continue"])?;
        }
        self.reload(ctx);
        Ok(())
    }

    fn commit(&mut self, ctx: &mut ShellContext) -> Result<(), ShellError> {
        let target = storage::join(&self.path, &self.input);
        let outcome: Result<(), StorageError> = match self.mode {
            _ if self.input.is_empty() => Ok(()),
            Mode::New => ctx.storage_mut().create_file(&target),
            Mode::Folder => ctx.storage_mut().make_dir(&target),
            Mode::Rename => match self.selected_path() {
                Some((from, _)) => ctx.storage_mut().rename(&from, &target),
                None => Ok(()),
            },
            Mode::Save | Mode::Append | Mode::Navigate => Ok(()),
        };
        self.mode = Mode::Navigate;
        self.input.clear();
        if let Err(err) = outcome {
            ctx.prompt(&[format!("{err}"), String::new(), "Press any key to continue".into()])?;
        }
        self.reload(ctx);
        Ok(())
    }

    fn navigate(&mut self, msg: &Message, ctx: &mut ShellContext) -> Result<(), ShellError> {
        match msg {
            Message::Up | Message::Down => {
                self.menu.handle(msg);
            }
            Message::Right => self.descend(ctx),
            Message::Left => self.ascend(ctx),
            Message::Enter => match self.selected_path() {
                Some((_, true)) => self.descend(ctx),
                Some((path, false)) => {
                    ctx.push_result(ShellResult::path(path));
                    ctx.return_to_router();
                }
                None => {}
            },
            Message::Del => self.delete_selected(ctx)?,
            Message::Char(c) => {
                if let Some(mode) = Mode::for_key(*c) {
                    self.mode = mode;
                    self.input.clear();
                    self.retitle();
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn collect_input(&mut self, msg: &Message, ctx: &mut ShellContext) -> Result<(), ShellError> {
        match msg {
            Message::Enter => return self.commit(ctx),
            Message::Del => {
                self.input.pop();
            }
            other => {
                if let Some(c) = other.printable() {
                    self.input.push(c);
                }
            }
        }
        self.retitle();
        Ok(())
    }

    pub fn send(&mut self, msg: &Message, ctx: &mut ShellContext) -> Result<(), ShellError> {
        match self.mode {
            Mode::Navigate => self.navigate(msg, ctx)?,
            _ => self.collect_input(msg, ctx)?,
        }
        self.show(ctx);
        Ok(())
    }

    pub fn show(&mut self, ctx: &mut ShellContext) {
        self.menu.show(ctx.canvas(), true);
    }
}
