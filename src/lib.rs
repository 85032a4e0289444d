pub mod apps;
pub mod components;
pub mod config;
pub mod constants;
pub mod drivers;
pub mod editor;
pub mod expr;
pub mod keybindings;
pub mod layout;
pub mod log_buffer;
pub mod namespace;
pub mod router;
pub mod shell;
pub mod storage;
pub mod theme;
pub mod tracing_sub;
pub mod ui;
pub mod window;

pub use shell::{ResultKind, ShellContext, ShellError, ShellResult, run_shell};
