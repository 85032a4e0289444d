//! Command line and environment configuration.

use std::path::PathBuf;

use clap::Parser;

use crate::drivers::{InputDriver, OutputDriver};
use crate::namespace::Namespace;
use crate::shell::{ResultKind, ShellContext, ShellResult};
use crate::storage::FsStorage;
use crate::ui::Screen;
use crate::window::Metrics;

#[derive(Debug, Clone, Parser)]
#[command(name = "deck-shell", version, about = "Keyboard application shell")]
pub struct Cli {
    /// Directory the file browser treats as `/`.
    #[arg(long, env = "DECK_ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Seed the results list with a path, `sym:NAME` or `text:VALUE`.
    #[arg(long = "open", value_name = "RESULT")]
    pub open: Vec<String>,

    /// Append log output to this file instead of buffering it until exit.
    #[arg(long, env = "DECK_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    #[arg(long, env = "DECK_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Lay windows out in device pixels (6x10 font) instead of cells.
    #[arg(long)]
    pub device_metrics: bool,
}

/// Parse one `--open` value. Bare values are paths.
pub fn parse_seed(raw: &str) -> ShellResult {
    if let Some(name) = raw.strip_prefix("sym:") {
        ShellResult::new(name, ResultKind::Symbol)
    } else if let Some(text) = raw.strip_prefix("text:") {
        ShellResult::new(text, ResultKind::Text)
    } else if raw.starts_with('/') {
        ShellResult::path(raw)
    } else {
        ShellResult::path(format!("/{raw}"))
    }
}

#[derive(Debug, Clone)]
pub struct ShellConfig {
    pub root: PathBuf,
    pub seed: Vec<ShellResult>,
    pub metrics: Metrics,
}

impl From<&Cli> for ShellConfig {
    fn from(cli: &Cli) -> Self {
        Self {
            root: cli.root.clone(),
            seed: cli.open.iter().map(|s| parse_seed(s)).collect(),
            metrics: if cli.device_metrics {
                Metrics::DEVICE
            } else {
                Metrics::TERMINAL
            },
        }
    }
}

impl ShellConfig {
    pub fn seed(&self) -> Vec<ShellResult> {
        self.seed.clone()
    }

    /// Build a context over a screen of `cols` x `rows` terminal cells.
    pub fn context(
        &self,
        cols: u16,
        rows: u16,
        input: Box<dyn InputDriver>,
        output: Box<dyn OutputDriver>,
    ) -> ShellContext {
        let screen = Screen::new(cols, rows, self.metrics);
        ShellContext::new(
            screen,
            input,
            output,
            Box::new(FsStorage::new(self.root.clone())),
            Box::new(Namespace::with_builtins()),
        )
    }
}
