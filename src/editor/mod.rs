//! Structural expression editor.
//!
//! The edited expression is never stored. It is always recomputed by
//! replaying the command log against the original expression, so the log is
//! the single source of truth and undo is a pop.

use tracing::debug;

use crate::expr::{Expr, Rendering, render};

mod commands;

pub use commands::{
    AtomicCommand, AtomicHandler, BinaryCommand, BinaryHandler, CommandRegistry, Replay, Step,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Atomic(char),
    /// A tag with the value captured when the command was entered.
    Binary(char, Expr),
    /// Marks where interpretation stopped.
    Highlight,
}

#[derive(Debug, Clone)]
pub struct StructuralEditor {
    original: Expr,
    log: Vec<Command>,
    registry: CommandRegistry,
}

impl StructuralEditor {
    pub fn new(original: Expr) -> Self {
        Self::with_registry(original, CommandRegistry::builtin())
    }

    pub fn with_registry(original: Expr, registry: CommandRegistry) -> Self {
        Self {
            original,
            log: Vec::new(),
            registry,
        }
    }

    pub fn original(&self) -> &Expr {
        &self.original
    }

    pub fn log(&self) -> &[Command] {
        &self.log
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn is_atomic(&self, tag: char) -> bool {
        self.registry.atomic(tag).is_some()
    }

    pub fn is_binary(&self, tag: char) -> bool {
        self.registry.binary(tag).is_some()
    }

    /// Append an atomic command. Unregistered tags are refused.
    pub fn push_atomic(&mut self, tag: char) -> bool {
        if !self.is_atomic(tag) {
            return false;
        }
        self.log.push(Command::Atomic(tag));
        debug!(%tag, len = self.log.len(), "editor atomic command");
        true
    }

    pub fn push_binary(&mut self, tag: char, value: Expr) -> bool {
        if !self.is_binary(tag) {
            return false;
        }
        debug!(%tag, %value, len = self.log.len() + 1, "editor binary command");
        self.log.push(Command::Binary(tag, value));
        true
    }

    pub fn undo_last(&mut self) -> Option<Command> {
        let popped = self.log.pop();
        if popped.is_some() {
            debug!(len = self.log.len(), "editor undo");
        }
        popped
    }

    fn replay(&self, log: &[Command]) -> Expr {
        Replay::new(log, &self.registry).edit(self.original.clone())
    }

    /// The expression the log produces.
    pub fn edited(&self) -> Expr {
        self.replay(&self.log)
    }

    /// The edited expression with the current focus annotated.
    pub fn preview(&self) -> Expr {
        let mut log = self.log.clone();
        log.push(Command::Highlight);
        self.replay(&log)
    }

    pub fn render(&self, width: usize) -> Rendering {
        render(&self.preview(), width)
    }
}
