use std::collections::BTreeMap;

use crate::constants::MAX_EDIT_DEPTH;
use crate::expr::Expr;

use super::Command;

/// What a handler wants the current replay level to do next.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Keep interpreting the log against this expression at the same level.
    Continue(Expr),
    /// Leave this level with this expression.
    Return(Expr),
}

pub type AtomicHandler = fn(&mut Replay<'_>, Expr) -> Step;
pub type BinaryHandler = fn(&mut Replay<'_>, &Expr, Expr) -> Step;

#[derive(Debug, Clone, Copy)]
pub struct AtomicCommand {
    pub name: &'static str,
    pub handler: AtomicHandler,
}

#[derive(Debug, Clone, Copy)]
pub struct BinaryCommand {
    pub name: &'static str,
    pub handler: BinaryHandler,
}

/// Tag to handler tables. Defining a tag again replaces the earlier handler.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    atomic: BTreeMap<char, AtomicCommand>,
    binary: BTreeMap<char, BinaryCommand>,
}

impl CommandRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        let mut reg = Self::empty();
        reg.define_atomic('b', "back", back);
        reg.define_atomic('a', "car", car);
        reg.define_atomic('d', "cdr", cdr);
        reg.define_atomic('x', "delete", delete);
        reg.define_atomic('k', "copy", copy);
        reg.define_atomic('v', "paste", paste);
        reg.define_binary('r', "replace", replace);
        reg.define_binary('c', "cons", cons);
        reg.define_binary('i', "insert", cons);
        reg.define_binary('f', "find", find);
        reg
    }

    pub fn define_atomic(&mut self, tag: char, name: &'static str, handler: AtomicHandler) {
        self.atomic.insert(tag, AtomicCommand { name, handler });
    }

    pub fn define_binary(&mut self, tag: char, name: &'static str, handler: BinaryHandler) {
        self.binary.insert(tag, BinaryCommand { name, handler });
    }

    pub fn atomic(&self, tag: char) -> Option<&AtomicCommand> {
        self.atomic.get(&tag)
    }

    pub fn binary(&self, tag: char) -> Option<&BinaryCommand> {
        self.binary.get(&tag)
    }
}

/// One interpretation of a command log against an expression.
///
/// The log is consumed left to right while the tree is walked depth first.
pub struct Replay<'a> {
    log: &'a [Command],
    pos: usize,
    registry: &'a CommandRegistry,
    clipboard: Expr,
    depth: usize,
}

impl<'a> Replay<'a> {
    pub fn new(log: &'a [Command], registry: &'a CommandRegistry) -> Self {
        Self {
            log,
            pos: 0,
            registry,
            clipboard: Expr::Nil,
            depth: 0,
        }
    }

    /// Commands not yet consumed.
    pub fn remaining(&self) -> &'a [Command] {
        &self.log[self.pos.min(self.log.len())..]
    }

    pub fn consume(&mut self) {
        self.pos += 1;
    }

    pub fn clipboard(&self) -> &Expr {
        &self.clipboard
    }

    pub fn set_clipboard(&mut self, expr: Expr) {
        self.clipboard = expr;
    }

    /// Interpret the remaining log against `subtree` at a new level.
    pub fn edit(&mut self, subtree: Expr) -> Expr {
        if self.depth >= MAX_EDIT_DEPTH {
            return subtree;
        }
        self.depth += 1;
        let edited = self.edit_level(subtree);
        self.depth -= 1;
        edited
    }

    fn edit_level(&mut self, mut subtree: Expr) -> Expr {
        let (log, registry) = (self.log, self.registry);
        loop {
            let before = self.pos;
            let step = match log.get(self.pos) {
                None => return subtree,
                Some(Command::Highlight) => {
                    self.consume();
                    Step::Continue(Expr::focus(subtree))
                }
                Some(Command::Atomic(tag)) => match registry.atomic(*tag) {
                    Some(cmd) => (cmd.handler)(self, subtree),
                    None => return subtree,
                },
                Some(Command::Binary(tag, value)) => match registry.binary(*tag) {
                    Some(cmd) => (cmd.handler)(self, value, subtree),
                    None => return subtree,
                },
            };
            match step {
                // a handler that consumed nothing would spin forever
                Step::Continue(expr) if self.pos == before => return expr,
                Step::Continue(expr) => subtree = expr,
                Step::Return(expr) => return expr,
            }
        }
    }
}

fn back(r: &mut Replay<'_>, subtree: Expr) -> Step {
    r.consume();
    Step::Return(subtree)
}

fn car(r: &mut Replay<'_>, subtree: Expr) -> Step {
    r.consume();
    match subtree.into_pair() {
        Ok((head, tail)) => Step::Continue(Expr::cons(r.edit(head), tail)),
        Err(atom) => Step::Continue(atom),
    }
}

fn cdr(r: &mut Replay<'_>, subtree: Expr) -> Step {
    r.consume();
    match subtree.into_pair() {
        Ok((head, tail)) => Step::Continue(Expr::cons(head, r.edit(tail))),
        Err(atom) => Step::Continue(atom),
    }
}

fn delete(r: &mut Replay<'_>, subtree: Expr) -> Step {
    r.consume();
    match subtree.into_pair() {
        Ok((_, tail)) => Step::Continue(tail),
        Err(atom) => Step::Continue(atom),
    }
}

fn copy(r: &mut Replay<'_>, subtree: Expr) -> Step {
    r.consume();
    r.set_clipboard(subtree.clone());
    Step::Continue(subtree)
}

fn paste(r: &mut Replay<'_>, subtree: Expr) -> Step {
    r.consume();
    Step::Continue(Expr::cons(r.clipboard().clone(), subtree))
}

fn replace(r: &mut Replay<'_>, value: &Expr, subtree: Expr) -> Step {
    r.consume();
    if subtree.is_atom() {
        Step::Continue(value.clone())
    } else {
        Step::Continue(subtree)
    }
}

fn cons(r: &mut Replay<'_>, value: &Expr, subtree: Expr) -> Step {
    r.consume();
    Step::Continue(Expr::cons(value.clone(), subtree))
}

fn find(r: &mut Replay<'_>, value: &Expr, subtree: Expr) -> Step {
    if subtree.is_nil() {
        return Step::Return(Expr::Nil);
    }
    if *value == subtree {
        r.consume();
        return Step::Continue(subtree);
    }
    match subtree.into_pair() {
        Ok((head, tail)) => {
            let head = r.edit(head);
            let tail = r.edit(tail);
            Step::Return(Expr::cons(head, tail))
        }
        Err(atom) => Step::Return(atom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::parse;

    fn run(src: &str, log: &[Command]) -> Expr {
        let registry = CommandRegistry::builtin();
        Replay::new(log, &registry).edit(parse(src).unwrap())
    }

    fn atomic(tags: &str) -> Vec<Command> {
        tags.chars().map(Command::Atomic).collect()
    }

    #[test]
    fn empty_log_is_identity() {
        assert_eq!(run("(a (b c))", &[]), parse("(a (b c))").unwrap());
    }

    #[test]
    fn car_and_cdr_descend() {
        // cdr then car reaches `b`; replace it
        let mut log = atomic("da");
        log.push(Command::Binary('r', Expr::sym("z")));
        assert_eq!(run("(a b c)", &log), parse("(a z c)").unwrap());
    }

    #[test]
    fn navigating_into_atom_is_noop() {
        assert_eq!(run("a", &atomic("aad")), Expr::sym("a"));
    }

    #[test]
    fn delete_drops_head() {
        assert_eq!(run("(a b c)", &atomic("x")), parse("(b c)").unwrap());
        assert_eq!(run("(a b c)", &atomic("dx")), parse("(a c)").unwrap());
    }

    #[test]
    fn copy_then_paste_duplicates() {
        assert_eq!(run("(a b)", &atomic("akbv")), parse("(a a b)").unwrap());
    }

    #[test]
    fn replace_leaves_pairs_alone() {
        let log = vec![Command::Binary('r', Expr::int(1))];
        assert_eq!(run("(a)", &log), parse("(a)").unwrap());
        let log = vec![Command::Atomic('a'), Command::Binary('r', Expr::int(1))];
        assert_eq!(run("(a)", &log), parse("(1)").unwrap());
    }

    #[test]
    fn cons_and_insert_prepend() {
        let log = vec![
            Command::Binary('c', Expr::sym("x")),
            Command::Binary('i', Expr::sym("y")),
        ];
        assert_eq!(run("(a)", &log), parse("(y x a)").unwrap());
    }

    #[test]
    fn find_continues_from_match() {
        let log = vec![
            Command::Binary('f', parse("(b c)").unwrap()),
            Command::Atomic('x'),
        ];
        assert_eq!(run("(a (b c) d)", &log), parse("(a (c) d)").unwrap());
    }

    #[test]
    fn find_without_match_freezes_log() {
        let log = vec![Command::Binary('f', Expr::sym("zz")), Command::Atomic('x')];
        assert_eq!(run("(a (b) c)", &log), parse("(a (b) c)").unwrap());
    }

    #[test]
    fn highlight_wraps_where_log_ends() {
        let log = vec![Command::Atomic('a'), Command::Highlight];
        assert_eq!(
            run("(a b)", &log),
            Expr::cons(
                Expr::focus(Expr::sym("a")),
                Expr::list([Expr::sym("b")])
            )
        );
    }

    #[test]
    fn unknown_tag_stops_interpretation() {
        let log = vec![Command::Atomic('?'), Command::Atomic('x')];
        assert_eq!(run("(a b)", &log), parse("(a b)").unwrap());
    }

    #[test]
    fn later_definitions_shadow_earlier() {
        fn swap(r: &mut Replay<'_>, subtree: Expr) -> Step {
            r.consume();
            match subtree.into_pair() {
                Ok((head, tail)) => Step::Continue(Expr::cons(tail, head)),
                Err(atom) => Step::Continue(atom),
            }
        }
        let mut registry = CommandRegistry::builtin();
        registry.define_atomic('x', "swap", swap);
        let log = atomic("x");
        let out = Replay::new(&log, &registry).edit(parse("(a . b)").unwrap());
        assert_eq!(out, parse("(b . a)").unwrap());
        assert_eq!(registry.atomic('x').map(|c| c.name), Some("swap"));
    }

    #[test]
    fn non_consuming_handler_does_not_spin() {
        fn stall(_: &mut Replay<'_>, subtree: Expr) -> Step {
            Step::Continue(subtree)
        }
        let mut registry = CommandRegistry::builtin();
        registry.define_atomic('s', "stall", stall);
        let log = atomic("s");
        let out = Replay::new(&log, &registry).edit(Expr::sym("a"));
        assert_eq!(out, Expr::sym("a"));
    }

    #[test]
    fn descent_is_bounded() {
        let expr = (0..MAX_EDIT_DEPTH + 10).fold(Expr::sym("x"), |e, _| Expr::list([e]));
        let registry = CommandRegistry::builtin();
        let mut log = atomic(&"a".repeat(MAX_EDIT_DEPTH + 10));
        log.push(Command::Highlight);
        let mut replay = Replay::new(&log, &registry);
        let out = replay.edit(expr.clone());
        // the focus lands at the deepest reachable level, content untouched
        assert_eq!(out.without_focus(), expr);
        assert_ne!(out, expr);
        assert!(replay.remaining().is_empty());
    }
}
