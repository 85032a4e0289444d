//! Program expressions as nested pairs.
//!
//! `Expr` is a cons-cell tree with atoms at the leaves. `Focus` is a
//! rendering annotation produced by the structural editor; it never appears
//! in an expression handed back to the rest of the shell.

use std::fmt;
use std::mem;

mod printer;
mod reader;

pub use printer::{Rendering, render};
pub use reader::{ParseError, parse};

#[derive(Debug, Clone, PartialEq)]
pub enum Atom {
    Symbol(String),
    Int(i64),
    Float(f64),
    Str(String),
}

/// Clone, equality and drop walk the cdr chain in a loop and recurse only
/// into heads, so list length is bounded by memory rather than stack.
#[derive(Debug, Default)]
pub enum Expr {
    #[default]
    Nil,
    Atom(Atom),
    Pair(Box<Expr>, Box<Expr>),
    Focus(Box<Expr>),
}

impl Expr {
    pub fn sym(name: impl Into<String>) -> Self {
        Expr::Atom(Atom::Symbol(name.into()))
    }

    pub fn int(n: i64) -> Self {
        Expr::Atom(Atom::Int(n))
    }

    pub fn string(s: impl Into<String>) -> Self {
        Expr::Atom(Atom::Str(s.into()))
    }

    pub fn cons(head: Expr, tail: Expr) -> Self {
        Expr::Pair(Box::new(head), Box::new(tail))
    }

    pub fn focus(inner: Expr) -> Self {
        Expr::Focus(Box::new(inner))
    }

    /// Build a proper list.
    pub fn list(items: impl IntoIterator<Item = Expr>) -> Self {
        Self::from_spine(items.into_iter().collect(), Expr::Nil)
    }

    /// Rebuild a chain of pairs from its heads and the final tail.
    fn from_spine(heads: Vec<Expr>, end: Expr) -> Self {
        heads
            .into_iter()
            .rev()
            .fold(end, |tail, head| Expr::cons(head, tail))
    }

    /// Split a pair into head and tail, or return any other value as `Err`.
    pub fn into_pair(mut self) -> Result<(Expr, Expr), Expr> {
        if let Expr::Pair(head, tail) = &mut self {
            return Ok((mem::take(&mut **head), mem::take(&mut **tail)));
        }
        Err(self)
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Expr::Nil)
    }

    /// Anything that is not a pair, `nil` included.
    pub fn is_atom(&self) -> bool {
        !matches!(self, Expr::Pair(..))
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Expr::Atom(Atom::Symbol(s)) => Some(s),
            _ => None,
        }
    }

    /// The expression with every focus annotation removed.
    pub fn without_focus(&self) -> Expr {
        let mut heads = Vec::new();
        let mut cur = self;
        let end = loop {
            match cur {
                Expr::Focus(inner) => cur = &**inner,
                Expr::Pair(head, tail) => {
                    heads.push(head.without_focus());
                    cur = &**tail;
                }
                Expr::Nil => break Expr::Nil,
                Expr::Atom(atom) => break Expr::Atom(atom.clone()),
            }
        };
        Self::from_spine(heads, end)
    }
}

impl Clone for Expr {
    fn clone(&self) -> Self {
        let mut heads = Vec::new();
        let mut cur = self;
        let end = loop {
            match cur {
                Expr::Pair(head, tail) => {
                    heads.push(Expr::clone(head));
                    cur = &**tail;
                }
                Expr::Nil => break Expr::Nil,
                Expr::Atom(atom) => break Expr::Atom(atom.clone()),
                Expr::Focus(inner) => break Expr::Focus(inner.clone()),
            }
        };
        Self::from_spine(heads, end)
    }
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        let (mut a, mut b) = (self, other);
        loop {
            match (a, b) {
                (Expr::Pair(ah, at), Expr::Pair(bh, bt)) => {
                    if **ah != **bh {
                        return false;
                    }
                    a = &**at;
                    b = &**bt;
                }
                (Expr::Focus(x), Expr::Focus(y)) => {
                    a = &**x;
                    b = &**y;
                }
                (Expr::Nil, Expr::Nil) => return true,
                (Expr::Atom(x), Expr::Atom(y)) => return x == y,
                _ => return false,
            }
        }
    }
}

impl Drop for Expr {
    fn drop(&mut self) {
        let mut next = match self {
            Expr::Pair(_, tail) => mem::take(&mut **tail),
            Expr::Focus(inner) => mem::take(&mut **inner),
            _ => return,
        };
        // each step detaches the rest of the chain before the cell drops
        loop {
            let rest = match &mut next {
                Expr::Pair(_, tail) => mem::take(&mut **tail),
                Expr::Focus(inner) => mem::take(&mut **inner),
                _ => return,
            };
            next = rest;
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Symbol(s) => write!(f, "{s}"),
            Atom::Int(n) => write!(f, "{n}"),
            Atom::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{x:.1}"),
            Atom::Float(x) => write!(f, "{x}"),
            Atom::Str(s) => {
                write!(f, "\"")?;
                for c in s.chars() {
                    match c {
                        '"' => write!(f, "\\\"")?,
                        '\\' => write!(f, "\\\\")?,
                        '\n' => write!(f, "\\n")?,
                        '\t' => write!(f, "\\t")?,
                        c => write!(f, "{c}")?,
                    }
                }
                write!(f, "\"")
            }
        }
    }
}

/// The flat, single-line form.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", render(self, usize::MAX).text)
    }
}
