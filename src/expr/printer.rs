use std::ops::Range;

use super::{Atom, Expr};

/// Printed text plus the char range of the focused subtree, if any.
///
/// An empty range marks the single cell at its start, which is where a
/// focused `nil` tail sits (just before the closing paren).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendering {
    pub text: String,
    pub focus: Option<Range<usize>>,
}

/// Pretty-print `expr` for a display `width` characters wide.
///
/// A list that fits on the current line is printed flat. Otherwise it is
/// broken: when the head is a symbol the first argument stays on the head
/// line and the remaining arguments go on their own lines indented two
/// columns past the paren; any other list puts each element on its own line
/// aligned under the first.
pub fn render(expr: &Expr, width: usize) -> Rendering {
    let mut out = Writer::default();
    out.pretty(expr, width);
    Rendering {
        text: out.text,
        focus: out.focus,
    }
}

fn flat_len(expr: &Expr) -> usize {
    let mut out = Writer::default();
    out.flat(expr);
    out.chars
}

/// A list read off its cdr chain.
struct ListView<'a> {
    items: Vec<&'a Expr>,
    /// Index of the first item covered by a focus on the tail, or
    /// `items.len()` when the focused tail holds no items.
    focus_from: Option<usize>,
    dotted: Option<&'a Expr>,
}

impl<'a> ListView<'a> {
    fn of(expr: &'a Expr) -> Self {
        let mut view = ListView {
            items: Vec::new(),
            focus_from: None,
            dotted: None,
        };
        let mut cur = expr;
        loop {
            match cur {
                Expr::Pair(head, tail) => {
                    view.items.push(head);
                    cur = tail;
                }
                Expr::Focus(inner) if !view.items.is_empty() => {
                    if view.focus_from.is_none() {
                        view.focus_from = Some(view.items.len());
                    }
                    cur = inner;
                }
                Expr::Nil => break,
                other => {
                    view.dotted = Some(other);
                    break;
                }
            }
        }
        view
    }

    fn quoted(&self) -> Option<&'a Expr> {
        let quote = self.items.len() == 2
            && self.dotted.is_none()
            && self.focus_from.is_none()
            && self.items[0].as_symbol() == Some("quote");
        quote.then(|| self.items[1])
    }
}

#[derive(Default)]
struct Writer {
    text: String,
    chars: usize,
    col: usize,
    focus: Option<Range<usize>>,
}

impl Writer {
    fn push(&mut self, s: &str) {
        let n = s.chars().count();
        self.text.push_str(s);
        self.chars += n;
        self.col += n;
    }

    fn newline(&mut self, indent: usize) {
        self.text.push('\n');
        self.chars += 1;
        self.col = 0;
        self.push(&" ".repeat(indent));
    }

    fn mark(&mut self, span: Range<usize>) {
        if self.focus.is_none() {
            self.focus = Some(span);
        }
    }

    fn atom(&mut self, atom: &Atom) {
        self.push(&atom.to_string());
    }

    fn flat(&mut self, expr: &Expr) {
        match expr {
            Expr::Nil => self.push("nil"),
            Expr::Atom(atom) => self.atom(atom),
            Expr::Focus(inner) => {
                let start = self.chars;
                self.flat(inner);
                self.mark(start..self.chars);
            }
            Expr::Pair(..) => {
                let view = ListView::of(expr);
                if let Some(quoted) = view.quoted() {
                    self.push("'");
                    self.flat(quoted);
                    return;
                }
                self.push("(");
                let mut focus_start = None;
                for (i, item) in view.items.iter().enumerate() {
                    if i > 0 {
                        self.push(" ");
                    }
                    if view.focus_from == Some(i) {
                        focus_start = Some(self.chars);
                    }
                    self.flat(item);
                }
                self.close(&view, focus_start, |w, e| w.flat(e));
            }
        }
    }

    /// Dotted tail, tail focus and closing paren, shared by both layouts.
    fn close<F>(&mut self, view: &ListView<'_>, mut focus_start: Option<usize>, mut print: F)
    where
        F: FnMut(&mut Self, &Expr),
    {
        if let Some(dotted) = view.dotted {
            self.push(" . ");
            if view.focus_from == Some(view.items.len()) {
                focus_start = Some(self.chars);
            }
            print(self, dotted);
        } else if view.focus_from == Some(view.items.len()) {
            focus_start = Some(self.chars);
        }
        if let Some(start) = focus_start {
            self.mark(start..self.chars);
        }
        self.push(")");
    }

    fn pretty(&mut self, expr: &Expr, width: usize) {
        match expr {
            Expr::Focus(inner) => {
                let start = self.chars;
                self.pretty(inner, width);
                self.mark(start..self.chars);
            }
            Expr::Pair(..) if self.col.saturating_add(flat_len(expr)) > width => {
                self.broken(expr, width);
            }
            other => self.flat(other),
        }
    }

    fn broken(&mut self, expr: &Expr, width: usize) {
        let view = ListView::of(expr);
        if let Some(quoted) = view.quoted() {
            self.push("'");
            self.pretty(quoted, width);
            return;
        }
        let open = self.col;
        self.push("(");
        let symbol_head = view.items.len() > 1 && view.items[0].as_symbol().is_some();
        let (inline, indent) = if symbol_head { (2, open + 2) } else { (1, open + 1) };
        let mut focus_start = None;
        for (i, item) in view.items.iter().enumerate() {
            if i > 0 {
                if i < inline {
                    self.push(" ");
                } else {
                    self.newline(indent);
                }
            }
            if view.focus_from == Some(i) {
                focus_start = Some(self.chars);
            }
            self.pretty(item, width);
        }
        self.close(&view, focus_start, |w, e| w.pretty(e, width));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::parse;

    fn text(src: &str, width: usize) -> String {
        render(&parse(src).unwrap(), width).text
    }

    #[test]
    fn short_lists_print_flat() {
        assert_eq!(text("(a (b c) . d)", 40), "(a (b c) . d)");
        assert_eq!(text("(f 'x \"s\")", 40), "(f 'x \"s\")");
        assert_eq!(text("(quote)", 40), "(quote)");
    }

    #[test]
    fn long_forms_break_after_first_argument() {
        let src = "(defun sq (x) (* x x))";
        assert_eq!(text(src, 12), "(defun sq\n  (x)\n  (* x x))");
    }

    #[test]
    fn non_symbol_heads_align_elements() {
        assert_eq!(text("((a b) (c d) (e f))", 10), "((a b)\n (c d)\n (e f))");
    }

    #[test]
    fn printing_rereads_to_the_same_tree() {
        let src = "(let ((a 1) (b 2.5)) (list a b \"x y\" '(q . r)))";
        for width in [8, 16, 80] {
            let printed = text(src, width);
            assert_eq!(parse(&printed).unwrap(), parse(src).unwrap(), "width {width}");
        }
    }

    #[test]
    fn focus_spans_cover_subtree() {
        let e = Expr::list([Expr::sym("f"), Expr::focus(Expr::list([Expr::sym("g")])), Expr::int(1)]);
        let r = render(&e, 40);
        assert_eq!(r.text, "(f (g) 1)");
        assert_eq!(r.focus, Some(3..6));
    }

    #[test]
    fn long_lists_break_one_item_per_line() {
        let src = format!("({})", "a ".repeat(100_000));
        let r = render(&parse(&src).unwrap(), 40);
        // a symbol head keeps its first argument on the head line
        assert_eq!(r.text.lines().count(), 99_999);
        assert!(r.text.starts_with("(a a\n  a\n"));
    }

    #[test]
    fn focus_on_whole_expression() {
        let e = Expr::focus(parse("(a b)").unwrap());
        assert_eq!(render(&e, 40).focus, Some(0..5));
    }

    #[test]
    fn focus_on_tail_covers_remaining_items() {
        let e = Expr::cons(
            Expr::sym("a"),
            Expr::focus(Expr::list([Expr::sym("b"), Expr::sym("c")])),
        );
        let r = render(&e, 40);
        assert_eq!(r.text, "(a b c)");
        assert_eq!(r.focus, Some(3..6));
    }

    #[test]
    fn focus_on_nil_tail_marks_closing_cell() {
        let e = Expr::cons(Expr::sym("a"), Expr::focus(Expr::Nil));
        let r = render(&e, 40);
        assert_eq!(r.text, "(a)");
        assert_eq!(r.focus, Some(2..2));
    }

    #[test]
    fn focus_survives_line_breaks() {
        let e = parse("(defun sq (x) (* x x))").unwrap();
        let (head, tail) = e.into_pair().unwrap();
        let e = Expr::cons(head, Expr::focus(tail));
        let r = render(&e, 12);
        assert_eq!(r.text, "(defun sq\n  (x)\n  (* x x))");
        // from "sq" to just before the closing paren
        assert_eq!(r.focus, Some(7..25));
    }
}
