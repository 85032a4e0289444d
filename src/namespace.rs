//! Name lookup and binding.

use std::collections::BTreeMap;

use indoc::indoc;
use tracing::info;

use crate::expr::Expr;

pub trait SymbolTable {
    /// Names containing `needle`, case-insensitively, sorted.
    fn apropos(&self, needle: &str) -> Vec<String>;
    fn documentation(&self, name: &str) -> Option<String>;
    fn value(&self, name: &str) -> Option<Expr>;
    /// Evaluate `expr` and bind the result to `name`. Evaluation is the
    /// identity: the expression is stored as data.
    fn bind(&mut self, name: &str, expr: Expr);
}

const BUILTIN_DOCS: &[(&str, &str)] = &[
    (
        "car",
        indoc! {"
            (car list)
            Returns the first item in a list."},
    ),
    (
        "cdr",
        indoc! {"
            (cdr list)
            Returns a list with the first item removed."},
    ),
    (
        "cons",
        indoc! {"
            (cons item item)
            If the second argument is a list, cons returns a new list with
            item added to the front of the list."},
    ),
    (
        "defun",
        indoc! {"
            (defun name (parameters) form*)
            Defines a function."},
    ),
    (
        "defvar",
        indoc! {"
            (defvar variable form)
            Defines a global variable."},
    ),
    (
        "lambda",
        indoc! {"
            (lambda (parameter*) form*)
            Creates an unnamed function with parameters. The body is
            evaluated with the parameters as local variables whose initial
            values are defined by the values of the forms after the lambda
            form."},
    ),
    (
        "let",
        indoc! {"
            (let ((var value) ... ) forms*)
            Declares local variables with values, and evaluates the forms
            with those local variables."},
    ),
    (
        "list",
        indoc! {"
            (list item*)
            Returns a list of the values of its arguments."},
    ),
    (
        "mapcar",
        indoc! {"
            (mapcar function list1 [list]*)
            Applies the function to each element in one or more lists,
            ignoring improper tails. Returns the list of results."},
    ),
    (
        "princ",
        indoc! {"
            (princ item [stream])
            Prints its argument, and returns its value.
            Characters and strings are printed without quotation marks or
            escape characters."},
    ),
    (
        "quote",
        indoc! {"
            (quote item)
            Prevents its argument from being evaluated. Can be written 'item."},
    ),
    (
        "setq",
        indoc! {"
            (setq symbol value [symbol value]*)
            For each pair of arguments assigns the value of the second
            argument to the variable specified in the first argument."},
    ),
];

/// Built-in documentation plus the user's bindings.
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    docs: BTreeMap<String, String>,
    bindings: BTreeMap<String, Expr>,
}

impl Namespace {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_builtins() -> Self {
        let mut ns = Self::empty();
        for (name, doc) in BUILTIN_DOCS {
            ns.docs.insert(name.to_string(), doc.to_string());
        }
        ns
    }

}

impl SymbolTable for Namespace {
    fn apropos(&self, needle: &str) -> Vec<String> {
        let needle = needle.to_lowercase();
        let mut names: Vec<String> = self
            .docs
            .keys()
            .chain(self.bindings.keys())
            .filter(|name| name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        names.sort();
        names.dedup();
        names
    }

    fn documentation(&self, name: &str) -> Option<String> {
        if let Some(doc) = self.docs.get(name) {
            return Some(doc.clone());
        }
        self.bindings
            .get(name)
            .map(|value| format!("{name}\nUser binding: {value}"))
    }

    fn value(&self, name: &str) -> Option<Expr> {
        self.bindings.get(name).cloned()
    }

    fn bind(&mut self, name: &str, expr: Expr) {
        info!(name, "symbol bound");
        self.bindings.insert(name.to_string(), expr);
    }
}
