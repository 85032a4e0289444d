use thiserror::Error;

use super::{Atom, Expr};
use crate::constants::MAX_READ_DEPTH;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("unexpected ')' at offset {0}")]
    UnexpectedClose(usize),
    #[error("unexpected input after expression at offset {0}")]
    TrailingInput(usize),
    #[error("misplaced '.' at offset {0}")]
    BadDot(usize),
    #[error("expression nested deeper than {MAX_READ_DEPTH}")]
    TooDeep,
    #[error("unterminated string starting at offset {0}")]
    UnterminatedString(usize),
}

/// Read exactly one expression from `src`.
///
/// Supports lists, dotted pairs, `'x` as `(quote x)`, strings with
/// backslash escapes, integers, floats, symbols and `;` line comments.
pub fn parse(src: &str) -> Result<Expr, ParseError> {
    let mut reader = Reader {
        chars: src.chars().collect(),
        pos: 0,
        depth: 0,
    };
    let expr = reader.read()?;
    reader.skip_blank();
    if reader.pos < reader.chars.len() {
        return Err(ParseError::TrailingInput(reader.pos));
    }
    Ok(expr)
}

struct Reader {
    chars: Vec<char>,
    pos: usize,
    depth: usize,
}

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, '(' | ')' | '\'' | '"' | ';')
}

impl Reader {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_blank(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.pos += 1;
            } else if c == ';' {
                while let Some(c) = self.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.pos += 1;
                }
            } else {
                break;
            }
        }
    }

    fn read(&mut self) -> Result<Expr, ParseError> {
        self.skip_blank();
        let start = self.pos;
        match self.peek() {
            None => Err(ParseError::UnexpectedEof),
            Some(')') => Err(ParseError::UnexpectedClose(start)),
            Some('(') => {
                self.pos += 1;
                self.nested(|r| r.read_list())
            }
            Some('\'') => {
                self.pos += 1;
                let quoted = self.nested(|r| r.read())?;
                Ok(Expr::list([Expr::sym("quote"), quoted]))
            }
            Some('"') => self.read_string(),
            Some(_) => {
                let token = self.token();
                if token == "." {
                    return Err(ParseError::BadDot(start));
                }
                Ok(atom(&token))
            }
        }
    }

    fn nested<F>(&mut self, f: F) -> Result<Expr, ParseError>
    where
        F: FnOnce(&mut Self) -> Result<Expr, ParseError>,
    {
        if self.depth >= MAX_READ_DEPTH {
            return Err(ParseError::TooDeep);
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn read_list(&mut self) -> Result<Expr, ParseError> {
        let mut items = Vec::new();
        let mut tail = Expr::Nil;
        loop {
            self.skip_blank();
            let at = self.pos;
            match self.peek() {
                None => return Err(ParseError::UnexpectedEof),
                Some(')') => {
                    self.pos += 1;
                    break;
                }
                Some(c) if c == '.' && self.dot_at(at) => {
                    if items.is_empty() {
                        return Err(ParseError::BadDot(at));
                    }
                    self.pos += 1;
                    tail = self.read()?;
                    self.skip_blank();
                    if self.peek() != Some(')') {
                        return Err(match self.peek() {
                            None => ParseError::UnexpectedEof,
                            Some(_) => ParseError::BadDot(at),
                        });
                    }
                    self.pos += 1;
                    break;
                }
                Some(_) => items.push(self.read()?),
            }
        }
        Ok(items
            .into_iter()
            .rev()
            .fold(tail, |tail, head| Expr::cons(head, tail)))
    }

    /// A lone `.` token, as opposed to a symbol or float starting with one.
    fn dot_at(&self, at: usize) -> bool {
        self.chars.get(at + 1).is_none_or(|c| is_delimiter(*c))
    }

    fn read_string(&mut self) -> Result<Expr, ParseError> {
        let start = self.pos;
        self.pos += 1;
        let mut out = String::new();
        loop {
            let Some(c) = self.peek() else {
                return Err(ParseError::UnterminatedString(start));
            };
            self.pos += 1;
            match c {
                '"' => return Ok(Expr::Atom(Atom::Str(out))),
                '\\' => {
                    let Some(esc) = self.peek() else {
                        return Err(ParseError::UnterminatedString(start));
                    };
                    self.pos += 1;
                    out.push(match esc {
                        'n' => '\n',
                        't' => '\t',
                        other => other,
                    });
                }
                c => out.push(c),
            }
        }
    }

    fn token(&mut self) -> String {
        let mut token = String::new();
        while let Some(c) = self.peek() {
            if is_delimiter(c) {
                break;
            }
            token.push(c);
            self.pos += 1;
        }
        token
    }
}

fn atom(token: &str) -> Expr {
    if token.eq_ignore_ascii_case("nil") {
        return Expr::Nil;
    }
    if let Ok(n) = token.parse::<i64>() {
        return Expr::int(n);
    }
    let numeric = token
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.'));
    if numeric && let Ok(x) = token.parse::<f64>() && x.is_finite() {
        return Expr::Atom(Atom::Float(x));
    }
    Expr::sym(token)
}
