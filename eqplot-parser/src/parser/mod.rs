pub mod ast;
pub mod error;
pub mod fmt;
pub mod token;

use error::{Error, kind};
use eqplot_error::ErrorKind;
use super::tokenizer::{tokenize_complete, Token, TokenKind};
use std::ops::Range;

/// Names of the functions that can be called in an expression.
///
/// A name in this list followed by an expression (with or without parentheses) is always parsed
/// as a function call, and never as implicit multiplication.
pub const FUNCTIONS: &[&str] = &[
    "sin", "cos", "tan", "sec", "csc", "cot",
    "asin", "acos", "atan", "arcsin", "arccos", "arctan",
    "sinh", "cosh", "tanh",
    "exp", "log", "ln", "sqrt", "cbrt", "abs", "Abs",
];

/// Names of the mathematical constants that can be used in an expression.
pub const CONSTANTS: &[&str] = &["pi", "e"];

/// Returns true if the given name is one of the known [`FUNCTIONS`].
pub fn is_function(name: &str) -> bool {
    FUNCTIONS.contains(&name)
}

/// A high-level parser for the language. This is the type to use to parse an arbitrary piece of
/// code into an abstract syntax tree.
#[derive(Debug, Clone)]
pub struct Parser<'source> {
    /// The tokens that this parser is currently parsing.
    tokens: Box<[Token<'source>]>,

    /// The index of the **next** token to be parsed.
    cursor: usize,

    /// The variable names that may appear in the source, if restricted.
    ///
    /// When this is [`None`], any name is accepted as a variable. Otherwise, names that are not
    /// listed here (or in [`CONSTANTS`]) are split into a product of known names, such as `xy`
    /// into `x * y`, and an error is reported if that is not possible.
    symbols: Option<Vec<String>>,
}

impl<'source> Parser<'source> {
    /// Create a new parser for the given source. Any name is accepted as a variable.
    pub fn new(source: &'source str) -> Self {
        Self {
            tokens: tokenize_complete(source),
            cursor: 0,
            symbols: None,
        }
    }

    /// Create a new parser for the given source that only accepts the given variable names, in
    /// addition to the known [`CONSTANTS`] and [`FUNCTIONS`].
    pub fn with_symbols(source: &'source str, symbols: &[&str]) -> Self {
        Self {
            tokens: tokenize_complete(source),
            cursor: 0,
            symbols: Some(symbols.iter().map(|s| s.to_string()).collect()),
        }
    }

    /// Create a new parser over a pre-tokenized slice of source code.
    ///
    /// The spans of the tokens are left untouched, so errors produced by this parser point into
    /// the original source code.
    pub fn from_tokens(tokens: &[Token<'source>], symbols: Option<&[&str]>) -> Self {
        Self {
            tokens: tokens.to_vec().into_boxed_slice(),
            cursor: 0,
            symbols: symbols.map(|symbols| symbols.iter().map(|s| s.to_string()).collect()),
        }
    }

    /// Returns true if the given name is accepted as a single variable or constant.
    pub fn accepts_symbol(&self, name: &str) -> bool {
        match &self.symbols {
            Some(symbols) => symbols.iter().any(|s| s == name) || CONSTANTS.contains(&name),
            None => true,
        }
    }

    /// Splits a name into the longest known variable / constant names, from left to right.
    ///
    /// Returns the byte offsets and lengths of each piece, or [`None`] if the name cannot be
    /// covered entirely by known names.
    pub fn split_symbol(&self, name: &str) -> Option<Vec<Range<usize>>> {
        let symbols = self.symbols.as_ref()?;
        let mut known = symbols.iter()
            .map(String::as_str)
            .chain(CONSTANTS.iter().copied())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        // longest names first, so that `pix` is `pi * x` and not `p * i * x`
        known.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));

        let mut pieces = Vec::new();
        let mut start = 0;
        while start < name.len() {
            let piece = known.iter().find(|k| name[start..].starts_with(**k))?;
            pieces.push(start..start + piece.len());
            start += piece.len();
        }
        Some(pieces)
    }

    /// Returns the variable names this parser is restricted to, or an empty slice if any name is
    /// accepted.
    pub fn symbols(&self) -> &[String] {
        self.symbols.as_deref().unwrap_or(&[])
    }

    /// Replaces the most recently consumed token with one [`TokenKind::Name`] token per piece,
    /// leaving the cursor on the second piece.
    ///
    /// The pieces are byte ranges relative to the start of the replaced token, as returned by
    /// [`Parser::split_symbol`].
    pub(crate) fn split_previous(&mut self, pieces: &[Range<usize>]) {
        let idx = self.cursor - 1;
        let token = self.tokens[idx].clone();
        let lexeme: &'source str = token.lexeme;

        let mut tokens = self.tokens[..idx].to_vec();
        tokens.extend(pieces.iter().map(|piece| Token {
            span: token.span.start + piece.start..token.span.start + piece.end,
            kind: TokenKind::Name,
            lexeme: &lexeme[piece.clone()],
        }));
        tokens.extend_from_slice(&self.tokens[idx + 1..]);
        self.tokens = tokens.into_boxed_slice();
    }

    /// Creates an error that points at the current token, or the end of the source code if the
    /// cursor is at the end of the stream.
    pub fn error(&self, kind: impl ErrorKind + 'static) -> Error {
        Error::new(vec![self.span()], kind)
    }

    /// Returns a span pointing at the end of the source code.
    pub fn eof_span(&self) -> Range<usize> {
        self.tokens.last().map_or(0..0, |token| token.span.end..token.span.end)
    }

    /// Returns the span of the current token, or the end of the source code if the cursor is at
    /// the end of the stream.
    pub fn span(&self) -> Range<usize> {
        self.tokens
            .get(self.cursor)
            .map_or(self.eof_span(), |token| token.span.clone())
    }

    /// Sets the cursor of this parser to the cursor of the given parser.
    pub fn set_cursor(&mut self, other: &Self) {
        self.cursor = other.cursor;
    }

    /// Moves the cursor past any whitespace tokens.
    pub fn advance_past_whitespace(&mut self) {
        while let Some(token) = self.tokens.get(self.cursor) {
            if token.is_whitespace() {
                self.cursor += 1;
            } else {
                break;
            }
        }
    }

    /// Returns the current token. The cursor is not moved. Returns [`None`] if the cursor is at
    /// the end of the stream.
    pub fn current_token(&self) -> Option<&Token<'source>> {
        self.tokens.get(self.cursor)
    }

    /// Returns the kind of the next non-whitespace token, without moving the cursor.
    pub fn peek_kind(&self) -> Option<TokenKind> {
        self.tokens[self.cursor.min(self.tokens.len())..]
            .iter()
            .find(|token| !token.is_whitespace())
            .map(|token| token.kind)
    }

    /// Returns the next token to be parsed, then advances the cursor. Whitespace tokens are
    /// skipped.
    ///
    /// Returns an EOF error if there are no more tokens.
    pub fn next_token(&mut self) -> Result<Token<'source>, Error> {
        while self.cursor < self.tokens.len() {
            let token = &self.tokens[self.cursor];
            self.cursor += 1;
            if token.is_whitespace() {
                continue;
            } else {
                // cloning is cheap: only Range<_> is cloned
                return Ok(token.clone());
            }
        }

        Err(self.error(kind::UnexpectedEof))
    }

    /// Speculatively parses a value from the given stream of tokens. This function can be used
    /// in the [`Parse::parse`] implementation of a type with the given [`Parser`], as it will
    /// automatically backtrack the cursor position if parsing fails.
    ///
    /// If parsing is successful, the stream is advanced past the consumed tokens and the parsed
    /// value is returned. Otherwise, the stream is left unchanged and an error is returned.
    pub fn try_parse<T: Parse>(&mut self) -> Result<T, Error> {
        self.try_parse_with_fn(T::parse)
    }

    /// Speculatively parses a value from the given stream of tokens, using a custom parsing
    /// function to parse the value. The stream is left unchanged if parsing fails.
    pub fn try_parse_with_fn<T, F>(&mut self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut Parser<'source>) -> Result<T, Error>,
    {
        let start = self.cursor;
        match f(self) {
            Ok(value) => Ok(value),
            err => {
                self.cursor = start;
                err
            },
        }
    }

    /// Speculatively parses a value from the given stream of tokens, with a validation predicate.
    /// The value must parse successfully, **and** the predicate must return [`Ok`] for this
    /// function to return successfully.
    pub fn try_parse_then<T: Parse, F>(&mut self, predicate: F) -> Result<T, Error>
    where
        F: FnOnce(&T, &Parser) -> Result<(), Error>,
    {
        let start = self.cursor;

        // closure workaround allows us to use `?` in the closure
        let compute = |input: &mut Self| {
            let value = T::parse(input)?;
            predicate(&value, input)?;
            Ok(value)
        };

        match compute(self) {
            Ok(value) => Ok(value),
            err => {
                self.cursor = start;
                err
            },
        }
    }

    /// Attempts to parse a value from the given stream of tokens. All the tokens must be consumed
    /// by the parser; if not, an error is returned.
    pub fn try_parse_full<T: Parse>(&mut self) -> Result<T, Vec<Error>> {
        let value = T::parse(self).map_err(|err| vec![err])?;
        self.advance_past_whitespace();

        match self.current_token() {
            None => Ok(value),
            Some(token) if token.kind == TokenKind::CloseParen => {
                Err(vec![self.error(kind::UnclosedParenthesis { opening: false })])
            },
            Some(token) if token.kind == TokenKind::Symbol => {
                Err(vec![self.error(kind::UnknownToken { lexeme: token.lexeme.to_string() })])
            },
            Some(_) => Err(vec![self.error(kind::ExpectedEof)]),
        }
    }
}

/// Any type that can be parsed from a source of tokens.
pub trait Parse: Sized {
    /// Parses a value from the given stream of tokens, advancing the stream past the consumed
    /// tokens if parsing is successful.
    ///
    /// This function should be used by consumers of the library.
    fn parse(input: &mut Parser) -> Result<Self, Error>;
}

/// The associativity of a binary or unary operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    /// The binary / unary operation is left-associative.
    ///
    /// For binary operations, this means `a op b op c` is evaluated as `(a op b) op c`.
    Left,

    /// The binary / unary operation is right-associative.
    ///
    /// For binary operations, this means `a op b op c` is evaluated as `a op (b op c)`.
    Right,
}

/// The precedence of an operation, in order from lowest precedence (evaluated last) to highest
/// precedence (evaluated first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precedence {
    /// Any precedence.
    Any,

    /// Precedence of logical or (`|`, `||`).
    Or,

    /// Precedence of logical and (`&`, `&&`).
    And,

    /// Precedence of logical not (`not`).
    Not,

    /// Precedence of comparisons (`>`, `>=`, `<`, `<=`, `==`, and `!=`).
    Compare,

    /// Precedence of addition (`+`) and subtraction (`-`), which separate terms.
    Term,

    /// Precedence of multiplication (`*`) and division (`/`), which separate factors. Implicit
    /// multiplication also has this precedence.
    Factor,

    /// Precedence of unary subtraction (`-`).
    Neg,

    /// Precedence of exponentiation (`^`).
    Exp,

    /// Precedence of function application, which binds tighter than everything else.
    Call,
}

impl Precedence {
    /// Returns the precedence level directly above this one.
    ///
    /// The right-hand side of a left-associative operator is parsed at this level, so that
    /// `a - b - c` is parsed as `(a - b) - c`.
    pub fn above(self) -> Self {
        match self {
            Self::Any => Self::Or,
            Self::Or => Self::And,
            Self::And => Self::Not,
            Self::Not => Self::Compare,
            Self::Compare => Self::Term,
            Self::Term => Self::Factor,
            Self::Factor => Self::Neg,
            Self::Neg => Self::Exp,
            Self::Exp | Self::Call => Self::Call,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    use ast::{binary::Binary, call::Call, expr::Expr, literal::{Literal, LitFloat, LitInt, LitSym}, paren::Paren, unary::Unary};
    use token::op::{BinOp, BinOpKind, UnaryOp, UnaryOpKind};

    fn sym(name: &str, span: Range<usize>) -> Box<Expr> {
        Box::new(Expr::Literal(Literal::Symbol(LitSym { name: name.to_string(), span })))
    }

    fn int(value: &str, span: Range<usize>) -> Box<Expr> {
        Box::new(Expr::Literal(Literal::Integer(LitInt { value: value.to_string(), span })))
    }

    #[test]
    fn literal_int() {
        let mut parser = Parser::new("16");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, *int("16", 0..2));
    }

    #[test]
    fn scientific_literal_is_one_number() {
        let mut parser = Parser::with_symbols("x < 1e-3", &["x", "y"]);
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Binary(Binary {
            lhs: sym("x", 0..1),
            op: BinOp { kind: BinOpKind::Less, implicit: false, span: 2..3 },
            rhs: Box::new(Expr::Literal(Literal::Float(LitFloat { value: "1e-3".to_string(), span: 4..8 }))),
            span: 0..8,
        }));
    }

    #[test]
    fn leading_point_literal() {
        let mut parser = Parser::with_symbols(".5x", &["x", "y"]);
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Binary(Binary {
            lhs: Box::new(Expr::Literal(Literal::Float(LitFloat { value: ".5".to_string(), span: 0..2 }))),
            op: BinOp { kind: BinOpKind::Mul, implicit: true, span: 2..2 },
            rhs: sym("x", 2..3),
            span: 0..3,
        }));
    }

    #[test]
    fn implicit_multiplication_number_symbol() {
        let mut parser = Parser::with_symbols("2x", &["x", "y"]);
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Binary(Binary {
            lhs: int("2", 0..1),
            op: BinOp { kind: BinOpKind::Mul, implicit: true, span: 1..1 },
            rhs: sym("x", 1..2),
            span: 0..2,
        }));
    }

    #[test]
    fn split_adjacent_symbols() {
        let mut parser = Parser::with_symbols("xy", &["x", "y"]);
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Binary(Binary {
            lhs: sym("x", 0..1),
            op: BinOp { kind: BinOpKind::Mul, implicit: true, span: 1..1 },
            rhs: sym("y", 1..2),
            span: 0..2,
        }));
    }

    #[test]
    fn implicit_multiplication_binds_tighter_than_addition() {
        let mut parser = Parser::with_symbols("1 + 2x", &["x"]);
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Binary(Binary {
            lhs: int("1", 0..1),
            op: BinOp { kind: BinOpKind::Add, implicit: false, span: 2..3 },
            rhs: Box::new(Expr::Binary(Binary {
                lhs: int("2", 4..5),
                op: BinOp { kind: BinOpKind::Mul, implicit: true, span: 5..5 },
                rhs: sym("x", 5..6),
                span: 4..6,
            })),
            span: 0..6,
        }));
    }

    #[test]
    fn implicit_multiplication_of_parentheses() {
        let mut parser = Parser::with_symbols("(x+1)(x-1)", &["x"]);
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Binary(Binary {
            lhs: Box::new(Expr::Paren(Paren {
                expr: Box::new(Expr::Binary(Binary {
                    lhs: sym("x", 1..2),
                    op: BinOp { kind: BinOpKind::Add, implicit: false, span: 2..3 },
                    rhs: int("1", 3..4),
                    span: 1..4,
                })),
                span: 0..5,
            })),
            op: BinOp { kind: BinOpKind::Mul, implicit: true, span: 5..5 },
            rhs: Box::new(Expr::Paren(Paren {
                expr: Box::new(Expr::Binary(Binary {
                    lhs: sym("x", 6..7),
                    op: BinOp { kind: BinOpKind::Sub, implicit: false, span: 7..8 },
                    rhs: int("1", 8..9),
                    span: 6..9,
                })),
                span: 5..10,
            })),
            span: 0..10,
        }));
    }

    #[test]
    fn caret_is_right_associative() {
        let mut parser = Parser::new("2^3^4");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Binary(Binary {
            lhs: int("2", 0..1),
            op: BinOp { kind: BinOpKind::Exp, implicit: false, span: 1..2 },
            rhs: Box::new(Expr::Binary(Binary {
                lhs: int("3", 2..3),
                op: BinOp { kind: BinOpKind::Exp, implicit: false, span: 3..4 },
                rhs: int("4", 4..5),
                span: 2..5,
            })),
            span: 0..5,
        }));
    }

    #[test]
    fn negation_binds_looser_than_power() {
        let mut parser = Parser::new("-x^2");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Unary(Unary {
            operand: Box::new(Expr::Binary(Binary {
                lhs: sym("x", 1..2),
                op: BinOp { kind: BinOpKind::Exp, implicit: false, span: 2..3 },
                rhs: int("2", 3..4),
                span: 1..4,
            })),
            op: UnaryOp { kind: UnaryOpKind::Neg, span: 0..1 },
            span: 0..4,
        }));
    }

    #[test]
    fn subtraction_is_left_associative() {
        let mut parser = Parser::new("a - b - c");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr.to_string(), "a-b-c");
        let Expr::Binary(outer) = expr else { panic!("expected a binary expression") };
        assert_eq!(outer.rhs, sym("c", 8..9));
    }

    #[test]
    fn function_call() {
        let mut parser = Parser::with_symbols("sqrt(3 - t)", &["t", "y"]);
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Call(Call {
            name: LitSym { name: "sqrt".to_string(), span: 0..4 },
            args: vec![Expr::Binary(Binary {
                lhs: int("3", 5..6),
                op: BinOp { kind: BinOpKind::Sub, implicit: false, span: 7..8 },
                rhs: sym("t", 9..10),
                span: 5..10,
            })],
            span: 0..11,
            paren_span: Some(4..11),
        }));
    }

    #[test]
    fn function_application_without_parentheses() {
        let mut parser = Parser::with_symbols("sin x^2", &["x"]);
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr.to_string(), "sin(x^2)");
    }

    #[test]
    fn constants_and_variables() {
        let mut parser = Parser::with_symbols("2pix", &["x"]);
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr.to_string(), "2pix");
        let Expr::Binary(outer) = expr else { panic!("expected a binary expression") };
        assert_eq!(outer.rhs, sym("x", 3..4));
    }

    #[test]
    fn comparison_and_logic() {
        let mut parser = Parser::with_symbols("abs(x - 2) < 0.001 | y >= 1", &["x", "y"]);
        let expr = parser.try_parse_full::<Expr>().unwrap();

        let Expr::Binary(or) = expr else { panic!("expected a binary expression") };
        assert_eq!(or.op.kind, BinOpKind::Or);
        let Expr::Binary(lhs) = *or.lhs else { panic!("expected a comparison") };
        assert_eq!(lhs.op.kind, BinOpKind::Less);
    }

    #[test]
    fn unknown_symbol() {
        let mut parser = Parser::with_symbols("2z + x", &["x", "y"]);
        let errs = parser.try_parse_full::<Expr>().unwrap_err();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].spans, vec![1..2]);
    }

    #[test]
    fn unclosed_parenthesis() {
        let mut parser = Parser::new("(x + 1");
        let errs = parser.try_parse_full::<Expr>().unwrap_err();
        assert_eq!(errs[0].spans, vec![0..1]);
    }

    #[test]
    fn unopened_parenthesis() {
        let mut parser = Parser::new("x + 1)");
        let errs = parser.try_parse_full::<Expr>().unwrap_err();
        assert_eq!(errs[0].spans, vec![5..6]);
    }

    #[test]
    fn unknown_token() {
        let mut parser = Parser::new("x $ 1");
        assert!(parser.try_parse_full::<Expr>().is_err());
    }

    #[test]
    fn dangling_operator() {
        let mut parser = Parser::new("x +");
        assert!(parser.try_parse_full::<Expr>().is_err());
    }
}
