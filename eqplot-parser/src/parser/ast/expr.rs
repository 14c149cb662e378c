use crate::{
    parser::{
        ast::{
            binary::Binary,
            call::Call,
            literal::{LitFloat, LitInt, LitSym, Literal},
            paren::Paren,
            unary::Unary,
        },
        error::{kind, Error},
        fmt::Latex,
        is_function,
        token::op::{BinOp, BinOpKind, UnaryOp, UnaryOpKind},
        Associativity,
        Parse,
        Parser,
        Precedence,
    },
    tokenizer::{Token, TokenKind},
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Represents any kind of expression that can appear on one side of an equation, or in an
/// exclusion condition.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Expr {
    /// A literal value.
    Literal(Literal),

    /// A parenthesized expression, such as `(1 + 2)`.
    Paren(Paren),

    /// A function call, such as `abs(x)`.
    Call(Call),

    /// A unary operation, such as `-1` or `not x < 2`.
    Unary(Unary),

    /// A binary operation, such as `1 + 2`.
    Binary(Binary),
}

impl Expr {
    /// Returns the span of the expression.
    pub fn span(&self) -> Range<usize> {
        match self {
            Expr::Literal(literal) => literal.span(),
            Expr::Paren(paren) => paren.span(),
            Expr::Call(call) => call.span(),
            Expr::Unary(unary) => unary.span(),
            Expr::Binary(binary) => binary.span(),
        }
    }

    /// If this expression is a [`Expr::Paren`], returns the innermost expression in the
    /// parenthesized expression. Otherwise, returns `self`.
    pub fn innermost(&self) -> &Expr {
        let mut inner = self;
        while let Expr::Paren(paren) = inner {
            inner = &paren.expr;
        }
        inner
    }

    /// Returns the first comparison or logical operator found in this expression, if any.
    ///
    /// Such operators produce booleans, so an expression containing one cannot be used as a side
    /// of an equation.
    pub fn find_boolean_op(&self) -> Option<(&'static str, Range<usize>)> {
        match self {
            Expr::Literal(_) => None,
            Expr::Paren(paren) => paren.expr.find_boolean_op(),
            Expr::Call(call) => call.args.iter().find_map(Expr::find_boolean_op),
            Expr::Unary(unary) => match unary.op.kind {
                UnaryOpKind::Not => Some(("not", unary.op.span.clone())),
                UnaryOpKind::Neg => unary.operand.find_boolean_op(),
            },
            Expr::Binary(binary) if binary.op.kind.is_boolean() => {
                Some((binary.op.kind.as_str(), binary.op.span.clone()))
            },
            Expr::Binary(binary) => binary.lhs.find_boolean_op()
                .or_else(|| binary.rhs.find_boolean_op()),
        }
    }

    /// Parses an expression, consuming binary operators with a precedence of at least `min`.
    ///
    /// This is a precedence-climbing parser. Implicit multiplication is inserted between two
    /// adjacent operands, and has the same precedence as explicit multiplication.
    pub fn parse_with_precedence(input: &mut Parser, min: Precedence) -> Result<Self, Error> {
        let mut lhs = Self::parse_operand(input)?;

        while let Some(next) = input.peek_kind() {
            if let Some(op_kind) = BinOpKind::from_token(next) {
                let precedence = op_kind.precedence();
                if precedence < min {
                    break;
                }

                let op = input.try_parse::<BinOp>()?;
                let rhs_min = match op_kind.associativity() {
                    Associativity::Left => precedence.above(),
                    Associativity::Right => precedence,
                };
                let rhs = Self::parse_with_precedence(input, rhs_min)?;
                lhs = Expr::Binary(Binary::new(lhs, op, rhs));
            } else if next.starts_primary() && Precedence::Factor >= min {
                let op = BinOp::implicit_mul(lhs.span().end);
                let rhs = Self::parse_with_precedence(input, Precedence::Factor.above())?;
                lhs = Expr::Binary(Binary::new(lhs, op, rhs));
            } else {
                break;
            }
        }

        Ok(lhs)
    }

    /// Parses an operand: a primary expression, optionally preceded by a unary operator.
    fn parse_operand(input: &mut Parser) -> Result<Self, Error> {
        match input.peek_kind() {
            Some(TokenKind::Sub | TokenKind::Not) => {
                let op = input.try_parse::<UnaryOp>()?;
                let operand = Self::parse_with_precedence(input, op.kind.operand_precedence())?;
                let span = op.span.start..operand.span().end;
                Ok(Expr::Unary(Unary {
                    operand: Box::new(operand),
                    op,
                    span,
                }))
            },
            _ => Self::parse_primary(input),
        }
    }

    fn parse_primary(input: &mut Parser) -> Result<Self, Error> {
        let token = input.next_token()?;
        match token.kind {
            TokenKind::Int => Ok(Expr::Literal(Literal::Integer(LitInt {
                value: token.lexeme.to_owned(),
                span: token.span,
            }))),
            TokenKind::Float => Ok(Expr::Literal(Literal::Float(LitFloat {
                value: token.lexeme.to_owned(),
                span: token.span,
            }))),
            TokenKind::Name => Self::parse_name(input, token),
            TokenKind::OpenParen => Self::parse_paren(input, token),
            TokenKind::Symbol => Err(Error::new(vec![token.span], kind::UnknownToken {
                lexeme: token.lexeme.to_owned(),
            })),
            found => Err(Error::new(vec![token.span], kind::UnexpectedToken {
                expected: &[
                    TokenKind::Int,
                    TokenKind::Float,
                    TokenKind::Name,
                    TokenKind::OpenParen,
                    TokenKind::Sub,
                ],
                found,
            })),
        }
    }

    /// Resolves a name into a function call, a symbol, or a product of symbols.
    fn parse_name(input: &mut Parser, token: Token) -> Result<Self, Error> {
        let name = token.lexeme;
        if is_function(name) {
            return Self::parse_call(input, token);
        }

        if input.accepts_symbol(name) {
            return Ok(Expr::Literal(Literal::Symbol(LitSym {
                name: name.to_owned(),
                span: token.span,
            })));
        }

        match input.split_symbol(name) {
            Some(pieces) => {
                // the remaining pieces are picked up as separate names, and are implicitly
                // multiplied with this one
                input.split_previous(&pieces);
                let first = pieces[0].clone();
                Ok(Expr::Literal(Literal::Symbol(LitSym {
                    name: name[first.clone()].to_owned(),
                    span: token.span.start + first.start..token.span.start + first.end,
                })))
            },
            None => Err(Error::new(vec![token.span], kind::UnknownSymbol {
                name: name.to_owned(),
                allowed: input.symbols().to_vec(),
            })),
        }
    }

    fn parse_call(input: &mut Parser, token: Token) -> Result<Self, Error> {
        let name = LitSym {
            name: token.lexeme.to_owned(),
            span: token.span,
        };

        if input.peek_kind() != Some(TokenKind::OpenParen) {
            // implicit application, as in `sin x`
            let arg = Self::parse_with_precedence(input, Precedence::Exp)?;
            let span = name.span.start..arg.span().end;
            return Self::check_arity(Call {
                name,
                args: vec![arg],
                span,
                paren_span: None,
            });
        }

        let open = input.next_token()?;
        if input.peek_kind() == Some(TokenKind::CloseParen) {
            let close = input.next_token()?;
            return Err(Error::new(vec![open.span.start..close.span.end], kind::EmptyParenthesis));
        }

        let mut args = Vec::new();
        loop {
            args.push(Self::parse_with_precedence(input, Precedence::Any)?);
            match input.peek_kind() {
                Some(TokenKind::Comma) => {
                    input.next_token()?;
                },
                Some(TokenKind::CloseParen) => break,
                _ => return Err(Error::new(vec![open.span], kind::UnclosedParenthesis {
                    opening: true,
                })),
            }
        }

        let close = input.next_token()?;
        let span = name.span.start..close.span.end;
        Self::check_arity(Call {
            name,
            args,
            span,
            paren_span: Some(open.span.start..close.span.end),
        })
    }

    fn check_arity(call: Call) -> Result<Self, Error> {
        let (min, max) = Call::arity(&call.name.name);
        if (min..=max).contains(&call.args.len()) {
            Ok(Expr::Call(call))
        } else {
            Err(Error::new(vec![call.span()], kind::WrongArgumentCount {
                name: call.name.name.clone(),
                given: call.args.len(),
                expected: if min == max { "exactly one argument" } else { "one or two arguments" },
            }))
        }
    }

    fn parse_paren(input: &mut Parser, open: Token) -> Result<Self, Error> {
        if input.peek_kind() == Some(TokenKind::CloseParen) {
            let close = input.next_token()?;
            return Err(Error::new(vec![open.span.start..close.span.end], kind::EmptyParenthesis));
        }

        let expr = Self::parse_with_precedence(input, Precedence::Any)?;
        match input.peek_kind() {
            Some(TokenKind::CloseParen) => {
                let close = input.next_token()?;
                Ok(Expr::Paren(Paren {
                    expr: Box::new(expr),
                    span: open.span.start..close.span.end,
                }))
            },
            _ => Err(Error::new(vec![open.span], kind::UnclosedParenthesis { opening: true })),
        }
    }
}

impl Parse for Expr {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        Self::parse_with_precedence(input, Precedence::Any)
    }
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Literal(literal) => literal.fmt(f),
            Expr::Paren(paren) => paren.fmt(f),
            Expr::Call(call) => call.fmt(f),
            Expr::Unary(unary) => unary.fmt(f),
            Expr::Binary(binary) => binary.fmt(f),
        }
    }
}

impl Latex for Expr {
    fn fmt_latex(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Literal(literal) => literal.fmt_latex(f),
            Expr::Paren(paren) => paren.fmt_latex(f),
            Expr::Call(call) => call.fmt_latex(f),
            Expr::Unary(unary) => unary.fmt_latex(f),
            Expr::Binary(binary) => binary.fmt_latex(f),
        }
    }
}
