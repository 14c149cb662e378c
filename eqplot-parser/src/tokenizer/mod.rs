pub mod token;

use logos::{Lexer, Logos};
pub use token::{Token, TokenKind};

/// Returns an iterator over the token kinds produced by the tokenizer.
pub fn tokenize(input: &str) -> Lexer<TokenKind> {
    TokenKind::lexer(input)
}

/// Returns an owned array containing all of the tokens produced by the tokenizer. This allows us
/// to backtrack in case of an error.
///
/// Characters the tokenizer does not recognize are produced as [`TokenKind::Symbol`] tokens, and
/// are reported by the parser.
pub fn tokenize_complete(input: &str) -> Box<[Token]> {
    let mut lexer = tokenize(input);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        tokens.push(Token {
            span: lexer.span(),
            kind: result.unwrap_or(TokenKind::Symbol),
            lexeme: lexer.slice(),
        });
    }

    tokens.into_boxed_slice()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Compares the tokens produced by the tokenizer to the raw expected tokens.
    fn compare_tokens<'source, const N: usize>(input: &'source str, expected: [(TokenKind, &'source str); N]) {
        let mut lexer = tokenize(input);

        for (expected_kind, expected_lexeme) in expected.into_iter() {
            assert_eq!(lexer.next(), Some(Ok(expected_kind)));
            assert_eq!(lexer.slice(), expected_lexeme);
        }

        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn implicit_product() {
        compare_tokens(
            "2xy + 5y^2",
            [
                (TokenKind::Int, "2"),
                (TokenKind::Name, "xy"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Add, "+"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Int, "5"),
                (TokenKind::Name, "y"),
                (TokenKind::Exp, "^"),
                (TokenKind::Int, "2"),
            ],
        );
    }

    #[test]
    fn function_style_equation() {
        compare_tokens(
            "f(x) == x**2",
            [
                (TokenKind::Name, "f"),
                (TokenKind::OpenParen, "("),
                (TokenKind::Name, "x"),
                (TokenKind::CloseParen, ")"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Eq, "=="),
                (TokenKind::Whitespace, " "),
                (TokenKind::Name, "x"),
                (TokenKind::Exp, "**"),
                (TokenKind::Int, "2"),
            ],
        );
    }

    #[test]
    fn numbers() {
        compare_tokens(
            "1.5 2e 3.",
            [
                (TokenKind::Float, "1.5"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Int, "2"),
                (TokenKind::Name, "e"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Float, "3."),
            ],
        );
    }

    #[test]
    fn scientific_notation() {
        compare_tokens(
            "1e3 2.5e-3 .5 4E+2e",
            [
                (TokenKind::Float, "1e3"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Float, "2.5e-3"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Float, ".5"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Float, "4E+2"),
                (TokenKind::Name, "e"),
            ],
        );
    }

    #[test]
    fn exponent_without_digits() {
        compare_tokens(
            "2e-x",
            [
                (TokenKind::Int, "2"),
                (TokenKind::Name, "e"),
                (TokenKind::Sub, "-"),
                (TokenKind::Name, "x"),
            ],
        );
    }

    #[test]
    fn exclusion_condition() {
        compare_tokens(
            "abs(x-2)<0.001|y>=1",
            [
                (TokenKind::Name, "abs"),
                (TokenKind::OpenParen, "("),
                (TokenKind::Name, "x"),
                (TokenKind::Sub, "-"),
                (TokenKind::Int, "2"),
                (TokenKind::CloseParen, ")"),
                (TokenKind::Less, "<"),
                (TokenKind::Float, "0.001"),
                (TokenKind::Or, "|"),
                (TokenKind::Name, "y"),
                (TokenKind::GreaterEq, ">="),
                (TokenKind::Int, "1"),
            ],
        );
    }

    #[test]
    fn unknown_character() {
        let tokens = tokenize_complete("x $ 1");
        assert_eq!(tokens[2].kind, TokenKind::Symbol);
        assert_eq!(tokens[2].lexeme, "$");
    }
}
