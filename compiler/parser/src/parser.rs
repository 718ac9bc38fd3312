use std::iter::Peekable;

use thiserror::Error;

use ast::*;
use lexer::*;

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected token {}", describe(.0))]
    UnexpectedToken(Option<Token>),
    #[error("expected ')', but found {}", describe(.found))]
    MissingClosingParen { found: Option<Token> },
    #[error("expected end of input, but found {}", describe_token(.0))]
    TrailingToken(Token),
}

fn describe(token: &Option<Token>) -> String {
    match token {
        Some(t) => describe_token(t),
        None => "end of input".to_string(),
    }
}

fn describe_token(t: &Token) -> String {
    format!("{} '{}' at {}:{}", t.kind.name(), t.text, t.line, t.col)
}

macro_rules! match_token_types {
    ($( $token:pat ),+ ) => {
        $(
        Some(Token{ kind: $token, ..})
        )|+
    };
}

/// Recursive descent parser over an already lexed token stream.
///
/// The single token of lookahead is the peeked element of `tokens`.
pub struct Parser {
    tokens: Peekable<std::vec::IntoIter<Token>>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens.into_iter().peekable(),
        }
    }

    /// Parses one expression. Tokens left over after it are ignored,
    /// so `3+4 5` yields `3+4`; use `parse_complete` to reject them.
    pub fn parse(&mut self) -> Result<Expr, ParseError> {
        self.parse_expr()
    }

    /// Parses one expression and requires the token stream to be exhausted
    pub fn parse_complete(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expr()?;
        self.expect_empty()?;
        Ok(expr)
    }

    // expr := term (('+' | '-') term)*
    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_term()?;

        while let match_token_types!(TokenType::Plus, TokenType::Minus) = self.tokens.peek() {
            let op = self.parse_binop()?;
            let right = self.parse_term()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    // term := factor (('*' | '/') factor)*
    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_factor()?;

        while let match_token_types!(TokenType::Times, TokenType::Divide) = self.tokens.peek() {
            let op = self.parse_binop()?;
            let right = self.parse_factor()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    // factor := NUMBER | '(' expr ')'
    fn parse_factor(&mut self) -> Result<Expr, ParseError> {
        match self.tokens.next() {
            Some(Token {
                kind: TokenType::Number,
                text,
                ..
            }) => Ok(Expr::Number(text)),
            Some(Token {
                kind: TokenType::LParen,
                ..
            }) => {
                let expr = self.parse_expr()?;
                self.expect_close_paren()?;

                Ok(expr)
            }
            t => Err(ParseError::UnexpectedToken(t)),
        }
    }

    fn parse_binop(&mut self) -> Result<BinaryOp, ParseError> {
        match self.tokens.next() {
            match_token_types!(TokenType::Plus) => Ok(BinaryOp::Add),
            match_token_types!(TokenType::Minus) => Ok(BinaryOp::Subtract),
            match_token_types!(TokenType::Times) => Ok(BinaryOp::Multiply),
            match_token_types!(TokenType::Divide) => Ok(BinaryOp::Divide),
            t => Err(ParseError::UnexpectedToken(t)),
        }
    }

    fn expect_close_paren(&mut self) -> Result<Token, ParseError> {
        match self.tokens.next() {
            Some(t) if t.kind == TokenType::RParen => Ok(t),
            found => Err(ParseError::MissingClosingParen { found }),
        }
    }

    fn expect_empty(&mut self) -> Result<(), ParseError> {
        match self.tokens.next() {
            Some(t) => Err(ParseError::TrailingToken(t)),
            None => Ok(()),
        }
    }
}

/// Parses a single expression from `tokens`, ignoring any trailing tokens
pub fn parse(tokens: Vec<Token>) -> Result<Expr, ParseError> {
    Parser::new(tokens).parse()
}
