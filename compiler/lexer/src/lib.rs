use std::str::Chars;

use thiserror::Error;

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum LexError {
    #[error("unrecognized character '{ch}' at offset {position} ({line}:{col})")]
    UnrecognizedCharacter {
        ch: char,
        position: usize,
        line: i32,
        col: i32,
    },
}

impl LexError {
    /// Byte offset of the offending character
    pub fn position(&self) -> usize {
        match self {
            LexError::UnrecognizedCharacter { position, .. } => *position,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Token {
    pub kind: TokenType,
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub line: i32,
    pub col: i32,
}

impl Token {
    fn new(kind: TokenType, text: &str, start: usize, end: usize, line: i32, col: i32) -> Self {
        Self {
            kind,
            text: text.to_string(),
            start,
            end,
            line,
            col,
        }
    }
}

/// Token kinds, declared in matching priority order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenType {
    Number,
    Plus,
    Minus,
    Times,
    Divide,
    LParen,
    RParen,
    Identifier,
    Whitespace,
}

impl TokenType {
    pub fn name(&self) -> &'static str {
        match self {
            TokenType::Number => "NUMBER",
            TokenType::Plus => "PLUS",
            TokenType::Minus => "MINUS",
            TokenType::Times => "TIMES",
            TokenType::Divide => "DIVIDE",
            TokenType::LParen => "LPAREN",
            TokenType::RParen => "RPAREN",
            TokenType::Identifier => "IDENTIFIER",
            TokenType::Whitespace => "WHITESPACE",
        }
    }
}

const EOF: char = '\0';

pub struct Lexer<'a> {
    /// Source Text
    source: &'a str,

    /// Remaining source characters
    chars: Chars<'a>,
    line: i32,
    col: i32,
    failed: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars(),
            line: 1,
            col: 1,
            failed: false,
        }
    }

    /// Lazily scans tokens, skipping whitespace. Nothing is yielded after the first error.
    pub fn tokenize(&'a mut self) -> impl Iterator<Item = Result<Token, LexError>> + '_ {
        std::iter::from_fn(move || {
            if self.failed {
                return None;
            }

            let token = self.scan_token();
            if let Some(Err(_)) = token {
                self.failed = true;
            }
            token
        })
        .filter(|t| !matches!(t, Ok(Token { kind: TokenType::Whitespace, .. })))
    }

    fn scan_token(&mut self) -> Option<Result<Token, LexError>> {
        let start = self.offset();
        let line = self.line;
        let col = self.col;

        let c = self.peek_char()?;

        let token_type = match c {
            '0'..='9' => self.number(),
            '+' => self.single(TokenType::Plus),
            '-' => self.single(TokenType::Minus),
            '*' => self.single(TokenType::Times),
            '/' => self.single(TokenType::Divide),
            '(' => self.single(TokenType::LParen),
            ')' => self.single(TokenType::RParen),
            'i' if self.rest().starts_with("id") => self.identifier(),
            c if c.is_whitespace() => self.whitespace(),
            ch => {
                return Some(Err(LexError::UnrecognizedCharacter {
                    ch,
                    position: start,
                    line,
                    col,
                }))
            }
        };

        let end = self.offset();

        Some(Ok(Token::new(
            token_type,
            &self.source[start..end],
            start,
            end,
            line,
            col,
        )))
    }

    fn single(&mut self, kind: TokenType) -> TokenType {
        self.advance();
        kind
    }

    fn number(&mut self) -> TokenType {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        TokenType::Number
    }

    // Only the exact literal "id" is an identifier
    fn identifier(&mut self) -> TokenType {
        self.advance();
        self.advance();

        TokenType::Identifier
    }

    fn whitespace(&mut self) -> TokenType {
        while self.peek().is_whitespace() {
            if self.peek() == '\n' {
                self.advance();
                self.line += 1;
                self.col = 1;
            } else {
                self.advance();
            }
        }

        TokenType::Whitespace
    }

    /// Get offset into source text
    fn offset(&self) -> usize {
        self.source.len() - self.chars.as_str().len()
    }

    fn rest(&self) -> &'a str {
        self.chars.as_str()
    }

    fn peek_char(&self) -> Option<char> {
        self.chars.clone().next()
    }

    fn peek(&self) -> char {
        self.peek_char().unwrap_or(EOF)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.col += 1;

        Some(c)
    }
}

/// Tokenizes the whole source, failing on the first unrecognized character
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).tokenize().collect()
}

#[cfg(test)]
mod tests {
    use super::TokenType::*;
    use super::*;

    fn kinds_and_text(src: &str) -> Vec<(TokenType, String)> {
        tokenize(src)
            .unwrap()
            .into_iter()
            .map(|t| (t.kind, t.text))
            .collect()
    }

    #[test]
    fn demo_expression() {
        let src = "4+7*14+(7+6)*3";
        let expected = vec![
            (Number, "4"),
            (Plus, "+"),
            (Number, "7"),
            (Times, "*"),
            (Number, "14"),
            (Plus, "+"),
            (LParen, "("),
            (Number, "7"),
            (Plus, "+"),
            (Number, "6"),
            (RParen, ")"),
            (Times, "*"),
            (Number, "3"),
        ];
        let expected: Vec<_> = expected
            .into_iter()
            .map(|(k, t)| (k, t.to_string()))
            .collect();

        assert_eq!(kinds_and_text(src), expected)
    }

    #[test]
    fn whitespace_is_skipped() {
        let src = "4 + 7";
        let expected = vec![Number, Plus, Number];

        let mut lexer = Lexer::new(src);
        let tokens: Vec<_> = lexer.tokenize().map(|t| t.unwrap().kind).collect();

        assert_eq!(tokens, expected)
    }

    #[test]
    fn digits_only_is_one_number() {
        for src in ["0", "7", "42", "000123", "98765432109876543210"] {
            let tokens = tokenize(src).unwrap();

            assert_eq!(tokens.len(), 1);
            assert_eq!(tokens[0].kind, Number);
            assert_eq!(tokens[0].text, src);
        }
    }

    #[test]
    fn all_operators() {
        let src = "+ - * / ( )";
        let expected = vec![Plus, Minus, Times, Divide, LParen, RParen];

        let tokens: Vec<_> = tokenize(src).unwrap().into_iter().map(|t| t.kind).collect();

        assert_eq!(tokens, expected)
    }

    #[test]
    fn identifier_is_exact_literal() {
        let src = "id*2";
        let expected = vec![Identifier, Times, Number];

        let tokens: Vec<_> = tokenize(src).unwrap().into_iter().map(|t| t.kind).collect();

        assert_eq!(tokens, expected)
    }

    #[test]
    fn longer_identifier_fails_after_id() {
        let mut lexer = Lexer::new("idx");
        let results: Vec<_> = lexer.tokenize().collect();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_ref().unwrap().kind, Identifier);
        assert_eq!(results[1].as_ref().unwrap_err().position(), 2);
    }

    #[test]
    fn unrecognized_character() {
        let err = tokenize("3+#").unwrap_err();

        assert_eq!(
            err,
            LexError::UnrecognizedCharacter {
                ch: '#',
                position: 2,
                line: 1,
                col: 3,
            }
        )
    }

    #[test]
    fn lone_i_is_unrecognized() {
        assert_eq!(tokenize("1 + i").unwrap_err().position(), 4)
    }

    #[test]
    fn iterator_stops_after_error() {
        let mut lexer = Lexer::new("1 $ 2 3");
        let results: Vec<_> = lexer.tokenize().collect();

        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }

    #[test]
    fn tokenizing_twice_is_identical() {
        let src = "12 * (3 - id) / 4";

        assert_eq!(tokenize(src), tokenize(src));
        assert_eq!(
            Lexer::new(src).tokenize().collect::<Vec<_>>(),
            Lexer::new(src).tokenize().collect::<Vec<_>>()
        );
    }

    #[test]
    fn offsets_and_lines() {
        let tokens = tokenize("1 +\n  22").unwrap();

        assert_eq!(tokens[2].text, "22");
        assert_eq!((tokens[2].start, tokens[2].end), (6, 8));
        assert_eq!((tokens[2].line, tokens[2].col), (2, 3));
    }

    #[test]
    fn empty_source() {
        assert_eq!(tokenize("   "), Ok(vec![]));
        assert_eq!(tokenize(""), Ok(vec![]));
    }
}
