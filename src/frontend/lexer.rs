use std::{collections::BTreeMap, str::Chars};

use itertools::{PeekNth, peek_nth};
use once_cell::sync::Lazy;
use strum::EnumString;

#[derive(Debug)]
pub struct Lexer<'source> {
    source: &'source str,
    position: usize,
    line_number: usize,
    chars: PeekNth<Chars<'source>>,
    tokens: Vec<Token>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Raw lexeme. Numbers keep their literal form (including any fractional
    /// part) so later stages can infer int vs. float from the text.
    pub text: String,
    /// 1-based source line of the token's first character
    pub line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TokenKind {
    /* Words */
    Keyword(Keyword), // int
    Identifier,       // x

    /* Literals */
    NumberLiteral, // 1 or 1.5

    /* Operators */
    Plus,   // +
    Minus,  // -
    Star,   // *
    Slash,  // /
    Assign, // =

    /* Punctuation */
    Semicolon,  // ;
    OpenParen,  // (
    CloseParen, // )

    /// Appended exactly once after the scan completes
    EndOfInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Keyword {
    Int,
    Float,
}

/// Table of single char tokens (matched after whitespace, comments, words,
/// and numbers are checked for)
static SINGLE_TOKENS: Lazy<BTreeMap<char, TokenKind>> = Lazy::new(|| {
    BTreeMap::from([
        ('+', TokenKind::Plus),
        ('-', TokenKind::Minus),
        ('*', TokenKind::Star),
        ('/', TokenKind::Slash),
        ('=', TokenKind::Assign),
        (';', TokenKind::Semicolon),
        ('(', TokenKind::OpenParen),
        (')', TokenKind::CloseParen),
    ])
});

impl core::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            Self::Keyword(_) => "KW",
            Self::Identifier => "ID",
            Self::NumberLiteral => "NUM",
            Self::Plus => "PLUS",
            Self::Minus => "MINUS",
            Self::Star => "MUL",
            Self::Slash => "DIV",
            Self::Assign => "ASSIGN",
            Self::Semicolon => "SEMI",
            Self::OpenParen => "LP",
            Self::CloseParen => "RP",
            Self::EndOfInput => "EOF",
        })
    }
}

/// Unexpected character in the stream. Aborts the whole scan: no partial
/// token sequence is usable downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexicalError {
    pub character: char,
    pub line: usize,
}

impl core::fmt::Display for LexicalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Unexpected character '{}' at line {}",
            self.character, self.line
        )
    }
}

impl std::error::Error for LexicalError {}

impl<'source> Lexer<'source> {
    pub fn new(source: &'source str) -> Self {
        Self {
            source,
            chars: peek_nth(source.chars()),
            position: 0,
            line_number: 1,
            tokens: Vec::new(),
        }
    }

    /// Scans the whole source left to right. The returned sequence always
    /// ends with exactly one end-of-input token.
    pub fn tokenize(source: &'source str) -> Result<Vec<Token>, LexicalError> {
        let mut lexer = Self::new(source);

        while let Some(c) = lexer.chars.peek().copied() {
            match c {
                c if c.is_ascii_whitespace() => lexer.ignore_whitespace(),

                '/' if lexer.chars.peek_nth(1).is_some_and(|c| *c == '/') => lexer.ignore_line(),

                a if a.is_ascii_alphabetic() || a == '_' => lexer.read_word(),

                n if n.is_ascii_digit() => lexer.read_number(),

                s if SINGLE_TOKENS.contains_key(&s) => lexer.read_single(SINGLE_TOKENS[&s]),

                c => {
                    return Err(LexicalError {
                        character: c,
                        line: lexer.line_number,
                    });
                }
            }
        }

        lexer.push(TokenKind::EndOfInput, String::new());

        Ok(lexer.tokens)
    }

    fn push(&mut self, kind: TokenKind, text: String) {
        self.tokens.push(Token {
            kind,
            text,
            line: self.line_number,
        });
    }

    fn bump(&mut self) {
        // `position` is a byte offset into `source`, so it must advance by
        // the encoded width; comments may contain multi-byte characters
        if let Some(c) = self.chars.next() {
            self.position += c.len_utf8();
        }
    }

    fn ignore_whitespace(&mut self) {
        while let Some(c) = self.chars.peek().copied() {
            if !c.is_ascii_whitespace() {
                break;
            }

            if c == '\n' {
                self.line_number += 1;
            }

            self.bump();
        }
    }

    /// Consumes a `//` comment through (not including) the next newline
    fn ignore_line(&mut self) {
        while let Some(c) = self.chars.peek().copied() {
            if c == '\n' {
                break;
            }

            self.bump();
        }
    }

    /// Keyword or identifier
    fn read_word(&mut self) {
        let start_position = self.position;
        let line = self.line_number;

        while let Some(c) = self.chars.peek().copied() {
            if !(c.is_ascii_alphanumeric() || c == '_') {
                break;
            }

            self.bump();
        }

        let value = &self.source[start_position..self.position];

        // The only two recognized keywords are `int` and `float`; any other
        // word is an identifier
        let kind = if let Ok(keyword) = value.parse() {
            TokenKind::Keyword(keyword)
        } else {
            TokenKind::Identifier
        };

        self.tokens.push(Token {
            kind,
            text: value.to_owned(),
            line,
        });
    }

    /// Integer or float literal. The fractional part is only consumed when
    /// the `.` is followed by a digit; a bare trailing `.` stays in the
    /// stream and is rejected by the next scan step since no operator
    /// covers it.
    fn read_number(&mut self) {
        let start_position = self.position;
        let line = self.line_number;

        while let Some(c) = self.chars.peek().copied() {
            if !c.is_ascii_digit() {
                break;
            }

            self.bump();
        }

        if self.chars.peek().is_some_and(|c| *c == '.')
            && self.chars.peek_nth(1).is_some_and(|c| c.is_ascii_digit())
        {
            self.bump();

            while let Some(c) = self.chars.peek().copied() {
                if !c.is_ascii_digit() {
                    break;
                }

                self.bump();
            }
        }

        let value = &self.source[start_position..self.position];

        self.tokens.push(Token {
            kind: TokenKind::NumberLiteral,
            text: value.to_owned(),
            line,
        });
    }

    fn read_single(&mut self, kind: TokenKind) {
        let start_position = self.position;

        self.bump();

        let value = &self.source[start_position..self.position];

        self.push(kind, value.to_owned());
    }
}
